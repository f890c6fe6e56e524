use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

const MARKET_TRENDS: [&str; 4] = [
    "Increasing demand for healthy options",
    "Growing preference for local ingredients",
    "Rising popularity of delivery services",
    "Shift towards casual dining experiences",
];

/// Estimates total and addressable market for the profile's area.
pub struct MarketSizingStage;

/// Average spend band (THB) implied by a `$`-style price range
fn spend_band(price_range: Option<&str>) -> (u32, u32) {
    match price_range.map(str::trim) {
        Some("$") => (150, 400),
        Some("$$") => (300, 800),
        Some("$$$") => (700, 1500),
        Some("$$$$") => (1200, 3000),
        _ => (150, 1500),
    }
}

#[async_trait]
impl AnalysisStage for MarketSizingStage {
    fn kind(&self) -> StageKind {
        StageKind::MarketSizing
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        let mut rng = profile_rng(profile, self.kind());

        let total_market_size: u64 = rng.random_range(5_000_000..=50_000_000);
        let addressable_share: f64 = rng.random_range(0.1..0.3);
        let customers_per_month: u32 = rng.random_range(1_000..=10_000);
        let (low, high) = spend_band(profile.price_range.as_deref());
        let average_spend: u32 = rng.random_range(low..=high);

        Ok(json!({
            "total_market_size": total_market_size,
            "addressable_market": (total_market_size as f64 * addressable_share).round() as u64,
            "market_growth_rate": round_to(rng.random_range(1.5..7.5), 1),
            "estimated_customers_per_month": customers_per_month,
            "average_spend_per_customer": average_spend,
            "estimated_monthly_revenue": u64::from(customers_per_month) * u64::from(average_spend),
            "market_trends": MARKET_TRENDS,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::stages::test_support::{bare_profile, full_profile};

    #[tokio::test]
    async fn test_revenue_is_customers_times_spend() {
        let payload = MarketSizingStage.analyze(&full_profile()).await.unwrap();
        let customers = payload["estimated_customers_per_month"].as_u64().unwrap();
        let spend = payload["average_spend_per_customer"].as_u64().unwrap();
        assert_eq!(
            payload["estimated_monthly_revenue"].as_u64().unwrap(),
            customers * spend
        );
        assert!((300..=800).contains(&spend));
    }

    #[tokio::test]
    async fn test_runs_without_optional_fields() {
        let payload = MarketSizingStage.analyze(&bare_profile()).await.unwrap();
        assert!(payload.get("insufficient_data").is_none());
        assert!(payload["addressable_market"].as_u64().unwrap()
            <= payload["total_market_size"].as_u64().unwrap());
    }
}
