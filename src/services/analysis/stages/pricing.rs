use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{has_text, insufficient_data, profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

const STRATEGIES: [&str; 4] = [
    "Value-based pricing",
    "Premium pricing",
    "Psychological pricing",
    "Bundle pricing",
];

/// Menu price points relative to the local market. Needs a price range.
pub struct PricingStrategyStage;

fn price_band(low: u32, high: u32, rng: &mut impl Rng) -> Value {
    let min = rng.random_range(low..high);
    let max = rng.random_range(min + 1..=high * 2);
    json!({ "min": min, "max": max })
}

#[async_trait]
impl AnalysisStage for PricingStrategyStage {
    fn kind(&self) -> StageKind {
        StageKind::PricingStrategy
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        if !has_text(&profile.price_range) {
            return Ok(insufficient_data(self.kind(), &["price_range"]));
        }

        let mut rng = profile_rng(profile, self.kind());
        let below: u32 = rng.random_range(0..=30);
        let above: u32 = rng.random_range(0..=30);

        Ok(json!({
            "price_range": profile.price_range,
            "recommended_price_points": {
                "appetizers": price_band(50, 150, &mut rng),
                "main_courses": price_band(150, 400, &mut rng),
                "desserts": price_band(50, 125, &mut rng),
                "beverages": price_band(30, 100, &mut rng),
            },
            "competitor_price_comparison": {
                "below_market": below,
                "at_market": 100 - below - above,
                "above_market": above,
            },
            "price_sensitivity": {
                "elasticity": round_to(rng.random_range(0.5..2.0), 2),
                "optimal_price_increase_pct": round_to(rng.random_range(0.0..15.0), 1),
            },
            "pricing_strategies": STRATEGIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::stages::test_support::full_profile;

    #[tokio::test]
    async fn test_price_comparison_sums_to_hundred() {
        let payload = PricingStrategyStage.analyze(&full_profile()).await.unwrap();
        let cmp = &payload["competitor_price_comparison"];
        let total = cmp["below_market"].as_u64().unwrap()
            + cmp["at_market"].as_u64().unwrap()
            + cmp["above_market"].as_u64().unwrap();
        assert_eq!(total, 100);
    }

    #[tokio::test]
    async fn test_price_points_are_ordered() {
        let payload = PricingStrategyStage.analyze(&full_profile()).await.unwrap();
        for (_, band) in payload["recommended_price_points"].as_object().unwrap() {
            assert!(band["min"].as_u64().unwrap() < band["max"].as_u64().unwrap());
        }
    }
}
