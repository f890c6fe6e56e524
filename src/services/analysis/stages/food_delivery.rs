use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

const PLATFORMS: [&str; 4] = ["Grab Food", "Foodpanda", "Line Man", "Gojek"];

/// Delivery platform share and order volume.
pub struct FoodDeliveryStage;

#[async_trait]
impl AnalysisStage for FoodDeliveryStage {
    fn kind(&self) -> StageKind {
        StageKind::FoodDelivery
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        let mut rng = profile_rng(profile, self.kind());

        let mut remaining: u32 = 100;
        let mut platforms: Vec<Value> = PLATFORMS
            .iter()
            .map(|name| {
                let share = rng.random_range(5..=remaining.min(40).max(5)).min(remaining);
                remaining -= share;
                json!({ "name": name, "market_share": share })
            })
            .collect();
        platforms.push(json!({ "name": "Others", "market_share": remaining }));

        let daily: u32 = rng.random_range(10..=100);

        Ok(json!({
            "delivery_market_size": rng.random_range(1_000_000..=10_000_000),
            "platforms": platforms,
            "delivery_radius_km": round_to(rng.random_range(3.0..10.0), 1),
            "estimated_delivery_orders": {
                "daily": daily,
                "monthly": daily * 30,
            },
            "peak_hours": ["11:00-13:00", "18:00-20:00"],
            "recommended_packaging": [
                "Eco-friendly containers",
                "Spill-proof packaging",
                "Temperature-maintaining containers",
                "Branded packaging",
            ],
        }))
    }
}
