use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

/// Tourist density and seasonality.
pub struct TouristStage;

#[async_trait]
impl AnalysisStage for TouristStage {
    fn kind(&self) -> StageKind {
        StageKind::TouristAnalysis
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        let mut rng = profile_rng(profile, self.kind());

        Ok(json!({
            "tourist_density": round_to(rng.random_range(10.0..80.0), 1),
            "seasonal_variations": {
                "high_season": {
                    "months": ["November", "December", "January", "February"],
                    "tourist_increase_pct": round_to(rng.random_range(30.0..100.0), 1),
                },
                "low_season": {
                    "months": ["May", "June", "September", "October"],
                    "tourist_decrease_pct": round_to(rng.random_range(10.0..50.0), 1),
                },
            },
            "tourist_origins": [
                { "region": "China", "percentage": rng.random_range(10..=30) },
                { "region": "Japan", "percentage": rng.random_range(5..=20) },
                { "region": "USA", "percentage": rng.random_range(5..=20) },
                { "region": "Europe", "percentage": rng.random_range(10..=30) },
                { "region": "Other", "percentage": rng.random_range(10..=30) },
            ],
            "average_stay_days": round_to(rng.random_range(2.0..7.0), 1),
            "average_tourist_spend": rng.random_range(300..=1_500),
            "preferred_cuisines": ["Local Thai", "Seafood", "International"],
        }))
    }
}
