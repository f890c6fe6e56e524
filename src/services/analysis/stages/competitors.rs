use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

use super::{has_text, insufficient_data, profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

const NEIGHBOUR_CUISINES: [&str; 6] = ["Thai", "Italian", "Japanese", "American", "Chinese", "Indian"];

const OPPORTUNITIES: [&str; 5] = [
    "Unique menu offerings",
    "Better customer service",
    "More convenient location",
    "Higher quality ingredients",
    "Better ambiance and experience",
];

/// Nearby competitor landscape. Needs a cuisine type.
///
/// Serves both the `competitive_analysis` and `local_competition` flags.
pub struct CompetitorStage;

#[async_trait]
impl AnalysisStage for CompetitorStage {
    fn kind(&self) -> StageKind {
        StageKind::Competitors
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        if !has_text(&profile.cuisine_type) {
            return Ok(insufficient_data(self.kind(), &["cuisine_type"]));
        }

        let mut rng = profile_rng(profile, self.kind());
        let count: usize = rng.random_range(3..=12);
        let mut rating_sum = 0.0;
        let mut same_cuisine = 0;
        let own_cuisine = profile.cuisine_type.as_deref().unwrap_or_default();

        let competitors: Vec<Value> = (1..=count)
            .map(|i| {
                let rating = round_to(rng.random_range(3.0..4.8), 1);
                rating_sum += rating;
                let cuisine = NEIGHBOUR_CUISINES.choose(&mut rng).copied().unwrap_or("Thai");
                if cuisine.eq_ignore_ascii_case(own_cuisine) {
                    same_cuisine += 1;
                }
                json!({
                    "name": format!("Competitor {i}"),
                    "distance_km": round_to(rng.random_range(0.1..2.0), 1),
                    "rating": rating,
                    "price_level": rng.random_range(1..=4),
                    "cuisine": cuisine,
                    "estimated_monthly_customers": rng.random_range(500..=5_000),
                })
            })
            .collect();

        Ok(json!({
            "total_competitors": count,
            "same_cuisine_competitors": same_cuisine,
            "competitors": competitors,
            "average_competitor_rating": round_to(rating_sum / count as f64, 1),
            "competitive_density": round_to(count as f64 / rng.random_range(1.0..5.0), 2),
            "market_saturation": round_to(rng.random_range(30.0..90.0), 1),
            "competitive_advantage_opportunities": OPPORTUNITIES,
        }))
    }
}
