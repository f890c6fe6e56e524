use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};

use super::{has_text, insufficient_data, profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

/// Population profile around the restaurant. Needs a city or district.
pub struct DemographicsStage;

#[async_trait]
impl AnalysisStage for DemographicsStage {
    fn kind(&self) -> StageKind {
        StageKind::Demographics
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        if !has_text(&profile.city) && !has_text(&profile.district) {
            return Ok(insufficient_data(self.kind(), &["city", "district"]));
        }

        let mut rng = profile_rng(profile, self.kind());
        let area = profile
            .district
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| profile.city.clone());

        Ok(json!({
            "area": area,
            "population_density": round_to(rng.random_range(1_000.0..10_000.0), 2),
            "age_distribution": {
                "18-24": rng.random_range(5..=25),
                "25-34": rng.random_range(15..=35),
                "35-44": rng.random_range(15..=30),
                "45-54": rng.random_range(10..=25),
                "55-64": rng.random_range(5..=20),
                "65+": rng.random_range(5..=15),
            },
            "income_levels": {
                "low": rng.random_range(5..=25),
                "medium": rng.random_range(30..=50),
                "high": rng.random_range(25..=45),
            },
            "education_levels": {
                "high_school": rng.random_range(10..=30),
                "bachelors": rng.random_range(30..=50),
                "masters_or_higher": rng.random_range(10..=30),
            },
            "household_types": {
                "single": rng.random_range(20..=40),
                "couples_without_children": rng.random_range(15..=35),
                "families_with_children": rng.random_range(20..=40),
                "other": rng.random_range(5..=15),
            },
            "target_audience_match_score": round_to(rng.random_range(50.0..95.0), 1),
        }))
    }
}
