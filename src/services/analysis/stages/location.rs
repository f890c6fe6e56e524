use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Map, Value};

use super::{insufficient_data, profile_rng, round_to, AnalysisStage, StageError, StageKind};
use crate::services::analysis::domain::RestaurantProfile;

const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const ATTRACTIONS: [&str; 4] = ["Shopping Mall", "Office Building", "Park", "Hotel"];

/// Foot traffic and accessibility at the restaurant's coordinates.
pub struct LocationStage;

#[async_trait]
impl AnalysisStage for LocationStage {
    fn kind(&self) -> StageKind {
        StageKind::Location
    }

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError> {
        let Some((latitude, longitude)) = profile.coordinates() else {
            let mut missing = Vec::new();
            if profile.latitude.is_none() {
                missing.push("latitude");
            }
            if profile.longitude.is_none() {
                missing.push("longitude");
            }
            return Ok(insufficient_data(self.kind(), &missing));
        };

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(StageError::Computation(format!(
                "coordinates ({latitude}, {longitude}) are out of range"
            )));
        }

        let mut rng = profile_rng(profile, self.kind());

        let mut foot_traffic = Map::new();
        for day in DAYS {
            foot_traffic.insert(
                day.to_string(),
                json!({
                    "morning": rng.random_range(50..=500),
                    "afternoon": rng.random_range(100..=800),
                    "evening": rng.random_range(200..=1_000),
                    "night": rng.random_range(50..=600),
                }),
            );
        }

        let nearby: Vec<Value> = ATTRACTIONS
            .iter()
            .map(|name| json!({ "name": name, "distance_km": round_to(rng.random_range(0.1..2.0), 1) }))
            .collect();

        Ok(json!({
            "coordinates": { "latitude": latitude, "longitude": longitude },
            "location_score": round_to(rng.random_range(50.0..95.0), 1),
            "foot_traffic": foot_traffic,
            "nearby_attractions": nearby,
            "public_transport_access": {
                "bus_stops": rng.random_range(1..=5),
                "train_stations": rng.random_range(0..=2),
                "distance_to_nearest_station_km": round_to(rng.random_range(0.1..2.0), 1),
            },
            "parking_availability": (["limited", "moderate", "abundant"].choose(&mut rng).copied()),
            "visibility_score": round_to(rng.random_range(50.0..95.0), 1),
        }))
    }
}
