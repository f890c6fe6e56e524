//! Analysis stages.
//!
//! Each stage is a stateless strategy turning a restaurant profile into a JSON
//! payload. Stages never touch storage and know nothing about subscription
//! tiers; the orchestrator owns both concerns.

mod competitors;
mod demographics;
mod food_delivery;
mod location;
mod market_sizing;
mod pricing;
mod tourist;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::domain::{AnalysisFlags, ReportType, RestaurantProfile};

pub use competitors::CompetitorStage;
pub use demographics::DemographicsStage;
pub use food_delivery::FoodDeliveryStage;
pub use location::LocationStage;
pub use market_sizing::MarketSizingStage;
pub use pricing::PricingStrategyStage;
pub use tourist::TouristStage;

/// The analyses a run can perform, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    MarketSizing,
    Demographics,
    Competitors,
    Location,
    TouristAnalysis,
    PricingStrategy,
    FoodDelivery,
}

impl StageKind {
    pub const ALL: [StageKind; 7] = [
        StageKind::MarketSizing,
        StageKind::Demographics,
        StageKind::Competitors,
        StageKind::Location,
        StageKind::TouristAnalysis,
        StageKind::PricingStrategy,
        StageKind::FoodDelivery,
    ];

    /// Key under which the stage payload is stored in project results
    pub fn key(self) -> &'static str {
        match self {
            StageKind::MarketSizing => "market_sizing",
            StageKind::Demographics => "demographics",
            StageKind::Competitors => "competitors",
            StageKind::Location => "location",
            StageKind::TouristAnalysis => "tourist_analysis",
            StageKind::PricingStrategy => "pricing_strategy",
            StageKind::FoodDelivery => "food_delivery",
        }
    }

    pub fn report_type(self) -> ReportType {
        match self {
            StageKind::MarketSizing => ReportType::MarketAnalysis,
            StageKind::Demographics => ReportType::DemographicAnalysis,
            StageKind::Competitors => ReportType::CompetitiveAnalysis,
            StageKind::Location => ReportType::LocationIntelligence,
            StageKind::TouristAnalysis => ReportType::TouristAnalysis,
            StageKind::PricingStrategy => ReportType::PricingStrategy,
            StageKind::FoodDelivery => ReportType::FoodDeliveryAnalysis,
        }
    }

    /// Premium stages need a pro or enterprise owner.
    pub fn is_premium(self) -> bool {
        matches!(
            self,
            StageKind::TouristAnalysis | StageKind::PricingStrategy | StageKind::FoodDelivery
        )
    }

    /// Progress recorded once the stage has produced its payload
    pub fn checkpoint(self) -> i32 {
        match self {
            StageKind::MarketSizing => 20,
            StageKind::Demographics => 40,
            StageKind::Competitors => 60,
            StageKind::Location => 80,
            StageKind::TouristAnalysis | StageKind::PricingStrategy | StageKind::FoodDelivery => 90,
        }
    }

    pub fn is_requested(self, flags: &AnalysisFlags) -> bool {
        match self {
            StageKind::MarketSizing => flags.market_sizing,
            StageKind::Demographics => flags.demographic_analysis,
            StageKind::Competitors => flags.competitive_analysis || flags.local_competition,
            StageKind::Location => flags.location_intelligence,
            StageKind::TouristAnalysis => flags.tourist_analysis,
            StageKind::PricingStrategy => flags.pricing_strategy,
            StageKind::FoodDelivery => flags.food_delivery_analysis,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StageError {
    #[error("analysis failed: {0}")]
    Computation(String),

    #[error("data source unavailable: {0}")]
    Upstream(String),

    #[error("stage exceeded its {0:?} time limit")]
    TimedOut(Duration),

    #[error("no analysis registered for stage {0}")]
    Unregistered(StageKind),
}

#[async_trait]
pub trait AnalysisStage: Send + Sync {
    fn kind(&self) -> StageKind;

    async fn analyze(&self, profile: &RestaurantProfile) -> Result<Value, StageError>;
}

/// Stage implementations keyed by kind
#[derive(Clone, Default)]
pub struct StageRegistry {
    stages: HashMap<StageKind, Arc<dyn AnalysisStage>>,
}

impl StageRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in estimators for every stage
    pub fn standard() -> Self {
        Self::empty()
            .with_stage(Arc::new(MarketSizingStage))
            .with_stage(Arc::new(DemographicsStage))
            .with_stage(Arc::new(CompetitorStage))
            .with_stage(Arc::new(LocationStage))
            .with_stage(Arc::new(TouristStage))
            .with_stage(Arc::new(PricingStrategyStage))
            .with_stage(Arc::new(FoodDeliveryStage))
    }

    /// Registers `stage`, replacing any stage of the same kind.
    pub fn with_stage(mut self, stage: Arc<dyn AnalysisStage>) -> Self {
        self.stages.insert(stage.kind(), stage);
        self
    }

    pub fn get(&self, kind: StageKind) -> Option<&Arc<dyn AnalysisStage>> {
        self.stages.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// 64-bit FNV-1a over the profile identity, coordinates and stage key.
pub(crate) fn profile_seed(profile: &RestaurantProfile, kind: StageKind) -> u64 {
    let mut seed = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for byte in bytes {
            seed ^= u64::from(*byte);
            seed = seed.wrapping_mul(FNV_PRIME);
        }
    };

    feed(&profile.id.to_le_bytes());
    feed(profile.restaurant_name.as_bytes());
    feed(&[0]);
    for coordinate in [profile.latitude, profile.longitude] {
        match coordinate {
            Some(value) => {
                feed(&[1]);
                feed(&value.to_bits().to_le_bytes());
            }
            None => feed(&[0]),
        }
    }
    feed(kind.key().as_bytes());
    seed
}

/// RNG seeded from the profile identity so repeated runs agree.
pub(crate) fn profile_rng(profile: &RestaurantProfile, kind: StageKind) -> StdRng {
    StdRng::seed_from_u64(profile_seed(profile, kind))
}

pub(crate) fn insufficient_data(kind: StageKind, missing: &[&str]) -> Value {
    json!({
        "insufficient_data": true,
        "stage": kind.key(),
        "missing_fields": missing,
    })
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Present and not blank
pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
