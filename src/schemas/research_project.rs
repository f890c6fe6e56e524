use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::analysis::{AnalysisFlags, ResearchProject};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResearchProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub restaurant_profile_id: i64,
    #[serde(flatten)]
    pub flags: AnalysisFlags,
}

/// Only name and description can change, and only while the project is pending.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResearchProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl ListParams {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 500;

    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Body of a 202 response to an analyze request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisAccepted {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub project: ResearchProject,
}
