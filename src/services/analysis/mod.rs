//! Research-project analysis: domain model, lifecycle, stages and the
//! orchestrator that ties them together.

pub mod domain;
pub mod lifecycle;
pub mod materializer;
pub mod orchestrator;
pub mod stages;
pub mod summary;

use thiserror::Error;

use crate::services::store::StoreError;

pub use domain::{
    AnalysisFlags, NewReport, NewResearchProject, NewRestaurantProfile, ProjectStatus, Report,
    ReportFormat, ReportType, ResearchProject, RestaurantProfile, RestaurantProfileChanges,
    ResultsMap, SubscriptionTier, User,
};
pub use lifecycle::{TransitionError, COMPLETE_PROGRESS, START_PROGRESS};
pub use materializer::ReportMaterializer;
pub use orchestrator::{Orchestrator, PreparedRun};
pub use stages::{AnalysisStage, StageError, StageKind, StageRegistry};
pub use summary::{OrchestratorSummary, StageOutcome, StageRecord};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    NotFound(String),

    #[error("user {user_id} does not own research project {project_id}")]
    Ownership { project_id: i64, user_id: i64 },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("analysis run was cancelled")]
    Cancelled,

    #[error("analysis dispatcher is shutting down")]
    ShuttingDown,

    #[error(transparent)]
    Store(#[from] StoreError),
}
