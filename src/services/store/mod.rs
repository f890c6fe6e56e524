//! Persistence for users, profiles, research projects and reports.

mod database;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::analysis::domain::{
    NewReport, NewResearchProject, NewRestaurantProfile, ProjectStatus, Report, ReportType,
    ResearchProject, RestaurantProfile, RestaurantProfileChanges, SubscriptionTier, User,
};

pub use database::DatabaseStore;
pub use memory::MemoryStore;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("{0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

#[async_trait]
pub trait ResearchStore: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn get_profile(&self, id: i64) -> Result<Option<RestaurantProfile>, StoreError>;

    async fn list_profiles(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<RestaurantProfile>, StoreError>;

    /// Names are unique per owner; a duplicate is a `StoreError::Conflict`.
    async fn create_profile(&self, new: NewRestaurantProfile)
        -> Result<RestaurantProfile, StoreError>;

    /// Apply `changes` unless a COMPLETED project already references the profile.
    async fn update_profile(
        &self,
        id: i64,
        changes: RestaurantProfileChanges,
    ) -> Result<RestaurantProfile, StoreError>;

    /// Delete a profile together with its projects and their reports. Refused
    /// while any of those projects is IN_PROGRESS.
    async fn delete_profile(&self, id: i64) -> Result<RestaurantProfile, StoreError>;

    async fn get_project(&self, id: i64) -> Result<Option<ResearchProject>, StoreError>;

    async fn list_projects(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ResearchProject>, StoreError>;

    async fn create_project(&self, new: NewResearchProject)
        -> Result<ResearchProject, StoreError>;

    /// Write the lifecycle columns of `project` (status, progress, results,
    /// error detail, timestamps) if the stored row still belongs to the same
    /// owner and still has status `expected`. Name and description are left
    /// untouched.
    ///
    /// Returns `StoreError::Conflict` when the guard does not match.
    async fn save_project(
        &self,
        project: &ResearchProject,
        expected: ProjectStatus,
    ) -> Result<ResearchProject, StoreError>;

    /// Write name and description while the project is still PENDING.
    async fn update_project_details(
        &self,
        project: &ResearchProject,
    ) -> Result<ResearchProject, StoreError>;

    /// Delete a project and its reports. IN_PROGRESS projects are refused
    /// with `StoreError::Conflict`.
    async fn delete_project(&self, id: i64) -> Result<ResearchProject, StoreError>;

    async fn create_report(&self, new: NewReport) -> Result<Report, StoreError>;

    async fn get_report(&self, id: i64) -> Result<Option<Report>, StoreError>;

    async fn list_reports(&self, research_project_id: i64) -> Result<Vec<Report>, StoreError>;

    /// Every report of `owner_id`, optionally narrowed to one type
    async fn list_owner_reports(
        &self,
        owner_id: i64,
        report_type: Option<ReportType>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Report>, StoreError>;

    async fn delete_report(&self, id: i64) -> Result<Report, StoreError>;
}

/// Resolves the subscription tier that gates premium stages.
#[async_trait]
pub trait SubscriptionTiers: Send + Sync {
    async fn tier_for(&self, user_id: i64) -> Result<SubscriptionTier, StoreError>;
}

pub(crate) fn stale_status(project_id: i64, current: ProjectStatus, expected: ProjectStatus) -> StoreError {
    StoreError::Conflict(format!(
        "research project {project_id} is {current}, expected {expected}"
    ))
}

pub(crate) fn duplicate_profile(name: &str) -> StoreError {
    StoreError::Conflict(format!(
        "a restaurant profile named {name:?} already exists"
    ))
}

pub(crate) fn profile_locked(profile_id: i64) -> StoreError {
    StoreError::Conflict(format!(
        "restaurant profile {profile_id} is referenced by a completed research project"
    ))
}

pub(crate) fn profile_busy(profile_id: i64) -> StoreError {
    StoreError::Conflict(format!(
        "restaurant profile {profile_id} has a research project being analyzed"
    ))
}
