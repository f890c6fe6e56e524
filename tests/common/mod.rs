//! Shared fixtures for integration tests.
//!
//! Databases are in-memory SQLite with the real migrations applied. Callers
//! are identified through `FixedIdentity`, injected when the router is built.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::Router;
use parking_lot::Mutex;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use bitebase::bootstrapper::create_app;
use bitebase::db::connect_with_url;
use bitebase::middleware::IdentityProvider;
use bitebase::models::{restaurant_profile, user};
use bitebase::services::analysis::{
    AnalysisFlags, AnalysisStage, NewReport, NewResearchProject, NewRestaurantProfile,
    Orchestrator, ProjectStatus, Report, ReportType, ResearchProject, RestaurantProfile,
    RestaurantProfileChanges, StageError, StageKind, StageRegistry, User,
};
use bitebase::services::dispatcher::AnalysisDispatcher;
use bitebase::services::store::{DatabaseStore, ResearchStore, StoreError};
use bitebase::state::AppState;

/// Create an in-memory SQLite database with all migrations applied
pub async fn create_test_db() -> DatabaseConnection {
    connect_with_url("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn create_test_user(db: &DatabaseConnection, email: &str, tier: &str) -> user::Model {
    let now = chrono::Utc::now();
    user::ActiveModel {
        email: Set(email.to_string()),
        full_name: Set(Some("Test Owner".to_string())),
        subscription_tier: Set(tier.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

/// Profile with every field the stages look at
pub async fn create_test_profile(db: &DatabaseConnection, owner_id: i64) -> restaurant_profile::Model {
    insert_profile(db, owner_id, "Baan Suan", true).await
}

/// Profile with no location, cuisine or price data
pub async fn create_bare_profile(db: &DatabaseConnection, owner_id: i64) -> restaurant_profile::Model {
    insert_profile(db, owner_id, "Pop-up Stall", false).await
}

async fn insert_profile(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
    complete: bool,
) -> restaurant_profile::Model {
    let now = chrono::Utc::now();
    let some = |v: &str| complete.then(|| v.to_string());
    restaurant_profile::ActiveModel {
        owner_id: Set(owner_id),
        restaurant_name: Set(name.to_string()),
        concept_description: Set(Some("Family-style Isan cooking".to_string())),
        cuisine_type: Set(some("Thai")),
        target_audience: Set(some("Office workers")),
        price_range: Set(some("$$")),
        business_type: Set("new".to_string()),
        is_local_brand: Set(true),
        street_address: Set(some("88 Silom Road")),
        city: Set(some("Bangkok")),
        district: Set(some("Bang Rak")),
        latitude: Set(complete.then_some(13.7262)),
        longitude: Set(complete.then_some(100.5234)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test profile")
}

pub async fn create_test_project(
    store: &dyn ResearchStore,
    owner_id: i64,
    profile_id: i64,
    flags: AnalysisFlags,
) -> ResearchProject {
    store
        .create_project(NewResearchProject {
            owner_id,
            restaurant_profile_id: profile_id,
            name: "Silom launch".to_string(),
            description: Some("Feasibility study".to_string()),
            flags,
        })
        .await
        .expect("Failed to create test project")
}

pub fn flags(stages: &[&str]) -> AnalysisFlags {
    let mut flags = AnalysisFlags::default();
    for stage in stages {
        match *stage {
            "competitive_analysis" => flags.competitive_analysis = true,
            "market_sizing" => flags.market_sizing = true,
            "demographic_analysis" => flags.demographic_analysis = true,
            "location_intelligence" => flags.location_intelligence = true,
            "tourist_analysis" => flags.tourist_analysis = true,
            "local_competition" => flags.local_competition = true,
            "pricing_strategy" => flags.pricing_strategy = true,
            "food_delivery_analysis" => flags.food_delivery_analysis = true,
            other => panic!("unknown flag {other}"),
        }
    }
    flags
}

// ============================================================================
// Stage doubles
// ============================================================================

/// Always fails with a computation error
pub struct FailingStage(pub StageKind);

#[async_trait]
impl AnalysisStage for FailingStage {
    fn kind(&self) -> StageKind {
        self.0
    }

    async fn analyze(&self, _: &RestaurantProfile) -> Result<Value, StageError> {
        Err(StageError::Computation(format!("{} blew up", self.0)))
    }
}

/// Sleeps before answering
pub struct SlowStage(pub StageKind, pub Duration);

#[async_trait]
impl AnalysisStage for SlowStage {
    fn kind(&self) -> StageKind {
        self.0
    }

    async fn analyze(&self, _: &RestaurantProfile) -> Result<Value, StageError> {
        tokio::time::sleep(self.1).await;
        Ok(serde_json::json!({ "slow": true }))
    }
}

/// Signals `entered` and then blocks until `release` is notified
pub struct GatedStage {
    pub kind: StageKind,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedStage {
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl AnalysisStage for GatedStage {
    fn kind(&self) -> StageKind {
        self.kind
    }

    async fn analyze(&self, _: &RestaurantProfile) -> Result<Value, StageError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(serde_json::json!({ "gated": true }))
    }
}

// ============================================================================
// Store wrapper
// ============================================================================

/// Delegates to a real store, records every accepted project write and can
/// be told to fail report inserts or to cancel a run while inserting one.
pub struct InstrumentedStore {
    inner: Arc<dyn ResearchStore>,
    fail_reports: bool,
    cancel_on_report: Option<CancellationToken>,
    writes: Mutex<Vec<(ProjectStatus, i32)>>,
}

impl InstrumentedStore {
    pub fn new(inner: Arc<dyn ResearchStore>) -> Self {
        Self {
            inner,
            fail_reports: false,
            cancel_on_report: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Cancels `token` during the first report insert, after the row is written
    pub fn cancelling_on_report(inner: Arc<dyn ResearchStore>, token: CancellationToken) -> Self {
        Self {
            cancel_on_report: Some(token),
            ..Self::new(inner)
        }
    }

    pub fn failing_reports(inner: Arc<dyn ResearchStore>) -> Self {
        Self {
            fail_reports: true,
            ..Self::new(inner)
        }
    }

    /// (status, progress) of every successful project write, in order
    pub fn writes(&self) -> Vec<(ProjectStatus, i32)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl ResearchStore for InstrumentedStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.inner.get_user(id).await
    }

    async fn get_profile(&self, id: i64) -> Result<Option<RestaurantProfile>, StoreError> {
        self.inner.get_profile(id).await
    }

    async fn list_profiles(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<RestaurantProfile>, StoreError> {
        self.inner.list_profiles(owner_id, skip, limit).await
    }

    async fn create_profile(
        &self,
        new: NewRestaurantProfile,
    ) -> Result<RestaurantProfile, StoreError> {
        self.inner.create_profile(new).await
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: RestaurantProfileChanges,
    ) -> Result<RestaurantProfile, StoreError> {
        self.inner.update_profile(id, changes).await
    }

    async fn delete_profile(&self, id: i64) -> Result<RestaurantProfile, StoreError> {
        self.inner.delete_profile(id).await
    }

    async fn get_project(&self, id: i64) -> Result<Option<ResearchProject>, StoreError> {
        self.inner.get_project(id).await
    }

    async fn list_projects(
        &self,
        owner_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ResearchProject>, StoreError> {
        self.inner.list_projects(owner_id, skip, limit).await
    }

    async fn create_project(
        &self,
        new: NewResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        self.inner.create_project(new).await
    }

    async fn save_project(
        &self,
        project: &ResearchProject,
        expected: ProjectStatus,
    ) -> Result<ResearchProject, StoreError> {
        let saved = self.inner.save_project(project, expected).await?;
        self.writes.lock().push((saved.status, saved.progress));
        Ok(saved)
    }

    async fn update_project_details(
        &self,
        project: &ResearchProject,
    ) -> Result<ResearchProject, StoreError> {
        self.inner.update_project_details(project).await
    }

    async fn delete_project(&self, id: i64) -> Result<ResearchProject, StoreError> {
        self.inner.delete_project(id).await
    }

    async fn create_report(&self, new: NewReport) -> Result<Report, StoreError> {
        if self.fail_reports {
            return Err(StoreError::Backend("report table is read-only".to_string()));
        }
        let report = self.inner.create_report(new).await?;
        if let Some(token) = &self.cancel_on_report {
            token.cancel();
        }
        Ok(report)
    }

    async fn get_report(&self, id: i64) -> Result<Option<Report>, StoreError> {
        self.inner.get_report(id).await
    }

    async fn list_reports(&self, research_project_id: i64) -> Result<Vec<Report>, StoreError> {
        self.inner.list_reports(research_project_id).await
    }

    async fn list_owner_reports(
        &self,
        owner_id: i64,
        report_type: Option<ReportType>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Report>, StoreError> {
        self.inner
            .list_owner_reports(owner_id, report_type, skip, limit)
            .await
    }

    async fn delete_report(&self, id: i64) -> Result<Report, StoreError> {
        self.inner.delete_report(id).await
    }
}

// ============================================================================
// Orchestrator and HTTP wiring
// ============================================================================

pub fn orchestrator(store: Arc<DatabaseStore>, registry: StageRegistry) -> Orchestrator {
    Orchestrator::new(store.clone(), store, registry)
}

/// Identity provider that always answers with the same user
pub struct FixedIdentity(pub Option<i64>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn identify(&self, _: &HeaderMap) -> Option<i64> {
        self.0
    }
}

/// Store and dispatcher shared by every router a test builds
pub struct TestHarness {
    pub db: DatabaseConnection,
    pub store: Arc<DatabaseStore>,
    pub dispatcher: AnalysisDispatcher,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_registry(StageRegistry::standard()).await
    }

    pub async fn with_registry(registry: StageRegistry) -> Self {
        let db = create_test_db().await;
        let store = Arc::new(DatabaseStore::new(db.clone()));
        let dispatcher = AnalysisDispatcher::new(Arc::new(orchestrator(store.clone(), registry)), 4);
        Self {
            db,
            store,
            dispatcher,
        }
    }

    /// Router whose caller is always `user_id`
    pub fn app_as(&self, user_id: i64) -> Router {
        self.app_with_identity(FixedIdentity(Some(user_id)))
    }

    pub fn anonymous_app(&self) -> Router {
        self.app_with_identity(FixedIdentity(None))
    }

    fn app_with_identity(&self, identity: FixedIdentity) -> Router {
        let state = AppState::new(self.store.clone(), self.dispatcher.clone(), Arc::new(identity));
        create_app(state)
    }
}

/// Poll until the project leaves IN_PROGRESS or the deadline passes.
pub async fn wait_for_terminal(store: &dyn ResearchStore, project_id: i64) -> ResearchProject {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let project = store
            .get_project(project_id)
            .await
            .expect("store error")
            .expect("project vanished");
        if project.status.is_terminal() || tokio::time::Instant::now() > deadline {
            return project;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
