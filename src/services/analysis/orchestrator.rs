//! Drives one research project through its analysis stages.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::domain::{ProjectStatus, ResearchProject, RestaurantProfile, ResultsMap, SubscriptionTier};
use super::lifecycle::TransitionError;
use super::materializer::ReportMaterializer;
use super::stages::{StageError, StageKind, StageRegistry};
use super::summary::{OrchestratorSummary, StageOutcome, StageRecord};
use super::AnalysisError;
use crate::services::store::{ResearchStore, StoreError, SubscriptionTiers};

pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// A project that has been validated and moved to IN_PROGRESS, ready for its stages.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    run_id: Uuid,
    project: ResearchProject,
    profile: RestaurantProfile,
    tier: SubscriptionTier,
}

impl PreparedRun {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn project(&self) -> &ResearchProject {
        &self.project
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }
}

pub struct Orchestrator {
    store: Arc<dyn ResearchStore>,
    tiers: Arc<dyn SubscriptionTiers>,
    stages: StageRegistry,
    materializer: ReportMaterializer,
    stage_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ResearchStore>,
        tiers: Arc<dyn SubscriptionTiers>,
        stages: StageRegistry,
    ) -> Self {
        Self {
            materializer: ReportMaterializer::new(store.clone()),
            store,
            tiers,
            stages,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Validate and run a project to completion in the current task.
    pub async fn run(
        &self,
        project_id: i64,
        owner_id: i64,
    ) -> Result<OrchestratorSummary, AnalysisError> {
        let run = self.begin(project_id, owner_id).await?;
        self.execute(run, &CancellationToken::new()).await
    }

    /// Ownership and lookup checks followed by the PENDING → IN_PROGRESS
    /// transition. Nothing is written unless every check passes.
    pub async fn begin(&self, project_id: i64, owner_id: i64) -> Result<PreparedRun, AnalysisError> {
        let mut project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| AnalysisError::NotFound(format!("Research project {project_id} not found")))?;

        if project.owner_id != owner_id {
            tracing::warn!(project_id, owner_id, "Analysis requested by non-owner");
            return Err(AnalysisError::Ownership {
                project_id,
                user_id: owner_id,
            });
        }

        let profile_id = project.restaurant_profile_id;
        let profile = self.store.get_profile(profile_id).await?.ok_or_else(|| {
            AnalysisError::NotFound(format!("Restaurant profile {profile_id} not found"))
        })?;

        let tier = self.tiers.tier_for(owner_id).await?;

        project.start()?;
        let project = self
            .store
            .save_project(&project, ProjectStatus::Pending)
            .await
            .map_err(|e| stale_write(e, ProjectStatus::Pending))?;

        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, project_id, ?tier, "Research project analysis started");

        Ok(PreparedRun {
            run_id,
            project,
            profile,
            tier,
        })
    }

    /// Run the eligible stages in order and record the final status.
    ///
    /// On cancellation the project is left IN_PROGRESS at its last checkpoint.
    pub async fn execute(
        &self,
        run: PreparedRun,
        cancel: &CancellationToken,
    ) -> Result<OrchestratorSummary, AnalysisError> {
        let span = tracing::info_span!("analysis_run", run_id = %run.run_id, project_id = run.project.id);
        self.execute_stages(run, cancel).instrument(span).await
    }

    async fn execute_stages(
        &self,
        run: PreparedRun,
        cancel: &CancellationToken,
    ) -> Result<OrchestratorSummary, AnalysisError> {
        let PreparedRun {
            run_id,
            mut project,
            profile,
            tier,
        } = run;
        let mut records = Vec::new();
        let mut eligible = 0usize;

        for kind in StageKind::ALL {
            if !kind.is_requested(&project.flags) {
                continue;
            }
            if kind.is_premium() && !tier.unlocks_premium() {
                tracing::info!(stage = %kind, "Premium stage skipped for subscription tier");
                records.push(StageRecord {
                    stage: kind,
                    outcome: StageOutcome::TierSkipped,
                });
                continue;
            }
            eligible += 1;

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&project)),
                result = self.invoke(kind, &profile) => result,
            };

            let outcome = match result {
                Ok(payload) => {
                    if cancel.is_cancelled() {
                        return Err(cancelled(&project));
                    }
                    let outcome = match self.materializer.materialize(&project, kind, &payload).await {
                        Ok(report) => StageOutcome::Succeeded {
                            report_id: report.id,
                        },
                        Err(e) => {
                            tracing::warn!(stage = %kind, error = %e, "Stage report could not be persisted");
                            StageOutcome::ReportNotPersisted {
                                error: e.to_string(),
                            }
                        }
                    };

                    // A written report row is always followed by its advance.
                    let mut partial = ResultsMap::new();
                    partial.insert(kind.key().to_string(), payload);
                    project.advance(kind.checkpoint(), partial)?;
                    project = self.persist(&project).await?;
                    tracing::info!(stage = %kind, progress = project.progress, "Stage completed");
                    if cancel.is_cancelled() {
                        return Err(cancelled(&project));
                    }
                    outcome
                }
                Err(e) => {
                    tracing::warn!(stage = %kind, error = %e, "Stage failed");
                    StageOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            records.push(StageRecord {
                stage: kind,
                outcome,
            });
        }

        let any_computed = records.iter().any(|r| r.outcome.computed());
        if eligible > 0 && !any_computed {
            let detail = records
                .iter()
                .filter_map(|r| match &r.outcome {
                    StageOutcome::Failed { error } => Some(format!("{}: {}", r.stage, error)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("; ");
            project.fail(format!("All analysis stages failed ({detail})"))?;
        } else {
            project.complete(ResultsMap::new())?;
        }

        if cancel.is_cancelled() {
            return Err(cancelled(&project));
        }
        project = self.persist(&project).await?;

        match project.status {
            ProjectStatus::Errored => tracing::warn!(
                error = project.error_detail.as_deref().unwrap_or_default(),
                "Research project analysis errored"
            ),
            _ => tracing::info!(stages = records.len(), "Research project analysis completed"),
        }

        Ok(OrchestratorSummary {
            run_id,
            project_id: project.id,
            status: project.status,
            progress: project.progress,
            stages: records,
        })
    }

    async fn invoke(&self, kind: StageKind, profile: &RestaurantProfile) -> Result<Value, StageError> {
        let stage = self.stages.get(kind).ok_or(StageError::Unregistered(kind))?;
        match tokio::time::timeout(self.stage_timeout, stage.analyze(profile)).await {
            Ok(result) => result,
            Err(_) => Err(StageError::TimedOut(self.stage_timeout)),
        }
    }

    async fn persist(&self, project: &ResearchProject) -> Result<ResearchProject, AnalysisError> {
        self.store
            .save_project(project, ProjectStatus::InProgress)
            .await
            .map_err(|e| stale_write(e, ProjectStatus::InProgress))
    }
}

fn stale_write(err: StoreError, expected: ProjectStatus) -> AnalysisError {
    match err {
        StoreError::Conflict(detail) => {
            tracing::warn!(%detail, "Research project changed underneath the run");
            AnalysisError::InvalidTransition(TransitionError::StaleWrite { expected })
        }
        other => AnalysisError::Store(other),
    }
}

fn cancelled(project: &ResearchProject) -> AnalysisError {
    tracing::warn!(progress = project.progress, "Analysis run cancelled");
    AnalysisError::Cancelled
}
