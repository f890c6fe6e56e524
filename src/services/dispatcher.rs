//! Background runner for analysis jobs
//!
//! Each accepted analysis request becomes one task on a shared `TaskTracker`.
//! A semaphore bounds how many projects are analyzed at once, and every run
//! holds a child of the dispatcher's shutdown token.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::services::analysis::{AnalysisError, Orchestrator, OrchestratorSummary, ResearchProject};

/// Handle returned once a run has been accepted and the project started
pub struct SubmittedRun {
    pub run_id: Uuid,
    /// Project as persisted by the start transition (IN_PROGRESS, progress 10)
    pub project: ResearchProject,
    pub handle: JoinHandle<Option<OrchestratorSummary>>,
}

/// Removes a run's cancel token when its task ends, including by panic.
struct RunEntry {
    running: Arc<Mutex<HashMap<i64, CancellationToken>>>,
    project_id: i64,
}

impl Drop for RunEntry {
    fn drop(&mut self) {
        self.running.lock().remove(&self.project_id);
    }
}

#[derive(Clone)]
pub struct AnalysisDispatcher {
    orchestrator: Arc<Orchestrator>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    running: Arc<Mutex<HashMap<i64, CancellationToken>>>,
}

impl AnalysisDispatcher {
    pub fn new(orchestrator: Arc<Orchestrator>, max_concurrent_runs: usize) -> Self {
        Self {
            orchestrator,
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start the project synchronously, then run its stages in the background.
    ///
    /// Ownership, lookup and transition errors are returned to the caller
    /// before anything is spawned.
    pub async fn submit(
        &self,
        project_id: i64,
        owner_id: i64,
    ) -> Result<SubmittedRun, AnalysisError> {
        if self.shutdown.is_cancelled() {
            return Err(AnalysisError::ShuttingDown);
        }

        let run = self.orchestrator.begin(project_id, owner_id).await?;
        let run_id = run.run_id();
        let project = run.project().clone();

        let cancel = self.shutdown.child_token();
        self.running.lock().insert(project_id, cancel.clone());

        let orchestrator = self.orchestrator.clone();
        let permits = self.permits.clone();
        let entry = RunEntry {
            running: self.running.clone(),
            project_id,
        };

        let handle = self.tracker.spawn(async move {
            let _entry = entry;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!(%run_id, project_id, "Analysis run cancelled before it was scheduled");
                    None
                }
                permit = permits.acquire_owned() => match permit {
                    Ok(_permit) => match orchestrator.execute(run, &cancel).await {
                        Ok(summary) => {
                            tracing::info!(
                                %run_id,
                                project_id,
                                status = %summary.status,
                                failed = summary.failed().len(),
                                skipped = summary.tier_skipped().len(),
                                "Analysis run finished"
                            );
                            Some(summary)
                        }
                        Err(AnalysisError::Cancelled) => None,
                        Err(e) => {
                            tracing::error!(%run_id, project_id, error = %e, "Analysis run aborted");
                            None
                        }
                    },
                    Err(e) => {
                        tracing::error!(%run_id, project_id, error = %e, "Analysis run could not acquire a slot");
                        None
                    }
                },
            }
        });

        Ok(SubmittedRun {
            run_id,
            project,
            handle,
        })
    }

    /// Cancel the run for `project_id`. Returns false if none is active.
    pub fn cancel(&self, project_id: i64) -> bool {
        match self.running.lock().get(&project_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn active_runs(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel all runs, stop accepting new ones and wait for in-flight tasks.
    pub async fn shutdown(&self) {
        tracing::info!(active = self.tracker.len(), "Shutting down analysis dispatcher");
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
