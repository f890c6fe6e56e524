//! Project lifecycle: PENDING → IN_PROGRESS → COMPLETED | ERRORED.
//!
//! Transitions only mutate the in-memory value. Persisting them is the
//! store's job and is compare-and-set on the status the transition started
//! from.

use chrono::Utc;
use thiserror::Error;

use super::domain::{ProjectStatus, ResearchProject, ResultsMap};

/// Progress recorded when a run starts
pub const START_PROGRESS: i32 = 10;
/// Progress recorded on completion
pub const COMPLETE_PROGRESS: i32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("research project is {status}; only pending projects can be analyzed")]
    NotPending { status: ProjectStatus },

    #[error("research project is {status}; expected in_progress")]
    NotInProgress { status: ProjectStatus },

    #[error("research project is {status} and can no longer be edited")]
    Locked { status: ProjectStatus },

    #[error("progress cannot move backwards from {current} to {requested}")]
    ProgressRegression { current: i32, requested: i32 },

    #[error("progress {0} is outside 0..=100")]
    ProgressOutOfRange(i32),

    #[error("research project is no longer {expected}")]
    StaleWrite { expected: ProjectStatus },
}

impl ResearchProject {
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.status != ProjectStatus::Pending {
            return Err(TransitionError::NotPending {
                status: self.status,
            });
        }
        self.status = ProjectStatus::InProgress;
        self.progress = START_PROGRESS;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move progress to a checkpoint and merge stage results key-wise.
    pub fn advance(&mut self, progress: i32, partial: ResultsMap) -> Result<(), TransitionError> {
        self.ensure_in_progress()?;
        if !(0..=COMPLETE_PROGRESS).contains(&progress) {
            return Err(TransitionError::ProgressOutOfRange(progress));
        }
        if progress < self.progress {
            return Err(TransitionError::ProgressRegression {
                current: self.progress,
                requested: progress,
            });
        }
        self.progress = progress;
        self.results.extend(partial);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn complete(&mut self, final_results: ResultsMap) -> Result<(), TransitionError> {
        self.ensure_in_progress()?;
        let now = Utc::now();
        self.results.extend(final_results);
        self.status = ProjectStatus::Completed;
        self.progress = COMPLETE_PROGRESS;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Progress and results are left as they were.
    pub fn fail(&mut self, error_summary: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_in_progress()?;
        self.status = ProjectStatus::Errored;
        self.error_detail = Some(error_summary.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Users may only rename or re-describe a project before it is analyzed.
    pub fn ensure_editable(&self) -> Result<(), TransitionError> {
        match self.status {
            ProjectStatus::Pending => Ok(()),
            status => Err(TransitionError::Locked { status }),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), TransitionError> {
        match self.status {
            ProjectStatus::InProgress => Ok(()),
            status => Err(TransitionError::NotInProgress { status }),
        }
    }
}
