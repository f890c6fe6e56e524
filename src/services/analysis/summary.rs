use serde::Serialize;
use uuid::Uuid;

use super::domain::ProjectStatus;
use super::stages::StageKind;

/// What happened to one eligible stage during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Succeeded { report_id: i64 },
    /// Payload computed and merged, but the report row could not be written
    ReportNotPersisted { error: String },
    Failed { error: String },
    /// Premium stage requested by a free-tier owner
    TierSkipped,
}

impl StageOutcome {
    /// Whether the stage produced results, with or without a report
    pub fn computed(&self) -> bool {
        matches!(
            self,
            StageOutcome::Succeeded { .. } | StageOutcome::ReportNotPersisted { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage: StageKind,
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorSummary {
    pub run_id: Uuid,
    pub project_id: i64,
    pub status: ProjectStatus,
    pub progress: i32,
    pub stages: Vec<StageRecord>,
}

impl OrchestratorSummary {
    pub fn outcome(&self, stage: StageKind) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    pub fn succeeded(&self) -> Vec<StageKind> {
        self.stages
            .iter()
            .filter(|r| r.outcome.computed())
            .map(|r| r.stage)
            .collect()
    }

    pub fn failed(&self) -> Vec<(StageKind, &str)> {
        self.stages
            .iter()
            .filter_map(|r| match &r.outcome {
                StageOutcome::Failed { error } => Some((r.stage, error.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn tier_skipped(&self) -> Vec<StageKind> {
        self.stages
            .iter()
            .filter(|r| r.outcome == StageOutcome::TierSkipped)
            .map(|r| r.stage)
            .collect()
    }

    pub fn unpersisted(&self) -> Vec<StageKind> {
        self.stages
            .iter()
            .filter(|r| matches!(r.outcome, StageOutcome::ReportNotPersisted { .. }))
            .map(|r| r.stage)
            .collect()
    }

    pub fn report_ids(&self) -> Vec<i64> {
        self.stages
            .iter()
            .filter_map(|r| match r.outcome {
                StageOutcome::Succeeded { report_id } => Some(report_id),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> OrchestratorSummary {
        OrchestratorSummary {
            run_id: Uuid::new_v4(),
            project_id: 1,
            status: ProjectStatus::Completed,
            progress: 100,
            stages: vec![
                StageRecord {
                    stage: StageKind::MarketSizing,
                    outcome: StageOutcome::Succeeded { report_id: 5 },
                },
                StageRecord {
                    stage: StageKind::Demographics,
                    outcome: StageOutcome::ReportNotPersisted {
                        error: "disk full".to_string(),
                    },
                },
                StageRecord {
                    stage: StageKind::Location,
                    outcome: StageOutcome::Failed {
                        error: "timeout".to_string(),
                    },
                },
                StageRecord {
                    stage: StageKind::TouristAnalysis,
                    outcome: StageOutcome::TierSkipped,
                },
            ],
        }
    }

    #[test]
    fn test_accessors_partition_outcomes() {
        let s = summary();
        assert_eq!(
            s.succeeded(),
            vec![StageKind::MarketSizing, StageKind::Demographics]
        );
        assert_eq!(s.failed(), vec![(StageKind::Location, "timeout")]);
        assert_eq!(s.tier_skipped(), vec![StageKind::TouristAnalysis]);
        assert_eq!(s.unpersisted(), vec![StageKind::Demographics]);
        assert_eq!(s.report_ids(), vec![5]);
        assert!(s.outcome(StageKind::Competitors).is_none());
    }

    #[test]
    fn test_stage_records_serialize_with_outcome_tag() {
        let value = serde_json::to_value(&summary()).unwrap();
        let first = &value["stages"][0];
        assert_eq!(first["stage"], "market_sizing");
        assert_eq!(first["outcome"], "succeeded");
        assert_eq!(first["report_id"], 5);
        assert_eq!(value["stages"][3]["outcome"], "tier_skipped");
    }
}
