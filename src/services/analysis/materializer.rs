use std::sync::Arc;

use serde_json::Value;

use super::domain::{NewReport, Report, ReportFormat, ReportType, ResearchProject};
use super::stages::StageKind;
use crate::services::store::{ResearchStore, StoreError};

/// Persists stage payloads as reports. Always inserts; reports are append-only.
#[derive(Clone)]
pub struct ReportMaterializer {
    store: Arc<dyn ResearchStore>,
}

impl ReportMaterializer {
    pub fn new(store: Arc<dyn ResearchStore>) -> Self {
        Self { store }
    }

    pub async fn materialize(
        &self,
        project: &ResearchProject,
        stage: StageKind,
        payload: &Value,
    ) -> Result<Report, StoreError> {
        let report_type = stage.report_type();
        let report = self
            .store
            .create_report(NewReport {
                owner_id: project.owner_id,
                research_project_id: project.id,
                name: report_name(report_type),
                report_type,
                format: ReportFormat::Json,
                data: Some(payload.clone()),
            })
            .await?;

        tracing::debug!(
            project_id = project.id,
            report_id = report.id,
            stage = %stage,
            "Report materialized"
        );
        Ok(report)
    }
}

/// "market_analysis" -> "Market Analysis Report"
pub fn report_name(report_type: ReportType) -> String {
    let title: Vec<String> = report_type
        .as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("{} Report", title.join(" "))
}
