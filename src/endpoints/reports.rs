use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::endpoints::research_projects::owned_project;
use crate::schemas::{ListParams, ReportProjectFilter};
use crate::services::analysis::{Report, ReportType};
use crate::state::AppState;

/// Create report routes
pub fn reports_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_reports))
        .route("/by-type/{report_type}", get(list_reports_by_type))
        .route("/{report_id}", get(get_report).delete(delete_report))
        .with_state(state)
}

async fn owned_report(state: &AppState, report_id: i64, user_id: i64) -> Result<Report> {
    let report = state
        .store
        .get_report(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    if report.owner_id != user_id {
        return Err(AppError::Forbidden("Not enough permissions".to_string()));
    }
    Ok(report)
}

/// Every report the caller owns, across all projects
async fn list_reports(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Report>>> {
    let reports = state
        .store
        .list_owner_reports(auth_user.0.id, None, params.skip(), params.limit())
        .await?;
    Ok(Json(reports))
}

async fn list_reports_by_type(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(report_type): Path<ReportType>,
    Query(filter): Query<ReportProjectFilter>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Report>>> {
    let Some(project_id) = filter.research_project_id else {
        let reports = state
            .store
            .list_owner_reports(
                auth_user.0.id,
                Some(report_type),
                params.skip(),
                params.limit(),
            )
            .await?;
        return Ok(Json(reports));
    };

    owned_project(&state, project_id, auth_user.0.id).await?;
    let reports = state
        .store
        .list_reports(project_id)
        .await?
        .into_iter()
        .filter(|r| r.report_type == report_type)
        .skip(params.skip() as usize)
        .take(params.limit() as usize)
        .collect();
    Ok(Json(reports))
}

async fn get_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(report_id): Path<i64>,
) -> Result<Json<Report>> {
    Ok(Json(owned_report(&state, report_id, auth_user.0.id).await?))
}

async fn delete_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(report_id): Path<i64>,
) -> Result<Json<Report>> {
    owned_report(&state, report_id, auth_user.0.id).await?;
    let deleted = state.store.delete_report(report_id).await?;

    tracing::info!(report_id, "Report deleted");
    Ok(Json(deleted))
}
