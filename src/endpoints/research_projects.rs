use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::schemas::{AnalysisAccepted, CreateResearchProject, ListParams, UpdateResearchProject};
use crate::services::analysis::{NewResearchProject, Report, ResearchProject};
use crate::state::AppState;

/// Create research project routes
pub fn research_projects_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{project_id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/{project_id}/analyze", post(analyze_project))
        .route("/{project_id}/reports", get(list_project_reports))
        .with_state(state)
}

/// Load a project the caller owns. 404 if missing, 403 if someone else's.
pub(crate) async fn owned_project(
    state: &AppState,
    project_id: i64,
    user_id: i64,
) -> Result<ResearchProject> {
    let project = state
        .store
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Research project not found".to_string()))?;

    if project.owner_id != user_id {
        return Err(AppError::Forbidden("Not enough permissions".to_string()));
    }
    Ok(project)
}

async fn list_projects(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ResearchProject>>> {
    let projects = state
        .store
        .list_projects(auth_user.0.id, params.skip(), params.limit())
        .await?;
    Ok(Json(projects))
}

async fn create_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateResearchProject>,
) -> Result<(StatusCode, Json<ResearchProject>)> {
    request.validate()?;

    let profile = state
        .store
        .get_profile(request.restaurant_profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant profile not found".to_string()))?;
    if profile.owner_id != auth_user.0.id {
        return Err(AppError::Forbidden("Not enough permissions".to_string()));
    }

    let project = state
        .store
        .create_project(NewResearchProject {
            owner_id: auth_user.0.id,
            restaurant_profile_id: profile.id,
            name: request.name,
            description: request.description,
            flags: request.flags,
        })
        .await?;

    tracing::info!(
        project_id = project.id,
        owner_id = project.owner_id,
        "Research project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(project_id): Path<i64>,
) -> Result<Json<ResearchProject>> {
    Ok(Json(owned_project(&state, project_id, auth_user.0.id).await?))
}

async fn update_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(project_id): Path<i64>,
    Json(request): Json<UpdateResearchProject>,
) -> Result<Json<ResearchProject>> {
    request.validate()?;

    let mut project = owned_project(&state, project_id, auth_user.0.id).await?;
    project
        .ensure_editable()
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    if let Some(name) = request.name {
        project.name = name;
    }
    if request.description.is_some() {
        project.description = request.description;
    }
    project.updated_at = Utc::now();

    let saved = state.store.update_project_details(&project).await?;
    Ok(Json(saved))
}

async fn delete_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(project_id): Path<i64>,
) -> Result<Json<ResearchProject>> {
    owned_project(&state, project_id, auth_user.0.id).await?;
    let deleted = state.store.delete_project(project_id).await?;

    tracing::info!(project_id, "Research project deleted");
    Ok(Json(deleted))
}

/// Start analysis. The stages run in the background; poll the project for the outcome.
async fn analyze_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(project_id): Path<i64>,
) -> Result<(StatusCode, Json<AnalysisAccepted>)> {
    let submitted = state.dispatcher.submit(project_id, auth_user.0.id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AnalysisAccepted {
            run_id: submitted.run_id,
            project: submitted.project,
        }),
    ))
}

async fn list_project_reports(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Report>>> {
    owned_project(&state, project_id, auth_user.0.id).await?;
    Ok(Json(state.store.list_reports(project_id).await?))
}
