use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::schemas::{CreateRestaurantProfile, ListParams, UpdateRestaurantProfile};
use crate::services::analysis::RestaurantProfile;
use crate::state::AppState;

/// Create restaurant profile routes
pub fn restaurant_profiles_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/{profile_id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .with_state(state)
}

async fn owned_profile(
    state: &AppState,
    profile_id: i64,
    user_id: i64,
) -> Result<RestaurantProfile> {
    let profile = state
        .store
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant profile not found".to_string()))?;

    if profile.owner_id != user_id {
        return Err(AppError::Forbidden("Not enough permissions".to_string()));
    }
    Ok(profile)
}

async fn list_profiles(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RestaurantProfile>>> {
    let profiles = state
        .store
        .list_profiles(auth_user.0.id, params.skip(), params.limit())
        .await?;
    Ok(Json(profiles))
}

async fn create_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRestaurantProfile>,
) -> Result<(StatusCode, Json<RestaurantProfile>)> {
    request.validate()?;

    let profile = state
        .store
        .create_profile(request.into_new(auth_user.0.id))
        .await?;

    tracing::info!(
        profile_id = profile.id,
        owner_id = profile.owner_id,
        "Restaurant profile created"
    );
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(profile_id): Path<i64>,
) -> Result<Json<RestaurantProfile>> {
    Ok(Json(owned_profile(&state, profile_id, auth_user.0.id).await?))
}

/// Refused with 409 once a completed project has analyzed this profile.
async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateRestaurantProfile>,
) -> Result<Json<RestaurantProfile>> {
    request.validate()?;

    owned_profile(&state, profile_id, auth_user.0.id).await?;
    let updated = state
        .store
        .update_profile(profile_id, request.into())
        .await?;
    Ok(Json(updated))
}

async fn delete_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(profile_id): Path<i64>,
) -> Result<Json<RestaurantProfile>> {
    owned_profile(&state, profile_id, auth_user.0.id).await?;
    let deleted = state.store.delete_profile(profile_id).await?;

    tracing::info!(profile_id, "Restaurant profile deleted");
    Ok(Json(deleted))
}
