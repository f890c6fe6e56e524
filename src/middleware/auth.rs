//! Caller identity for API routes
//!
//! Authentication itself happens upstream. An `IdentityProvider` chosen at
//! startup names the caller, and the middleware resolves that id to an active
//! user before any handler runs.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::analysis::User;
use crate::state::AppState;

pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user-id";

/// Authenticated user stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

/// Decides who is calling. Returns `None` for anonymous requests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identify(&self, headers: &HeaderMap) -> Option<i64>;
}

/// Trusts the user id forwarded by the authenticating gateway.
#[derive(Clone, Debug)]
pub struct GatewayHeaderIdentity {
    header: HeaderName,
}

impl GatewayHeaderIdentity {
    /// Falls back to `x-authenticated-user-id` if `header` is not a valid name.
    pub fn new(header: &str) -> Self {
        let header = HeaderName::from_bytes(header.trim().to_lowercase().as_bytes())
            .unwrap_or_else(|_| {
                tracing::warn!(header, "Invalid identity header name, using default");
                HeaderName::from_static(DEFAULT_IDENTITY_HEADER)
            });
        Self { header }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for GatewayHeaderIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_HEADER)
    }
}

#[async_trait]
impl IdentityProvider for GatewayHeaderIdentity {
    async fn identify(&self, headers: &HeaderMap) -> Option<i64> {
        headers
            .get(&self.header)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }
}

/// Resolve the caller and insert `AuthenticatedUser` into the request.
///
/// Returns 401 if the caller is anonymous, unknown or inactive.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(user_id) = state.identity.identify(req.headers()).await else {
        return unauthorized_response("Missing caller identity");
    };

    let user = match state.store.get_user(user_id).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return unauthorized_response("User not found or inactive"),
        Err(e) => {
            tracing::error!(user_id, error = %e, "Failed to load caller");
            return AppError::Store(e).into_response();
        }
    };

    req.extensions_mut().insert(AuthenticatedUser(user));

    next.run(req).await
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
