/// Bearer token authentication
///
/// Protected routes run behind [`jwt_auth_layer`], which validates the
/// `Authorization: Bearer <token>` header and stores an [`AuthContext`] in the
/// request extensions. Handlers read it back with `Extension<AuthContext>`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use skyroute_shared::{auth::jwt, models::user::UserType};
use uuid::Uuid;

/// Identity of the caller, taken from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub user_type: UserType,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Whether the caller may act on data owned by `owner_id`
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    /// Fails with 403 unless the caller is an admin
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Validates the bearer token and injects [`AuthContext`]
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        user_type: claims.user_type,
    });

    Ok(next.run(req).await)
}
