/// Account lookup and operator approval
///
/// # Endpoints
///
/// - `POST /approve-operator` - Admin approves a pending operator
/// - `POST /reject-operator` - Admin rejects an operator
/// - `GET /fetch-user/:id` - Own account, or any account for admins
/// - `GET /fetch-users` - Every account (admin only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    middleware::auth::AuthContext,
};
use axum::{
    extract::State,
    Extension, Json,
};
use serde::Deserialize;
use skyroute_shared::models::user::{Approval, User};
use tracing::info;
use uuid::Uuid;

/// Body of the approve/reject endpoints
#[derive(Debug, Deserialize)]
pub struct OperatorRequest {
    /// Operator account to update
    pub id: Uuid,
}

pub async fn approve_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<OperatorRequest>,
) -> ApiResult<Json<User>> {
    set_approval(&state, &auth, req.id, Approval::Approved).await
}

pub async fn reject_operator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<OperatorRequest>,
) -> ApiResult<Json<User>> {
    set_approval(&state, &auth, req.id, Approval::Rejected).await
}

/// Applies an approval decision
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No account has this ID
/// - `400 Bad Request`: The account is not an operator
async fn set_approval(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    approval: Approval,
) -> ApiResult<Json<User>> {
    auth.require_admin()?;

    if let Some(user) = User::set_operator_approval(&state.db, id, approval).await? {
        info!(
            operator_id = %user.id,
            admin_id = %auth.user_id,
            approval = ?approval,
            "Operator approval updated"
        );
        return Ok(Json(user));
    }

    match User::find_by_id(&state.db, id).await? {
        Some(_) => Err(ApiError::BadRequest("User is not an operator".to_string())),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

pub async fn fetch_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<User>> {
    if !auth.can_access(id) {
        return Err(ApiError::Forbidden(
            "Not authorized to view this user".to_string(),
        ));
    }

    User::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn fetch_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    auth.require_admin()?;

    Ok(Json(User::list(&state.db).await?))
}
