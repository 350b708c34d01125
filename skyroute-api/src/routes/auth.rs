/// Registration and login
///
/// # Endpoints
///
/// - `POST /register` - Create an account and get a token
/// - `POST /login` - Exchange email and password for a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use skyroute_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserType},
};
use tracing::{info, warn};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Account kind; defaults to traveler
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
}

fn default_user_type() -> UserType {
    UserType::Traveler
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Returned by both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,

    /// Bearer token for protected routes
    pub access_token: String,
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = jwt::Claims::new(user.id, user.user_type, state.config.token_ttl());
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Creates an account
///
/// Operators start out pending and cannot publish flights until an admin
/// approves them. An admin account can only be registered while none exists.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `403 Forbidden`: An admin already exists
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let data = CreateUser {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash,
        user_type: req.user_type,
    };

    let user = if req.user_type == UserType::Admin {
        User::create_first_admin(&state.db, data)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "Rejected admin sign-up: an admin already exists");
                ApiError::Forbidden("Admin accounts can only be created by bootstrap".to_string())
            })?
    } else {
        User::create(&state.db, data).await?
    };

    info!(
        user_id = %user.id,
        user_type = user.user_type.as_str(),
        "User registered"
    );

    let access_token = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, access_token })))
}

/// Authenticates a user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    info!(user_id = %user.id, "User logged in");

    let access_token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse { user, access_token }))
}
