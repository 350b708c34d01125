/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use skyroute_api::{app::AppState, config::Config};
/// use skyroute_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let app = skyroute_api::app::build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::auth::jwt_auth_layer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// public:     /health /register /login
///             /fetch-flights /fetch-flight/:id /search-flights
/// protected:  /approve-operator /reject-operator /fetch-user/:id /fetch-users
///             /add-flight /update-flight
///             /book-ticket /cancel-ticket/:id /fetch-bookings
/// ```
///
/// Protected routes require a bearer token; role checks happen in the
/// handlers. Every request passes through tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/fetch-flights", get(routes::flights::fetch_flights))
        .route("/fetch-flight/:id", get(routes::flights::fetch_flight))
        .route("/search-flights", get(routes::search::search_flights));

    let protected_routes = Router::new()
        .route("/approve-operator", post(routes::users::approve_operator))
        .route("/reject-operator", post(routes::users::reject_operator))
        .route("/fetch-user/:id", get(routes::users::fetch_user))
        .route("/fetch-users", get(routes::users::fetch_users))
        .route("/add-flight", post(routes::flights::add_flight))
        .route("/update-flight", put(routes::flights::update_flight))
        .route("/book-ticket", post(routes::bookings::book_ticket))
        .route("/cancel-ticket/:id", put(routes::bookings::cancel_ticket))
        .route("/fetch-bookings", get(routes::bookings::fetch_bookings))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
