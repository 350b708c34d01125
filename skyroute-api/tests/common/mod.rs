#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Tests talk to a real PostgreSQL database named by DATABASE_URL and drive
/// the router in-process with `tower::ServiceExt::oneshot`. When
/// DATABASE_URL is unset, `TestContext::new` returns None and the test
/// returns early.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveTime;
use serde_json::Value;
use skyroute_api::{
    app::{build_router, AppState},
    config::Config,
};
use skyroute_shared::{
    auth::{jwt, password},
    db::pool::{create_pool, DatabaseConfig},
    models::{
        flight::{CreateFlight, Flight},
        user::{Approval, CreateUser, User, UserType},
    },
};
use sqlx::PgPool;
use std::collections::HashMap;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "correct-horse-battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
}

/// A user together with a bearer token for it
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return Ok(None);
        };

        let vars: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", database_url),
            ("JWT_SECRET", JWT_SECRET.to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned())?;

        let db = create_pool(DatabaseConfig {
            max_connections: 20,
            ..config.pool_config()
        })
        .await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(Some(TestContext { db, app, config }))
    }

    /// Creates a user directly in the database and signs a token for it
    pub async fn create_user(&self, user_type: UserType) -> anyhow::Result<TestUser> {
        let id = Uuid::new_v4().simple();
        let user = User::create(
            &self.db,
            CreateUser {
                username: format!("user-{id}"),
                email: format!("user-{id}@example.com"),
                password_hash: password::hash_password(PASSWORD)?,
                user_type,
            },
        )
        .await?;

        let claims = jwt::Claims::new(user.id, user.user_type, self.config.token_ttl());
        let token = jwt::create_token(&claims, JWT_SECRET)?;

        Ok(TestUser { user, token })
    }

    pub async fn create_approved_operator(&self) -> anyhow::Result<TestUser> {
        let mut operator = self.create_user(UserType::Operator).await?;
        operator.user = User::set_operator_approval(&self.db, operator.user.id, Approval::Approved)
            .await?
            .ok_or_else(|| anyhow::anyhow!("operator vanished"))?;
        Ok(operator)
    }

    /// Creates a flight on a route unique to this call
    pub async fn create_flight(&self, operator_id: Uuid, total_seats: i32) -> anyhow::Result<Flight> {
        let tag = Uuid::new_v4().simple().to_string();
        Ok(Flight::create(
            &self.db,
            CreateFlight {
                operator_id,
                flight_name: "Test Air".to_string(),
                flight_code: format!("TA-{}", &tag[..6]),
                origin: format!("Origin-{tag}"),
                destination: format!("Destination-{tag}"),
                departure_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
                arrival_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                base_price: 4500,
                total_seats,
            },
        )
        .await?)
    }

    /// Sends one request through the router and decodes the JSON reply
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }
}
