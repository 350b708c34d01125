/// User model and database operations
///
/// This module provides the User model and the operations behind registration,
/// login and operator approval.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_type AS ENUM ('traveler', 'operator', 'admin');
/// CREATE TYPE approval_state AS ENUM ('pending', 'approved', 'rejected');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL,            -- unique, case-insensitive
///     password_hash VARCHAR(255) NOT NULL,
///     user_type user_type NOT NULL DEFAULT 'traveler',
///     approval approval_state NOT NULL DEFAULT 'approved',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use skyroute_shared::models::user::{CreateUser, User, UserType};
/// use skyroute_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "asha".to_string(),
///     email: "asha@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     user_type: UserType::Operator,
/// }).await?;
///
/// // Operators start out pending until an admin approves them
/// assert!(!user.is_approved_operator());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, user_type, approval, created_at, updated_at";

const ADMIN_BOOTSTRAP_LOCK: &str = "skyroute:admin-bootstrap";

/// Account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Books tickets
    #[serde(alias = "user")]
    Traveler,

    /// Publishes flights once approved
    #[serde(alias = "flight-operator")]
    Operator,

    /// Approves operators and sees everything
    Admin,
}

impl UserType {
    /// Approval state a new account of this kind starts in
    pub fn initial_approval(&self) -> Approval {
        match self {
            UserType::Operator => Approval::Pending,
            UserType::Traveler | UserType::Admin => Approval::Approved,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Traveler => "traveler",
            UserType::Operator => "operator",
            UserType::Admin => "admin",
        }
    }
}

/// Approval state; only meaningful for operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Approval {
    Pending,
    Approved,
    Rejected,
}

/// User account
///
/// Passwords are stored as Argon2id hashes and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    pub username: String,

    /// Unique (case-insensitive) login identifier
    pub email: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub user_type: UserType,

    pub approval: Approval,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub user_type: UserType,
}

impl User {
    /// Creates a new user
    ///
    /// The approval state follows the account kind: operators start
    /// `pending`, everyone else `approved`.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered (unique index
    /// `users_email_key`) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (username, email, password_hash, user_type, approval)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        let approval = data.user_type.initial_approval();
        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.user_type)
            .bind(approval)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email");

        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Sets the approval state of an operator account
    ///
    /// # Returns
    ///
    /// The updated user, or None if no operator has this ID
    pub async fn set_operator_approval(
        pool: &PgPool,
        id: Uuid,
        approval: Approval,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE users
            SET approval = $2, updated_at = NOW()
            WHERE id = $1 AND user_type = 'operator'
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(approval)
            .fetch_optional(pool)
            .await
    }

    /// Creates the first admin account
    ///
    /// The existence check and the insert run in one transaction under an
    /// advisory lock, so concurrent sign-ups cannot both become admin.
    ///
    /// # Returns
    ///
    /// The new admin, or None if an admin already exists
    pub async fn create_first_admin(
        pool: &PgPool,
        data: CreateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(ADMIN_BOOTSTRAP_LOCK)
            .execute(&mut *tx)
            .await?;

        if Self::admin_exists(&mut *tx).await? {
            return Ok(None);
        }

        let query = format!(
            r#"
            INSERT INTO users (username, email, password_hash, user_type, approval)
            VALUES ($1, $2, $3, 'admin', 'approved')
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(user))
    }

    /// Whether any admin account exists yet
    pub async fn admin_exists<'e, E>(executor: E) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_type = 'admin')")
            .fetch_one(executor)
            .await
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Whether this account may publish and edit flights
    pub fn is_approved_operator(&self) -> bool {
        self.user_type == UserType::Operator && self.approval == Approval::Approved
    }
}
