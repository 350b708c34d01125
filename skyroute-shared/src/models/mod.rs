/// Database models for SkyRoute
///
/// # Models
///
/// - `user`: Accounts of travelers, operators and admins
/// - `flight`: Daily scheduled routes published by operators
/// - `booking`: Tickets with passengers and allocated seats
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
///     username: "ravi".to_string(),
///     email: "ravi@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     user_type: UserType::Traveler,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod booking;
pub mod flight;
pub mod user;
