/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access token issuing and validation
///
/// # Example
///
/// ```no_run
/// use skyroute_shared::auth::password::{hash_password, verify_password};
/// use skyroute_shared::auth::jwt::{create_token, Claims};
/// use skyroute_shared::models::user::UserType;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), UserType::Traveler, Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
