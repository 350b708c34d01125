//! # SkyRoute Shared Library
//!
//! Domain types, persistence and business rules for the SkyRoute flight
//! booking service. The HTTP layer lives in `skyroute-api`.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing and access tokens
//! - `db`: Connection pool and migrations
//! - `models`: Users, flights and bookings with their queries
//! - `seating`: Seat class codes and label allocation
//! - `search`: Flight search validation and route filtering

pub mod auth;
pub mod db;
pub mod models;
pub mod seating;
pub mod search;

/// Current version of the SkyRoute shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
