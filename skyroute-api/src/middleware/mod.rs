/// Middleware for the API server
///
/// - `auth`: Bearer token authentication for protected routes

pub mod auth;
