/// API route handlers, grouped by resource
///
/// - `health`: Liveness and database status
/// - `auth`: Registration and login
/// - `users`: Account lookup and operator approval
/// - `flights`: Publishing and listing flights
/// - `search`: Route and date search
/// - `bookings`: Booking and cancelling tickets

pub mod auth;
pub mod bookings;
pub mod flights;
pub mod health;
pub mod search;
pub mod users;
