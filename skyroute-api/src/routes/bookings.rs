/// Ticket booking and cancellation
///
/// # Endpoints
///
/// - `POST /book-ticket` - Book seats for the caller
/// - `PUT /cancel-ticket/:id` - Cancel a booking (owner or admin)
/// - `GET /fetch-bookings` - Bookings visible to the caller

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    middleware::auth::AuthContext,
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skyroute_shared::{
    models::{
        booking::{Booking, CancelOutcome, NewBooking, Passenger},
        user::UserType,
    },
    seating::SeatClass,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Passenger as submitted by the client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassengerRequest {
    #[validate(length(min = 1, max = 100, message = "Passenger name is required"))]
    pub name: String,

    #[validate(range(max = 130, message = "Passenger age is out of range"))]
    pub age: u32,
}

/// Body of `POST /book-ticket`
///
/// The booking user is always the caller; any user field in the body is
/// ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct BookTicketRequest {
    pub flight_id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 5, max = 32, message = "Mobile number must be 5-32 characters"))]
    pub mobile: String,

    #[validate(nested)]
    pub passengers: Vec<PassengerRequest>,

    /// One of economy, premium-economy, business, first-class
    pub seat_class: SeatClass,

    #[validate(range(min = 0, message = "Total price cannot be negative"))]
    pub total_price: i64,

    pub journey_date: NaiveDate,
}

/// Response of `PUT /cancel-ticket/:id`
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// False when the booking was already cancelled
    pub cancelled: bool,

    pub message: &'static str,

    pub booking: Booking,
}

/// Books seats on a flight for the caller
///
/// # Errors
///
/// - `400 Bad Request`: No passengers
/// - `404 Not Found`: Unknown flight
/// - `409 Conflict`: Not enough seats left for that date
/// - `422 Unprocessable Entity`: Invalid contact or passenger details
pub async fn book_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<BookTicketRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    req.validate()?;

    let passengers = req
        .passengers
        .into_iter()
        .map(|p| Passenger {
            name: p.name.trim().to_string(),
            age: p.age,
        })
        .collect();

    let booking = Booking::create(
        &state.db,
        NewBooking {
            user_id: auth.user_id,
            flight_id: req.flight_id,
            email: req.email,
            mobile: req.mobile,
            passengers,
            seat_class: req.seat_class,
            total_price: req.total_price,
            journey_date: req.journey_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Cancels a booking
///
/// Cancelling twice is not an error: the second call reports
/// `cancelled: false` and leaves the booking untouched.
///
/// # Errors
///
/// - `403 Forbidden`: Caller neither owns the booking nor is an admin
/// - `404 Not Found`: Unknown booking
pub async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<CancelResponse>> {
    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if !auth.can_access(booking.user_id) {
        return Err(ApiError::Forbidden(
            "Not authorized to cancel this booking".to_string(),
        ));
    }

    let outcome = Booking::cancel(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let response = match outcome {
        CancelOutcome::Cancelled(booking) => {
            info!(booking_id = %id, cancelled_by = %auth.user_id, "Ticket cancelled");
            CancelResponse {
                cancelled: true,
                message: "Booking cancelled",
                booking,
            }
        }
        CancelOutcome::AlreadyCancelled(booking) => CancelResponse {
            cancelled: false,
            message: "Booking already cancelled",
            booking,
        },
    };

    Ok(Json(response))
}

/// Lists bookings by role: admins see all, operators see bookings on their
/// own flights, travelers see their own
pub async fn fetch_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Booking>>> {
    let bookings = match auth.user_type {
        UserType::Admin => Booking::list(&state.db).await?,
        UserType::Operator => Booking::list_by_operator(&state.db, auth.user_id).await?,
        UserType::Traveler => Booking::list_by_user(&state.db, auth.user_id).await?,
    };

    Ok(Json(bookings))
}
