/// Flight publishing and listing
///
/// # Endpoints
///
/// - `POST /add-flight` - Approved operator publishes a flight
/// - `PUT /update-flight` - Owning operator replaces a flight's details
/// - `GET /fetch-flights` - Every flight
/// - `GET /fetch-flight/:id` - One flight

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
use chrono::NaiveTime;
use serde::Deserialize;
use skyroute_shared::models::{
    flight::{CreateFlight, Flight, UpdateFlight},
    user::User,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Flight details as submitted by an operator
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FlightDetails {
    #[validate(length(min = 1, max = 100, message = "Flight name must be 1-100 characters"))]
    pub flight_name: String,

    #[validate(length(min = 1, max = 20, message = "Flight code must be 1-20 characters"))]
    pub flight_code: String,

    #[validate(length(min = 1, max = 100, message = "Origin is required"))]
    pub origin: String,

    #[validate(length(min = 1, max = 100, message = "Destination is required"))]
    pub destination: String,

    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,

    #[validate(range(min = 0, message = "Base price cannot be negative"))]
    pub base_price: i64,

    #[validate(range(min = 1, message = "A flight needs at least one seat"))]
    pub total_seats: i32,
}

impl FlightDetails {
    fn check_route(&self) -> ApiResult<()> {
        if self.origin.trim().eq_ignore_ascii_case(self.destination.trim()) {
            return Err(ApiError::BadRequest(
                "Origin and destination must differ".to_string(),
            ));
        }
        Ok(())
    }

    fn into_update(self) -> UpdateFlight {
        UpdateFlight {
            flight_name: self.flight_name.trim().to_string(),
            flight_code: self.flight_code.trim().to_string(),
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            base_price: self.base_price,
            total_seats: self.total_seats,
        }
    }
}

/// Body of `PUT /update-flight`
#[derive(Debug, Deserialize)]
pub struct UpdateFlightRequest {
    pub id: Uuid,

    #[serde(flatten)]
    pub details: FlightDetails,
}

/// Loads the caller's account and checks it may manage flights
async fn require_approved_operator(state: &AppState, auth: &AuthContext) -> ApiResult<User> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    if !user.is_approved_operator() {
        return Err(ApiError::Forbidden(
            "Only approved operators can manage flights".to_string(),
        ));
    }

    Ok(user)
}

pub async fn add_flight(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<FlightDetails>,
) -> ApiResult<(StatusCode, Json<Flight>)> {
    let operator = require_approved_operator(&state, &auth).await?;
    req.validate()?;
    req.check_route()?;

    let details = req.into_update();
    let flight = Flight::create(
        &state.db,
        CreateFlight {
            operator_id: operator.id,
            flight_name: details.flight_name,
            flight_code: details.flight_code,
            origin: details.origin,
            destination: details.destination,
            departure_time: details.departure_time,
            arrival_time: details.arrival_time,
            base_price: details.base_price,
            total_seats: details.total_seats,
        },
    )
    .await?;

    info!(
        flight_id = %flight.id,
        operator_id = %operator.id,
        flight_code = %flight.flight_code,
        "Flight added"
    );

    Ok((StatusCode::CREATED, Json(flight)))
}

/// Replaces a flight's details
///
/// Existing bookings keep the values copied onto them at booking time.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an approved operator or does not own the flight
/// - `404 Not Found`: No flight has this ID
pub async fn update_flight(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<UpdateFlightRequest>,
) -> ApiResult<Json<Flight>> {
    let operator = require_approved_operator(&state, &auth).await?;
    req.details.validate()?;
    req.details.check_route()?;

    let existing = Flight::find_by_id(&state.db, req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;

    if existing.operator_id != operator.id {
        warn!(
            flight_id = %existing.id,
            operator_id = %operator.id,
            "Operator tried to update another operator's flight"
        );
        return Err(ApiError::Forbidden(
            "You can only update your own flights".to_string(),
        ));
    }

    let flight = Flight::update(&state.db, req.id, req.details.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;

    info!(flight_id = %flight.id, "Flight updated");
    Ok(Json(flight))
}

pub async fn fetch_flights(State(state): State<AppState>) -> ApiResult<Json<Vec<Flight>>> {
    Ok(Json(Flight::list(&state.db).await?))
}

pub async fn fetch_flight(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Flight>> {
    Flight::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> FlightDetails {
        serde_json::from_str(
            r#"{
                "flight_name": "IndiGo",
                "flight_code": "6E-201",
                "origin": "Chennai",
                "destination": "Delhi",
                "departure_time": "06:30:00",
                "arrival_time": "09:15:00",
                "base_price": 4500,
                "total_seats": 180
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_details() {
        let details = details();
        assert!(details.validate().is_ok());
        assert!(details.check_route().is_ok());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut details = details();
        details.total_seats = 0;
        details.base_price = -1;
        let errors = details.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_rejects_round_route() {
        let mut details = details();
        details.destination = " chennai ".to_string();
        assert!(details.check_route().is_err());
    }

    #[test]
    fn test_update_request_is_flat() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{
                "id": "{id}",
                "flight_name": "IndiGo",
                "flight_code": "6E-202",
                "origin": "Delhi",
                "destination": "Chennai",
                "departure_time": "18:00:00",
                "arrival_time": "20:45:00",
                "base_price": 5100,
                "total_seats": 180
            }}"#
        );
        let req: UpdateFlightRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.id, id);
        assert_eq!(req.details.flight_code, "6E-202");
    }
}
