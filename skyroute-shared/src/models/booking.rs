/// Booking model and database operations
///
/// A booking reserves seats on one flight for one travel date. Seat labels are
/// issued per (flight, travel date, seat class) in a contiguous sequence; see
/// [`crate::seating`].
///
/// # Lifecycle
///
/// ```text
/// confirmed → cancelled
/// ```
///
/// Cancelling frees capacity but never returns labels to the sequence, so a
/// label is issued at most once for its flight/date/class.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE seat_class AS ENUM ('economy', 'premium-economy', 'business', 'first-class');
/// CREATE TYPE booking_status AS ENUM ('confirmed', 'cancelled');
///
/// CREATE TABLE bookings (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     flight_id UUID NOT NULL REFERENCES flights(id),
///     flight_name VARCHAR(100) NOT NULL,
///     flight_code VARCHAR(20) NOT NULL,
///     departure VARCHAR(100) NOT NULL,
///     destination VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     mobile VARCHAR(32) NOT NULL,
///     passengers JSONB NOT NULL,
///     seat_class seat_class NOT NULL,
///     seats TEXT[] NOT NULL,
///     total_price BIGINT NOT NULL,
///     journey_date DATE NOT NULL,
///     journey_time TIME NOT NULL,
///     status booking_status NOT NULL DEFAULT 'confirmed',
///     booked_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use skyroute_shared::models::booking::{Booking, NewBooking, Passenger};
/// use skyroute_shared::seating::SeatClass;
/// use chrono::NaiveDate;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, flight_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let booking = Booking::create(&pool, NewBooking {
///     user_id,
///     flight_id,
///     email: "asha@example.com".to_string(),
///     mobile: "9876543210".to_string(),
///     passengers: vec![Passenger { name: "Asha".to_string(), age: 31 }],
///     seat_class: SeatClass::Economy,
///     total_price: 4500,
///     journey_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
/// }).await?;
///
/// println!("Seats: {}", booking.seat_summary());
/// # Ok(())
/// # }
/// ```

use crate::models::flight::{Flight, FLIGHT_COLUMNS};
use crate::seating::{self, SeatClass, SeatingError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, user_id, flight_id, flight_name, flight_code, departure, \
     destination, email, mobile, passengers, seat_class, seats, total_price, journey_date, \
     journey_time, status, booked_at, updated_at";

/// Error type for booking creation
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The flight to book does not exist
    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),

    /// A booking needs at least one passenger
    #[error("At least one passenger is required")]
    NoPassengers,

    /// Not enough seats left on the flight for this date
    #[error("Not enough seats: requested {requested}, available {available}")]
    CapacityExceeded { requested: u32, available: u32 },

    #[error(transparent)]
    Seating(#[from] SeatingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// One traveler on a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,

    /// Account that made the booking
    pub user_id: Uuid,

    pub flight_id: Uuid,

    // Copied from the flight at booking time
    pub flight_name: String,
    pub flight_code: String,
    pub departure: String,
    pub destination: String,

    /// Contact details for the booking
    pub email: String,
    pub mobile: String,

    pub passengers: Json<Vec<Passenger>>,

    pub seat_class: SeatClass,

    /// Seat labels in passenger order, e.g. ["E-4", "E-5"]
    pub seats: Vec<String>,

    pub total_price: i64,

    pub journey_date: NaiveDate,

    /// Departure time of the flight on the journey date
    pub journey_time: NaiveTime,

    pub status: BookingStatus,

    pub booked_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub email: String,
    pub mobile: String,
    pub passengers: Vec<Passenger>,
    pub seat_class: SeatClass,
    pub total_price: i64,
    pub journey_date: NaiveDate,
}

/// Result of a cancel request on an existing booking
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    /// The booking was confirmed and is now cancelled
    Cancelled(Booking),

    /// The booking had already been cancelled; nothing changed
    AlreadyCancelled(Booking),
}

impl Booking {
    /// Books seats on a flight
    ///
    /// Runs in one transaction holding an advisory lock for the
    /// (flight, journey date) pair, so concurrent bookings of the same flight
    /// and date are applied one at a time:
    ///
    /// 1. Load the flight (capacity and the fields copied onto the booking),
    ///    share-locking its row so a concurrent flight update waits for us
    /// 2. Check the confirmed passengers of all classes leave room for this request
    /// 3. Count every passenger ever booked in this seat class (cancelled included)
    /// 4. Issue the next labels after that count and insert the booking
    ///
    /// # Errors
    ///
    /// - `BookingError::NoPassengers` if the passenger list is empty
    /// - `BookingError::FlightNotFound` if the flight does not exist
    /// - `BookingError::CapacityExceeded` if the flight is full for that date
    /// - `BookingError::Database` on any database failure
    pub async fn create(pool: &PgPool, data: NewBooking) -> Result<Self, BookingError> {
        if data.passengers.is_empty() {
            return Err(BookingError::NoPassengers);
        }
        let requested = u32::try_from(data.passengers.len()).map_err(|_| {
            BookingError::CapacityExceeded {
                requested: u32::MAX,
                available: 0,
            }
        })?;

        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(occupancy_lock_key(data.flight_id, data.journey_date))
            .execute(&mut *tx)
            .await?;

        let flight_query = format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1 FOR SHARE");
        let flight = sqlx::query_as::<_, Flight>(&flight_query)
            .bind(data.flight_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(BookingError::FlightNotFound(data.flight_id))?;

        let confirmed: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(jsonb_array_length(passengers)), 0)::BIGINT
            FROM bookings
            WHERE flight_id = $1 AND journey_date = $2 AND status = 'confirmed'
            "#,
        )
        .bind(data.flight_id)
        .bind(data.journey_date)
        .fetch_one(&mut *tx)
        .await?;

        let available = remaining_seats(flight.total_seats, confirmed);
        if requested > available {
            warn!(
                flight_id = %data.flight_id,
                journey_date = %data.journey_date,
                requested,
                available,
                "Booking rejected: flight is full"
            );
            return Err(BookingError::CapacityExceeded {
                requested,
                available,
            });
        }

        let occupied: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(jsonb_array_length(passengers)), 0)::BIGINT
            FROM bookings
            WHERE flight_id = $1 AND journey_date = $2 AND seat_class = $3
            "#,
        )
        .bind(data.flight_id)
        .bind(data.journey_date)
        .bind(data.seat_class)
        .fetch_one(&mut *tx)
        .await?;

        let occupied = u32::try_from(occupied).unwrap_or(u32::MAX);
        let labels: Vec<String> = seating::allocate(data.seat_class, occupied, requested)?
            .iter()
            .map(ToString::to_string)
            .collect();

        debug!(
            flight_id = %data.flight_id,
            seat_class = %data.seat_class,
            occupied,
            requested,
            "Allocated seat labels"
        );

        let insert = format!(
            r#"
            INSERT INTO bookings (user_id, flight_id, flight_name, flight_code, departure,
                                  destination, email, mobile, passengers, seat_class, seats,
                                  total_price, journey_date, journey_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let booking = sqlx::query_as::<_, Booking>(&insert)
            .bind(data.user_id)
            .bind(flight.id)
            .bind(flight.flight_name)
            .bind(flight.flight_code)
            .bind(flight.origin)
            .bind(flight.destination)
            .bind(data.email)
            .bind(data.mobile)
            .bind(Json(data.passengers))
            .bind(data.seat_class)
            .bind(labels)
            .bind(data.total_price)
            .bind(data.journey_date)
            .bind(flight.departure_time)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            flight_id = %booking.flight_id,
            journey_date = %booking.journey_date,
            seats = %booking.seat_summary(),
            "Booking confirmed"
        );

        Ok(booking)
    }

    /// Finds a booking by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");

        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every booking, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booked_at DESC");

        sqlx::query_as::<_, Booking>(&query).fetch_all(pool).await
    }

    /// Lists bookings made by one user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY booked_at DESC"
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Lists bookings on flights published by one operator, newest first
    pub async fn list_by_operator(
        pool: &PgPool,
        operator_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE flight_id IN (SELECT id FROM flights WHERE operator_id = $1)
            ORDER BY booked_at DESC
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(operator_id)
            .fetch_all(pool)
            .await
    }

    /// Cancels a booking
    ///
    /// # Returns
    ///
    /// - `Some(CancelOutcome::Cancelled)` if the booking was confirmed
    /// - `Some(CancelOutcome::AlreadyCancelled)` if it was cancelled before
    /// - `None` if no booking has this ID
    pub async fn cancel(pool: &PgPool, id: Uuid) -> Result<Option<CancelOutcome>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let cancelled = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        if let Some(booking) = cancelled {
            info!(booking_id = %id, "Booking cancelled");
            return Ok(Some(CancelOutcome::Cancelled(booking)));
        }

        Ok(Self::find_by_id(pool, id)
            .await?
            .map(CancelOutcome::AlreadyCancelled))
    }

    /// Number of passengers (and seats) on the booking
    pub fn passenger_count(&self) -> usize {
        self.passengers.0.len()
    }

    /// Seat labels in display form: "E-1, E-2"
    pub fn seat_summary(&self) -> String {
        self.seats.join(", ")
    }
}

/// Advisory lock key for bookings of one flight on one date
fn occupancy_lock_key(flight_id: Uuid, journey_date: NaiveDate) -> String {
    format!("booking:{flight_id}:{journey_date}")
}

fn remaining_seats(total_seats: i32, confirmed: i64) -> u32 {
    let remaining = i64::from(total_seats).saturating_sub(confirmed).max(0);
    u32::try_from(remaining).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_is_per_flight_and_date() {
        let flight = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();

        assert_eq!(
            occupancy_lock_key(flight, day),
            "booking:550e8400-e29b-41d4-a716-446655440000:2025-07-01"
        );
        assert_ne!(occupancy_lock_key(flight, day), occupancy_lock_key(flight, next_day));
    }

    #[test]
    fn test_remaining_seats() {
        assert_eq!(remaining_seats(100, 0), 100);
        assert_eq!(remaining_seats(100, 98), 2);
        assert_eq!(remaining_seats(100, 100), 0);
        // Capacity lowered below existing bookings
        assert_eq!(remaining_seats(50, 60), 0);
    }

    #[test]
    fn test_booking_error_messages() {
        let err = BookingError::CapacityExceeded {
            requested: 3,
            available: 1,
        };
        assert_eq!(err.to_string(), "Not enough seats: requested 3, available 1");
        assert_eq!(
            BookingError::NoPassengers.to_string(),
            "At least one passenger is required"
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
