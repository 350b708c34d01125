/// Flight model and database operations
///
/// A flight is a scheduled route published by an approved operator. It flies
/// every day at the same times; bookings pick the travel date.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE flights (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     operator_id UUID NOT NULL REFERENCES users(id),
///     flight_name VARCHAR(100) NOT NULL,
///     flight_code VARCHAR(20) NOT NULL,
///     origin VARCHAR(100) NOT NULL,
///     destination VARCHAR(100) NOT NULL,
///     departure_time TIME NOT NULL,
///     arrival_time TIME NOT NULL,
///     base_price BIGINT NOT NULL,
///     total_seats INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use skyroute_shared::models::flight::{CreateFlight, Flight};
/// use chrono::NaiveTime;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, operator_id: Uuid) -> Result<(), sqlx::Error> {
/// let flight = Flight::create(&pool, CreateFlight {
///     operator_id,
///     flight_name: "IndiGo".to_string(),
///     flight_code: "6E-201".to_string(),
///     origin: "Chennai".to_string(),
///     destination: "Delhi".to_string(),
///     departure_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
///     arrival_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
///     base_price: 4500,
///     total_seats: 180,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const FLIGHT_COLUMNS: &str = "id, operator_id, flight_name, flight_code, origin, destination, \
     departure_time, arrival_time, base_price, total_seats, created_at, updated_at";

/// Flight model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Flight {
    pub id: Uuid,

    /// Operator account that published the flight
    pub operator_id: Uuid,

    /// Airline / display name
    pub flight_name: String,

    /// Public flight number, e.g. "6E-201"
    pub flight_code: String,

    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,

    /// Base fare per passenger in whole currency units
    pub base_price: i64,

    /// Seat capacity shared by all seat classes
    pub total_seats: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlight {
    pub operator_id: Uuid,
    pub flight_name: String,
    pub flight_code: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub base_price: i64,
    pub total_seats: i32,
}

/// Replacement values for an existing flight
///
/// Every field is overwritten; the owning operator never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFlight {
    pub flight_name: String,
    pub flight_code: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub base_price: i64,
    pub total_seats: i32,
}

impl Flight {
    /// Creates a new flight
    pub async fn create(pool: &PgPool, data: CreateFlight) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO flights (operator_id, flight_name, flight_code, origin, destination,
                                 departure_time, arrival_time, base_price, total_seats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FLIGHT_COLUMNS}
            "#
        );

        let flight = sqlx::query_as::<_, Flight>(&query)
            .bind(data.operator_id)
            .bind(data.flight_name)
            .bind(data.flight_code)
            .bind(data.origin)
            .bind(data.destination)
            .bind(data.departure_time)
            .bind(data.arrival_time)
            .bind(data.base_price)
            .bind(data.total_seats)
            .fetch_one(pool)
            .await?;

        Ok(flight)
    }

    /// Finds a flight by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1");

        sqlx::query_as::<_, Flight>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every flight, ordered by departure time
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY departure_time, flight_code"
        );

        sqlx::query_as::<_, Flight>(&query).fetch_all(pool).await
    }

    /// Overwrites a flight's details
    ///
    /// # Returns
    ///
    /// The updated flight, or None if no flight has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateFlight,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE flights
            SET flight_name = $2, flight_code = $3, origin = $4, destination = $5,
                departure_time = $6, arrival_time = $7, base_price = $8, total_seats = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FLIGHT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Flight>(&query)
            .bind(id)
            .bind(data.flight_name)
            .bind(data.flight_code)
            .bind(data.origin)
            .bind(data.destination)
            .bind(data.departure_time)
            .bind(data.arrival_time)
            .bind(data.base_price)
            .bind(data.total_seats)
            .fetch_optional(pool)
            .await
    }

    /// Whether the flight runs between `from` and `to` in that direction
    pub fn serves(&self, from: &str, to: &str) -> bool {
        self.origin == from && self.destination == to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_flight(origin: &str, destination: &str) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            flight_name: "Air Test".to_string(),
            flight_code: "AT-100".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            base_price: 3000,
            total_seats: 120,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_serves_is_directional() {
        let flight = sample_flight("Chennai", "Mumbai");
        assert!(flight.serves("Chennai", "Mumbai"));
        assert!(!flight.serves("Mumbai", "Chennai"));
    }

    #[test]
    fn test_times_accept_minutes_only() {
        let json = r#"{
            "flight_name": "Air Test",
            "flight_code": "AT-1",
            "origin": "Pune",
            "destination": "Delhi",
            "departure_time": "06:45",
            "arrival_time": "08:50",
            "base_price": 2500,
            "total_seats": 60
        }"#;

        let update: UpdateFlight = serde_json::from_str(json).unwrap();
        assert_eq!(update.departure_time, NaiveTime::from_hms_opt(6, 45, 0).unwrap());
    }
}
