/// Flight search validation and route filtering
///
/// A search names an origin, a destination and a departure date, plus a
/// return date for round trips. It is validated against "today" before any
/// flights are looked at, then the flight list is narrowed to the legs the
/// traveler can book.
///
/// # Date rules
///
/// - One-way: the departure date may be today or later.
/// - Round trip: the departure date must be after today and the return date
///   after the departure date.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use skyroute_shared::search::SearchQuery;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let query = SearchQuery {
///     origin: "Chennai".to_string(),
///     destination: "Delhi".to_string(),
///     departure_date: Some(today),
///     return_date: None,
///     round_trip: false,
/// };
///
/// assert!(query.validate(today).is_ok());
/// ```

use crate::models::flight::Flight;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Error type for search validation
///
/// Messages are shown to travelers as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Origin, destination or a required date is missing
    #[error("Please fill all the inputs")]
    MissingFields,

    /// Dates are in the past or out of order
    #[error("Please check the dates")]
    InvalidDates,
}

/// Raw search parameters as submitted by the client
///
/// A date input left blank arrives as an empty value and reads as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,

    #[serde(deserialize_with = "blank_as_none")]
    pub departure_date: Option<NaiveDate>,

    #[serde(deserialize_with = "blank_as_none")]
    pub return_date: Option<NaiveDate>,

    pub round_trip: bool,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => date
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Trip shape of a validated search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trip {
    OneWay,
    RoundTrip { return_date: NaiveDate },
}

/// A search that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSearch {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub trip: Trip,
}

/// Direction of a matched flight relative to the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Outbound,
    Return,
}

/// A bookable flight together with the date it would be flown on
#[derive(Debug, Clone, Serialize)]
pub struct FlightMatch {
    #[serde(flatten)]
    pub flight: Flight,

    /// Travel date to book this flight for
    pub journey_date: NaiveDate,

    pub leg: Leg,
}

impl SearchQuery {
    /// Applies the input and date rules
    ///
    /// # Errors
    ///
    /// - `SearchError::MissingFields` if a required field is empty
    /// - `SearchError::InvalidDates` if the dates break the trip's rules
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedSearch, SearchError> {
        let origin = self.origin.trim();
        let destination = self.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(SearchError::MissingFields);
        }

        let departure_date = self.departure_date.ok_or(SearchError::MissingFields)?;

        let trip = if self.round_trip {
            let return_date = self.return_date.ok_or(SearchError::MissingFields)?;
            if departure_date <= today || return_date <= departure_date {
                return Err(SearchError::InvalidDates);
            }
            Trip::RoundTrip { return_date }
        } else {
            if departure_date < today {
                return Err(SearchError::InvalidDates);
            }
            Trip::OneWay
        };

        Ok(ValidatedSearch {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
            trip,
        })
    }
}

/// Narrows `flights` to the legs a validated search can book
///
/// Outbound legs come first, then return legs, each in input order. A round
/// trip with no outbound leg yields nothing.
pub fn filter_flights(flights: &[Flight], search: &ValidatedSearch) -> Vec<FlightMatch> {
    let mut matches: Vec<FlightMatch> = flights
        .iter()
        .filter(|f| f.serves(&search.origin, &search.destination))
        .map(|f| FlightMatch {
            flight: f.clone(),
            journey_date: search.departure_date,
            leg: Leg::Outbound,
        })
        .collect();

    if matches.is_empty() {
        return matches;
    }

    if let Trip::RoundTrip { return_date } = search.trip {
        matches.extend(
            flights
                .iter()
                .filter(|f| f.serves(&search.destination, &search.origin))
                .map(|f| FlightMatch {
                    flight: f.clone(),
                    journey_date: return_date,
                    leg: Leg::Return,
                }),
        );
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flight(code: &str, origin: &str, destination: &str) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            flight_name: "Air Test".to_string(),
            flight_code: code.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            base_price: 4000,
            total_seats: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn one_way(departure: NaiveDate) -> SearchQuery {
        SearchQuery {
            origin: "Chennai".to_string(),
            destination: "Delhi".to_string(),
            departure_date: Some(departure),
            return_date: None,
            round_trip: false,
        }
    }

    fn round_trip(departure: NaiveDate, ret: NaiveDate) -> SearchQuery {
        SearchQuery {
            return_date: Some(ret),
            round_trip: true,
            ..one_way(departure)
        }
    }

    #[test]
    fn test_one_way_accepts_today() {
        let today = date(2025, 6, 10);
        let search = one_way(today).validate(today).unwrap();
        assert_eq!(search.trip, Trip::OneWay);
        assert_eq!(search.departure_date, today);
    }

    #[test]
    fn test_one_way_rejects_past_date() {
        let today = date(2025, 6, 10);
        let err = one_way(date(2025, 6, 9)).validate(today).unwrap_err();
        assert_eq!(err, SearchError::InvalidDates);
    }

    #[test]
    fn test_round_trip_rejects_departure_today() {
        let today = date(2025, 6, 10);
        let err = round_trip(today, date(2025, 6, 12))
            .validate(today)
            .unwrap_err();
        assert_eq!(err, SearchError::InvalidDates);
    }

    #[test]
    fn test_round_trip_requires_return_after_departure() {
        let today = date(2025, 6, 10);
        let same_day = round_trip(date(2025, 6, 11), date(2025, 6, 11));
        assert_eq!(same_day.validate(today).unwrap_err(), SearchError::InvalidDates);

        let ok = round_trip(date(2025, 6, 11), date(2025, 6, 15))
            .validate(today)
            .unwrap();
        assert_eq!(
            ok.trip,
            Trip::RoundTrip {
                return_date: date(2025, 6, 15)
            }
        );
    }

    #[test]
    fn test_missing_fields() {
        let today = date(2025, 6, 10);

        let mut query = one_way(today);
        query.destination = "  ".to_string();
        assert_eq!(query.validate(today).unwrap_err(), SearchError::MissingFields);

        let mut query = one_way(today);
        query.departure_date = None;
        assert_eq!(query.validate(today).unwrap_err(), SearchError::MissingFields);

        let mut query = round_trip(date(2025, 6, 11), date(2025, 6, 12));
        query.return_date = None;
        assert_eq!(query.validate(today).unwrap_err(), SearchError::MissingFields);
    }

    #[test]
    fn test_blank_dates_read_as_missing() {
        let query: SearchQuery = serde_json::from_value(serde_json::json!({
            "origin": "Chennai",
            "destination": "Delhi",
            "departure_date": "",
            "return_date": " ",
            "round_trip": true
        }))
        .unwrap();
        assert_eq!(query.departure_date, None);
        assert_eq!(query.return_date, None);

        let today = date(2025, 6, 10);
        assert_eq!(query.validate(today).unwrap_err(), SearchError::MissingFields);

        let query: SearchQuery =
            serde_json::from_value(serde_json::json!({ "departure_date": "2025-06-11" })).unwrap();
        assert_eq!(query.departure_date, Some(date(2025, 6, 11)));

        let bad = serde_json::from_value::<SearchQuery>(serde_json::json!({
            "departure_date": "next tuesday"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(SearchError::MissingFields.to_string(), "Please fill all the inputs");
        assert_eq!(SearchError::InvalidDates.to_string(), "Please check the dates");
    }

    #[test]
    fn test_filter_one_way_keeps_only_outbound() {
        let today = date(2025, 6, 10);
        let flights = vec![
            flight("F1", "Chennai", "Delhi"),
            flight("F2", "Delhi", "Chennai"),
            flight("F3", "Chennai", "Mumbai"),
            flight("F4", "Chennai", "Delhi"),
        ];

        let search = one_way(today).validate(today).unwrap();
        let matches = filter_flights(&flights, &search);

        let codes: Vec<&str> = matches.iter().map(|m| m.flight.flight_code.as_str()).collect();
        assert_eq!(codes, vec!["F1", "F4"]);
        assert!(matches.iter().all(|m| m.leg == Leg::Outbound && m.journey_date == today));
    }

    #[test]
    fn test_filter_round_trip_tags_return_date() {
        let today = date(2025, 6, 10);
        let flights = vec![
            flight("R1", "Delhi", "Chennai"),
            flight("O1", "Chennai", "Delhi"),
        ];

        let search = round_trip(date(2025, 6, 11), date(2025, 6, 14))
            .validate(today)
            .unwrap();
        let matches = filter_flights(&flights, &search);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].flight.flight_code, "O1");
        assert_eq!(matches[0].journey_date, date(2025, 6, 11));
        assert_eq!(matches[1].flight.flight_code, "R1");
        assert_eq!(matches[1].leg, Leg::Return);
        assert_eq!(matches[1].journey_date, date(2025, 6, 14));
    }

    #[test]
    fn test_filter_round_trip_without_outbound_is_empty() {
        let today = date(2025, 6, 10);
        let flights = vec![flight("R1", "Delhi", "Chennai")];

        let search = round_trip(date(2025, 6, 11), date(2025, 6, 14))
            .validate(today)
            .unwrap();
        assert!(filter_flights(&flights, &search).is_empty());
    }

    #[test]
    fn test_flight_match_serializes_flat() {
        let today = date(2025, 6, 10);
        let m = FlightMatch {
            flight: flight("F1", "Chennai", "Delhi"),
            journey_date: today,
            leg: Leg::Outbound,
        };

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["flight_code"], "F1");
        assert_eq!(json["journey_date"], "2025-06-10");
        assert_eq!(json["leg"], "outbound");
    }
}
