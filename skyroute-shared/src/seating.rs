/// Seat classes and seat label allocation
///
/// Seats are not physical positions: each (flight, travel date, seat class)
/// has its own sequence of labels `{code}-1`, `{code}-2`, ... and a booking
/// of N passengers takes the next N labels after the current occupancy.
///
/// # Example
///
/// ```
/// use skyroute_shared::seating::{allocate, join_labels, SeatClass};
///
/// // Two business passengers after three already booked
/// let labels = allocate(SeatClass::Business, 3, 2).unwrap();
/// assert_eq!(join_labels(&labels), "B-4, B-5");
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for seat allocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatingError {
    /// Fare class is not one of the four known classes
    #[error("Unknown seat class: {0}")]
    UnknownSeatClass(String),

    /// Requested more labels than the sequence can represent
    #[error("Seat sequence overflow: {occupied} occupied, {requested} requested")]
    Overflow { occupied: u32, requested: u32 },
}

/// Fare class of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_class", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SeatClass {
    Economy,
    PremiumEconomy,
    Business,
    FirstClass,
}

impl SeatClass {
    /// Single-letter prefix used in seat labels
    pub fn code(&self) -> char {
        match self {
            SeatClass::Economy => 'E',
            SeatClass::PremiumEconomy => 'P',
            SeatClass::Business => 'B',
            SeatClass::FirstClass => 'A',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "economy",
            SeatClass::PremiumEconomy => "premium-economy",
            SeatClass::Business => "business",
            SeatClass::FirstClass => "first-class",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatClass {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(SeatClass::Economy),
            "premium-economy" => Ok(SeatClass::PremiumEconomy),
            "business" => Ok(SeatClass::Business),
            "first-class" => Ok(SeatClass::FirstClass),
            other => Err(SeatingError::UnknownSeatClass(other.to_string())),
        }
    }
}

/// A seat assignment within a seat class, e.g. `E-3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatLabel {
    pub class: SeatClass,

    /// 1-based position in the class sequence
    pub number: u32,
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.class.code(), self.number)
    }
}

/// Allocates `count` labels following `occupied` already issued ones
///
/// Labels run from `occupied + 1` to `occupied + count` in order, so the
/// i-th passenger of a request gets the i-th label.
///
/// # Errors
///
/// Returns `SeatingError::Overflow` if the sequence would pass `u32::MAX`.
pub fn allocate(class: SeatClass, occupied: u32, count: u32) -> Result<Vec<SeatLabel>, SeatingError> {
    let last = occupied
        .checked_add(count)
        .ok_or(SeatingError::Overflow {
            occupied,
            requested: count,
        })?;

    Ok(((occupied + 1)..=last)
        .map(|number| SeatLabel { class, number })
        .collect())
}

/// Joins labels into the display form stored on tickets: `"E-1, E-2"`
pub fn join_labels(labels: &[SeatLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
