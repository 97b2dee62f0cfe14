//! Shared value types for the booking domain.

use crate::error::BookingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-indexed row number within a screen
pub type RowNumber = u32;

/// 1-indexed seat number within a row
pub type SeatNumber = u32;

/// Rendering of any refused or malformed command
pub const FAILURE: &str = "failure";

/// Correlates a command with the reply the reducer produces for it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Creates a `RequestId` from a raw counter value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw counter value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Outcome of a booking command.
///
/// Status strings only exist in the `Display` rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// Mutation succeeded
    Success,
    /// Query succeeded with at least one seat, ascending
    Seats(Vec<SeatNumber>),
    /// Query was well formed but no seats satisfy it
    NoSeats,
    /// Request was refused
    Failure(BookingError),
}

impl Reply {
    /// Wraps a seat list, mapping an empty list to [`Reply::NoSeats`]
    #[must_use]
    pub fn seats(seats: Vec<SeatNumber>) -> Self {
        if seats.is_empty() {
            Self::NoSeats
        } else {
            Self::Seats(seats)
        }
    }

    /// Returns true for [`Reply::Failure`]
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<Result<(), BookingError>> for Reply {
    fn from(result: Result<(), BookingError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(error) => Self::Failure(error),
        }
    }
}

impl From<Result<Vec<SeatNumber>, BookingError>> for Reply {
    fn from(result: Result<Vec<SeatNumber>, BookingError>) -> Self {
        match result {
            Ok(seats) => Self::seats(seats),
            Err(error) => Self::Failure(error),
        }
    }
}

impl From<Result<Option<Vec<SeatNumber>>, BookingError>> for Reply {
    fn from(result: Result<Option<Vec<SeatNumber>>, BookingError>) -> Self {
        match result {
            Ok(Some(seats)) => Self::seats(seats),
            Ok(None) => Self::NoSeats,
            Err(error) => Self::Failure(error),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::NoSeats => f.write_str("none"),
            Self::Failure(_) => f.write_str(FAILURE),
            Self::Seats(seats) => {
                let mut first = true;
                for seat in seats {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{seat}")?;
                    first = false;
                }
                Ok(())
            },
        }
    }
}
