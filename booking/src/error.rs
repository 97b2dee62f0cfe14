//! Domain errors for screens and the screen registry.

use crate::types::{RowNumber, SeatNumber};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a booking operation is refused.
///
/// These are returned as values; the domain never logs or panics on them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingError {
    /// A screen with this name is already registered
    #[error("screen {name} already exists")]
    ScreenExists {
        /// Screen name
        name: String,
    },

    /// No screen with this name is registered
    #[error("screen {name} not found")]
    UnknownScreen {
        /// Screen name
        name: String,
    },

    /// A screen needs at least one row and one seat per row
    #[error("invalid screen geometry: {rows} rows of {seats_per_row} seats")]
    InvalidGeometry {
        /// Requested row count
        rows: u32,
        /// Requested seats per row
        seats_per_row: u32,
    },

    /// Seat grid larger than a screen may hold
    #[error("screen of {rows} rows of {seats_per_row} seats exceeds {max_seats} seats")]
    ScreenTooLarge {
        /// Requested row count
        rows: u32,
        /// Requested seats per row
        seats_per_row: u32,
        /// Largest seat count a screen may hold
        max_seats: u64,
    },

    /// An aisle seat lies outside `1..=seats_per_row`
    #[error("aisle seat {seat} outside 1..={seats_per_row}")]
    AisleSeatOutOfRange {
        /// Offending aisle seat
        seat: SeatNumber,
        /// Seats per row of the screen
        seats_per_row: u32,
    },

    /// An aisle seat borders neither a wall nor another aisle seat
    #[error("aisle seat {seat} is isolated")]
    IsolatedAisleSeat {
        /// Offending aisle seat
        seat: SeatNumber,
    },

    /// Row outside `1..=rows`
    #[error("row {row} outside 1..={rows}")]
    RowOutOfRange {
        /// Requested row
        row: RowNumber,
        /// Row count of the screen
        rows: u32,
    },

    /// Seat outside `1..=seats_per_row`
    #[error("seat {seat} outside 1..={seats_per_row}")]
    SeatOutOfRange {
        /// Requested seat
        seat: SeatNumber,
        /// Seats per row of the screen
        seats_per_row: u32,
    },

    /// Seat is already reserved
    #[error("seat {seat} in row {row} is already reserved")]
    SeatTaken {
        /// Row of the seat
        row: RowNumber,
        /// Reserved seat
        seat: SeatNumber,
    },

    /// A request named no seats
    #[error("request names no seats")]
    EmptyRequest,
}
