//! Seat reservation for a multi-screen venue.
//!
//! Screens are registered with a seat grid and an aisle layout; clients then
//! reserve seats, list free seats, and ask for contiguous blocks that never
//! span an aisle. Every operation is a command handled by the booking
//! reducer and answered through the runtime store.
//!
//! # Architecture
//!
//! ```text
//!   text line ──► command::parse_command ──► BookingAction (command, RequestId)
//!                                                 │
//!                                                 ▼
//!                                    Store ──► BookingReducer ──► ScreenRegistry ──► Screen
//!                                      ▲              │
//!                                      │        Effect::Future
//!                                      │              │
//!                                      └── Replied { request_id, reply } (broadcast)
//!                                                 │
//!                                                 ▼
//!                                   app::BookingApp renders the Reply
//! ```
//!
//! # Aisles
//!
//! An aisle seat sits next to walking space. It may join a block only from
//! the side that faces away from the aisle, so a suggested block never
//! crosses an aisle. See [`aggregates::screen`] for the flag rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregates;
pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod types;

pub use aggregates::{
    BookingAction, BookingEnvironment, BookingReducer, BookingState, Screen, ScreenRegistry,
};
pub use app::{AppError, BookingApp, BookingStore};
pub use command::{parse_command, ParseError};
pub use config::Config;
pub use error::BookingError;
pub use types::{Reply, RequestId, RowNumber, SeatNumber};
