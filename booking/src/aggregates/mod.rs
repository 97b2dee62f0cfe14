//! Aggregates of the booking domain.
//!
//! - Screen: one auditorium's seat grid and aisle layout
//! - Registry: every screen, keyed by name
//! - Booking: the reducer that applies commands to the registry

pub mod booking;
pub mod registry;
pub mod screen;

pub use booking::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
pub use registry::ScreenRegistry;
pub use screen::{AisleFlags, AisleLayout, Screen};
