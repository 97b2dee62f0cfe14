//! Booking aggregate: the reducer that drives the screen registry.
//!
//! Commands are validated and applied through [`ScreenRegistry`]; every
//! command is answered with exactly one [`BookingAction::Replied`] produced by
//! an effect, which the store broadcasts to the caller waiting on that
//! request id. Successful mutations are recorded as events in the journal so
//! the state can be rebuilt by replaying them.

use super::registry::ScreenRegistry;
use crate::error::BookingError;
use crate::types::{Reply, RequestId, RowNumber, SeatNumber};
use chrono::{DateTime, Utc};
use seatmap_core::{
    effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the booking aggregate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingAction {
    // ========== Commands ==========
    /// Command: register a screen
    AddScreen {
        /// Correlation id for the reply
        request_id: RequestId,
        /// Screen name
        name: String,
        /// Number of rows
        rows: u32,
        /// Seats in every row
        seats_per_row: u32,
        /// Aisle seat numbers, any order
        aisle_seats: Vec<SeatNumber>,
    },

    /// Command: reserve seats in one row, all or nothing
    ReserveSeats {
        /// Correlation id for the reply
        request_id: RequestId,
        /// Screen name
        screen: String,
        /// Row number
        row: RowNumber,
        /// Seats to reserve
        seats: Vec<SeatNumber>,
    },

    /// Command: list the free seats of a row
    GetUnreservedSeats {
        /// Correlation id for the reply
        request_id: RequestId,
        /// Screen name
        screen: String,
        /// Row number
        row: RowNumber,
    },

    /// Command: suggest a contiguous block that includes a chosen seat
    SuggestSeats {
        /// Correlation id for the reply
        request_id: RequestId,
        /// Screen name
        screen: String,
        /// Row number
        row: RowNumber,
        /// Seat the block must include
        seat_choose: SeatNumber,
        /// Block length
        count: u32,
    },

    // ========== Events ==========
    /// Event: a screen was registered
    ScreenAdded {
        /// Screen name
        name: String,
        /// Number of rows
        rows: u32,
        /// Seats in every row
        seats_per_row: u32,
        /// Aisle seat numbers
        aisle_seats: Vec<SeatNumber>,
        /// When the screen was added
        added_at: DateTime<Utc>,
    },

    /// Event: seats were reserved
    SeatsReserved {
        /// Screen name
        screen: String,
        /// Row number
        row: RowNumber,
        /// Reserved seats
        seats: Vec<SeatNumber>,
        /// When the seats were reserved
        reserved_at: DateTime<Utc>,
    },

    /// Event: a command was answered
    Replied {
        /// Correlation id of the command
        request_id: RequestId,
        /// Outcome of the command
        reply: Reply,
    },
}

impl BookingAction {
    /// Request id of a command, `None` for events
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::AddScreen { request_id, .. }
            | Self::ReserveSeats { request_id, .. }
            | Self::GetUnreservedSeats { request_id, .. }
            | Self::SuggestSeats { request_id, .. } => Some(*request_id),
            Self::ScreenAdded { .. } | Self::SeatsReserved { .. } | Self::Replied { .. } => None,
        }
    }

    /// Returns true if this is the reply to `request_id`
    #[must_use]
    pub fn is_reply_to(&self, request_id: RequestId) -> bool {
        matches!(self, Self::Replied { request_id: id, .. } if *id == request_id)
    }

    /// Returns true if this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        self.request_id().is_some()
    }
}

// ============================================================================
// State
// ============================================================================

/// State of the booking aggregate
#[derive(Clone, Debug, Default)]
pub struct BookingState {
    /// Every screen of the venue
    pub registry: ScreenRegistry,
    /// Applied domain events, oldest first
    pub journal: Vec<BookingAction>,
    /// Last rejected command (if any)
    pub last_error: Option<String>,
}

impl BookingState {
    /// Creates an empty booking state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds state by applying recorded events in order.
    ///
    /// # Errors
    ///
    /// Returns the first event the registry refuses.
    pub fn from_events<'a>(
        events: impl IntoIterator<Item = &'a BookingAction>,
    ) -> Result<Self, BookingError> {
        let mut state = Self::new();
        for event in events {
            BookingReducer::apply_event(&mut state, event)?;
        }
        Ok(state)
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the booking aggregate
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for event timestamps
    pub clock: Arc<dyn Clock>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the booking aggregate
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies a domain event to state, journaling it on success
    fn apply_event(state: &mut BookingState, event: &BookingAction) -> Result<(), BookingError> {
        match event {
            BookingAction::ScreenAdded {
                name,
                rows,
                seats_per_row,
                aisle_seats,
                ..
            } => state
                .registry
                .add_screen(name, *rows, *seats_per_row, aisle_seats)?,
            BookingAction::SeatsReserved {
                screen, row, seats, ..
            } => state.registry.reserve_seats(screen, *row, seats)?,
            // Commands and replies do not change state
            BookingAction::AddScreen { .. }
            | BookingAction::ReserveSeats { .. }
            | BookingAction::GetUnreservedSeats { .. }
            | BookingAction::SuggestSeats { .. }
            | BookingAction::Replied { .. } => return Ok(()),
        }

        state.journal.push(event.clone());
        Ok(())
    }

    /// Applies the event a command produced and turns the result into a reply
    fn apply_command_event(state: &mut BookingState, event: &BookingAction) -> Reply {
        let result = Self::apply_event(state, event);
        Self::record(state, &result);
        Reply::from(result)
    }

    fn record<T>(state: &mut BookingState, result: &Result<T, BookingError>) {
        match result {
            Ok(_) => state.last_error = None,
            Err(error) => {
                tracing::debug!(%error, "Booking command rejected");
                state.last_error = Some(error.to_string());
            },
        }
    }

    /// Creates the effect that answers a command
    fn reply(request_id: RequestId, reply: Reply) -> SmallVec<[Effect<BookingAction>; 4]> {
        smallvec![Effect::send(BookingAction::Replied { request_id, reply })]
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BookingAction::AddScreen {
                request_id,
                name,
                rows,
                seats_per_row,
                aisle_seats,
            } => {
                let event = BookingAction::ScreenAdded {
                    name,
                    rows,
                    seats_per_row,
                    aisle_seats,
                    added_at: env.clock.now(),
                };
                let reply = Self::apply_command_event(state, &event);
                Self::reply(request_id, reply)
            },

            BookingAction::ReserveSeats {
                request_id,
                screen,
                row,
                seats,
            } => {
                let event = BookingAction::SeatsReserved {
                    screen,
                    row,
                    seats,
                    reserved_at: env.clock.now(),
                };
                let reply = Self::apply_command_event(state, &event);
                Self::reply(request_id, reply)
            },

            BookingAction::GetUnreservedSeats {
                request_id,
                screen,
                row,
            } => {
                let result = state.registry.unreserved_seats(&screen, row);
                Self::record(state, &result);
                Self::reply(request_id, Reply::from(result))
            },

            BookingAction::SuggestSeats {
                request_id,
                screen,
                row,
                seat_choose,
                count,
            } => {
                let result = state.registry.suggest_seats(&screen, row, seat_choose, count);
                Self::record(state, &result);
                Self::reply(request_id, Reply::from(result))
            },

            // ========== Events ==========
            BookingAction::Replied { .. } => SmallVec::new(),

            event => {
                if let Err(error) = Self::apply_event(state, &event) {
                    tracing::warn!(%error, ?event, "Ignoring event the registry refused");
                }
                SmallVec::new()
            },
        }
    }
}
