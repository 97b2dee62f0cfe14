//! Text command parsing.
//!
//! One command per line, tokens separated by whitespace:
//!
//! ```text
//! add-screen <name> <rows> <seats_per_row> <aisle_seat>...
//! reserve-seat <name> <row> <seat>...
//! get-unreserved-seats <name> <row>
//! suggest-contiguous-seats <name> <count> <row> <seat_choose>
//! ```

use crate::aggregates::BookingAction;
use crate::types::RequestId;
use thiserror::Error;

/// Command keywords
pub mod keyword {
    /// Register a screen
    pub const ADD_SCREEN: &str = "add-screen";
    /// Reserve seats in a row
    pub const RESERVE_SEAT: &str = "reserve-seat";
    /// List the free seats of a row
    pub const GET_UNRESERVED_SEATS: &str = "get-unreserved-seats";
    /// Suggest a contiguous block
    pub const SUGGEST_CONTIGUOUS_SEATS: &str = "suggest-contiguous-seats";
}

/// Reasons a command line is rejected before reaching the reducer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line holds no tokens
    #[error("empty command")]
    Empty,

    /// First token is not a known keyword
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Wrong number of arguments for the keyword
    #[error("{command}: expected {expected} arguments, got {actual}")]
    WrongArity {
        /// Keyword
        command: &'static str,
        /// Human readable expectation, e.g. `at least 4`
        expected: &'static str,
        /// Arguments given, keyword excluded
        actual: usize,
    },

    /// A numeric argument is not a non-negative `u32`
    #[error("not a number: {0}")]
    NotANumber(String),
}

/// Parses one command line into a booking command.
///
/// # Errors
///
/// Returns [`ParseError`] if the line is empty, the keyword is unknown, the
/// argument count is wrong, or a numeric argument is malformed.
pub fn parse_command(line: &str, request_id: RequestId) -> Result<BookingAction, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = tokens.collect();

    match command {
        keyword::ADD_SCREEN => {
            let [name, rows, seats_per_row, aisles @ ..] = args.as_slice() else {
                return Err(arity(keyword::ADD_SCREEN, "at least 4", &args));
            };
            if aisles.is_empty() {
                return Err(arity(keyword::ADD_SCREEN, "at least 4", &args));
            }
            Ok(BookingAction::AddScreen {
                request_id,
                name: (*name).to_string(),
                rows: number(rows)?,
                seats_per_row: number(seats_per_row)?,
                aisle_seats: numbers(aisles)?,
            })
        },

        keyword::RESERVE_SEAT => {
            let [screen, row, seats @ ..] = args.as_slice() else {
                return Err(arity(keyword::RESERVE_SEAT, "at least 3", &args));
            };
            if seats.is_empty() {
                return Err(arity(keyword::RESERVE_SEAT, "at least 3", &args));
            }
            Ok(BookingAction::ReserveSeats {
                request_id,
                screen: (*screen).to_string(),
                row: number(row)?,
                seats: numbers(seats)?,
            })
        },

        keyword::GET_UNRESERVED_SEATS => {
            let [screen, row] = args.as_slice() else {
                return Err(arity(keyword::GET_UNRESERVED_SEATS, "2", &args));
            };
            Ok(BookingAction::GetUnreservedSeats {
                request_id,
                screen: (*screen).to_string(),
                row: number(row)?,
            })
        },

        keyword::SUGGEST_CONTIGUOUS_SEATS => {
            let [screen, count, row, seat_choose] = args.as_slice() else {
                return Err(arity(keyword::SUGGEST_CONTIGUOUS_SEATS, "4", &args));
            };
            Ok(BookingAction::SuggestSeats {
                request_id,
                screen: (*screen).to_string(),
                count: number(count)?,
                row: number(row)?,
                seat_choose: number(seat_choose)?,
            })
        },

        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

const fn arity(command: &'static str, expected: &'static str, args: &[&str]) -> ParseError {
    ParseError::WrongArity {
        command,
        expected,
        actual: args.len(),
    }
}

/// ASCII digits only; no sign, no whitespace, must fit in `u32`
fn number(token: &str) -> Result<u32, ParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::NotANumber(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| ParseError::NotANumber(token.to_string()))
}

fn numbers(tokens: &[&str]) -> Result<Vec<u32>, ParseError> {
    tokens.iter().map(|token| number(token)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: RequestId = RequestId::new(1);

    #[test]
    fn test_parse_add_screen() {
        assert_eq!(
            parse_command("add-screen Screen1 12 10 4 5 8 9", ID),
            Ok(BookingAction::AddScreen {
                request_id: ID,
                name: "Screen1".to_string(),
                rows: 12,
                seats_per_row: 10,
                aisle_seats: vec![4, 5, 8, 9],
            })
        );
    }

    #[test]
    fn test_parse_reserve_seat() {
        assert_eq!(
            parse_command("reserve-seat Screen1 4 5 6 7", ID),
            Ok(BookingAction::ReserveSeats {
                request_id: ID,
                screen: "Screen1".to_string(),
                row: 4,
                seats: vec![5, 6, 7],
            })
        );
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(
            parse_command("get-unreserved-seats Screen1 4", ID),
            Ok(BookingAction::GetUnreservedSeats {
                request_id: ID,
                screen: "Screen1".to_string(),
                row: 4,
            })
        );

        // Argument order on the wire is count, row, seat
        assert_eq!(
            parse_command("suggest-contiguous-seats Screen1 3 3 4", ID),
            Ok(BookingAction::SuggestSeats {
                request_id: ID,
                screen: "Screen1".to_string(),
                row: 3,
                seat_choose: 4,
                count: 3,
            })
        );
    }

    #[test]
    fn test_extra_whitespace_is_ignored() {
        assert!(matches!(
            parse_command("  get-unreserved-seats \t Screen1   4  ", ID),
            Ok(BookingAction::GetUnreservedSeats { row: 4, .. })
        ));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(parse_command("", ID), Err(ParseError::Empty));
        assert_eq!(parse_command("   ", ID), Err(ParseError::Empty));
        assert_eq!(
            parse_command("cancel-seat Screen1 1 1", ID),
            Err(ParseError::UnknownCommand("cancel-seat".to_string()))
        );
        // Keywords are case sensitive
        assert!(matches!(
            parse_command("ADD-SCREEN S 1 1 1", ID),
            Err(ParseError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_wrong_arity() {
        assert!(matches!(
            parse_command("add-screen Screen1 12 10", ID),
            Err(ParseError::WrongArity { command: "add-screen", actual: 3, .. })
        ));
        assert!(matches!(
            parse_command("reserve-seat Screen1 4", ID),
            Err(ParseError::WrongArity { command: "reserve-seat", actual: 2, .. })
        ));
        assert!(matches!(
            parse_command("get-unreserved-seats Screen1 4 5", ID),
            Err(ParseError::WrongArity { actual: 3, .. })
        ));
        assert!(matches!(
            parse_command("suggest-contiguous-seats Screen1 3 4", ID),
            Err(ParseError::WrongArity { actual: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_numbers() {
        for bad in ["-1", "+1", "1.5", "x", "4294967296"] {
            assert_eq!(
                parse_command(&format!("get-unreserved-seats Screen1 {bad}"), ID),
                Err(ParseError::NotANumber(bad.to_string())),
                "{bad} should be rejected"
            );
        }
        assert_eq!(
            parse_command("reserve-seat Screen1 1 2 three", ID),
            Err(ParseError::NotANumber("three".to_string()))
        );
    }

    #[test]
    fn test_screen_name_is_not_numeric_checked() {
        assert!(matches!(
            parse_command("get-unreserved-seats 42 1", ID),
            Ok(BookingAction::GetUnreservedSeats { screen, .. }) if screen == "42"
        ));
    }
}
