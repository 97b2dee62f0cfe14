//! All screens of the venue, keyed by name.

use super::screen::Screen;
use crate::error::BookingError;
use crate::types::{RowNumber, SeatNumber};
use std::collections::HashMap;

/// Largest number of seats a single screen may hold
pub const MAX_SCREEN_SEATS: u64 = 1 << 20;

/// Owns every [`Screen`] and routes operations to them by name.
///
/// Screens are kept in creation order; the name index points into that list.
/// Screens are never removed.
#[derive(Clone, Debug, Default)]
pub struct ScreenRegistry {
    screens: Vec<Screen>,
    index: HashMap<String, usize>,
}

impl ScreenRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered screens
    #[must_use]
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Whether no screen is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Screen names in creation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.screens.iter().map(Screen::name)
    }

    /// Looks up a screen by name
    #[must_use]
    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.index.get(name).and_then(|&i| self.screens.get(i))
    }

    /// Registers a new screen.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken, the geometry is empty or larger than
    /// [`MAX_SCREEN_SEATS`], an aisle seat lies
    /// outside the row, or an aisle seat borders neither a wall nor another
    /// aisle seat.
    pub fn add_screen(
        &mut self,
        name: &str,
        rows: u32,
        seats_per_row: u32,
        aisle_seats: &[SeatNumber],
    ) -> Result<(), BookingError> {
        self.validate_new_screen(name, rows, seats_per_row, aisle_seats)?;

        self.index.insert(name.to_string(), self.screens.len());
        self.screens.push(Screen::new(name, rows, seats_per_row, aisle_seats));
        Ok(())
    }

    /// Reserves seats on the named screen, all or nothing.
    ///
    /// # Errors
    ///
    /// Fails if the screen is unknown or the screen refuses the batch.
    pub fn reserve_seats(
        &mut self,
        name: &str,
        row: RowNumber,
        seats: &[SeatNumber],
    ) -> Result<(), BookingError> {
        self.screen_mut(name)?.reserve_seats(row, seats)
    }

    /// Free seats of a row of the named screen.
    ///
    /// # Errors
    ///
    /// Fails if the screen is unknown or the row is out of range.
    pub fn unreserved_seats(
        &self,
        name: &str,
        row: RowNumber,
    ) -> Result<Vec<SeatNumber>, BookingError> {
        self.existing(name)?.unreserved_seats(row)
    }

    /// Contiguous block suggestion on the named screen.
    ///
    /// # Errors
    ///
    /// Fails if the screen is unknown or the screen refuses the request.
    pub fn suggest_seats(
        &self,
        name: &str,
        row: RowNumber,
        seat_choose: SeatNumber,
        count: u32,
    ) -> Result<Option<Vec<SeatNumber>>, BookingError> {
        self.existing(name)?.suggest_seats(row, seat_choose, count)
    }

    fn existing(&self, name: &str) -> Result<&Screen, BookingError> {
        self.screen(name).ok_or_else(|| BookingError::UnknownScreen {
            name: name.to_string(),
        })
    }

    fn screen_mut(&mut self, name: &str) -> Result<&mut Screen, BookingError> {
        let Some(&i) = self.index.get(name) else {
            return Err(BookingError::UnknownScreen { name: name.to_string() });
        };
        self.screens
            .get_mut(i)
            .ok_or_else(|| BookingError::UnknownScreen { name: name.to_string() })
    }

    /// Validates an add-screen request against the registry
    fn validate_new_screen(
        &self,
        name: &str,
        rows: u32,
        seats_per_row: u32,
        aisle_seats: &[SeatNumber],
    ) -> Result<(), BookingError> {
        if self.index.contains_key(name) {
            return Err(BookingError::ScreenExists { name: name.to_string() });
        }

        if rows == 0 || seats_per_row == 0 {
            return Err(BookingError::InvalidGeometry { rows, seats_per_row });
        }

        if u64::from(rows) * u64::from(seats_per_row) > MAX_SCREEN_SEATS {
            return Err(BookingError::ScreenTooLarge {
                rows,
                seats_per_row,
                max_seats: MAX_SCREEN_SEATS,
            });
        }

        if let Some(&seat) = aisle_seats
            .iter()
            .find(|&&seat| seat == 0 || seat > seats_per_row)
        {
            return Err(BookingError::AisleSeatOutOfRange { seat, seats_per_row });
        }

        validate_aisle_topology(seats_per_row, aisle_seats)
    }
}

/// Every aisle seat must border a wall or another aisle seat.
///
/// An aisle is walking space with seats on both sides, or seats on one side
/// and a wall on the other, so a lone aisle seat mid-row cannot exist.
fn validate_aisle_topology(
    seats_per_row: u32,
    aisle_seats: &[SeatNumber],
) -> Result<(), BookingError> {
    let mut sorted = aisle_seats.to_vec();
    sorted.sort_unstable();

    for (i, &seat) in sorted.iter().enumerate() {
        if seat == 1 || seat == seats_per_row {
            continue;
        }

        let joins_previous = i > 0 && sorted[i - 1] + 1 == seat;
        let joins_next = sorted.get(i + 1).is_some_and(|&next| next == seat + 1);

        if !joins_previous && !joins_next {
            return Err(BookingError::IsolatedAisleSeat { seat });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_screen() -> ScreenRegistry {
        let mut registry = ScreenRegistry::new();
        assert_eq!(registry.add_screen("Screen1", 12, 10, &[4, 5, 8, 9]), Ok(()));
        registry
    }

    #[test]
    fn test_add_screen() {
        let registry = registry_with_screen();

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        let screen = registry.screen("Screen1");
        assert_eq!(screen.map(Screen::rows), Some(12));
        assert_eq!(screen.map(Screen::seats_per_row), Some(10));
    }

    #[test]
    fn test_duplicate_screen_rejected() {
        let mut registry = registry_with_screen();
        assert_eq!(
            registry.add_screen("Screen1", 3, 3, &[1]),
            Err(BookingError::ScreenExists { name: "Screen1".to_string() })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let mut registry = ScreenRegistry::new();
        assert_eq!(
            registry.add_screen("S", 0, 10, &[1]),
            Err(BookingError::InvalidGeometry { rows: 0, seats_per_row: 10 })
        );
        assert_eq!(
            registry.add_screen("S", 10, 0, &[]),
            Err(BookingError::InvalidGeometry { rows: 10, seats_per_row: 0 })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_oversized_screen_rejected() {
        let mut registry = ScreenRegistry::new();
        let too_large = |rows, seats_per_row| BookingError::ScreenTooLarge {
            rows,
            seats_per_row,
            max_seats: MAX_SCREEN_SEATS,
        };

        assert_eq!(
            registry.add_screen("Big", u32::MAX, u32::MAX, &[1]),
            Err(too_large(u32::MAX, u32::MAX))
        );
        assert_eq!(
            registry.add_screen("Big", 100_000, 100_000, &[1]),
            Err(too_large(100_000, 100_000))
        );
        assert_eq!(registry.add_screen("Long", 1, u32::MAX, &[1]), Err(too_large(1, u32::MAX)));
        assert!(registry.is_empty());

        // Exactly at the limit is accepted
        assert_eq!(registry.add_screen("Max", 1024, 1024, &[1]), Ok(()));
        assert_eq!(registry.screen("Max").map(Screen::free_seat_count), Some(1 << 20));
    }

    #[test]
    fn test_aisle_seat_out_of_range_rejected() {
        let mut registry = ScreenRegistry::new();
        assert_eq!(
            registry.add_screen("S", 2, 10, &[10, 11]),
            Err(BookingError::AisleSeatOutOfRange { seat: 11, seats_per_row: 10 })
        );
        assert_eq!(
            registry.add_screen("S", 2, 10, &[0, 1]),
            Err(BookingError::AisleSeatOutOfRange { seat: 0, seats_per_row: 10 })
        );
    }

    #[test]
    fn test_isolated_aisle_seat_rejected() {
        let mut registry = ScreenRegistry::new();
        assert_eq!(
            registry.add_screen("S", 2, 10, &[5]),
            Err(BookingError::IsolatedAisleSeat { seat: 5 })
        );
        assert_eq!(
            registry.add_screen("S", 2, 10, &[1, 3, 10]),
            Err(BookingError::IsolatedAisleSeat { seat: 3 })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_aisle_topology_accepts_walls_and_pairs() {
        let mut registry = ScreenRegistry::new();
        assert_eq!(registry.add_screen("walls", 1, 10, &[1, 10]), Ok(()));
        assert_eq!(registry.add_screen("pair", 1, 10, &[6, 5]), Ok(()));
        assert_eq!(registry.add_screen("wide", 1, 10, &[4, 5, 6]), Ok(()));
        assert_eq!(registry.add_screen("single", 1, 1, &[1]), Ok(()));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["walls", "pair", "wide", "single"]);
    }

    #[test]
    fn test_duplicate_aisle_seat_is_not_its_own_neighbour() {
        let mut registry = ScreenRegistry::new();
        assert_eq!(
            registry.add_screen("S", 1, 10, &[5, 5]),
            Err(BookingError::IsolatedAisleSeat { seat: 5 })
        );
    }

    #[test]
    fn test_operations_route_to_named_screen() {
        let mut registry = registry_with_screen();
        assert_eq!(registry.add_screen("Screen2", 2, 6, &[1, 6]), Ok(()));

        assert_eq!(registry.reserve_seats("Screen2", 1, &[2, 3]), Ok(()));
        assert_eq!(registry.unreserved_seats("Screen2", 1), Ok(vec![1, 4, 5, 6]));
        assert_eq!(registry.unreserved_seats("Screen1", 1), Ok((1..=10).collect()));
        assert_eq!(registry.suggest_seats("Screen1", 4, 4, 4), Ok(Some(vec![1, 2, 3, 4])));
    }

    #[test]
    fn test_unknown_screen_fails_every_operation() {
        let mut registry = registry_with_screen();
        let unknown = BookingError::UnknownScreen { name: "Nope".to_string() };

        assert_eq!(registry.reserve_seats("Nope", 1, &[1]), Err(unknown.clone()));
        assert_eq!(registry.unreserved_seats("Nope", 1), Err(unknown.clone()));
        assert_eq!(registry.suggest_seats("Nope", 1, 1, 1), Err(unknown));
        assert!(registry.screen("Nope").is_none());
    }
}
