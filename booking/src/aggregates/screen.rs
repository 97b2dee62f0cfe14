//! A single auditorium: its seat grid, aisle layout and seat-suggestion search.
//!
//! Rows and seats are 1-indexed. Aisles are per column: a seat number that is
//! an aisle seat is one in every row.
//!
//! A contiguous block may only touch an aisle seat at its own boundary, and
//! only when the aisle seat opens in the block's direction. The flags are
//! derived from the sorted aisle list:
//!
//! ```text
//! seats:    1   2   3   4   5 | 6   7   8   9  10
//! aisle:                    A   A
//! flags:                    L   R
//! ```
//!
//! Seat 5 has the walking space on its right, so a block may run leftward
//! from it (`extends_left`); seat 6 has it on its left, so a block may run
//! rightward from it (`extends_right`). A wall aisle seat opens away from the
//! wall: seat 1 gets `extends_right`, the last seat gets `extends_left`.

use crate::error::BookingError;
use crate::types::{RowNumber, SeatNumber};

/// Aisle flags for one seat column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AisleFlags {
    /// Seat borders a walking aisle
    pub is_aisle: bool,
    /// A block anchored here may extend to the left
    pub extends_left: bool,
    /// A block anchored here may extend to the right
    pub extends_right: bool,
}

/// Per-column aisle metadata shared by every row of a screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AisleLayout {
    // Index 0 is seat 1
    columns: Vec<AisleFlags>,
}

impl AisleLayout {
    /// Builds the layout from aisle seat numbers in any order.
    ///
    /// Seat numbers outside `1..=seats_per_row` are ignored.
    #[must_use]
    pub fn new(seats_per_row: u32, aisle_seats: &[SeatNumber]) -> Self {
        let mut sorted = aisle_seats.to_vec();
        sorted.sort_unstable();

        let mut layout = Self {
            columns: vec![AisleFlags::default(); seats_per_row as usize],
        };

        for &seat in &sorted {
            if let Some(flags) = layout.column_mut(seat) {
                flags.is_aisle = true;
                if seat == 1 {
                    flags.extends_right = true;
                }
                if seat == seats_per_row {
                    flags.extends_left = true;
                }
            }
        }

        for pair in sorted.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if left.checked_add(1) == Some(right) {
                if let Some(flags) = layout.column_mut(left) {
                    flags.extends_left = true;
                }
                if let Some(flags) = layout.column_mut(right) {
                    flags.extends_right = true;
                }
            }
        }

        layout
    }

    /// Flags for `seat`, or `None` when the seat does not exist
    #[must_use]
    pub fn get(&self, seat: SeatNumber) -> Option<AisleFlags> {
        let index = (seat as usize).checked_sub(1)?;
        self.columns.get(index).copied()
    }

    fn column_mut(&mut self, seat: SeatNumber) -> Option<&mut AisleFlags> {
        let index = (seat as usize).checked_sub(1)?;
        self.columns.get_mut(index)
    }

    fn flags(&self, seat: SeatNumber) -> AisleFlags {
        self.get(seat).unwrap_or_default()
    }
}

/// Owned reservation grid with 1-indexed, bounds-checked access
#[derive(Clone, Debug, PartialEq, Eq)]
struct SeatGrid {
    rows: u32,
    seats_per_row: u32,
    reserved: Vec<bool>,
}

impl SeatGrid {
    fn new(rows: u32, seats_per_row: u32) -> Self {
        Self {
            rows,
            seats_per_row,
            reserved: vec![false; rows as usize * seats_per_row as usize],
        }
    }

    fn index(&self, row: RowNumber, seat: SeatNumber) -> Option<usize> {
        if row == 0 || row > self.rows || seat == 0 || seat > self.seats_per_row {
            return None;
        }
        Some((row as usize - 1) * self.seats_per_row as usize + (seat as usize - 1))
    }

    fn is_reserved(&self, row: RowNumber, seat: SeatNumber) -> Option<bool> {
        self.index(row, seat).map(|i| self.reserved[i])
    }

    fn is_free(&self, row: RowNumber, seat: SeatNumber) -> bool {
        self.is_reserved(row, seat) == Some(false)
    }

    fn reserve(&mut self, row: RowNumber, seat: SeatNumber) {
        if let Some(i) = self.index(row, seat) {
            self.reserved[i] = true;
        }
    }
}

/// One auditorium of the venue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    name: String,
    grid: SeatGrid,
    aisles: AisleLayout,
}

impl Screen {
    /// Creates a screen with every seat free.
    ///
    /// Geometry and aisle topology are validated by
    /// [`ScreenRegistry::add_screen`](super::registry::ScreenRegistry::add_screen).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rows: u32,
        seats_per_row: u32,
        aisle_seats: &[SeatNumber],
    ) -> Self {
        Self {
            name: name.into(),
            grid: SeatGrid::new(rows, seats_per_row),
            aisles: AisleLayout::new(seats_per_row, aisle_seats),
        }
    }

    /// Screen name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Number of seats in every row
    #[must_use]
    pub const fn seats_per_row(&self) -> u32 {
        self.grid.seats_per_row
    }

    /// Aisle flags of a seat column
    #[must_use]
    pub fn aisle(&self, seat: SeatNumber) -> Option<AisleFlags> {
        self.aisles.get(seat)
    }

    /// Whether a seat is reserved, `None` when it does not exist
    #[must_use]
    pub fn is_reserved(&self, row: RowNumber, seat: SeatNumber) -> Option<bool> {
        self.grid.is_reserved(row, seat)
    }

    /// Free seats across all rows
    #[must_use]
    pub fn free_seat_count(&self) -> usize {
        self.grid.reserved.iter().filter(|reserved| !**reserved).count()
    }

    /// Reserves every seat in `seats`, or none of them.
    ///
    /// # Errors
    ///
    /// Fails if the row or any seat is out of range, any seat is already
    /// reserved, or `seats` is empty. The grid is untouched on failure.
    pub fn reserve_seats(
        &mut self,
        row: RowNumber,
        seats: &[SeatNumber],
    ) -> Result<(), BookingError> {
        self.check_row(row)?;
        if seats.is_empty() {
            return Err(BookingError::EmptyRequest);
        }

        for &seat in seats {
            self.check_seat(seat)?;
            if !self.grid.is_free(row, seat) {
                return Err(BookingError::SeatTaken { row, seat });
            }
        }

        for &seat in seats {
            self.grid.reserve(row, seat);
        }

        Ok(())
    }

    /// Free seats of `row` in ascending order; empty when the row is full.
    ///
    /// # Errors
    ///
    /// Fails if the row is out of range.
    pub fn unreserved_seats(&self, row: RowNumber) -> Result<Vec<SeatNumber>, BookingError> {
        self.check_row(row)?;
        Ok((1..=self.seats_per_row())
            .filter(|&seat| self.grid.is_free(row, seat))
            .collect())
    }

    /// Suggests `count` contiguous free seats in `row` that include
    /// `seat_choose`.
    ///
    /// The block ending at `seat_choose` is preferred over the block starting
    /// at it. `Ok(None)` means neither block is available.
    ///
    /// # Errors
    ///
    /// Fails if the row or `seat_choose` is out of range, or `count` is zero.
    pub fn suggest_seats(
        &self,
        row: RowNumber,
        seat_choose: SeatNumber,
        count: u32,
    ) -> Result<Option<Vec<SeatNumber>>, BookingError> {
        self.check_row(row)?;
        self.check_seat(seat_choose)?;
        if count == 0 {
            return Err(BookingError::EmptyRequest);
        }

        let fits_left = seat_choose >= count;
        let fits_right = self.seats_per_row() - seat_choose + 1 >= count;

        if fits_left && self.leftward_block_clear(row, seat_choose, count) {
            let start = seat_choose + 1 - count;
            return Ok(Some((start..=seat_choose).collect()));
        }

        if fits_right && self.rightward_block_clear(row, seat_choose, count) {
            let end = seat_choose + count - 1;
            return Ok(Some((seat_choose..=end).collect()));
        }

        Ok(None)
    }

    /// Checks the block `[seat_choose - count + 1, seat_choose]`.
    ///
    /// Caller guarantees `seat_choose >= count`.
    fn leftward_block_clear(&self, row: RowNumber, seat_choose: SeatNumber, count: u32) -> bool {
        let anchor = self.aisles.flags(seat_choose);
        if anchor.is_aisle && !anchor.extends_left {
            return false;
        }

        let start = seat_choose + 1 - count;
        (start..=seat_choose).rev().all(|seat| {
            if !self.grid.is_free(row, seat) {
                return false;
            }
            let flags = self.aisles.flags(seat);
            seat == seat_choose || !flags.is_aisle || (seat == start && flags.extends_right)
        })
    }

    /// Checks the block `[seat_choose, seat_choose + count - 1]`.
    ///
    /// Caller guarantees the block fits in the row.
    fn rightward_block_clear(&self, row: RowNumber, seat_choose: SeatNumber, count: u32) -> bool {
        let anchor = self.aisles.flags(seat_choose);
        if anchor.is_aisle && !anchor.extends_right {
            return false;
        }

        let end = seat_choose + count - 1;
        (seat_choose..=end).all(|seat| {
            if !self.grid.is_free(row, seat) {
                return false;
            }
            let flags = self.aisles.flags(seat);
            seat == seat_choose || !flags.is_aisle || (seat == end && flags.extends_left)
        })
    }

    fn check_row(&self, row: RowNumber) -> Result<(), BookingError> {
        if row == 0 || row > self.grid.rows {
            return Err(BookingError::RowOutOfRange { row, rows: self.grid.rows });
        }
        Ok(())
    }

    fn check_seat(&self, seat: SeatNumber) -> Result<(), BookingError> {
        if seat == 0 || seat > self.grid.seats_per_row {
            return Err(BookingError::SeatOutOfRange {
                seat,
                seats_per_row: self.grid.seats_per_row,
            });
        }
        Ok(())
    }
}
