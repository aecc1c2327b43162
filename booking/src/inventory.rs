//! Seat inventory for a single show.
//!
//! [`SeatInventory`] is the only code that flips a seat between free and
//! occupied. Every other component reads through it and mutates through its
//! three entry points: [`SeatInventory::reserve`], [`SeatInventory::release`]
//! and [`SeatInventory::release_all`].
//!
//! **Atomicity**: `reserve` validates the whole batch before touching any seat,
//! so a rejected request leaves the inventory exactly as it was. The check and
//! the mutation are not synchronised; callers that share an inventory across
//! threads must hold a lock around the call (the runtime `Store` does).

use crate::types::{Capacity, SeatNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors constructing an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Shows must have at least one seat
    #[error("A show needs at least one seat")]
    ZeroCapacity,

    /// Occupied seats in a snapshot cannot be reserved on a fresh inventory
    #[error("Snapshot does not describe a valid inventory: {0}")]
    InconsistentSnapshot(BookingError),
}

/// Reasons a booking request is rejected
///
/// Reported in precedence order: the capacity check runs before any per-seat
/// check, and per-seat checks report the first offending seat in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BookingError {
    /// More seats requested than are currently free
    #[error("Not enough seats available for your request (requested {requested}, available {available})")]
    CapacityExceeded {
        /// Size of the request
        requested: usize,
        /// Free seats at the time of the request
        available: usize,
    },

    /// Seat is outside the inventory or already occupied
    #[error("Seat {0} is not available or already booked. Please choose different seats.")]
    SeatUnavailable(SeatNumber),

    /// Seat appears more than once in the same request
    #[error("Duplicate seat entry: Seat {0} already chosen for booking.")]
    DuplicateSeat(SeatNumber),
}

/// Reasons a single-seat release is refused
///
/// Both are advisory: nothing changed and the caller may carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ReleaseError {
    /// Seat is outside the inventory
    #[error("Seat {0} is out of range.")]
    SeatIndexOutOfRange(SeatNumber),

    /// Seat is free already
    #[error("Seat {0} is not booked, cannot cancel.")]
    SeatNotBooked(SeatNumber),
}

impl ReleaseError {
    /// The seat the release was requested for
    #[must_use]
    pub const fn seat(&self) -> SeatNumber {
        match self {
            Self::SeatIndexOutOfRange(seat) | Self::SeatNotBooked(seat) => *seat,
        }
    }
}

// ============================================================================
// Seats
// ============================================================================

/// Occupancy of a seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Can be reserved
    Free,
    /// Held by a booking
    Occupied,
}

/// One bookable seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Seat {
    number: SeatNumber,
    status: SeatStatus,
}

impl Seat {
    const fn new(number: SeatNumber) -> Self {
        Self {
            number,
            status: SeatStatus::Free,
        }
    }

    /// This seat's number
    #[must_use]
    pub const fn number(&self) -> SeatNumber {
        self.number
    }

    /// Current occupancy
    #[must_use]
    pub const fn status(&self) -> SeatStatus {
        self.status
    }

    /// Whether the seat is held by a booking
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        matches!(self.status, SeatStatus::Occupied)
    }
}

/// Seats newly held by a successful [`SeatInventory::reserve`], in request order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedSeats(Vec<SeatNumber>);

impl ReservedSeats {
    /// Number of seats reserved
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the reservation held no seats
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reserved seat numbers
    #[must_use]
    pub fn as_slice(&self) -> &[SeatNumber] {
        &self.0
    }

    /// Iterate over the reserved seat numbers
    pub fn iter(&self) -> impl Iterator<Item = SeatNumber> + '_ {
        self.0.iter().copied()
    }
}

impl From<ReservedSeats> for Vec<SeatNumber> {
    fn from(seats: ReservedSeats) -> Self {
        seats.0
    }
}

impl fmt::Display for ReservedSeats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, seat) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{seat}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Fixed-size set of numbered seats for one show
///
/// Serialized as an [`InventorySnapshot`]. Deserializing goes back through
/// [`SeatInventory::new`] and [`SeatInventory::reserve`], so a snapshot that
/// breaks the seat accounting is rejected instead of loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "InventorySnapshot", try_from = "InventorySnapshot")]
pub struct SeatInventory {
    seats: Vec<Seat>,
    occupied: usize,
}

/// Wire form of a [`SeatInventory`]: its size and which seats are taken
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Number of seats
    pub capacity: Capacity,
    /// Occupied seat numbers, ascending
    pub occupied: Vec<SeatNumber>,
}

impl From<SeatInventory> for InventorySnapshot {
    fn from(inventory: SeatInventory) -> Self {
        let occupied = inventory
            .seats()
            .filter(|seat| seat.is_occupied())
            .map(Seat::number)
            .collect();
        let capacity = u32::try_from(inventory.capacity()).unwrap_or(u32::MAX);
        Self {
            capacity: Capacity::new(capacity),
            occupied,
        }
    }
}

impl TryFrom<InventorySnapshot> for SeatInventory {
    type Error = InventoryError;

    fn try_from(snapshot: InventorySnapshot) -> Result<Self, Self::Error> {
        let mut inventory = Self::new(snapshot.capacity)?;
        inventory
            .reserve(&snapshot.occupied)
            .map_err(InventoryError::InconsistentSnapshot)?;
        Ok(inventory)
    }
}

impl SeatInventory {
    /// Creates an inventory with seats `1..=capacity`, all free
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::ZeroCapacity`] for an empty capacity.
    pub fn new(capacity: Capacity) -> Result<Self, InventoryError> {
        if capacity.value() == 0 {
            return Err(InventoryError::ZeroCapacity);
        }

        Ok(Self {
            seats: (1..=capacity.value())
                .map(|n| Seat::new(SeatNumber::new(n)))
                .collect(),
            occupied: 0,
        })
    }

    /// Total number of seats
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Seats not currently occupied
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.seats.len() - self.occupied
    }

    /// Seats currently occupied
    #[must_use]
    pub const fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Looks up a seat; `None` when the number is outside `1..=capacity`
    #[must_use]
    pub fn seat(&self, number: SeatNumber) -> Option<&Seat> {
        let index = Self::index_of(number)?;
        self.seats.get(index)
    }

    /// Whether `number` names an existing, occupied seat
    #[must_use]
    pub fn is_occupied(&self, number: SeatNumber) -> bool {
        self.seat(number).is_some_and(Seat::is_occupied)
    }

    /// All seats in number order
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    /// Numbers of the free seats, ascending
    pub fn free_seats(&self) -> impl Iterator<Item = SeatNumber> + '_ {
        self.seats
            .iter()
            .filter(|seat| !seat.is_occupied())
            .map(Seat::number)
    }

    /// Occupies every requested seat, or none of them
    ///
    /// Validation order:
    /// 1. the request is larger than [`available_count`](Self::available_count)
    ///    → [`BookingError::CapacityExceeded`], before looking at any seat;
    /// 2. walking the request in order, a seat outside the inventory or
    ///    already occupied → [`BookingError::SeatUnavailable`];
    /// 3. a seat already seen earlier in the request → [`BookingError::DuplicateSeat`].
    ///
    /// An empty request succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the first violation found; the inventory is left untouched.
    pub fn reserve(&mut self, request: &[SeatNumber]) -> Result<ReservedSeats, BookingError> {
        let available = self.available_count();
        if available < request.len() {
            return Err(BookingError::CapacityExceeded {
                requested: request.len(),
                available,
            });
        }

        let mut chosen = HashSet::with_capacity(request.len());
        for &number in request {
            if !self.seat(number).is_some_and(|seat| !seat.is_occupied()) {
                return Err(BookingError::SeatUnavailable(number));
            }
            if !chosen.insert(number) {
                return Err(BookingError::DuplicateSeat(number));
            }
        }

        // Validated above: every index is in range, free and distinct
        for &number in request {
            if let Some(seat) = Self::index_of(number).and_then(|i| self.seats.get_mut(i)) {
                seat.status = SeatStatus::Occupied;
            }
        }
        self.occupied += request.len();

        Ok(ReservedSeats(request.to_vec()))
    }

    /// Frees one occupied seat
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::SeatIndexOutOfRange`] if `number` is not a seat here
    /// - [`ReleaseError::SeatNotBooked`] if the seat is already free
    pub fn release(&mut self, number: SeatNumber) -> Result<(), ReleaseError> {
        let Some(seat) = Self::index_of(number).and_then(|i| self.seats.get_mut(i)) else {
            return Err(ReleaseError::SeatIndexOutOfRange(number));
        };

        if !seat.is_occupied() {
            return Err(ReleaseError::SeatNotBooked(number));
        }

        seat.status = SeatStatus::Free;
        self.occupied -= 1;
        Ok(())
    }

    /// Frees every occupied seat and returns how many were freed
    pub fn release_all(&mut self) -> usize {
        for seat in &mut self.seats {
            seat.status = SeatStatus::Free;
        }
        std::mem::take(&mut self.occupied)
    }

    fn index_of(number: SeatNumber) -> Option<usize> {
        let zero_based = number.get().checked_sub(1)?;
        usize::try_from(zero_based).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seats(numbers: &[u32]) -> Vec<SeatNumber> {
        numbers.iter().copied().map(SeatNumber::new).collect()
    }

    fn inventory(capacity: u32) -> SeatInventory {
        SeatInventory::new(Capacity::new(capacity)).unwrap()
    }

    #[test]
    fn new_inventory_is_all_free() {
        let inventory = inventory(78);

        assert_eq!(inventory.capacity(), 78);
        assert_eq!(inventory.available_count(), 78);
        assert!(inventory.seats().all(|seat| seat.status() == SeatStatus::Free));
        assert_eq!(inventory.seats().next().unwrap().number(), SeatNumber::new(1));
        assert_eq!(inventory.seats().last().unwrap().number(), SeatNumber::new(78));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            SeatInventory::new(Capacity::new(0)),
            Err(InventoryError::ZeroCapacity)
        );
    }

    #[test]
    fn reserve_release_scenario() {
        let mut inventory = inventory(78);

        let reserved = inventory.reserve(&seats(&[5, 12, 40])).unwrap();
        assert_eq!(reserved.as_slice(), seats(&[5, 12, 40]).as_slice());
        assert_eq!(inventory.available_count(), 75);

        assert_eq!(
            inventory.reserve(&seats(&[12, 20])),
            Err(BookingError::SeatUnavailable(SeatNumber::new(12)))
        );
        assert_eq!(inventory.available_count(), 75);
        assert!(!inventory.is_occupied(SeatNumber::new(20)));

        assert_eq!(inventory.release(SeatNumber::new(12)), Ok(()));
        assert_eq!(inventory.available_count(), 76);
        assert!(!inventory.is_occupied(SeatNumber::new(12)));

        assert_eq!(
            inventory.release(SeatNumber::new(12)),
            Err(ReleaseError::SeatNotBooked(SeatNumber::new(12)))
        );
    }

    #[test]
    fn oversized_request_is_capacity_exceeded() {
        let mut inventory = inventory(3);

        assert_eq!(
            inventory.reserve(&seats(&[1, 2, 3, 4])),
            Err(BookingError::CapacityExceeded {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(inventory.available_count(), 3);
    }

    #[test]
    fn capacity_check_precedes_seat_checks() {
        let mut inventory = inventory(4);
        inventory.reserve(&seats(&[1, 2])).unwrap();

        // Seat 1 is taken and 99 does not exist, but the count alone is short
        assert_eq!(
            inventory.reserve(&seats(&[1, 99, 3])),
            Err(BookingError::CapacityExceeded {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn duplicate_free_seat_is_rejected() {
        let mut inventory = inventory(78);

        assert_eq!(
            inventory.reserve(&seats(&[7, 7])),
            Err(BookingError::DuplicateSeat(SeatNumber::new(7)))
        );
        assert!(!inventory.is_occupied(SeatNumber::new(7)));
        assert_eq!(inventory.available_count(), 78);
    }

    #[test]
    fn out_of_range_seats_are_unavailable() {
        let mut inventory = inventory(10);

        assert_eq!(
            inventory.reserve(&seats(&[0])),
            Err(BookingError::SeatUnavailable(SeatNumber::new(0)))
        );
        assert_eq!(
            inventory.reserve(&seats(&[3, 11])),
            Err(BookingError::SeatUnavailable(SeatNumber::new(11)))
        );
        assert_eq!(inventory.available_count(), 10);
    }

    #[test]
    fn first_violation_in_request_order_wins() {
        let mut inventory = inventory(10);
        inventory.reserve(&seats(&[4])).unwrap();

        assert_eq!(
            inventory.reserve(&seats(&[2, 2, 4])),
            Err(BookingError::DuplicateSeat(SeatNumber::new(2)))
        );
        assert_eq!(
            inventory.reserve(&seats(&[4, 2, 2])),
            Err(BookingError::SeatUnavailable(SeatNumber::new(4)))
        );
    }

    #[test]
    fn empty_request_changes_nothing() {
        let mut inventory = inventory(5);

        let reserved = inventory.reserve(&[]).unwrap();

        assert!(reserved.is_empty());
        assert_eq!(inventory.available_count(), 5);
    }

    #[test]
    fn release_out_of_range() {
        let mut inventory = inventory(5);

        assert_eq!(
            inventory.release(SeatNumber::new(6)),
            Err(ReleaseError::SeatIndexOutOfRange(SeatNumber::new(6)))
        );
        assert_eq!(
            inventory.release(SeatNumber::new(0)),
            Err(ReleaseError::SeatIndexOutOfRange(SeatNumber::new(0)))
        );
    }

    #[test]
    fn release_all_frees_everything() {
        let mut inventory = inventory(6);
        inventory.reserve(&seats(&[1, 3, 6])).unwrap();

        assert_eq!(inventory.release_all(), 3);
        assert_eq!(inventory.available_count(), 6);
        assert_eq!(inventory.release_all(), 0);
        assert_eq!(inventory.free_seats().count(), 6);
    }

    #[test]
    fn reserved_seats_display_as_list() {
        let mut inventory = inventory(50);
        let reserved = inventory.reserve(&seats(&[5, 12, 40])).unwrap();

        assert_eq!(reserved.to_string(), "[5, 12, 40]");
        assert_eq!(ReservedSeats::default().to_string(), "[]");
    }

    #[test]
    fn snapshot_keeps_occupancy() {
        let mut original = inventory(10);
        original.reserve(&seats(&[7, 2])).unwrap();

        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#"{"capacity":10,"occupied":[2,7]}"#);

        let restored: SeatInventory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.available_count(), 8);
        assert_eq!(restored.occupied_count(), 2);
    }

    #[test]
    fn inconsistent_snapshots_are_rejected() {
        let load = |json: &str| serde_json::from_str::<SeatInventory>(json).map_err(|e| e.to_string());

        assert!(load(r#"{"capacity":0,"occupied":[]}"#)
            .unwrap_err()
            .contains("at least one seat"));
        assert!(load(r#"{"capacity":3,"occupied":[4]}"#)
            .unwrap_err()
            .contains("Seat 4 is not available"));
        assert!(load(r#"{"capacity":3,"occupied":[2,2]}"#)
            .unwrap_err()
            .contains("Duplicate seat entry: Seat 2"));
        assert!(load(r#"{"capacity":2,"occupied":[1,2,1]}"#)
            .unwrap_err()
            .contains("requested 3, available 2"));
        // The private fields are not a wire format
        assert!(load(r#"{"seats":[],"occupied":0}"#).is_err());
    }

    #[test]
    fn snapshot_conversion_reports_the_booking_error() {
        let snapshot = InventorySnapshot {
            capacity: Capacity::new(5),
            occupied: seats(&[0]),
        };

        assert_eq!(
            SeatInventory::try_from(snapshot),
            Err(InventoryError::InconsistentSnapshot(BookingError::SeatUnavailable(SeatNumber::new(0))))
        );
    }
}
