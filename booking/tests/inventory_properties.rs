//! Property tests for seat inventory invariants.
//!
//! Run with: `cargo test --test inventory_properties`

#![allow(clippy::unwrap_used)]

use marquee_booking::{BookingError, Capacity, ReleaseError, SeatInventory, SeatNumber};
use proptest::prelude::*;
use std::collections::HashSet;

fn seat_numbers(max: u32, len: usize) -> impl Strategy<Value = Vec<SeatNumber>> {
    prop::collection::vec((0..=max).prop_map(SeatNumber::new), 0..=len)
}

/// Available plus occupied always equals capacity, and the counter agrees with the seats
fn assert_counts(inventory: &SeatInventory) {
    let occupied = inventory.seats().filter(|seat| seat.is_occupied()).count();
    assert_eq!(occupied, inventory.occupied_count());
    assert_eq!(inventory.available_count() + occupied, inventory.capacity());
}

proptest! {
    #[test]
    fn reserve_is_all_or_nothing(
        capacity in 1u32..40,
        first in seat_numbers(45, 10),
        second in seat_numbers(45, 10),
    ) {
        let mut inventory = SeatInventory::new(Capacity::new(capacity)).unwrap();
        let _ = inventory.reserve(&first);
        let before = inventory.clone();

        match inventory.reserve(&second) {
            Ok(reserved) => {
                prop_assert_eq!(reserved.as_slice(), second.as_slice());
                prop_assert_eq!(before.available_count() - second.len(), inventory.available_count());
                for seat in &second {
                    prop_assert!(!before.is_occupied(*seat));
                    prop_assert!(inventory.is_occupied(*seat));
                }
            }
            Err(_) => prop_assert_eq!(&before, &inventory),
        }
        assert_counts(&inventory);
    }

    #[test]
    fn capacity_check_comes_first(capacity in 1u32..20, extra in 1usize..5) {
        let mut inventory = SeatInventory::new(Capacity::new(capacity)).unwrap();
        let size = capacity as usize + extra;
        // Out-of-range and duplicate seats would also fail; capacity is reported
        let request = vec![SeatNumber::new(0); size];

        prop_assert_eq!(
            inventory.reserve(&request),
            Err(BookingError::CapacityExceeded { requested: size, available: capacity as usize })
        );
    }

    #[test]
    fn first_offending_seat_is_reported(capacity in 6u32..30, request in seat_numbers(35, 6)) {
        let mut inventory = SeatInventory::new(Capacity::new(capacity)).unwrap();

        let mut seen = HashSet::new();
        let expected = request.iter().find_map(|&seat| {
            if seat.get() == 0 || seat.get() > capacity {
                Some(BookingError::SeatUnavailable(seat))
            } else if !seen.insert(seat) {
                Some(BookingError::DuplicateSeat(seat))
            } else {
                None
            }
        });

        match (inventory.reserve(&request), expected) {
            (Ok(_), None) => {}
            (Err(actual), Some(expected)) => prop_assert_eq!(actual, expected),
            (actual, expected) => prop_assert!(false, "got {:?}, expected {:?}", actual, expected),
        }
    }

    #[test]
    fn release_frees_exactly_one_seat(capacity in 1u32..30, seat in 0u32..35, book in any::<bool>()) {
        let mut inventory = SeatInventory::new(Capacity::new(capacity)).unwrap();
        let seat = SeatNumber::new(seat);
        let in_range = (1..=capacity).contains(&seat.get());
        if book && in_range {
            inventory.reserve(&[seat]).unwrap();
        }
        let available = inventory.available_count();

        let result = inventory.release(seat);
        if !in_range {
            prop_assert_eq!(result, Err(ReleaseError::SeatIndexOutOfRange(seat)));
            prop_assert_eq!(inventory.available_count(), available);
        } else if book {
            prop_assert_eq!(result, Ok(()));
            prop_assert_eq!(inventory.available_count(), available + 1);
        } else {
            prop_assert_eq!(result, Err(ReleaseError::SeatNotBooked(seat)));
            prop_assert_eq!(inventory.available_count(), available);
        }
        assert_counts(&inventory);
    }

    #[test]
    fn release_all_restores_capacity(capacity in 1u32..40, request in seat_numbers(40, 15)) {
        let mut inventory = SeatInventory::new(Capacity::new(capacity)).unwrap();
        let booked = inventory.reserve(&request).map(|r| r.len()).unwrap_or(0);

        prop_assert_eq!(inventory.release_all(), booked);
        prop_assert_eq!(inventory.available_count(), capacity as usize);
        prop_assert_eq!(inventory.release_all(), 0);
    }
}
