//! A scheduled screening and the seat inventory it owns.

use crate::catalog::{Movie, Theater};
use crate::inventory::{BookingError, InventoryError, ReleaseError, ReservedSeats, SeatInventory};
use crate::types::{Capacity, Money, SeatNumber, ShowId, ShowTier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// When a show runs: the offered start times and the date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSchedule {
    /// Start times offered to the customer, in display order
    pub show_times: Vec<String>,
    /// Screening date
    pub date: NaiveDate,
}

impl ShowSchedule {
    /// Creates a new `ShowSchedule`
    #[must_use]
    pub fn new<I, S>(show_times: I, date: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            show_times: show_times.into_iter().map(Into::into).collect(),
            date,
        }
    }
}

/// A movie screening in one theater on one date
///
/// Movie and theater descriptors are shared between shows; the seat
/// inventory belongs to this show alone and is only reachable read-only.
#[derive(Clone, Debug)]
pub struct Show {
    id: ShowId,
    movie: Arc<Movie>,
    theater: Arc<Theater>,
    schedule: ShowSchedule,
    tier: ShowTier,
    inventory: SeatInventory,
}

impl Show {
    /// Creates a show with `capacity` free seats
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::ZeroCapacity`] when `capacity` is zero.
    pub fn new(
        id: ShowId,
        movie: Arc<Movie>,
        theater: Arc<Theater>,
        schedule: ShowSchedule,
        tier: ShowTier,
        capacity: Capacity,
    ) -> Result<Self, InventoryError> {
        Ok(Self {
            id,
            movie,
            theater,
            schedule,
            tier,
            inventory: SeatInventory::new(capacity)?,
        })
    }

    /// Catalog identifier
    #[must_use]
    pub const fn id(&self) -> ShowId {
        self.id
    }

    /// Movie being screened
    #[must_use]
    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    /// Theater hosting the screening
    #[must_use]
    pub fn theater(&self) -> &Theater {
        &self.theater
    }

    /// Pricing tier
    #[must_use]
    pub const fn tier(&self) -> ShowTier {
        self.tier
    }

    /// Offered start times
    #[must_use]
    pub fn show_times(&self) -> &[String] {
        &self.schedule.show_times
    }

    /// Screening date
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.schedule.date
    }

    /// Full weekday name of the screening date, e.g. `Sunday`
    #[must_use]
    pub fn day(&self) -> String {
        self.schedule.date.format("%A").to_string()
    }

    /// Flat per-seat price set by the tier
    #[must_use]
    pub const fn ticket_price(&self) -> Money {
        self.tier.ticket_price()
    }

    /// Price of `seat_count` seats, `None` on overflow
    #[must_use]
    pub fn total_price(&self, seat_count: usize) -> Option<Money> {
        self.ticket_price().checked_mul(seat_count)
    }

    /// Seats not currently booked
    #[must_use]
    pub fn available_seats(&self) -> usize {
        self.inventory.available_count()
    }

    /// Read-only view of the seats
    #[must_use]
    pub const fn inventory(&self) -> &SeatInventory {
        &self.inventory
    }

    /// Books every requested seat or none; see [`SeatInventory::reserve`]
    ///
    /// # Errors
    ///
    /// Returns the [`BookingError`] that stopped the request.
    pub fn book_seats(&mut self, seats: &[SeatNumber]) -> Result<ReservedSeats, BookingError> {
        self.inventory.reserve(seats)
    }

    /// Releases one booked seat; see [`SeatInventory::release`]
    ///
    /// # Errors
    ///
    /// Returns an advisory [`ReleaseError`] when nothing was released.
    pub fn cancel_seat(&mut self, seat: SeatNumber) -> Result<(), ReleaseError> {
        self.inventory.release(seat)
    }

    /// Releases every booked seat, returning how many were freed
    pub fn cancel_all(&mut self) -> usize {
        self.inventory.release_all()
    }

    /// Multi-line summary: venue and title, free seats, date, day and times
    #[must_use]
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("{} - {}", self.theater.name, self.movie.title),
            format!("Available Seats: {}", self.available_seats()),
            format!("Show Date: {}", self.date()),
            format!("Show Day: {}", self.day()),
            "Showtimes: ".to_string(),
        ];
        lines.extend(
            self.show_times()
                .iter()
                .enumerate()
                .map(|(i, time)| format!("{}. {time}", i + 1)),
        );
        lines.push(String::new());
        lines.join("\n")
    }
}
