//! Metric names and descriptions shared by the store and the booking crate.
//!
//! Counters are recorded through the `metrics` facade. Without an installed
//! recorder they are no-ops, so the library never requires an exporter; an
//! embedding application can install whichever recorder it prefers and call
//! [`register_metrics`] once to attach descriptions.

use metrics::describe_counter;

// Re-export metrics macros for use in other modules
pub use metrics::counter;

/// Actions processed by a [`Store`](crate::Store), including effect feedback.
pub const STORE_ACTIONS_PROCESSED: &str = "store_actions_processed_total";

/// Effects executed by a [`Store`](crate::Store).
pub const STORE_EFFECTS_EXECUTED: &str = "store_effects_executed_total";

/// Seats flipped from free to occupied.
pub const SEATS_RESERVED: &str = "seats_reserved_total";

/// Seats flipped from occupied back to free.
pub const SEATS_RELEASED: &str = "seats_released_total";

/// Booking requests rejected by seat inventory validation.
pub const BOOKINGS_REJECTED: &str = "bookings_rejected_total";

/// Attach descriptions to every counter this workspace records.
pub fn register_metrics() {
    describe_counter!(
        STORE_ACTIONS_PROCESSED,
        "Total number of actions reduced by a store"
    );
    describe_counter!(
        STORE_EFFECTS_EXECUTED,
        "Total number of effects executed by a store"
    );
    describe_counter!(SEATS_RESERVED, "Total number of seats reserved");
    describe_counter!(SEATS_RELEASED, "Total number of seats released");
    describe_counter!(
        BOOKINGS_REJECTED,
        "Total number of booking requests rejected"
    );
}
