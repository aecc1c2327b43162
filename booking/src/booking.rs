//! Booking reducer: books and cancels seats against the catalog's shows.
//!
//! Commands mutate a show's inventory through its three entry points and are
//! then recorded as events. Events that arrive on their own (replay) re-apply
//! the same inventory change. A successful booking returns one effect that
//! acknowledges payment and feeds back [`BookingAction::PaymentAcknowledged`].

use crate::catalog::Catalog;
use crate::inventory::{BookingError, ReleaseError, ReservedSeats};
use crate::payment::{PaymentGateway, PaymentReceipt};
use crate::types::{Customer, Money, SeatNumber, ShowId};
use chrono::{DateTime, Utc};
use marquee_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use marquee_runtime::metrics::{counter, BOOKINGS_REJECTED, SEATS_RELEASED, SEATS_RESERVED};
use marquee_runtime::Store;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Actions
// ============================================================================

/// Commands and events of the booking flow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BookingAction {
    // Commands
    /// Book every seat in `seats` for `show`, or none of them
    BookSeats {
        /// Show to book
        show: ShowId,
        /// Who is booking
        customer: Customer,
        /// Requested seats in request order
        seats: Vec<SeatNumber>,
    },

    /// Release each seat in `seats` independently
    CancelSeats {
        /// Show to cancel on
        show: ShowId,
        /// Who is cancelling
        customer: Customer,
        /// Seats to release
        seats: Vec<SeatNumber>,
    },

    /// Release every occupied seat of `show`
    CancelAll {
        /// Show to clear
        show: ShowId,
        /// Who is cancelling
        customer: Customer,
    },

    // Events
    /// Seats were reserved
    SeatsBooked {
        /// Show booked
        show: ShowId,
        /// Who booked
        customer: Customer,
        /// Seats now occupied
        seats: ReservedSeats,
        /// Amount due for the booking
        amount: Money,
        /// When the booking happened
        booked_at: DateTime<Utc>,
    },

    /// A booking request was refused; nothing changed
    BookingRejected {
        /// Show requested
        show: ShowId,
        /// Who asked
        customer: Customer,
        /// Why
        error: BookingError,
    },

    /// Payment for a booking was acknowledged
    PaymentAcknowledged {
        /// Show booked
        show: ShowId,
        /// Who paid
        customer: Customer,
        /// Gateway receipt
        receipt: PaymentReceipt,
    },

    /// One seat was released
    SeatReleased {
        /// Show the seat belongs to
        show: ShowId,
        /// Who released it
        customer: Customer,
        /// Freed seat
        seat: SeatNumber,
    },

    /// One seat could not be released (advisory)
    ReleaseRejected {
        /// Show requested
        show: ShowId,
        /// Who asked
        customer: Customer,
        /// Why
        error: ReleaseError,
    },

    /// Every seat of a show was released
    AllSeatsReleased {
        /// Show cleared
        show: ShowId,
        /// Who cleared it
        customer: Customer,
        /// How many seats were occupied before
        released: usize,
    },

    /// The command could not be evaluated at all
    ValidationFailed {
        /// Error message
        error: String,
    },
}

impl BookingAction {
    /// Returns true if this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::BookSeats { .. } | Self::CancelSeats { .. } | Self::CancelAll { .. }
        )
    }

    /// Returns true if this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

// ============================================================================
// State
// ============================================================================

/// Outcome of one customer's most recent requests
///
/// Kept per customer so sessions sharing a store only ever see their own results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerActivity {
    /// Outcome of the most recent booking request
    pub last_booking: Option<Result<ReservedSeats, BookingError>>,
    /// Per-seat outcomes of the most recent cancellation request
    pub last_release: Vec<Result<SeatNumber, ReleaseError>>,
    /// Seats freed by the most recent cancel-all
    pub last_release_all: Option<usize>,
    /// Payment for the most recent successful booking
    pub last_receipt: Option<PaymentReceipt>,
}

/// Catalog, booked seats and per-customer outcomes
#[derive(Clone, Debug)]
pub struct BookingState {
    /// Shows and their inventories
    pub catalog: Catalog,
    /// Seats booked through this state, per show, in booking order
    pub bookings: HashMap<ShowId, Vec<SeatNumber>>,
    /// Outcomes of each customer's latest requests
    pub activity: HashMap<Customer, CustomerActivity>,
    /// Acknowledged payments, oldest first
    pub receipts: Vec<PaymentReceipt>,
    /// Last command that could not be evaluated
    pub last_error: Option<String>,
}

impl BookingState {
    /// Creates a state over `catalog` with no bookings
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            bookings: HashMap::new(),
            activity: HashMap::new(),
            receipts: Vec::new(),
            last_error: None,
        }
    }

    /// Seats booked for `show`, in booking order
    #[must_use]
    pub fn booked_seats(&self, show: ShowId) -> &[SeatNumber] {
        self.bookings.get(&show).map_or(&[], Vec::as_slice)
    }

    /// Latest outcomes for `customer`, if they have sent anything
    #[must_use]
    pub fn activity(&self, customer: &Customer) -> Option<&CustomerActivity> {
        self.activity.get(customer)
    }

    /// Most recently acknowledged payment, across all customers
    #[must_use]
    pub fn last_receipt(&self) -> Option<&PaymentReceipt> {
        self.receipts.last()
    }

    fn activity_mut(&mut self, customer: &Customer) -> &mut CustomerActivity {
        self.activity.entry(customer.clone()).or_default()
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for booking timestamps
    pub clock: Arc<dyn Clock>,
    /// Gateway acknowledging payments
    pub payments: Arc<dyn PaymentGateway>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { clock, payments }
    }
}

/// Store running the booking reducer
pub type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the booking flow
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Records an event in the bookkeeping fields; inventory is not touched
    fn apply_event(state: &mut BookingState, action: &BookingAction) {
        match action {
            BookingAction::SeatsBooked {
                show, customer, seats, ..
            } => {
                state
                    .bookings
                    .entry(*show)
                    .or_default()
                    .extend(seats.iter());
                let activity = state.activity_mut(customer);
                activity.last_booking = Some(Ok(seats.clone()));
                activity.last_receipt = None;
                state.last_error = None;
            },
            BookingAction::BookingRejected { customer, error, .. } => {
                state.activity_mut(customer).last_booking = Some(Err(*error));
                state.last_error = None;
            },
            BookingAction::PaymentAcknowledged { customer, receipt, .. } => {
                state.activity_mut(customer).last_receipt = Some(receipt.clone());
                state.receipts.push(receipt.clone());
            },
            BookingAction::SeatReleased { show, customer, seat } => {
                if let Some(booked) = state.bookings.get_mut(show) {
                    booked.retain(|s| s != seat);
                }
                state.activity_mut(customer).last_release.push(Ok(*seat));
                state.last_error = None;
            },
            BookingAction::ReleaseRejected { customer, error, .. } => {
                state.activity_mut(customer).last_release.push(Err(*error));
                state.last_error = None;
            },
            BookingAction::AllSeatsReleased {
                show,
                customer,
                released,
            } => {
                state.bookings.remove(show);
                state.activity_mut(customer).last_release_all = Some(*released);
                state.last_error = None;
            },
            BookingAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            BookingAction::BookSeats { .. }
            | BookingAction::CancelSeats { .. }
            | BookingAction::CancelAll { .. } => {},
        }
    }

    fn fail(state: &mut BookingState, error: String) -> SmallVec<[Effect<BookingAction>; 4]> {
        tracing::warn!(error = %error, "Booking command could not be evaluated");
        Self::apply_event(state, &BookingAction::ValidationFailed { error });
        SmallVec::new()
    }

    fn book_seats(
        state: &mut BookingState,
        show_id: ShowId,
        customer: Customer,
        seats: &[SeatNumber],
        env: &BookingEnvironment,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let show = match state.catalog.show_mut(show_id) {
            Ok(show) => show,
            Err(error) => return Self::fail(state, error.to_string()),
        };

        let Some(amount) = show.total_price(seats.len()) else {
            return Self::fail(state, format!("Booking amount for {} seats overflows", seats.len()));
        };

        let reserved = match show.book_seats(seats) {
            Ok(reserved) => reserved,
            Err(error) => {
                tracing::info!(show = %show_id, customer = %customer.name, error = %error, "Booking rejected");
                counter!(BOOKINGS_REJECTED).increment(1);
                Self::apply_event(
                    state,
                    &BookingAction::BookingRejected {
                        show: show_id,
                        customer,
                        error,
                    },
                );
                return SmallVec::new();
            },
        };

        tracing::info!(
            show = %show_id,
            customer = %customer.name,
            seats = %reserved,
            amount = %amount,
            "Seats booked"
        );
        counter!(SEATS_RESERVED).increment(u64::try_from(reserved.len()).unwrap_or(u64::MAX));

        let paid = !reserved.is_empty();
        let event = BookingAction::SeatsBooked {
            show: show_id,
            customer: customer.clone(),
            seats: reserved,
            amount,
            booked_at: env.clock.now(),
        };
        Self::apply_event(state, &event);

        if !paid {
            return SmallVec::new();
        }

        let payments = Arc::clone(&env.payments);
        smallvec![Effect::run(move || {
            let receipt = payments.acknowledge(&customer, amount);
            Some(BookingAction::PaymentAcknowledged {
                show: show_id,
                customer,
                receipt,
            })
        })]
    }

    fn cancel_seats(
        state: &mut BookingState,
        show_id: ShowId,
        customer: &Customer,
        seats: &[SeatNumber],
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let show = match state.catalog.show_mut(show_id) {
            Ok(show) => show,
            Err(error) => return Self::fail(state, error.to_string()),
        };

        let outcomes: Vec<_> = seats.iter().map(|&seat| (seat, show.cancel_seat(seat))).collect();

        state.activity_mut(customer).last_release.clear();
        for (seat, outcome) in outcomes {
            let event = match outcome {
                Ok(()) => {
                    tracing::info!(show = %show_id, seat = %seat, customer = %customer.name, "Seat released");
                    counter!(SEATS_RELEASED).increment(1);
                    BookingAction::SeatReleased {
                        show: show_id,
                        customer: customer.clone(),
                        seat,
                    }
                },
                Err(error) => {
                    tracing::info!(show = %show_id, error = %error, "Release rejected");
                    BookingAction::ReleaseRejected {
                        show: show_id,
                        customer: customer.clone(),
                        error,
                    }
                },
            };
            Self::apply_event(state, &event);
        }

        SmallVec::new()
    }

    fn cancel_all(
        state: &mut BookingState,
        show_id: ShowId,
        customer: Customer,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let released = match state.catalog.show_mut(show_id) {
            Ok(show) => show.cancel_all(),
            Err(error) => return Self::fail(state, error.to_string()),
        };

        tracing::info!(show = %show_id, released, customer = %customer.name, "All seats released");
        counter!(SEATS_RELEASED).increment(u64::try_from(released).unwrap_or(u64::MAX));
        Self::apply_event(
            state,
            &BookingAction::AllSeatsReleased {
                show: show_id,
                customer,
                released,
            },
        );

        SmallVec::new()
    }

    /// Re-applies the inventory change an event describes
    fn replay(state: &mut BookingState, event: &BookingAction) -> Result<(), String> {
        match event {
            BookingAction::SeatsBooked { show, seats, .. } => state
                .catalog
                .show_mut(*show)
                .map_err(|e| e.to_string())?
                .book_seats(seats.as_slice())
                .map(|_| ())
                .map_err(|e| e.to_string()),
            BookingAction::SeatReleased { show, seat, .. } => state
                .catalog
                .show_mut(*show)
                .map_err(|e| e.to_string())?
                .cancel_seat(*seat)
                .map_err(|e| e.to_string()),
            BookingAction::AllSeatsReleased { show, .. } => {
                state
                    .catalog
                    .show_mut(*show)
                    .map_err(|e| e.to_string())?
                    .cancel_all();
                Ok(())
            },
            _ => Ok(()),
        }
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
            BookingAction::BookSeats {
                show,
                customer,
                seats,
            } => Self::book_seats(state, show, customer, &seats, env),

            BookingAction::CancelSeats {
                show,
                customer,
                seats,
            } => Self::cancel_seats(state, show, &customer, &seats),

            BookingAction::CancelAll { show, customer } => Self::cancel_all(state, show, customer),

            // ========== Events ==========
            event => {
                if let Err(error) = Self::replay(state, &event) {
                    return Self::fail(state, format!("Cannot replay event: {error}"));
                }
                Self::apply_event(state, &event);
                SmallVec::new()
            },
        }
    }
}
