//! Marquee Booking - movie seat booking on the Marquee reducer architecture
//!
//! A catalog of movies and theaters schedules shows; each show owns a fixed
//! inventory of numbered seats. Customers book seats all-or-nothing, pay a flat
//! per-seat price set by the show's tier, and may cancel afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  BookingAction  ┌──────────────────┐   reserve / release   ┌───────────────┐
//! │ cli::Session │ ──────────────▶ │  BookingReducer  │ ────────────────────▶ │ SeatInventory │
//! └──────────────┘                 │  (in a Store)    │                       └───────────────┘
//!                                  └──────────────────┘
//!                                           │ Effect::Run
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │  PaymentGateway  │ ── PaymentAcknowledged ──▶ reducer
//!                                  └──────────────────┘
//! ```
//!
//! # Key Features
//!
//! ## Atomic reservation
//!
//! [`SeatInventory::reserve`] validates the whole request (capacity first,
//! then each seat in request order) before occupying anything, so a rejected
//! request never leaves a partial booking behind.
//!
//! ## Advisory cancellation
//!
//! Releasing a seat that is out of range or not booked reports a
//! [`ReleaseError`] and changes nothing; the session carries on.
//!
//! ## Tier pricing
//!
//! [`ShowTier::Regular`] seats cost 150, [`ShowTier::Premium`] seats 250.

pub mod booking;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod payment;
pub mod show;
pub mod types;

pub use booking::{
    BookingAction, BookingEnvironment, BookingReducer, BookingState, BookingStore, CustomerActivity,
};
pub use catalog::{Catalog, CatalogError, Movie, Theater};
pub use cli::{CliError, Session, SessionSummary};
pub use config::Config;
pub use inventory::{
    BookingError, InventoryError, InventorySnapshot, ReleaseError, ReservedSeats, Seat, SeatInventory, SeatStatus,
};
pub use payment::{ConsolePaymentGateway, PaymentGateway, PaymentReceipt, RecordingPaymentGateway};
pub use show::{Show, ShowSchedule};
pub use types::{Capacity, Customer, Money, SeatNumber, ShowId, ShowTier, ViewingOption};
