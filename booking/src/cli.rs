//! Interactive console session: choose a show, book seats, optionally cancel.
//!
//! [`Session`] is generic over its input and output so the whole dialogue can
//! be scripted in tests. Every booking and cancellation goes through the
//! [`BookingStore`]; the session only keeps track of what this customer asked for.

use crate::booking::{BookingAction, BookingStore};
use crate::catalog::CatalogError;
use crate::inventory::{BookingError, ReservedSeats};
use crate::payment::PaymentReceipt;
use crate::types::{Customer, SeatNumber, ShowId, ViewingOption};
use chrono::NaiveDate;
use marquee_runtime::StoreError;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Errors that end a session early
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended before the dialogue finished
    #[error("Input closed before the session finished")]
    InputClosed,

    /// The booking store is unusable
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The chosen combination has no show
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// What happened during one session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Identity entered at the start
    pub customer: Customer,
    /// Show the customer picked
    pub show: ShowId,
    /// Chosen language (display only)
    pub language: String,
    /// Chosen screening date
    pub date: NaiveDate,
    /// Chosen viewing option (display only)
    pub viewing: ViewingOption,
    /// Chosen start time (display only)
    pub show_time: String,
    /// Outcome of the booking request
    pub booking: Result<ReservedSeats, BookingError>,
    /// Payment receipt, present when seats were booked
    pub receipt: Option<PaymentReceipt>,
    /// Seats released in the cancellation round
    pub cancelled: Vec<SeatNumber>,
}

/// One interactive booking dialogue
pub struct Session<'a, R, W> {
    store: &'a BookingStore,
    currency: String,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session reading from `input` and writing to `output`
    #[must_use]
    pub fn new(store: &'a BookingStore, currency: impl Into<String>, input: R, output: W) -> Self {
        Self {
            store,
            currency: currency.into(),
            input,
            output,
        }
    }

    /// Runs the dialogue to the end
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InputClosed`] when input runs out, or the I/O,
    /// store or catalog error that stopped the session.
    #[tracing::instrument(skip(self), name = "booking_session")]
    pub fn run(mut self) -> Result<SessionSummary, CliError> {
        let customer = Customer::new(
            self.prompt("Enter your name: ")?,
            self.prompt("Enter your contact number: ")?,
            self.prompt("Enter your email ID: ")?,
        );
        tracing::info!(customer = %customer.name, "Session started");

        // Movie
        let movies = self.store.state(|s| s.catalog.movies().to_vec())?;
        writeln!(self.output, "Available Movies:")?;
        for (i, movie) in movies.iter().enumerate() {
            writeln!(self.output, "{}. {} - Ratings {}", i + 1, movie.title, movie.rating)?;
            writeln!(self.output, "Languages available: {}", movie.languages.join(", "))?;
        }
        let movie = self.choose(&format!("Choose a movie (1-{}): ", movies.len()), movies.len())?;

        // Theater
        let theaters = self.store.state(|s| s.catalog.theaters().to_vec())?;
        writeln!(self.output, "Available Theaters:")?;
        for (i, theater) in theaters.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, theater.name)?;
        }
        let theater = self.choose(&format!("Choose a theater (1-{}): ", theaters.len()), theaters.len())?;

        // Language
        let languages = movies
            .get(movie)
            .map(|m| m.languages.clone())
            .unwrap_or_default();
        writeln!(self.output, "Available Languages:")?;
        for (i, language) in languages.iter().enumerate() {
            writeln!(self.output, "{}. {language}", i + 1)?;
        }
        let language = self.choose("Choose a language: ", languages.len())?;
        let language = languages.get(language).cloned().unwrap_or_default();

        // Date
        let dates = self.store.state(|s| s.catalog.show_dates())?;
        writeln!(self.output, "Available Show Dates and Days:")?;
        for (i, date) in dates.iter().enumerate() {
            writeln!(self.output, "{}. {date} ({})", i + 1, date.format("%A"))?;
        }
        let date = self.choose(&format!("Choose a date and day (1-{}): ", dates.len()), dates.len())?;
        let date = dates.get(date).copied().unwrap_or_default();

        let show = self.store.state(|s| s.catalog.show_for(movie, theater, date))??;
        let (details, show_times, price, free_seats) = self.store.state(|s| {
            s.catalog.show(show).map(|show| {
                (
                    show.describe(),
                    show.show_times().to_vec(),
                    show.ticket_price(),
                    show.inventory().free_seats().collect::<Vec<_>>(),
                )
            })
        })??;
        write!(self.output, "{details}")?;

        // Viewing option
        writeln!(self.output, "Available Viewing Options:")?;
        writeln!(self.output, "1. 2D")?;
        writeln!(self.output, "2. 3D (if available)")?;
        let viewing = match self.choose("Choose a viewing option: ", 2)? {
            0 => ViewingOption::TwoD,
            _ => ViewingOption::ThreeD,
        };

        // Show time
        writeln!(self.output, "Available Show Times:")?;
        for (i, time) in show_times.iter().enumerate() {
            writeln!(self.output, "{}. {time}", i + 1)?;
        }
        let show_time = self.choose(&format!("Choose a show time (1-{}): ", show_times.len()), show_times.len())?;
        let show_time = show_times.get(show_time).cloned().unwrap_or_default();

        writeln!(self.output, "Ticket Price: {}{price}", self.currency)?;
        writeln!(self.output, "Available Seats: ")?;
        let listing: Vec<String> = free_seats.iter().map(ToString::to_string).collect();
        writeln!(self.output, "{}", listing.join(" "))?;

        // Seats
        let count: usize = self.read_number("Enter the number of seats you want to book: ")?;
        let mut requested: Vec<SeatNumber> = Vec::new();
        while requested.len() < count {
            let seat: SeatNumber = self.read_number(&format!("Enter seat number for seat {}: ", requested.len() + 1))?;
            if requested.contains(&seat) {
                writeln!(self.output, "You have already chosen this seat. Please choose a different seat.")?;
                continue;
            }
            requested.push(seat);
        }

        self.store.send(BookingAction::BookSeats {
            show,
            customer: customer.clone(),
            seats: requested,
        })?;
        let (booking, receipt) = self.store.state(|s| {
            s.activity(&customer).map_or((Ok(ReservedSeats::default()), None), |activity| {
                let booking = activity
                    .last_booking
                    .clone()
                    .unwrap_or(Ok(ReservedSeats::default()));
                (booking, activity.last_receipt.clone())
            })
        })?;

        let mut booked: Vec<SeatNumber> = Vec::new();
        match &booking {
            Ok(seats) => {
                writeln!(self.output, "Seats {seats} successfully booked for {}", customer.name)?;
                if let Some(receipt) = &receipt {
                    writeln!(
                        self.output,
                        "Payment of {}{} processed successfully.",
                        self.currency, receipt.amount
                    )?;
                }
                writeln!(self.output, "Booking confirmed for {}!", customer.name)?;
                writeln!(self.output, "Movie: {}", movies.get(movie).map_or("", |m| m.title.as_str()))?;
                writeln!(self.output, "Theater: {}", theaters.get(theater).map_or("", |t| t.name.as_str()))?;
                writeln!(self.output, "Date: {date}")?;
                writeln!(self.output, "Day: {}", date.format("%A"))?;
                writeln!(self.output, "Language: {language}")?;
                writeln!(self.output, "Viewing Option: {viewing}")?;
                writeln!(self.output, "Show Time: {show_time}")?;
                writeln!(self.output, "Seats Booked: {seats}")?;
                booked.extend(seats.iter());
            },
            Err(error) => writeln!(self.output, "{error}")?,
        }

        let cancelled = self.cancellation_round(show, &customer, &booked)?;

        tracing::info!(customer = %customer.name, show = %show, "Session finished");
        Ok(SessionSummary {
            customer,
            show,
            language,
            date,
            viewing,
            show_time,
            booking,
            receipt,
            cancelled,
        })
    }

    /// Offers to cancel some or all of `booked`; returns the seats released
    fn cancellation_round(
        &mut self,
        show: ShowId,
        customer: &Customer,
        booked: &[SeatNumber],
    ) -> Result<Vec<SeatNumber>, CliError> {
        let answer = self.prompt("Do you want to cancel any booked seats? (yes/no/all): ")?;

        if answer.eq_ignore_ascii_case("all") {
            self.store.send(BookingAction::CancelAll {
                show,
                customer: customer.clone(),
            })?;
            writeln!(self.output, "All tickets canceled for {}", customer.name)?;
            return Ok(booked.to_vec());
        }

        if !answer.eq_ignore_ascii_case("yes") {
            return Ok(Vec::new());
        }

        let count: usize = self.read_number("Enter the number of seats to cancel: ")?;
        if count > booked.len() {
            writeln!(self.output, "Error: You cannot cancel more seats than you booked.")?;
            return Ok(Vec::new());
        }

        let mut chosen: Vec<SeatNumber> = Vec::new();
        while chosen.len() < count {
            let seat: SeatNumber =
                self.read_number(&format!("Enter seat number to cancel (seat {}): ", chosen.len() + 1))?;
            if !booked.contains(&seat) || chosen.contains(&seat) {
                writeln!(
                    self.output,
                    "Error: Seat {seat} is either not booked or already selected for cancellation."
                )?;
                continue;
            }
            chosen.push(seat);
        }

        self.store.send(BookingAction::CancelSeats {
            show,
            customer: customer.clone(),
            seats: chosen,
        })?;
        let outcomes = self.store.state(|s| {
            s.activity(customer)
                .map(|activity| activity.last_release.clone())
                .unwrap_or_default()
        })?;

        let mut released = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(seat) => {
                    writeln!(self.output, "Seat {seat} booking canceled for {}", customer.name)?;
                    released.push(seat);
                },
                Err(error) => writeln!(self.output, "{error}")?,
            }
        }
        writeln!(self.output, "Cancellation completed for seats: {}", seat_list(&released))?;

        Ok(released)
    }

    fn read_line(&mut self) -> Result<String, CliError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, text: &str) -> Result<String, CliError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompts until the answer parses as `T`
    fn read_number<T: FromStr>(&mut self, text: &str) -> Result<T, CliError> {
        loop {
            let answer = self.prompt(text)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Prompts until the answer is in `1..=count`; returns it 0-based
    fn choose(&mut self, text: &str, count: usize) -> Result<usize, CliError> {
        loop {
            let choice: usize = self.read_number(text)?;
            if (1..=count).contains(&choice) {
                return Ok(choice - 1);
            }
            writeln!(self.output, "Invalid choice. Please choose between 1 and {count}.")?;
        }
    }
}

/// Bracketed seat list, e.g. `[5, 12]`
fn seat_list(seats: &[SeatNumber]) -> String {
    let seats: Vec<String> = seats.iter().map(ToString::to_string).collect();
    format!("[{}]", seats.join(", "))
}
