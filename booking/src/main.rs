//! Marquee console booking session.
//!
//! Reads configuration from the environment (and `.env`), builds the stock
//! catalog and runs one interactive session on stdin/stdout.

use marquee_booking::{
    BookingEnvironment, BookingReducer, BookingState, BookingStore, Catalog, CliError, Config,
    ConsolePaymentGateway, Session,
};
use marquee_core::environment::SystemClock;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = Config::from_env();

    // Initialize tracing on stderr so it never interleaves with the dialogue
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    marquee_runtime::metrics::register_metrics();

    info!(
        seats_per_show = config.seats_per_show,
        show_dates = ?config.show_dates,
        "Configuration loaded"
    );

    let catalog = Catalog::standard(&config)?;
    let clock = Arc::new(SystemClock);
    let environment = BookingEnvironment::new(clock.clone(), ConsolePaymentGateway::shared(clock));
    let store = BookingStore::new(BookingState::new(catalog), BookingReducer::new(), environment);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match Session::new(&store, config.currency.as_str(), stdin.lock(), stdout.lock()).run() {
        Ok(summary) => {
            info!(
                customer = %summary.customer.name,
                show = %summary.show,
                booked = summary.booking.is_ok(),
                cancelled = summary.cancelled.len(),
                "Session complete"
            );
            Ok(())
        },
        Err(CliError::InputClosed) => {
            warn!("Input closed, ending session");
            Ok(())
        },
        Err(error) => Err(error.into()),
    }
}
