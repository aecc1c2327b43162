//! Payment acknowledgment for completed bookings.
//!
//! No money moves: a booking is confirmed by acknowledging the amount due.
//! The gateway is a trait so the reducer can be tested without console output.

use crate::types::{Customer, Money};
use chrono::{DateTime, Utc};
use marquee_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Proof that a payment was acknowledged
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Gateway reference, e.g. `PAY-000001`
    pub reference: String,
    /// Amount acknowledged
    pub amount: Money,
    /// Name of the paying customer
    pub customer_name: String,
    /// When the acknowledgment happened
    pub acknowledged_at: DateTime<Utc>,
}

/// Payment gateway trait
///
/// Acknowledgment cannot fail.
pub trait PaymentGateway: Send + Sync {
    /// Acknowledge `amount` owed by `customer`
    fn acknowledge(&self, customer: &Customer, amount: Money) -> PaymentReceipt;
}

/// Gateway that logs every acknowledgment and numbers receipts sequentially
pub struct ConsolePaymentGateway {
    clock: Arc<dyn Clock>,
    sequence: AtomicU64,
}

impl ConsolePaymentGateway {
    /// Creates a new console gateway
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(clock: Arc<dyn Clock>) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(clock))
    }
}

impl std::fmt::Debug for ConsolePaymentGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePaymentGateway")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl PaymentGateway for ConsolePaymentGateway {
    fn acknowledge(&self, customer: &Customer, amount: Money) -> PaymentReceipt {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let reference = format!("PAY-{sequence:06}");

        tracing::info!(
            reference = %reference,
            customer = %customer.name,
            amount_minor = amount.minor(),
            "Payment acknowledged"
        );

        PaymentReceipt {
            reference,
            amount,
            customer_name: customer.name.clone(),
            acknowledged_at: self.clock.now(),
        }
    }
}

/// Gateway that keeps every acknowledgment in memory
#[derive(Debug, Default)]
pub struct RecordingPaymentGateway {
    receipts: Mutex<Vec<PaymentReceipt>>,
}

impl RecordingPaymentGateway {
    /// Creates an empty recording gateway
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receipts issued so far, oldest first
    #[must_use]
    pub fn receipts(&self) -> Vec<PaymentReceipt> {
        self.receipts
            .lock()
            .map(|receipts| receipts.clone())
            .unwrap_or_default()
    }
}

impl PaymentGateway for RecordingPaymentGateway {
    fn acknowledge(&self, customer: &Customer, amount: Money) -> PaymentReceipt {
        let mut receipts = self
            .receipts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let receipt = PaymentReceipt {
            reference: format!("REC-{}", receipts.len() + 1),
            amount,
            customer_name: customer.name.clone(),
            acknowledged_at: DateTime::<Utc>::default(),
        };
        receipts.push(receipt.clone());
        receipt
    }
}
