//! Domain value types shared by the inventory, catalog and booking flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Position of a show within its [`Catalog`](crate::catalog::Catalog)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShowId(usize);

impl ShowId {
    /// Creates a `ShowId` from a catalog position
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the catalog position
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "show-{}", self.0)
    }
}

/// A 1-based seat number within one show's inventory
///
/// Any value can be constructed; whether it names a real seat is decided by
/// the inventory it is used against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatNumber(u32);

impl SeatNumber {
    /// Creates a new `SeatNumber`
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the seat number
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeatNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

// ============================================================================
// Capacity and Money
// ============================================================================

/// Number of seats a show holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capacity(pub u32);

impl Capacity {
    /// Creates a new `Capacity`
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the capacity value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents money in minor units (paise, cents) to avoid floating-point errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a `Money` value from whole currency units
    ///
    /// Returns `None` if the conversion would overflow.
    #[must_use]
    pub const fn from_major(major: u64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Returns the whole currency units (rounded down)
    #[must_use]
    pub const fn major(&self) -> u64 {
        self.0 / 100
    }

    /// Multiplies by a quantity with overflow checking
    #[must_use]
    pub fn checked_mul(self, quantity: usize) -> Option<Self> {
        let quantity = u64::try_from(quantity).ok()?;
        self.0.checked_mul(quantity).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.0 % 100)
    }
}

// ============================================================================
// Show tiers and viewing options
// ============================================================================

/// Pricing tier of a show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowTier {
    /// Standard screens
    Regular,
    /// Premium screens
    Premium,
}

impl ShowTier {
    /// Flat ticket price for this tier
    #[must_use]
    pub const fn ticket_price(self) -> Money {
        match self {
            Self::Regular => Money::from_minor(15_000),
            Self::Premium => Money::from_minor(25_000),
        }
    }
}

impl fmt::Display for ShowTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Premium => write!(f, "Premium"),
        }
    }
}

/// Projection format picked at booking time; display only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewingOption {
    /// Flat projection
    TwoD,
    /// Stereoscopic projection
    ThreeD,
}

impl fmt::Display for ViewingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoD => write!(f, "2D"),
            Self::ThreeD => write!(f, "3D"),
        }
    }
}

// ============================================================================
// Customers
// ============================================================================

/// Identity captured at the start of a session (not validated)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    /// Display name
    pub name: String,
    /// Phone number or other contact
    pub contact: String,
    /// Email address
    pub email: String,
}

impl Customer {
    /// Creates a new `Customer`
    #[must_use]
    pub fn new(name: impl Into<String>, contact: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            email: email.into(),
        }
    }
}
