//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `PricePair` carried by every product (the shop sells in USD and ZWL side
//! by side).
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON decimals:                             │
//! │    2.20 × 3 = 6.6000000000000005  ❌ WRONG!                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                     │
//! │    220 × 3 = 660 cents = 6.60       ✅                                  │
//! │                                                                         │
//! │  Decimals are converted ONCE, at the wire boundary (`decimal` module). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillpoint_core::money::{Money, PricePair};
//!
//! let price = Money::from_cents(250); // 2.50
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 750);
//!
//! let pair = PricePair::new(Money::from_cents(200), Money::from_cents(5_000));
//! assert_eq!(pair.multiply_quantity(2).usd.cents(), 400);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Currency
// =============================================================================

/// The two currencies every price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar, the primary currency.
    Usd,
    /// Zimbabwean dollar, the secondary currency.
    Zwl,
}

impl Currency {
    /// ISO-style code used in labels.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Zwl => "ZWL",
        }
    }

    /// Default display prefix.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Zwl => "ZWL ",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: price corrections may be negative deltas
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No currency tag**: the owning field says which currency it is
///   (`selling_price_usd`, `PricePair::zwl`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(2, 50).cents(), 250);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(200); // 2.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount with a currency prefix, e.g. `$2.50` or `ZWL 2.50`.
    pub fn display_in(&self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            currency.symbol(),
            self.major().abs(),
            self.minor()
        )
    }

    /// Converts a wire decimal (major units) to Money, rounding to the
    /// nearest minor unit. Only the `decimal` serde adapters call this.
    fn from_wire_decimal(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!("monetary value is not finite: {}", value));
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(format!("monetary value out of range: {}", value));
        }
        Ok(Money(cents as i64))
    }

    fn to_wire_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Plain `12.34` rendering; use [`Money::display_in`] for labels.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Price Pair
// =============================================================================

/// A price quoted in both shop currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    pub usd: Money,
    pub zwl: Money,
}

impl PricePair {
    pub const fn new(usd: Money, zwl: Money) -> Self {
        PricePair { usd, zwl }
    }

    pub const fn zero() -> Self {
        PricePair {
            usd: Money::zero(),
            zwl: Money::zero(),
        }
    }

    /// Returns the amount for one currency.
    pub const fn get(&self, currency: Currency) -> Money {
        match currency {
            Currency::Usd => self.usd,
            Currency::Zwl => self.zwl,
        }
    }

    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        PricePair {
            usd: self.usd.multiply_quantity(qty),
            zwl: self.zwl.multiply_quantity(qty),
        }
    }
}

impl Add for PricePair {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        PricePair {
            usd: self.usd + other.usd,
            zwl: self.zwl + other.zwl,
        }
    }
}

impl std::iter::Sum for PricePair {
    fn sum<I: Iterator<Item = PricePair>>(iter: I) -> Self {
        iter.fold(PricePair::zero(), |acc, p| acc + p)
    }
}

// =============================================================================
// Wire Adapters
// =============================================================================

/// Serde adapters for JSON decimal prices (`"sellingPriceUSD": 2.5`).
///
/// `null` and missing values read as zero, matching how the backend leaves
/// unpriced products.
pub mod decimal {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_wire_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        match Option::<f64>::deserialize(deserializer)? {
            Some(value) => Money::from_wire_decimal(value).map_err(D::Error::custom),
            None => Ok(Money::zero()),
        }
    }

    /// Same as the parent module, but keeps `null` distinct from zero.
    pub mod option {
        use super::Money;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_wire_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            Option::<f64>::deserialize(deserializer)?
                .map(|value| Money::from_wire_decimal(value).map_err(D::Error::custom))
                .transpose()
        }
    }
}
