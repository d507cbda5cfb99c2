//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront amounts are US dollars, so a [`Price`] carries no currency
//! code. Arithmetic stays exact (`rust_decimal`); rounding to cents happens only
//! where a value is persisted or displayed.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-currency-tagged dollar amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        let magnitude = cents.unsigned_abs();
        Self(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            cents < 0,
            2,
        ))
    }

    /// Create a price from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Round half away from zero to whole cents.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.round_to_cents().0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_dollars(30).times(2), Price::from_dollars(45)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_dollars(105));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::from_cents(8999).to_string(), "$89.99");
        assert_eq!(Price::from_dollars(10).to_string(), "$10.00");
        assert_eq!(Price::new(Decimal::new(1005, 3)).to_string(), "$1.01");
    }

    #[test]
    fn test_is_negative() {
        assert!(!Price::ZERO.is_negative());
        assert!(Price::from_cents(-1).is_negative());
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("89.99").unwrap();
        assert_eq!(price, Price::from_cents(8999));
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_dollars(50) < Price::from_dollars(200));
    }
}
