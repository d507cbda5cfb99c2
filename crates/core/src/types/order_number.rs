//! Human-facing order numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "LYN-";

const SUFFIX_LEN: usize = 8;
const SUFFIX_MODULUS: i64 = 100_000_000;

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// The input does not start with `LYN-`.
    #[error("order number must start with LYN-")]
    MissingPrefix,
    /// The part after the prefix is not exactly eight ASCII digits.
    #[error("order number must end in 8 digits")]
    InvalidDigits,
}

/// A customer-facing order number such as `LYN-12345678`.
///
/// The digits are the last eight decimal digits of the millisecond timestamp
/// at submission. Two checkouts in the same millisecond (or 10^8 ms apart)
/// produce the same number, so uniqueness must be enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Derive an order number from a millisecond timestamp.
    #[must_use]
    pub fn from_timestamp_millis(timestamp_millis: i64) -> Self {
        let digits = timestamp_millis.rem_euclid(SUFFIX_MODULUS);
        Self(format!("{ORDER_NUMBER_PREFIX}{digits:08}"))
    }

    /// Parse an order number read back from the data service or typed by a
    /// customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the suffix is not eight
    /// digits.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let digits = s
            .strip_prefix(ORDER_NUMBER_PREFIX)
            .ok_or(OrderNumberError::MissingPrefix)?;
        if digits.len() != SUFFIX_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = OrderNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
