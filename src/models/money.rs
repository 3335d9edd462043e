//! Money type for representing currency amounts
//!
//! Amounts are held as exact decimals so that summing many records never
//! drifts and the total does not depend on record order. Rounding to cents
//! happens only when an amount is shown.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monetary amount in currency units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use expense_reporter::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The amount rounded to whole cents, half away from zero
    pub fn cents(&self) -> i128 {
        self.rounded().mantissa()
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// The amount in currency units as a float, for charts and ratios
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Sum of two amounts, `None` when the result is not representable
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", ".5", "+3".
    /// All decimal places are kept.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = s.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let (units_str, fraction_str) = match s.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (units_str.is_empty() && fraction_str.is_empty())
            || !all_digits(units_str)
            || !all_digits(fraction_str)
        {
            return Err(invalid());
        }

        let units = if units_str.is_empty() { "0" } else { units_str };
        let normalized = if fraction_str.is_empty() {
            units.to_string()
        } else {
            format!("{}.{}", units, fraction_str)
        };
        let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{}", symbol, rounded.abs())
        } else {
            format!("{}{}", symbol, rounded.abs())
        }
    }

    /// Two decimal places, half away from zero
    fn rounded(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-{}", rounded.abs())
        } else {
            write!(f, "{}", rounded.abs())
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Money(iter.fold(Decimal::ZERO, |acc, m| acc.saturating_add(m.0)))
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
