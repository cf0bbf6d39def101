//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64 cents) to avoid
//! floating-point precision issues. Provides safe arithmetic and the
//! even-split primitive the daily allocation logic is built on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
///
/// Using i64 cents avoids floating-point precision issues and supports
/// amounts up to approximately $92 quadrillion (both positive and negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from dollars and cents
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Return the smaller of two amounts
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Apply a fractional weight to this amount, rounding half to even
    pub fn apply_weight(&self, weight: f64) -> Self {
        Self(round_half_even(self.0 as f64 * weight))
    }

    /// Split this amount into `parts` pieces that sum exactly to the whole.
    ///
    /// Each non-final piece is the half-to-even rounding of the exact
    /// quotient; the final piece absorbs the residual so no cents are
    /// created or lost. Works for negative amounts (the split of -n is
    /// the negated split of n).
    ///
    /// Returns an empty vector when `parts` is 0; the caller is expected
    /// to have rejected degenerate periods before reaching this point.
    pub fn split_evenly(&self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        if self.0 < 0 {
            return (-*self)
                .split_evenly(parts)
                .into_iter()
                .map(|m| -m)
                .collect();
        }

        let n = parts as i64;
        let quotient = self.0 / n;
        let remainder = self.0 % n;

        // Half-to-even rounding of total/parts, done on the rational
        // remainder to stay in integer arithmetic.
        let per_part = match (2 * remainder).cmp(&n) {
            std::cmp::Ordering::Less => quotient,
            std::cmp::Ordering::Greater => quotient + 1,
            std::cmp::Ordering::Equal => {
                if quotient % 2 == 0 {
                    quotient
                } else {
                    quotient + 1
                }
            }
        };

        let mut out = vec![Money(per_part); parts];
        out[parts - 1] = Money(self.0 - per_part * (n - 1));
        out
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);

        let cents = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let dollars: i64 = parts[0]
                .parse()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

            // Pad or truncate cents to 2 digits
            let cents_str = parts[1];
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => {
                    cents_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => cents_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            dollars * 100 + cents
        } else {
            // Integer format - assume dollars
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                * 100
        };

        Ok(Self(if negative { -cents } else { cents }))
    }
}

/// Round a value half to even ("banker's rounding")
fn round_half_even(value: f64) -> i64 {
    let floor = value.floor();
    let frac = value - floor;
    let floor = floor as i64;
    if frac > 0.5 {
        floor + 1
    } else if frac < 0.5 {
        floor
    } else if floor % 2 == 0 {
        floor
    } else {
        floor + 1
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
    }

    #[test]
    fn test_apply_weight() {
        let income = Money::from_cents(300_000); // $3000.00
        assert_eq!(income.apply_weight(0.1).cents(), 30_000);
        assert_eq!(income.apply_weight(0.0).cents(), 0);
        assert_eq!(income.apply_weight(1.0).cents(), 300_000);
    }

    #[test]
    fn test_split_evenly_exact() {
        let parts = Money::from_cents(30_000).split_evenly(30);
        assert_eq!(parts.len(), 30);
        assert!(parts.iter().all(|p| p.cents() == 1000));
    }

    #[test]
    fn test_split_evenly_residual_on_last() {
        // $100.00 over 3 days: 33.33 + 33.33 + 33.34
        let parts = Money::from_cents(10_000).split_evenly(3);
        assert_eq!(parts[0].cents(), 3333);
        assert_eq!(parts[1].cents(), 3333);
        assert_eq!(parts[2].cents(), 3334);
        assert_eq!(parts.iter().copied().sum::<Money>().cents(), 10_000);
    }

    #[test]
    fn test_split_evenly_half_to_even() {
        // 5 / 2 = 2.5 -> rounds to 2 (even); last part gets 3
        let parts = Money::from_cents(5).split_evenly(2);
        assert_eq!(parts[0].cents(), 2);
        assert_eq!(parts[1].cents(), 3);

        // 7 / 2 = 3.5 -> rounds to 4 (3 is odd); last part gets 3
        let parts = Money::from_cents(7).split_evenly(2);
        assert_eq!(parts[0].cents(), 4);
        assert_eq!(parts[1].cents(), 3);
    }

    #[test]
    fn test_split_evenly_negative() {
        let parts = Money::from_cents(-10_000).split_evenly(3);
        assert_eq!(parts.iter().copied().sum::<Money>().cents(), -10_000);
        assert!(parts.iter().all(|p| p.is_negative()));
    }

    #[test]
    fn test_split_conserves_for_all_month_lengths() {
        for days in 1..=31usize {
            let total = Money::from_cents(123_457);
            let parts = total.split_evenly(days);
            assert_eq!(parts.len(), days);
            assert_eq!(parts.iter().copied().sum::<Money>(), total);
        }
    }

    #[test]
    fn test_split_zero_parts() {
        assert!(Money::from_cents(100).split_evenly(0).is_empty());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
