//! Exact decimal quantities.
//!
//! Token amounts, commission rates and revenues arrive as decimal strings and
//! must leave as decimal strings with no precision lost on the way. [`Dec`]
//! wraps a [`BigDecimal`] and always renders in plain notation (never `1E-7`),
//! keeping the scale it was parsed with so `"0.050000000000000000"` survives
//! a round trip byte for byte.

use crate::error::StrataError;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Fractional digits kept by quotients, matching the chain's `sdk.Dec`.
pub const PRECISION: i64 = 18;

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Dec(BigDecimal);

impl Dec {
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self / rhs` rounded half-even to [`PRECISION`] places.
    ///
    /// Returns `None` when `rhs` is zero.
    pub fn checked_quo(&self, rhs: &Dec) -> Option<Dec> {
        if rhs.is_zero() {
            return None;
        }
        let q = &self.0 / &rhs.0;
        Some(Dec(q.with_scale_round(PRECISION, RoundingMode::HalfEven)))
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<BigDecimal> for Dec {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

impl From<u64> for Dec {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for Dec {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(StrataError::InvalidInput("empty decimal string".into()));
        }
        // Exponent forms parse fine in BigDecimal but never appear on the wire.
        if trimmed.contains(['e', 'E']) {
            return Err(StrataError::InvalidInput(format!(
                "decimal must be in plain notation: {trimmed}"
            )));
        }
        BigDecimal::from_str(trimmed)
            .map(Dec)
            .map_err(|e| StrataError::InvalidInput(format!("invalid decimal {trimmed:?}: {e}")))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, scale) = self.0.as_bigint_and_exponent();
        let raw = digits.to_string();
        let (sign, magnitude) = match raw.strip_prefix('-') {
            Some(m) => ("-", m),
            None => ("", raw.as_str()),
        };

        if scale <= 0 {
            let zeros = if digits.is_zero() { 0 } else { (-scale) as usize };
            return write!(f, "{sign}{magnitude}{}", "0".repeat(zeros));
        }

        let scale = scale as usize;
        if magnitude.len() > scale {
            let (int_part, frac_part) = magnitude.split_at(magnitude.len() - scale);
            write!(f, "{sign}{int_part}.{frac_part}")
        } else {
            let pad = "0".repeat(scale - magnitude.len());
            write!(f, "{sign}0.{pad}{magnitude}")
        }
    }
}

impl Add for Dec {
    type Output = Dec;

    fn add(self, rhs: Dec) -> Dec {
        Dec(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Dec> for Dec {
    type Output = Dec;

    fn add(self, rhs: &'a Dec) -> Dec {
        Dec(self.0 + &rhs.0)
    }
}

impl AddAssign<&Dec> for Dec {
    fn add_assign(&mut self, rhs: &Dec) {
        self.0 += &rhs.0;
    }
}

impl Sum for Dec {
    fn sum<I: Iterator<Item = Dec>>(iter: I) -> Self {
        iter.fold(Dec::zero(), |acc, d| acc + d)
    }
}
