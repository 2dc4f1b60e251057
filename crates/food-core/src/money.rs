//! # Money Types
//!
//! Currency and integer money for food-cart.
//! Catalog prices arrive as decimals; they are converted once, at the
//! boundary, into the smallest currency unit and all cart arithmetic is
//! done on integers from there on.

use crate::error::{FoodError, FoodResult};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
        }
    }

    fn multiplier(&self) -> f64 {
        10_f64.powi(self.decimal_places() as i32)
    }
}

impl FromStr for Currency {
    type Err = FoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            other => Err(FoodError::Configuration(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// An amount in the smallest currency unit (cents for USD).
///
/// Serializes as a bare integer. Arithmetic saturates at the `i64` bounds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from the smallest unit
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Convert a decimal catalog amount, rounding to the nearest minor unit.
    ///
    /// Rejects negative and non-finite amounts.
    pub fn from_decimal(amount: f64, currency: Currency) -> FoodResult<Self> {
        if !amount.is_finite() {
            return Err(FoodError::InvalidPrice {
                message: format!("amount is not a finite number: {}", amount),
            });
        }
        if amount < 0.0 {
            return Err(FoodError::InvalidPrice {
                message: format!("amount must not be negative: {}", amount),
            });
        }
        let minor = (amount * currency.multiplier()).round();
        if minor >= i64::MAX as f64 {
            return Err(FoodError::InvalidPrice {
                message: format!("amount is too large: {}", amount),
            });
        }
        Ok(Money(minor as i64))
    }

    /// Amount in the smallest unit
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Decimal amount for the given currency
    pub fn to_decimal(&self, currency: Currency) -> f64 {
        self.0 as f64 / currency.multiplier()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract, clamping at zero
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self, currency: Currency) -> String {
        if currency.decimal_places() == 0 {
            format!("{}{}", currency.symbol(), self.0)
        } else {
            format!("{}{:.2}", currency.symbol(), self.to_decimal(currency))
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
