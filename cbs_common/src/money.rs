use std::{
    fmt::{self, Display},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "usd";

/// A monetary amount in minor units (cents).
///
/// Fees are stored and compared as integers to keep arithmetic exact. At the JSON boundary they
/// are represented in major units (e.g. `35.0` for 3500 cents), which is what clients send and
/// what the payment records echo back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Type)]
#[sqlx(transparent)]
pub struct Fee(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a fee: {0}")]
pub struct FeeConversionError(String);

impl Fee {
    pub const ZERO: Fee = Fee(0);

    pub fn from_minor(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a major-unit amount to a fee, rounding to the nearest cent.
    pub fn from_major(amount: f64) -> Result<Self, FeeConversionError> {
        if !amount.is_finite() {
            return Err(FeeConversionError(format!("{amount} is not a finite number")));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return Err(FeeConversionError(format!("{amount} is too large")));
        }
        Ok(Self(cents as i64))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for Fee {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl Add for Fee {
    type Output = Fee;

    fn add(self, rhs: Self) -> Self::Output {
        Fee(self.0 + rhs.0)
    }
}

impl AddAssign for Fee {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Fee {
    type Output = Fee;

    fn sub(self, rhs: Self) -> Self::Output {
        Fee(self.0 - rhs.0)
    }
}

impl SubAssign for Fee {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fee {
    type Output = Fee;

    fn neg(self) -> Self::Output {
        Fee(-self.0)
    }
}

impl Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_major())
    }
}

impl Serialize for Fee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Fee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Fee::from_major(amount).map_err(de::Error::custom)
    }
}
