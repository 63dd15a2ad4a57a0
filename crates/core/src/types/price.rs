//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount has more than two fractional digits.
    #[error("price must have at most {max} fractional digits")]
    TooManyFractionalDigits {
        /// Maximum allowed fractional digits.
        max: u32,
    },
    /// The amount exceeds the largest storable value.
    #[error("price must be at most {max}")]
    TooLarge {
        /// Largest storable amount.
        max: Decimal,
    },
}

/// A product price.
///
/// Wraps a [`Decimal`] amount and enforces the storage invariants up front:
/// strictly positive, at most two fractional digits, and within the range of
/// a `NUMERIC(10, 2)` column.
///
/// ## Examples
///
/// ```
/// use bigbazar_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1999, 2)).unwrap(); // 19.99
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!(Price::new(Decimal::ZERO).is_err());
/// assert!(Price::new(Decimal::new(-100, 2)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Maximum fractional digits (kopecks/cents).
    pub const MAX_FRACTIONAL_DIGITS: u32 = 2;

    /// Largest storable amount (`NUMERIC(10, 2)`).
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2); // 99_999_999.99

    /// Validate a `Decimal` amount as a `Price`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount:
    /// - Is zero or negative
    /// - Has more than two fractional digits
    /// - Exceeds 99 999 999.99
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        // Trailing zeros don't count: 10.5000 is a valid 10.50
        if amount.normalize().scale() > Self::MAX_FRACTIONAL_DIGITS {
            return Err(PriceError::TooManyFractionalDigits {
                max: Self::MAX_FRACTIONAL_DIGITS,
            });
        }

        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge {
                max: Self::MAX_AMOUNT,
            });
        }

        Ok(Self(amount))
    }

    /// Returns the amount as a `Decimal`.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prices() {
        assert!(Price::new(Decimal::new(1, 2)).is_ok()); // 0.01
        assert!(Price::new(Decimal::new(10_000, 2)).is_ok()); // 100.00
        assert!(Price::new(Decimal::new(9_999_999_999, 2)).is_ok()); // 99_999_999.99
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            Price::new(Decimal::ZERO),
            Err(PriceError::NotPositive)
        ));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-100, 2)),
            Err(PriceError::NotPositive)
        ));
    }

    #[test]
    fn test_too_many_fractional_digits() {
        assert!(matches!(
            Price::new(Decimal::new(1_005, 3)), // 1.005
            Err(PriceError::TooManyFractionalDigits { .. })
        ));
    }

    #[test]
    fn test_trailing_zeros_accepted() {
        // 10.5000 normalizes to 10.5
        let price = Price::new(Decimal::new(105_000, 4)).unwrap();
        assert_eq!(price.amount(), Decimal::new(105, 1));
    }

    #[test]
    fn test_too_large_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(10_000_000_000, 2)), // 100_000_000.00
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_max_amount_constant() {
        assert_eq!(Price::MAX_AMOUNT, Decimal::new(9_999_999_999, 2));
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(2550, 2)).unwrap();
        assert_eq!(price.to_string(), "25.50");
    }
}
