//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input does not start with the +7 country prefix.
    #[error("phone must start with +7")]
    MissingPrefix,
    /// The subscriber part is not exactly ten digits.
    #[error("phone must have exactly {expected} digits after +7")]
    WrongLength {
        /// Required number of digits after the prefix.
        expected: usize,
    },
    /// The subscriber part contains a non-digit character.
    #[error("phone may only contain digits after +7")]
    InvalidDigit,
}

/// A subscriber phone number in the `+7XXXXXXXXXX` format.
///
/// Accounts are keyed by phone as well as email, so the accepted format is
/// deliberately rigid: the `+7` country prefix followed by exactly ten
/// digits, no separators.
///
/// ## Examples
///
/// ```
/// use bigbazar_core::Phone;
///
/// assert!(Phone::parse("+71234567890").is_ok());
///
/// assert!(Phone::parse("71234567890").is_err());   // missing prefix
/// assert!(Phone::parse("+7123456789").is_err());   // too short
/// assert!(Phone::parse("+7123456789a").is_err());  // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Required country prefix.
    pub const PREFIX: &'static str = "+7";

    /// Required number of digits after the prefix.
    pub const SUBSCRIBER_DIGITS: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not start with `+7`
    /// - Does not have exactly ten characters after the prefix
    /// - Contains anything other than ASCII digits after the prefix
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix(Self::PREFIX).ok_or(PhoneError::MissingPrefix)?;

        if digits.len() != Self::SUBSCRIBER_DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::SUBSCRIBER_DIGITS,
            });
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("+71234567890").is_ok());
        assert!(Phone::parse("+70000000000").is_ok());
        assert!(Phone::parse("+79999999999").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            Phone::parse("71234567890"),
            Err(PhoneError::MissingPrefix)
        ));
        assert!(matches!(
            Phone::parse("+81234567890"),
            Err(PhoneError::MissingPrefix)
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Phone::parse("+7123456789"),
            Err(PhoneError::WrongLength { .. })
        ));
        assert!(matches!(
            Phone::parse("+712345678901"),
            Err(PhoneError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_digit() {
        assert!(matches!(
            Phone::parse("+7123456789a"),
            Err(PhoneError::InvalidDigit)
        ));
        assert!(matches!(
            Phone::parse("+7 123456789"),
            Err(PhoneError::InvalidDigit)
        ));
    }

    #[test]
    fn test_display() {
        let phone = Phone::parse("+71234567890").unwrap();
        assert_eq!(format!("{phone}"), "+71234567890");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+71234567890").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+71234567890\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
