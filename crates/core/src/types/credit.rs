//! Marketplace credit balances using decimal arithmetic.
//!
//! Vendors and shops each hold their own [`Credit`] balance. Amounts are kept
//! as [`Decimal`] with two fractional digits so they never pick up binary
//! floating point error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a credit top-up.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CreditError {
    /// Top-ups must add a strictly positive amount.
    #[error("credit amount must be greater than zero")]
    NotPositive,
    /// More than two fractional digits were supplied.
    #[error("credit amount must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed scale.
        max: u32,
    },
}

/// A credit balance or amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credit(Decimal);

impl Credit {
    /// Number of fractional digits a credit amount may carry.
    pub const SCALE: u32 = 2;

    /// The empty balance every new vendor and shop starts with.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a raw decimal without validation (balances read from storage).
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Validate an amount to be added to a balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative, or carries more
    /// than two decimal places.
    pub fn top_up(amount: Decimal) -> Result<Self, CreditError> {
        if amount <= Decimal::ZERO {
            return Err(CreditError::NotPositive);
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(CreditError::TooPrecise { max: Self::SCALE });
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Add another amount, saturating at the decimal maximum.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::fmt::Display for Credit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Credit {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Credit {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Credit {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
