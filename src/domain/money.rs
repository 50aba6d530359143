use crate::error::{EscrowError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fixed-point on-chain amount at 1/100 resolution ("cents").
///
/// This is the only representation that crosses the ledger boundary; decimal
/// currency values stay `Decimal` everywhere else for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cents(u64);

impl Cents {
    pub const ZERO: Self = Self(0);

    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: u64) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts a decimal currency value into fixed-point units.
///
/// Defined as `round(value * 100)` with round-half-up at the cent boundary,
/// computed in exact decimal arithmetic. Values that cannot be scaled fail
/// with `Precision`; values outside the `u64` range (negative included) fail
/// with `Overflow`.
pub fn to_cents(value: Decimal) -> Result<Cents> {
    let scaled = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(EscrowError::Precision(value))?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map(Cents)
        .ok_or(EscrowError::Overflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_whole_unit_conversion() {
        assert_eq!(to_cents(dec!(1.0)).unwrap(), Cents(100));
    }

    #[test]
    fn test_fractional_conversion() {
        assert_eq!(to_cents(dec!(0.05)).unwrap(), Cents(5));
        assert_eq!(to_cents(dec!(12.34)).unwrap(), Cents(1234));
    }

    #[test]
    fn test_zero() {
        assert_eq!(to_cents(Decimal::ZERO).unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_rounds_half_up_at_cent_boundary() {
        assert_eq!(to_cents(dec!(0.005)).unwrap(), Cents(1));
        assert_eq!(to_cents(dec!(0.004)).unwrap(), Cents(0));
        assert_eq!(to_cents(dec!(1.335)).unwrap(), Cents(134));
    }

    #[test]
    fn test_negative_is_out_of_range() {
        assert!(matches!(
            to_cents(dec!(-1.0)),
            Err(EscrowError::Overflow(_))
        ));
    }

    #[test]
    fn test_beyond_u64_is_out_of_range() {
        let huge = Decimal::from(u64::MAX);
        assert!(matches!(to_cents(huge), Err(EscrowError::Overflow(_))));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Cents::new(u64::MAX);
        assert!(a.checked_add(Cents::new(1)).is_none());
        assert!(a.checked_mul(2).is_none());
        assert_eq!(
            Cents::new(100).checked_mul(100),
            Some(Cents::new(10_000))
        );
    }
}
