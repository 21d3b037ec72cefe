//! Money value object held in minor currency units.

use serde::{Serialize, Serializer};
use std::fmt;

use super::ValidationError;

/// An amount of money in minor units (cents).
///
/// Serializes as a major-unit number (`2000` cents is written as `20.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates an amount from minor units.
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts a major-unit price to minor units, rounding to the nearest cent.
    pub fn from_major(major: f64, field: &str) -> Result<Self, ValidationError> {
        if !major.is_finite() {
            return Err(ValidationError::invalid_format(field, "must be a finite number"));
        }
        if major < 0.0 {
            return Err(ValidationError::not_positive(field));
        }
        let minor = (major * 100.0).round();
        if minor > i64::MAX as f64 {
            return Err(ValidationError::invalid_format(field, "amount too large"));
        }
        Ok(Self(minor as i64))
    }

    /// Amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Amount in major units.
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn converts_whole_price_to_cents() {
        assert_eq!(Money::from_major(20.0, "price").unwrap().minor_units(), 2000);
    }

    #[test]
    fn rounds_fractional_cents() {
        assert_eq!(Money::from_major(19.99, "price").unwrap().minor_units(), 1999);
        assert_eq!(Money::from_major(12.3456, "price").unwrap().minor_units(), 1235);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Money::from_major(-1.0, "price").is_err());
        assert!(Money::from_major(f64::NAN, "price").is_err());
        assert!(Money::from_major(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn zero_is_not_positive() {
        assert!(!Money::from_major(0.0, "price").unwrap().is_positive());
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_minor(2005).to_string(), "20.05");
    }

    #[test]
    fn serializes_as_major_units() {
        let json = serde_json::to_value(Money::from_minor(2000)).unwrap();
        assert_eq!(json, serde_json::json!(20.0));
    }

    proptest! {
        #[test]
        fn whole_cent_prices_survive_conversion(cents in 0i64..10_000_000) {
            let major = cents as f64 / 100.0;
            let money = Money::from_major(major, "price").unwrap();
            prop_assert_eq!(money.minor_units(), cents);
            prop_assert_eq!(Money::from_minor(money.minor_units()).as_major(), major);
        }
    }
}
