//! Mass units and conversions
//!
//! Quantities are stored in grams. Conversion to and from kilograms only
//! happens at the edges (request parsing and response rendering).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Grams in one kilogram
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Mass unit accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(Unit::Grams),
            "kg" => Ok(Unit::Kilograms),
            other => Err(DomainError::validation(format!(
                "Unit must be either kg or g, got '{}'",
                other
            ))),
        }
    }
}

/// Converts a quantity in the given unit to grams
pub fn to_grams(quantity: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Kilograms => quantity * GRAMS_PER_KILOGRAM,
        Unit::Grams => quantity,
    }
}

/// Converts grams to kilograms
pub fn to_kilograms(quantity_grams: f64) -> f64 {
    quantity_grams / GRAMS_PER_KILOGRAM
}

/// Expresses a gram quantity in the requested unit
pub fn from_grams(quantity_grams: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Kilograms => to_kilograms(quantity_grams),
        Unit::Grams => quantity_grams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kilograms_to_grams() {
        assert_eq!(to_grams(1.5, Unit::Kilograms), 1500.0);
        assert_eq!(to_grams(20.0, Unit::Kilograms), 20000.0);
    }

    #[test]
    fn test_grams_unchanged() {
        assert_eq!(to_grams(10922.0, Unit::Grams), 10922.0);
    }

    #[test]
    fn test_to_kilograms() {
        assert_eq!(to_kilograms(1500.0), 1.5);
        assert_eq!(to_kilograms(0.0), 0.0);
    }

    #[test]
    fn test_from_grams() {
        assert_eq!(from_grams(1500.0, Unit::Kilograms), 1.5);
        assert_eq!(from_grams(1500.0, Unit::Grams), 1500.0);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("g".parse::<Unit>().unwrap(), Unit::Grams);
        assert_eq!("kg".parse::<Unit>().unwrap(), Unit::Kilograms);
        assert!("lb".parse::<Unit>().is_err());
        assert!("".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serialization() {
        assert_eq!(serde_json::to_string(&Unit::Grams).unwrap(), "\"g\"");
        assert_eq!(serde_json::to_string(&Unit::Kilograms).unwrap(), "\"kg\"");

        let unit: Unit = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(unit, Unit::Kilograms);
        assert!(serde_json::from_str::<Unit>("\"oz\"").is_err());
    }

    fn any_unit() -> impl Strategy<Value = Unit> {
        prop_oneof![Just(Unit::Grams), Just(Unit::Kilograms)]
    }

    proptest! {
        #[test]
        fn prop_kilogram_round_trip(quantity in 0.0f64..1.0e9, unit in any_unit()) {
            let grams = to_grams(quantity, unit);
            let round_trip = to_grams(to_kilograms(grams), Unit::Kilograms);
            let tolerance = grams.abs() * 1e-12 + 1e-9;

            prop_assert!((round_trip - grams).abs() <= tolerance);
        }
    }
}
