//! Mass units for reporting CO2-equivalent totals.
//!
//! The core computes everything in kilograms. Regional totals are large, so the
//! presentation layer usually reports them in Mg or Gg.

use crate::errors::GhgError;
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "kg")]
    Kilogram,
    /// Megagram (tonne)
    #[serde(rename = "Mg")]
    Megagram,
    /// Gigagram (kilotonne)
    #[serde(rename = "Gg")]
    Gigagram,
}

impl MassUnit {
    /// Factor converting a mass in kg into this unit
    pub fn factor_from_kg(&self) -> FloatValue {
        match self {
            MassUnit::Kilogram => 1.0,
            MassUnit::Megagram => 1e-3,
            MassUnit::Gigagram => 1e-6,
        }
    }

    pub fn scale_kg(&self, value: FloatValue) -> FloatValue {
        value * self.factor_from_kg()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Megagram => "Mg",
            MassUnit::Gigagram => "Gg",
        }
    }

    /// Label for annual CO2-equivalent emissions (e.g. `Gg CO2-eq yr-1`)
    pub fn co2eq_rate_label(&self) -> String {
        format!("{} CO2-eq yr-1", self.symbol())
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for MassUnit {
    type Err = GhgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kg" => Ok(MassUnit::Kilogram),
            "Mg" | "t" => Ok(MassUnit::Megagram),
            "Gg" | "kt" => Ok(MassUnit::Gigagram),
            _ => Err(GhgError::Config(format!("unknown mass unit '{}'", s))),
        }
    }
}
