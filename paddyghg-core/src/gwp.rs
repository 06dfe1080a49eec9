//! Global-warming-potential conversion.
//!
//! Simulation output reports methane as carbon mass (`kg C`) and nitrous oxide as
//! nitrogen mass (`kg N`). Converting to CO2-equivalents is a two step process:
//!
//! 1. scale the elemental mass to the mass of the whole molecule using the ratio of
//!    molar masses (16/12 for CH4, 44/28 for N2O)
//! 2. multiply by the 100-year GWP coefficient of that molecule
//!
//! $$ CH_4\text{-}eq = m_C \cdot \frac{16}{12} \cdot GWP_{CH_4} $$
//! $$ N_2O\text{-}eq = m_N \cdot \frac{44}{28} \cdot GWP_{N_2O} $$
//!
//! The GWP coefficients depend on which IPCC assessment report is used, so they are
//! carried around as an explicit [`GwpCoefficients`] value and the [`AssessmentReport`]
//! vintage is stored alongside every derived result.
//!
//! ```rust
//! use paddyghg_core::gwp::{AssessmentReport, GwpCoefficients};
//!
//! let coefficients = GwpCoefficients::for_vintage(AssessmentReport::AR5);
//! let co2eq = coefficients.ch4_to_co2eq(100.0);
//! assert!((co2eq - 3733.33).abs() < 0.01);
//! ```

use crate::errors::{GhgError, GhgResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ratio of molar masses CH4 / C
pub const CH4_C_TO_CH4: FloatValue = 16.0 / 12.0;

/// Ratio of molar masses N2O / N2
pub const N2O_N_TO_N2O: FloatValue = 44.0 / 28.0;

/// Greenhouse gas species with a GWP conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Methane, reported as carbon mass
    CH4,
    /// Nitrous oxide, reported as nitrogen mass
    N2O,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::CH4, Species::N2O];

    /// Ratio used to convert elemental mass into molecular mass
    pub fn molar_mass_ratio(&self) -> FloatValue {
        match self {
            Species::CH4 => CH4_C_TO_CH4,
            Species::N2O => N2O_N_TO_N2O,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::CH4 => write!(f, "CH4"),
            Species::N2O => write!(f, "N2O"),
        }
    }
}

/// IPCC assessment report that a set of GWP-100 coefficients is taken from
///
/// Parsed case-insensitively, both from strings and from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AssessmentReport {
    /// Fourth assessment report (2007)
    AR4,
    /// Fifth assessment report (2013), without climate-carbon feedbacks
    AR5,
    /// Fifth assessment report (2013), including climate-carbon feedbacks
    AR5Feedback,
    /// Sixth assessment report (2021)
    AR6,
    /// User supplied coefficients
    Custom,
}

impl AssessmentReport {
    /// Published (CH4, N2O) GWP-100 values
    ///
    /// Returns `None` for [`AssessmentReport::Custom`].
    pub fn published_values(&self) -> Option<(FloatValue, FloatValue)> {
        match self {
            AssessmentReport::AR4 => Some((25.0, 298.0)),
            AssessmentReport::AR5 => Some((28.0, 265.0)),
            AssessmentReport::AR5Feedback => Some((34.0, 298.0)),
            AssessmentReport::AR6 => Some((27.0, 273.0)),
            AssessmentReport::Custom => None,
        }
    }
}

impl fmt::Display for AssessmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentReport::AR4 => write!(f, "AR4"),
            AssessmentReport::AR5 => write!(f, "AR5"),
            AssessmentReport::AR5Feedback => write!(f, "AR5-feedback"),
            AssessmentReport::AR6 => write!(f, "AR6"),
            AssessmentReport::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for AssessmentReport {
    type Err = GhgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AR4" => Ok(AssessmentReport::AR4),
            "AR5" => Ok(AssessmentReport::AR5),
            "AR5-FEEDBACK" | "AR5_FEEDBACK" => Ok(AssessmentReport::AR5Feedback),
            "AR6" => Ok(AssessmentReport::AR6),
            "CUSTOM" => Ok(AssessmentReport::Custom),
            _ => Err(GhgError::UnknownAssessmentReport(s.to_string())),
        }
    }
}

impl TryFrom<String> for AssessmentReport {
    type Error = GhgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssessmentReport> for String {
    fn from(value: AssessmentReport) -> Self {
        value.to_string()
    }
}

/// GWP-100 coefficients for one assessment report
///
/// Coefficients are fixed for the lifetime of the value. Every conversion takes the
/// coefficients by reference so that two computations can never silently use different
/// vintages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGwpCoefficients")]
pub struct GwpCoefficients {
    vintage: AssessmentReport,
    /// unit: kg CO2 / kg CH4
    ch4: FloatValue,
    /// unit: kg CO2 / kg N2O
    n2o: FloatValue,
}

/// Unvalidated form of [`GwpCoefficients`] as found in serialised results
#[derive(Deserialize)]
struct RawGwpCoefficients {
    vintage: AssessmentReport,
    ch4: FloatValue,
    n2o: FloatValue,
}

impl TryFrom<RawGwpCoefficients> for GwpCoefficients {
    type Error = GhgError;

    /// Published vintages must carry their published values
    fn try_from(raw: RawGwpCoefficients) -> Result<Self, Self::Error> {
        if raw.vintage == AssessmentReport::Custom {
            return GwpCoefficients::custom(raw.ch4, raw.n2o);
        }
        let published = GwpCoefficients::for_vintage(raw.vintage);
        for species in Species::ALL {
            let value = match species {
                Species::CH4 => raw.ch4,
                Species::N2O => raw.n2o,
            };
            if value != published.coefficient(species) {
                return Err(GhgError::InvalidCoefficient {
                    species: species.to_string(),
                    value,
                });
            }
        }
        Ok(published)
    }
}

impl fmt::Display for GwpCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (CH4 {}, N2O {})", self.vintage, self.ch4, self.n2o)
    }
}

impl Default for GwpCoefficients {
    fn default() -> Self {
        Self::for_vintage(AssessmentReport::AR5)
    }
}

impl GwpCoefficients {
    /// Coefficients as published in a given assessment report
    ///
    /// [`AssessmentReport::Custom`] has no published values and falls back to AR5.
    /// Use [`GwpCoefficients::custom`] for user supplied values.
    pub fn for_vintage(vintage: AssessmentReport) -> Self {
        match vintage.published_values() {
            Some((ch4, n2o)) => Self { vintage, ch4, n2o },
            None => Self::for_vintage(AssessmentReport::AR5),
        }
    }

    /// User supplied coefficients
    pub fn custom(ch4: FloatValue, n2o: FloatValue) -> GhgResult<Self> {
        for (species, value) in [(Species::CH4, ch4), (Species::N2O, n2o)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GhgError::InvalidCoefficient {
                    species: species.to_string(),
                    value,
                });
            }
        }
        Ok(Self {
            vintage: AssessmentReport::Custom,
            ch4,
            n2o,
        })
    }

    pub fn vintage(&self) -> AssessmentReport {
        self.vintage
    }

    pub fn ch4(&self) -> FloatValue {
        self.ch4
    }

    pub fn n2o(&self) -> FloatValue {
        self.n2o
    }

    /// GWP coefficient of a species
    pub fn coefficient(&self, species: Species) -> FloatValue {
        match species {
            Species::CH4 => self.ch4,
            Species::N2O => self.n2o,
        }
    }

    /// Convert a CH4 mass expressed as carbon into CO2-equivalents
    pub fn ch4_to_co2eq(&self, mass_as_carbon: FloatValue) -> FloatValue {
        mass_as_carbon * CH4_C_TO_CH4 * self.ch4
    }

    /// Convert an N2O mass expressed as nitrogen into CO2-equivalents
    pub fn n2o_to_co2eq(&self, mass_as_nitrogen: FloatValue) -> FloatValue {
        mass_as_nitrogen * N2O_N_TO_N2O * self.n2o
    }

    /// Convert an elemental mass of `species` into CO2-equivalents
    pub fn to_co2eq(&self, species: Species, mass: FloatValue) -> FloatValue {
        match species {
            Species::CH4 => self.ch4_to_co2eq(mass),
            Species::N2O => self.n2o_to_co2eq(mass),
        }
    }
}
