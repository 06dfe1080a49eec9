//! Analysis configuration
//!
//! Settings shared by every computation of one dashboard session, loaded from TOML.
//! Missing keys fall back to the defaults documented on each field.
//!
//! ```toml
//! vintage = "AR5-feedback"
//! start_year = 2000
//! end_year = 2012
//! adoption = 0.5
//! output_unit = "Gg"
//! ```

use crate::blend::AdoptionFraction;
use crate::errors::{GhgError, GhgResult};
use crate::gwp::{AssessmentReport, GwpCoefficients};
use crate::timeseries::{FloatValue, FluxSeries, TimeResolution, YearRange};
use crate::units::MassUnit;
use serde::{Deserialize, Serialize};

/// Settings for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Assessment report the GWP coefficients are taken from
    /// default: AR5
    pub vintage: AssessmentReport,

    /// CH4 GWP-100 coefficient, required when `vintage = "custom"`
    /// unit: kg CO2 / kg CH4
    pub custom_ch4: Option<FloatValue>,

    /// N2O GWP-100 coefficient, required when `vintage = "custom"`
    /// unit: kg CO2 / kg N2O
    pub custom_n2o: Option<FloatValue>,

    /// First year of the analysis (inclusive)
    /// default: 2000
    pub start_year: i32,

    /// Last year of the analysis (inclusive)
    /// default: 2012
    pub end_year: i32,

    /// Share of the area switched to alternate wetting-drying
    /// unit: dimensionless, within [0, 1]
    /// default: 0.5
    pub adoption: FloatValue,

    /// Unit for reported totals
    /// default: kg
    pub output_unit: MassUnit,

    /// Window of the centred moving average applied to daily series
    /// unit: days
    /// default: 7
    pub smoothing_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vintage: AssessmentReport::AR5,
            custom_ch4: None,
            custom_n2o: None,
            start_year: 2000,
            end_year: 2012,
            adoption: 0.5,
            output_unit: MassUnit::Kilogram,
            smoothing_window: 7,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> GhgResult<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).map_err(|e| GhgError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> GhgResult<String> {
        toml::to_string(self).map_err(|e| GhgError::Serialisation(e.to_string()))
    }

    /// Check that all derived values can be constructed
    pub fn validate(&self) -> GhgResult<()> {
        self.coefficients()?;
        self.year_range()?;
        self.adoption_fraction()?;
        if self.smoothing_window == 0 {
            return Err(GhgError::InvalidWindow(0));
        }
        Ok(())
    }

    /// GWP coefficients for the configured vintage
    pub fn coefficients(&self) -> GhgResult<GwpCoefficients> {
        match self.vintage {
            AssessmentReport::Custom => match (self.custom_ch4, self.custom_n2o) {
                (Some(ch4), Some(n2o)) => GwpCoefficients::custom(ch4, n2o),
                _ => Err(GhgError::Config(
                    "custom GWP vintage requires both custom_ch4 and custom_n2o".to_string(),
                )),
            },
            vintage => {
                if self.custom_ch4.is_some() || self.custom_n2o.is_some() {
                    log::warn!(
                        "custom GWP coefficients are ignored for vintage {}",
                        vintage
                    );
                }
                Ok(GwpCoefficients::for_vintage(vintage))
            }
        }
    }

    pub fn year_range(&self) -> GhgResult<YearRange> {
        YearRange::new(self.start_year, self.end_year)
    }

    pub fn adoption_fraction(&self) -> GhgResult<AdoptionFraction> {
        AdoptionFraction::new(self.adoption)
    }

    /// Series as displayed: daily series smoothed over `smoothing_window` days,
    /// annual series unchanged
    pub fn smoothed(&self, series: &FluxSeries) -> GhgResult<FluxSeries> {
        match series.resolution() {
            TimeResolution::Daily => series.rolling_mean(self.smoothing_window),
            TimeResolution::Annual => Ok(series.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.coefficients().unwrap(), GwpCoefficients::default());
        assert_eq!(config.year_range().unwrap(), YearRange::new(2000, 2012).unwrap());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
vintage = "AR5-feedback"
output_unit = "Gg"
"#,
        )
        .unwrap();
        assert_eq!(config.vintage, AssessmentReport::AR5Feedback);
        assert_eq!(config.output_unit, MassUnit::Gigagram);
        assert_eq!(config.start_year, 2000);
        assert_eq!(config.coefficients().unwrap().ch4(), 34.0);
    }

    #[test]
    fn test_custom_coefficients() {
        let config = AnalysisConfig::from_toml_str(
            r#"
vintage = "custom"
custom_ch4 = 30.0
custom_n2o = 280.0
"#,
        )
        .unwrap();
        let coefficients = config.coefficients().unwrap();
        assert_eq!(coefficients.vintage(), AssessmentReport::Custom);
        assert_eq!(coefficients.n2o(), 280.0);

        let missing = AnalysisConfig::from_toml_str(r#"vintage = "custom""#);
        assert!(matches!(missing, Err(GhgError::Config(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert_eq!(
            AnalysisConfig::from_toml_str("adoption = 1.5"),
            Err(GhgError::InvalidFraction(1.5))
        );
        assert_eq!(
            AnalysisConfig::from_toml_str("start_year = 2010\nend_year = 2005"),
            Err(GhgError::InvalidYearRange {
                start: 2010,
                end: 2005
            })
        );
        assert!(matches!(
            AnalysisConfig::from_toml_str(r#"vintage = "AR3""#),
            Err(GhgError::Config(_))
        ));
        assert_eq!(
            AnalysisConfig::from_toml_str("smoothing_window = 0"),
            Err(GhgError::InvalidWindow(0))
        );
    }

    #[test]
    fn test_vintage_is_case_insensitive() {
        let config = AnalysisConfig::from_toml_str(r#"vintage = "ar5-FEEDBACK""#).unwrap();
        assert_eq!(config.vintage, AssessmentReport::AR5Feedback);
    }

    #[test]
    fn test_smoothing_uses_window() {
        let config = AnalysisConfig::from_toml_str("smoothing_window = 3").unwrap();
        let start = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let daily =
            FluxSeries::from_daily("dC_ch4_emis", start, ndarray::array![1.0, 2.0, 3.0, 4.0])
                .unwrap();
        let smoothed = config.smoothed(&daily).unwrap();
        assert_eq!(smoothed.values(), &ndarray::array![2.0, 3.0]);
        assert_eq!(smoothed.dates()[0], start.succ_opt().unwrap());

        let annual =
            FluxSeries::from_annual("dC_ch4_emis", &[2000, 2001], ndarray::array![1.0, 2.0])
                .unwrap();
        assert_eq!(config.smoothed(&annual).unwrap(), annual);

        let too_short = AnalysisConfig::default().smoothed(&daily);
        assert!(matches!(too_short, Err(GhgError::InsufficientData { .. })));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AnalysisConfig {
            vintage: AssessmentReport::AR6,
            adoption: 0.25,
            output_unit: MassUnit::Megagram,
            ..Default::default()
        };
        let serialised = config.to_toml_string().unwrap();
        let deserialised = AnalysisConfig::from_toml_str(&serialised).unwrap();
        assert_eq!(config, deserialised);
    }
}
