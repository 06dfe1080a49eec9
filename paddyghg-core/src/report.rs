//! Scenario comparison report.
//!
//! Bundles the statistics of the baseline and alternative management together with
//! the blended comparison, which is everything the dashboard needs to render its
//! summary tables and narrative.

use crate::aggregate::{aggregate, ScenarioStats};
use crate::blend::{blend, AdoptionFraction, BlendResult};
use crate::config::AnalysisConfig;
use crate::dataset::ScenarioDataset;
use crate::errors::{GhgError, GhgResult};
use crate::gwp::GwpCoefficients;
use crate::timeseries::{FloatValue, YearRange};
use crate::units::MassUnit;
use crate::variable::Management;
use serde::{Deserialize, Serialize};

/// CO2-equivalent totals of one scenario in a chosen unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub management: Management,
    pub unit: MassUnit,
    pub ch4: FloatValue,
    pub n2o: FloatValue,
    pub total: FloatValue,
}

impl ScenarioSummary {
    pub fn from_stats(stats: &ScenarioStats, unit: MassUnit) -> Self {
        Self {
            management: stats.management,
            unit,
            ch4: unit.scale_kg(stats.ch4.annual_gwp),
            n2o: unit.scale_kg(stats.n2o.annual_gwp),
            total: unit.scale_kg(stats.total_gwp()),
        }
    }
}

/// Comparison of the baseline and alternative management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionReport {
    pub baseline: ScenarioStats,
    pub alternative: ScenarioStats,
    pub blend: BlendResult,
}

impl EmissionReport {
    pub fn build(
        baseline: &ScenarioDataset,
        alternative: &ScenarioDataset,
        range: YearRange,
        coefficients: &GwpCoefficients,
        adoption: AdoptionFraction,
    ) -> GhgResult<Self> {
        if baseline.management() == alternative.management() {
            log::warn!(
                "comparing two datasets with the same management ({})",
                baseline.management()
            );
        }

        let baseline = aggregate(baseline, range, coefficients)?;
        let alternative = aggregate(alternative, range, coefficients)?;
        let blend = blend(&baseline, &alternative, adoption)?;

        log::debug!(
            "{}% {} adoption over {}: {} of {:.1}%",
            adoption.percent(),
            alternative.management,
            range,
            blend.direction,
            blend.percent_change
        );

        Ok(Self {
            baseline,
            alternative,
            blend,
        })
    }

    /// Build a report using the year range, vintage and adoption of a configuration
    pub fn from_config(
        baseline: &ScenarioDataset,
        alternative: &ScenarioDataset,
        config: &AnalysisConfig,
    ) -> GhgResult<Self> {
        Self::build(
            baseline,
            alternative,
            config.year_range()?,
            &config.coefficients()?,
            config.adoption_fraction()?,
        )
    }

    /// Totals of both scenarios in the given unit, baseline first
    pub fn summaries(&self, unit: MassUnit) -> [ScenarioSummary; 2] {
        [
            ScenarioSummary::from_stats(&self.baseline, unit),
            ScenarioSummary::from_stats(&self.alternative, unit),
        ]
    }

    pub fn to_json(&self) -> GhgResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GhgError::Serialisation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::Direction;
    use crate::gwp::AssessmentReport;
    use crate::timeseries::FluxSeries;
    use is_close::is_close;
    use ndarray::array;

    fn dataset(management: Management, ch4: FloatValue, n2o: FloatValue) -> ScenarioDataset {
        ScenarioDataset::new(management)
            .with_series(
                FluxSeries::from_annual("dC_ch4_emis", &[2005, 2006], array![ch4, ch4]).unwrap(),
            )
            .unwrap()
            .with_series(
                FluxSeries::from_annual("dN_n2o_emis", &[2005, 2006], array![n2o, n2o]).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn awd_reduces_emissions() {
        let cf = dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let awd = dataset(Management::AlternateWetDry, 40.0, 12.0);
        let report = EmissionReport::build(
            &cf,
            &awd,
            YearRange::new(2005, 2006).unwrap(),
            &GwpCoefficients::default(),
            AdoptionFraction::from_percent(50.0).unwrap(),
        )
        .unwrap();

        assert_eq!(report.baseline.management, Management::ContinuouslyFlooded);
        assert_eq!(report.alternative.management, Management::AlternateWetDry);
        assert_eq!(report.blend.direction, Direction::Decrease);
        assert!(is_close!(
            report.blend.baseline_total,
            report.baseline.total_gwp()
        ));
        assert!(report.blend.percent_change > 0.0);
    }

    #[test]
    fn empty_range_propagates() {
        let cf = dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let awd = dataset(Management::AlternateWetDry, 40.0, 12.0);
        let result = EmissionReport::build(
            &cf,
            &awd,
            YearRange::single(1990),
            &GwpCoefficients::default(),
            AdoptionFraction::new(0.5).unwrap(),
        );
        assert!(matches!(result, Err(GhgError::InsufficientData { .. })));
    }

    #[test]
    fn zero_baseline_propagates() {
        let cf = dataset(Management::ContinuouslyFlooded, 0.0, 0.0);
        let awd = dataset(Management::AlternateWetDry, 40.0, 12.0);
        let result = EmissionReport::build(
            &cf,
            &awd,
            YearRange::new(2005, 2006).unwrap(),
            &GwpCoefficients::default(),
            AdoptionFraction::new(0.5).unwrap(),
        );
        assert!(matches!(result, Err(GhgError::DivisionByZero { .. })));
    }

    #[test]
    fn from_config() {
        let config = AnalysisConfig {
            vintage: AssessmentReport::AR5Feedback,
            start_year: 2005,
            end_year: 2006,
            adoption: 1.0,
            ..Default::default()
        };
        let cf = dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let awd = dataset(Management::AlternateWetDry, 40.0, 12.0);
        let report = EmissionReport::from_config(&cf, &awd, &config).unwrap();
        assert_eq!(report.baseline.vintage(), AssessmentReport::AR5Feedback);
        assert_eq!(report.blend.vintage, Some(AssessmentReport::AR5Feedback));
        assert_eq!(report.blend.blended_total, report.alternative.total_gwp());
    }

    #[test]
    fn summaries_in_gigagrams() {
        let cf = dataset(Management::ContinuouslyFlooded, 1e6, 1e5);
        let awd = dataset(Management::AlternateWetDry, 5e5, 1e5);
        let report = EmissionReport::build(
            &cf,
            &awd,
            YearRange::new(2005, 2006).unwrap(),
            &GwpCoefficients::default(),
            AdoptionFraction::new(0.5).unwrap(),
        )
        .unwrap();
        let [baseline, alternative] = report.summaries(MassUnit::Gigagram);
        assert_eq!(baseline.unit, MassUnit::Gigagram);
        assert!(is_close!(baseline.ch4, report.baseline.ch4.annual_gwp * 1e-6));
        assert!(is_close!(baseline.total, baseline.ch4 + baseline.n2o));
        assert_eq!(alternative.management, Management::AlternateWetDry);
    }

    #[test]
    fn json_roundtrip() {
        let cf = dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let awd = dataset(Management::AlternateWetDry, 40.0, 12.0);
        let report = EmissionReport::build(
            &cf,
            &awd,
            YearRange::new(2005, 2006).unwrap(),
            &GwpCoefficients::default(),
            AdoptionFraction::new(0.3).unwrap(),
        )
        .unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"direction\": \"decrease\""));
        assert!(json.contains("\"management\": \"AWD\""));
        let parsed: EmissionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
