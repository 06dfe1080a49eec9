//! End-to-end checks of the emission pipeline.
//!
//! Raw flux series are converted to CO2-equivalents, aggregated per scenario
//! and blended by adoption fraction, as the dashboard does for each session.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use ndarray::Array1;
use paddyghg_core::aggregate::{aggregate, annual_breakdown};
use paddyghg_core::blend::{blend, blend_totals, AdoptionFraction, Direction};
use paddyghg_core::config::AnalysisConfig;
use paddyghg_core::dataset::ScenarioDataset;
use paddyghg_core::gwp::{AssessmentReport, GwpCoefficients};
use paddyghg_core::report::EmissionReport;
use paddyghg_core::timeseries::{FluxSeries, YearRange};
use paddyghg_core::units::MassUnit;
use paddyghg_core::variable::{Management, VAR_CH4_EMISSION, VAR_N2O_EMISSION};
use paddyghg_core::GhgError;

fn annual_dataset(management: Management, ch4: f64, n2o: f64) -> ScenarioDataset {
    let years = [2000, 2001, 2002];
    ScenarioDataset::new(management)
        .with_series(
            FluxSeries::from_annual(VAR_CH4_EMISSION.name, &years, Array1::from_elem(3, ch4))
                .unwrap(),
        )
        .unwrap()
        .with_series(
            FluxSeries::from_annual(VAR_N2O_EMISSION.name, &years, Array1::from_elem(3, n2o))
                .unwrap(),
        )
        .unwrap()
}

/// Two non-leap years (2001, 2002) of daily data summing to the given annual totals
fn daily_dataset(management: Management, ch4_per_year: f64, n2o_per_year: f64) -> ScenarioDataset {
    let start = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
    let n_days = 2 * 365;
    let ch4 = Array1::from_elem(n_days, ch4_per_year / 365.0);
    let n2o = Array1::from_elem(n_days, n2o_per_year / 365.0);

    ScenarioDataset::new(management)
        .with_series(FluxSeries::from_daily(VAR_CH4_EMISSION.name, start, ch4).unwrap())
        .unwrap()
        .with_series(FluxSeries::from_daily(VAR_N2O_EMISSION.name, start, n2o).unwrap())
        .unwrap()
}

mod conversion {
    use super::*;

    #[test]
    fn test_published_ar5_factors() {
        let coefficients = GwpCoefficients::for_vintage(AssessmentReport::AR5);

        assert_relative_eq!(coefficients.ch4_to_co2eq(100.0), 3733.33, epsilon = 0.01);
        assert_relative_eq!(coefficients.n2o_to_co2eq(10.0), 4164.29, epsilon = 0.01);
    }

    #[test]
    fn test_converted_dataset_matches_aggregate() {
        let coefficients = GwpCoefficients::default();
        let dataset = annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let range = YearRange::new(2000, 2002).unwrap();

        let converted = dataset.to_co2eq(&coefficients).unwrap();
        let stats = aggregate(&dataset, range, &coefficients).unwrap();

        let ch4 = converted.get(VAR_CH4_EMISSION.name).unwrap();
        for value in ch4.values() {
            assert_relative_eq!(*value, stats.ch4.annual_gwp, max_relative = 1e-12);
        }
    }
}

mod aggregation {
    use super::*;

    #[test]
    fn test_daily_and_annual_inputs_agree() {
        let coefficients = GwpCoefficients::default();
        let range = YearRange::new(2001, 2002).unwrap();

        let daily = aggregate(
            &daily_dataset(Management::ContinuouslyFlooded, 100.0, 10.0),
            range,
            &coefficients,
        )
        .unwrap();
        let annual = aggregate(
            &annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0),
            range,
            &coefficients,
        )
        .unwrap();

        assert_relative_eq!(daily.ch4.annual_sum, annual.ch4.annual_sum, epsilon = 1e-9);
        assert_relative_eq!(daily.n2o.annual_sum, annual.n2o.annual_sum, epsilon = 1e-9);
        assert_relative_eq!(daily.total_gwp(), annual.total_gwp(), epsilon = 1e-6);
        assert_eq!(daily.ch4.years_with_data, 2);
    }

    #[test]
    fn test_partial_year_only_is_rejected() {
        let coefficients = GwpCoefficients::default();
        let daily = daily_dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let full_year = daily.restrict(YearRange::single(2002));
        assert!(aggregate(&full_year, YearRange::single(2002), &coefficients).is_ok());

        let start = NaiveDate::from_ymd_opt(2001, 12, 22).unwrap();
        let partial = ScenarioDataset::new(Management::ContinuouslyFlooded)
            .with_series(
                FluxSeries::from_daily(VAR_CH4_EMISSION.name, start, Array1::from_elem(10, 1.0))
                    .unwrap(),
            )
            .unwrap()
            .with_series(
                FluxSeries::from_daily(VAR_N2O_EMISSION.name, start, Array1::from_elem(10, 1.0))
                    .unwrap(),
            )
            .unwrap();
        let result = aggregate(&partial, YearRange::single(2001), &coefficients);
        assert!(matches!(result, Err(GhgError::InsufficientData { .. })));
    }

    #[test]
    fn test_breakdown_sums_to_mean_total() {
        let coefficients = GwpCoefficients::default();
        let range = YearRange::new(2000, 2002).unwrap();
        let dataset = annual_dataset(Management::AlternateWetDry, 60.0, 12.0);

        let breakdown = annual_breakdown(&dataset, range, &coefficients).unwrap();
        let stats = aggregate(&dataset, range, &coefficients).unwrap();

        assert_eq!(breakdown.len(), 3);
        let mean = breakdown.iter().map(|e| e.total()).sum::<f64>() / breakdown.len() as f64;
        assert_relative_eq!(mean, stats.total_gwp(), max_relative = 1e-12);
    }

    #[test]
    fn test_range_without_data_is_rejected() {
        let coefficients = GwpCoefficients::default();
        let dataset = annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0);

        let result = aggregate(&dataset, YearRange::new(1990, 1995).unwrap(), &coefficients);
        assert!(matches!(result, Err(GhgError::InsufficientData { .. })));
    }
}

mod blending {
    use super::*;

    #[test]
    fn test_half_adoption_example() {
        let result = blend_totals(7894.05, 6000.0, AdoptionFraction::new(0.5).unwrap()).unwrap();

        assert_relative_eq!(result.blended_total, 6947.025, epsilon = 0.01);
        assert_eq!(result.direction, Direction::Decrease);
        assert_relative_eq!(result.percent_change, 11.99, epsilon = 0.01);
    }

    #[test]
    fn test_scenarios_end_to_end() {
        let coefficients = GwpCoefficients::default();
        let range = YearRange::new(2000, 2002).unwrap();
        let cf = aggregate(
            &annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0),
            range,
            &coefficients,
        )
        .unwrap();
        let awd = aggregate(
            &annual_dataset(Management::AlternateWetDry, 50.0, 10.0),
            range,
            &coefficients,
        )
        .unwrap();

        let baseline_total = cf.total_gwp();
        let alternative_total = awd.total_gwp();
        assert_relative_eq!(baseline_total, 3733.33 + 4164.29, epsilon = 0.02);

        let full = blend(&cf, &awd, AdoptionFraction::new(1.0).unwrap()).unwrap();
        assert_relative_eq!(full.blended_total, alternative_total);

        let none = blend(&cf, &awd, AdoptionFraction::new(0.0).unwrap()).unwrap();
        assert_relative_eq!(none.blended_total, baseline_total);
        assert_eq!(none.percent_change, 0.0);

        let half = blend(&cf, &awd, AdoptionFraction::from_percent(50.0).unwrap()).unwrap();
        assert_eq!(half.direction, Direction::Decrease);
        assert_eq!(half.vintage, Some(AssessmentReport::AR5));
        assert_relative_eq!(
            half.absolute_difference,
            (baseline_total - alternative_total) / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_different_custom_coefficients_are_rejected() {
        let range = YearRange::new(2000, 2002).unwrap();
        let cf = aggregate(
            &annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0),
            range,
            &GwpCoefficients::custom(28.0, 265.0).unwrap(),
        )
        .unwrap();
        let awd = aggregate(
            &annual_dataset(Management::AlternateWetDry, 50.0, 10.0),
            range,
            &GwpCoefficients::custom(100.0, 1000.0).unwrap(),
        )
        .unwrap();

        let result = blend(&cf, &awd, AdoptionFraction::new(0.5).unwrap());
        assert!(matches!(result, Err(GhgError::VintageMismatch { .. })));
    }

    #[test]
    fn test_zero_baseline_is_rejected() {
        let coefficients = GwpCoefficients::default();
        let range = YearRange::new(2000, 2002).unwrap();
        let empty = aggregate(
            &annual_dataset(Management::ContinuouslyFlooded, 0.0, 0.0),
            range,
            &coefficients,
        )
        .unwrap();
        let awd = aggregate(
            &annual_dataset(Management::AlternateWetDry, 50.0, 10.0),
            range,
            &coefficients,
        )
        .unwrap();

        let result = blend(&empty, &awd, AdoptionFraction::new(0.5).unwrap());
        assert!(matches!(result, Err(GhgError::DivisionByZero { .. })));
    }
}

mod reporting {
    use super::*;

    #[test]
    fn test_report_from_config() {
        let config = AnalysisConfig::from_toml_str(
            r#"
vintage = "AR5"
start_year = 2000
end_year = 2002
adoption = 0.25
output_unit = "Mg"
"#,
        )
        .unwrap();
        let cf = annual_dataset(Management::ContinuouslyFlooded, 100.0, 10.0);
        let awd = annual_dataset(Management::AlternateWetDry, 50.0, 10.0);

        let report = EmissionReport::from_config(&cf, &awd, &config).unwrap();
        assert_relative_eq!(report.blend.adoption.value(), 0.25);

        let [baseline, alternative] = report.summaries(config.output_unit);
        assert_eq!(baseline.unit, MassUnit::Megagram);
        assert_relative_eq!(
            baseline.total,
            report.baseline.total_gwp() / 1000.0,
            max_relative = 1e-12
        );
        assert!(alternative.total < baseline.total);

        let json = report.to_json().unwrap();
        let parsed: EmissionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
