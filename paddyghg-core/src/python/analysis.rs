use crate::aggregate::{ScenarioStats, SpeciesStats};
use crate::blend::{AdoptionFraction, BlendResult};
use crate::gwp::GwpCoefficients;
use crate::report::EmissionReport;
use crate::timeseries::{FloatValue, YearRange};
use crate::units::MassUnit;
use pyo3::prelude::*;

use super::gwp::PyGwpCoefficients;
use super::series::PyScenarioDataset;

fn coefficients_or_default(coefficients: Option<PyGwpCoefficients>) -> GwpCoefficients {
    coefficients.map(|c| c.0).unwrap_or_default()
}

/// Python wrapper for SpeciesStats
#[pyclass(name = "SpeciesStats", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PySpeciesStats(pub SpeciesStats);

#[pymethods]
impl PySpeciesStats {
    #[getter]
    fn species(&self) -> String {
        self.0.species.to_string()
    }

    #[getter]
    fn annual_sum(&self) -> FloatValue {
        self.0.annual_sum
    }

    #[getter]
    fn annual_gwp(&self) -> FloatValue {
        self.0.annual_gwp
    }

    #[getter]
    fn sample_mean(&self) -> FloatValue {
        self.0.sample_mean
    }

    /// "daily" or "annual"; the interval `sample_mean` refers to
    #[getter]
    fn resolution(&self) -> String {
        self.0.resolution.to_string()
    }

    #[getter]
    fn years_with_data(&self) -> usize {
        self.0.years_with_data
    }
}

/// Python wrapper for ScenarioStats
#[pyclass(name = "ScenarioStats", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyScenarioStats(pub ScenarioStats);

#[pymethods]
impl PyScenarioStats {
    #[getter]
    fn management(&self) -> String {
        self.0.management.code().to_string()
    }

    #[getter]
    fn vintage(&self) -> String {
        self.0.vintage().to_string()
    }

    #[getter]
    fn start_year(&self) -> i32 {
        self.0.years.start()
    }

    #[getter]
    fn end_year(&self) -> i32 {
        self.0.years.end()
    }

    #[getter]
    fn ch4(&self) -> PySpeciesStats {
        PySpeciesStats(self.0.ch4.clone())
    }

    #[getter]
    fn n2o(&self) -> PySpeciesStats {
        PySpeciesStats(self.0.n2o.clone())
    }

    fn total_gwp(&self) -> FloatValue {
        self.0.total_gwp()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScenarioStats(management={}, years={}, total_gwp={:.1})",
            self.0.management,
            self.0.years,
            self.0.total_gwp()
        )
    }
}

/// Python wrapper for BlendResult
#[pyclass(name = "BlendResult", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyBlendResult(pub BlendResult);

#[pymethods]
impl PyBlendResult {
    #[getter]
    fn adoption(&self) -> FloatValue {
        self.0.adoption.value()
    }

    #[getter]
    fn baseline_total(&self) -> FloatValue {
        self.0.baseline_total
    }

    #[getter]
    fn alternative_total(&self) -> FloatValue {
        self.0.alternative_total
    }

    #[getter]
    fn blended_total(&self) -> FloatValue {
        self.0.blended_total
    }

    #[getter]
    fn absolute_difference(&self) -> FloatValue {
        self.0.absolute_difference
    }

    #[getter]
    fn percent_change(&self) -> FloatValue {
        self.0.percent_change
    }

    /// "decrease" or "increase"
    #[getter]
    fn direction(&self) -> String {
        self.0.direction.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "BlendResult({} of {:.1}% at {:.0}% adoption)",
            self.0.direction,
            self.0.percent_change,
            self.0.adoption.percent()
        )
    }
}

/// Python wrapper for EmissionReport
#[pyclass(name = "EmissionReport", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyEmissionReport(pub EmissionReport);

#[pymethods]
impl PyEmissionReport {
    #[getter]
    fn baseline(&self) -> PyScenarioStats {
        PyScenarioStats(self.0.baseline.clone())
    }

    #[getter]
    fn alternative(&self) -> PyScenarioStats {
        PyScenarioStats(self.0.alternative.clone())
    }

    #[getter]
    fn blend(&self) -> PyBlendResult {
        PyBlendResult(self.0.blend.clone())
    }

    /// (management, CH4, N2O, total) rows in the given mass unit
    #[pyo3(signature = (unit="kg".to_string()))]
    fn summary_table(&self, unit: String) -> PyResult<Vec<(String, FloatValue, FloatValue, FloatValue)>> {
        let unit: MassUnit = unit.parse()?;
        Ok(self
            .0
            .summaries(unit)
            .into_iter()
            .map(|s| (s.management.code().to_string(), s.ch4, s.n2o, s.total))
            .collect())
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.0.to_json()?)
    }
}

/// Summary statistics of a scenario over an inclusive range of years
#[pyfunction]
#[pyo3(signature = (dataset, start_year, end_year, coefficients=None))]
pub fn aggregate(
    dataset: &PyScenarioDataset,
    start_year: i32,
    end_year: i32,
    coefficients: Option<PyGwpCoefficients>,
) -> PyResult<PyScenarioStats> {
    let coefficients = coefficients_or_default(coefficients);
    let range = YearRange::new(start_year, end_year)?;
    Ok(PyScenarioStats(crate::aggregate::aggregate(
        &dataset.0,
        range,
        &coefficients,
    )?))
}

/// Blend two scenarios by the fraction of area switched to the alternative
#[pyfunction]
pub fn blend(
    baseline: &PyScenarioStats,
    alternative: &PyScenarioStats,
    adoption: FloatValue,
) -> PyResult<PyBlendResult> {
    let adoption = AdoptionFraction::new(adoption)?;
    Ok(PyBlendResult(crate::blend::blend(
        &baseline.0,
        &alternative.0,
        adoption,
    )?))
}

/// Aggregate both scenarios and compare them in one step
#[pyfunction]
#[pyo3(signature = (baseline, alternative, start_year, end_year, adoption, coefficients=None))]
pub fn build_report(
    baseline: &PyScenarioDataset,
    alternative: &PyScenarioDataset,
    start_year: i32,
    end_year: i32,
    adoption: FloatValue,
    coefficients: Option<PyGwpCoefficients>,
) -> PyResult<PyEmissionReport> {
    let coefficients = coefficients_or_default(coefficients);
    Ok(PyEmissionReport(EmissionReport::build(
        &baseline.0,
        &alternative.0,
        YearRange::new(start_year, end_year)?,
        &coefficients,
        AdoptionFraction::new(adoption)?,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ScenarioDataset;
    use crate::timeseries::FluxSeries;
    use crate::variable::Management;
    use is_close::is_close;
    use ndarray::array;

    fn dataset(management: Management, ch4: FloatValue) -> PyScenarioDataset {
        let ds = ScenarioDataset::new(management)
            .with_series(
                FluxSeries::from_annual("dC_ch4_emis", &[2000, 2001], array![ch4, ch4]).unwrap(),
            )
            .unwrap()
            .with_series(
                FluxSeries::from_annual("dN_n2o_emis", &[2000, 2001], array![10.0, 10.0])
                    .unwrap(),
            )
            .unwrap();
        PyScenarioDataset(ds)
    }

    #[test]
    fn functions_wrap_core_operations() {
        let cf = dataset(Management::ContinuouslyFlooded, 100.0);
        let awd = dataset(Management::AlternateWetDry, 50.0);

        let baseline = aggregate(&cf, 2000, 2001, None).unwrap();
        let alternative = aggregate(&awd, 2000, 2001, None).unwrap();
        assert_eq!(baseline.vintage(), "AR5");
        assert!((baseline.total_gwp() - 7897.62).abs() < 0.01);

        let blended = blend(&baseline, &alternative, 0.5).unwrap();
        assert_eq!(blended.direction(), "decrease");

        let report = build_report(&cf, &awd, 2000, 2001, 0.5, None).unwrap();
        assert!(is_close!(
            report.blend().blended_total(),
            blended.blended_total()
        ));
        let rows = report.summary_table("Mg".to_string()).unwrap();
        assert_eq!(rows[0].0, "CF");
        assert!(is_close!(rows[0].3, baseline.total_gwp() * 1e-3));
    }
}
