use crate::dataset::ScenarioDataset;
use crate::errors::GhgError;
use crate::timeseries::{FloatValue, FluxSeries, TimeResolution, YearRange};
use crate::variable::{display_name, Management};
use chrono::NaiveDate;
use numpy::{PyArray1, PyReadonlyArray1, ToPyArray};
use pyo3::prelude::*;

fn parse_dates(dates: &[String]) -> Result<Vec<NaiveDate>, GhgError> {
    dates
        .iter()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| GhgError::Config(format!("invalid date '{}': {}", d, e)))
        })
        .collect()
}

/// Python wrapper for FluxSeries
///
/// Dates are exchanged as ISO strings ("2001-01-31"), values as numpy arrays.
#[pyclass(name = "FluxSeries", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyFluxSeries(pub FluxSeries);

#[pymethods]
impl PyFluxSeries {
    /// Create an annual series with one value per year
    #[staticmethod]
    fn from_annual(
        name: String,
        years: Vec<i32>,
        values: PyReadonlyArray1<'_, FloatValue>,
    ) -> PyResult<Self> {
        let values = values.as_array().to_owned();
        Ok(Self(FluxSeries::from_annual(name, &years, values)?))
    }

    /// Create a daily series from ISO dates
    #[staticmethod]
    fn from_daily(
        name: String,
        dates: Vec<String>,
        values: PyReadonlyArray1<'_, FloatValue>,
    ) -> PyResult<Self> {
        let dates = parse_dates(&dates)?;
        let values = values.as_array().to_owned();
        Ok(Self(FluxSeries::new(
            name,
            TimeResolution::Daily,
            dates,
            values,
        )?))
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name().to_string()
    }

    #[getter]
    fn resolution(&self) -> String {
        self.0.resolution().to_string()
    }

    fn dates(&self) -> Vec<String> {
        self.0.dates().iter().map(|d| d.to_string()).collect()
    }

    fn values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<FloatValue>> {
        self.0.values().to_pyarray(py)
    }

    fn restrict(&self, start_year: i32, end_year: i32) -> PyResult<Self> {
        Ok(Self(self.0.restrict(YearRange::new(start_year, end_year)?)))
    }

    fn to_annual(&self) -> PyResult<Self> {
        Ok(Self(self.0.to_annual()?))
    }

    fn rolling_mean(&self, window: usize) -> PyResult<Self> {
        Ok(Self(self.0.rolling_mean(window)?))
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "FluxSeries(name={}, resolution={}, samples={})",
            self.0.name(),
            self.0.resolution(),
            self.0.len()
        )
    }
}

/// Python wrapper for ScenarioDataset
#[pyclass(name = "ScenarioDataset", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyScenarioDataset(pub ScenarioDataset);

#[pymethods]
impl PyScenarioDataset {
    /// Create an empty dataset for a management regime ("CF" or "AWD")
    #[new]
    fn new(management: String) -> PyResult<Self> {
        let management: Management = management.parse()?;
        Ok(Self(ScenarioDataset::new(management)))
    }

    fn add_series(&mut self, series: PyFluxSeries) -> PyResult<()> {
        Ok(self.0.add_series(series.0)?)
    }

    #[getter]
    fn management(&self) -> String {
        self.0.management().code().to_string()
    }

    fn names(&self) -> Vec<String> {
        self.0.names().map(|n| n.to_string()).collect()
    }

    fn get(&self, name: String) -> Option<PyFluxSeries> {
        self.0.get(&name).cloned().map(PyFluxSeries)
    }

    /// Long-format (date, display name, value) records of the selected series
    fn to_records(&self, names: Vec<String>) -> PyResult<Vec<(String, String, FloatValue)>> {
        let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        Ok(self
            .0
            .to_records(&names)?
            .into_iter()
            .map(|r| (r.date.to_string(), r.variable, r.value))
            .collect())
    }

    #[staticmethod]
    #[pyo3(signature = (names, as_co2eq=false))]
    fn unit_label(names: Vec<String>, as_co2eq: bool) -> PyResult<String> {
        let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        Ok(ScenarioDataset::unit_label(&names, as_co2eq)?)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScenarioDataset(management={}, series={:?})",
            self.0.management(),
            self.0.names().collect::<Vec<_>>()
        )
    }
}

/// Display name of a flux variable identifier
#[pyfunction]
pub fn flux_display_name(name: String) -> String {
    display_name(&name).to_string()
}
