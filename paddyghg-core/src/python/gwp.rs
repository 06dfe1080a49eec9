use crate::errors::GhgError;
use crate::gwp::{AssessmentReport, GwpCoefficients};
use crate::timeseries::FloatValue;
use pyo3::prelude::*;

/// Python wrapper for GwpCoefficients
///
/// Example:
///     coefficients = GwpCoefficients("AR5")
///     coefficients.ch4_to_co2eq(100.0)
#[pyclass(name = "GwpCoefficients", module = "paddyghg.core")]
#[derive(Debug, Clone)]
pub struct PyGwpCoefficients(pub GwpCoefficients);

#[pymethods]
impl PyGwpCoefficients {
    #[new]
    #[pyo3(signature = (vintage="AR5".to_string()))]
    fn new(vintage: String) -> PyResult<Self> {
        let vintage: AssessmentReport = vintage.parse()?;
        if vintage == AssessmentReport::Custom {
            return Err(GhgError::Config(
                "custom coefficients are created with GwpCoefficients.custom(ch4, n2o)".to_string(),
            )
            .into());
        }
        Ok(Self(GwpCoefficients::for_vintage(vintage)))
    }

    /// Coefficients that are not taken from an assessment report
    #[staticmethod]
    fn custom(ch4: FloatValue, n2o: FloatValue) -> PyResult<Self> {
        Ok(Self(GwpCoefficients::custom(ch4, n2o)?))
    }

    #[getter]
    fn vintage(&self) -> String {
        self.0.vintage().to_string()
    }

    #[getter]
    fn ch4(&self) -> FloatValue {
        self.0.ch4()
    }

    #[getter]
    fn n2o(&self) -> FloatValue {
        self.0.n2o()
    }

    fn ch4_to_co2eq(&self, mass_as_carbon: FloatValue) -> FloatValue {
        self.0.ch4_to_co2eq(mass_as_carbon)
    }

    fn n2o_to_co2eq(&self, mass_as_nitrogen: FloatValue) -> FloatValue {
        self.0.n2o_to_co2eq(mass_as_nitrogen)
    }

    fn __repr__(&self) -> String {
        format!(
            "GwpCoefficients(vintage={}, ch4={}, n2o={})",
            self.0.vintage(),
            self.0.ch4(),
            self.0.n2o()
        )
    }
}
