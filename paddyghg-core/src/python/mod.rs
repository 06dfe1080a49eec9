//! Python bindings for the dashboard shell
//!
//! Exposes the converter, series containers, aggregation and blending as the
//! `paddyghg._lib.core` module. Core errors are raised as `ValueError`.

use crate::errors::GhgError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod analysis;
mod gwp;
mod series;

pub use analysis::{PyBlendResult, PyEmissionReport, PyScenarioStats, PySpeciesStats};
pub use gwp::PyGwpCoefficients;
pub use series::{PyFluxSeries, PyScenarioDataset};

impl From<GhgError> for PyErr {
    fn from(err: GhgError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGwpCoefficients>()?;
    m.add_class::<PyFluxSeries>()?;
    m.add_class::<PyScenarioDataset>()?;
    m.add_class::<PySpeciesStats>()?;
    m.add_class::<PyScenarioStats>()?;
    m.add_class::<PyBlendResult>()?;
    m.add_class::<PyEmissionReport>()?;
    m.add_function(wrap_pyfunction!(analysis::aggregate, m)?)?;
    m.add_function(wrap_pyfunction!(analysis::blend, m)?)?;
    m.add_function(wrap_pyfunction!(analysis::build_report, m)?)?;
    m.add_function(wrap_pyfunction!(series::flux_display_name, m)?)?;
    Ok(())
}
