//! Reduction of flux series into per-scenario summary statistics.
//!
//! For each greenhouse gas species the series is restricted to the requested years,
//! summed per calendar year and averaged across years. The resulting annual mean is
//! converted into CO2-equivalents.
//!
//! $$ \bar{E} = \frac{1}{N_{years}} \sum_{y} \sum_{t \in y} e_t $$
//!
//! Only calendar years that the series covers completely enter the annual mean; a
//! daily series contributes a year only if every day of it is present. A year range
//! without any complete year is reported as [`GhgError::InsufficientData`] rather
//! than a NaN or zero result.

use crate::dataset::ScenarioDataset;
use crate::errors::{GhgError, GhgResult};
use crate::gwp::{AssessmentReport, GwpCoefficients, Species};
use crate::timeseries::{FloatValue, FluxSeries, TimeResolution, YearRange};
use crate::variable::Management;
use serde::{Deserialize, Serialize};

/// Summary statistics of one species within one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    pub species: Species,
    /// Mean of the per-year sums
    /// unit: kg C / yr for CH4, kg N / yr for N2O
    pub annual_sum: FloatValue,
    /// `annual_sum` in CO2-equivalents
    /// unit: kg CO2-eq / yr
    pub annual_gwp: FloatValue,
    /// Mean over all samples in the range, per sample interval given by `resolution`
    pub sample_mean: FloatValue,
    /// Resolution of the source series, which determines what `sample_mean` means
    pub resolution: TimeResolution,
    /// Number of complete calendar years in the annual mean
    pub years_with_data: usize,
}

/// Summary statistics of one management scenario over a range of years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStats {
    pub management: Management,
    pub years: YearRange,
    /// Coefficients used for the CO2-equivalent values
    pub coefficients: GwpCoefficients,
    pub ch4: SpeciesStats,
    pub n2o: SpeciesStats,
}

impl ScenarioStats {
    pub fn vintage(&self) -> AssessmentReport {
        self.coefficients.vintage()
    }

    pub fn species(&self, species: Species) -> &SpeciesStats {
        match species {
            Species::CH4 => &self.ch4,
            Species::N2O => &self.n2o,
        }
    }

    /// Sum of the annual CO2-equivalent emissions of all species
    pub fn total_gwp(&self) -> FloatValue {
        self.ch4.annual_gwp + self.n2o.annual_gwp
    }
}

/// Emissions of a single year in CO2-equivalents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualEmission {
    pub year: i32,
    pub ch4: FloatValue,
    pub n2o: FloatValue,
}

impl AnnualEmission {
    pub fn total(&self) -> FloatValue {
        self.ch4 + self.n2o
    }
}

/// Summary statistics of a single series
pub fn aggregate_series(
    series: &FluxSeries,
    range: YearRange,
    species: Species,
    coefficients: &GwpCoefficients,
) -> GhgResult<SpeciesStats> {
    let restricted = series.restrict(range);
    let annual_sums = restricted.complete_annual_sums();
    if annual_sums.is_empty() {
        return Err(GhgError::insufficient(format!(
            "'{}' has no complete year within {}",
            series.name(),
            range
        )));
    }

    let annual_sum =
        annual_sums.iter().map(|s| s.value).sum::<FloatValue>() / annual_sums.len() as FloatValue;
    let sample_mean = restricted
        .mean()
        .ok_or_else(|| GhgError::insufficient(format!("'{}' is empty", series.name())))?;

    log::debug!(
        "aggregated '{}' over {} ({} years): annual sum {:.3}",
        series.name(),
        range,
        annual_sums.len(),
        annual_sum
    );

    Ok(SpeciesStats {
        species,
        annual_sum,
        annual_gwp: coefficients.to_co2eq(species, annual_sum),
        sample_mean,
        resolution: series.resolution(),
        years_with_data: annual_sums.len(),
    })
}

/// Summary statistics of a scenario over an inclusive range of years
pub fn aggregate(
    dataset: &ScenarioDataset,
    range: YearRange,
    coefficients: &GwpCoefficients,
) -> GhgResult<ScenarioStats> {
    let ch4 = aggregate_series(
        dataset.species_series(Species::CH4)?,
        range,
        Species::CH4,
        coefficients,
    )?;
    let n2o = aggregate_series(
        dataset.species_series(Species::N2O)?,
        range,
        Species::N2O,
        coefficients,
    )?;

    Ok(ScenarioStats {
        management: dataset.management(),
        years: range,
        coefficients: *coefficients,
        ch4,
        n2o,
    })
}

/// Per-year CO2-equivalent emissions of a scenario
///
/// Every year in the range that has CH4 data must also have N2O data.
pub fn annual_breakdown(
    dataset: &ScenarioDataset,
    range: YearRange,
    coefficients: &GwpCoefficients,
) -> GhgResult<Vec<AnnualEmission>> {
    let ch4 = dataset
        .species_series(Species::CH4)?
        .restrict(range)
        .complete_annual_sums();
    let n2o = dataset
        .species_series(Species::N2O)?
        .restrict(range)
        .complete_annual_sums();

    if ch4.is_empty() {
        return Err(GhgError::insufficient(format!(
            "no complete year of CH4 within {} in the {} dataset",
            range,
            dataset.management()
        )));
    }

    ch4.iter()
        .map(|c| {
            let n = n2o.iter().find(|n| n.year == c.year).ok_or_else(|| {
                GhgError::insufficient(format!(
                    "no complete year of N2O in {} in the {} dataset",
                    c.year,
                    dataset.management()
                ))
            })?;
            Ok(AnnualEmission {
                year: c.year,
                ch4: coefficients.ch4_to_co2eq(c.value),
                n2o: coefficients.n2o_to_co2eq(n.value),
            })
        })
        .collect()
}
