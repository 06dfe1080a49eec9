//! Gridded per-hectare fluxes and their reduction to regional totals
//!
//! Simulations are run per grid cell and report fluxes per hectare of rice. A
//! [`RiceAreaGrid`] describes the cells together with their area and the share of
//! that area cultivated with rice, so that per-hectare values can be turned into
//! regional totals:
//!
//! $$ E_{total} = \sum_{c} e_c \cdot A_c \cdot \frac{r_c}{100} $$
//!
//! where $A_c$ is the cell area in hectares and $r_c$ the rice area percentage.
//!
//! Cells without a simulated value are stored as NaN and skipped when reducing.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::array;
//! use paddyghg_core::spatial::{GridCell, GriddedField, RiceAreaGrid};
//!
//! let grid = RiceAreaGrid::new(
//!     vec![GridCell::new(11.0, 122.0), GridCell::new(11.5, 122.0)],
//!     array![1000.0, 2000.0],
//!     array![50.0, 10.0],
//! )
//! .unwrap();
//! let field = GriddedField::new("dC_ch4_emis", array![100.0, 300.0]);
//! // 100 * 500 ha + 300 * 200 ha
//! assert_eq!(field.area_weighted_total(&grid).unwrap(), 110_000.0);
//! ```

use crate::errors::{GhgError, GhgResult};
use crate::gwp::{GwpCoefficients, Species};
use crate::timeseries::FloatValue;
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

/// Centre of a grid cell in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub lat: FloatValue,
    pub lon: FloatValue,
}

impl GridCell {
    pub fn new(lat: FloatValue, lon: FloatValue) -> Self {
        Self { lat, lon }
    }
}

/// Grid cells with their total and rice-cultivated area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiceAreaGrid {
    cells: Vec<GridCell>,
    /// unit: ha
    area_ha: Array1<FloatValue>,
    /// Share of the cell area under rice cultivation
    /// unit: %
    rice_percent: Array1<FloatValue>,
}

impl RiceAreaGrid {
    pub fn new(
        cells: Vec<GridCell>,
        area_ha: Array1<FloatValue>,
        rice_percent: Array1<FloatValue>,
    ) -> GhgResult<Self> {
        check_length("cell areas", cells.len(), area_ha.len())?;
        check_length("rice area percentages", cells.len(), rice_percent.len())?;
        Ok(Self {
            cells,
            area_ha,
            rice_percent,
        })
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rice-cultivated area of each cell
    /// unit: ha
    pub fn rice_area_ha(&self) -> Array1<FloatValue> {
        &self.area_ha * &self.rice_percent * 0.01
    }

    /// Total rice-cultivated area, skipping cells without data
    pub fn total_rice_area_ha(&self) -> FloatValue {
        self.rice_area_ha().iter().filter(|v| v.is_finite()).sum()
    }
}

/// Per-hectare values of one variable on the cells of a [`RiceAreaGrid`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GriddedField {
    name: String,
    values: Array1<FloatValue>,
}

impl GriddedField {
    pub fn new(name: impl Into<String>, values: Array1<FloatValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    /// Minimum and maximum of the finite values, or `None` if there are none
    pub fn bounds(&self) -> Option<(FloatValue, FloatValue)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Values rescaled onto `[0, 1]` relative to `bounds`
    ///
    /// Bounds are passed in rather than computed so that several fields (or years)
    /// can share one colour scale.
    pub fn normalised(&self, bounds: (FloatValue, FloatValue)) -> GhgResult<Array1<FloatValue>> {
        let (min, max) = bounds;
        if max == min {
            return Err(GhgError::division_by_zero(format!(
                "cannot normalise '{}' against empty bounds [{}, {}]",
                self.name, min, max
            )));
        }
        Ok(self.values.mapv(|v| (v - min) / (max - min)))
    }

    /// Cells with a strictly positive value
    pub fn positive_cells(&self, grid: &RiceAreaGrid) -> GhgResult<Vec<(GridCell, FloatValue)>> {
        check_length(&self.name, grid.len(), self.values.len())?;
        Ok(grid
            .cells()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .filter(|(_, v)| *v > 0.0)
            .collect())
    }

    /// Sum of the values weighted by the rice area of each cell
    ///
    /// Turns a per-hectare flux into a regional total.
    pub fn area_weighted_total(&self, grid: &RiceAreaGrid) -> GhgResult<FloatValue> {
        check_length(&self.name, grid.len(), self.values.len())?;
        let mut total = 0.0;
        Zip::from(&self.values)
            .and(&grid.rice_area_ha())
            .for_each(|&value, &area| {
                let weighted = value * area;
                if weighted.is_finite() {
                    total += weighted;
                }
            });
        Ok(total)
    }

    /// Convert the elemental mass of `species` into CO2-equivalents
    pub fn to_co2eq(&self, species: Species, coefficients: &GwpCoefficients) -> GriddedField {
        GriddedField {
            name: self.name.clone(),
            values: self.values.mapv(|v| coefficients.to_co2eq(species, v)),
        }
    }

    /// Element-wise sum with another field on the same grid
    pub fn combined(&self, other: &GriddedField, name: impl Into<String>) -> GhgResult<GriddedField> {
        check_length(&other.name, self.values.len(), other.values.len())?;
        Ok(GriddedField {
            name: name.into(),
            values: &self.values + &other.values,
        })
    }
}

fn check_length(context: &str, expected: usize, actual: usize) -> GhgResult<()> {
    if expected != actual {
        return Err(GhgError::LengthMismatch {
            context: context.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
