//! Blending of two management scenarios by adoption fraction.
//!
//! If a fraction $p$ of the cultivated area is switched from the baseline to the
//! alternative management, total emissions become
//!
//! $$ E_{blend} = p \cdot E_{alt} + (1 - p) \cdot E_{base} $$
//!
//! and the relative change against the baseline is
//!
//! $$ \Delta = \left| 1 - \frac{E_{blend}}{E_{base}} \right| \cdot 100 $$
//!
//! The sign of the change is carried by [`Direction`] only.

use crate::aggregate::ScenarioStats;
use crate::errors::{GhgError, GhgResult};
use crate::gwp::AssessmentReport;
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proportion of the cultivated area switched to the alternative management
///
/// Always within `[0, 1]`; out of range values are rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "FloatValue", into = "FloatValue")]
pub struct AdoptionFraction(FloatValue);

impl AdoptionFraction {
    pub fn new(fraction: FloatValue) -> GhgResult<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GhgError::InvalidFraction(fraction));
        }
        Ok(Self(fraction))
    }

    /// From a percentage in `[0, 100]`, as used by the dashboard slider
    pub fn from_percent(percent: FloatValue) -> GhgResult<Self> {
        Self::new(percent / 100.0)
    }

    pub fn value(&self) -> FloatValue {
        self.0
    }

    pub fn percent(&self) -> FloatValue {
        self.0 * 100.0
    }
}

impl TryFrom<FloatValue> for AdoptionFraction {
    type Error = GhgError;

    fn try_from(value: FloatValue) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdoptionFraction> for FloatValue {
    fn from(value: AdoptionFraction) -> Self {
        value.0
    }
}

/// Whether the blended emissions are below or above the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Decrease,
    Increase,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decrease => write!(f, "decrease"),
            Direction::Increase => write!(f, "increase"),
        }
    }
}

/// Comparison of a blended scenario against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendResult {
    /// GWP vintage of the totals, if they were derived from [`ScenarioStats`]
    pub vintage: Option<AssessmentReport>,
    pub adoption: AdoptionFraction,
    /// unit: kg CO2-eq / yr
    pub baseline_total: FloatValue,
    /// unit: kg CO2-eq / yr
    pub alternative_total: FloatValue,
    /// unit: kg CO2-eq / yr
    pub blended_total: FloatValue,
    /// unit: kg CO2-eq / yr
    pub absolute_difference: FloatValue,
    /// Relative change against the baseline, always non-negative
    /// unit: %
    pub percent_change: FloatValue,
    pub direction: Direction,
}

/// Blend two emission totals
///
/// Fails with [`GhgError::DivisionByZero`] if the baseline total is zero, as the
/// relative change is undefined.
pub fn blend_totals(
    baseline_total: FloatValue,
    alternative_total: FloatValue,
    adoption: AdoptionFraction,
) -> GhgResult<BlendResult> {
    if baseline_total == 0.0 {
        return Err(GhgError::division_by_zero(
            "baseline emissions are zero; relative change is undefined",
        ));
    }

    let p = adoption.value();
    let blended_total = alternative_total * p + baseline_total * (1.0 - p);
    let direction = if blended_total < baseline_total {
        Direction::Decrease
    } else {
        Direction::Increase
    };

    Ok(BlendResult {
        vintage: None,
        adoption,
        baseline_total,
        alternative_total,
        blended_total,
        absolute_difference: (baseline_total - blended_total).abs(),
        percent_change: (1.0 - blended_total / baseline_total).abs() * 100.0,
        direction,
    })
}

/// Blend the total CO2-equivalent emissions of two scenarios
///
/// Both scenarios must have been aggregated with the same GWP coefficients.
pub fn blend(
    baseline: &ScenarioStats,
    alternative: &ScenarioStats,
    adoption: AdoptionFraction,
) -> GhgResult<BlendResult> {
    if baseline.coefficients != alternative.coefficients {
        return Err(GhgError::VintageMismatch {
            left: baseline.coefficients.to_string(),
            right: alternative.coefficients.to_string(),
        });
    }
    if baseline.years != alternative.years {
        log::warn!(
            "blending {} over {} with {} over {}",
            baseline.management,
            baseline.years,
            alternative.management,
            alternative.years
        );
    }

    let mut result = blend_totals(baseline.total_gwp(), alternative.total_gwp(), adoption)?;
    result.vintage = Some(baseline.vintage());
    Ok(result)
}
