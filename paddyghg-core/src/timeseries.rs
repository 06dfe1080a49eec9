//! Flux time series.
//!
//! A [`FluxSeries`] holds the simulated flux of one variable for one management
//! scenario, either at daily or annual resolution. Every series carries its
//! [`TimeResolution`] so that statistics computed per sample are labelled correctly.
//!
//! Series are immutable. Filtering, resampling and smoothing return new series.

use crate::errors::{GhgError, GhgResult};
use crate::gwp::{GwpCoefficients, Species};
use chrono::{Datelike, Days, NaiveDate};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub type FloatValue = f64;

/// Sampling interval of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeResolution {
    /// One sample per calendar day
    Daily,
    /// One sample per calendar year, usually already summed over the year
    Annual,
}

impl TimeResolution {
    /// Time unit of a single sample, for use in unit labels (e.g. `kg C d-1`)
    pub fn per_sample_unit(&self) -> &'static str {
        match self {
            TimeResolution::Daily => "d-1",
            TimeResolution::Annual => "yr-1",
        }
    }
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeResolution::Daily => write!(f, "daily"),
            TimeResolution::Annual => write!(f, "annual"),
        }
    }
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> GhgResult<Self> {
        if start > end {
            return Err(GhgError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single year
    pub fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    /// Number of calendar years in the range
    pub fn year_count(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn contains_range(&self, other: &YearRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Sum of the samples that fall within one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualSum {
    pub year: i32,
    pub value: FloatValue,
    /// Number of samples that contributed to `value`
    pub samples: usize,
}

/// Flux of a single variable over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFluxSeries")]
pub struct FluxSeries {
    name: String,
    resolution: TimeResolution,
    dates: Vec<NaiveDate>,
    values: Array1<FloatValue>,
}

/// Unvalidated form of [`FluxSeries`] as found in serialised data
#[derive(Deserialize)]
struct RawFluxSeries {
    name: String,
    resolution: TimeResolution,
    dates: Vec<NaiveDate>,
    values: Array1<FloatValue>,
}

impl TryFrom<RawFluxSeries> for FluxSeries {
    type Error = GhgError;

    fn try_from(raw: RawFluxSeries) -> Result<Self, Self::Error> {
        FluxSeries::new(raw.name, raw.resolution, raw.dates, raw.values)
    }
}

impl FluxSeries {
    /// Create a new series
    ///
    /// The dates must be strictly increasing and have the same length as `values`.
    /// Annual series may contain at most one sample per calendar year.
    pub fn new(
        name: impl Into<String>,
        resolution: TimeResolution,
        dates: Vec<NaiveDate>,
        values: Array1<FloatValue>,
    ) -> GhgResult<Self> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(GhgError::LengthMismatch {
                context: format!("time axis of '{}'", name),
                expected: dates.len(),
                actual: values.len(),
            });
        }

        let violation = dates.windows(2).position(|pair| match resolution {
            TimeResolution::Daily => pair[0] >= pair[1],
            TimeResolution::Annual => pair[0].year() >= pair[1].year(),
        });
        if let Some(index) = violation {
            return Err(GhgError::NonMonotonicTime {
                name,
                index: index + 1,
            });
        }

        Ok(Self {
            name,
            resolution,
            dates,
            values,
        })
    }

    /// Create an annual series with one value per year
    ///
    /// Each sample is stamped on the 1st of January of its year.
    pub fn from_annual(
        name: impl Into<String>,
        years: &[i32],
        values: Array1<FloatValue>,
    ) -> GhgResult<Self> {
        let dates = years
            .iter()
            .map(|&year| {
                NaiveDate::from_ymd_opt(year, 1, 1).ok_or(GhgError::InvalidYearRange {
                    start: year,
                    end: year,
                })
            })
            .collect::<GhgResult<Vec<_>>>()?;
        Self::new(name, TimeResolution::Annual, dates, values)
    }

    /// Create a daily series of consecutive days starting at `start`
    pub fn from_daily(
        name: impl Into<String>,
        start: NaiveDate,
        values: Array1<FloatValue>,
    ) -> GhgResult<Self> {
        let name = name.into();
        let dates = (0..values.len() as u64)
            .map(|offset| {
                start
                    .checked_add_days(Days::new(offset))
                    .ok_or_else(|| GhgError::insufficient(format!("date overflow in '{}'", name)))
            })
            .collect::<GhgResult<Vec<_>>>()?;
        Self::new(name, TimeResolution::Daily, dates, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolution(&self) -> TimeResolution {
        self.resolution
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, FloatValue)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Distinct calendar years covered by the series, in order
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.dates.iter().map(|d| d.year()).collect();
        years.dedup();
        years
    }

    /// The years spanned by the series, or `None` if it is empty
    pub fn year_span(&self) -> Option<YearRange> {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => Some(YearRange {
                start: first.year(),
                end: last.year(),
            }),
            _ => None,
        }
    }

    /// Keep only the samples within the inclusive year range
    pub fn restrict(&self, range: YearRange) -> FluxSeries {
        let (dates, values): (Vec<NaiveDate>, Vec<FloatValue>) =
            self.iter().filter(|(d, _)| range.contains(d.year())).unzip();
        FluxSeries {
            name: self.name.clone(),
            resolution: self.resolution,
            dates,
            values: Array1::from(values),
        }
    }

    /// Sum the samples within each calendar year
    ///
    /// Years in a daily series that are not fully covered are still summed but a
    /// warning is logged, because their total is not comparable to a full year.
    pub fn annual_sums(&self) -> Vec<AnnualSum> {
        let sums = self.group_by_year();
        for sum in sums.iter().filter(|s| !self.is_complete(s)) {
            log::warn!(
                "'{}' only covers {} of {} days in {}; annual sum is partial",
                self.name,
                sum.samples,
                days_in_year(sum.year),
                sum.year
            );
        }
        sums
    }

    /// Sums of the calendar years that are fully covered by the series
    ///
    /// Every year of an annual series is complete. A year of a daily series is
    /// complete when it has one sample per day; partial years are left out.
    pub fn complete_annual_sums(&self) -> Vec<AnnualSum> {
        let (complete, partial): (Vec<AnnualSum>, Vec<AnnualSum>) = self
            .group_by_year()
            .into_iter()
            .partition(|s| self.is_complete(s));
        for sum in &partial {
            log::warn!(
                "skipping {} of '{}': only {} of {} days covered",
                sum.year,
                self.name,
                sum.samples,
                days_in_year(sum.year)
            );
        }
        complete
    }

    fn is_complete(&self, sum: &AnnualSum) -> bool {
        match self.resolution {
            TimeResolution::Annual => true,
            TimeResolution::Daily => sum.samples == days_in_year(sum.year),
        }
    }

    fn group_by_year(&self) -> Vec<AnnualSum> {
        let mut sums: Vec<AnnualSum> = Vec::new();
        for (date, value) in self.iter() {
            match sums.last_mut() {
                Some(last) if last.year == date.year() => {
                    last.value += value;
                    last.samples += 1;
                }
                _ => sums.push(AnnualSum {
                    year: date.year(),
                    value,
                    samples: 1,
                }),
            }
        }
        sums
    }

    /// Resample to annual resolution by summing within each calendar year
    pub fn to_annual(&self) -> GhgResult<FluxSeries> {
        if self.resolution == TimeResolution::Annual {
            return Ok(self.clone());
        }
        let sums = self.annual_sums();
        let years: Vec<i32> = sums.iter().map(|s| s.year).collect();
        let values: Array1<FloatValue> = sums.iter().map(|s| s.value).collect();
        FluxSeries::from_annual(self.name.clone(), &years, values)
    }

    /// Mean over all samples, or `None` for an empty series
    pub fn mean(&self) -> Option<FloatValue> {
        self.values.mean()
    }

    pub fn sum(&self) -> FloatValue {
        self.values.sum()
    }

    /// Centred moving average over `window` samples
    ///
    /// Only positions with a complete window are returned, so the result is
    /// `window - 1` samples shorter than the input. For even windows the extra
    /// sample is taken from after the centre.
    pub fn rolling_mean(&self, window: usize) -> GhgResult<FluxSeries> {
        if window == 0 {
            return Err(GhgError::InvalidWindow(window));
        }
        if window > self.len() {
            return Err(GhgError::insufficient(format!(
                "'{}' has {} samples, fewer than the rolling window of {}",
                self.name,
                self.len(),
                window
            )));
        }

        let offset = (window - 1) - window / 2;
        let values = self.values.to_vec();
        let means: Array1<FloatValue> = values
            .windows(window)
            .map(|w| w.iter().sum::<FloatValue>() / window as FloatValue)
            .collect();
        let dates = self.dates[offset..offset + means.len()].to_vec();

        Ok(FluxSeries {
            name: self.name.clone(),
            resolution: self.resolution,
            dates,
            values: means,
        })
    }

    /// Multiply every sample by a constant factor
    pub fn scaled(&self, factor: FloatValue) -> FluxSeries {
        FluxSeries {
            name: self.name.clone(),
            resolution: self.resolution,
            dates: self.dates.clone(),
            values: &self.values * factor,
        }
    }

    /// Convert every sample from elemental mass of `species` into CO2-equivalents
    pub fn to_co2eq(&self, species: Species, coefficients: &GwpCoefficients) -> FluxSeries {
        FluxSeries {
            name: self.name.clone(),
            resolution: self.resolution,
            dates: self.dates.clone(),
            values: self.values.mapv(|v| coefficients.to_co2eq(species, v)),
        }
    }
}

fn days_in_year(year: i32) -> usize {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|d| d.ordinal() as usize)
        .unwrap_or(365)
}
