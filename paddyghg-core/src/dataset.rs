use crate::errors::{GhgError, GhgResult};
use crate::gwp::{GwpCoefficients, Species};
use crate::timeseries::{FloatValue, FluxSeries, YearRange};
use crate::variable::{display_name, Element, FluxVariable, Management};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value in long ("melted") format, ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxRecord {
    pub date: NaiveDate,
    /// Display name of the flux variable
    pub variable: String,
    pub value: FloatValue,
}

/// The flux series of one management scenario.
/// Allows for easy access to the series by variable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScenarioDataset")]
pub struct ScenarioDataset {
    management: Management,
    series: BTreeMap<String, FluxSeries>,
}

/// Unvalidated form of [`ScenarioDataset`] as found in serialised data
#[derive(Deserialize)]
struct RawScenarioDataset {
    management: Management,
    series: BTreeMap<String, FluxSeries>,
}

impl TryFrom<RawScenarioDataset> for ScenarioDataset {
    type Error = GhgError;

    /// Every series must be stored under its own name
    fn try_from(raw: RawScenarioDataset) -> Result<Self, Self::Error> {
        if let Some((key, series)) = raw.series.iter().find(|(k, s)| k.as_str() != s.name()) {
            return Err(GhgError::Config(format!(
                "series '{}' is stored under the key '{}'",
                series.name(),
                key
            )));
        }
        Ok(Self {
            management: raw.management,
            series: raw.series,
        })
    }
}

impl ScenarioDataset {
    pub fn new(management: Management) -> Self {
        Self {
            management,
            series: BTreeMap::new(),
        }
    }

    /// Add a series to the dataset
    ///
    /// Fails if a series with the same name already exists.
    pub fn add_series(&mut self, series: FluxSeries) -> GhgResult<()> {
        if self.series.contains_key(series.name()) {
            return Err(GhgError::DuplicateSeries(series.name().to_string()));
        }
        log::debug!(
            "adding '{}' ({} samples, {}) to {} dataset",
            series.name(),
            series.len(),
            series.resolution(),
            self.management
        );
        self.series.insert(series.name().to_string(), series);
        Ok(())
    }

    /// Builder-style variant of [`ScenarioDataset::add_series`]
    pub fn with_series(mut self, series: FluxSeries) -> GhgResult<Self> {
        self.add_series(series)?;
        Ok(self)
    }

    pub fn management(&self) -> Management {
        self.management
    }

    pub fn get(&self, name: &str) -> Option<&FluxSeries> {
        self.series.get(name)
    }

    /// The emission series of a greenhouse gas species
    pub fn species_series(&self, species: Species) -> GhgResult<&FluxSeries> {
        let variable = FluxVariable::for_species(species);
        self.get(variable.name).ok_or_else(|| {
            GhgError::insufficient(format!(
                "no {} series ('{}') in the {} dataset",
                species, variable.name, self.management
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FluxSeries> {
        self.series.values()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Restrict every series to an inclusive year range
    pub fn restrict(&self, range: YearRange) -> ScenarioDataset {
        ScenarioDataset {
            management: self.management,
            series: self
                .series
                .iter()
                .map(|(name, s)| (name.clone(), s.restrict(range)))
                .collect(),
        }
    }

    /// A dataset containing only the named series
    ///
    /// An empty selection, or a name that is not present, is reported as
    /// insufficient data.
    pub fn select(&self, names: &[&str]) -> GhgResult<ScenarioDataset> {
        if names.is_empty() {
            return Err(GhgError::insufficient("no flux variables selected"));
        }
        let mut selected = ScenarioDataset::new(self.management);
        for name in names {
            let series = self.get(name).ok_or_else(|| {
                GhgError::insufficient(format!(
                    "'{}' is not available in the {} dataset",
                    name, self.management
                ))
            })?;
            selected.add_series(series.clone())?;
        }
        Ok(selected)
    }

    /// The greenhouse gas series converted to CO2-equivalents
    ///
    /// Fluxes without a GWP conversion are left out.
    pub fn to_co2eq(&self, coefficients: &GwpCoefficients) -> GhgResult<ScenarioDataset> {
        let mut converted = ScenarioDataset::new(self.management);
        for series in self.iter() {
            if let Some(species) = FluxVariable::lookup(series.name())
                .ok()
                .and_then(|v| v.species)
            {
                converted.add_series(series.to_co2eq(species, coefficients))?;
            }
        }
        if converted.is_empty() {
            return Err(GhgError::insufficient(format!(
                "the {} dataset contains no greenhouse gas series",
                self.management
            )));
        }
        Ok(converted)
    }

    /// Long-format records of the selected series, labelled with display names
    pub fn to_records(&self, names: &[&str]) -> GhgResult<Vec<FluxRecord>> {
        let selected = self.select(names)?;
        let mut records = Vec::new();
        for name in names {
            if let Some(series) = selected.get(name) {
                let label = display_name(name);
                records.extend(series.iter().map(|(date, value)| FluxRecord {
                    date,
                    variable: label.to_string(),
                    value,
                }));
            }
        }
        Ok(records)
    }

    /// Unit label of a selection of series, excluding the per-area and per-time parts
    ///
    /// Carbon and nitrogen fluxes share a label only once converted to CO2-equivalents.
    pub fn unit_label(names: &[&str], as_co2eq: bool) -> GhgResult<String> {
        if names.is_empty() {
            return Err(GhgError::insufficient("no flux variables selected"));
        }
        if as_co2eq {
            return Ok("kg CO2-eq".to_string());
        }
        let mut element: Option<Element> = None;
        for name in names {
            let var = FluxVariable::lookup(name)?;
            match element {
                Some(e) if e != var.element => return Err(GhgError::MixedElements),
                _ => element = Some(var.element),
            }
        }
        Ok(match element {
            Some(e) => format!("kg {}", e.symbol()),
            None => "kg".to_string(),
        })
    }
}

impl IntoIterator for ScenarioDataset {
    type Item = FluxSeries;
    type IntoIter = std::collections::btree_map::IntoValues<String, FluxSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.into_values()
    }
}
