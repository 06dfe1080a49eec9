//! Flux variable catalogue and management regimes.
//!
//! The simulation output contains a fixed set of carbon and nitrogen flux variables.
//! Their identifiers follow the LandscapeDNDC naming (`dN_*` for nitrogen fluxes,
//! `dC_*` for carbon fluxes). This module provides a static, immutable catalogue of
//! those variables along with their display names, so that name resolution happens in
//! one place and is never mutated at runtime.
//!
//! ```rust
//! use paddyghg_core::gwp::Species;
//! use paddyghg_core::variable::{FluxVariable, VAR_CH4_EMISSION};
//!
//! let var = FluxVariable::lookup("dC_ch4_emis").unwrap();
//! assert_eq!(var.display_name, "CH4 Emission");
//! assert_eq!(FluxVariable::for_species(Species::CH4), &VAR_CH4_EMISSION);
//! ```

use crate::errors::{GhgError, GhgResult};
use crate::gwp::Species;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element that a flux is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Carbon,
    Nitrogen,
}

impl Element {
    /// Symbol used in unit labels (`kg C`, `kg N`)
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Carbon => "C",
            Element::Nitrogen => "N",
        }
    }
}

/// Definition of a flux variable in the simulation output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FluxVariable {
    /// Identifier used in the dataset (e.g. "dN_n2o_emis")
    pub name: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Element the flux is expressed in
    pub element: Element,
    /// Greenhouse gas species, if the flux has a GWP conversion
    pub species: Option<Species>,
}

macro_rules! flux_variable {
    ($ident:ident, $name:expr, $display:expr, $element:expr, $species:expr $(,)?) => {
        pub const $ident: FluxVariable = FluxVariable {
            name: $name,
            display_name: $display,
            element: $element,
            species: $species,
        };
    };
}

flux_variable!(
    VAR_N2O_EMISSION,
    "dN_n2o_emis",
    "N2O Emission",
    Element::Nitrogen,
    Some(Species::N2O),
);
flux_variable!(
    VAR_NO_EMISSION,
    "dN_no_emis",
    "NO(x) Emission",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_NH3_EMISSION,
    "dN_nh3_emis",
    "NH3 Emission",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_N2_EMISSION,
    "dN_n2_emis",
    "N2 Emission",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_NO3_LEACHING,
    "dN_no3_leach",
    "NO3 Leaching",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_NH4_LEACHING,
    "dN_nh4_leach",
    "NH4 Leaching",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_DON_LEACHING,
    "dN_don_leach",
    "DON Leaching",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_PLANT_N_UPTAKE,
    "dN_up_min",
    "Plant N uptake",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_N_DEPOSITION,
    "dN_dep",
    "Atmos. N deposition",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_N_FIXATION,
    "dN_n2_fix",
    "Biological N fixation",
    Element::Nitrogen,
    None
);
flux_variable!(
    VAR_CH4_EMISSION,
    "dC_ch4_emis",
    "CH4 Emission",
    Element::Carbon,
    Some(Species::CH4),
);

/// All known flux variables, nitrogen fluxes first
pub static FLUX_VARIABLES: [FluxVariable; 11] = [
    VAR_N2O_EMISSION,
    VAR_NO_EMISSION,
    VAR_NH3_EMISSION,
    VAR_N2_EMISSION,
    VAR_NO3_LEACHING,
    VAR_NH4_LEACHING,
    VAR_DON_LEACHING,
    VAR_PLANT_N_UPTAKE,
    VAR_N_DEPOSITION,
    VAR_N_FIXATION,
    VAR_CH4_EMISSION,
];

impl FluxVariable {
    /// Look up a variable by its dataset identifier
    pub fn lookup(name: &str) -> GhgResult<&'static FluxVariable> {
        FLUX_VARIABLES
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| GhgError::UnknownVariable(name.to_string()))
    }

    /// The emission variable of a greenhouse gas species
    pub fn for_species(species: Species) -> &'static FluxVariable {
        match species {
            Species::CH4 => &FLUX_VARIABLES[10],
            Species::N2O => &FLUX_VARIABLES[0],
        }
    }

    /// Variables that can be converted to CO2-equivalents
    pub fn ghg_variables() -> impl Iterator<Item = &'static FluxVariable> {
        FLUX_VARIABLES.iter().filter(|v| v.species.is_some())
    }
}

/// Display name of a dataset identifier, falling back to the identifier itself
pub fn display_name(name: &str) -> &str {
    FLUX_VARIABLES
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.display_name)
        .unwrap_or(name)
}

/// Rice-paddy water management regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Management {
    /// Conventional practice; the baseline for comparisons
    #[serde(rename = "CF")]
    ContinuouslyFlooded,
    /// Mitigation alternative
    #[serde(rename = "AWD")]
    AlternateWetDry,
}

impl Management {
    pub const ALL: [Management; 2] = [Management::ContinuouslyFlooded, Management::AlternateWetDry];

    /// Short code used in dataset file names
    pub fn code(&self) -> &'static str {
        match self {
            Management::ContinuouslyFlooded => "CF",
            Management::AlternateWetDry => "AWD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Management::ContinuouslyFlooded => "Continuously Flooded (CF)",
            Management::AlternateWetDry => "Alternate Wet-Dry (AWD)",
        }
    }

    pub fn is_baseline(&self) -> bool {
        *self == Management::ContinuouslyFlooded
    }
}

impl fmt::Display for Management {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Management {
    type Err = GhgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cf" | "conventional" | "continuously flooded" => Ok(Management::ContinuouslyFlooded),
            "awd" | "alternate wet-dry" | "alternate wetting-drying" => {
                Ok(Management::AlternateWetDry)
            }
            _ => Err(GhgError::Config(format!("unknown management regime '{}'", s))),
        }
    }
}
