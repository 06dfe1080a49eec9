use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GhgError {
    #[error("Insufficient data: {context}")]
    InsufficientData { context: String },
    #[error("Division by zero: {context}")]
    DivisionByZero { context: String },
    #[error("Adoption fraction must lie within [0, 1], got {0}")]
    InvalidFraction(f64),
    #[error("Invalid year range {start}..={end}: start must not be after end")]
    InvalidYearRange { start: i32, end: i32 },
    #[error("Length mismatch for {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    #[error("Time axis of '{name}' must be strictly increasing (violated at index {index})")]
    NonMonotonicTime { name: String, index: usize },
    #[error("A series named '{0}' already exists in the dataset")]
    DuplicateSeries(String),
    #[error("Unknown flux variable '{0}'")]
    UnknownVariable(String),
    #[error("Invalid {species} GWP coefficient {value}: must be finite and non-negative")]
    InvalidCoefficient { species: String, value: f64 },
    #[error("Unknown assessment report '{0}'. Expected one of AR4, AR5, AR5-feedback, AR6, custom")]
    UnknownAssessmentReport(String),
    #[error("Cannot combine results computed with different GWP vintages ({left} vs {right})")]
    VintageMismatch { left: String, right: String },
    #[error("Cannot combine carbon and nitrogen fluxes in one selection without converting to CO2-eq")]
    MixedElements,
    #[error("Rolling window must be at least one sample, got {0}")]
    InvalidWindow(usize),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Serialisation failed: {0}")]
    Serialisation(String),
}

impl GhgError {
    pub(crate) fn insufficient(context: impl Into<String>) -> Self {
        GhgError::InsufficientData {
            context: context.into(),
        }
    }

    pub(crate) fn division_by_zero(context: impl Into<String>) -> Self {
        GhgError::DivisionByZero {
            context: context.into(),
        }
    }
}

/// Convenience type for `Result<T, GhgError>`.
pub type GhgResult<T> = Result<T, GhgError>;
