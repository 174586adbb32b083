use thiserror::Error;

/// Rejections raised at the input boundary. The projection engine itself
/// never fails; these come from `validate` and from CLI/API argument parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("{field} must be >= 0")]
    Negative { field: String },

    #[error("{field} must be > 0")]
    NotPositive { field: String },

    #[error("{field} must be > -100")]
    RateTooLow { field: String },

    #[error("horizonYears must be <= {max}")]
    HorizonTooLong { max: f64 },

    #[error("at least one allocation is required")]
    NoAllocations,

    #[error("allocation weights must not all be zero")]
    ZeroTotalWeight,

    #[error("invalid allocation '{0}': expected label:weight:annual-return")]
    AllocationSpec(String),
}

impl InputError {
    pub(crate) fn not_finite(field: impl Into<String>) -> Self {
        Self::NotFinite {
            field: field.into(),
        }
    }

    pub(crate) fn negative(field: impl Into<String>) -> Self {
        Self::Negative {
            field: field.into(),
        }
    }

    pub(crate) fn not_positive(field: impl Into<String>) -> Self {
        Self::NotPositive {
            field: field.into(),
        }
    }

    pub(crate) fn rate_too_low(field: impl Into<String>) -> Self {
        Self::RateTooLow {
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("targetCorpus must be a finite number > 0")]
    InvalidTarget,

    #[error("maxHorizonYears must be a finite number > 0")]
    InvalidMaxHorizon,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
