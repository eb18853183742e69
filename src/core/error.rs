/// Raised when a profile record cannot be turned into a `CandidateProfile`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("unrecognized value {value:?} for field `{field}`")]
    InvalidValue { field: &'static str, value: String },
    #[error("field `{field}` is required when `{flag}` is true")]
    MissingField {
        field: &'static str,
        flag: &'static str,
    },
    #[error("invalid {test} score {value:?} for {skill}")]
    InvalidTestScore {
        test: &'static str,
        skill: &'static str,
        value: String,
    },
}

impl ProfileError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    pub fn missing(field: &'static str, flag: &'static str) -> Self {
        Self::MissingField { field, flag }
    }
}

/// Raised when a point-table document is malformed or internally inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed parsing point tables: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("thresholds in `{table}` must be strictly ascending")]
    Unsorted { table: &'static str },
    #[error("ceilings for {variant} applicants sum to {found}, expected {expected}")]
    CeilingMismatch {
        variant: &'static str,
        found: u32,
        expected: u32,
    },
    #[error("{what} overflow a 32-bit point total")]
    Overflow { what: &'static str },
    #[error("`{table}` can award {points} points, above its category ceiling of {ceiling}")]
    ExceedsCeiling {
        table: &'static str,
        points: u32,
        ceiling: u32,
    },
}
