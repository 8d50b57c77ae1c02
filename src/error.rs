use crate::physics::Phase;
use crate::sources::PropertyError;
use crate::survey::ExtractionMethod;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GravError {
    #[error("no standard density for {phase} in region {region}")]
    MissingDensityModel { phase: Phase, region: u32 },

    #[error("unknown survey `{name}`{}", method.map(|m| format!(" ({m})")).unwrap_or_default())]
    UnknownSurvey {
        name: String,
        method: Option<ExtractionMethod>,
    },

    #[error("surveys `{base}` and `{monitor}` are both registered under {methods:?}; name the method")]
    AmbiguousSurvey {
        base: String,
        monitor: String,
        methods: Vec<ExtractionMethod>,
    },

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("property `{name}` has {found} entries, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid phase mask {0:#05b}")]
    InvalidPhaseMask(u8),

    #[error("phase {phase} is present in survey `{present_in}` but not in `{missing_in}`")]
    PhaseMismatch {
        phase: Phase,
        present_in: String,
        missing_in: String,
    },

    #[error("invalid density {value} for {phase}")]
    InvalidDensity { phase: Phase, value: f64 },

    #[error("cell {cell} has invalid region id {value}")]
    InvalidRegionId { cell: usize, value: f64 },

    #[error("cell selection has {found} entries, expected {expected}")]
    InvalidSelection { expected: usize, found: usize },
}

impl From<PropertyError> for GravError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::UnknownProperty(name) => GravError::UnknownProperty(name),
            PropertyError::DimensionMismatch {
                name,
                expected,
                found,
            } => GravError::DimensionMismatch {
                name,
                expected,
                found,
            },
        }
    }
}

pub type GravResult<T> = Result<T, GravError>;
