use crate::generator::GenerationReport;
use crate::location::Location;
use thiserror::Error;

/// World generation could not produce a solvable placement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no solvable world found after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        report: GenerationReport,
    },

    #[error("no valid start tiles in Main")]
    NoStartCandidates,
}

/// Why a raw search path cannot be simulated as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path starts at {found} instead of {expected}")]
    WrongStart { expected: Location, found: Location },

    #[error("step {index} from {from} to {to} is not a legal move")]
    IllegalStep {
        index: usize,
        from: Location,
        to: Location,
    },

    #[error("step {index} lands on a wall at {at}")]
    OntoWall { index: usize, at: Location },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} has invalid value {value}")]
    InvalidParameter { field: &'static str, value: f64 },

    #[error("agents must use different algorithms ({0} is selected twice)")]
    DuplicateAlgorithm(String),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Error, Debug)]
pub enum RaceError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
}

pub type RaceResult<T> = Result<T, RaceError>;
