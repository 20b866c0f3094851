//! Error taxonomy for tensor construction, tensor algebra and metric calls.
//!
//! Every variant is a contract violation: the caller passed something the
//! engine refuses to compute on. Numeric degeneracies (zero marginals, zero
//! joints) are never errors; the metrics zero-substitute them instead.

use thiserror::Error;

/// Errors raised by the tensor engine and the metrics built on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("empty mass array provided")]
    Empty,

    #[error("mass has {rank} dimensions but {labels} labels were given")]
    RankMismatch { rank: usize, labels: usize },

    #[error("mass value {value} at flat index {index} is outside [0, 1]")]
    MassOutOfRange { index: usize, value: f64 },

    #[error("counts must be finite and non-negative, found {value} at flat index {index}")]
    InvalidCount { index: usize, value: f64 },

    #[error("mass flagged as normalized sums to {sum}, expected 1")]
    NotNormalized { sum: f64 },

    #[error("label '{0}' does not match any tensor axis")]
    UnknownLabel(String),

    #[error("label '{0}' appears more than once")]
    DuplicateLabel(String),

    #[error("{what}: expected {expected} entries, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("index {index} is out of range for axis '{label}' of size {size}")]
    IndexOutOfRange {
        label: String,
        index: usize,
        size: usize,
    },

    #[error("operation would leave axis '{0}' without bins")]
    EmptyAxis(String),

    #[error("not allowed to remove every axis of the tensor")]
    AllAxesRemoved,

    #[error("no labels specified")]
    NoLabels,

    #[error("condition variables must not cover every axis")]
    ConditionCoversAll,

    #[error("total mass is zero, cannot normalize")]
    ZeroMass,

    #[error("fraction {0} must lie in (0, 1]")]
    InvalidFraction(f64),

    #[error("unsupported log base '{0}', expected one of \"log2\", \"log\", \"log10\"")]
    UnsupportedLogBase(String),

    #[error("bin counts differ: '{left}' has {left_bins} bins, '{right}' has {right_bins}")]
    BinMismatch {
        left: String,
        left_bins: usize,
        right: String,
        right_bins: usize,
    },

    #[error("{what} needs at least {needed} labels, got {got}")]
    NotEnoughLabels {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("{metric} takes {min} to {max} arguments, got {got}")]
    ArityMismatch {
        metric: String,
        min: usize,
        max: usize,
        got: usize,
    },

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("{metric}: argument {position} must be {expected}")]
    ArgumentType {
        metric: String,
        position: usize,
        expected: &'static str,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("array shape error: {0}")]
    Shape(String),
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
