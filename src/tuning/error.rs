//! Errors reported by the tuning core.

use thiserror::Error;

/// Result alias used throughout the tuning module.
pub type Result<T> = std::result::Result<T, TuningError>;

/// Errors that can occur while resolving or persisting a tuning.
///
/// Every variant leaves the session in its last good state: the failing
/// operation aborts before anything is mutated.
#[derive(Debug, Error)]
pub enum TuningError {
    /// The host supplied a pitch class outside Fbb..=B##.
    #[error("pitch class {0} is outside the supported range -1..=33")]
    InvalidPitchClass(i32),

    /// No enharmonic table exists for this division of the octave.
    #[error("unsupported division of the octave: {0}-EDO")]
    UnsupportedDivision(u32),

    /// The persisted document could not be parsed or names an unknown temperament.
    #[error("malformed tuning document: {0}")]
    MalformedDocument(String),

    /// The read/write capability failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::MalformedDocument(e.to_string())
    }
}
