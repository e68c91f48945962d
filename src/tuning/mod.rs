//! Retuning of notated pitches into alternative equal divisions of the octave.
//!
//! This module provides the pitch-class model, the built-in temperaments, the
//! offset resolver and the undoable session that ties them together.

mod document;
mod error;
mod pitch;
mod resolver;
mod retune;
mod session;
mod state;
mod temperament;

pub use document::{
    read_settings, write_state, DocumentStore, FileStore, TuningDocument, TuningSettings,
};
pub use error::{Result, TuningError};
pub use pitch::{
    PitchClass, SimplePitch, Spelling, MAX_PITCH_CLASS, MIN_PITCH_CLASS, SIMPLE_PITCH_COUNT,
    SIMPLE_PITCH_NAMES,
};
pub use resolver::{resolve_final, resolve_offset, resolve_with, table_offset, FinalOffsets};
pub use retune::{apply_tuning, Retunable};
pub use session::{TuningObserver, TuningSession};
pub use state::{StateChange, TuningCommand, TuningState};
pub use temperament::{
    EnharmonicMap, EnharmonicTable, OffsetTable, Temperament, TemperamentTable,
    DEFAULT_PURE_TONE, DEFAULT_ROOT,
};

/// Formats a cent offset the way the offset fields display it: signed, one
/// decimal place.
///
/// # Examples
///
/// ```
/// use edotune::tuning::format_cents;
///
/// assert_eq!(format_cents(15.79), "+15.8");
/// assert_eq!(format_cents(-5.3), "-5.3");
/// assert_eq!(format_cents(0.0), "0.0");
/// ```
pub fn format_cents(cents: f64) -> String {
    let rounded = (cents * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{:.1}", rounded)
    } else if rounded < 0.0 {
        format!("{:.1}", rounded)
    } else {
        "0.0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(57.9), "+57.9");
        assert_eq!(format_cents(-0.04), "0.0");
        assert_eq!(format_cents(-47.36), "-47.4");
    }
}
