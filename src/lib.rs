//! edotune - Retune notated pitches into 15, 17 and 19 EDO.
//!
//! This library provides the temperament resolver and the transactional
//! undo/redo history behind the retuning dialog.

pub mod history;
pub mod tuning;

// Re-export commonly used types
pub use history::{Command, FnCommand, History, TransactionState, MAX_HISTORY_SIZE};
pub use tuning::{
    PitchClass, Retunable, SimplePitch, Temperament, TuningError, TuningSession, TuningState,
};
