//! Mutable tuning state and the commands that change it.
//!
//! State is never mutated directly by callers. Every change is a
//! [`TuningCommand`] carrying the value before and after, applied through the
//! history. Each applied change is also appended to a journal so that an
//! observer (the host's form fields, radio buttons, ...) can mirror it.
//!
//! [`TuningSession`](super::TuningSession) drains the journal after every
//! action. A host that drives a `History<TuningCommand>` itself must call
//! [`TuningState::take_changes`] after each `add`, `undo` or `redo`, or the
//! journal keeps growing.

use super::pitch::SimplePitch;
use super::resolver::FinalOffsets;
use super::temperament::{Temperament, DEFAULT_PURE_TONE, DEFAULT_ROOT};
use crate::history::Command;

/// A single field assignment on [`TuningState`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// Selects a temperament; the division follows it.
    Temperament(Temperament),
    Root(SimplePitch),
    PureTone(SimplePitch),
    Tweak(f64),
    /// One edited field.
    FinalOffset { pitch: SimplePitch, value: f64 },
    /// All 21 fields at once (recalculation, document load).
    FinalOffsets(FinalOffsets),
    Modified(bool),
}

/// Session state of the retuning dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningState {
    temperament: Temperament,

    /// Steps per octave, kept in step with `temperament`.
    division: u32,

    root: SimplePitch,

    pure_tone: SimplePitch,

    /// Extra cents added to every simple pitch class.
    tweak: f64,

    final_offsets: FinalOffsets,

    /// True once a final offset was edited by hand since the last recalculation.
    modified: bool,

    /// Changes applied since the last [`TuningState::take_changes`].
    journal: Vec<StateChange>,
}

impl Default for TuningState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuningState {
    /// Creates the initial state: 12-EDO, root C, pure A, no tweak, all zeros.
    pub fn new() -> Self {
        let temperament = Temperament::Equal12;
        Self {
            temperament,
            division: temperament.division(),
            root: DEFAULT_ROOT,
            pure_tone: DEFAULT_PURE_TONE,
            tweak: 0.0,
            final_offsets: FinalOffsets::default(),
            modified: false,
            journal: Vec::new(),
        }
    }

    /// Selected temperament.
    pub fn temperament(&self) -> Temperament {
        self.temperament
    }

    /// Steps per octave of the selected temperament.
    pub fn division(&self) -> u32 {
        self.division
    }

    /// Pitch class the table is rotated to.
    pub fn root(&self) -> SimplePitch {
        self.root
    }

    /// Pitch class that sounds at 0 cents.
    pub fn pure_tone(&self) -> SimplePitch {
        self.pure_tone
    }

    /// Cents added to every simple pitch class on recalculation.
    pub fn tweak(&self) -> f64 {
        self.tweak
    }

    /// The 21 offsets written onto notes.
    pub fn final_offsets(&self) -> &FinalOffsets {
        &self.final_offsets
    }

    /// Returns the final offset of one simple pitch class.
    pub fn final_offset(&self, pitch: SimplePitch) -> f64 {
        self.final_offsets[pitch]
    }

    /// True if a final offset was edited by hand since the last recalculation.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the change that would restore the current value of the field
    /// `change` touches.
    pub fn current_value_of(&self, change: &StateChange) -> StateChange {
        match change {
            StateChange::Temperament(_) => StateChange::Temperament(self.temperament),
            StateChange::Root(_) => StateChange::Root(self.root),
            StateChange::PureTone(_) => StateChange::PureTone(self.pure_tone),
            StateChange::Tweak(_) => StateChange::Tweak(self.tweak),
            StateChange::FinalOffset { pitch, .. } => StateChange::FinalOffset {
                pitch: *pitch,
                value: self.final_offsets[*pitch],
            },
            StateChange::FinalOffsets(_) => StateChange::FinalOffsets(self.final_offsets),
            StateChange::Modified(_) => StateChange::Modified(self.modified),
        }
    }

    /// Applies a change and records it in the journal.
    pub(crate) fn apply(&mut self, change: &StateChange) {
        match change {
            StateChange::Temperament(t) => {
                self.temperament = *t;
                self.division = t.division();
            }
            StateChange::Root(p) => self.root = *p,
            StateChange::PureTone(p) => self.pure_tone = *p,
            StateChange::Tweak(t) => self.tweak = *t,
            StateChange::FinalOffset { pitch, value } => self.final_offsets[*pitch] = *value,
            StateChange::FinalOffsets(offsets) => self.final_offsets = *offsets,
            StateChange::Modified(m) => self.modified = *m,
        }
        self.journal.push(change.clone());
    }

    /// Drains the changes applied since the previous call.
    ///
    /// Must be called after every history operation when no session does it.
    pub fn take_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.journal)
    }

    /// Returns true if two states hold the same settings and offsets,
    /// ignoring the change journal.
    pub fn same_settings(&self, other: &TuningState) -> bool {
        self.temperament == other.temperament
            && self.division == other.division
            && self.root == other.root
            && self.pure_tone == other.pure_tone
            && self.tweak.to_bits() == other.tweak.to_bits()
            && self.modified == other.modified
            && self
                .final_offsets
                .as_array()
                .iter()
                .zip(other.final_offsets.as_array())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// A reversible assignment on [`TuningState`].
///
/// Holds exactly the value before (`undo`) and after (`redo`). Applying one
/// appends to the state's journal; see the module docs for draining it.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningCommand {
    label: String,
    undo: StateChange,
    redo: StateChange,
}

impl TuningCommand {
    /// Builds a command that moves `state` to `change`, capturing the prior
    /// value from `state`.
    pub fn capture(state: &TuningState, change: StateChange, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            undo: state.current_value_of(&change),
            redo: change,
        }
    }
}

impl Command<TuningState> for TuningCommand {
    fn undo(&self, target: &mut TuningState) {
        target.apply(&self.undo);
    }

    fn redo(&self, target: &mut TuningState) {
        target.apply(&self.redo);
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;

    #[test]
    fn test_initial_state() {
        let state = TuningState::new();
        assert_eq!(state.temperament(), Temperament::Equal12);
        assert_eq!(state.division(), 12);
        assert_eq!(state.root(), SimplePitch::C);
        assert_eq!(state.pure_tone(), SimplePitch::A);
        assert_eq!(state.tweak(), 0.0);
        assert_eq!(*state.final_offsets(), FinalOffsets::default());
        assert!(!state.is_modified());
    }

    #[test]
    fn test_temperament_keeps_division_consistent() {
        let mut state = TuningState::new();
        state.apply(&StateChange::Temperament(Temperament::Equal17));
        assert_eq!(state.division(), 17);
    }

    #[test]
    fn test_capture_and_revert() {
        let mut state = TuningState::new();
        let cmd = TuningCommand::capture(
            &state,
            StateChange::FinalOffset {
                pitch: SimplePitch::E,
                value: -13.7,
            },
            "Edit E",
        );

        cmd.redo(&mut state);
        assert_eq!(state.final_offset(SimplePitch::E), -13.7);

        cmd.undo(&mut state);
        assert_eq!(state.final_offset(SimplePitch::E), 0.0);
        assert_eq!(cmd.label(), "Edit E");
    }

    #[test]
    fn test_journal_records_changes() {
        let mut state = TuningState::new();
        state.apply(&StateChange::Root(SimplePitch::G));
        state.apply(&StateChange::Tweak(1.5));

        let changes = state.take_changes();
        assert_eq!(
            changes,
            vec![StateChange::Root(SimplePitch::G), StateChange::Tweak(1.5)]
        );
        assert!(state.take_changes().is_empty());
    }

    #[test]
    fn test_history_without_session_drains_journal() {
        let mut state = TuningState::new();
        let mut history: History<TuningCommand> = History::new();

        for tweak in [1.0, 2.0, 3.0] {
            let cmd = TuningCommand::capture(&state, StateChange::Tweak(tweak), "Set tweak");
            history.add(&mut state, cmd);
            assert_eq!(state.take_changes(), vec![StateChange::Tweak(tweak)]);
        }

        assert!(history.undo(&mut state));
        assert_eq!(state.take_changes(), vec![StateChange::Tweak(2.0)]);
        assert!(history.redo(&mut state));
        assert_eq!(state.take_changes(), vec![StateChange::Tweak(3.0)]);
        assert!(state.take_changes().is_empty());
    }
}
