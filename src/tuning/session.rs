//! The retuning session: state, history and observers wired together.
//!
//! A session is what a host dialog holds while it is open. Each setter is a
//! single undoable command; each `select_*`/`edit_*` action groups several
//! setters and a recalculation into one transaction so a single undo reverts
//! the whole user action.

use super::document::{self, DocumentStore, TuningDocument, TuningSettings};
use super::error::Result;
use super::pitch::{PitchClass, SimplePitch};
use super::resolver::{self, FinalOffsets};
use super::retune::{self, Retunable};
use super::state::{StateChange, TuningCommand, TuningState};
use super::temperament::{EnharmonicTable, Temperament};
use crate::history::History;

/// Receives every state change so the presentation layer can mirror it.
///
/// Changes arrive in application order, including those replayed by undo and
/// redo.
pub trait TuningObserver {
    fn on_change(&mut self, change: &StateChange);
}

/// An open retuning session.
pub struct TuningSession {
    state: TuningState,
    history: History<TuningCommand>,
    enharmonics: EnharmonicTable,
    observers: Vec<Box<dyn TuningObserver>>,
}

impl Default for TuningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TuningSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuningSession")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl TuningSession {
    /// Creates a session in the initial 12-EDO state with an empty history.
    pub fn new() -> Self {
        Self::with_history(History::new())
    }

    /// Creates a session using the given (empty) history, e.g. one with a
    /// custom capacity.
    pub fn with_history(history: History<TuningCommand>) -> Self {
        Self {
            state: TuningState::new(),
            history,
            enharmonics: EnharmonicTable::builtin(),
            observers: Vec::new(),
        }
    }

    /// Replaces the double-accidental spellings used by this session.
    pub fn with_enharmonics(mut self, enharmonics: EnharmonicTable) -> Self {
        self.enharmonics = enharmonics;
        self
    }

    /// Registers an observer.
    pub fn subscribe(&mut self, observer: Box<dyn TuningObserver>) {
        self.observers.push(observer);
    }

    /// Current tuning settings and final offsets.
    pub fn state(&self) -> &TuningState {
        &self.state
    }

    /// Undo/redo history of tuning commands.
    pub fn history(&self) -> &History<TuningCommand> {
        &self.history
    }

    /// Enharmonic maps used for double accidentals.
    pub fn enharmonics(&self) -> &EnharmonicTable {
        &self.enharmonics
    }

    // ==================== Setters ====================
    // Each setter is one command. Outside a transaction it is its own undo step.

    fn push(&mut self, change: StateChange, label: &str) {
        let command = TuningCommand::capture(&self.state, change, label);
        self.history.add(&mut self.state, command);
        self.notify();
    }

    pub fn set_temperament(&mut self, temperament: Temperament) {
        self.push(StateChange::Temperament(temperament), "Set temperament");
    }

    pub fn set_root(&mut self, root: SimplePitch) {
        self.push(StateChange::Root(root), "Set root");
    }

    pub fn set_pure_tone(&mut self, pure_tone: SimplePitch) {
        self.push(StateChange::PureTone(pure_tone), "Set pure tone");
    }

    pub fn set_tweak(&mut self, tweak: f64) {
        self.push(StateChange::Tweak(tweak), "Set tweak");
    }

    pub fn set_final_offset(&mut self, pitch: SimplePitch, value: f64) {
        self.push(StateChange::FinalOffset { pitch, value }, "Edit offset");
    }

    pub fn set_final_offsets(&mut self, offsets: FinalOffsets) {
        self.push(StateChange::FinalOffsets(offsets), "Set offsets");
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.push(StateChange::Modified(modified), "Set modified");
    }

    /// Recomputes all 21 final offsets from the current temperament, root,
    /// pure tone and tweak as one command.
    pub fn recalculate(&mut self) {
        let table = self.state.temperament().table();
        let (root, pure, tweak) = (
            self.state.root(),
            self.state.pure_tone(),
            self.state.tweak(),
        );
        let offsets =
            FinalOffsets::from_fn(|pitch| resolver::table_offset(table, root, pure, tweak, pitch));

        tracing::debug!(temperament = %self.state.temperament(), "recalculated offsets");
        self.push(StateChange::FinalOffsets(offsets), "Recalculate");
    }

    // ==================== User actions ====================

    /// Selects a temperament and resets root, pure tone and tweak to its
    /// defaults.
    pub fn select_temperament(&mut self, temperament: Temperament) {
        let table = temperament.table();
        self.transaction(|s| {
            s.set_temperament(temperament);
            s.set_root(table.root);
            s.set_pure_tone(table.pure_tone);
            s.set_tweak(0.0);
            s.recalculate();
            s.set_modified(false);
        });
    }

    /// Selects a new root; the tweak is reset.
    pub fn select_root(&mut self, root: SimplePitch) {
        self.transaction(|s| {
            s.set_root(root);
            s.set_tweak(0.0);
            s.recalculate();
            s.set_modified(false);
        });
    }

    /// Selects a new pure tone; the tweak is reset.
    pub fn select_pure_tone(&mut self, pure_tone: SimplePitch) {
        self.transaction(|s| {
            s.set_pure_tone(pure_tone);
            s.set_tweak(0.0);
            s.recalculate();
            s.set_modified(false);
        });
    }

    /// Changes the tweak and recalculates.
    pub fn edit_tweak(&mut self, tweak: f64) {
        self.transaction(|s| {
            s.set_tweak(tweak);
            s.recalculate();
            s.set_modified(false);
        });
    }

    /// Overrides one final offset by hand.
    pub fn edit_final_offset(&mut self, pitch: SimplePitch, value: f64) {
        self.transaction(|s| {
            s.set_final_offset(pitch, value);
            s.set_modified(true);
        });
    }

    /// Runs `f` inside one history transaction.
    pub fn transaction(&mut self, f: impl FnOnce(&mut Self)) {
        self.history.begin();
        f(self);
        self.history.end();
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last user action.
    ///
    /// # Returns
    ///
    /// true if something was undone
    pub fn undo(&mut self) -> bool {
        let label = self.history.undo_label().map(str::to_owned);
        let undone = self.history.undo(&mut self.state);
        if undone {
            tracing::debug!(label = ?label, "undo");
            self.notify();
        }
        undone
    }

    /// Redoes the last undone user action.
    ///
    /// # Returns
    ///
    /// true if something was redone
    pub fn redo(&mut self) -> bool {
        let label = self.history.redo_label().map(str::to_owned);
        let redone = self.history.redo(&mut self.state);
        if redone {
            tracing::debug!(label = ?label, "redo");
            self.notify();
        }
        redone
    }

    // ==================== Resolution ====================

    /// Resolves a host pitch class from the current final offsets.
    ///
    /// # Errors
    ///
    /// `InvalidPitchClass` or `UnsupportedDivision`.
    pub fn resolve(&self, pitch_class: i32) -> Result<f64> {
        resolver::resolve_final(
            PitchClass::new(pitch_class),
            self.state.division(),
            &self.enharmonics,
            self.state.final_offsets(),
        )
    }

    /// Resolves a host pitch class from the temperament table, ignoring any
    /// hand edits to simple spellings.
    ///
    /// Double accidentals still read the final offsets through the session's
    /// enharmonic maps.
    ///
    /// # Errors
    ///
    /// `InvalidPitchClass` or `UnsupportedDivision`.
    pub fn resolve_from_table(&self, pitch_class: i32) -> Result<f64> {
        resolver::resolve_offset(
            PitchClass::new(pitch_class),
            self.state.temperament().table(),
            self.state.root(),
            self.state.pure_tone(),
            self.state.tweak(),
            &self.enharmonics,
            self.state.final_offsets(),
        )
    }

    /// Writes the current tuning onto every given note.
    ///
    /// # Errors
    ///
    /// See [`retune::apply_tuning`]; no note is modified on error.
    pub fn apply_to<'a, N, I>(&self, notes: I) -> Result<usize>
    where
        N: Retunable + 'a,
        I: IntoIterator<Item = &'a mut N>,
    {
        retune::apply_tuning(
            notes,
            self.state.division(),
            &self.enharmonics,
            self.state.final_offsets(),
        )
    }

    // ==================== Persistence ====================

    /// Loads a document from `store` as one undoable action.
    ///
    /// The document is fully validated before anything changes.
    ///
    /// # Errors
    ///
    /// `Io` or `MalformedDocument`; the session is unchanged on error.
    pub fn load(&mut self, store: &mut dyn DocumentStore) -> Result<()> {
        let settings = match document::read_settings(store) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load tuning: {}", e);
                return Err(e);
            }
        };
        self.apply_settings(settings);
        tracing::info!(temperament = %self.state.temperament(), "tuning loaded");
        Ok(())
    }

    /// Applies validated settings as one undoable action.
    pub fn apply_settings(&mut self, settings: TuningSettings) {
        self.transaction(|s| {
            s.set_temperament(settings.temperament);
            s.set_root(settings.root);
            s.set_pure_tone(settings.pure_tone);
            s.set_tweak(settings.tweak);
            s.set_final_offsets(settings.final_offsets);
        });
    }

    /// Saves the current settings to `store`.
    ///
    /// # Errors
    ///
    /// `Io` if the store fails.
    pub fn save(&self, store: &mut dyn DocumentStore) -> Result<()> {
        document::write_state(store, &self.state)?;
        tracing::info!(temperament = %self.state.temperament(), "tuning saved");
        Ok(())
    }

    /// Returns the document that [`TuningSession::save`] would write.
    pub fn to_document(&self) -> TuningDocument {
        TuningDocument::from_state(&self.state)
    }

    fn notify(&mut self) {
        let changes = self.state.take_changes();
        for observer in &mut self.observers {
            for change in &changes {
                observer.on_change(change);
            }
        }
    }
}
