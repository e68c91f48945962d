//! Transactional undo/redo history.
//!
//! The history stores *commands*, not snapshots: every command knows how to
//! apply itself (`redo`) and how to revert itself (`undo`) against some target
//! state. Related commands are grouped into a single [`HistoryEntry`] so that
//! one user action (for example "select 19-EDO", which touches the root, the
//! pure tone, the tweak and all 21 offsets) undoes in a single step.

use std::collections::VecDeque;
use std::fmt;

/// Maximum number of undo/redo entries to keep.
pub const MAX_HISTORY_SIZE: usize = 30;

/// A reversible action against a target of type `T`.
///
/// `redo` applies the change and `undo` reverts it. Both must be repeatable:
/// the history may run `undo` then `redo` any number of times.
pub trait Command<T> {
    /// Reverts the change on `target`.
    fn undo(&self, target: &mut T);

    /// Applies the change on `target`.
    fn redo(&self, target: &mut T);

    /// A brief description of the change, used for status messages.
    fn label(&self) -> &str;
}

/// A command built from a pair of closures.
///
/// Handy for hosts that do not want to define their own command type.
pub struct FnCommand<T> {
    undo: Box<dyn Fn(&mut T)>,
    redo: Box<dyn Fn(&mut T)>,
    label: String,
}

impl<T> FnCommand<T> {
    /// Creates a command from its undo and redo actions.
    pub fn new(
        undo: impl Fn(&mut T) + 'static,
        redo: impl Fn(&mut T) + 'static,
        label: impl Into<String>,
    ) -> Self {
        Self {
            undo: Box::new(undo),
            redo: Box::new(redo),
            label: label.into(),
        }
    }
}

impl<T> Command<T> for FnCommand<T> {
    fn undo(&self, target: &mut T) {
        (self.undo)(target)
    }

    fn redo(&self, target: &mut T) {
        (self.redo)(target)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl<T> fmt::Debug for FnCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// One atomic, user-visible change made of zero or more commands.
#[derive(Debug)]
pub struct HistoryEntry<C> {
    commands: Vec<C>,

    /// Label of the first command, used for "Undo: ..." status messages.
    label: Option<String>,
}

impl<C> HistoryEntry<C> {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            label: None,
        }
    }

    fn push(&mut self, label: &str, command: C) {
        if self.label.is_none() {
            self.label = Some(label.to_owned());
        }
        self.commands.push(command);
    }

    /// Returns the entry label, or None for an empty entry.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the commands in insertion order.
    pub fn commands(&self) -> &[C] {
        &self.commands
    }

    /// Returns true if no command was recorded in this entry.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Whether a transaction is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// No open entry; `add` creates a single-command entry.
    #[default]
    Idle,
    /// An entry is open and accumulates every `add`.
    InTransaction,
}

/// Bounded undo/redo history with transactions.
///
/// Entries `0..applied` have been applied and can be undone, entries
/// `applied..len` have been undone and can be redone. Opening a new
/// transaction discards everything above `applied`, so a branch made after an
/// undo never leaves the old future reachable.
#[derive(Debug)]
pub struct History<C> {
    entries: VecDeque<HistoryEntry<C>>,

    /// Number of applied entries, i.e. cursor + 1.
    applied: usize,

    state: TransactionState,

    capacity: usize,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> History<C> {
    /// Creates a new empty history holding up to [`MAX_HISTORY_SIZE`] entries.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// Creates a new empty history holding up to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be at least 1");
        Self {
            entries: VecDeque::with_capacity(capacity),
            applied: 0,
            state: TransactionState::Idle,
            capacity,
        }
    }

    /// Opens a new transaction.
    ///
    /// Every redo-able entry is discarded first. If the history is full, the
    /// oldest entry is evicted to make room.
    ///
    /// # Panics
    ///
    /// Panics if a transaction is already open. Nested transactions are an
    /// orchestration bug, not a recoverable condition.
    pub fn begin(&mut self) {
        assert!(
            self.state == TransactionState::Idle,
            "History::begin called while a transaction is already open"
        );

        self.entries.truncate(self.applied);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry::new());
        self.applied = self.entries.len();
        self.state = TransactionState::InTransaction;

        tracing::trace!(entries = self.entries.len(), "history transaction opened");
    }

    /// Closes the open transaction.
    ///
    /// # Panics
    ///
    /// Panics if no transaction is open.
    pub fn end(&mut self) {
        assert!(
            self.state == TransactionState::InTransaction,
            "History::end called without an open transaction"
        );
        self.state = TransactionState::Idle;

        tracing::trace!(entries = self.entries.len(), "history transaction closed");
    }

    /// Returns the current transaction state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns true if a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.state == TransactionState::InTransaction
    }

    /// Returns the cursor: the index of the entry the next undo reverts,
    /// or `None` when there is nothing to undo.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Returns the number of stored entries (undoable and redoable).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if there is an entry to undo.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns true if there is an entry to redo.
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Returns the number of entries available to undo.
    pub fn undo_count(&self) -> usize {
        self.applied
    }

    /// Returns the number of entries available to redo.
    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.applied
    }

    /// Drops every entry.
    ///
    /// Called when the host discards the session or starts from a fresh
    /// document.
    ///
    /// # Panics
    ///
    /// Panics if a transaction is open.
    pub fn clear(&mut self) {
        assert!(
            !self.in_transaction(),
            "History::clear called while a transaction is open"
        );
        self.entries.clear();
        self.applied = 0;
    }

    /// Returns the label of the entry the next undo reverts.
    ///
    /// An entry is labelled after its first command. Empty entries have no
    /// label.
    pub fn undo_label(&self) -> Option<&str> {
        self.entries.get(self.cursor()?)?.label()
    }

    /// Returns the label of the entry the next redo re-applies.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.applied)?.label()
    }

    fn assert_idle(&self, operation: &str) {
        assert!(
            !self.in_transaction(),
            "History::{} called while a transaction is open",
            operation
        );
    }
}

impl<C> History<C> {
    /// Applies `command` to `target` and records it.
    ///
    /// Inside a transaction the command joins the open entry; otherwise it
    /// becomes an entry of its own.
    pub fn add<T>(&mut self, target: &mut T, command: C)
    where
        C: Command<T>,
    {
        command.redo(target);
        tracing::debug!(label = command.label(), "command applied");

        let opened_here = self.state == TransactionState::Idle;
        if opened_here {
            self.begin();
        }
        let label = command.label().to_owned();
        if let Some(entry) = self.entries.back_mut() {
            entry.push(&label, command);
        }
        if opened_here {
            self.end();
        }
    }

    /// Reverts the most recent applied entry.
    ///
    /// Commands are undone last-first, since later commands may depend on
    /// earlier ones.
    ///
    /// # Returns
    ///
    /// true if an entry was undone, false if there was nothing to undo
    ///
    /// # Panics
    ///
    /// Panics if a transaction is open.
    pub fn undo<T>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        self.assert_idle("undo");
        let Some(index) = self.cursor() else {
            return false;
        };

        for command in self.entries[index].commands.iter().rev() {
            command.undo(target);
        }
        self.applied -= 1;

        tracing::debug!(cursor = ?self.cursor(), "undo");
        true
    }

    /// Re-applies the most recently undone entry.
    ///
    /// # Returns
    ///
    /// true if an entry was redone, false if there was nothing to redo
    ///
    /// # Panics
    ///
    /// Panics if a transaction is open.
    pub fn redo<T>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        self.assert_idle("redo");
        if !self.can_redo() {
            return false;
        }

        self.applied += 1;
        for command in &self.entries[self.applied - 1].commands {
            command.redo(target);
        }

        tracing::debug!(cursor = ?self.cursor(), "redo");
        true
    }
}
