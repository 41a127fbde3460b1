#![forbid(unsafe_code)]

//! History stack for undo/redo operations.
//!
//! This module provides the [`HistoryManager`] which maintains dual stacks
//! for undo and redo with:
//!
//! - **Depth limits**: Oldest command evicted once `max_stack_size` is exceeded
//! - **Branch handling**: New actions clear the redo stack
//! - **No-op degradation**: Undo/redo on an empty stack return `None`
//!
//! # Invariants
//!
//! 1. `undo_stack.len() <= config.max_stack_size` (after any operation)
//! 2. Redo stack is cleared whenever a new command is executed or recorded
//! 3. Eviction only ever removes the oldest (bottom) undo entry
//! 4. A command lives on exactly one stack at a time
//!
//! # Memory Model
//!
//! Commands are stored in `VecDeque` for O(1) eviction from the front.
//! The redo stack has no separate bound: it only holds commands popped from
//! the undo stack since the last new action.
//!
//! ```text
//! execute(cmd5)
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2, cmd3, cmd4, cmd5]    │
//! │ Redo Stack: []                                 │
//! └───────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2, cmd3]                │
//! │ Redo Stack: [cmd5, cmd4]                       │
//! └───────────────────────────────────────────────┘
//!
//! execute(cmd6)  <-- new branch, clears redo
//! ┌───────────────────────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2, cmd3, cmd6]          │
//! │ Redo Stack: []                                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! One manager belongs to one editing session. Two calendar views that
//! should not share undo state get two managers.

use std::collections::VecDeque;
use std::fmt;

use tempo_core::Entity;

use crate::command::Command;
use crate::config::HistoryConfig;

/// Result of a successful undo or redo.
#[derive(Debug)]
pub struct Applied<'a, E: Entity> {
    /// The collection after the transform.
    pub state: Vec<E>,
    /// The command that was applied (for "Undo: Move ..." style messages).
    pub command: &'a Command<E>,
}

/// Manager for undo/redo history.
pub struct HistoryManager<E: Entity> {
    /// Commands available for undo (newest at back).
    undo_stack: VecDeque<Command<E>>,
    /// Commands available for redo (newest at back).
    redo_stack: VecDeque<Command<E>>,
    config: HistoryConfig,
}

impl<E: Entity> fmt::Debug for HistoryManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<E: Entity> Default for HistoryManager<E> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<E: Entity> HistoryManager<E> {
    /// Create a new history manager with the given configuration.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Apply `cmd` to `state` and push it onto the undo stack.
    ///
    /// Clears the redo stack and evicts the oldest entry if the stack bound
    /// is exceeded. Returns the new collection.
    #[must_use = "the returned collection is the new state"]
    pub fn execute(&mut self, cmd: Command<E>, state: &[E]) -> Vec<E> {
        let next = cmd.execute(state);
        tracing::debug!(
            command_id = %cmd.id(),
            command_type = cmd.command_type().as_str(),
            description = cmd.description(),
            "history execute"
        );
        self.push(cmd);
        next
    }

    /// Push a command whose effect the caller has already applied.
    ///
    /// Same stack rules as [`execute`](Self::execute), without touching any
    /// collection.
    pub fn record(&mut self, cmd: Command<E>) {
        tracing::debug!(
            command_id = %cmd.id(),
            command_type = cmd.command_type().as_str(),
            description = cmd.description(),
            "history record"
        );
        self.push(cmd);
    }

    /// Undo the most recent command.
    ///
    /// Moves the command from the undo stack to the redo stack and returns
    /// its inverse applied to `state`. Returns `None` if there is nothing to
    /// undo; both stacks are then unchanged.
    pub fn undo(&mut self, state: &[E]) -> Option<Applied<'_, E>> {
        let cmd = self.undo_stack.pop_back()?;
        let next = cmd.undo(state);
        let id = cmd.id();
        self.redo_stack.push_back(cmd);
        tracing::debug!(
            command_id = %id,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history undo"
        );
        let command = self.redo_stack.back()?;
        Some(Applied {
            state: next,
            command,
        })
    }

    /// Redo the most recently undone command.
    ///
    /// Moves the command from the redo stack back to the undo stack and
    /// returns its forward transform applied to `state`. Returns `None` if
    /// there is nothing to redo.
    pub fn redo(&mut self, state: &[E]) -> Option<Applied<'_, E>> {
        let cmd = self.redo_stack.pop_back()?;
        let next = cmd.execute(state);
        let id = cmd.id();
        self.undo_stack.push_back(cmd);
        tracing::debug!(
            command_id = %id,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history redo"
        );
        let command = self.undo_stack.back()?;
        Some(Applied {
            state: next,
            command,
        })
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Description of the command [`undo`](Self::undo) would revert.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::description)
    }

    /// Description of the command [`redo`](Self::redo) would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(Command::description)
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Get descriptions for undo commands (most recent first).
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::description)
            .collect()
    }

    /// Get descriptions for redo commands (most recent first).
    pub fn redo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(Command::description)
            .collect()
    }

    /// Undo entries from oldest to newest.
    pub fn iter_undo(&self) -> impl DoubleEndedIterator<Item = &Command<E>> + '_ {
        self.undo_stack.iter()
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drop all history. Call when the editing session is saved or discarded.
    pub fn clear(&mut self) {
        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history clear"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push(&mut self, cmd: Command<E>) {
        // New branch
        self.redo_stack.clear();
        self.undo_stack.push_back(cmd);
        self.enforce_limits();
    }

    fn enforce_limits(&mut self) {
        while self.undo_stack.len() > self.config.max_stack_size {
            if let Some(evicted) = self.undo_stack.pop_front() {
                tracing::trace!(command_id = %evicted.id(), "history evict");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempo_core::{CalendarEvent, TimeSpan};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn make_event(i: usize) -> CalendarEvent {
        CalendarEvent::new(format!("e{i}"), format!("Event {i}"), at(9, 0), at(10, 0))
    }

    fn make_create_cmd(i: usize) -> Command<CalendarEvent> {
        Command::create(&make_event(i))
    }

    #[test]
    fn test_new_manager() {
        let mgr: HistoryManager<CalendarEvent> = HistoryManager::default();
        assert!(!mgr.can_undo());
        assert!(!mgr.can_redo());
        assert_eq!(mgr.undo_depth(), 0);
        assert_eq!(mgr.redo_depth(), 0);
        assert_eq!(mgr.config().max_stack_size, 50);
    }

    #[test]
    fn test_execute_applies_and_enables_undo() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);

        assert_eq!(state, vec![make_event(1)]);
        assert!(mgr.can_undo());
        assert!(!mgr.can_redo());
        assert_eq!(mgr.undo_depth(), 1);
    }

    #[test]
    fn test_undo_enables_redo() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);

        let applied = mgr.undo(&state).unwrap();
        assert!(applied.state.is_empty());
        assert_eq!(applied.command.description(), "Create \"Event 1\"");

        assert!(!mgr.can_undo());
        assert!(mgr.can_redo());
        assert_eq!(mgr.redo_depth(), 1);
    }

    #[test]
    fn test_redo_moves_back_to_undo() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        let state = mgr.undo(&state).unwrap().state;

        let applied = mgr.redo(&state).unwrap();
        assert_eq!(applied.state, vec![make_event(1)]);

        assert!(mgr.can_undo());
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_execute_clears_redo() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        let state = mgr.undo(&state).unwrap().state;
        assert!(mgr.can_redo());

        let _ = mgr.execute(make_create_cmd(2), &state);

        assert!(!mgr.can_redo());
        assert_eq!(mgr.redo_depth(), 0);
    }

    #[test]
    fn test_record_clears_redo_without_applying() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        let _ = mgr.undo(&state);

        let ev = make_event(1);
        mgr.record(Command::move_entity(&ev, TimeSpan::new(at(11, 0), at(12, 0))));

        assert_eq!(mgr.undo_depth(), 1);
        assert_eq!(mgr.redo_depth(), 0);
        assert_eq!(mgr.undo_description(), Some("Move \"Event 1\""));
    }

    #[test]
    fn test_max_stack_size_enforced() {
        let mut mgr = HistoryManager::new(HistoryConfig::new(3));
        let mut state = Vec::new();
        for i in 0..5 {
            state = mgr.execute(make_create_cmd(i), &state);
        }

        assert_eq!(mgr.undo_depth(), 3);
        // Evicted commands are gone from history, not from state.
        assert_eq!(state.len(), 5);
        assert_eq!(
            mgr.undo_descriptions(10),
            vec!["Create \"Event 4\"", "Create \"Event 3\"", "Create \"Event 2\""]
        );
    }

    #[test]
    fn test_zero_stack_size_retains_nothing() {
        let mut mgr = HistoryManager::new(HistoryConfig::new(0));
        let state = mgr.execute(make_create_cmd(1), &[]);
        assert_eq!(state.len(), 1);
        assert!(!mgr.can_undo());
        assert!(mgr.undo(&state).is_none());
    }

    #[test]
    fn test_next_descriptions() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);

        assert_eq!(mgr.undo_description(), Some("Create \"Event 1\""));
        assert_eq!(mgr.redo_description(), None);

        let _ = mgr.undo(&state);

        assert_eq!(mgr.undo_description(), None);
        assert_eq!(mgr.redo_description(), Some("Create \"Event 1\""));
    }

    #[test]
    fn test_clear() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        let state = mgr.execute(make_create_cmd(2), &state);
        let _ = mgr.undo(&state);

        assert!(mgr.can_undo());
        assert!(mgr.can_redo());

        mgr.clear();

        assert!(!mgr.can_undo());
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_undo_without_commands() {
        let mut mgr: HistoryManager<CalendarEvent> = HistoryManager::default();
        assert!(mgr.undo(&[]).is_none());
        assert_eq!(mgr.undo_depth(), 0);
        assert_eq!(mgr.redo_depth(), 0);
    }

    #[test]
    fn test_redo_without_commands() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        assert!(mgr.redo(&state).is_none());
        assert_eq!(mgr.undo_depth(), 1);
        assert_eq!(mgr.redo_depth(), 0);
    }

    #[test]
    fn test_multiple_undo_redo_cycle() {
        let mut mgr = HistoryManager::default();
        let mut state = Vec::new();
        for i in 0..3 {
            state = mgr.execute(make_create_cmd(i), &state);
        }

        for _ in 0..3 {
            state = mgr.undo(&state).unwrap().state;
        }
        assert!(state.is_empty());
        assert_eq!(mgr.undo_depth(), 0);
        assert_eq!(mgr.redo_depth(), 3);

        for _ in 0..3 {
            state = mgr.redo(&state).unwrap().state;
        }
        assert_eq!(state, vec![make_event(0), make_event(1), make_event(2)]);
        assert_eq!(mgr.undo_depth(), 3);
        assert_eq!(mgr.redo_depth(), 0);
    }

    #[test]
    fn test_redo_descriptions() {
        let mut mgr = HistoryManager::default();
        let state = mgr.execute(make_create_cmd(1), &[]);
        let state = mgr.execute(make_create_cmd(2), &state);
        let state = mgr.undo(&state).unwrap().state;
        let _ = mgr.undo(&state);

        let descs = mgr.redo_descriptions(5);
        assert_eq!(descs, vec!["Create \"Event 1\"", "Create \"Event 2\""]);

        assert_eq!(mgr.redo_descriptions(1).len(), 1);
    }

    #[test]
    fn test_iter_undo_is_oldest_first() {
        let mut mgr = HistoryManager::default();
        let mut state = Vec::new();
        for i in 0..3 {
            state = mgr.execute(make_create_cmd(i), &state);
        }
        let descs: Vec<_> = mgr.iter_undo().map(Command::description).collect();
        assert_eq!(
            descs,
            vec!["Create \"Event 0\"", "Create \"Event 1\"", "Create \"Event 2\""]
        );
    }

    #[test]
    fn test_independent_managers_do_not_share_state() {
        let mut a = HistoryManager::default();
        let b: HistoryManager<CalendarEvent> = HistoryManager::default();
        let _ = a.execute(make_create_cmd(1), &[]);
        assert!(a.can_undo());
        assert!(!b.can_undo());
    }

    #[test]
    fn test_debug_impl() {
        let mgr: HistoryManager<CalendarEvent> = HistoryManager::default();
        let debug_str = format!("{:?}", mgr);
        assert!(debug_str.contains("HistoryManager"));
        assert!(debug_str.contains("undo_depth"));
    }
}
