#![forbid(unsafe_code)]

//! Undo/Redo command history for editing timed entities.
//!
//! This crate implements the Command Pattern over collections of
//! [`Entity`](tempo_core::Entity) values:
//!
//! - **Reversibility**: Every command carries the snapshots needed to undo it
//! - **Bounded memory**: The undo stack keeps at most `max_stack_size` entries
//! - **Batching**: Several commands group into one atomic history entry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        HistoryManager                           │
//! │  ┌──────────────────┐          ┌──────────────────┐             │
//! │  │   Undo Stack     │          │   Redo Stack     │             │
//! │  │  ┌────────────┐  │          │  ┌────────────┐  │             │
//! │  │  │ CommandN   │  │  undo()  │  │ Command1   │  │             │
//! │  │  ├────────────┤  │ ──────►  │  ├────────────┤  │             │
//! │  │  │ Command2   │  │          │  │ Command2   │  │             │
//! │  │  ├────────────┤  │  ◄────── │  ├────────────┤  │             │
//! │  │  │ Command1   │  │  redo()  │  │ CommandN   │  │             │
//! │  │  └────────────┘  │          │  └────────────┘  │             │
//! │  └──────────────────┘          └──────────────────┘             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use tempo_core::{CalendarEvent, TimeSpan};
//! use tempo_history::{Command, HistoryManager};
//!
//! let mut history = HistoryManager::default();
//! let events = history.execute(Command::create(&event), &[]);
//! let events = history.execute(Command::move_entity(&events[0], span), &events);
//!
//! if let Some(applied) = history.undo(&events) {
//!     println!("Undid {}", applied.command.description());
//! }
//! ```
//!
//! # Design Notes
//!
//! ## Why Commands Are Data
//!
//! Commands hold snapshots, not callbacks or references into the caller's
//! collection. A command built from an entity keeps an owned clone, so later
//! edits to that entity cannot corrupt what undo restores. Commands are
//! inspectable through [`Command::kind`].
//!
//! ## Collections Are Snapshots
//!
//! Every transform borrows the caller's collection and returns a new one.
//! The caller replaces its state with the returned value.

pub mod command;
pub mod config;
pub mod history;

// Re-export commonly used types
pub use command::{
    Command, CommandId, CommandKind, CommandMetadata, CommandSeq, CommandType, Direction,
    EmptyBatchError,
};
#[cfg(feature = "history-config")]
pub use config::HistoryConfigError;
pub use config::{DEFAULT_MAX_STACK_SIZE, HistoryConfig};
pub use history::{Applied, HistoryManager};
