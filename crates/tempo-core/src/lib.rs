#![forbid(unsafe_code)]

//! Tempo Core
//!
//! Entity model shared by the Tempo editing crates.
//!
//! # Key Components
//!
//! - [`EntityId`] - Stable identity of a record in a collection
//! - [`Entity`] - Trait for timed records the history can edit
//! - [`TimeSpan`] - A `(start, end)` pair captured by move commands
//! - [`CalendarEvent`] - Concrete calendar entity over [`chrono::NaiveDateTime`]
//!
//! # Role in Tempo
//! `tempo-core` knows nothing about undo. It only defines what an entity
//! is, so that `tempo-history` can snapshot, look up, and patch entities
//! by identity without interpreting any other field.

pub mod entity;
pub mod event;

pub use entity::{Entity, EntityId, TimeSpan, contains, find};
pub use event::CalendarEvent;
