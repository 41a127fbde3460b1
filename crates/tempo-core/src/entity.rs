#![forbid(unsafe_code)]

//! Entity identity and the [`Entity`] trait.
//!
//! The history layer treats entities as opaque records. The only things it
//! needs are:
//!
//! 1. A stable identity ([`Entity::id`]) for lookup and removal
//! 2. A display label ([`Entity::label`]) for command descriptions
//! 3. Read/write access to the start and end of the entity's time span
//!
//! Everything else is carried through untouched by cloning.

use std::borrow::Borrow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identity of an entity.
///
/// Identity never changes for the life of an entity, including across a
/// delete followed by an undo.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    /// Create a new identity from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The start and end of an entity's time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSpan<T> {
    pub start: T,
    pub end: T,
}

impl<T> TimeSpan<T> {
    /// Create a span from its endpoints.
    #[must_use]
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

/// A timed record that can be edited through the history.
///
/// Implementations must be cheap enough to clone: every command takes an
/// owned snapshot of the entity state it needs to invert itself.
pub trait Entity: Clone + PartialEq + fmt::Debug {
    /// Point-in-time type used for the span endpoints.
    type Time: Clone + PartialEq + fmt::Debug;

    /// Stable identity.
    fn id(&self) -> &EntityId;

    /// Human-readable label (e.g., an event title).
    fn label(&self) -> &str;

    fn start(&self) -> &Self::Time;

    fn end(&self) -> &Self::Time;

    fn set_start(&mut self, start: Self::Time);

    fn set_end(&mut self, end: Self::Time);

    /// Current span as an owned value.
    fn span(&self) -> TimeSpan<Self::Time> {
        TimeSpan::new(self.start().clone(), self.end().clone())
    }

    /// Replace both endpoints.
    fn set_span(&mut self, span: TimeSpan<Self::Time>) {
        self.set_start(span.start);
        self.set_end(span.end);
    }
}

/// Find the first entity with the given identity.
pub fn find<'a, E: Entity>(entities: &'a [E], id: &EntityId) -> Option<&'a E> {
    entities.iter().find(|e| e.id() == id)
}

/// Whether any entity in the collection has the given identity.
#[must_use]
pub fn contains<E: Entity>(entities: &[E], id: &EntityId) -> bool {
    find(entities, id).is_some()
}
