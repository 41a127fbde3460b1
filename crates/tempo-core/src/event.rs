#![forbid(unsafe_code)]

//! Calendar events.

use chrono::NaiveDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// A single calendar event.
///
/// Times are wall-clock (`NaiveDateTime`); time zone handling belongs to
/// whatever renders the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarEvent {
    pub id: EntityId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub notes: Option<String>,
}

impl CalendarEvent {
    /// Create an event without notes.
    #[must_use]
    pub fn new(
        id: impl Into<EntityId>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            notes: None,
        }
    }

    /// Attach free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Length of the event. Negative if `end` precedes `start`.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl Entity for CalendarEvent {
    type Time = NaiveDateTime;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn start(&self) -> &NaiveDateTime {
        &self.start
    }

    fn end(&self) -> &NaiveDateTime {
        &self.end
    }

    fn set_start(&mut self, start: NaiveDateTime) {
        self.start = start;
    }

    fn set_end(&mut self, end: NaiveDateTime) {
        self.end = end;
    }
}
