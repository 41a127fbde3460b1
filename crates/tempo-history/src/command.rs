#![forbid(unsafe_code)]

//! Reversible commands over entity collections.
//!
//! A [`Command`] is plain data: metadata for display and tracing, plus a
//! [`CommandKind`] holding every snapshot needed to apply the edit in either
//! direction. There are no stored callbacks; a single dispatcher
//! ([`CommandKind::apply_in_place`]) interprets the variant.
//!
//! # Invariants
//!
//! - `undo(execute(s))` restores `s` (same ids, same field values)
//! - Snapshots are owned clones taken at construction; mutating the source
//!   entity afterwards cannot change what a command restores
//! - A batch applies its commands in order and reverts them in reverse order
//! - A batch is never empty ([`CommandSeq`] cannot be constructed empty)
//!
//! # Failure Modes
//!
//! - **Missing target**: update/move/resize/remove of an id that is not in
//!   the collection leaves the collection unchanged
//! - **Foreign edits**: if the caller edits the collection outside the
//!   history, inverse transforms restore the captured snapshot regardless.
//!   Call `HistoryManager::clear` when the collection is replaced wholesale.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tempo_core::{Entity, EntityId, TimeSpan};
use web_time::Instant;

static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique command identifier.
///
/// Only used for logging and debugging; nothing compares commands by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(u64);

impl CommandId {
    fn next() -> Self {
        Self(NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

/// Which factory produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Create,
    Update,
    Delete,
    Move,
    Resize,
    Batch,
}

impl CommandType {
    /// Lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Resize => "resize",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every command for tracing and UI display.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Unique id, assigned at construction.
    pub id: CommandId,
    /// Human-readable description for UI (e.g., `Move "Team Sync"`).
    pub description: String,
    /// When the command was created.
    pub timestamp: Instant,
}

impl CommandMetadata {
    /// Create new metadata with a fresh id and the current time.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: CommandId::next(),
            description: description.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Direction to apply a command in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the edit (execute / redo).
    Forward,
    /// Revert the edit (undo).
    Inverse,
}

/// Error returned when building a batch from an empty list of commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyBatchError;

impl fmt::Display for EmptyBatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a batch requires at least one command")
    }
}

impl std::error::Error for EmptyBatchError {}

/// A non-empty, ordered sequence of commands.
///
/// The only public constructors start from one command or reject an empty
/// `Vec`, so an empty batch cannot exist.
#[derive(Debug, Clone)]
pub struct CommandSeq<E: Entity> {
    commands: Vec<Command<E>>,
}

#[allow(clippy::len_without_is_empty)]
impl<E: Entity> CommandSeq<E> {
    /// Start a sequence with its first command.
    #[must_use]
    pub fn new(first: Command<E>) -> Self {
        Self {
            commands: vec![first],
        }
    }

    /// Append a command, builder style.
    #[must_use]
    pub fn then(mut self, cmd: Command<E>) -> Self {
        self.commands.push(cmd);
        self
    }

    /// Append a command.
    pub fn push(&mut self, cmd: Command<E>) {
        self.commands.push(cmd);
    }

    /// Number of commands. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Commands in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command<E>> {
        self.commands.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Command<E>] {
        &self.commands
    }
}

impl<E: Entity> TryFrom<Vec<Command<E>>> for CommandSeq<E> {
    type Error = EmptyBatchError;

    fn try_from(commands: Vec<Command<E>>) -> Result<Self, Self::Error> {
        if commands.is_empty() {
            return Err(EmptyBatchError);
        }
        Ok(Self { commands })
    }
}

impl<'a, E: Entity> IntoIterator for &'a CommandSeq<E> {
    type Item = &'a Command<E>;
    type IntoIter = std::slice::Iter<'a, Command<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// The data a command needs to apply and revert itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind<E: Entity> {
    /// Append `entity`; inverse removes it by id.
    Create { entity: E },
    /// Replace the entity with `after`; inverse restores `before`.
    Update { id: EntityId, before: E, after: E },
    /// Remove the entity by id; inverse re-appends the snapshot.
    Delete { entity: E },
    /// Set both endpoints of the span.
    Move {
        id: EntityId,
        title: String,
        prior: TimeSpan<E::Time>,
        next: TimeSpan<E::Time>,
    },
    /// Set only the end of the span.
    Resize {
        id: EntityId,
        title: String,
        prior_end: E::Time,
        next_end: E::Time,
    },
    /// Apply commands in order; inverse reverts them in reverse order.
    Batch(CommandSeq<E>),
}

impl<E: Entity> PartialEq for CommandSeq<E> {
    fn eq(&self, other: &Self) -> bool {
        self.commands.len() == other.commands.len()
            && self
                .commands
                .iter()
                .zip(&other.commands)
                .all(|(a, b)| a.kind == b.kind)
    }
}

impl<E: Entity> CommandKind<E> {
    #[must_use]
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Create { .. } => CommandType::Create,
            Self::Update { .. } => CommandType::Update,
            Self::Delete { .. } => CommandType::Delete,
            Self::Move { .. } => CommandType::Move,
            Self::Resize { .. } => CommandType::Resize,
            Self::Batch(_) => CommandType::Batch,
        }
    }

    /// Apply this edit to `entities` in the given direction.
    pub fn apply_in_place(&self, direction: Direction, entities: &mut Vec<E>) {
        match (self, direction) {
            (Self::Create { entity }, Direction::Forward)
            | (Self::Delete { entity }, Direction::Inverse) => entities.push(entity.clone()),
            (Self::Create { entity }, Direction::Inverse)
            | (Self::Delete { entity }, Direction::Forward) => remove_by_id(entities, entity.id()),
            (Self::Update { id, after, .. }, Direction::Forward) => {
                replace_by_id(entities, id, after);
            }
            (Self::Update { id, before, .. }, Direction::Inverse) => {
                replace_by_id(entities, id, before);
            }
            (Self::Move { id, next, .. }, Direction::Forward) => {
                patch_by_id(entities, id, |e| e.set_span(next.clone()));
            }
            (Self::Move { id, prior, .. }, Direction::Inverse) => {
                patch_by_id(entities, id, |e| e.set_span(prior.clone()));
            }
            (Self::Resize { id, next_end, .. }, Direction::Forward) => {
                patch_by_id(entities, id, |e| e.set_end(next_end.clone()));
            }
            (Self::Resize { id, prior_end, .. }, Direction::Inverse) => {
                patch_by_id(entities, id, |e| e.set_end(prior_end.clone()));
            }
            (Self::Batch(seq), Direction::Forward) => {
                for cmd in seq {
                    cmd.kind.apply_in_place(Direction::Forward, entities);
                }
            }
            (Self::Batch(seq), Direction::Inverse) => {
                for cmd in seq.iter().rev() {
                    cmd.kind.apply_in_place(Direction::Inverse, entities);
                }
            }
        }
    }
}

fn remove_by_id<E: Entity>(entities: &mut Vec<E>, id: &EntityId) {
    entities.retain(|e| e.id() != id);
}

fn replace_by_id<E: Entity>(entities: &mut [E], id: &EntityId, state: &E) {
    for e in entities.iter_mut().filter(|e| e.id() == id) {
        *e = state.clone();
    }
}

fn patch_by_id<E: Entity>(entities: &mut [E], id: &EntityId, mut f: impl FnMut(&mut E)) {
    for e in entities.iter_mut().filter(|e| e.id() == id) {
        f(e);
    }
}

/// A reversible edit over a collection of entities.
///
/// Cloning a command keeps its id: the clone is the same edit.
#[derive(Debug, Clone)]
pub struct Command<E: Entity> {
    metadata: CommandMetadata,
    kind: CommandKind<E>,
}

impl<E: Entity> Command<E> {
    fn from_kind(description: String, kind: CommandKind<E>) -> Self {
        Self {
            metadata: CommandMetadata::new(description),
            kind,
        }
    }

    // ========================================================================
    // Factories
    // ========================================================================

    /// Add a new entity.
    #[must_use]
    pub fn create(entity: &E) -> Self {
        Self::from_kind(
            format!("Create \"{}\"", entity.label()),
            CommandKind::Create {
                entity: entity.clone(),
            },
        )
    }

    /// Replace an entity's full state.
    ///
    /// `before` and `after` must share an id.
    #[must_use]
    pub fn update(before: &E, after: &E) -> Self {
        debug_assert_eq!(before.id(), after.id(), "update must keep the entity id");
        Self::from_kind(
            format!("Update \"{}\"", after.label()),
            CommandKind::Update {
                id: after.id().clone(),
                before: before.clone(),
                after: after.clone(),
            },
        )
    }

    /// Remove an entity. Undo restores it under the same id.
    #[must_use]
    pub fn delete(entity: &E) -> Self {
        Self::from_kind(
            format!("Delete \"{}\"", entity.label()),
            CommandKind::Delete {
                entity: entity.clone(),
            },
        )
    }

    /// Move an entity to a new span.
    ///
    /// Identical `prior` and `next` still produce a command.
    #[must_use]
    pub fn move_span(
        id: impl Into<EntityId>,
        title: impl Into<String>,
        prior: TimeSpan<E::Time>,
        next: TimeSpan<E::Time>,
    ) -> Self {
        let title = title.into();
        Self::from_kind(
            format!("Move \"{title}\""),
            CommandKind::Move {
                id: id.into(),
                title,
                prior,
                next,
            },
        )
    }

    /// Move `entity` to `next`, capturing its current span as the prior.
    #[must_use]
    pub fn move_entity(entity: &E, next: TimeSpan<E::Time>) -> Self {
        Self::move_span(entity.id().clone(), entity.label(), entity.span(), next)
    }

    /// Change only the end of an entity's span.
    #[must_use]
    pub fn resize(
        id: impl Into<EntityId>,
        title: impl Into<String>,
        prior_end: E::Time,
        next_end: E::Time,
    ) -> Self {
        let title = title.into();
        Self::from_kind(
            format!("Resize \"{title}\""),
            CommandKind::Resize {
                id: id.into(),
                title,
                prior_end,
                next_end,
            },
        )
    }

    /// Resize `entity` to end at `next_end`, capturing its current end.
    #[must_use]
    pub fn resize_entity(entity: &E, next_end: E::Time) -> Self {
        Self::resize(
            entity.id().clone(),
            entity.label(),
            entity.end().clone(),
            next_end,
        )
    }

    /// Group commands into one history entry.
    #[must_use]
    pub fn batch(description: impl Into<String>, commands: CommandSeq<E>) -> Self {
        Self::from_kind(description.into(), CommandKind::Batch(commands))
    }

    /// Override the generated description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn id(&self) -> CommandId {
        self.metadata.id
    }

    #[must_use]
    pub fn command_type(&self) -> CommandType {
        self.kind.command_type()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    #[must_use]
    pub fn timestamp(&self) -> Instant {
        self.metadata.timestamp
    }

    #[must_use]
    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn kind(&self) -> &CommandKind<E> {
        &self.kind
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Forward transform. Returns a new collection; `entities` is untouched.
    #[must_use]
    pub fn execute(&self, entities: &[E]) -> Vec<E> {
        self.apply(Direction::Forward, entities)
    }

    /// Inverse transform. Returns a new collection; `entities` is untouched.
    #[must_use]
    pub fn undo(&self, entities: &[E]) -> Vec<E> {
        self.apply(Direction::Inverse, entities)
    }

    #[must_use]
    pub fn apply(&self, direction: Direction, entities: &[E]) -> Vec<E> {
        let mut next = entities.to_vec();
        self.kind.apply_in_place(direction, &mut next);
        next
    }
}

// ============================================================================
// Tests
// ============================================================================
