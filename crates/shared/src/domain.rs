use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the notes service. Clients treat it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Note,
    Todo,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Note, EntityKind::Todo];

    /// Path segment under `/api` and the backing table name.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Note => "notes",
            EntityKind::Todo => "todos",
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection() == collection)
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::Todo => "todo",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown entity kind '{0}', expected 'note' or 'todo'")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" | "notes" => Ok(EntityKind::Note),
            "todo" | "todos" => Ok(EntityKind::Todo),
            other => Err(UnknownEntityKind(other.to_string())),
        }
    }
}
