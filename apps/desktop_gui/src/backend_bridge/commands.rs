//! Backend commands queued from UI to backend worker.

use shared::domain::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Refresh,
    /// Submit whatever is currently typed in `kind`'s input.
    Create {
        kind: EntityKind,
    },
    Delete {
        kind: EntityKind,
        id: EntityId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Refresh => "refresh",
            BackendCommand::Create { .. } => "create",
            BackendCommand::Delete { .. } => "delete",
        }
    }
}
