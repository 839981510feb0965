use std::sync::Arc;

use shared::domain::{EntityId, EntityKind};
use tracing::{debug, error, info};

use crate::{
    error::ClientError,
    transport::EntityStore,
    view::{EntryForm, ListView},
};

/// The list and input that belong to one entity kind.
#[derive(Clone)]
pub struct CollectionBinding {
    pub list: Arc<dyn ListView>,
    pub form: Arc<dyn EntryForm>,
}

impl CollectionBinding {
    pub fn new(list: Arc<dyn ListView>, form: Arc<dyn EntryForm>) -> Self {
        Self { list, form }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    /// The failure was logged and the views were left as they were.
    Failed,
}

impl SyncOutcome {
    pub fn is_applied(self) -> bool {
        self == SyncOutcome::Applied
    }
}

/// Keeps the note and todo views in step with the remote store.
///
/// Every operation catches its own failure at the boundary and logs it; views
/// are only touched after the remote call succeeded. Operations take `&self`
/// and hold no locks across awaits, so overlapping calls race and the last
/// response to land wins.
pub struct SyncController {
    store: Arc<dyn EntityStore>,
    notes: CollectionBinding,
    todos: CollectionBinding,
}

impl SyncController {
    pub fn new(
        store: Arc<dyn EntityStore>,
        notes: CollectionBinding,
        todos: CollectionBinding,
    ) -> Self {
        Self {
            store,
            notes,
            todos,
        }
    }

    pub fn binding(&self, kind: EntityKind) -> &CollectionBinding {
        match kind {
            EntityKind::Note => &self.notes,
            EntityKind::Todo => &self.todos,
        }
    }

    /// Initial population when the page comes up.
    pub async fn load(&self) -> SyncOutcome {
        info!("loading notes and todos");
        self.refresh().await
    }

    pub async fn refresh(&self) -> SyncOutcome {
        match self.try_refresh().await {
            Ok(()) => SyncOutcome::Applied,
            Err(err) => {
                error!(error = %err, "error fetching data");
                SyncOutcome::Failed
            }
        }
    }

    async fn try_refresh(&self) -> Result<(), ClientError> {
        debug!("fetching data");
        let (notes, todos) = futures::try_join!(
            self.store.list(EntityKind::Note),
            self.store.list(EntityKind::Todo)
        )?;
        debug!(notes = notes.len(), todos = todos.len(), "responses received");

        self.notes.list.replace_all(&notes);
        self.todos.list.replace_all(&todos);
        Ok(())
    }

    /// Submits the text currently in `kind`'s form, as-is.
    pub async fn create(&self, kind: EntityKind) -> SyncOutcome {
        let binding = self.binding(kind);
        let text = binding.form.value();
        debug!(kind = kind.label(), %text, "submitting");

        match self.store.create(kind, &text).await {
            Ok(entity) => {
                info!(kind = kind.label(), id = %entity.id, "entity added");
                binding.list.append(&entity);
                binding.form.clear();
                SyncOutcome::Applied
            }
            Err(err) => {
                error!(kind = kind.label(), error = %err, "error adding entity");
                SyncOutcome::Failed
            }
        }
    }

    /// Deletes remotely, then re-fetches both lists instead of removing locally.
    ///
    /// The outcome is that of the follow-up refresh once the delete itself
    /// succeeded.
    pub async fn delete(&self, kind: EntityKind, id: &EntityId) -> SyncOutcome {
        match self.store.delete(kind, id).await {
            Ok(()) => {
                info!(kind = kind.label(), %id, "entity deleted");
                self.refresh().await
            }
            Err(err) => {
                error!(kind = kind.label(), %id, error = %err, "error deleting entity");
                SyncOutcome::Failed
            }
        }
    }
}
