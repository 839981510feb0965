//! UI surfaces the sync controller renders into.
//!
//! A front end hands one [`ListView`] and one [`EntryForm`] per entity kind to
//! the controller. Implementations render entity text as plain text; nothing
//! the server returns is ever interpreted as markup.

use std::sync::{Mutex, MutexGuard, PoisonError};

use shared::protocol::Entity;

pub trait ListView: Send + Sync {
    fn clear(&self);
    fn append(&self, entity: &Entity);

    /// Clear-then-rebuild; views are never diffed.
    fn replace_all(&self, entities: &[Entity]) {
        self.clear();
        for entity in entities {
            self.append(entity);
        }
    }
}

pub trait EntryForm: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
}

type ChangeHook = Box<dyn Fn() + Send + Sync>;

/// Thread-safe list state shared between a renderer and the controller.
#[derive(Default)]
pub struct MemoryListView {
    items: Mutex<Vec<Entity>>,
    on_change: Option<ChangeHook>,
}

impl MemoryListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// `hook` runs after every mutation, e.g. to schedule a repaint.
    pub fn with_change_hook(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            on_change: Some(Box::new(hook)),
        }
    }

    pub fn snapshot(&self) -> Vec<Entity> {
        lock(&self.items).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }

    fn changed(&self) {
        if let Some(hook) = &self.on_change {
            hook();
        }
    }
}

impl ListView for MemoryListView {
    fn clear(&self) {
        lock(&self.items).clear();
        self.changed();
    }

    fn append(&self, entity: &Entity) {
        lock(&self.items).push(entity.clone());
        self.changed();
    }

    fn replace_all(&self, entities: &[Entity]) {
        {
            let mut items = lock(&self.items);
            items.clear();
            items.extend_from_slice(entities);
        }
        self.changed();
    }
}

#[derive(Default)]
pub struct MemoryEntryForm {
    text: Mutex<String>,
    on_change: Option<ChangeHook>,
}

impl MemoryEntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change_hook(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            text: Mutex::new(String::new()),
            on_change: Some(Box::new(hook)),
        }
    }

    /// Replaces the typed text, as a keystroke in the input would.
    pub fn set(&self, text: impl Into<String>) {
        *lock(&self.text) = text.into();
    }
}

impl EntryForm for MemoryEntryForm {
    fn value(&self) -> String {
        lock(&self.text).clone()
    }

    fn clear(&self) {
        lock(&self.text).clear();
        if let Some(hook) = &self.on_change {
            hook();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
