//! Runtime bridge between UI command queue and the sync controller.

use std::{sync::Arc, thread};

use client_core::{
    CollectionBinding, HttpEntityStore, MemoryEntryForm, MemoryListView, SyncController,
    SyncOutcome,
};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::EntityKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// View state shared by the egui thread (reads, typing) and the worker (sync).
#[derive(Clone)]
pub struct PageViews {
    pub notes: Arc<MemoryListView>,
    pub note_input: Arc<MemoryEntryForm>,
    pub todos: Arc<MemoryListView>,
    pub todo_input: Arc<MemoryEntryForm>,
}

impl PageViews {
    /// `on_change` runs whenever the worker mutates a view.
    pub fn new(on_change: impl Fn() + Send + Sync + 'static) -> Self {
        let on_change: Arc<dyn Fn() + Send + Sync> = Arc::new(on_change);
        let hook = || {
            let on_change = on_change.clone();
            move || on_change()
        };
        Self {
            notes: Arc::new(MemoryListView::with_change_hook(hook())),
            note_input: Arc::new(MemoryEntryForm::with_change_hook(hook())),
            todos: Arc::new(MemoryListView::with_change_hook(hook())),
            todo_input: Arc::new(MemoryEntryForm::with_change_hook(hook())),
        }
    }

    pub fn list(&self, kind: EntityKind) -> &MemoryListView {
        match kind {
            EntityKind::Note => &self.notes,
            EntityKind::Todo => &self.todos,
        }
    }

    pub fn input(&self, kind: EntityKind) -> &MemoryEntryForm {
        match kind {
            EntityKind::Note => &self.note_input,
            EntityKind::Todo => &self.todo_input,
        }
    }

    fn bindings(&self) -> (CollectionBinding, CollectionBinding) {
        (
            CollectionBinding::new(self.notes.clone(), self.note_input.clone()),
            CollectionBinding::new(self.todos.clone(), self.todo_input.clone()),
        )
    }
}

pub fn launch(
    server_url: String,
    views: PageViews,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "failed to build runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let store = match HttpEntityStore::new(&server_url) {
                Ok(store) => store,
                Err(err) => {
                    tracing::error!(%server_url, "unusable server url: {err}");
                    let _ = ui_tx.try_send(UiEvent::WorkerFailed(err.to_string()));
                    return;
                }
            };
            let (notes, todos) = views.bindings();
            let controller = Arc::new(SyncController::new(Arc::new(store), notes, todos));
            let _ = ui_tx.try_send(UiEvent::WorkerReady {
                server_url: server_url.clone(),
            });

            {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller.load().await;
                });
            }

            // Each command runs as its own task; overlapping commands are not serialized.
            while let Ok(cmd) = cmd_rx.recv() {
                let controller = controller.clone();
                tokio::spawn(async move {
                    execute(&controller, cmd).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

pub async fn execute(controller: &SyncController, cmd: BackendCommand) -> SyncOutcome {
    tracing::debug!(command = cmd.name(), "running backend command");
    match cmd {
        BackendCommand::Refresh => controller.refresh().await,
        BackendCommand::Create { kind } => controller.create(kind).await,
        BackendCommand::Delete { kind, id } => controller.delete(kind, &id).await,
    }
}
