use std::{fmt::Write as _, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    CollectionBinding, HttpEntityStore, MemoryEntryForm, MemoryListView, SyncController,
    SyncOutcome, DEFAULT_SERVER_URL,
};
use shared::{
    domain::{EntityId, EntityKind},
    protocol::Entity,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Read and edit the notes and todos held by a notes service")]
struct Args {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print both collections.
    List,
    /// Add a note or todo with the given text.
    Add { kind: EntityKind, text: String },
    /// Delete a note or todo by id, then print both collections.
    Delete { kind: EntityKind, id: String },
}

struct Session {
    notes: Arc<MemoryListView>,
    todos: Arc<MemoryListView>,
    note_input: Arc<MemoryEntryForm>,
    todo_input: Arc<MemoryEntryForm>,
    controller: SyncController,
}

impl Session {
    fn connect(server_url: &str) -> Result<Self> {
        let store = HttpEntityStore::new(server_url)?;
        let notes = Arc::new(MemoryListView::new());
        let todos = Arc::new(MemoryListView::new());
        let note_input = Arc::new(MemoryEntryForm::new());
        let todo_input = Arc::new(MemoryEntryForm::new());
        let controller = SyncController::new(
            Arc::new(store),
            CollectionBinding::new(notes.clone(), note_input.clone()),
            CollectionBinding::new(todos.clone(), todo_input.clone()),
        );
        Ok(Self {
            notes,
            todos,
            note_input,
            todo_input,
            controller,
        })
    }

    fn input(&self, kind: EntityKind) -> &MemoryEntryForm {
        match kind {
            EntityKind::Note => &self.note_input,
            EntityKind::Todo => &self.todo_input,
        }
    }

    fn list(&self, kind: EntityKind) -> &MemoryListView {
        match kind {
            EntityKind::Note => &self.notes,
            EntityKind::Todo => &self.todos,
        }
    }

    /// Runs `command` and returns its outcome plus what to print on success.
    async fn run(&self, command: Command) -> (SyncOutcome, String) {
        match command {
            Command::List => {
                let outcome = self.controller.load().await;
                (outcome, self.report(outcome, Session::render))
            }
            Command::Add { kind, text } => {
                self.input(kind).set(text);
                let outcome = self.controller.create(kind).await;
                let report = self.report(outcome, |session| {
                    let mut out = format!("added {kind}\n");
                    if let Some(created) = session.list(kind).snapshot().last() {
                        let _ = writeln!(out, "  {}  {}", created.id, created.text);
                    }
                    out
                });
                (outcome, report)
            }
            Command::Delete { kind, id } => {
                let outcome = self.controller.delete(kind, &EntityId::new(id)).await;
                (outcome, self.report(outcome, Session::render))
            }
        }
    }

    fn report(&self, outcome: SyncOutcome, render: impl FnOnce(&Self) -> String) -> String {
        if outcome.is_applied() {
            render(self)
        } else {
            String::new()
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        render_section(&mut out, "Notes", &self.notes.snapshot());
        render_section(&mut out, "Todos", &self.todos.snapshot());
        out
    }
}

fn render_section(out: &mut String, heading: &str, entities: &[Entity]) {
    let _ = writeln!(out, "{heading} ({})", entities.len());
    for entity in entities {
        let _ = writeln!(out, "  {}  {}", entity.id, entity.text);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let session = Session::connect(&args.server_url)?;
    let (outcome, report) = session.run(args.command).await;
    print!("{report}");
    Ok(ExitCode::from(exit_status(outcome)))
}

/// Process exit status for an outcome; failures already went to the log.
fn exit_status(outcome: SyncOutcome) -> u8 {
    match outcome {
        SyncOutcome::Applied => 0,
        SyncOutcome::Failed => 1,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod session_tests;
