//! Client side of the notes service: a UI-agnostic controller that keeps a
//! note list and a todo list in step with the remote collections.

pub mod controller;
pub mod error;
pub mod transport;
pub mod view;

pub use controller::{CollectionBinding, SyncController, SyncOutcome};
pub use error::ClientError;
pub use transport::{EntityStore, HttpEntityStore};
pub use view::{EntryForm, ListView, MemoryEntryForm, MemoryListView};

/// Where the notes service listens unless told otherwise.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
