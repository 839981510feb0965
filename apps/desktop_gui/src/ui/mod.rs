//! UI layer for the desktop page.

pub mod app;

pub use app::NotesApp;
