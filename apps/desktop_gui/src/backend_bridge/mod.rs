//! Backend worker: owns the tokio runtime and the sync controller.

pub mod commands;
pub mod runtime;
