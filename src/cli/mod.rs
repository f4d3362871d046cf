//! CLI support for jmap-lang
//!
//! The `jmap` binary is a thin layer over these functions, which take file
//! contents rather than paths so other tools can drive them directly.

mod apply;
mod check;

pub use apply::{ApplyOptions, execute_apply};
pub use check::{CheckReport, execute_check};

use std::io;

use thiserror::Error;

use crate::{CompileError, ExecError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Mapping error: {0}")]
    Exec(#[from] ExecError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No source document provided. Use --source or pipe JSON to stdin.")]
    NoInput,
}
