//! Error types for the scoop compiler.
//!
//! Fatal conditions abort the whole run and surface as [`ScoopError`].
//! Body transpile failures are recoverable: they are reported as
//! [`TranspileError`] by the collaborator and contained per directive.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoopError {
    /// A column-0 identifier-like line matched none of the directive patterns.
    #[error("{file}:{}: unknown directive found: '{text}'", .line_index + 1)]
    UnknownDirective {
        file: String,
        /// 0-based offset of the offending line.
        line_index: usize,
        text: String,
    },

    #[error("file does not exist: '{}'", .path.display())]
    MissingInput { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ScoopError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScoopError::Io {
            path: path.into(),
            source,
        }
    }

    /// 1-based line number for fatal directive errors.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ScoopError::UnknownDirective { line_index, .. } => Some(line_index + 1),
            _ => None,
        }
    }
}

/// Failure reported by a [`crate::transpile::BodyTranspiler`].
#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("unable to run body transpiler '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("body transpiler exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}
