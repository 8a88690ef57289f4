//! ADVP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PurgeError>;

/// Top-level error type for advance purge.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("[ADVP-1001] cannot open configuration {path}: {source}")]
    ConfigOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ADVP-1002] configuration read failure at line {line}: {details}")]
    ConfigRead { line: usize, details: String },

    #[error("[ADVP-1003] cannot grow the retained locale list: {details}")]
    ConfigAlloc { details: String },

    #[error("[ADVP-2001] cannot open directory {path}: {source}")]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ADVP-2002] {path} is on another filesystem, not crossed")]
    CrossDevice { path: PathBuf },

    #[error("[ADVP-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PurgeError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigOpen { .. } => "ADVP-1001",
            Self::ConfigRead { .. } => "ADVP-1002",
            Self::ConfigAlloc { .. } => "ADVP-1003",
            Self::DirectoryOpen { .. } => "ADVP-2001",
            Self::CrossDevice { .. } => "ADVP-2002",
            Self::Io { .. } => "ADVP-3001",
        }
    }

    /// Filesystem object the error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ConfigOpen { path, .. }
            | Self::DirectoryOpen { path, .. }
            | Self::CrossDevice { path }
            | Self::Io { path, .. } => Some(path),
            Self::ConfigRead { .. } | Self::ConfigAlloc { .. } => None,
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
