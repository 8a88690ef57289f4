//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use advance_purge::prelude::*;
//! ```

// Core
pub use crate::core::config::{Category, Config, Operations, PurgeMode, RetainedLocales};
pub use crate::core::errors::{PurgeError, Result};
pub use crate::core::paths::ShareRoots;

// Logging
pub use crate::logger::activity::{ActivityEvent, ActivityLog};
pub use crate::logger::jsonl::JsonlWriter;

// Purge
pub use crate::purge::engine::{PurgeAction, PurgeEngine, PurgeOptions, PurgeReport, RunSummary};
pub use crate::purge::remover::{RemovalReport, remove_tree};
pub use crate::purge::target::TargetDirectory;
