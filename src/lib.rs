#![forbid(unsafe_code)]

//! advance purge — reclaims disk space by pruning installed data nobody on
//! this machine reads.
//!
//! Five categories live under `/usr/share` (or `/usr/local/share`):
//! 1. **locale** — translated message catalogs
//! 2. **cups** — printer templates, translations and web docs
//! 3. **manual** — translated manual pages (sections `man1`..`man9` stay)
//! 4. **help** — translated help files
//! 5. **doc** — package documentation
//!
//! Each is `off`, `on` (remove the whole tree) or `filter` (remove every
//! subdirectory except the locales the configuration retains).
//!
//! # Library usage
//!
//! ```rust,no_run
//! use advance_purge::prelude::*;
//!
//! let mut log = ActivityLog::new(true);
//! let config = Config::load(std::path::Path::new("/etc/advancepurge.conf"), &mut log)?;
//! let summary = PurgeEngine::new(&config, PurgeOptions::default()).run(&mut log);
//! println!("removed {} directories", summary.deleted_count());
//! # Ok::<(), advance_purge::core::errors::PurgeError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod platform;
pub mod purge;
