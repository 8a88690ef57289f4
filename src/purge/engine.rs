//! Purge engine: drives each category through its mode.
//!
//! Pipeline per category: mode lookup -> target resolution -> open target
//! -> classify entries (keep / delete) -> depth-first removal -> report.
//!
//! Per-category state machine, fixed once configuration is loaded:
//! - `Off`    -> nothing
//! - `On`     -> [`PurgeEngine::purge_unconditional`]
//! - `Filter` -> [`PurgeEngine::purge_filtered`] (categories without a
//!   filtered form, i.e. `doc`, fall back to the unconditional purge)
//!
//! Nothing here changes the process working directory; every operation uses
//! a path built from the target directory.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{Category, Config, PurgeMode};
use crate::core::errors::PurgeError;
use crate::core::paths::ShareRoots;
use crate::logger::activity::{ActivityEvent, ActivityLog};
use crate::platform::pal::device_id;
use crate::purge::remover::remove_tree;
use crate::purge::target::{TargetDirectory, filtered_suffixes, unconditional_target};

// ──────────────────── options ────────────────────

/// Run-wide knobs for the engine.
#[derive(Debug, Clone, Default)]
pub struct PurgeOptions {
    pub roots: ShareRoots,
    /// Use the local share root instead of the system one.
    pub use_local_root: bool,
    /// Decide and report, but leave the filesystem untouched.
    pub dry_run: bool,
}

/// What the engine does with one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeAction {
    Filtered,
    Unconditional,
}

impl PurgeAction {
    /// Resolve the action for `category` in `mode`, or `None` when off.
    #[must_use]
    pub const fn for_mode(category: Category, mode: PurgeMode) -> Option<Self> {
        match mode {
            PurgeMode::Off => None,
            PurgeMode::On => Some(Self::Unconditional),
            PurgeMode::Filter if filtered_suffixes(category).is_empty() => {
                Some(Self::Unconditional)
            }
            PurgeMode::Filter => Some(Self::Filtered),
        }
    }
}

// ──────────────────── report types ────────────────────

/// A single removal failure record.
#[derive(Debug, Clone)]
pub struct DeletionError {
    pub path: PathBuf,
    pub error: String,
    pub error_code: &'static str,
}

/// Result of purging one target path.
#[derive(Debug, Clone)]
pub struct PurgeReport {
    pub category: Category,
    pub path: PathBuf,
    pub action: PurgeAction,
    /// Whether the target could be opened at all.
    pub opened: bool,
    /// Top-level entries removed (or that would be, in dry-run).
    pub deleted: Vec<PathBuf>,
    /// Top-level directory names that were protected.
    pub kept: Vec<String>,
    /// Filesystem objects removed across all deleted subtrees.
    pub objects_removed: usize,
    pub errors: Vec<DeletionError>,
    pub dry_run: bool,
}

impl PurgeReport {
    fn new(category: Category, path: PathBuf, action: PurgeAction, dry_run: bool) -> Self {
        Self {
            category,
            path,
            action,
            opened: false,
            deleted: Vec::new(),
            kept: Vec::new(),
            objects_removed: 0,
            errors: Vec::new(),
            dry_run,
        }
    }

    /// Whether anything went wrong for this target.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.opened || !self.errors.is_empty()
    }

    fn open_failed(&mut self, source: std::io::Error, log: &mut ActivityLog) {
        let message = source.to_string();
        let err = PurgeError::DirectoryOpen {
            path: self.path.clone(),
            source,
        };
        log.record(ActivityEvent::OpenFailed {
            category: self.category.key(),
            path: self.path.clone(),
            error_code: err.code(),
            error_message: message.clone(),
        });
        self.errors.push(DeletionError {
            path: self.path.clone(),
            error: message,
            error_code: err.code(),
        });
    }

    fn fail(&mut self, err: &PurgeError, log: &mut ActivityLog) {
        let path = err.path().map_or_else(|| self.path.clone(), Path::to_path_buf);
        let message = match err {
            PurgeError::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        log.record(ActivityEvent::DeletionFailed {
            category: self.category.key(),
            path: path.clone(),
            error_code: err.code(),
            error_message: message.clone(),
        });
        self.errors.push(DeletionError {
            path,
            error: message,
            error_code: err.code(),
        });
    }

    fn complete(&self, log: &mut ActivityLog) {
        log.record(ActivityEvent::TargetCompleted {
            category: self.category.key(),
            path: self.path.clone(),
            deleted: self.deleted.len(),
            kept: self.kept.len(),
            failed: self.errors.len(),
            dry_run: self.dry_run,
        });
    }
}

/// Aggregate of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<PurgeReport>,
}

impl RunSummary {
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.reports.iter().map(|r| r.deleted.len()).sum()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.reports.iter().map(|r| r.errors.len()).sum()
    }

    /// Non-fatal trouble somewhere in the run. Never affects the exit code.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.reports.iter().any(PurgeReport::has_warnings)
    }
}

// ──────────────────── engine ────────────────────

/// Applies an immutable [`Config`] to the filesystem.
pub struct PurgeEngine<'a> {
    config: &'a Config,
    options: PurgeOptions,
}

impl<'a> PurgeEngine<'a> {
    #[must_use]
    pub fn new(config: &'a Config, options: PurgeOptions) -> Self {
        Self { config, options }
    }

    /// The share root this run works under.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.options.roots.select(self.options.use_local_root)
    }

    /// Process every category in order.
    pub fn run(&self, log: &mut ActivityLog) -> RunSummary {
        let mut summary = RunSummary::default();
        for category in Category::ALL {
            summary.reports.extend(self.purge_category(category, log));
        }
        summary
    }

    /// Apply the configured mode of one category.
    pub fn purge_category(&self, category: Category, log: &mut ActivityLog) -> Vec<PurgeReport> {
        match PurgeAction::for_mode(category, self.config.mode(category)) {
            None => Vec::new(),
            Some(PurgeAction::Unconditional) => vec![self.purge_unconditional(category, log)],
            Some(PurgeAction::Filtered) => self.purge_filtered(category, log),
        }
    }

    /// Filter every target directory of `category`.
    pub fn purge_filtered(&self, category: Category, log: &mut ActivityLog) -> Vec<PurgeReport> {
        TargetDirectory::filtered(category, self.root())
            .iter()
            .map(|target| filter_directory(self.config, target, self.options.dry_run, log))
            .collect()
    }

    /// Remove the whole target tree of `category`.
    pub fn purge_unconditional(&self, category: Category, log: &mut ActivityLog) -> PurgeReport {
        let path = unconditional_target(category, self.root());
        remove_directory(category, &path, self.options.dry_run, log)
    }
}

/// Delete every immediate subdirectory of `target` that is not protected.
///
/// Non-directory entries and symlinks are left alone. Failing to open the
/// target skips it; failures inside deleted subtrees are recorded and the
/// scan continues.
pub fn filter_directory(
    config: &Config,
    target: &TargetDirectory,
    dry_run: bool,
    log: &mut ActivityLog,
) -> PurgeReport {
    let mut report = PurgeReport::new(
        target.category,
        target.path.clone(),
        PurgeAction::Filtered,
        dry_run,
    );

    let opened = fs::metadata(&target.path)
        .and_then(|meta| fs::read_dir(&target.path).map(|entries| (meta, entries)));
    let (meta, entries) = match opened {
        Ok(opened) => opened,
        Err(source) => {
            report.open_failed(source, log);
            return report;
        }
    };
    report.opened = true;
    let root_device = device_id(&meta);

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                report.fail(&PurgeError::io(&target.path, source), log);
                continue;
            }
        };

        // file_type() does not follow symlinks: a link to a directory is not a candidate.
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(source) => {
                report.fail(&PurgeError::io(entry.path(), source), log);
                continue;
            }
        };
        if !is_dir {
            continue;
        }

        let name = entry.file_name();
        if target.is_protected(&name, config) {
            report.kept.push(name.to_string_lossy().into_owned());
            continue;
        }

        let path = entry.path();
        log.record(ActivityEvent::Deleting {
            category: target.category.key(),
            path: path.clone(),
            dry_run,
        });
        if dry_run {
            report.deleted.push(path);
            continue;
        }

        let removal = remove_tree(&path, root_device);
        report.objects_removed += removal.removed;
        if removal.is_clean() {
            report.deleted.push(path);
        }
        for failure in &removal.failures {
            report.fail(failure, log);
        }
    }

    report.complete(log);
    report
}

/// Delete `path` and everything below it, including `path` itself.
pub fn remove_directory(
    category: Category,
    path: &Path,
    dry_run: bool,
    log: &mut ActivityLog,
) -> PurgeReport {
    let mut report = PurgeReport::new(
        category,
        path.to_path_buf(),
        PurgeAction::Unconditional,
        dry_run,
    );

    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(source) => {
            report.open_failed(source, log);
            return report;
        }
    };
    report.opened = true;

    log.record(ActivityEvent::Deleting {
        category: category.key(),
        path: path.to_path_buf(),
        dry_run,
    });

    if !dry_run {
        let removal = remove_tree(path, device_id(&meta));
        report.objects_removed = removal.removed;
        for failure in &removal.failures {
            report.fail(failure, log);
        }
        if !removal.is_clean() {
            report.complete(log);
            return report;
        }
    }

    report.deleted.push(path.to_path_buf());
    report.complete(log);
    report
}
