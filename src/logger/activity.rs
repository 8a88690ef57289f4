//! Activity events and their human/JSONL rendering.
//!
//! Informational events reach stdout only in verbose mode; failures always go
//! to stderr. When a JSONL writer is attached, every event is also appended
//! there regardless of verbosity.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::path::PathBuf;

use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};

/// Something the configuration loader or the purge engine did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    OperationSet {
        category: &'static str,
        mode: &'static str,
    },
    LocaleRetained {
        name: String,
    },
    Deleting {
        category: &'static str,
        path: PathBuf,
        dry_run: bool,
    },
    DeletionFailed {
        category: &'static str,
        path: PathBuf,
        error_code: &'static str,
        error_message: String,
    },
    OpenFailed {
        category: &'static str,
        path: PathBuf,
        error_code: &'static str,
        error_message: String,
    },
    TargetCompleted {
        category: &'static str,
        path: PathBuf,
        deleted: usize,
        kept: usize,
        failed: usize,
        dry_run: bool,
    },
    Notice {
        message: String,
    },
}

impl ActivityEvent {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DeletionFailed { .. } | Self::OpenFailed { .. } => Severity::Error,
            Self::Notice { .. } => Severity::Warning,
            Self::TargetCompleted { failed, .. } if *failed > 0 => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Human-readable line for the terminal.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::OperationSet { category, mode } => format!("Operation {category}: {mode}"),
            Self::LocaleRetained { name } => format!("Configuration add: {name}"),
            Self::Deleting {
                path,
                dry_run: false,
                ..
            } => format!("Deleting: {}", path.display()),
            Self::Deleting {
                path,
                dry_run: true,
                ..
            } => format!("Would delete: {}", path.display()),
            Self::DeletionFailed {
                path,
                error_message,
                ..
            } => format!("Error removing {}: {error_message}", path.display()),
            Self::OpenFailed {
                path,
                error_message,
                ..
            } => format!(
                "Error while opening the directory {}: {error_message}",
                path.display()
            ),
            Self::TargetCompleted {
                category,
                path,
                deleted,
                kept,
                failed,
                dry_run,
            } => {
                let verb = if *dry_run { "would delete" } else { "deleted" };
                format!(
                    "[{category}] {}: {verb} {deleted}, kept {kept}, failed {failed}",
                    path.display()
                )
            }
            Self::Notice { message } => format!("Warning: {message}"),
        }
    }

    /// Whether the line is shown even without `--verbose`.
    #[must_use]
    pub const fn always_shown(&self) -> bool {
        matches!(self, Self::DeletionFailed { .. } | Self::OpenFailed { .. })
    }

    const fn event_type(&self) -> EventType {
        match self {
            Self::OperationSet { .. } => EventType::OperationSet,
            Self::LocaleRetained { .. } => EventType::LocaleRetained,
            Self::Deleting { .. } => EventType::Delete,
            Self::DeletionFailed { .. } => EventType::DeleteFailed,
            Self::OpenFailed { .. } => EventType::OpenFailed,
            Self::TargetCompleted { .. } => EventType::TargetComplete,
            Self::Notice { .. } => EventType::Notice,
        }
    }

    fn to_log_entry(&self) -> LogEntry {
        let mut e = LogEntry::new(self.event_type(), self.severity());
        match self {
            Self::OperationSet { category, mode } => {
                e.category = Some((*category).to_string());
                e.mode = Some((*mode).to_string());
            }
            Self::LocaleRetained { name } => e.locale = Some(name.clone()),
            Self::Deleting {
                category,
                path,
                dry_run,
            } => {
                e.category = Some((*category).to_string());
                e.path = Some(path.to_string_lossy().into_owned());
                e.dry_run = Some(*dry_run);
            }
            Self::DeletionFailed {
                category,
                path,
                error_code,
                error_message,
            }
            | Self::OpenFailed {
                category,
                path,
                error_code,
                error_message,
            } => {
                e.category = Some((*category).to_string());
                e.path = Some(path.to_string_lossy().into_owned());
                e.error_code = Some((*error_code).to_string());
                e.error_message = Some(error_message.clone());
            }
            Self::TargetCompleted {
                category,
                path,
                deleted,
                kept,
                failed,
                dry_run,
            } => {
                e.category = Some((*category).to_string());
                e.path = Some(path.to_string_lossy().into_owned());
                e.deleted = Some(*deleted);
                e.kept = Some(*kept);
                e.failed = Some(*failed);
                e.dry_run = Some(*dry_run);
            }
            Self::Notice { message } => e.details = Some(message.clone()),
        }
        e
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Terminal,
    Capture,
    Silent,
}

/// Sink for activity events.
pub struct ActivityLog {
    verbose: bool,
    output: Output,
    jsonl: Option<JsonlWriter>,
    captured: Vec<String>,
    errors: usize,
}

impl ActivityLog {
    /// Terminal sink; informational lines only when `verbose`.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            output: Output::Terminal,
            jsonl: None,
            captured: Vec::new(),
            errors: 0,
        }
    }

    /// Discards everything. Errors are still counted.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            output: Output::Silent,
            ..Self::new(false)
        }
    }

    /// Records rendered lines in memory as a verbose terminal would show them.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            output: Output::Capture,
            ..Self::new(true)
        }
    }

    /// Also append every event to a JSONL activity log.
    #[must_use]
    pub fn with_jsonl(mut self, writer: JsonlWriter) -> Self {
        self.jsonl = Some(writer);
        self
    }

    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn record(&mut self, event: ActivityEvent) {
        if event.severity() == Severity::Error {
            self.errors += 1;
        }

        if let Some(writer) = self.jsonl.as_mut() {
            writer.write_entry(&event.to_log_entry());
        }

        if !self.verbose && !event.always_shown() {
            return;
        }

        let line = event.render();
        match self.output {
            Output::Silent => {}
            Output::Capture => self.captured.push(line),
            Output::Terminal => {
                if event.severity() == Severity::Info {
                    let _ = writeln!(io::stdout(), "{line}");
                } else {
                    let _ = writeln!(io::stderr(), "{line}");
                }
            }
        }
    }

    /// Lines collected by a [`capture`](Self::capture) sink.
    pub fn captured(&self) -> &[String] {
        &self.captured
    }

    /// The JSONL trail, when one is attached.
    pub const fn jsonl(&self) -> Option<&JsonlWriter> {
        self.jsonl.as_ref()
    }

    /// Number of error events seen so far.
    pub const fn error_count(&self) -> usize {
        self.errors
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.jsonl.as_mut() {
            writer.flush();
        }
        let _ = io::stdout().flush();
    }
}
