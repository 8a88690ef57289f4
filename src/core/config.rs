//! Configuration model: per-category purge modes plus the retained-locale list,
//! read from a small INI-like text file.
//!
//! ```text
//! [Operations]
//! locale = filter
//! doc    = on
//! # comment
//! [Locales]
//! en
//! fr
//! ```

#![allow(missing_docs)]

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::errors::{PurgeError, Result};
use crate::logger::activity::{ActivityEvent, ActivityLog};

const HEADER_OPERATIONS: &str = "[Operations]";
const HEADER_LOCALES: &str = "[Locales]";

/// One purge subject. Declaration order is the processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Locale,
    Cups,
    Manual,
    Help,
    Doc,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Self; 5] = [Self::Locale, Self::Cups, Self::Manual, Self::Help, Self::Doc];

    /// Key used in the `[Operations]` section.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Locale => "locale",
            Self::Cups => "cups",
            Self::Manual => "manual",
            Self::Help => "help",
            Self::Doc => "doc",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What to do with a category's directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurgeMode {
    /// Leave the category alone.
    Off,
    /// Delete the whole target tree.
    On,
    /// Delete only unprotected subdirectories.
    Filter,
}

impl PurgeMode {
    /// Interpret an operation value. Anything unrecognized, including an empty
    /// value, switches the category off.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value {
            "on" | "yes" => Self::On,
            "filter" => Self::Filter,
            _ => Self::Off,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Filter => "filter",
        }
    }
}

impl fmt::Display for PurgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purge mode of each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operations {
    pub locale: PurgeMode,
    pub cups: PurgeMode,
    pub manual: PurgeMode,
    pub help: PurgeMode,
    pub doc: PurgeMode,
}

impl Default for Operations {
    fn default() -> Self {
        Self {
            locale: PurgeMode::Filter,
            cups: PurgeMode::Filter,
            manual: PurgeMode::Filter,
            help: PurgeMode::Filter,
            doc: PurgeMode::On,
        }
    }
}

impl Operations {
    #[must_use]
    pub const fn get(&self, category: Category) -> PurgeMode {
        match category {
            Category::Locale => self.locale,
            Category::Cups => self.cups,
            Category::Manual => self.manual,
            Category::Help => self.help,
            Category::Doc => self.doc,
        }
    }

    pub fn set(&mut self, category: Category, mode: PurgeMode) {
        let slot = match category {
            Category::Locale => &mut self.locale,
            Category::Cups => &mut self.cups,
            Category::Manual => &mut self.manual,
            Category::Help => &mut self.help,
            Category::Doc => &mut self.doc,
        };
        *slot = mode;
    }
}

/// Locale names the user wants kept, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedLocales(Vec<String>);

impl RetainedLocales {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a locale. Growth is fallible so an exhausted allocator surfaces
    /// as a configuration error instead of an abort.
    pub fn push(&mut self, name: impl Into<String>) -> Result<()> {
        self.0
            .try_reserve(1)
            .map_err(|error| PurgeError::ConfigAlloc {
                details: error.to_string(),
            })?;
        self.0.push(name.into());
        Ok(())
    }

    /// Case-sensitive exact membership.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|locale| locale == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RetainedLocales {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Section of the file the parser is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Undefined,
    Operations,
    Locales,
}

/// Full configuration: immutable once loaded, passed by reference to the
/// purge engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub operations: Operations,
    pub locales: RetainedLocales,
}

impl Config {
    /// Open and parse a config file.
    pub fn load(path: &Path, log: &mut ActivityLog) -> Result<Self> {
        let file = File::open(path).map_err(|source| PurgeError::ConfigOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file), log)
    }

    /// Parse a config stream on top of the defaults.
    pub fn parse<R: BufRead>(reader: R, log: &mut ActivityLog) -> Result<Self> {
        let mut config = Self::default();
        config.read_from(reader, log)?;
        Ok(config)
    }

    /// Apply a config stream to `self`. On error, lines before the failure
    /// remain applied.
    pub fn read_from<R: BufRead>(&mut self, reader: R, log: &mut ActivityLog) -> Result<()> {
        let mut section = Section::Undefined;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|error| PurgeError::ConfigRead {
                line: index + 1,
                details: error.to_string(),
            })?;
            // Trailing blanks and CR never belong to a locale name.
            let trimmed = line.trim_start_matches([' ', '\t']).trim_end();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match trimmed {
                HEADER_OPERATIONS => {
                    section = Section::Operations;
                    continue;
                }
                HEADER_LOCALES => {
                    section = Section::Locales;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Undefined => {}
                Section::Operations => self.apply_operation(trimmed, log),
                Section::Locales => {
                    self.locales.push(trimmed)?;
                    log.record(ActivityEvent::LocaleRetained {
                        name: trimmed.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn apply_operation(&mut self, line: &str, log: &mut ActivityLog) {
        let Some((key, value)) = line.split_once('=') else {
            return;
        };
        let Some(category) = Category::from_key(key.trim()) else {
            return;
        };
        let mode = PurgeMode::from_value(value.trim());
        self.operations.set(category, mode);
        log.record(ActivityEvent::OperationSet {
            category: category.key(),
            mode: mode.as_str(),
        });
    }

    #[must_use]
    pub const fn mode(&self, category: Category) -> PurgeMode {
        self.operations.get(category)
    }

    #[must_use]
    pub fn is_retained(&self, name: &str) -> bool {
        self.locales.contains(name)
    }
}
