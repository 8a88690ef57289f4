//! Where each category lives and which of its subdirectories are untouchable.

#![allow(missing_docs)]

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::config::{Category, Config};

/// Names never deleted by a filtered purge, in any category. `C` is the
/// baseline locale every system needs.
pub const ALWAYS_KEPT: [&str; 3] = [".", "..", "C"];

/// Manual-page section directories.
pub const MANUAL_SECTIONS: [&str; 9] = [
    "man1", "man2", "man3", "man4", "man5", "man6", "man7", "man8", "man9",
];

const HELP_EXCLUDE: [&str; 1] = ["C"];

/// Directories (relative to the share root) scanned by a filtered purge.
#[must_use]
pub const fn filtered_suffixes(category: Category) -> &'static [&'static str] {
    match category {
        Category::Locale => &["locale"],
        Category::Cups => &["cups/templates", "cups/locale", "cups/doc-root"],
        Category::Manual => &["man"],
        Category::Help => &["help"],
        Category::Doc => &[],
    }
}

/// Directory (relative to the share root) removed by an unconditional purge.
#[must_use]
pub const fn unconditional_suffix(category: Category) -> &'static str {
    match category {
        Category::Locale => "locale",
        Category::Cups => "cups/locale",
        Category::Manual => "man",
        Category::Help => "help",
        Category::Doc => "doc",
    }
}

/// Category-specific names protected regardless of configuration.
#[must_use]
pub const fn exclude_list(category: Category) -> &'static [&'static str] {
    match category {
        Category::Manual => &MANUAL_SECTIONS,
        Category::Help => &HELP_EXCLUDE,
        Category::Locale | Category::Cups | Category::Doc => &[],
    }
}

/// One directory a filtered purge walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectory {
    pub category: Category,
    pub path: PathBuf,
    pub exclude: &'static [&'static str],
}

impl TargetDirectory {
    #[must_use]
    pub fn new(category: Category, path: impl Into<PathBuf>) -> Self {
        Self {
            category,
            path: path.into(),
            exclude: exclude_list(category),
        }
    }

    /// All filtered targets of `category` under `root`.
    #[must_use]
    pub fn filtered(category: Category, root: &Path) -> Vec<Self> {
        filtered_suffixes(category)
            .iter()
            .map(|suffix| Self::new(category, root.join(suffix)))
            .collect()
    }

    /// Whether the entry `name` of this directory must survive.
    ///
    /// Names that are not valid UTF-8 can match neither the static lists nor
    /// a configured locale, so they are never protected.
    #[must_use]
    pub fn is_protected(&self, name: &OsStr, config: &Config) -> bool {
        let Some(name) = name.to_str() else {
            return false;
        };
        ALWAYS_KEPT.contains(&name) || self.exclude.contains(&name) || config.is_retained(name)
    }
}

/// Path removed when `category` is purged unconditionally.
#[must_use]
pub fn unconditional_target(category: Category, root: &Path) -> PathBuf {
    root.join(unconditional_suffix(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RetainedLocales;

    fn config_with(locales: &[&str]) -> Config {
        Config {
            locales: locales.iter().copied().collect::<RetainedLocales>(),
            ..Config::default()
        }
    }

    #[test]
    fn path_table_under_system_root() {
        let root = Path::new("/usr/share");
        let cups: Vec<PathBuf> = TargetDirectory::filtered(Category::Cups, root)
            .into_iter()
            .map(|t| t.path)
            .collect();
        assert_eq!(
            cups,
            vec![
                PathBuf::from("/usr/share/cups/templates"),
                PathBuf::from("/usr/share/cups/locale"),
                PathBuf::from("/usr/share/cups/doc-root"),
            ]
        );
        assert_eq!(
            unconditional_target(Category::Doc, root),
            PathBuf::from("/usr/share/doc")
        );
        assert!(TargetDirectory::filtered(Category::Doc, root).is_empty());
    }

    #[test]
    fn manual_sections_and_baseline_are_protected() {
        let cfg = config_with(&[]);
        let man = TargetDirectory::new(Category::Manual, "/usr/share/man");
        for section in MANUAL_SECTIONS {
            assert!(man.is_protected(OsStr::new(section), &cfg));
        }
        assert!(man.is_protected(OsStr::new("C"), &cfg));
        assert!(!man.is_protected(OsStr::new("es"), &cfg));
        assert!(!man.is_protected(OsStr::new("man10"), &cfg));
    }

    #[test]
    fn exclude_list_is_category_specific() {
        let cfg = config_with(&[]);
        let locale = TargetDirectory::new(Category::Locale, "/usr/share/locale");
        assert!(!locale.is_protected(OsStr::new("man1"), &cfg));
    }

    #[test]
    fn retained_locales_are_protected() {
        let cfg = config_with(&["fr", "en_US"]);
        let locale = TargetDirectory::new(Category::Locale, "/usr/share/locale");
        assert!(locale.is_protected(OsStr::new("fr"), &cfg));
        assert!(locale.is_protected(OsStr::new("en_US"), &cfg));
        assert!(!locale.is_protected(OsStr::new("en"), &cfg));
        assert!(!locale.is_protected(OsStr::new("FR"), &cfg));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_not_protected() {
        use std::os::unix::ffi::OsStrExt;
        let cfg = config_with(&["fr"]);
        let locale = TargetDirectory::new(Category::Locale, "/usr/share/locale");
        assert!(!locale.is_protected(OsStr::from_bytes(b"f\xffr"), &cfg));
    }
}
