//! Installation roots, default config location, and path normalization.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Default configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/advancepurge.conf";

/// Share directory of the distribution-managed tree.
pub const SYSTEM_SHARE_DIR: &str = "/usr/share";

/// Share directory of locally installed software.
pub const LOCAL_SHARE_DIR: &str = "/usr/local/share";

/// Environment override for the config file location.
pub const ENV_CONFIG: &str = "ADVANCEPURGE_CONFIG";
/// Environment override for the system share root.
pub const ENV_SYSTEM_ROOT: &str = "ADVANCEPURGE_SYSTEM_ROOT";
/// Environment override for the local share root.
pub const ENV_LOCAL_ROOT: &str = "ADVANCEPURGE_LOCAL_ROOT";
/// Environment override for the JSONL activity log.
pub const ENV_LOG_FILE: &str = "ADVANCEPURGE_LOG_FILE";

/// The two alternative prefixes under which purge targets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRoots {
    pub system: PathBuf,
    pub local: PathBuf,
}

impl Default for ShareRoots {
    fn default() -> Self {
        Self {
            system: PathBuf::from(SYSTEM_SHARE_DIR),
            local: PathBuf::from(LOCAL_SHARE_DIR),
        }
    }
}

impl ShareRoots {
    /// Defaults with `ADVANCEPURGE_*_ROOT` overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Defaults with overrides resolved through `lookup`.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut roots = Self::default();
        if let Some(raw) = lookup(ENV_SYSTEM_ROOT) {
            roots.system = resolve_absolute_path(Path::new(&raw));
        }
        if let Some(raw) = lookup(ENV_LOCAL_ROOT) {
            roots.local = resolve_absolute_path(Path::new(&raw));
        }
        roots
    }

    /// Pick the root for this run.
    #[must_use]
    pub fn select(&self, use_local_root: bool) -> &Path {
        if use_local_root {
            &self.local
        } else {
            &self.system
        }
    }
}

/// Resolve the config file: explicit path, then `ADVANCEPURGE_CONFIG`, then
/// [`DEFAULT_CONFIG_FILE`].
#[must_use]
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    config_file_from(explicit, env_var)
}

/// Same as [`config_file`] with a caller-supplied environment lookup.
pub fn config_file_from<F>(explicit: Option<&Path>, mut lookup: F) -> PathBuf
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    lookup(ENV_CONFIG).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Read an environment variable, treating blank values as unset.
#[must_use]
pub fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

/// Resolve a path to an absolute, normalized path.
///
/// Relative paths are joined onto the current directory and `.`/`..` are
/// resolved syntactically. Symlinks are deliberately left alone: a root that
/// is itself a symlink is opened as given.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    normalize_syntactic(&absolute)
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}
