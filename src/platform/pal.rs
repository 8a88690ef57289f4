//! Unix specifics the purge engine depends on: device identity for the
//! one-filesystem guard and the effective-uid check.

use std::fs;

/// Device ID of a filesystem object (for cross-device detection).
///
/// Always 0 off Unix, which makes every object look like it lives on the same
/// device.
#[must_use]
pub fn device_id(meta: &fs::Metadata) -> u64 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        meta.dev()
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        0
    }
}

/// Check whether the current process is running as root.
///
/// Uses `nix::unistd::geteuid()` on Unix; always returns `false` elsewhere.
#[must_use]
pub fn is_running_as_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}
