//! Depth-first physical removal of a directory tree.
//!
//! Safety invariants:
//! - Symlinks are unlinked, never followed
//! - Never descends into a directory on another device than `root_device`
//! - A failed removal is recorded and the walk moves on
//!
//! The walk keeps its own stack, so tree depth is bounded by memory rather
//! than by the thread's stack size.

#![allow(missing_docs)]

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::core::errors::PurgeError;
use crate::platform::pal::device_id;

/// Outcome of one [`remove_tree`] call.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Filesystem objects removed (files, links, directories).
    pub removed: usize,
    pub failures: Vec<PurgeError>,
}

impl RemovalReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, result: io::Result<()>) {
        match result {
            Ok(()) => self.removed += 1,
            // Gone already: someone else won the race, which is the outcome we wanted.
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => self.failures.push(PurgeError::io(path, err)),
        }
    }
}

enum Frame {
    Visit(PathBuf),
    Leave(PathBuf),
}

/// Remove `path` and everything under it.
///
/// `root_device` is the device of the directory the purge started from;
/// directories on any other device are reported as
/// [`PurgeError::CrossDevice`] and left in place.
pub fn remove_tree(path: &Path, root_device: u64) -> RemovalReport {
    let mut report = RemovalReport::default();
    let mut stack = vec![Frame::Visit(path.to_path_buf())];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Visit(current) => visit(current, root_device, &mut stack, &mut report),
            Frame::Leave(dir) => {
                let result = fs::remove_dir(&dir);
                report.record(&dir, result);
            }
        }
    }

    report
}

fn visit(current: PathBuf, root_device: u64, stack: &mut Vec<Frame>, report: &mut RemovalReport) {
    let meta = match fs::symlink_metadata(&current) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return,
        Err(err) => {
            report.failures.push(PurgeError::io(&current, err));
            return;
        }
    };

    // Regular files, symlinks, sockets, fifos, device nodes.
    if !meta.is_dir() {
        let result = fs::remove_file(&current);
        report.record(&current, result);
        return;
    }

    if device_id(&meta) != root_device {
        report.failures.push(PurgeError::CrossDevice { path: current });
        return;
    }

    let entries = match fs::read_dir(&current) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return,
        Err(err) => {
            report.failures.push(PurgeError::io(&current, err));
            return;
        }
    };

    // Children are pushed after the directory's own Leave frame, so they pop
    // (and are removed) first.
    stack.push(Frame::Leave(current.clone()));
    for entry in entries {
        match entry {
            Ok(entry) => stack.push(Frame::Visit(entry.path())),
            Err(err) => report.failures.push(PurgeError::io(&current, err)),
        }
    }
}
