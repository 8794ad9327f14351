//! Filesystem capability interface.
//!
//! Path calculation only needs a handful of queries, so it talks to the
//! filesystem through [`FileSystem`] rather than `std::fs`. [`OsFileSystem`]
//! answers them from the real filesystem and [`MemoryFileSystem`] from an
//! in-memory tree.
//!
//! Paths are plain strings: the search algorithm reduces and joins them
//! textually and downstream code depends on the exact text.

mod memory;

pub use memory::MemoryFileSystem;

use std::fmt;
use std::path::Path;

/// Filesystem queries used during bootstrap.
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// Target of the symbolic link at `path`, or `None` if `path` is not a link.
    fn read_link(&self, path: &str) -> Option<String>;

    /// Check if `path` names a regular file (following links).
    fn is_file(&self, path: &str) -> bool;

    /// Check if `path` names a directory (following links).
    fn is_dir(&self, path: &str) -> bool;

    /// Check if `path` names a regular file with an execute bit set.
    fn is_executable(&self, path: &str) -> bool;

    /// The current working directory, if it can be determined.
    fn current_dir(&self) -> Option<String>;

    /// Canonical absolute form of `path` with every link resolved.
    fn real_path(&self, path: &str) -> Option<String>;
}

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_link(&self, path: &str) -> Option<String> {
        std::fs::read_link(path)
            .ok()
            .and_then(|target| target.into_os_string().into_string().ok())
    }

    fn is_file(&self, path: &str) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_file())
    }

    fn is_dir(&self, path: &str) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &str) -> bool {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &str) -> bool {
        self.is_file(path)
    }

    fn current_dir(&self) -> Option<String> {
        std::env::current_dir()
            .ok()
            .and_then(|dir| dir.into_os_string().into_string().ok())
    }

    fn real_path(&self, path: &str) -> Option<String> {
        std::fs::canonicalize(Path::new(path))
            .ok()
            .and_then(|full| full.into_os_string().into_string().ok())
    }
}
