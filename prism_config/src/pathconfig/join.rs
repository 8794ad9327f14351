//! Textual path primitives used by the search.
//!
//! These operate on strings, not on [`std::path::Path`]: the search result
//! is compared and split textually downstream, so every separator matters.

use crate::fs::FileSystem;
use prism_core::osdefs::{MAXPATHLEN, SEP, is_abs};
use prism_core::{Status, StatusResult};

/// Append `stuff` to `buffer`.
///
/// An absolute `stuff` replaces the buffer. Otherwise a separator is inserted
/// when the buffer is non-empty and does not already end with one.
pub fn joinpath(buffer: &mut String, stuff: &str) -> StatusResult {
    if is_abs(stuff) {
        if stuff.len() > MAXPATHLEN {
            return Err(Status::path_too_long("joinpath"));
        }
        buffer.clear();
        buffer.push_str(stuff);
        return Ok(());
    }

    let need_sep = !buffer.is_empty() && !buffer.ends_with(SEP);
    if buffer.len() + usize::from(need_sep) + stuff.len() > MAXPATHLEN {
        return Err(Status::path_too_long("joinpath"));
    }
    if need_sep {
        buffer.push(SEP);
    }
    buffer.push_str(stuff);
    Ok(())
}

/// `joinpath` on a copy.
pub fn joined(base: &str, stuff: &str) -> StatusResult<String> {
    let mut path = base.to_owned();
    joinpath(&mut path, stuff)?;
    Ok(path)
}

/// Truncate `path` at its last separator; no separator leaves it empty.
///
/// `/usr/lib` becomes `/usr`, `/usr` becomes the empty string.
#[inline]
pub fn reduce(path: &mut String) {
    let end = path.rfind(SEP).unwrap_or(0);
    path.truncate(end);
}

/// `reduce` applied `times` times to a copy.
#[must_use]
pub fn reduced(path: &str, times: usize) -> String {
    let mut path = path.to_owned();
    for _ in 0..times {
        reduce(&mut path);
    }
    path
}

/// Make `path` absolute against the working directory.
///
/// Absolute paths are returned unchanged. When the working directory cannot
/// be determined the path is returned as given. A leading `./` is dropped.
pub fn copy_absolute(path: &str, fs: &dyn FileSystem) -> StatusResult<String> {
    if is_abs(path) {
        return Ok(path.to_owned());
    }
    let Some(mut absolute) = fs.current_dir() else {
        return Ok(path.to_owned());
    };
    let relative = path
        .strip_prefix('.')
        .and_then(|rest| rest.strip_prefix(SEP))
        .unwrap_or(path);
    joinpath(&mut absolute, relative)?;
    Ok(absolute)
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use prism_core::ErrorKind;

    // =========================================================================
    // joinpath
    // =========================================================================

    #[test]
    fn test_join_inserts_single_separator() {
        let mut path = "/usr".to_owned();
        joinpath(&mut path, "lib").unwrap();
        assert_eq!(path, "/usr/lib");

        let mut path = "/usr/".to_owned();
        joinpath(&mut path, "lib").unwrap();
        assert_eq!(path, "/usr/lib");
    }

    #[test]
    fn test_join_onto_empty() {
        let mut path = String::new();
        joinpath(&mut path, "lib").unwrap();
        assert_eq!(path, "lib");
    }

    #[test]
    fn test_join_absolute_replaces() {
        let mut path = "/usr/local".to_owned();
        joinpath(&mut path, "/opt/py").unwrap();
        assert_eq!(path, "/opt/py");
    }

    #[test]
    fn test_join_too_long() {
        let mut path = "/".repeat(1) + &"a".repeat(MAXPATHLEN - 1);
        let err = joinpath(&mut path, "b").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PathTooLong));
        assert_eq!(err.origin(), Some("joinpath"));
    }

    #[test]
    fn test_join_exactly_max_is_allowed() {
        let mut path = "/".to_owned() + &"a".repeat(MAXPATHLEN - 3);
        joinpath(&mut path, "b").unwrap();
        assert_eq!(path.len(), MAXPATHLEN);
    }

    // =========================================================================
    // reduce
    // =========================================================================

    #[test]
    fn test_reduce_strips_last_component() {
        let mut path = "/usr/local/lib".to_owned();
        reduce(&mut path);
        assert_eq!(path, "/usr/local");
        reduce(&mut path);
        assert_eq!(path, "/usr");
        reduce(&mut path);
        assert_eq!(path, "");
        reduce(&mut path);
        assert_eq!(path, "");
    }

    #[test]
    fn test_reduce_relative_name() {
        assert_eq!(reduced("python3", 1), "");
        assert_eq!(reduced("bin/python3", 1), "bin");
    }

    // =========================================================================
    // copy_absolute
    // =========================================================================

    #[test]
    fn test_copy_absolute() {
        let fs = MemoryFileSystem::new().with_current_dir(Some("/home/user"));
        assert_eq!(copy_absolute("/bin/sh", &fs).unwrap(), "/bin/sh");
        assert_eq!(copy_absolute("./x.py", &fs).unwrap(), "/home/user/x.py");
        assert_eq!(copy_absolute("src/x.py", &fs).unwrap(), "/home/user/src/x.py");
    }

    #[test]
    fn test_copy_absolute_without_cwd() {
        let fs = MemoryFileSystem::new().with_current_dir(None);
        assert_eq!(copy_absolute("x.py", &fs).unwrap(), "x.py");
    }
}
