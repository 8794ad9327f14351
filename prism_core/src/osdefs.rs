//! Platform path primitives.

/// Path component separator.
#[cfg(windows)]
pub const SEP: char = '\\';
/// Path component separator.
#[cfg(not(windows))]
pub const SEP: char = '/';

/// Separator between entries of a path list (`PATH`, `PYTHONPATH`).
#[cfg(windows)]
pub const DELIM: char = ';';
/// Separator between entries of a path list (`PATH`, `PYTHONPATH`).
#[cfg(not(windows))]
pub const DELIM: char = ':';

/// Longest path the path calculation will build, in bytes.
pub const MAXPATHLEN: usize = 4096;

/// Check if `path` is absolute on this platform.
#[inline]
#[must_use]
pub fn is_abs(path: &str) -> bool {
    #[cfg(windows)]
    {
        let bytes = path.as_bytes();
        path.starts_with(SEP)
            || path.starts_with('/')
            || (bytes.len() >= 3
                && bytes[0].is_ascii_alphabetic()
                && bytes[1] == b':'
                && (bytes[2] == b'\\' || bytes[2] == b'/'))
    }
    #[cfg(not(windows))]
    {
        path.starts_with(SEP)
    }
}

/// Split a path list on [`DELIM`], keeping empty entries.
#[inline]
pub fn split_path_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(DELIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_is_abs_posix() {
        assert!(is_abs("/usr"));
        assert!(is_abs("/"));
        assert!(!is_abs("usr/bin"));
        assert!(!is_abs(""));
        assert!(!is_abs("./python"));
    }

    #[test]
    fn test_split_keeps_empty_entries() {
        let list = format!("a{DELIM}{DELIM}b");
        let parts: Vec<&str> = split_path_list(&list).collect();
        assert_eq!(parts, vec!["a", "", "b"]);
    }
}
