//! In-memory filesystem.
//!
//! Used by tests and embedders that want path calculation to run against a
//! fixed tree. Holds directories, files (optionally executable) and
//! symbolic links; parent directories are created on insertion.

use super::FileSystem;
use prism_core::osdefs::SEP;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Links followed before a lookup gives up.
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Directory,
    File { executable: bool },
    Symlink(String),
}

/// In-memory [`FileSystem`].
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    entries: FxHashMap<String, Entry>,
    cwd: Option<String>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// Create a filesystem holding only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = FxHashMap::default();
        entries.insert(SEP.to_string(), Entry::Directory);
        Self {
            entries,
            cwd: Some(SEP.to_string()),
        }
    }

    /// Add a directory.
    #[must_use]
    pub fn with_dir(mut self, path: &str) -> Self {
        self.insert(path, Entry::Directory);
        self
    }

    /// Add a regular file.
    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        self.insert(path, Entry::File { executable: false });
        self
    }

    /// Add an executable regular file.
    #[must_use]
    pub fn with_executable(mut self, path: &str) -> Self {
        self.insert(path, Entry::File { executable: true });
        self
    }

    /// Add a symbolic link at `path` pointing to `target`.
    #[must_use]
    pub fn with_symlink(mut self, path: &str, target: &str) -> Self {
        self.insert(path, Entry::Symlink(target.to_owned()));
        self
    }

    /// Set the working directory; `None` makes it undeterminable.
    #[must_use]
    pub fn with_current_dir(mut self, cwd: Option<&str>) -> Self {
        self.cwd = cwd.map(str::to_owned);
        self
    }

    fn key(components: &[String]) -> String {
        let mut key = String::new();
        for component in components {
            key.push(SEP);
            key.push_str(component);
        }
        if key.is_empty() {
            key.push(SEP);
        }
        key
    }

    fn components(path: &str) -> impl DoubleEndedIterator<Item = &str> {
        path.split(SEP).filter(|c| !c.is_empty() && *c != ".")
    }

    fn insert(&mut self, path: &str, entry: Entry) {
        let mut current = Vec::new();
        let parts: Vec<&str> = Self::components(path).collect();
        for (i, part) in parts.iter().enumerate() {
            current.push((*part).to_owned());
            if i + 1 < parts.len() {
                self.entries
                    .entry(Self::key(&current))
                    .or_insert(Entry::Directory);
            }
        }
        self.entries.insert(Self::key(&current), entry);
    }

    /// Resolve `path` to its canonical components.
    ///
    /// Intermediate links are always followed; the final component is
    /// followed only when `follow_last` is set. Returns `None` when the
    /// working directory is needed but unknown or a link chain is too long.
    fn resolve(&self, path: &str, follow_last: bool) -> Option<Vec<String>> {
        let mut pending: VecDeque<String> = VecDeque::new();
        if !path.starts_with(SEP) {
            let cwd = self.cwd.as_deref()?;
            pending.extend(cwd.split(SEP).map(str::to_owned));
        }
        pending.extend(path.split(SEP).map(str::to_owned));

        let mut resolved: Vec<String> = Vec::new();
        let mut hops = 0;
        while let Some(component) = pending.pop_front() {
            match component.as_str() {
                "" | "." => continue,
                ".." => {
                    resolved.pop();
                    continue;
                }
                _ => {}
            }
            resolved.push(component);

            let is_last = pending.iter().all(|c| c.is_empty() || c == ".");
            if is_last && !follow_last {
                continue;
            }
            if let Some(Entry::Symlink(target)) = self.entries.get(&Self::key(&resolved)) {
                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return None;
                }
                resolved.pop();
                if target.starts_with(SEP) {
                    resolved.clear();
                }
                for part in target.split(SEP).rev() {
                    pending.push_front(part.to_owned());
                }
            }
        }
        Some(resolved)
    }

    fn lookup(&self, path: &str, follow_last: bool) -> Option<&Entry> {
        let components = self.resolve(path, follow_last)?;
        self.entries.get(&Self::key(&components))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_link(&self, path: &str) -> Option<String> {
        match self.lookup(path, false)? {
            Entry::Symlink(target) => Some(target.clone()),
            _ => None,
        }
    }

    fn is_file(&self, path: &str) -> bool {
        matches!(self.lookup(path, true), Some(Entry::File { .. }))
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.lookup(path, true), Some(Entry::Directory))
    }

    fn is_executable(&self, path: &str) -> bool {
        matches!(
            self.lookup(path, true),
            Some(Entry::File { executable: true })
        )
    }

    fn current_dir(&self) -> Option<String> {
        self.cwd.clone()
    }

    fn real_path(&self, path: &str) -> Option<String> {
        let components = self.resolve(path, true)?;
        let key = Self::key(&components);
        self.entries.contains_key(&key).then_some(key)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_parents_are_created() {
        let fs = MemoryFileSystem::new().with_file("/usr/local/lib/python3.12/os.py");
        assert!(fs.is_dir("/usr"));
        assert!(fs.is_dir("/usr/local/lib/python3.12"));
        assert!(fs.is_file("/usr/local/lib/python3.12/os.py"));
        assert!(!fs.is_dir("/usr/local/lib/python3.12/os.py"));
        assert!(fs.is_dir("/"));
    }

    #[test]
    fn test_executable_bit() {
        let fs = MemoryFileSystem::new()
            .with_executable("/usr/bin/python3")
            .with_file("/usr/bin/notes");
        assert!(fs.is_executable("/usr/bin/python3"));
        assert!(!fs.is_executable("/usr/bin/notes"));
        assert!(!fs.is_executable("/usr/bin"));
    }

    #[test]
    fn test_symlinks_are_followed() {
        let fs = MemoryFileSystem::new()
            .with_executable("/opt/py/bin/python3.12")
            .with_symlink("/usr/bin/python3", "/opt/py/bin/python3.12")
            .with_symlink("/opt/py/bin/python3", "python3.12");

        assert_eq!(
            fs.read_link("/usr/bin/python3").as_deref(),
            Some("/opt/py/bin/python3.12")
        );
        assert!(fs.is_executable("/usr/bin/python3"));
        assert!(fs.is_file("/opt/py/bin/python3"));
        assert_eq!(
            fs.real_path("/opt/py/bin/python3").as_deref(),
            Some("/opt/py/bin/python3.12")
        );
        assert_eq!(fs.read_link("/opt/py/bin/python3.12"), None);
    }

    #[test]
    fn test_relative_paths_use_current_dir() {
        let fs = MemoryFileSystem::new()
            .with_file("/work/script.py")
            .with_current_dir(Some("/work"));
        assert!(fs.is_file("script.py"));
        assert_eq!(fs.real_path("./script.py").as_deref(), Some("/work/script.py"));

        let fs = fs.with_current_dir(None);
        assert!(!fs.is_file("script.py"));
        assert_eq!(fs.current_dir(), None);
    }

    #[test]
    fn test_link_cycle_is_not_found() {
        let fs = MemoryFileSystem::new()
            .with_symlink("/a", "/b")
            .with_symlink("/b", "/a");
        assert!(!fs.is_file("/a"));
        assert_eq!(fs.real_path("/a"), None);
        assert_eq!(fs.read_link("/a").as_deref(), Some("/b"));
    }
}
