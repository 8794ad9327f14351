//! Build-time installation constants.
//!
//! The installer bakes the install layout into the binary through
//! environment variables seen at compile time:
//!
//! | Variable             | Meaning                                   | Default      |
//! |----------------------|-------------------------------------------|--------------|
//! | `PRISM_PREFIX`       | platform-independent install root         | `/usr/local` |
//! | `PRISM_EXEC_PREFIX`  | platform-dependent install root           | `/usr/local` |
//! | `PRISM_PYTHONPATH`   | default module search entries             | empty        |
//! | `PRISM_VPATH`        | source dir relative to a build dir        | empty        |
//! | `PRISM_PLATLIBDIR`   | library directory name                    | `lib`        |

use prism_core::osdefs::DELIM;

const DEFAULT_PREFIX: &str = "/usr/local";
const DEFAULT_PLATLIBDIR: &str = "lib";

/// Compiled-in installation constants consumed by path calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Platform-independent installation root (`PREFIX`).
    pub prefix: String,
    /// Platform-dependent installation root (`EXEC_PREFIX`).
    pub exec_prefix: String,
    /// Default module search entries, `DELIM`-separated (`PYTHONPATH`).
    pub python_path: String,
    /// Source directory relative to a build directory (`VPATH`).
    pub vpath: String,
    /// Library directory name (`PLATLIBDIR`).
    pub platlibdir: String,
    /// `major.minor` language version (`VERSION`).
    pub version: String,
}

impl BuildConfig {
    /// Constants baked in at compile time.
    #[must_use]
    pub fn compiled() -> Self {
        let prefix = option_env!("PRISM_PREFIX").unwrap_or(DEFAULT_PREFIX);
        Self {
            prefix: prefix.to_owned(),
            exec_prefix: option_env!("PRISM_EXEC_PREFIX")
                .unwrap_or(prefix)
                .to_owned(),
            python_path: option_env!("PRISM_PYTHONPATH").unwrap_or("").to_owned(),
            vpath: option_env!("PRISM_VPATH").unwrap_or("").to_owned(),
            platlibdir: option_env!("PRISM_PLATLIBDIR")
                .unwrap_or(DEFAULT_PLATLIBDIR)
                .to_owned(),
            version: prism_core::python_version_short(),
        }
    }

    /// Constants for an installation rooted at `prefix`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            exec_prefix: prefix.to_owned(),
            ..Self::compiled()
        }
    }

    /// Library directory name, e.g. `python3.12`.
    #[must_use]
    pub fn python_dir_name(&self) -> String {
        format!("python{}", self.version)
    }

    /// Standard library archive name, e.g. `python312.zip`.
    #[must_use]
    pub fn zip_name(&self) -> String {
        format!("python{}.zip", self.version.replace('.', ""))
    }

    /// The default search entries as a list.
    pub fn python_path_entries(&self) -> impl Iterator<Item = &str> {
        self.python_path.split(DELIM)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::compiled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_version() {
        let build = BuildConfig {
            version: "3.12".to_owned(),
            ..BuildConfig::with_prefix("/usr")
        };
        assert_eq!(build.python_dir_name(), "python3.12");
        assert_eq!(build.zip_name(), "python312.zip");
    }

    #[test]
    fn test_with_prefix_sets_both_roots() {
        let build = BuildConfig::with_prefix("/opt/prism");
        assert_eq!(build.prefix, "/opt/prism");
        assert_eq!(build.exec_prefix, "/opt/prism");
    }

    #[test]
    fn test_default_entries_round_trip() {
        let build = BuildConfig {
            python_path: format!("a{DELIM}{DELIM}/abs"),
            ..BuildConfig::compiled()
        };
        let entries: Vec<&str> = build.python_path_entries().collect();
        assert_eq!(entries, vec!["a", "", "/abs"]);
        assert_eq!(entries.join(&DELIM.to_string()), build.python_path);
    }
}
