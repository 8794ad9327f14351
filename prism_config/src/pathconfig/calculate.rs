//! Standard library location search.
//!
//! [`PathCalculator`] derives the installation roots and the default module
//! search path from the executable location, `PYTHONHOME`, `PYTHONPATH` and
//! the compiled-in layout. The search runs in tiers, first hit wins:
//!
//! 1. `home` (`PYTHONHOME` or the embedding API) is trusted unconditionally.
//! 2. A build tree, detected by `Modules/Setup.local` beside the executable.
//! 3. An upward walk from the executable's directory looking for the
//!    landmark (`os.py` or `os.pyc`) under `<dir>/<platlibdir>/pythonX.Y`.
//! 4. The compiled-in `PREFIX`/`EXEC_PREFIX`.
//!
//! Everything is computed into a [`Calculation`]; nothing reaches the
//! [`PathConfig`] until the whole search succeeded.

use super::PathConfig;
use super::join::{copy_absolute, joined, joinpath, reduce, reduced};
use crate::build_info::BuildConfig;
use crate::config::Config;
use crate::fs::FileSystem;
use crate::host::Host;
use prism_core::osdefs::{DELIM, SEP, is_abs};
use prism_core::{Status, StatusResult};
use tracing::debug;

/// Standard library landmark.
pub const LANDMARK: &str = "os.py";

/// File whose presence beside the executable marks a build tree.
pub const BUILD_LANDMARK: &str = "Modules/Setup.local";

/// Directory holding extension modules, below the versioned library dir.
pub const LIB_DYNLOAD: &str = "lib-dynload";

/// Symbolic links followed before giving up.
pub const MAX_SYMLINKS: usize = 40;

/// How a root was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    /// Nothing matched; the compiled-in value is used.
    NotFound,
    /// Found through `home`, the upward walk or the compiled-in prefix.
    Installed,
    /// Running from a build tree.
    BuildDirectory,
}

impl Found {
    /// Check if a location was found by any tier.
    #[inline]
    #[must_use]
    pub const fn is_found(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Result of one path calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    /// Absolute path of the executable, or empty if unknown.
    pub program_full_path: String,
    /// Directory of the executable after resolving symbolic links.
    pub argv0_path: String,
    /// Versioned library directory, e.g. `/usr/local/lib/python3.12`.
    pub prefix: String,
    /// How `prefix` was located.
    pub prefix_found: Found,
    /// Extension module directory, e.g. `/usr/local/lib/python3.12/lib-dynload`.
    pub exec_prefix: String,
    /// How `exec_prefix` was located.
    pub exec_prefix_found: Found,
    /// Zipped standard library entry.
    pub zip_path: String,
    /// The full search path, `DELIM`-joined.
    pub module_search_path: String,
    /// Installation root as published in `sys.prefix`.
    pub published_prefix: String,
    /// Platform-dependent root as published in `sys.exec_prefix`.
    pub published_exec_prefix: String,
    /// Warnings produced by the search, in order.
    pub warnings: Vec<String>,
}

impl Calculation {
    /// Store the results in the fields of `path_config` that are still unset.
    pub fn publish(self, path_config: &mut PathConfig) {
        path_config
            .program_full_path
            .get_or_insert(self.program_full_path);
        path_config
            .module_search_path
            .get_or_insert(self.module_search_path);
        path_config.prefix.get_or_insert(self.published_prefix);
        path_config
            .exec_prefix
            .get_or_insert(self.published_exec_prefix);
    }
}

/// Inputs of one path calculation.
#[derive(Debug)]
pub struct PathCalculator<'a> {
    fs: &'a dyn FileSystem,
    build: &'a BuildConfig,
    warnings: bool,
    path_env: Option<String>,
    pythonpath_env: Option<String>,
    platlibdir: String,
    lib_python: String,
}

impl<'a> PathCalculator<'a> {
    /// Gather the inputs from the host and the configuration.
    pub fn new(host: &'a Host, config: &Config) -> StatusResult<Self> {
        let platlibdir = config
            .platlibdir
            .clone()
            .unwrap_or_else(|| host.build.platlibdir.clone());
        let lib_python = joined(&platlibdir, &host.build.python_dir_name())?;
        Ok(Self {
            fs: host.fs.as_ref(),
            build: &host.build,
            warnings: config.pathconfig_warnings.unwrap_or(true),
            path_env: host.env.get("PATH")?,
            pythonpath_env: config.pythonpath_env.clone(),
            platlibdir,
            lib_python,
        })
    }

    /// Versioned library directory relative to a root, e.g. `lib/python3.12`.
    #[inline]
    #[must_use]
    pub fn lib_python(&self) -> &str {
        &self.lib_python
    }

    /// Run the search for `path_config`.
    ///
    /// `program_name` and `home` are read from `path_config`; an already set
    /// `program_full_path` is used instead of searching for the executable.
    pub fn calculate(&self, path_config: &PathConfig) -> StatusResult<Calculation> {
        let program_full_path = match &path_config.program_full_path {
            Some(path) => path.clone(),
            None => self.program_full_path(path_config.program_name.as_deref().unwrap_or(""))?,
        };
        let argv0_path = self.argv0_path(&program_full_path)?;
        let home = path_config.home.as_deref();
        let mut warnings = Vec::new();

        let (prefix, prefix_found) = match self.search_for_prefix(home, &argv0_path)? {
            Some(found) => found,
            None => {
                self.warn(&mut warnings, "Could not find platform independent libraries <prefix>");
                (joined(&self.build.prefix, &self.lib_python)?, Found::NotFound)
            }
        };

        let zip_path = self.zip_path(&prefix, prefix_found)?;

        let (exec_prefix, exec_prefix_found) = match self.search_for_exec_prefix(home, &argv0_path)? {
            Some(found) => found,
            None => {
                self.warn(&mut warnings, "Could not find platform dependent libraries <exec_prefix>");
                let lib_dynload = joined(&self.platlibdir, LIB_DYNLOAD)?;
                (joined(&self.build.exec_prefix, &lib_dynload)?, Found::NotFound)
            }
        };

        if !prefix_found.is_found() || !exec_prefix_found.is_found() {
            self.warn(&mut warnings, "Consider setting $PYTHONHOME to <prefix>[:<exec_prefix>]");
        }

        let module_search_path = self.module_search_path(&prefix, &zip_path, &exec_prefix);
        let published_prefix = match prefix_found {
            Found::Installed => root_or_sep(reduced(&prefix, 2)),
            Found::NotFound | Found::BuildDirectory => self.build.prefix.clone(),
        };
        let published_exec_prefix = match exec_prefix_found {
            Found::Installed => root_or_sep(reduced(&exec_prefix, 3)),
            Found::NotFound | Found::BuildDirectory => self.build.exec_prefix.clone(),
        };

        debug!(
            prefix = %published_prefix,
            exec_prefix = %published_exec_prefix,
            ?prefix_found,
            ?exec_prefix_found,
            "path calculation finished"
        );

        Ok(Calculation {
            program_full_path,
            argv0_path,
            prefix,
            prefix_found,
            exec_prefix,
            exec_prefix_found,
            zip_path,
            module_search_path,
            published_prefix,
            published_exec_prefix,
            warnings,
        })
    }

    fn warn(&self, warnings: &mut Vec<String>, message: &str) {
        if self.warnings {
            eprintln!("{message}");
            warnings.push(message.to_owned());
        }
    }

    // =========================================================================
    // Executable
    // =========================================================================

    /// Locate the executable from its name.
    ///
    /// A name containing a separator is taken as a path. Otherwise `PATH` is
    /// searched for an executable file. The result is made absolute; an
    /// executable that cannot be found yields the empty string.
    pub fn program_full_path(&self, program_name: &str) -> StatusResult<String> {
        let path = if program_name.contains(SEP) {
            program_name.to_owned()
        } else {
            self.which(program_name)?.unwrap_or_default()
        };

        if path.is_empty() || is_abs(&path) {
            return Ok(path);
        }
        let absolute = copy_absolute(&path, self.fs)?;
        if !is_abs(&absolute) {
            return Err(Status::error(
                "calculate_program",
                "cannot make the program path absolute",
            ));
        }
        Ok(absolute)
    }

    fn which(&self, program_name: &str) -> StatusResult<Option<String>> {
        let Some(path_env) = self.path_env.as_deref() else {
            return Ok(None);
        };
        for dir in path_env.split(DELIM) {
            let candidate = joined(dir, program_name)?;
            if self.fs.is_executable(&candidate) {
                debug!(path = %candidate, "executable found on PATH");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Directory holding the executable, with symbolic links resolved.
    pub fn argv0_path(&self, program_full_path: &str) -> StatusResult<String> {
        let mut path = self.resolve_symlinks(program_full_path)?;
        reduce(&mut path);
        Ok(path)
    }

    /// Follow symbolic links from `path`.
    ///
    /// Relative targets are joined to the directory of the link.
    pub fn resolve_symlinks(&self, path: &str) -> StatusResult<String> {
        let mut path = path.to_owned();
        let mut nlink = 0;
        while let Some(target) = self.fs.read_link(&path) {
            if is_abs(&target) {
                path = target;
            } else {
                reduce(&mut path);
                joinpath(&mut path, &target)?;
            }
            nlink += 1;
            if nlink >= MAX_SYMLINKS {
                return Err(Status::symlink_loop("resolve_symlinks"));
            }
        }
        Ok(path)
    }

    // =========================================================================
    // Prefix
    // =========================================================================

    /// Check for the landmark, source or bytecode, in `dir`.
    fn is_module(&self, dir: &str) -> StatusResult<bool> {
        let mut landmark = joined(dir, LANDMARK)?;
        if self.fs.is_file(&landmark) {
            return Ok(true);
        }
        landmark.push('c');
        Ok(self.fs.is_file(&landmark))
    }

    fn search_for_prefix(
        &self,
        home: Option<&str>,
        argv0_path: &str,
    ) -> StatusResult<Option<(String, Found)>> {
        if let Some(home) = home {
            let base = home.split(DELIM).next().unwrap_or(home);
            let prefix = joined(base, &self.lib_python)?;
            debug!(prefix = %prefix, "prefix taken from home");
            return Ok(Some((prefix, Found::Installed)));
        }

        if self.fs.is_file(&joined(argv0_path, BUILD_LANDMARK)?) {
            let mut prefix = joined(argv0_path, &self.build.vpath)?;
            joinpath(&mut prefix, "Lib")?;
            if self.is_module(&prefix)? {
                debug!(prefix = %prefix, "running from a build tree");
                return Ok(Some((prefix, Found::BuildDirectory)));
            }
        }

        let mut dir = copy_absolute(argv0_path, self.fs)?;
        loop {
            let candidate = joined(&dir, &self.lib_python)?;
            if self.is_module(&candidate)? {
                debug!(prefix = %candidate, "prefix found by upward walk");
                return Ok(Some((candidate, Found::Installed)));
            }
            reduce(&mut dir);
            if dir.is_empty() {
                break;
            }
        }

        let prefix = joined(&self.build.prefix, &self.lib_python)?;
        if self.is_module(&prefix)? {
            debug!(prefix = %prefix, "prefix found at compiled-in location");
            return Ok(Some((prefix, Found::Installed)));
        }
        Ok(None)
    }

    fn zip_path(&self, prefix: &str, prefix_found: Found) -> StatusResult<String> {
        let archive = joined(&self.platlibdir, &self.build.zip_name())?;
        let root = match prefix_found {
            Found::Installed => reduced(prefix, 2),
            Found::NotFound | Found::BuildDirectory => self.build.prefix.clone(),
        };
        joined(&root, &archive)
    }

    // =========================================================================
    // Exec Prefix
    // =========================================================================

    fn lib_dynload_in(&self, root: &str) -> StatusResult<String> {
        let mut path = joined(root, &self.lib_python)?;
        joinpath(&mut path, LIB_DYNLOAD)?;
        Ok(path)
    }

    fn search_for_exec_prefix(
        &self,
        home: Option<&str>,
        argv0_path: &str,
    ) -> StatusResult<Option<(String, Found)>> {
        if let Some(home) = home {
            let base = home.split_once(DELIM).map_or(home, |(_, exec)| exec);
            let exec_prefix = self.lib_dynload_in(base)?;
            debug!(exec_prefix = %exec_prefix, "exec_prefix taken from home");
            return Ok(Some((exec_prefix, Found::Installed)));
        }

        let mut dir = copy_absolute(argv0_path, self.fs)?;
        loop {
            let candidate = self.lib_dynload_in(&dir)?;
            if self.fs.is_dir(&candidate) {
                debug!(exec_prefix = %candidate, "exec_prefix found by upward walk");
                return Ok(Some((candidate, Found::Installed)));
            }
            reduce(&mut dir);
            if dir.is_empty() {
                break;
            }
        }

        let exec_prefix = self.lib_dynload_in(&self.build.exec_prefix)?;
        if self.fs.is_dir(&exec_prefix) {
            debug!(exec_prefix = %exec_prefix, "exec_prefix found at compiled-in location");
            return Ok(Some((exec_prefix, Found::Installed)));
        }
        Ok(None)
    }

    // =========================================================================
    // Search Path
    // =========================================================================

    /// Assemble `[PYTHONPATH] : zip : defaults : exec_prefix`.
    ///
    /// Relative default entries are rooted at `prefix`.
    #[must_use]
    pub fn module_search_path(&self, prefix: &str, zip_path: &str, exec_prefix: &str) -> String {
        let mut path = String::new();
        if let Some(env) = &self.pythonpath_env {
            path.push_str(env);
            path.push(DELIM);
        }

        path.push_str(zip_path);
        path.push(DELIM);

        for (i, entry) in self.build.python_path_entries().enumerate() {
            if i > 0 {
                path.push(DELIM);
            }
            if !is_abs(entry) {
                path.push_str(prefix);
                if !prefix.is_empty() && !prefix.ends_with(SEP) && !entry.is_empty() {
                    path.push(SEP);
                }
            }
            path.push_str(entry);
        }
        path.push(DELIM);

        path.push_str(exec_prefix);
        path
    }
}

fn root_or_sep(path: String) -> String {
    if path.is_empty() { SEP.to_string() } else { path }
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::fs::MemoryFileSystem;
    use prism_core::ErrorKind;
    use std::sync::Arc;

    fn build(prefix: &str) -> BuildConfig {
        BuildConfig {
            prefix: prefix.to_owned(),
            exec_prefix: prefix.to_owned(),
            python_path: String::new(),
            vpath: String::new(),
            platlibdir: "lib".to_owned(),
            version: "3.12".to_owned(),
        }
    }

    fn host(fs: MemoryFileSystem, env: &[(&str, &str)]) -> Host {
        Host::new(
            Environment::from_pairs(env.iter().copied()),
            Arc::new(fs),
            build("/usr/local"),
        )
    }

    fn quiet_config() -> Config {
        let mut config = Config::python();
        config.pathconfig_warnings = Some(false);
        config
    }

    fn path_config(program_name: &str) -> PathConfig {
        let mut path_config = PathConfig::new();
        path_config.program_name = Some(program_name.to_owned());
        path_config
    }

    fn installed_fs() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_executable("/usr/local/bin/python3")
            .with_file("/usr/local/lib/python3.12/os.py")
            .with_dir("/usr/local/lib/python3.12/lib-dynload")
    }

    // =========================================================================
    // Executable
    // =========================================================================

    #[test]
    fn test_program_found_on_path() {
        let host = host(installed_fs(), &[("PATH", "/bin:/usr/local/bin")]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        assert_eq!(calc.program_full_path("python3").unwrap(), "/usr/local/bin/python3");
        assert_eq!(calc.program_full_path("missing").unwrap(), "");
    }

    #[test]
    fn test_program_with_separator_made_absolute() {
        let fs = installed_fs().with_current_dir(Some("/usr/local"));
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        assert_eq!(calc.program_full_path("./bin/python3").unwrap(), "/usr/local/bin/python3");
    }

    #[test]
    fn test_symlink_relative_target_uses_link_directory() {
        let fs = installed_fs()
            .with_symlink("/usr/bin/python3", "../local/bin/python3");
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        assert_eq!(
            calc.argv0_path("/usr/bin/python3").unwrap(),
            "/usr/bin/../local/bin"
        );
    }

    #[test]
    fn test_symlink_chain_bound() {
        let mut fs = MemoryFileSystem::new().with_executable("/bin/real");
        for i in 0..39 {
            let target = if i == 38 { "/bin/real".to_owned() } else { format!("/bin/l{}", i + 1) };
            fs = fs.with_symlink(&format!("/bin/l{i}"), &target);
        }
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        assert_eq!(calc.resolve_symlinks("/bin/l0").unwrap(), "/bin/real");
    }

    #[test]
    fn test_symlink_cycle_is_error() {
        let fs = MemoryFileSystem::new()
            .with_symlink("/bin/a", "b")
            .with_symlink("/bin/b", "a");
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let err = calc.resolve_symlinks("/bin/a").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::SymlinkLoop));
        assert_eq!(err.message(), Some("maximum number of symbolic links reached"));
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[test]
    fn test_installed_layout() {
        let host = host(installed_fs(), &[("PATH", "/usr/local/bin")]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let result = calc.calculate(&path_config("python3")).unwrap();

        assert_eq!(result.program_full_path, "/usr/local/bin/python3");
        assert_eq!(result.argv0_path, "/usr/local/bin");
        assert_eq!(result.prefix, "/usr/local/lib/python3.12");
        assert_eq!(result.prefix_found, Found::Installed);
        assert_eq!(result.published_prefix, "/usr/local");
        assert_eq!(result.published_exec_prefix, "/usr/local");
        assert_eq!(result.zip_path, "/usr/local/lib/python312.zip");
        assert_eq!(
            result.module_search_path,
            "/usr/local/lib/python312.zip:/usr/local/lib/python3.12:/usr/local/lib/python3.12/lib-dynload"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_landmark_bytecode_counts() {
        let fs = MemoryFileSystem::new()
            .with_executable("/opt/app/bin/python3")
            .with_file("/opt/app/lib/python3.12/os.pyc");
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let result = calc.calculate(&path_config("/opt/app/bin/python3")).unwrap();
        assert_eq!(result.published_prefix, "/opt/app");
    }

    #[test]
    fn test_home_wins_over_filesystem() {
        let host = host(installed_fs(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let mut pc = path_config("/usr/local/bin/python3");
        pc.home = Some("/opt/py".to_owned());
        let result = calc.calculate(&pc).unwrap();

        assert_eq!(result.prefix, "/opt/py/lib/python3.12");
        assert_eq!(result.exec_prefix, "/opt/py/lib/python3.12/lib-dynload");
        assert_eq!(result.published_prefix, "/opt/py");
        assert_eq!(result.published_exec_prefix, "/opt/py");
    }

    #[test]
    fn test_home_with_two_roots() {
        let host = host(MemoryFileSystem::new(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let mut pc = path_config("python3");
        pc.home = Some("/opt/a:/opt/b".to_owned());
        let result = calc.calculate(&pc).unwrap();

        assert_eq!(result.published_prefix, "/opt/a");
        assert_eq!(result.published_exec_prefix, "/opt/b");
        assert_eq!(result.zip_path, "/opt/a/lib/python312.zip");
    }

    #[test]
    fn test_root_prefix_renders_separator() {
        let host = host(MemoryFileSystem::new(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let mut pc = path_config("python3");
        pc.home = Some("/".to_owned());
        let result = calc.calculate(&pc).unwrap();
        assert_eq!(result.prefix, "/lib/python3.12");
        assert_eq!(result.published_prefix, "/");
        assert_eq!(result.published_exec_prefix, "/");
    }

    #[test]
    fn test_oversized_home_aborts() {
        let host = host(installed_fs(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let mut pc = path_config("/usr/local/bin/python3");
        pc.home = Some(format!("/{}", "a".repeat(5000)));
        let err = calc.calculate(&pc).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PathTooLong));
    }

    #[test]
    fn test_build_tree_keeps_macro_prefix() {
        let fs = MemoryFileSystem::new()
            .with_executable("/src/cpython/python")
            .with_file("/src/cpython/Modules/Setup.local")
            .with_file("/src/cpython/Lib/os.py");
        let host = host(fs, &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let result = calc.calculate(&path_config("/src/cpython/python")).unwrap();

        assert_eq!(result.prefix_found, Found::BuildDirectory);
        assert_eq!(result.prefix, "/src/cpython/Lib");
        assert_eq!(result.published_prefix, "/usr/local");
        assert_eq!(result.zip_path, "/usr/local/lib/python312.zip");
        assert!(result.module_search_path.contains(":/src/cpython/Lib:"));
    }

    #[test]
    fn test_not_found_falls_back_to_macros() {
        let host = host(MemoryFileSystem::new(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let result = calc.calculate(&path_config("python3")).unwrap();

        assert_eq!(result.program_full_path, "");
        assert_eq!(result.prefix_found, Found::NotFound);
        assert_eq!(result.exec_prefix_found, Found::NotFound);
        assert_eq!(result.prefix, "/usr/local/lib/python3.12");
        assert_eq!(result.exec_prefix, "/usr/local/lib/lib-dynload");
        assert_eq!(result.published_prefix, "/usr/local");
    }

    #[test]
    fn test_warnings_recorded_when_enabled() {
        let host = host(MemoryFileSystem::new(), &[]);
        let config = Config::python();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let result = calc.calculate(&path_config("python3")).unwrap();
        assert_eq!(
            result.warnings,
            vec![
                "Could not find platform independent libraries <prefix>",
                "Could not find platform dependent libraries <exec_prefix>",
                "Consider setting $PYTHONHOME to <prefix>[:<exec_prefix>]",
            ]
        );
    }

    // =========================================================================
    // Search Path
    // =========================================================================

    #[test]
    fn test_search_path_with_env_and_defaults() {
        let mut host = host(MemoryFileSystem::new(), &[]);
        host.build.python_path = "site:/abs::extra".to_owned();
        let mut config = quiet_config();
        config.pythonpath_env = Some("/mine".to_owned());
        let calc = PathCalculator::new(&host, &config).unwrap();
        let path = calc.module_search_path("/p/lib/python3.12", "/p/lib/python312.zip", "/p/dyn");
        assert_eq!(
            path,
            "/mine:/p/lib/python312.zip:/p/lib/python3.12/site:/abs:/p/lib/python3.12:/p/lib/python3.12/extra:/p/dyn"
        );
    }

    #[test]
    fn test_publish_keeps_existing_fields() {
        let host = host(installed_fs(), &[]);
        let config = quiet_config();
        let calc = PathCalculator::new(&host, &config).unwrap();
        let mut pc = path_config("/usr/local/bin/python3");
        pc.prefix = Some("/custom".to_owned());
        let result = calc.calculate(&pc).unwrap();
        result.publish(&mut pc);
        assert_eq!(pc.prefix.as_deref(), Some("/custom"));
        assert_eq!(pc.exec_prefix.as_deref(), Some("/usr/local"));
    }
}
