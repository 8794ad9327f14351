//! The `sys` module.
//!
//! Created in two steps. Core initialization builds the constant part
//! (version, platform, limits) so that `sys` exists before anything else
//! is imported. Main initialization then publishes the configuration:
//! search path, command line, install locations, flags and options.

mod argv;
mod paths;

pub use argv::SysArgv;
pub use paths::SysPaths;

use super::{Module, ModuleError, ModuleResult, Value};
use prism_config::{Config, PreConfig};
use prism_core::{PYTHON_VERSION, StringInterner, VERSION, python_version_full};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::sync::Arc;

/// Name reported by `sys.platform`.
#[must_use]
pub fn platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// The `sys` module providing runtime system configuration.
#[derive(Debug)]
pub struct SysModule {
    interner: Arc<StringInterner>,
    attrs: FxHashMap<Arc<str>, Value>,
    argv: SysArgv,
    orig_argv: SysArgv,
    path: SysPaths,
}

impl SysModule {
    /// Build the constant part of `sys`.
    pub fn scaffold(interner: Arc<StringInterner>) -> Self {
        let mut sys = Self {
            interner,
            attrs: FxHashMap::default(),
            argv: SysArgv::empty(),
            orig_argv: SysArgv::empty(),
            path: SysPaths::new(),
        };

        let (major, minor, micro) = PYTHON_VERSION;
        let version = format!("{} (prism {VERSION})", python_version_full());
        sys.set_str("version", &version);
        sys.set_str("platform", platform());
        sys.set_str(
            "byteorder",
            if cfg!(target_endian = "little") { "little" } else { "big" },
        );
        sys.set("maxsize", Value::Int(isize::MAX as i64));
        sys.set(
            "hexversion",
            Value::Int(i64::from(major) << 24 | i64::from(minor) << 16 | i64::from(micro) << 8 | 0xf0),
        );
        let release_level = sys.interner.intern("final");
        sys.set(
            "version_info",
            Value::StructSeq {
                type_name: "sys.version_info",
                fields: vec![
                    ("major", Value::Int(i64::from(major))),
                    ("minor", Value::Int(i64::from(minor))),
                    ("micro", Value::Int(i64::from(micro))),
                    ("releaselevel", Value::Str(release_level)),
                    ("serial", Value::Int(0)),
                ],
            },
        );
        let name = sys.interner.intern("prism");
        sys.set(
            "implementation",
            Value::StructSeq {
                type_name: "types.SimpleNamespace",
                fields: vec![("name", Value::Str(name))],
            },
        );
        for stream in ["stdin", "stdout", "stderr", "__stdin__", "__stdout__", "__stderr__"] {
            sys.set(stream, Value::None);
        }
        sys
    }

    fn set(&mut self, name: &str, value: Value) {
        self.attrs.insert(Arc::from(name), value);
    }

    fn set_str(&mut self, name: &str, value: &str) {
        let value = Value::Str(self.interner.intern(value));
        self.set(name, value);
    }

    fn set_opt_str(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => self.set_str(name, value),
            None => self.set(name, Value::None),
        }
    }

    fn str_list(&self, items: &[String]) -> Value {
        Value::List(
            items
                .iter()
                .map(|item| Value::Str(self.interner.intern(item)))
                .collect(),
        )
    }

    /// Publish the parts of `config` programs can observe.
    pub fn update_from_config(&mut self, config: &Config, preconfig: &PreConfig) {
        self.path = SysPaths::with_paths(&config.module_search_paths, &self.interner);
        self.argv = SysArgv::new(&config.argv, &self.interner);
        self.orig_argv = SysArgv::new(&config.orig_argv, &self.interner);

        self.set_opt_str("executable", config.executable.as_deref());
        self.set_opt_str("_base_executable", config.base_executable.as_deref());
        self.set_opt_str("prefix", config.prefix.as_deref());
        self.set_opt_str("base_prefix", config.base_prefix.as_deref());
        self.set_opt_str("exec_prefix", config.exec_prefix.as_deref());
        self.set_opt_str("base_exec_prefix", config.base_exec_prefix.as_deref());
        self.set_opt_str("platlibdir", config.platlibdir.as_deref());

        let warnoptions = self.str_list(&config.warnoptions);
        self.set("warnoptions", warnoptions);
        let xoptions = self.str_list(&config.xoptions);
        self.set("_xoptions", xoptions);

        self.set(
            "dont_write_bytecode",
            Value::Bool(config.write_bytecode == Some(false)),
        );
        self.set("flags", flags(config, preconfig));
    }

    /// Replace `sys.argv`.
    pub fn set_argv<S: AsRef<str>>(&mut self, args: &[S]) {
        self.argv = SysArgv::new(args, &self.interner);
    }

    /// Bind a standard stream, and its `__name__` twin.
    pub fn set_stream(&mut self, name: &str, value: Value) {
        self.set(&format!("__{name}__"), value.clone());
        self.set(name, value);
    }

    /// Get command-line arguments.
    #[inline]
    #[must_use]
    pub fn argv(&self) -> &SysArgv {
        &self.argv
    }

    /// Get the unprocessed command line.
    #[inline]
    #[must_use]
    pub fn orig_argv(&self) -> &SysArgv {
        &self.orig_argv
    }

    /// Get module search paths.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &SysPaths {
        &self.path
    }

    /// Get mutable module search paths.
    #[inline]
    pub fn path_mut(&mut self) -> &mut SysPaths {
        &mut self.path
    }

    /// The interner `sys` strings come from.
    #[inline]
    #[must_use]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }
}

fn flags(config: &Config, preconfig: &PreConfig) -> Value {
    let int = |v: u32| Value::Int(i64::from(v));
    let flag = |v: bool| Value::Int(i64::from(v));
    Value::StructSeq {
        type_name: "sys.flags",
        fields: vec![
            ("debug", int(config.parser_debug)),
            ("inspect", int(config.inspect.unwrap_or(0))),
            ("interactive", int(config.interactive.unwrap_or(0))),
            ("optimize", int(config.optimization_level)),
            ("dont_write_bytecode", flag(config.write_bytecode == Some(false))),
            ("no_user_site", flag(config.user_site_directory == Some(false))),
            ("no_site", flag(config.site_import == Some(false))),
            ("ignore_environment", flag(config.use_environment == Some(false))),
            ("verbose", int(config.verbose)),
            ("bytes_warning", int(config.bytes_warning)),
            ("quiet", int(config.quiet.unwrap_or(0))),
            (
                "hash_randomization",
                flag(config.use_hash_seed != Some(true) || config.hash_seed != 0),
            ),
            ("isolated", flag(config.isolated == Some(true))),
            ("utf8_mode", flag(preconfig.utf8_mode == Some(true))),
        ],
    }
}

impl Module for SysModule {
    fn name(&self) -> &str {
        "sys"
    }

    fn get_attr(&self, name: &str) -> ModuleResult {
        match name {
            "path" => Ok(self.path.to_value()),
            "argv" => Ok(self.argv.to_value()),
            "orig_argv" => Ok(self.orig_argv.to_value()),
            _ => self
                .attrs
                .get(name)
                .cloned()
                .ok_or_else(|| ModuleError::AttributeError {
                    module: "sys".to_owned(),
                    name: name.to_owned(),
                }),
        }
    }

    fn dir(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.attrs.keys().cloned().collect();
        names.extend(["argv", "orig_argv", "path"].map(Arc::<str>::from));
        names.sort();
        names
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sys() -> SysModule {
        SysModule::scaffold(Arc::new(StringInterner::new()))
    }

    // =========================================================================
    // Scaffold Tests
    // =========================================================================

    #[test]
    fn test_scaffold_constants() {
        let sys = sys();
        assert_eq!(sys.name(), "sys");
        assert_eq!(sys.get_attr("platform").unwrap().as_str(), Some(platform()));
        let version = sys.get_attr("version").unwrap();
        assert!(version.as_str().unwrap().starts_with(&python_version_full()));
        let info = sys.get_attr("version_info").unwrap();
        assert_eq!(info.field("major"), Some(&Value::Int(i64::from(PYTHON_VERSION.0))));
        assert_eq!(
            sys.get_attr("hexversion").unwrap().as_int().map(|v| v >> 24),
            Some(i64::from(PYTHON_VERSION.0))
        );
    }

    #[test]
    fn test_scaffold_has_no_configuration() {
        let sys = sys();
        assert!(sys.get_attr("stdout").unwrap().is_none());
        assert!(sys.path().is_empty());
        assert!(matches!(
            sys.get_attr("executable"),
            Err(ModuleError::AttributeError { .. })
        ));
    }

    // =========================================================================
    // Configuration Tests
    // =========================================================================

    #[test]
    fn test_update_from_config() {
        let mut sys = sys();
        let mut config = Config::python();
        config.argv = vec!["script.py".to_owned(), "-x".to_owned()];
        config.orig_argv = vec!["python3".to_owned(), "script.py".to_owned(), "-x".to_owned()];
        config.module_search_paths = vec!["/usr/lib/python312.zip".to_owned()];
        config.executable = Some("/usr/bin/python3".to_owned());
        config.prefix = Some("/usr".to_owned());
        config.warnoptions = vec!["error".to_owned()];
        config.write_bytecode = Some(false);
        config.isolated = Some(true);

        sys.update_from_config(&config, &PreConfig::python());

        assert_eq!(sys.argv().script(), Some("script.py"));
        assert_eq!(sys.orig_argv().len(), 3);
        assert_eq!(sys.path().get(0), Some("/usr/lib/python312.zip"));
        assert_eq!(sys.get_attr("executable").unwrap().as_str(), Some("/usr/bin/python3"));
        assert_eq!(sys.get_attr("prefix").unwrap().as_str(), Some("/usr"));
        assert!(sys.get_attr("exec_prefix").unwrap().is_none());
        assert_eq!(sys.get_attr("warnoptions").unwrap().as_list().map(<[_]>::len), Some(1));
        assert_eq!(sys.get_attr("dont_write_bytecode").unwrap(), Value::Bool(true));

        let flags = sys.get_attr("flags").unwrap();
        assert_eq!(flags.field("isolated"), Some(&Value::Int(1)));
        assert_eq!(flags.field("dont_write_bytecode"), Some(&Value::Int(1)));
        assert_eq!(flags.field("utf8_mode"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_set_argv_and_path_mut() {
        let mut sys = sys();
        sys.set_argv(&["-c"]);
        assert_eq!(sys.get_attr("argv").unwrap().as_list().map(<[_]>::len), Some(1));

        let entry = sys.interner().intern("");
        sys.path_mut().insert(0, entry);
        assert_eq!(sys.get_attr("path").unwrap().as_list().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_set_stream_binds_both_names() {
        let mut sys = sys();
        sys.set_stream("stdout", Value::Int(1));
        assert_eq!(sys.get_attr("stdout").unwrap(), Value::Int(1));
        assert_eq!(sys.get_attr("__stdout__").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_dir_includes_dynamic_attributes() {
        let dir = sys().dir();
        assert!(dir.iter().any(|n| n.as_ref() == "path"));
        assert!(dir.iter().any(|n| n.as_ref() == "version"));
    }
}
