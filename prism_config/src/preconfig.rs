//! Pre-initialization configuration.
//!
//! The handful of settings that must be fixed before anything else runs:
//! the memory allocator strategy and the text encoding policy. They are read
//! from a first, silent pass over the command line (`-E`, `-I`, `-X`) and
//! from `PYTHONMALLOC` / `PYTHONUTF8`.

use crate::config::Config;
use crate::env::Environment;
use crate::getopt::{GetOpt, Opt};
use prism_core::{Status, StatusResult};
use std::fmt;

/// Which defaults a configuration starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitKind {
    /// Legacy embedding defaults: unset fields come from the global flags.
    #[default]
    Compat,
    /// Regular interpreter defaults.
    Python,
    /// Ignore the environment and the command line.
    Isolated,
}

// =============================================================================
// Allocator
// =============================================================================

/// Memory allocator strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Allocator {
    /// Keep whatever is installed.
    #[default]
    NotSet,
    /// Build default allocators.
    Default,
    /// Default allocators with debug hooks.
    Debug,
    /// System `malloc` for every domain.
    Malloc,
    /// System `malloc` with debug hooks.
    MallocDebug,
    /// Small-object allocator.
    PyMalloc,
    /// Small-object allocator with debug hooks.
    PyMallocDebug,
}

impl Allocator {
    /// Parse an allocator name as accepted by `PYTHONMALLOC`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "default" => Self::Default,
            "debug" => Self::Debug,
            "malloc" => Self::Malloc,
            "malloc_debug" => Self::MallocDebug,
            "pymalloc" => Self::PyMalloc,
            "pymalloc_debug" => Self::PyMallocDebug,
            _ => return None,
        })
    }

    /// Name of the allocator, or `None` when not set.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::NotSet => return None,
            Self::Default => "default",
            Self::Debug => "debug",
            Self::Malloc => "malloc",
            Self::MallocDebug => "malloc_debug",
            Self::PyMalloc => "pymalloc",
            Self::PyMallocDebug => "pymalloc_debug",
        })
    }
}

impl fmt::Display for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("not set"))
    }
}

// =============================================================================
// PreCmdline
// =============================================================================

/// Options picked up by the silent pre-scan of the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreCmdline {
    /// `-E` was given.
    pub ignore_environment: bool,
    /// `-I` was given.
    pub isolated: bool,
    /// Every `-X` option, in order.
    pub xoptions: Vec<String>,
    /// UTF-8 mode requested with `-X utf8[=0|1]`.
    pub utf8_mode: Option<bool>,
}

impl PreCmdline {
    /// Pre-scan `args`, stopping at `-c`, `-m` or the end of the options.
    ///
    /// Scanning errors are left for the full command line parse to report.
    pub fn parse(args: &[String]) -> StatusResult<Self> {
        let mut cmdline = Self::default();
        let mut getopt = GetOpt::new(args).quiet();
        while let Some(opt) = getopt.next_opt() {
            match opt {
                Opt::WithArg('c' | 'm', _) => break,
                Opt::Flag('E') => cmdline.ignore_environment = true,
                Opt::Flag('I') => cmdline.isolated = true,
                Opt::WithArg('X', option) => {
                    if let Some(mode) = parse_utf8_xoption(&option)? {
                        cmdline.utf8_mode = Some(mode);
                    }
                    cmdline.xoptions.push(option);
                }
                _ => {}
            }
        }
        Ok(cmdline)
    }
}

fn parse_utf8_xoption(option: &str) -> StatusResult<Option<bool>> {
    match option {
        "utf8" | "utf8=1" => Ok(Some(true)),
        "utf8=0" => Ok(Some(false)),
        _ if option.starts_with("utf8=") => Err(Status::validation(
            "precmdline_parse_cmdline",
            "invalid -X utf8 option value",
        )),
        _ => Ok(None),
    }
}

// =============================================================================
// PreConfig
// =============================================================================

/// Pre-initialization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreConfig {
    /// Defaults this configuration started from.
    pub init: InitKind,
    /// Pre-scan the command line.
    pub parse_argv: bool,
    /// Isolated mode.
    pub isolated: bool,
    /// Honour `PYTHON*` environment variables.
    pub use_environment: bool,
    /// UTF-8 mode; `None` until read.
    pub utf8_mode: Option<bool>,
    /// Memory allocator strategy.
    pub allocator: Allocator,
}

impl PreConfig {
    /// Legacy embedding defaults.
    #[must_use]
    pub fn compat() -> Self {
        Self {
            init: InitKind::Compat,
            parse_argv: false,
            isolated: false,
            use_environment: true,
            utf8_mode: None,
            allocator: Allocator::NotSet,
        }
    }

    /// Regular interpreter defaults.
    #[must_use]
    pub fn python() -> Self {
        Self {
            init: InitKind::Python,
            parse_argv: true,
            ..Self::compat()
        }
    }

    /// Isolated defaults: no environment, no command line.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            init: InitKind::Isolated,
            parse_argv: false,
            isolated: true,
            use_environment: false,
            utf8_mode: Some(false),
            allocator: Allocator::NotSet,
        }
    }

    /// Pre-configuration implied by a full configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut preconfig = match config.init {
            InitKind::Compat => Self::compat(),
            InitKind::Python => Self::python(),
            InitKind::Isolated => Self::isolated(),
        };
        if let Some(parse_argv) = config.parse_argv {
            preconfig.parse_argv = parse_argv;
        }
        if let Some(isolated) = config.isolated {
            preconfig.isolated = isolated;
        }
        if let Some(use_environment) = config.use_environment {
            preconfig.use_environment = use_environment;
        }
        preconfig
    }

    /// Read the command line pre-scan and the environment.
    pub fn read(&mut self, args: Option<&[String]>, env: &Environment) -> StatusResult {
        let cmdline = match args {
            Some(args) if self.parse_argv => PreCmdline::parse(args)?,
            _ => PreCmdline::default(),
        };

        if cmdline.ignore_environment {
            self.use_environment = false;
        }
        if cmdline.isolated {
            self.isolated = true;
            self.use_environment = false;
        }

        if self.utf8_mode.is_none() {
            self.utf8_mode = match cmdline.utf8_mode {
                Some(mode) => Some(mode),
                None => self.utf8_mode_from_env(env)?,
            };
        }
        self.utf8_mode.get_or_insert(false);

        if self.allocator == Allocator::NotSet && self.use_environment {
            if let Some(name) = env.get("PYTHONMALLOC")? {
                self.allocator = Allocator::parse(&name).ok_or_else(|| {
                    Status::error("preconfig_init_allocator", "PYTHONMALLOC: unknown allocator")
                })?;
            }
        }
        Ok(())
    }

    fn utf8_mode_from_env(&self, env: &Environment) -> StatusResult<Option<bool>> {
        if !self.use_environment {
            return Ok(None);
        }
        match env.get("PYTHONUTF8")?.as_deref() {
            None => Ok(None),
            Some("1") => Ok(Some(true)),
            Some("0") => Ok(Some(false)),
            Some(_) => Err(Status::validation(
                "preconfig_init_utf8_mode",
                "invalid PYTHONUTF8 environment variable value",
            )),
        }
    }
}

impl Default for PreConfig {
    fn default() -> Self {
        Self::python()
    }
}
