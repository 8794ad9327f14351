//! Interpreter configuration.
//!
//! A [`Config`] starts from one of three sets of defaults and is completed by
//! [`Config::read`], which fills every field that is still unset from, in
//! order of priority:
//!
//! 1. fields set explicitly by the embedder before reading,
//! 2. the command line,
//! 3. `PYTHON*` environment variables,
//! 4. path configuration overrides and the path calculation,
//! 5. built-in defaults.
//!
//! A field that is already set is never overwritten. Tri-state settings use
//! `Option`: `None` means "not set yet".

use crate::cmdline::{HashPycsMode, parse_command_line, update_argv};
use crate::flags::GlobalFlags;
use crate::hash_seed::{HashSeed, parse_hash_seed};
use crate::host::Host;
use crate::pathconfig::{PathConfig, join::copy_absolute};
use crate::preconfig::{InitKind, PreCmdline, PreConfig};
use prism_core::osdefs::is_abs;
use prism_core::{Status, StatusResult};
use tracing::debug;

/// Name used when `argv[0]` is missing or empty.
pub const DEFAULT_PROGRAM_NAME: &str = "python3";

/// What the interpreter runs once initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTarget<'a> {
    /// `-c`: a command string.
    Command(&'a str),
    /// `-m`: a module name.
    Module(&'a str),
    /// A script path.
    File(&'a str),
    /// Standard input.
    Stdin,
}

/// Everything [`Config::read`] consults besides the configuration itself.
#[derive(Debug, Clone, Copy)]
pub struct ReadContext<'a> {
    /// Environment, filesystem and build constants.
    pub host: &'a Host,
    /// Pre-initialization settings of the runtime.
    pub preconfig: &'a PreConfig,
    /// Global flags, consulted by compat configurations.
    pub flags: &'a GlobalFlags,
    /// Path configuration overrides set through the embedding API.
    pub path_config: &'a PathConfig,
}

/// Interpreter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Defaults this configuration started from.
    pub init: InitKind,

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------
    /// Isolated mode (`-I`).
    pub isolated: Option<bool>,
    /// Honour `PYTHON*` environment variables (`-E` clears it).
    pub use_environment: Option<bool>,
    /// Hash with `hash_seed` instead of a random seed.
    pub use_hash_seed: Option<bool>,
    /// Fixed hash seed, meaningful when `use_hash_seed` is set.
    pub hash_seed: u32,
    /// Enter interactive mode after running the target (`-i`).
    pub inspect: Option<u32>,
    /// Interactive mode (`-i`).
    pub interactive: Option<u32>,
    /// No banner on interactive startup (`-q`).
    pub quiet: Option<u32>,
    /// Import tracing (`-v`).
    pub verbose: u32,
    /// Bytes/str comparison warnings (`-b`).
    pub bytes_warning: u32,
    /// Parser debug output (`-d`).
    pub parser_debug: u32,
    /// Optimization level (`-O`).
    pub optimization_level: u32,
    /// Write bytecode files on import (`-B` clears it).
    pub write_bytecode: Option<bool>,
    /// Add the user site directory to the search path (`-s` clears it).
    pub user_site_directory: Option<bool>,
    /// Import `site` at startup (`-S` clears it).
    pub site_import: Option<bool>,
    /// Buffered standard streams (`-u` clears it).
    pub buffered_stdio: Option<bool>,
    /// Parse `argv` as the interpreter command line.
    pub parse_argv: Option<bool>,
    /// Configure the process standard streams.
    pub configure_c_stdio: Option<bool>,
    /// Print path calculation warnings.
    pub pathconfig_warnings: Option<bool>,
    /// Initialize the import system and compute the path configuration.
    pub install_importlib: bool,
    /// Run main initialization after core initialization.
    pub init_main: bool,
    /// Skip the first source line (`-x`).
    pub skip_source_first_line: bool,
    /// `--check-hash-based-pycs`.
    pub check_hash_pycs_mode: HashPycsMode,

    // -------------------------------------------------------------------------
    // Option lists
    // -------------------------------------------------------------------------
    /// Warning filters (`PYTHONWARNINGS`, then `-W`).
    pub warnoptions: Vec<String>,
    /// Implementation options (`-X`).
    pub xoptions: Vec<String>,

    // -------------------------------------------------------------------------
    // Identity and paths
    // -------------------------------------------------------------------------
    /// Program name, usually `argv[0]`.
    pub program_name: Option<String>,
    /// Absolute path of the executable (`sys.executable`).
    pub executable: Option<String>,
    /// `sys._base_executable`.
    pub base_executable: Option<String>,
    /// `PYTHONHOME`.
    pub home: Option<String>,
    /// `PYTHONPATH`.
    pub pythonpath_env: Option<String>,
    /// Library directory name (`sys.platlibdir`).
    pub platlibdir: Option<String>,
    /// `sys.prefix`.
    pub prefix: Option<String>,
    /// `sys.base_prefix`.
    pub base_prefix: Option<String>,
    /// `sys.exec_prefix`.
    pub exec_prefix: Option<String>,
    /// `sys.base_exec_prefix`.
    pub base_exec_prefix: Option<String>,
    /// `sys.path`, meaningful when `module_search_paths_set`.
    pub module_search_paths: Vec<String>,
    /// `module_search_paths` has been set and must not be recomputed.
    pub module_search_paths_set: bool,

    // -------------------------------------------------------------------------
    // Run target and arguments
    // -------------------------------------------------------------------------
    /// `-c` command, with a trailing newline.
    pub run_command: Option<String>,
    /// `-m` module name.
    pub run_module: Option<String>,
    /// Script path.
    pub run_filename: Option<String>,
    /// Command line; `sys.argv` once read.
    pub argv: Vec<String>,
    /// The command line as originally given.
    pub orig_argv: Vec<String>,

    parsed: bool,
}

impl Config {
    /// Legacy embedding defaults: most flags are left unset and later read
    /// from the [`GlobalFlags`]. The command line is not parsed.
    #[must_use]
    pub fn compat() -> Self {
        Self {
            init: InitKind::Compat,
            isolated: None,
            use_environment: None,
            use_hash_seed: None,
            hash_seed: 0,
            inspect: None,
            interactive: None,
            quiet: None,
            verbose: 0,
            bytes_warning: 0,
            parser_debug: 0,
            optimization_level: 0,
            write_bytecode: None,
            user_site_directory: None,
            site_import: None,
            buffered_stdio: None,
            parse_argv: Some(false),
            configure_c_stdio: Some(false),
            pathconfig_warnings: None,
            install_importlib: true,
            init_main: true,
            skip_source_first_line: false,
            check_hash_pycs_mode: HashPycsMode::Default,
            warnoptions: Vec::new(),
            xoptions: Vec::new(),
            program_name: None,
            executable: None,
            base_executable: None,
            home: None,
            pythonpath_env: None,
            platlibdir: None,
            prefix: None,
            base_prefix: None,
            exec_prefix: None,
            base_exec_prefix: None,
            module_search_paths: Vec::new(),
            module_search_paths_set: false,
            run_command: None,
            run_module: None,
            run_filename: None,
            argv: Vec::new(),
            orig_argv: Vec::new(),
            parsed: false,
        }
    }

    fn with_defaults(init: InitKind) -> Self {
        Self {
            init,
            use_environment: Some(true),
            inspect: Some(0),
            interactive: Some(0),
            quiet: Some(0),
            buffered_stdio: Some(true),
            pathconfig_warnings: Some(true),
            ..Self::compat()
        }
    }

    /// Regular interpreter defaults: environment and command line honoured.
    #[must_use]
    pub fn python() -> Self {
        Self {
            configure_c_stdio: Some(true),
            parse_argv: Some(true),
            ..Self::with_defaults(InitKind::Python)
        }
    }

    /// Isolated defaults: no environment, random hash seed, silent path
    /// calculation, command line not parsed.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            isolated: Some(true),
            use_environment: Some(false),
            use_hash_seed: Some(false),
            pathconfig_warnings: Some(false),
            user_site_directory: Some(false),
            ..Self::with_defaults(InitKind::Isolated)
        }
    }

    /// Set the command line from decoded arguments.
    pub fn set_argv<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = args.into_iter().map(Into::into).collect();
        self.parsed = false;
    }

    /// Set the command line from raw arguments.
    pub fn set_bytes_argv(&mut self, args: &crate::argv::Argv) -> StatusResult {
        self.argv = args.decode()?;
        self.parsed = false;
        Ok(())
    }

    /// What to run once initialized.
    #[must_use]
    pub fn run_target(&self) -> RunTarget<'_> {
        if let Some(command) = &self.run_command {
            RunTarget::Command(command)
        } else if let Some(module) = &self.run_module {
            RunTarget::Module(module)
        } else if let Some(file) = &self.run_filename {
            RunTarget::File(file)
        } else {
            RunTarget::Stdin
        }
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Complete the configuration; see the module documentation.
    ///
    /// Reading twice is allowed: the command line is parsed only once.
    pub fn read(&mut self, ctx: ReadContext<'_>) -> StatusResult {
        if self.init == InitKind::Compat {
            self.read_global_flags(ctx.flags);
        }

        if self.orig_argv.is_empty() && !(self.argv.len() == 1 && self.argv[0].is_empty()) {
            self.orig_argv = self.argv.clone();
        }

        self.read_precmdline(ctx.preconfig)?;
        self.read_cmdline(ctx)?;
        self.read_inputs(ctx)?;
        self.parsed = true;
        self.check_consistency()
    }

    fn read_global_flags(&mut self, flags: &GlobalFlags) {
        self.use_environment.get_or_insert(!flags.ignore_environment);
        self.inspect.get_or_insert(flags.inspect);
        self.interactive.get_or_insert(flags.interactive);
        self.quiet.get_or_insert(flags.quiet);
        self.pathconfig_warnings.get_or_insert(!flags.frozen);
        self.buffered_stdio.get_or_insert(!flags.unbuffered_stdio);
    }

    fn read_precmdline(&mut self, preconfig: &PreConfig) -> StatusResult {
        let cmdline = if self.parse_argv != Some(false) && !self.parsed {
            PreCmdline::parse(&self.argv)?
        } else {
            PreCmdline::default()
        };

        let mut use_environment = self.use_environment.unwrap_or(preconfig.use_environment);
        let mut isolated = self.isolated.unwrap_or(preconfig.isolated);
        if cmdline.ignore_environment {
            use_environment = false;
        }
        if cmdline.isolated {
            isolated = true;
        }
        if isolated {
            use_environment = false;
            self.user_site_directory = Some(false);
        }
        self.use_environment = Some(use_environment);
        self.isolated = Some(isolated);
        self.xoptions.extend(cmdline.xoptions);
        Ok(())
    }

    fn read_cmdline(&mut self, ctx: ReadContext<'_>) -> StatusResult {
        let parse_argv = *self.parse_argv.get_or_insert(true);

        if self.program_name.is_none() {
            self.program_name = Some(self.default_program_name(ctx.path_config));
        }

        if parse_argv && !self.parsed {
            let opt_index = parse_command_line(self)?;
            self.make_run_filename_absolute(ctx);
            update_argv(self, opt_index);
        } else {
            self.make_run_filename_absolute(ctx);
        }
        Ok(())
    }

    fn default_program_name(&self, path_config: &PathConfig) -> String {
        if let Some(name) = path_config.program_name_override() {
            return name.to_owned();
        }
        match self.argv.first() {
            Some(arg0) if !arg0.is_empty() => arg0.clone(),
            _ => DEFAULT_PROGRAM_NAME.to_owned(),
        }
    }

    fn make_run_filename_absolute(&mut self, ctx: ReadContext<'_>) {
        let Some(filename) = self.run_filename.as_deref() else {
            return;
        };
        if is_abs(filename) {
            return;
        }
        if let Ok(absolute) = copy_absolute(filename, ctx.host.fs.as_ref()) {
            self.run_filename = Some(absolute);
        }
    }

    fn read_inputs(&mut self, ctx: ReadContext<'_>) -> StatusResult {
        let host = ctx.host;
        if self.use_environment == Some(true) {
            self.read_env_vars(host)?;
        }

        if self.home.is_none() {
            self.home = match ctx.path_config.home_override() {
                Some(home) => Some(home.to_owned()),
                None if self.use_environment == Some(true) => host.env.get("PYTHONHOME")?,
                None => None,
            };
        }

        if self.executable.is_none() {
            self.executable = ctx.path_config.program_full_path_override().map(str::to_owned);
        }

        if self.platlibdir.is_none() {
            self.platlibdir = Some(host.build.platlibdir.clone());
        }

        if self.install_importlib {
            crate::pathconfig::init_path_config(self, ctx)?;
        }

        if self.use_hash_seed.is_none() {
            self.use_hash_seed = Some(false);
            self.hash_seed = 0;
        }
        if self.argv.is_empty() {
            self.argv.push(String::new());
        }
        self.configure_c_stdio.get_or_insert(true);
        self.write_bytecode.get_or_insert(true);
        self.user_site_directory.get_or_insert(true);
        self.site_import.get_or_insert(true);

        debug!(
            program_name = ?self.program_name,
            executable = ?self.executable,
            prefix = ?self.prefix,
            exec_prefix = ?self.exec_prefix,
            "configuration read"
        );
        Ok(())
    }

    fn read_env_vars(&mut self, host: &Host) -> StatusResult {
        let env = &host.env;

        env.raise_flag(self.inspect.get_or_insert(0), "PYTHONINSPECT");
        env.raise_flag(&mut self.verbose, "PYTHONVERBOSE");
        env.raise_flag(&mut self.optimization_level, "PYTHONOPTIMIZE");
        env.raise_flag(&mut self.parser_debug, "PYTHONDEBUG");

        if env.get_flag("PYTHONUNBUFFERED").is_some_and(|v| v > 0) {
            self.buffered_stdio = Some(false);
        }
        if env.get_flag("PYTHONDONTWRITEBYTECODE").is_some_and(|v| v > 0) {
            self.write_bytecode = Some(false);
        }
        if env.get_flag("PYTHONNOUSERSITE").is_some_and(|v| v > 0) {
            self.user_site_directory = Some(false);
        }

        if self.pythonpath_env.is_none() {
            self.pythonpath_env = env.get("PYTHONPATH")?;
        }
        if self.platlibdir.is_none() {
            self.platlibdir = env.get("PYTHONPLATLIBDIR")?;
        }

        if self.use_hash_seed.is_none() {
            let seed = match env.get("PYTHONHASHSEED")? {
                Some(text) => parse_hash_seed(&text)?,
                None => HashSeed::Random,
            };
            let (use_hash_seed, hash_seed) = seed.as_config();
            self.use_hash_seed = Some(use_hash_seed);
            self.hash_seed = hash_seed;
        }

        if !self.parsed {
            if let Some(warnings) = env.get("PYTHONWARNINGS")? {
                let from_env = warnings
                    .split(',')
                    .filter(|w| !w.is_empty())
                    .map(str::to_owned);
                self.warnoptions.splice(0..0, from_env);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check that every field later phases rely on is set.
    ///
    /// A failure means the reading logic is broken, not that the user
    /// supplied bad input.
    pub fn check_consistency(&self) -> StatusResult {
        let missing = |field: &str| {
            Err(Status::error(
                "config_check_consistency",
                format!("configuration field {field} is not set"),
            ))
        };

        let required = [
            ("use_environment", self.use_environment.is_some()),
            ("use_hash_seed", self.use_hash_seed.is_some()),
            ("inspect", self.inspect.is_some()),
            ("interactive", self.interactive.is_some()),
            ("quiet", self.quiet.is_some()),
            ("parse_argv", self.parse_argv.is_some()),
            ("configure_c_stdio", self.configure_c_stdio.is_some()),
            ("buffered_stdio", self.buffered_stdio.is_some()),
            ("pathconfig_warnings", self.pathconfig_warnings.is_some()),
            ("program_name", self.program_name.is_some()),
            ("argv", !self.argv.is_empty()),
            ("platlibdir", self.platlibdir.is_some()),
        ];
        for (field, present) in required {
            if !present {
                return missing(field);
            }
        }

        if self.install_importlib {
            let paths = [
                ("module_search_paths", self.module_search_paths_set),
                ("executable", self.executable.is_some()),
                ("base_executable", self.base_executable.is_some()),
                ("prefix", self.prefix.is_some()),
                ("base_prefix", self.base_prefix.is_some()),
                ("exec_prefix", self.exec_prefix.is_some()),
                ("base_exec_prefix", self.base_exec_prefix.is_some()),
            ];
            for (field, present) in paths {
                if !present {
                    return missing(field);
                }
            }
        }

        if self.run_command.is_some() && self.run_module.is_some() {
            return Err(Status::validation(
                "config_check_consistency",
                "run_command and run_module are mutually exclusive",
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Global Flags
    // =========================================================================

    /// Mirror the configuration into the global flags.
    pub fn write_global_flags(&self, flags: &mut GlobalFlags) {
        if let Some(use_environment) = self.use_environment {
            flags.ignore_environment = !use_environment;
        }
        if let Some(isolated) = self.isolated {
            flags.isolated = isolated;
        }
        if let Some(inspect) = self.inspect {
            flags.inspect = inspect;
        }
        if let Some(interactive) = self.interactive {
            flags.interactive = interactive;
        }
        if let Some(quiet) = self.quiet {
            flags.quiet = quiet;
        }
        if let Some(warnings) = self.pathconfig_warnings {
            flags.frozen = !warnings;
        }
        if let Some(buffered) = self.buffered_stdio {
            flags.unbuffered_stdio = !buffered;
        }
        if let Some(write_bytecode) = self.write_bytecode {
            flags.dont_write_bytecode = !write_bytecode;
        }
        if let Some(user_site) = self.user_site_directory {
            flags.no_user_site_directory = !user_site;
        }
        if let Some(site_import) = self.site_import {
            flags.no_site = !site_import;
        }
        flags.verbose = self.verbose;
        flags.bytes_warning = self.bytes_warning;
        flags.debug = self.parser_debug;
        flags.optimize = self.optimization_level;
        flags.hash_randomization = self.use_hash_seed != Some(true) || self.hash_seed != 0;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::python()
    }
}
