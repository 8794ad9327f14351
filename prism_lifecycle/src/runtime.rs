//! The bootstrap state machine.
//!
//! A [`Runtime`] walks through the [`Phase`]s in order:
//!
//! 1. **Pre-initialization** fixes the allocator and the text encoding
//!    policy. It is idempotent and runs implicitly when needed.
//! 2. **Core initialization** builds the interpreter, the foundational
//!    types, `sys` and `builtins`, and publishes the path configuration.
//!    Nothing here touches the filesystem beyond path calculation.
//! 3. **Main initialization** publishes the configuration in `sys`, binds
//!    the standard streams, installs `builtins.open` and creates
//!    `__main__`.
//!
//! [`Runtime::finalize`] undoes all of it in reverse order and returns the
//! runtime to [`Phase::Unstarted`], ready to start again.

use crate::builtins::{create_builtins, default_open};
use crate::exit::{ExitCallbacks, Workers};
use crate::fatal::{self, runtime_state};
use crate::interp::Interpreter;
use crate::modules::sys::SysModule;
use crate::modules::{Module, NamespaceModule, Value};
use crate::phase::Phase;
use crate::streams::{OsStdio, StandardStreams, StdioBackend};
use crate::types::{CoreTypeHooks, NoTypeHooks, TypeRegistry};
use prism_config::{Config, GlobalFlags, Host, PathConfig, PreConfig, ReadContext};
use prism_core::{Status, StatusResult, StringInterner};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, info, warn};

/// A language runtime and the state it owns.
pub struct Runtime {
    host: Host,
    phase: Phase,
    flags: GlobalFlags,
    preconfig: PreConfig,
    path_config: PathConfig,
    types: TypeRegistry,
    type_hooks: Box<dyn CoreTypeHooks>,
    interp: Option<Interpreter>,
    interner: Arc<StringInterner>,
    finalizing: Option<ThreadId>,
    exit_callbacks: ExitCallbacks,
    workers: Workers,
    stdio: Arc<dyn StdioBackend>,
}

impl Runtime {
    /// A runtime for the running process.
    #[must_use]
    pub fn new() -> Self {
        Self::with_host(Host::process())
    }

    /// A runtime reading configuration from `host`.
    #[must_use]
    pub fn with_host(host: Host) -> Self {
        Self {
            host,
            phase: Phase::Unstarted,
            flags: GlobalFlags::default(),
            preconfig: PreConfig::python(),
            path_config: PathConfig::new(),
            types: TypeRegistry::new(),
            type_hooks: Box::new(NoTypeHooks),
            interp: None,
            interner: Arc::new(StringInterner::new()),
            finalizing: None,
            exit_callbacks: ExitCallbacks::new(),
            workers: Workers::new(),
            stdio: Arc::new(OsStdio),
        }
    }

    /// Drive the object model through `hooks`.
    #[must_use]
    pub fn with_type_hooks(mut self, hooks: Box<dyn CoreTypeHooks>) -> Self {
        self.type_hooks = hooks;
        self
    }

    /// Check standard descriptors through `stdio`.
    #[must_use]
    pub fn with_stdio(mut self, stdio: Arc<dyn StdioBackend>) -> Self {
        self.stdio = stdio;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if pre-initialization completed.
    #[inline]
    #[must_use]
    pub fn is_preinitialized(&self) -> bool {
        self.phase.is_preinitialized()
    }

    /// Check if core initialization completed.
    #[inline]
    #[must_use]
    pub fn is_core_initialized(&self) -> bool {
        self.phase.is_core_initialized()
    }

    /// Check if the runtime is fully initialized.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.phase == Phase::Initialized
    }

    /// Check if teardown is in progress.
    #[inline]
    #[must_use]
    pub fn is_finalizing(&self) -> bool {
        self.finalizing.is_some()
    }

    /// The host configuration is read from.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Global flag mirror.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &GlobalFlags {
        &self.flags
    }

    /// Global flag mirror, for compat configurations.
    #[inline]
    pub fn flags_mut(&mut self) -> &mut GlobalFlags {
        &mut self.flags
    }

    /// Pre-initialization settings in effect.
    #[inline]
    #[must_use]
    pub fn preconfig(&self) -> &PreConfig {
        &self.preconfig
    }

    /// Path configuration cache.
    #[inline]
    #[must_use]
    pub fn path_config(&self) -> &PathConfig {
        &self.path_config
    }

    /// Path configuration cache, for the embedding setters and getters.
    #[inline]
    pub fn path_config_mut(&mut self) -> &mut PathConfig {
        &mut self.path_config
    }

    /// The main interpreter, from core initialization until finalization.
    #[inline]
    #[must_use]
    pub fn interpreter(&self) -> Option<&Interpreter> {
        self.interp.as_ref()
    }

    /// The main interpreter, mutably.
    #[inline]
    pub fn interpreter_mut(&mut self) -> Option<&mut Interpreter> {
        self.interp.as_mut()
    }

    /// Foundational types currently live.
    #[inline]
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Backend used to check standard descriptors.
    #[inline]
    #[must_use]
    pub fn stdio(&self) -> &dyn StdioBackend {
        self.stdio.as_ref()
    }

    /// Shared string interner.
    #[inline]
    #[must_use]
    pub fn interner(&self) -> &Arc<StringInterner> {
        &self.interner
    }

    /// Text for the `Python runtime state:` line of fatal errors.
    #[must_use]
    pub fn state_description(&self) -> String {
        runtime_state(self.phase, self.finalizing)
    }

    /// Report an unrecoverable error and abort.
    pub fn fatal_error(&self, origin: &str, message: &str) -> ! {
        fatal::fatal_error(Some(origin), message, &self.state_description())
    }

    fn interp_mut(&mut self, origin: &'static str) -> StatusResult<&mut Interpreter> {
        self.interp
            .as_mut()
            .ok_or_else(|| Status::error(origin, "no main interpreter"))
    }

    // =========================================================================
    // Pre-initialization
    // =========================================================================

    /// Fix the allocator and text encoding policy.
    ///
    /// Does nothing once pre-initialized. `args` is pre-scanned for `-E`,
    /// `-I` and `-X utf8` when `preconfig.parse_argv` is set.
    pub fn preinitialize(&mut self, preconfig: &PreConfig, args: Option<&[String]>) -> StatusResult {
        if self.is_preinitialized() {
            return Ok(());
        }
        self.phase = Phase::Preinitializing;

        let mut preconfig = preconfig.clone();
        preconfig.read(args, &self.host.env)?;

        self.flags.utf8_mode = preconfig.utf8_mode == Some(true);
        self.flags.isolated = preconfig.isolated;
        self.flags.ignore_environment = !preconfig.use_environment;
        debug!(
            allocator = ?preconfig.allocator.name(),
            utf8_mode = self.flags.utf8_mode,
            "runtime preinitialized"
        );

        self.preconfig = preconfig;
        self.phase = Phase::Preinitialized;
        Ok(())
    }

    /// Pre-initialize with the settings implied by `config`.
    pub fn preinitialize_from_config(&mut self, config: &Config, args: Option<&[String]>) -> StatusResult {
        if self.is_preinitialized() {
            return Ok(());
        }
        let preconfig = PreConfig::from_config(config);
        let args = if config.parse_argv == Some(false) { None } else { args };
        self.preinitialize(&preconfig, args)
    }

    /// Complete `config` against this runtime's host and caches.
    pub fn read_config(&self, config: &mut Config) -> StatusResult {
        config.read(ReadContext {
            host: &self.host,
            preconfig: &self.preconfig,
            flags: &self.flags,
            path_config: &self.path_config,
        })
    }

    // =========================================================================
    // Core Initialization
    // =========================================================================

    /// Bring the runtime up to [`Phase::CoreInitialized`].
    ///
    /// Fails if the core is already initialized; see
    /// [`reconfigure_core`](Self::reconfigure_core).
    pub fn initialize_core(&mut self, config: &Config) -> StatusResult {
        let args = config.argv.clone();
        self.preinitialize_from_config(config, Some(&args))?;

        let mut config = config.clone();
        self.read_config(&mut config)?;

        if self.is_core_initialized() {
            return Err(Status::error(
                "pycore_init_runtime",
                "main interpreter already initialized",
            ));
        }

        // 1. global flags
        config.write_global_flags(&mut self.flags);
        // 2. no thread is finalizing a fresh runtime
        self.finalizing = None;
        // 3. interpreter and thread state
        let mut interp = Interpreter::new(config);
        // 4. foundational types, in dependency order
        self.types.init_all(self.type_hooks.as_mut())?;
        // 5. sys
        interp
            .modules
            .insert(Box::new(SysModule::scaffold(Arc::clone(&self.interner))));
        // 6. builtins
        let debug = interp.config.optimization_level == 0;
        interp.modules.insert(Box::new(create_builtins(debug)));
        // 7. path configuration
        if interp.config.install_importlib {
            self.path_config.publish_from_config(&interp.config);
        }
        self.interp = Some(interp);
        // 8. done
        self.phase = Phase::CoreInitialized;
        info!(phase = %self.phase, "runtime core initialized");
        Ok(())
    }

    /// Replace the configuration of a core-initialized runtime.
    pub fn reconfigure_core(&mut self, config: &Config) -> StatusResult {
        if !self.is_core_initialized() {
            return Err(Status::error(
                "pyinit_core_reconfigure",
                "runtime core not initialized",
            ));
        }
        let mut config = config.clone();
        self.read_config(&mut config)?;
        config.write_global_flags(&mut self.flags);
        if config.install_importlib {
            self.path_config.publish_from_config(&config);
        }
        self.interp_mut("pyinit_core_reconfigure")?.config = config;
        debug!("runtime core reconfigured");
        Ok(())
    }

    // =========================================================================
    // Main Initialization
    // =========================================================================

    /// Bring a core-initialized runtime up to [`Phase::Initialized`].
    ///
    /// On an initialized runtime only `sys.argv` is refreshed.
    pub fn initialize_main(&mut self) -> StatusResult {
        if !self.is_core_initialized() {
            return Err(Status::error("pyinit_main", "runtime core not initialized"));
        }
        if self.is_initialized() {
            return self.reconfigure_main();
        }

        let preconfig = self.preconfig.clone();
        let stdio = Arc::clone(&self.stdio);
        let interner = Arc::clone(&self.interner);
        let interp = self.interp_mut("init_interp_main")?;

        if !interp.config.install_importlib {
            self.phase = Phase::Initialized;
            return Ok(());
        }

        interp
            .modules
            .get_as_mut::<SysModule>("sys")
            .ok_or_else(|| Status::error("init_interp_main", "can't finish initializing sys"))?
            .update_from_config(&interp.config, &preconfig);

        init_sys_streams(interp, stdio.as_ref(), &interner)?;
        init_set_builtins_open(interp)?;
        add_main_module(interp)?;
        if !interp.config.warnoptions.is_empty() {
            init_warnings(interp, &interner);
        }
        if interp.config.site_import == Some(true) {
            debug!("site import is left to the import system");
        }

        self.phase = Phase::Initialized;
        info!(phase = %self.phase, "runtime initialized");
        Ok(())
    }

    fn reconfigure_main(&mut self) -> StatusResult {
        let interp = self.interp_mut("pyinit_main_reconfigure")?;
        let argv = interp.config.argv.clone();
        interp
            .sys_mut()
            .ok_or_else(|| Status::error("pyinit_main_reconfigure", "fail to reconfigure Python"))?
            .set_argv(&argv);
        Ok(())
    }

    /// Core and, if `config.init_main` is set, main initialization.
    ///
    /// A core-initialized runtime is reconfigured instead.
    pub fn initialize_from_config(&mut self, config: &Config) -> StatusResult {
        if self.is_core_initialized() {
            self.reconfigure_core(config)?;
        } else {
            self.initialize_core(config)?;
        }
        let init_main = self
            .interp
            .as_ref()
            .is_some_and(|interp| interp.config.init_main);
        if init_main {
            self.initialize_main()?;
        }
        Ok(())
    }

    /// Initialize with the legacy embedding defaults.
    ///
    /// Does nothing if the runtime is already initialized.
    pub fn initialize(&mut self) -> StatusResult {
        if self.is_initialized() {
            return Ok(());
        }
        self.initialize_from_config(&Config::compat())
    }

    // =========================================================================
    // Finalization
    // =========================================================================

    /// Tear the runtime down.
    ///
    /// Does nothing unless the runtime is initialized. Teardown always runs
    /// to completion; a failure to flush the standard streams is reported
    /// afterwards.
    pub fn finalize(&mut self) -> StatusResult {
        if !self.is_initialized() {
            return Ok(());
        }

        self.workers.join_all();
        self.exit_callbacks.run_high();

        self.finalizing = Some(thread::current().id());
        self.phase = Phase::Finalizing;

        let mut status = Ok(());
        let stdio = Arc::clone(&self.stdio);
        if let Some(mut interp) = self.interp.take() {
            if interp.streams.flush(stdio.as_ref()).is_err() {
                status = Err(Status::error("finalize", "failed to flush standard streams"));
            }

            let torn_down = interp.modules.clear();
            debug!(modules = torn_down.len(), "modules torn down");

            if interp.streams.flush(stdio.as_ref()).is_err() && status.is_ok() {
                status = Err(Status::error("finalize", "failed to flush standard streams"));
            }
            interp.streams.close();
        }

        self.interner.clear();
        self.path_config.reset_computed();
        self.types.fini_all(self.type_hooks.as_mut());
        self.exit_callbacks.run_low();

        self.finalizing = None;
        self.flags = GlobalFlags::default();
        self.preconfig = PreConfig::python();
        self.phase = Phase::Unstarted;
        info!("runtime finalized");

        if let Err(err) = &status {
            warn!(error = %err, "finalization completed with errors");
        }
        status
    }

    /// Finalize and return the process exit code: `code`, or 120 if
    /// finalization failed.
    #[must_use]
    pub fn exit(&mut self, code: i32) -> i32 {
        match self.finalize() {
            Ok(()) => code,
            Err(_) => 120,
        }
    }

    // =========================================================================
    // Exit Hooks
    // =========================================================================

    /// Run `callback` at the start of finalization.
    pub fn at_exit(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.exit_callbacks.at_exit(Box::new(callback));
    }

    /// Run `callback` at the very end of finalization.
    pub fn register_exit_callback(&mut self, callback: impl FnOnce() + Send + 'static) -> StatusResult {
        self.exit_callbacks.register(Box::new(callback))
    }

    /// Join `handle` when the runtime finalizes.
    pub fn register_worker(&mut self, name: impl Into<String>, handle: JoinHandle<()>) {
        self.workers.register(name, handle);
    }

    /// Flag raised when workers must stop.
    #[must_use]
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        self.workers.shutdown_signal()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("phase", &self.phase)
            .field("interp", &self.interp)
            .field("types", &self.types)
            .field("exit_callbacks", &self.exit_callbacks)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.workers.join_all();
    }
}

// =============================================================================
// Main Initialization Steps
// =============================================================================

fn init_sys_streams(
    interp: &mut Interpreter,
    stdio: &dyn StdioBackend,
    interner: &StringInterner,
) -> StatusResult {
    let streams = StandardStreams::open(stdio, &interp.config)?;
    let sys = interp
        .sys_mut()
        .ok_or_else(|| Status::error("init_sys_streams", "can't initialize sys standard streams"))?;
    for (name, stream) in streams.iter() {
        let value = stream.map_or(Value::None, |stream| stream.to_value(interner));
        sys.set_stream(name, value);
    }
    interp.streams = streams;
    Ok(())
}

fn init_set_builtins_open(interp: &mut Interpreter) -> StatusResult {
    let builtins = interp
        .modules
        .get_as_mut::<NamespaceModule>("builtins")
        .ok_or_else(|| Status::error("init_set_builtins_open", "can't initialize io.open"))?;
    builtins.set_attr("open", Value::Builtin("open"));
    interp.open_hook = Some(default_open);
    Ok(())
}

fn add_main_module(interp: &mut Interpreter) -> StatusResult {
    if !interp.modules.contains("builtins") {
        return Err(Status::error("add_main_module", "can't create __main__ module"));
    }
    if interp.modules.contains("__main__") {
        return Ok(());
    }
    let mut main = NamespaceModule::new("__main__");
    main.set_attr("__builtins__", Value::Module(Arc::from("builtins")));
    interp.modules.insert(Box::new(main));
    Ok(())
}

fn init_warnings(interp: &mut Interpreter, interner: &StringInterner) {
    let filters = interp
        .config
        .warnoptions
        .iter()
        .map(|option| Value::Str(interner.intern(option)))
        .collect();
    let mut warnings = NamespaceModule::new("warnings");
    warnings.set_attr("filters", Value::List(filters));
    debug!(module = warnings.name(), "warnings loaded eagerly");
    interp.modules.insert(Box::new(warnings));
}
