//! The interpreter's `main`.
//!
//! [`run_main`] initializes a runtime from the command line, prepends the
//! run target's directory to `sys.path`, hands the target to a [`Runner`],
//! optionally drops into interactive mode, and finalizes.
//!
//! Code evaluation is not part of the bootstrap: a [`Runner`] supplies it.

use crate::builtins::default_open;
use crate::fatal::exit_status_exception;
use crate::modules::sys::platform;
use crate::runtime::Runtime;
use crate::streams::{STDERR_FILENO, STDIN_FILENO};
use prism_config::{Argv, Config, Host, PreConfig, RunTarget, compute_sys_path0};
use prism_core::osdefs::SEP;
use prism_core::{Status, StatusResult, VERSION, python_version_full};
use std::fs::File;
use std::io;
use tracing::{debug, info};

/// Exit code when finalization fails.
pub const FINALIZE_FAILED_EXIT: i32 = 120;

const COPYRIGHT: &str =
    "Type \"help\", \"copyright\", \"credits\" or \"license\" for more information.";

/// Evaluates run targets on an initialized runtime.
///
/// Each method returns the process exit code.
pub trait Runner {
    /// `-c command`.
    fn run_command(&mut self, runtime: &mut Runtime, command: &str) -> i32;

    /// `-m module`, or `__main__` of a directory given as the script.
    /// `set_argv0` asks for `sys.argv[0]` to become the module's path.
    fn run_module(&mut self, runtime: &mut Runtime, module: &str, set_argv0: bool) -> i32;

    /// A script, already opened.
    fn run_file(&mut self, runtime: &mut Runtime, path: &str, file: File) -> i32;

    /// Standard input, interactively if it is a terminal.
    fn run_stdin(&mut self, runtime: &mut Runtime) -> i32;
}

/// Run the interpreter for `args` on a fresh runtime for `host`.
pub fn run_main(args: &Argv, host: Host, runner: &mut dyn Runner) -> i32 {
    let mut runtime = Runtime::with_host(host);
    run_main_with(&mut runtime, args, runner)
}

/// Run the interpreter for `args` on `runtime`.
pub fn run_main_with(runtime: &mut Runtime, args: &Argv, runner: &mut dyn Runner) -> i32 {
    match pymain_init(runtime, args) {
        Ok(()) => run_initialized(runtime, runner),
        Err(Status::Exit { code }) => {
            free(runtime);
            code
        }
        Err(status) => exit_status_exception(&status, &runtime.state_description()),
    }
}

/// Run the configured target on an initialized runtime, then finalize.
pub fn run_initialized(runtime: &mut Runtime, runner: &mut dyn Runner) -> i32 {
    let mut exitcode = run_python(runtime, runner);
    if runtime.finalize().is_err() {
        exitcode = FINALIZE_FAILED_EXIT;
    }
    free(runtime);
    info!(exitcode, "interpreter exited");
    exitcode
}

fn pymain_init(runtime: &mut Runtime, args: &Argv) -> StatusResult {
    let decoded = args.decode()?;
    runtime.preinitialize(&PreConfig::python(), Some(&decoded))?;

    let mut config = Config::python();
    config.set_bytes_argv(args)?;
    runtime.initialize_from_config(&config)
}

/// Release state that outlives finalization.
fn free(runtime: &mut Runtime) {
    runtime.path_config_mut().clear();
}

fn write_stderr(runtime: &Runtime, text: &str) {
    let _ = runtime.stdio().write(STDERR_FILENO, text.as_bytes());
}

fn stdin_is_interactive(runtime: &Runtime, config: &Config) -> bool {
    runtime.stdio().is_tty(STDIN_FILENO) || config.interactive.unwrap_or(0) > 0
}

fn run_code(config: &Config) -> bool {
    config.run_command.is_some() || config.run_module.is_some() || config.run_filename.is_some()
}

/// A directory holding `__main__.py` runs as a package.
fn main_importer_path(runtime: &Runtime, config: &Config) -> Option<String> {
    let filename = config.run_filename.as_deref()?;
    let fs = runtime.host().fs.as_ref();
    let main = format!("{}{SEP}__main__.py", filename.trim_end_matches(SEP));
    (fs.is_dir(filename) && fs.is_file(&main)).then(|| filename.to_owned())
}

fn run_python(runtime: &mut Runtime, runner: &mut dyn Runner) -> i32 {
    let Some(config) = runtime.interpreter().map(|interp| interp.config().clone()) else {
        write_stderr(runtime, "RuntimeError: no main interpreter\n");
        return 1;
    };

    let importer = main_importer_path(runtime, &config);
    let path0 = match &importer {
        Some(path) => Some(path.clone()),
        None => compute_sys_path0(&config.argv, runtime.host().fs.as_ref()),
    };
    if let Some(path0) = path0 {
        if let Err(message) = sys_path_add_path0(runtime, &path0) {
            write_stderr(runtime, &format!("RuntimeError: {message}\n"));
            return 1;
        }
    }

    header(runtime, &config);

    let mut exitcode = match (config.run_target(), &importer) {
        (RunTarget::Command(command), _) => runner.run_command(runtime, command),
        (RunTarget::Module(module), _) => runner.run_module(runtime, module, true),
        (RunTarget::File(_), Some(_)) => runner.run_module(runtime, "__main__", false),
        (RunTarget::File(path), None) => run_file(runtime, runner, &config, path),
        (RunTarget::Stdin, _) => run_stdin(runtime, runner, &config),
    };

    repl(runtime, runner, &config, &mut exitcode);
    exitcode
}

fn sys_path_add_path0(runtime: &mut Runtime, path0: &str) -> Result<(), &'static str> {
    let interner = runtime.interner().clone();
    let sys = runtime
        .interpreter_mut()
        .and_then(|interp| interp.sys_mut())
        .ok_or("unable to get sys.path")?;
    sys.path_mut().insert(0, interner.intern(path0));
    debug!(path0, "sys.path[0] set");
    Ok(())
}

fn header(runtime: &Runtime, config: &Config) {
    if config.quiet.unwrap_or(0) > 0 {
        return;
    }
    if run_code(config) || !stdin_is_interactive(runtime, config) {
        return;
    }
    write_stderr(
        runtime,
        &format!(
            "Python {} (prism {VERSION}) on {}\n{COPYRIGHT}\n",
            python_version_full(),
            platform()
        ),
    );
}

/// Text of an OS error without the `(os error N)` suffix.
fn strerror(err: &io::Error) -> String {
    let text = err.to_string();
    match text.rfind(" (os error") {
        Some(pos) => text[..pos].to_owned(),
        None => text,
    }
}

fn run_file(runtime: &mut Runtime, runner: &mut dyn Runner, config: &Config, path: &str) -> i32 {
    let program = config.program_name.as_deref().unwrap_or_default();
    let open = runtime
        .interpreter()
        .and_then(|interp| interp.open_hook())
        .unwrap_or(default_open);

    let file = match open(path, "rb") {
        Ok(file) => file,
        Err(err) => {
            write_stderr(
                runtime,
                &format!(
                    "{program}: can't open file '{path}': [Errno {}] {}\n",
                    err.raw_os_error().unwrap_or(0),
                    strerror(&err)
                ),
            );
            return 2;
        }
    };

    if file.metadata().is_ok_and(|meta| meta.is_dir()) {
        write_stderr(
            runtime,
            &format!("{program}: '{path}' is a directory, cannot continue\n"),
        );
        return 1;
    }

    runner.run_file(runtime, path, file)
}

fn clear_inspect(runtime: &mut Runtime) {
    if let Some(interp) = runtime.interpreter_mut() {
        interp.config.inspect = Some(0);
    }
    runtime.flags_mut().inspect = 0;
}

fn run_stdin(runtime: &mut Runtime, runner: &mut dyn Runner, config: &Config) -> i32 {
    if stdin_is_interactive(runtime, config) {
        // Exit on SystemExit instead of dropping into interactive mode.
        clear_inspect(runtime);
    }
    runner.run_stdin(runtime)
}

/// Enter interactive mode after the run target when `-i` or
/// `PYTHONINSPECT` asks for it.
fn repl(runtime: &mut Runtime, runner: &mut dyn Runner, config: &Config, exitcode: &mut i32) {
    let mut inspect = runtime
        .interpreter()
        .and_then(|interp| interp.config().inspect)
        .unwrap_or(0);

    if inspect == 0 && config.use_environment == Some(true) {
        let from_env = runtime
            .host()
            .env
            .get("PYTHONINSPECT")
            .ok()
            .flatten()
            .is_some_and(|value| !value.is_empty());
        if from_env {
            inspect = 1;
            runtime.flags_mut().inspect = 1;
        }
    }

    if !(inspect > 0 && stdin_is_interactive(runtime, config) && run_code(config)) {
        return;
    }

    clear_inspect(runtime);
    *exitcode = runner.run_stdin(runtime);
}
