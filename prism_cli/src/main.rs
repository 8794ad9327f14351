//! Prism: a hyper-performant Python runtime.
//!
//! This is the main CLI entry point. It accepts the CPython command line,
//! brings the runtime up, runs the selected target and tears it down again.

mod logging;
mod runner;

use prism_config::{Argv, Host};
use runner::ReportRunner;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let args = Argv::process();
    let mut runner = ReportRunner::new(std::io::stdout().lock());
    let code = prism_lifecycle::run_main(&args, Host::process(), &mut runner);

    // Process exit statuses are a single byte.
    ExitCode::from(u8::try_from(code & 0xff).unwrap_or(1))
}
