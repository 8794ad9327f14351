//! Command line parsing into a [`Config`].

use crate::config::Config;
use crate::getopt::{GetOpt, LongOption, Opt};
use crate::usage::{print_usage, version_text};
use prism_core::{Status, StatusResult};
use std::fmt;

/// Error printed for a bad `--check-hash-based-pycs` value.
pub const CHECK_HASH_PYCS_ERROR: &str =
    "--check-hash-based-pycs must be one of 'default', 'always', or 'never'";

/// Invalidation mode for hash-based bytecode files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashPycsMode {
    /// Check checked hash-based files, trust unchecked ones.
    #[default]
    Default,
    /// Always check the source hash.
    Always,
    /// Never check the source hash.
    Never,
}

impl HashPycsMode {
    /// Parse `default`, `always` or `never`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "default" => Some(Self::Default),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// The option value naming this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for HashPycsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan `config.argv` and store the options in `config`.
///
/// `-c` and `-m` end the scan and claim the remaining arguments. Help and
/// version requests return `Exit(0)`; usage errors print the usage summary
/// to stderr and return `Exit(2)`.
///
/// Returns the index of the first argument that belongs to the program.
pub fn parse_command_line(config: &mut Config) -> StatusResult<usize> {
    let argv = config.argv.clone();
    let program = config.program_name.clone().unwrap_or_default();
    let mut print_version = 0_u32;
    let mut getopt = GetOpt::new(&argv);

    while let Some(opt) = getopt.next_opt() {
        match opt {
            Opt::WithArg('c', command) => {
                if config.run_command.is_none() {
                    config.run_command = Some(format!("{command}\n"));
                }
                break;
            }
            Opt::WithArg('m', module) => {
                if config.run_module.is_none() {
                    config.run_module = Some(module);
                }
                break;
            }
            Opt::Long(LongOption::CheckHashBasedPycs, value) => {
                let Some(mode) = HashPycsMode::parse(&value) else {
                    eprintln!("{CHECK_HASH_PYCS_ERROR}");
                    print_usage(true, &program);
                    return Err(Status::exit(2));
                };
                config.check_hash_pycs_mode = mode;
            }
            Opt::Flag('b') => config.bytes_warning += 1,
            Opt::Flag('B') => config.write_bytecode = Some(false),
            Opt::Flag('d') => config.parser_debug += 1,
            Opt::Flag('i') => {
                *config.inspect.get_or_insert(0) += 1;
                *config.interactive.get_or_insert(0) += 1;
            }
            // Handled by the pre-scan.
            Opt::Flag('E' | 'I') | Opt::WithArg('X', _) => {}
            Opt::Flag('O') => config.optimization_level += 1,
            Opt::Flag('t') => {}
            Opt::Flag('u') => config.buffered_stdio = Some(false),
            Opt::Flag('v') => config.verbose += 1,
            Opt::Flag('x') => config.skip_source_first_line = true,
            Opt::Flag('h' | '?') => {
                print_usage(false, &program);
                return Err(Status::exit(0));
            }
            Opt::Flag('V') => print_version += 1,
            Opt::Flag('q') => *config.quiet.get_or_insert(0) += 1,
            Opt::Flag('R') => config.use_hash_seed = Some(false),
            Opt::Flag('s') => config.user_site_directory = Some(false),
            Opt::Flag('S') => config.site_import = Some(false),
            Opt::WithArg('W', option) => config.warnoptions.push(option),
            _ => {
                print_usage(true, &program);
                return Err(Status::exit(2));
            }
        }
    }

    if print_version > 0 {
        println!("{}", version_text(print_version));
        return Err(Status::exit(0));
    }

    let mut optind = getopt.optind();
    let claimed = config.run_command.is_some() || config.run_module.is_some();
    if !claimed && config.run_filename.is_none() {
        if let Some(arg) = argv.get(optind).filter(|arg| *arg != "-") {
            config.run_filename = Some(arg.clone());
        }
    }
    if claimed {
        optind -= 1;
    }
    Ok(optind)
}

/// Replace `config.argv` with the program's arguments, `argv[opt_index..]`.
///
/// An empty remainder becomes `[""]`. When a command or module is set,
/// `argv[0]` is forced to `-c` or `-m`.
pub fn update_argv(config: &mut Config, opt_index: usize) {
    let mut argv: Vec<String> = config.argv.get(opt_index..).unwrap_or_default().to_vec();
    if argv.is_empty() {
        argv.push(String::new());
    }
    if config.run_command.is_some() {
        argv[0] = "-c".to_owned();
    } else if config.run_module.is_some() {
        argv[0] = "-m".to_owned();
    }
    config.argv = argv;
}
