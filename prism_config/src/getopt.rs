//! Command line option scanner.
//!
//! A small `getopt` in the interpreter's dialect: single-dash short options
//! (clustered, with attached or detached arguments), one double-dash long
//! option, and `--help`/`--version` aliases. Scanning stops at the first
//! positional argument, at a lone `-`, or after `--`.

/// Short options; a trailing `:` marks an option that takes an argument.
pub const SHORT_OPTS: &str = "bBc:dEhiIJm:OqRsStuvVW:xX:?";

/// Recognized long options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongOption {
    /// `--check-hash-based-pycs <mode>`
    CheckHashBasedPycs,
}

const LONG_OPTS: &[(&str, LongOption)] = &[("check-hash-based-pycs", LongOption::CheckHashBasedPycs)];

/// One scanned option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// A short option without an argument.
    Flag(char),
    /// A short option with its argument.
    WithArg(char, String),
    /// A long option with its argument.
    Long(LongOption, String),
    /// An unknown option, a reserved option or a missing argument.
    Invalid,
}

/// Option scanner over an argument vector whose first entry is the program.
#[derive(Debug)]
pub struct GetOpt<'a> {
    args: &'a [String],
    optind: usize,
    rest: &'a str,
    opterr: bool,
}

impl<'a> GetOpt<'a> {
    /// Start scanning `args` at index 1, reporting errors on stderr.
    #[must_use]
    pub fn new(args: &'a [String]) -> Self {
        Self {
            args,
            optind: 1,
            rest: "",
            opterr: true,
        }
    }

    /// Do not report scanning errors.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.opterr = false;
        self
    }

    /// Index of the next argument to scan.
    #[inline]
    #[must_use]
    pub fn optind(&self) -> usize {
        self.optind
    }

    fn report(&self, message: &str) {
        if self.opterr {
            eprintln!("{message}");
        }
    }

    fn previous_arg(&self) -> &str {
        self.args
            .get(self.optind.saturating_sub(1))
            .map_or("", String::as_str)
    }

    /// Scan the next option; `None` once scanning is over.
    pub fn next_opt(&mut self) -> Option<Opt> {
        if self.rest.is_empty() {
            let arg = self.args.get(self.optind)?;
            if !arg.starts_with('-') || arg == "-" {
                return None;
            }
            match arg.as_str() {
                "--" => {
                    self.optind += 1;
                    return None;
                }
                "--help" => {
                    self.optind += 1;
                    return Some(Opt::Flag('h'));
                }
                "--version" => {
                    self.optind += 1;
                    return Some(Opt::Flag('V'));
                }
                _ => {}
            }
            self.rest = &arg[1..];
            self.optind += 1;
        }

        let mut chars = self.rest.chars();
        let option = chars.next()?;
        self.rest = chars.as_str();

        if option == '-' {
            return Some(self.long_option());
        }

        if option == 'J' {
            self.report("-J is reserved for Jython");
            return Some(Opt::Invalid);
        }

        let Some(pos) = SHORT_OPTS.find(option).filter(|_| option != ':') else {
            self.report(&format!("Unknown option: -{option}"));
            return Some(Opt::Invalid);
        };

        if !SHORT_OPTS[pos + option.len_utf8()..].starts_with(':') {
            return Some(Opt::Flag(option));
        }

        if !self.rest.is_empty() {
            let value = self.rest.to_owned();
            self.rest = "";
            return Some(Opt::WithArg(option, value));
        }

        match self.args.get(self.optind) {
            Some(value) => {
                self.optind += 1;
                Some(Opt::WithArg(option, value.clone()))
            }
            None => {
                self.report(&format!("Argument expected for the -{option} option"));
                Some(Opt::Invalid)
            }
        }
    }

    fn long_option(&mut self) -> Opt {
        let name = self.rest;
        self.rest = "";

        let Some(&(_, long)) = LONG_OPTS.iter().find(|(n, _)| *n == name) else {
            self.report(&format!("unknown option {}", self.previous_arg()));
            return Opt::Invalid;
        };

        match self.args.get(self.optind) {
            Some(value) => {
                self.optind += 1;
                Opt::Long(long, value.clone())
            }
            None => {
                self.report(&format!(
                    "Argument expected for the {} options",
                    self.previous_arg()
                ));
                Opt::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn scan(list: &[&str]) -> (Vec<Opt>, usize) {
        let argv = args(list);
        let mut getopt = GetOpt::new(&argv).quiet();
        let mut opts = Vec::new();
        while let Some(opt) = getopt.next_opt() {
            opts.push(opt);
        }
        (opts, getopt.optind())
    }

    // =========================================================================
    // Short Options
    // =========================================================================

    #[test]
    fn test_clustered_flags() {
        let (opts, optind) = scan(&["python3", "-iqu", "script.py"]);
        assert_eq!(
            opts,
            vec![Opt::Flag('i'), Opt::Flag('q'), Opt::Flag('u')]
        );
        assert_eq!(optind, 2);
    }

    #[test]
    fn test_attached_and_detached_arguments() {
        let (opts, _) = scan(&["python3", "-Wignore", "-X", "utf8"]);
        assert_eq!(
            opts,
            vec![
                Opt::WithArg('W', "ignore".to_owned()),
                Opt::WithArg('X', "utf8".to_owned()),
            ]
        );
    }

    #[test]
    fn test_missing_argument_is_invalid() {
        let (opts, _) = scan(&["python3", "-c"]);
        assert_eq!(opts, vec![Opt::Invalid]);
    }

    #[test]
    fn test_unknown_and_reserved_options() {
        let (opts, _) = scan(&["python3", "-z"]);
        assert_eq!(opts, vec![Opt::Invalid]);

        let (opts, _) = scan(&["python3", "-J"]);
        assert_eq!(opts, vec![Opt::Invalid]);
    }

    // =========================================================================
    // Termination
    // =========================================================================

    #[test]
    fn test_double_dash_ends_scanning() {
        let (opts, optind) = scan(&["python3", "-i", "--", "-c", "x"]);
        assert_eq!(opts, vec![Opt::Flag('i')]);
        assert_eq!(optind, 3);
    }

    #[test]
    fn test_lone_dash_ends_scanning() {
        let (opts, optind) = scan(&["python3", "-", "-i"]);
        assert!(opts.is_empty());
        assert_eq!(optind, 1);
    }

    #[test]
    fn test_positional_ends_scanning() {
        let (opts, optind) = scan(&["python3", "script.py", "-i"]);
        assert!(opts.is_empty());
        assert_eq!(optind, 1);
    }

    // =========================================================================
    // Long Options
    // =========================================================================

    #[test]
    fn test_help_and_version_aliases() {
        let (opts, _) = scan(&["python3", "--help", "--version"]);
        assert_eq!(opts, vec![Opt::Flag('h'), Opt::Flag('V')]);
    }

    #[test]
    fn test_check_hash_based_pycs() {
        let (opts, optind) = scan(&["python3", "--check-hash-based-pycs", "always", "x.py"]);
        assert_eq!(
            opts,
            vec![Opt::Long(LongOption::CheckHashBasedPycs, "always".to_owned())]
        );
        assert_eq!(optind, 3);
    }

    #[test]
    fn test_unknown_long_option() {
        let (opts, _) = scan(&["python3", "--frobnicate"]);
        assert_eq!(opts, vec![Opt::Invalid]);

        let (opts, _) = scan(&["python3", "--check-hash-based-pycs"]);
        assert_eq!(opts, vec![Opt::Invalid]);
    }
}
