//! Usage, help and version text.

use prism_core::osdefs::DELIM;

/// Hint printed after a usage error.
pub const USAGE_HINT: &str = "Try `python -h' for more information.";

const HELP_OPTIONS: &str = "\
Options and arguments (and corresponding environment variables):
-b     : issue warnings about str(bytes_instance), str(bytearray_instance)
         and comparing bytes/bytearray with str. (-bb: issue errors)
-B     : don't write .pyc files on import; also PYTHONDONTWRITEBYTECODE=x
-c cmd : program passed in as string (terminates option list)
-d     : debug output from parser; also PYTHONDEBUG=x
-E     : ignore PYTHON* environment variables (such as PYTHONPATH)
-h     : print this help message and exit (also --help)
-i     : inspect interactively after running script; forces a prompt even
         if stdin does not appear to be a terminal; also PYTHONINSPECT=x
-I     : isolate Python from the user's environment (implies -E and -s)
-m mod : run library module as a script (terminates option list)
-O     : remove assert and __debug__-dependent statements; also PYTHONOPTIMIZE=x
-OO    : do -O changes and also discard docstrings
-q     : don't print version and copyright messages on interactive startup
-R     : use a random seed for str and bytes hashing
-s     : don't add user site directory to sys.path; also PYTHONNOUSERSITE
-S     : don't imply 'import site' on initialization
-u     : force the stdout and stderr streams to be unbuffered;
         this option has no effect on stdin; also PYTHONUNBUFFERED=x
-v     : verbose (trace import statements); also PYTHONVERBOSE=x
-V     : print the Python version number and exit (also --version)
         when given twice, print more information about the build
-W arg : warning control; arg is action:message:category:module:lineno
         also PYTHONWARNINGS=arg
-x     : skip first line of source, allowing use of non-Unix forms of #!cmd
-X opt : set implementation-specific option
--check-hash-based-pycs always|default|never:
    control how Python invalidates hash-based .pyc files
file   : program read from script file
-      : program read from stdin (default; interactive mode if a tty)
arg ...: arguments passed to program in sys.argv[1:]
";

/// The one-line usage summary.
#[must_use]
pub fn usage_line(program: &str) -> String {
    format!("usage: {program} [option] ... [-c cmd | -m mod | file | -] [arg] ...")
}

/// The full `-h` text.
#[must_use]
pub fn help_text(program: &str) -> String {
    let mut text = usage_line(program);
    text.push('\n');
    text.push_str(HELP_OPTIONS);
    text.push_str(&format!(
        "\nOther environment variables:
PYTHONSTARTUP: file executed on interactive startup (no default)
PYTHONPATH   : '{DELIM}'-separated list of directories prefixed to the
               default module search path.  The result is sys.path.
PYTHONHOME   : alternate <prefix> directory (or <prefix>{DELIM}<exec_prefix>).
               The default module search path uses <prefix>/lib/pythonX.X.
PYTHONPLATLIBDIR : override sys.platlibdir.
PYTHONUTF8: if set to 1, enable the UTF-8 mode.
PYTHONHASHSEED: if this variable is set to 'random', a random value is used
   to seed the hashes of str and bytes objects.  It can also be set to an
   integer in the range [0,4294967295] to get hash values with a
   predictable seed.
PYTHONMALLOC: set the Python memory allocators and/or install debug hooks
   on Python memory allocators. Use PYTHONMALLOC=debug to install debug
   hooks.
"
    ));
    text
}

/// The text printed for a usage error: summary line plus hint.
#[must_use]
pub fn usage_error_text(program: &str) -> String {
    format!("{}\n{USAGE_HINT}", usage_line(program))
}

/// The `-V` text; `-VV` adds build information.
#[must_use]
pub fn version_text(count: u32) -> String {
    if count >= 2 {
        format!(
            "Python {} (prism {})",
            prism_core::python_version_full(),
            prism_core::VERSION
        )
    } else {
        format!("Python {}", prism_core::python_version_full())
    }
}

/// Print help to stdout, or the usage error text to stderr.
pub fn print_usage(error: bool, program: &str) {
    if error {
        eprintln!("{}", usage_error_text(program));
    } else {
        print!("{}", help_text(program));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_line() {
        assert_eq!(
            usage_line("python3"),
            "usage: python3 [option] ... [-c cmd | -m mod | file | -] [arg] ..."
        );
    }

    #[test]
    fn test_usage_error_has_hint() {
        let text = usage_error_text("prism");
        assert!(text.starts_with("usage: prism "));
        assert!(text.ends_with("Try `python -h' for more information."));
    }

    #[test]
    fn test_help_mentions_delimiter_and_options() {
        let text = help_text("prism");
        assert!(text.contains(&format!("'{DELIM}'-separated")));
        assert!(text.contains("--check-hash-based-pycs"));
        assert!(text.contains("-m mod"));
    }

    #[test]
    fn test_version_text() {
        assert_eq!(
            version_text(1),
            format!("Python {}", prism_core::python_version_full())
        );
        assert!(version_text(2).contains("prism"));
    }
}
