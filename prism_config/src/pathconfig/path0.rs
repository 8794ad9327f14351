//! The entry prepended to `sys.path` for the run target.

use crate::fs::FileSystem;
use prism_core::osdefs::SEP;

/// Compute `sys.path[0]` from the final `sys.argv`.
///
/// - empty `argv`: `None`, leave `sys.path` alone
/// - `-m`: the working directory, or `None` if it cannot be determined
/// - `-c`: the empty string
/// - a script: the directory holding it, after following a symbolic link
///   at the script path and canonicalizing
#[must_use]
pub fn compute_sys_path0(argv: &[String], fs: &dyn FileSystem) -> Option<String> {
    let argv0 = argv.first()?;

    match argv0.as_str() {
        "-m" => fs.current_dir(),
        "-c" => Some(String::new()),
        script => Some(script_dir(script, fs)),
    }
}

fn script_dir(script: &str, fs: &dyn FileSystem) -> String {
    let mut path0 = script.to_owned();

    if let Some(link) = fs.read_link(script).filter(|link| !link.is_empty()) {
        if link.starts_with(SEP) {
            path0 = link;
        } else if link.contains(SEP) {
            path0 = match script.rfind(SEP) {
                Some(pos) => format!("{}{link}", &script[..=pos]),
                None => link,
            };
        }
    }

    if let Some(real) = fs.real_path(&path0) {
        path0 = real;
    }

    let len = last_separator(&path0).map_or(0, |pos| trim_len(&path0, pos));
    path0.truncate(len);
    path0
}

#[cfg(not(windows))]
fn last_separator(path: &str) -> Option<usize> {
    path.rfind(SEP)
}

#[cfg(windows)]
fn last_separator(path: &str) -> Option<usize> {
    path.rfind(['\\', '/'])
}

/// Length of the directory part, dropping the trailing separator unless it
/// is the root.
#[cfg(not(windows))]
fn trim_len(_path: &str, pos: usize) -> usize {
    if pos > 0 { pos } else { pos + 1 }
}

#[cfg(windows)]
fn trim_len(path: &str, pos: usize) -> usize {
    if pos > 0 && !path[..pos].ends_with(':') {
        pos
    } else {
        pos + 1
    }
}
