//! The `builtins` module and the default file-open hook.

use crate::modules::{NamespaceModule, Value};
use std::fs::{File, OpenOptions};
use std::io;

/// Exception types bound in `builtins` once the exception hierarchy exists.
const EXCEPTION_TYPES: &[&str] = &[
    "BaseException",
    "Exception",
    "SystemExit",
    "KeyboardInterrupt",
    "ImportError",
    "ModuleNotFoundError",
    "OSError",
    "FileNotFoundError",
    "IsADirectoryError",
    "RuntimeError",
    "ValueError",
    "TypeError",
    "AttributeError",
    "UnicodeDecodeError",
    "MemoryError",
];

/// Types bound in `builtins`.
const TYPES: &[&str] = &["object", "type", "int", "str", "float", "bool", "list"];

/// Functions bound in `builtins` during core initialization. `open` is
/// added by main initialization.
const FUNCTIONS: &[&str] = &["print", "len", "repr", "isinstance", "getattr", "__import__"];

/// Build `builtins`.
#[must_use]
pub fn create_builtins(debug: bool) -> NamespaceModule {
    let mut module = NamespaceModule::new("builtins");
    module.set_attr("__debug__", Value::Bool(debug));
    module.set_attr("None", Value::None);
    module.set_attr("True", Value::Bool(true));
    module.set_attr("False", Value::Bool(false));
    for name in TYPES.iter().chain(EXCEPTION_TYPES) {
        module.set_attr(name, Value::Type(*name));
    }
    for name in FUNCTIONS {
        module.set_attr(name, Value::Builtin(*name));
    }
    module
}

/// Signature of the hook behind `builtins.open`.
pub type OpenHook = fn(path: &str, mode: &str) -> io::Result<File>;

/// Open `path` with a mode string (`r`, `w`, `a`, `x`, optionally `+`, `b`
/// or `t`).
pub fn default_open(path: &str, mode: &str) -> io::Result<File> {
    let mut options = OpenOptions::new();
    let update = mode.contains('+');
    match mode.chars().find(|c| matches!(c, 'r' | 'w' | 'a' | 'x')) {
        Some('r') | None => {
            options.read(true).write(update);
        }
        Some('w') => {
            options.write(true).create(true).truncate(true).read(update);
        }
        Some('a') => {
            options.append(true).create(true).read(update);
        }
        Some(_) => {
            options.write(true).create_new(true).read(update);
        }
    }
    options.open(path)
}
