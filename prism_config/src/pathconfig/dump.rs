//! Human-readable dump of the path configuration, printed when startup
//! cannot locate the standard library.

use crate::config::Config;
use std::fmt::Write as _;

/// Quote `text` the way the language's `repr()` quotes a string.
fn repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn field(out: &mut String, name: &str, value: Option<&str>) {
    let _ = match value {
        Some(value) => writeln!(out, "  sys.{name} = {}", repr(value)),
        None => writeln!(out, "  sys.{name} = (not set)"),
    };
}

/// Render the path-related fields of `config`.
#[must_use]
pub fn render_path_config(config: &Config) -> String {
    let mut out = String::from("Python path configuration:\n");
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "(not set)".to_owned());

    let _ = writeln!(out, "  PYTHONHOME = {}", text(&config.home));
    let _ = writeln!(out, "  PYTHONPATH = {}", text(&config.pythonpath_env));
    let _ = writeln!(out, "  program name = {}", text(&config.program_name));
    let _ = writeln!(
        out,
        "  isolated = {}",
        u8::from(config.isolated.unwrap_or(false))
    );
    let _ = writeln!(
        out,
        "  environment = {}",
        u8::from(config.use_environment.unwrap_or(false))
    );
    let _ = writeln!(
        out,
        "  user site = {}",
        u8::from(config.user_site_directory.unwrap_or(false))
    );
    let _ = writeln!(
        out,
        "  import site = {}",
        u8::from(config.site_import.unwrap_or(false))
    );

    field(&mut out, "_base_executable", config.base_executable.as_deref());
    field(&mut out, "base_prefix", config.base_prefix.as_deref());
    field(&mut out, "base_exec_prefix", config.base_exec_prefix.as_deref());
    field(&mut out, "platlibdir", config.platlibdir.as_deref());
    field(&mut out, "executable", config.executable.as_deref());
    field(&mut out, "prefix", config.prefix.as_deref());
    field(&mut out, "exec_prefix", config.exec_prefix.as_deref());

    out.push_str("  sys.path = [\n");
    for entry in &config.module_search_paths {
        let _ = writeln!(out, "    {},", repr(entry));
    }
    out.push_str("  ]\n");
    out
}

/// Print [`render_path_config`] to stderr.
pub fn dump_path_config(config: &Config) {
    eprint!("{}", render_path_config(config));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr_quoting() {
        assert_eq!(repr("/usr/lib"), "'/usr/lib'");
        assert_eq!(repr("it's"), "\"it's\"");
        assert_eq!(repr("a'\"b"), "'a\\'\"b'");
        assert_eq!(repr("c:\\x"), "'c:\\\\x'");
        assert_eq!(repr("tab\there"), "'tab\\there'");
    }

    #[test]
    fn test_render_lists_search_path() {
        let mut config = Config::python();
        config.home = Some("/opt/py".to_owned());
        config.program_name = Some("python3".to_owned());
        config.use_environment = Some(true);
        config.prefix = Some("/opt/py".to_owned());
        config.module_search_paths = vec!["/opt/py/lib/python312.zip".to_owned(), String::new()];

        let text = render_path_config(&config);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Python path configuration:");
        assert_eq!(lines[1], "  PYTHONHOME = /opt/py");
        assert_eq!(lines[2], "  PYTHONPATH = (not set)");
        assert_eq!(lines[3], "  program name = python3");
        assert!(text.contains("  environment = 1\n"));
        assert!(text.contains("  sys.prefix = '/opt/py'\n"));
        assert!(text.contains("  sys.exec_prefix = (not set)\n"));
        assert!(text.ends_with("  sys.path = [\n    '/opt/py/lib/python312.zip',\n    '',\n  ]\n"));
    }
}
