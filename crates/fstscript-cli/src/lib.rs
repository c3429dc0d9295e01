// fstscript-cli: shared utilities for CLI tools.

use std::io::{self, Read, Write};
use std::process;

use fstscript::{FstClass, ScriptError, StringTokenType, SymbolTable};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the default arc type for new automata.
pub const ARC_TYPE_ENV: &str = "FSTSCRIPT_ARC_TYPE";

/// Arc type used when neither a flag nor the environment names one.
pub const DEFAULT_ARC_TYPE: &str = "standard";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Pick the arc type for a new automaton.
///
/// Search order:
/// 1. `explicit` (from `--arc-type`)
/// 2. `FSTSCRIPT_ARC_TYPE` environment variable
/// 3. `"standard"`
pub fn resolve_arc_type(explicit: Option<&str>) -> String {
    if let Some(arc_type) = explicit {
        return arc_type.to_string();
    }
    match std::env::var(ARC_TYPE_ENV) {
        Ok(arc_type) if !arc_type.is_empty() => arc_type,
        _ => DEFAULT_ARC_TYPE.to_string(),
    }
}

/// Parse a `--NAME=VALUE` or `--NAME VALUE` (or `-S VALUE`) option.
///
/// Returns `(value, remaining_args)`. A later occurrence overrides an
/// earlier one.
pub fn take_option(
    args: &[String],
    long: &str,
    short: Option<&str>,
) -> Result<(Option<String>, Vec<String>), String> {
    let flag = format!("--{long}");
    let prefix = format!("--{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if *arg == flag || Some(arg.as_str()) == short {
            match iter.next() {
                Some(val) => value = Some(val.clone()),
                None => return Err(format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    Ok((value, remaining))
}

/// Remove every `--NAME` from `args`; true if any was present.
pub fn take_flag(args: &[String], long: &str) -> (bool, Vec<String>) {
    let flag = format!("--{long}");
    let remaining: Vec<String> = args.iter().filter(|a| **a != flag).cloned().collect();
    (remaining.len() != args.len(), remaining)
}

/// Parse a token type name, defaulting to `byte`.
pub fn parse_token_type(name: Option<&str>) -> Result<StringTokenType, String> {
    match name {
        Some(name) => name.parse().map_err(|e| format!("{e}")),
        None => Ok(StringTokenType::default()),
    }
}

/// Read a text symbol table (`symbol label` per line).
pub fn read_symbols(path: &str) -> Result<SymbolTable, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {path}: {e}"))?;
    SymbolTable::parse_text(path, &text).map_err(|e| format!("{path}: {e}"))
}

/// Read an optional symbol table named by an option value.
pub fn read_optional_symbols(path: Option<&str>) -> Result<Option<SymbolTable>, String> {
    path.map(read_symbols).transpose()
}

/// Read an automaton from `path`, or from stdin if `path` is `None` or `-`.
pub fn read_fst(path: Option<&str>) -> Result<FstClass, String> {
    let data = match path {
        Some(p) if p != "-" => {
            std::fs::read(p).map_err(|e| format!("failed to read {p}: {e}"))?
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
    };
    let source = path.unwrap_or("-");
    debug!(source, bytes = data.len(), "read fst");
    FstClass::read(&data).map_err(|e: ScriptError| format!("{source}: {e}"))
}

/// Write an automaton to `path`, or to stdout if `path` is `None` or `-`.
pub fn write_fst(path: Option<&str>, fst: &FstClass) -> Result<(), String> {
    let data = fst.write();
    debug!(
        arc_type = fst.arc_type(),
        states = fst.num_states(),
        bytes = data.len(),
        "write fst"
    );
    match path {
        Some(p) if p != "-" => {
            std::fs::write(p, &data).map_err(|e| format!("failed to write {p}: {e}"))
        }
        _ => {
            let mut out = io::stdout().lock();
            out.write_all(&data)
                .and_then(|()| out.flush())
                .map_err(|e| format!("failed to write stdout: {e}"))
        }
    }
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn take_option_forms() {
        let (value, rest) = take_option(&args(&["--lower=2", "in.fst"]), "lower", None).unwrap();
        assert_eq!(value.as_deref(), Some("2"));
        assert_eq!(rest, args(&["in.fst"]));

        let (value, rest) =
            take_option(&args(&["-o", "out.fst", "in.fst"]), "output", Some("-o")).unwrap();
        assert_eq!(value.as_deref(), Some("out.fst"));
        assert_eq!(rest, args(&["in.fst"]));
    }

    #[test]
    fn take_option_last_wins() {
        let (value, _) =
            take_option(&args(&["--upper", "1", "--upper=3"]), "upper", None).unwrap();
        assert_eq!(value.as_deref(), Some("3"));
    }

    #[test]
    fn take_option_missing_value() {
        assert_eq!(
            take_option(&args(&["--upper"]), "upper", None).unwrap_err(),
            "--upper requires a value"
        );
    }

    #[test]
    fn take_flag_removes_all() {
        let (json, rest) = take_flag(&args(&["--json", "a", "--json"]), "json");
        assert!(json);
        assert_eq!(rest, args(&["a"]));
        let (json, _) = take_flag(&args(&["a"]), "json");
        assert!(!json);
    }

    #[test]
    fn explicit_arc_type_wins() {
        assert_eq!(resolve_arc_type(Some("log")), "log");
    }

    #[test]
    fn token_type_names() {
        assert_eq!(parse_token_type(None).unwrap(), StringTokenType::Byte);
        assert_eq!(parse_token_type(Some("symbol")).unwrap(), StringTokenType::Symbol);
        assert!(parse_token_type(Some("morse")).is_err());
    }

    #[test]
    fn help_flag() {
        assert!(wants_help(&args(&["x", "-h"])));
        assert!(!wants_help(&args(&["x"])));
    }
}
