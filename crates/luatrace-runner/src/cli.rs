//! Command-line surface: flag parsing and wiring, kept out of the binary
//! so it stays testable.

use std::path::PathBuf;

use crate::config::Config;

pub struct CliOptions {
    pub config_file: Option<String>,
    pub root: Option<PathBuf>,
    pub events_path: Option<PathBuf>,
    pub no_echo: bool,
    pub command: Vec<String>,
    pub show_help: bool,
    pub show_version: bool,
}

pub fn usage() -> String {
    "\
luatrace-runner watches a Lua command's output for tracebacks and diff dumps.

Usage:
  luatrace-runner [flags] -- <command> [args...]

Flags:
      --config FILE   Config file (YAML)
      --root DIR      Project root for source file lookup (default \".\")
      --events FILE   Write JSONL events to FILE instead of stderr
      --no-echo       Do not echo the command's raw output
  -h, --help          Show this help
  -v, --version       Show version
"
    .to_string()
}

pub fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions {
        config_file: None,
        root: None,
        events_path: None,
        no_echo: false,
        command: Vec::new(),
        show_help: false,
        show_version: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" => {
                opts.command = iter.map(|s| s.to_string()).collect();
                break;
            }
            "-h" | "--help" => opts.show_help = true,
            "-v" | "--version" => opts.show_version = true,
            "--no-echo" => opts.no_echo = true,
            "--config" => {
                opts.config_file = Some(flag_value(&mut iter, "--config")?);
            }
            "--root" => {
                opts.root = Some(PathBuf::from(flag_value(&mut iter, "--root")?));
            }
            "--events" => {
                opts.events_path = Some(PathBuf::from(flag_value(&mut iter, "--events")?));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown flag: {other}"));
            }
            other => {
                // First bare argument starts the command even without `--`.
                let mut command = vec![other.to_string()];
                command.extend(iter.map(|s| s.to_string()));
                opts.command = command;
                break;
            }
        }
    }

    Ok(opts)
}

fn flag_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, String> {
    match iter.next() {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(format!("{flag} requires a value")),
    }
}

/// Flags win over whatever the config file set.
pub fn apply_cli(config: &mut Config, opts: &CliOptions) {
    if let Some(root) = &opts.root {
        config.root = root.clone();
    }
    if let Some(events) = &opts.events_path {
        config.events_path = Some(events.clone());
    }
    if opts.no_echo {
        config.echo = false;
    }
}
