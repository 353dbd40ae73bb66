//! Runner configuration: defaults < optional YAML file < command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Config {
    /// Root the file resolver searches under.
    pub root: PathBuf,
    /// JSONL event destination; `None` means stderr.
    pub events_path: Option<PathBuf>,
    /// Echo the monitored process's raw output to stdout.
    pub echo: bool,
}

impl Config {
    pub fn default_from_env() -> Self {
        Self {
            root: PathBuf::from("."),
            events_path: None,
            echo: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    root: String,
    #[serde(default)]
    events: String,
    #[serde(default)]
    echo: Option<bool>,
}

/// Load config with the usual precedence: defaults, then the config file
/// (explicit path => hard error if unreadable, default path => silently
/// absent). Flags are applied by the caller on top.
pub fn load_config(config_file: Option<&str>) -> Result<(Config, Option<PathBuf>), String> {
    let mut cfg = Config::default_from_env();

    let explicit = config_file
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let (path_to_try, explicit_path) = if let Some(path) = explicit {
        (Some(path), true)
    } else {
        (default_config_path(), false)
    };

    if let Some(path) = path_to_try {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed: PartialConfig =
                    serde_yaml::from_str(&text).map_err(|err| format!("parse config: {err}"))?;
                apply_partial(&mut cfg, parsed)?;
                return Ok((cfg, Some(path)));
            }
            Err(err) => {
                if explicit_path {
                    return Err(format!("failed to load config file: {err}"));
                }
            }
        }
    }

    Ok((cfg, None))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("luatrace").join("config.yaml"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("luatrace")
                    .join("config.yaml"),
            );
        }
    }
    None
}

fn apply_partial(cfg: &mut Config, partial: PartialConfig) -> Result<(), String> {
    if !partial.root.trim().is_empty() {
        cfg.root = expand_tilde(partial.root.trim())?;
    }
    if !partial.events.trim().is_empty() {
        cfg.events_path = Some(expand_tilde(partial.events.trim())?);
    }
    if let Some(echo) = partial.echo {
        cfg.echo = echo;
    }
    Ok(())
}

fn expand_tilde(input: &str) -> Result<PathBuf, String> {
    if input == "~" {
        let home = std::env::var("HOME").map_err(|_| "failed to resolve HOME".to_string())?;
        return Ok(PathBuf::from(home));
    }
    if let Some(rest) = input.strip_prefix("~/") {
        let home = std::env::var("HOME").map_err(|_| "failed to resolve HOME".to_string())?;
        return Ok(PathBuf::from(home).join(rest));
    }
    Ok(Path::new(input).to_path_buf())
}
