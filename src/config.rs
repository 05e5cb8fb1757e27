use std::path::PathBuf;

use anyhow::{bail, Result};

pub const APP_DIR: &str = "simple-todo";
pub const DATA_FILE: &str = "data.json";
pub const LOG_FILE: &str = "simple-todo.log";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// `SIMPLE_TODO_DATA_DIR` wins, then `$XDG_DATA_HOME/simple-todo`, then
    /// `$HOME/.local/share/simple-todo`. Empty values count as unset and a
    /// relative `XDG_DATA_HOME` is ignored, as the XDG base-dir rules say.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = if let Some(dir) = var("SIMPLE_TODO_DATA_DIR") {
            PathBuf::from(dir)
        } else if let Some(xdg) = var("XDG_DATA_HOME").map(PathBuf::from).filter(|p| p.is_absolute()) {
            xdg.join(APP_DIR)
        } else if let Some(home) = var("HOME") {
            PathBuf::from(home).join(".local").join("share").join(APP_DIR)
        } else {
            bail!("cannot locate a data directory: set SIMPLE_TODO_DATA_DIR, XDG_DATA_HOME or HOME");
        };

        let log_filter = var("RUST_LOG").unwrap_or_else(|| "info".to_string());
        Ok(Self { data_dir, log_filter })
    }

    pub fn data_file(&self) -> PathBuf { self.data_dir.join(DATA_FILE) }

    pub fn log_file(&self) -> PathBuf { self.data_dir.join(LOG_FILE) }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_home_local_share() {
        let cfg = config(&[("HOME", "/home/ada")]).unwrap();
        assert_eq!(cfg.data_file(), Path::new("/home/ada/.local/share/simple-todo/data.json"));
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn xdg_data_home_beats_home() {
        let cfg = config(&[("HOME", "/home/ada"), ("XDG_DATA_HOME", "/data")]).unwrap();
        assert_eq!(cfg.data_dir, Path::new("/data/simple-todo"));
    }

    #[test]
    fn relative_or_empty_xdg_is_ignored() {
        let cfg = config(&[("HOME", "/h"), ("XDG_DATA_HOME", "rel")]).unwrap();
        assert_eq!(cfg.data_dir, Path::new("/h/.local/share/simple-todo"));
        let cfg = config(&[("HOME", "/h"), ("XDG_DATA_HOME", "")]).unwrap();
        assert_eq!(cfg.data_dir, Path::new("/h/.local/share/simple-todo"));
    }

    #[test]
    fn explicit_override_and_log_filter() {
        let cfg = config(&[("SIMPLE_TODO_DATA_DIR", "/tmp/todo"), ("RUST_LOG", "debug")]).unwrap();
        assert_eq!(cfg.log_file(), Path::new("/tmp/todo/simple-todo.log"));
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn no_location_is_an_error() {
        assert!(config(&[]).is_err());
    }
}
