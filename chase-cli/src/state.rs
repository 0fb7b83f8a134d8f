use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".chase.toml"))
}

/// Expand a leading `~` or `~/` against `$HOME`.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        Ok(expand_tilde_in(path, &home_dir()?))
    } else {
        Ok(PathBuf::from(path))
    }
}

fn expand_tilde_in(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with('/') => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}
