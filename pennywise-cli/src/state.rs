use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$PENNYWISE_HOME`, or `~/.pennywise` when unset
pub fn pennywise_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("PENNYWISE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pennywise"))
}

pub fn ensure_pennywise_home() -> Result<PathBuf> {
    let dir = pennywise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
