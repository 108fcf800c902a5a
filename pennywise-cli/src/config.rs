use anyhow::{bail, Context, Result};
use pennywise_core::DEFAULT_MEMORY_CAPACITY;
use pennywise_ingest::DEFAULT_MAX_CHARS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::Provider;
use crate::state::ensure_pennywise_home;

/// Overrides `llm.model` when set
pub const MODEL_ENV_VAR: &str = "PENNYWISE_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmSection,
    pub chat: ChatSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSection {
    pub provider: Provider,
    pub model: String,
    /// Defaults to the provider's public endpoint
    pub base_url: Option<String>,
    pub temperature: f32,
    /// Cap on generated tokens; the provider default applies when unset
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSection {
    /// Conversation entries kept for context (user and assistant each count)
    pub memory_capacity: usize,
    /// Ceiling for text pulled out of PDF statements
    pub max_excerpt_chars: usize,
    /// Send the PDF excerpt itself along with the monthly totals
    pub include_excerpt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSection {
                provider: Provider::OpenAI,
                model: "gpt-4o-mini".to_string(),
                base_url: None,
                temperature: 0.4,
                max_tokens: Some(200),
            },
            chat: ChatSection {
                memory_capacity: DEFAULT_MEMORY_CAPACITY,
                max_excerpt_chars: DEFAULT_MAX_CHARS,
                include_excerpt: true,
            },
        }
    }
}

impl Config {
    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup(MODEL_ENV_VAR).filter(|m| !m.trim().is_empty()) {
            self.llm.model = model.trim().to_string();
        }
    }

    /// API credential for the configured provider. Missing or blank is fatal.
    pub fn credential(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let var = self.llm.provider.key_env_var();
        match lookup(var).map(|k| k.trim().to_string()) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!("{var} is not set; export it or add it to a .env file"),
        }
    }
}

pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_pennywise_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
