//! Optional spoken output for assistant replies.
//!
//! Chat always works in text; speech is layered on top and never required.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Speech {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Text-only default
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Speech for Silent {
    fn speak(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Speaks through a local text-to-speech command (`say`, `espeak-ng`, `espeak`).
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: PathBuf,
}

impl CommandSpeech {
    const CANDIDATES: [&'static str; 3] = ["say", "espeak-ng", "espeak"];

    /// First text-to-speech command found on PATH
    pub fn detect() -> Option<Self> {
        Self::CANDIDATES.iter().find_map(|name| {
            which::which(name).ok().map(|program| {
                debug!(program = %program.display(), "using text-to-speech command");
                Self { program }
            })
        })
    }
}

impl Speech for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("running {}", self.program.display()))?;

        if !status.success() {
            bail!("{} failed with status: {}", self.program.display(), status);
        }
        Ok(())
    }
}

/// Either a detected TTS command or silence.
pub fn speech_backend(enabled: bool) -> Box<dyn Speech> {
    if !enabled {
        return Box::new(Silent);
    }
    match CommandSpeech::detect() {
        Some(s) => Box::new(s),
        None => {
            tracing::warn!("no text-to-speech command found (tried say, espeak-ng, espeak); replies will be text only");
            Box::new(Silent)
        }
    }
}

impl<S: Speech + ?Sized> Speech for Box<S> {
    fn speak(&mut self, text: &str) -> Result<()> {
        (**self).speak(text)
    }
}
