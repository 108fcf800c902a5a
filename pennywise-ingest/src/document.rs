//! Bounded plain-text excerpts from paginated statements (PDF).
//!
//! Pages are appended one at a time and accumulation stops as soon as the
//! running length reaches the ceiling, so the excerpt can overshoot by at
//! most one page.

use anyhow::{anyhow, Result};
use std::panic::{self, UnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default excerpt ceiling, in characters
pub const DEFAULT_MAX_CHARS: usize = 4000;

/// Anything that can hand back the text of each page, in order.
pub trait PageSource {
    fn page_texts(&self) -> Result<Vec<String>>;
}

/// A PDF on disk, read with `pdf-extract`
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
}

impl PdfFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSource for PdfFile {
    fn page_texts(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Err(anyhow!("{} does not exist", self.path.display()));
        }
        // pdf-extract panics on some malformed fonts/streams instead of erroring
        let path = self.path.clone();
        match quietly(move || pdf_extract::extract_text_by_pages(&path)) {
            Ok(pages) => {
                pages.map_err(|e| anyhow!("extracting text from {}: {e}", self.path.display()))
            }
            Err(_) => Err(anyhow!("pdf-extract panicked on {}", self.path.display())),
        }
    }
}

/// `catch_unwind` with the panic hook muted, so a caught panic is reported
/// once through our own `warn!` instead of also on raw stderr.
fn quietly<T>(f: impl FnOnce() -> T + UnwindSafe) -> std::thread::Result<T> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let out = panic::catch_unwind(f);
    panic::set_hook(previous);
    out
}

/// Read up to roughly `max_chars` characters of text from a PDF.
///
/// Returns an empty string when the file is missing, unreadable or has no text.
pub fn load_document_text(path: impl AsRef<Path>, max_chars: usize) -> String {
    let pdf = PdfFile::new(path.as_ref());
    excerpt_from_source(&pdf, max_chars).unwrap_or_else(|e| {
        warn!(
            path = %pdf.path().display(),
            error = %format!("{e:#}"),
            "could not read document text"
        );
        String::new()
    })
}

/// Same as [`load_document_text`] for any [`PageSource`], with errors surfaced.
pub fn excerpt_from_source(source: &impl PageSource, max_chars: usize) -> Result<String> {
    let pages = source.page_texts()?;
    let page_count = pages.len();
    let text = excerpt_pages(pages, max_chars);
    debug!(pages = page_count, chars = text.chars().count(), "built document excerpt");
    Ok(text)
}

/// Join page texts with newlines until the ceiling is met, then trim.
pub fn excerpt_pages<I, S>(pages: I, max_chars: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    let mut chars = 0usize;

    for page in pages {
        let page = page.as_ref();
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
        chars += page.chars().count() + 1;
        if chars >= max_chars {
            break;
        }
    }

    text.trim().to_string()
}
