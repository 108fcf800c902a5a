//! What the assistant knows about the user's money for this session.

use pennywise_finance::{extract_monthly_totals, summarize, NO_DATA};
use pennywise_ingest::{load_document_text, load_tabular, normalize};
use std::path::Path;
use tracing::{debug, info};

use crate::config::ChatSection;

#[derive(Debug, Clone, PartialEq)]
pub struct StatementContext {
    /// Aggregate and/or monthly summary text
    pub summary: String,
    /// Bounded PDF text, when enabled
    pub excerpt: Option<String>,
}

impl StatementContext {
    pub fn from_sources(csv: Option<&Path>, pdf: Option<&Path>, chat: &ChatSection) -> Self {
        let mut parts = Vec::new();
        let mut excerpt = None;

        if let Some(path) = csv {
            let records = normalize(&load_tabular(path));
            info!(path = %path.display(), records = records.len(), "loaded CSV statement");
            parts.push(summarize(&records).to_string());
        }

        if let Some(path) = pdf {
            let text = load_document_text(path, chat.max_excerpt_chars);
            info!(path = %path.display(), chars = text.chars().count(), "loaded PDF statement");
            if let Some((monthly, text)) = document_part(text, chat) {
                parts.push(monthly);
                excerpt = text;
            }
        }

        // Only claim "no data" when no source contributed anything.
        let summary = if parts.is_empty() {
            NO_DATA.to_string()
        } else {
            parts.join("\n")
        };

        Self { summary, excerpt }
    }
}

/// Monthly-totals line plus the excerpt to forward, or `None` for empty text.
fn document_part(text: String, chat: &ChatSection) -> Option<(String, Option<String>)> {
    if text.is_empty() {
        return None;
    }
    let monthly = extract_monthly_totals(&text);
    debug!(months = monthly.len(), "monthly totals extracted");
    let excerpt = chat.include_excerpt.then_some(text);
    Some((format!("Monthly totals: {monthly}"), excerpt))
}
