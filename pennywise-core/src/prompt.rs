//! Prompt assembly for the finance assistant.
//!
//! The model only ever sees aggregates (or a bounded statement excerpt),
//! never the full transaction list.

/// Role instruction placed at the top of every prompt
pub const ROLE_INSTRUCTION: &str = "You are a smart personal finance assistant.";

/// Guard against the model making up figures
pub const NO_FABRICATION: &str = "Only use the numbers given above. \
If the data does not answer the question, say so instead of inventing values.";

const BREVITY: &str = "Give a concise, practical financial insight (max 5 lines).";

#[derive(Debug, Clone, Default)]
pub struct PromptContext<'a> {
    /// Aggregate summary or rendered monthly totals
    pub data_summary: &'a str,
    /// Optional bounded statement text
    pub excerpt: Option<&'a str>,
    /// Rendered conversation memory
    pub history: &'a str,
    pub question: &'a str,
}

impl<'a> PromptContext<'a> {
    pub fn new(data_summary: &'a str, question: &'a str) -> Self {
        Self {
            data_summary,
            question,
            ..Default::default()
        }
    }

    pub fn with_excerpt(mut self, excerpt: &'a str) -> Self {
        self.excerpt = Some(excerpt).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_history(mut self, history: &'a str) -> Self {
        self.history = history;
        self
    }
}

/// Build the single text block handed to the completion service.
pub fn build_prompt(ctx: &PromptContext<'_>) -> String {
    let mut s = String::new();
    s.push_str(ROLE_INSTRUCTION);
    s.push_str("\n\n");

    s.push_str("Financial summary (aggregated, not raw data):\n");
    s.push_str(ctx.data_summary.trim());
    s.push_str("\n\n");

    if let Some(excerpt) = ctx.excerpt {
        s.push_str("Statement excerpt:\n");
        s.push_str(excerpt.trim());
        s.push_str("\n\n");
    }

    if !ctx.history.trim().is_empty() {
        s.push_str("Recent conversation:\n");
        s.push_str(ctx.history.trim());
        s.push_str("\n\n");
    }

    s.push_str("User question:\n");
    s.push_str(ctx.question.trim());
    s.push_str("\n\n");

    s.push_str(NO_FABRICATION);
    s.push('\n');
    s.push_str(BREVITY);
    s
}
