//! Terminal chat loop: read a question, ask the model, print the reply.

use anyhow::{Context, Result};
use pennywise_core::{build_prompt, ConversationMemory, PromptContext, Role};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::context::StatementContext;
use crate::llm::{ChatTurn, Completer, CompletionRequest};
use crate::speech::Speech;

/// `exit` / `quit`, any case
pub fn is_exit(line: &str) -> bool {
    let t = line.trim();
    t.eq_ignore_ascii_case("exit") || t.eq_ignore_ascii_case("quit")
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub memory_capacity: usize,
}

pub struct ChatSession<C, S> {
    completer: C,
    speech: S,
    settings: SessionSettings,
    statement: StatementContext,
    memory: ConversationMemory,
}

impl<C: Completer, S: Speech> ChatSession<C, S> {
    pub fn new(completer: C, speech: S, settings: SessionSettings, statement: StatementContext) -> Self {
        let memory = ConversationMemory::with_capacity(settings.memory_capacity);
        Self {
            completer,
            speech,
            settings,
            statement,
            memory,
        }
    }

    /// The full prompt that would be sent for `question` right now.
    pub fn prompt_for(&self, question: &str) -> String {
        let history = self.memory.render_context();
        let mut ctx = PromptContext::new(&self.statement.summary, question).with_history(&history);
        if let Some(excerpt) = self.statement.excerpt.as_deref() {
            ctx = ctx.with_excerpt(excerpt);
        }
        build_prompt(&ctx)
    }

    /// Ask one question. The exchange is remembered only if the call succeeds.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        let req = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatTurn::user(self.prompt_for(question))],
            max_tokens: self.settings.max_tokens,
        };
        debug!(model = %req.model, "sending completion request");

        let reply = self.completer.complete(&req)?.trim().to_string();
        self.memory.append(Role::User, question.trim());
        self.memory.append(Role::Assistant, &reply);
        debug!(
            remembered = self.memory.len(),
            capacity = self.memory.capacity(),
            "exchange stored"
        );
        Ok(reply)
    }

    /// Run until `exit`/`quit` or end of input. Service errors are reported
    /// inline and the loop carries on.
    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "Personal finance assistant. Type 'exit' or 'quit' to leave.")?;

        loop {
            write!(out, "You: ")?;
            out.flush().ok();

            let mut line = String::new();
            let n = input.read_line(&mut line).context("read input")?;
            if n == 0 {
                writeln!(out)?;
                break;
            }

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if is_exit(question) {
                writeln!(out, "Goodbye!")?;
                break;
            }

            match self.ask(question) {
                Ok(reply) => {
                    writeln!(out, "Assistant: {reply}\n")?;
                    if let Err(e) = self.speech.speak(&reply) {
                        warn!(error = %format!("{e:#}"), "speech output failed");
                    }
                }
                Err(e) => {
                    writeln!(out, "Error: {e:#}\n")?;
                }
            }
        }

        Ok(())
    }
}
