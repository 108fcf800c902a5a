use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

/// Output cap used when a provider requires one and none is configured
const DEFAULT_MAX_TOKENS: u32 = 450;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com",
            Provider::Anthropic => "https://api.anthropic.com",
        }
    }

    /// Environment variable holding the API credential
    pub fn key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: Option<u32>,
}

/// The external text-completion service. Implementations return the
/// generated text, trimmed.
pub trait Completer {
    fn complete(&self, req: &CompletionRequest) -> Result<String>;
}

/// Chat-completion client over HTTPS (OpenAI-compatible or Anthropic).
#[derive(Clone)]
pub struct HttpCompleter {
    provider: Provider,
    base_url: String,
    api_key: String,
    temperature: f32,
    client: reqwest::Client,
}

impl HttpCompleter {
    pub fn new(provider: Provider, base_url: Option<&str>, api_key: String, temperature: f32) -> Self {
        let base_url = base_url
            .unwrap_or(provider.default_base_url())
            .trim_end_matches('/')
            .to_string();
        Self {
            provider,
            base_url,
            api_key,
            temperature,
            client: reqwest::Client::new(),
        }
    }

    async fn complete_async(&self, req: &CompletionRequest) -> Result<String> {
        match self.provider {
            Provider::OpenAI => self.openai_complete(req).await,
            Provider::Anthropic => self.anthropic_complete(req).await,
        }
    }

    async fn openai_complete(&self, req: &CompletionRequest) -> Result<String> {
        let body = OpenAiRequest {
            model: &req.model,
            messages: &req.messages,
            temperature: self.temperature,
            max_tokens: req.max_tokens,
        };

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: OpenAiResponse = resp.json().await.context("parse openai response")?;
        Ok(out.text())
    }

    async fn anthropic_complete(&self, req: &CompletionRequest) -> Result<String> {
        let body = AnthropicRequest {
            model: &req.model,
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages: &req.messages,
            temperature: self.temperature,
        };

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .headers(headers)
            .json(&body)
            .send()
            .await
            .context("anthropic request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("anthropic error: {status} {txt}");
        }

        let out: AnthropicResponse = resp.json().await.context("parse anthropic response")?;
        Ok(out.text())
    }
}

impl Completer for HttpCompleter {
    fn complete(&self, req: &CompletionRequest) -> Result<String> {
        // main runs under #[tokio::main]; a nested block_on would panic, so
        // reuse the current runtime when there is one.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(req)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(req))
        }
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

impl OpenAiResponse {
    fn text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatTurn],
    temperature: f32,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    t: String,
    text: Option<String>,
}

impl AnthropicResponse {
    fn text(self) -> String {
        let mut s = String::new();
        for b in self.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        s.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_body_omits_unset_max_tokens() {
        let messages = vec![ChatTurn::user("hi")];
        let body = OpenAiRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.5,
            max_tokens: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "gpt-4o-mini");
        assert_eq!(v["messages"][0]["role"], "user");
        assert!(v.get("max_tokens").is_none());

        let capped = OpenAiRequest {
            max_tokens: Some(200),
            ..body
        };
        assert_eq!(serde_json::to_value(&capped).unwrap()["max_tokens"], 200);
    }

    #[test]
    fn test_anthropic_body_sends_turns_unchanged() {
        let messages = vec![ChatTurn::user("You are a smart personal finance assistant.\nhi")];
        let body = AnthropicRequest {
            model: "claude-test",
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: &messages,
            temperature: 0.4,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["messages"][0]["role"], "user");
        assert!(v.get("system").is_none());
    }

    #[test]
    fn test_openai_response_text_is_trimmed() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  Spend less on coffee.\n"}}]}"#;
        let resp: OpenAiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), "Spend less on coffee.");

        let empty: OpenAiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_anthropic_response_joins_text_blocks() {
        let raw = r#"{"content":[{"type":"text","text":"Income 200.00, "},{"type":"tool_use"},{"type":"text","text":"spend 50.00. "}]}"#;
        let resp: AnthropicResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), "Income 200.00, spend 50.00.");
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(serde_json::to_value(Provider::OpenAI).unwrap(), "openai");
        let p: Provider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(p, Provider::Anthropic);
        assert_eq!(p.key_env_var(), "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_base_url_defaults_and_trailing_slash() {
        let c = HttpCompleter::new(Provider::Anthropic, None, "k".into(), 0.2);
        assert_eq!(c.base_url, "https://api.anthropic.com");
        let c = HttpCompleter::new(Provider::OpenAI, Some("http://localhost:8080/"), "k".into(), 0.2);
        assert_eq!(c.base_url, "http://localhost:8080");
    }
}
