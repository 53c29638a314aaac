//! Together.ai chat-completions enhancer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::enhance::{EnhanceError, Enhancer};

/// Chat-completions endpoint
pub const TOGETHER_API_URL: &str = "https://api.together.xyz/v1/chat/completions";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// USD per million tokens for the default model
const PRICE_PER_MILLION_TOKENS: f64 = 0.2;

const SYSTEM_PROMPT: &str = "You are a markdown formatting expert. Improve the formatting while \
preserving all information and links. Focus on:
1. Consistent spacing between sections
2. Beautiful list formatting
3. Proper code block presentation
4. Clear section hierarchy
5. Clean link and inline code formatting

Return ONLY the raw markdown content.";

/// Settings for [`TogetherEnhancer`]
#[derive(Debug, Clone)]
pub struct TogetherConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub endpoint: String,
}

impl TogetherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.1,
            endpoint: TOGETHER_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Estimated cost in USD of a request
fn estimate_cost(total_tokens: u64) -> f64 {
    total_tokens as f64 / 1_000_000.0 * PRICE_PER_MILLION_TOKENS
}

fn build_request<'a>(config: &'a TogetherConfig, markdown: &str) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!("Here is the markdown content to improve:\n\n{markdown}"),
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        stream: false,
    }
}

/// Pull the reply out of a response, logging token usage
fn reply_content(response: ChatResponse) -> Result<String, EnhanceError> {
    if let Some(usage) = &response.usage {
        info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            cost_usd = estimate_cost(usage.total_tokens),
            "together token usage"
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(EnhanceError::EmptyResponse)
}

/// Enhancer backed by the Together.ai chat-completions API
pub struct TogetherEnhancer {
    client: Client,
    config: TogetherConfig,
}

impl TogetherEnhancer {
    pub fn new(config: TogetherConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Enhancer for TogetherEnhancer {
    fn name(&self) -> &str {
        "together"
    }

    async fn enhance(&self, markdown: &str) -> Result<String, EnhanceError> {
        let body = build_request(&self.config, markdown);

        debug!(
            model = %self.config.model,
            chars = markdown.len(),
            "sending markdown to Together"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EnhanceError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EnhanceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnhanceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::Transport(format!("invalid response body: {e}")))?;

        reply_content(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let config = TogetherConfig::new("key").with_model("m");
        let value = serde_json::to_value(build_request(&config, "# Doc")).unwrap();

        assert_eq!(value["model"], "m");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert!(value["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("\n\n# Doc"));
    }

    #[test]
    fn test_defaults() {
        let config = TogetherConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, TOGETHER_API_URL);
        assert_eq!(config.max_tokens, 4000);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reply_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "  # Better\n"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .unwrap();
        assert_eq!(reply_content(response).unwrap(), "# Better");
    }

    #[test]
    fn test_empty_reply_is_an_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            reply_content(response),
            Err(EnhanceError::EmptyResponse)
        ));

        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            reply_content(response),
            Err(EnhanceError::EmptyResponse)
        ));
    }

    #[test]
    fn test_estimate_cost() {
        assert!((estimate_cost(1_000_000) - 0.2).abs() < 1e-12);
        assert_eq!(estimate_cost(0), 0.0);
    }
}
