//! LLM Client: the single point of entry for all text-generation calls in Diwan.
//!
//! ARCHITECTURAL RULE: No other module may call a model provider directly.
//! Services depend on the `TextGenerator` trait; `LlmClient` is the HTTP-backed
//! implementation speaking either the OpenAI or the Anthropic wire format.
//!
//! Every call is a single-message exchange. No history is kept between calls,
//! and each caller supplies its own conversation id.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Which wire protocol the client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

#[derive(Debug, Error)]
#[error("unknown LLM provider '{0}' (expected 'openai' or 'anthropic')")]
pub struct UnknownProvider(String);

impl LlmProvider {
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Anthropic => "claude-sonnet-4-5",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => OPENAI_BASE_URL,
            LlmProvider::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => f.write_str("openai"),
            LlmProvider::Anthropic => f.write_str("anthropic"),
        }
    }
}

/// One stateless generation request.
#[derive(Debug, Clone, Copy)]
pub struct GenerationCall<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    /// Opaque id scoping this single exchange. Never shared between calls.
    pub conversation_id: Uuid,
    pub timeout: Duration,
}

/// The text generation capability. Implement this to swap providers (or to
/// stub them in tests) without touching the services that call it.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, call: GenerationCall<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    user: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
    metadata: AnthropicMetadata,
}

#[derive(Debug, Serialize)]
struct AnthropicMetadata {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Both providers wrap failures as `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// HTTP-backed text generator used in production.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    model: String,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(
        provider: LlmProvider,
        model: String,
        api_key: String,
        base_url: Option<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(LlmError::Http)?;

        let base_url = base_url
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            provider,
            model,
            api_key,
            base_url,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_openai(&self, call: &GenerationCall<'_>) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: call.system,
                },
                ChatMessage {
                    role: "user",
                    content: call.prompt,
                },
            ],
            user: call.conversation_id.to_string(),
        };

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);

        let raw = self.send(request, call.timeout).await?;
        openai_text(&raw)
    }

    async fn call_anthropic(&self, call: &GenerationCall<'_>) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: call.system,
            messages: vec![ChatMessage {
                role: "user",
                content: call.prompt,
            }],
            metadata: AnthropicMetadata {
                user_id: call.conversation_id.to_string(),
            },
        };

        let request = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let raw = self.send(request, call.timeout).await?;
        anthropic_text(&raw)
    }

    /// Sends one request and returns the raw success body. No retries.
    async fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<String, LlmError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, timeout))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: self.scrub(&message),
            });
        }

        Ok(body)
    }

    /// Removes the API key from provider-supplied text before it travels upward.
    fn scrub(&self, message: &str) -> String {
        if self.api_key.is_empty() {
            message.to_string()
        } else {
            message.replace(&self.api_key, "[redacted]")
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, call: GenerationCall<'_>) -> Result<String, LlmError> {
        match self.provider {
            LlmProvider::OpenAi => self.call_openai(&call).await,
            LlmProvider::Anthropic => self.call_anthropic(&call).await,
        }
    }
}

fn classify_transport_error(error: reqwest::Error, timeout: Duration) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Http(error)
    }
}

/// Extracts the completion text from a Chat Completions body.
fn openai_text(body: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;

    if let Some(usage) = &response.usage {
        debug!(
            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

/// Extracts the text of the first text block from a Messages API body.
fn anthropic_text(body: &str) -> Result<String, LlmError> {
    let response: AnthropicResponse = serde_json::from_str(body)?;

    if let Some(usage) = &response.usage {
        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            usage.input_tokens, usage.output_tokens
        );
    }

    response
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn call<'a>(prompt: &'a str, timeout: Duration) -> GenerationCall<'a> {
        GenerationCall {
            system: "system instruction",
            prompt,
            conversation_id: Uuid::new_v4(),
            timeout,
        }
    }

    fn client_for(server: &MockServer, provider: LlmProvider) -> LlmClient {
        LlmClient::new(
            provider,
            provider.default_model().to_string(),
            "test-key".to_string(),
            Some(server.base_url()),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_from_str_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            " anthropic ".parse::<LlmProvider>().unwrap(),
            LlmProvider::Anthropic
        );
        assert!("gemini".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_openai_text_takes_first_choice() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "شرح"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
        })
        .to_string();
        assert_eq!(openai_text(&body).unwrap(), "شرح");
    }

    #[test]
    fn test_openai_text_without_choices_is_empty_content() {
        let body = json!({"choices": []}).to_string();
        assert!(matches!(openai_text(&body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_anthropic_text_skips_non_text_blocks() {
        let body = json!({
            "content": [
                {"type": "thinking", "text": null},
                {"type": "text", "text": "explanation"}
            ]
        })
        .to_string();
        assert_eq!(anthropic_text(&body).unwrap(), "explanation");
    }

    #[test]
    fn test_anthropic_text_blank_is_empty_content() {
        let body = json!({"content": [{"type": "text", "text": "   "}]}).to_string();
        assert!(matches!(anthropic_text(&body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        assert!(matches!(openai_text("not json"), Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_openai_request_carries_conversation_id_and_auth() {
        let server = MockServer::start_async().await;
        let generation = call("prompt text", Duration::from_secs(5));
        let conversation_id = generation.conversation_id.to_string();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .body_contains(conversation_id.as_str())
                    .body_contains("prompt text");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"content": "generated"}}]
                }));
            })
            .await;

        let client = client_for(&server, LlmProvider::OpenAi);
        let text = client.generate(generation).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "generated");
    }

    #[tokio::test]
    async fn test_anthropic_request_uses_messages_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/messages")
                    .header("x-api-key", "test-key")
                    .header("anthropic-version", ANTHROPIC_VERSION);
                then.status(200).json_body(json!({
                    "content": [{"type": "text", "text": "generated"}]
                }));
            })
            .await;

        let client = client_for(&server, LlmProvider::Anthropic);
        let text = client
            .generate(call("prompt", Duration::from_secs(5)))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "generated");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error_without_key() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(401).json_body(json!({
                    "error": {"message": "Incorrect API key provided: test-key"}
                }));
            })
            .await;

        let client = client_for(&server, LlmProvider::OpenAi);
        let err = client
            .generate(call("prompt", Duration::from_secs(5)))
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(!message.contains("test-key"));
                assert!(message.contains("[redacted]"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"choices": [{"message": {"content": "late"}}]}));
            })
            .await;

        let client = client_for(&server, LlmProvider::OpenAi);
        let err = client
            .generate(call("prompt", Duration::from_millis(50)))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Timeout(_)), "got {err:?}");
    }
}
