//! LLM backends.
//!
//! Enum dispatch over the two wire protocols we speak, because async
//! methods are not dyn-compatible. Both backends send one system message
//! and one user message and hand back the raw text of the reply.

use tracing::debug;

use crate::config::{BackendType, OracleConfig};
use crate::error::LlmError;
use crate::prompt::RenderedPrompt;

/// A backend that turns a rendered prompt into reply text.
#[derive(Debug)]
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt and return the reply text.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, LlmError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Shared connection settings.
#[derive(Debug)]
struct Endpoint {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Endpoint {
    fn new(config: &OracleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn send(
        request: reqwest::RequestBuilder,
        body: &serde_json::Value,
        vendor: &str,
    ) -> Result<serde_json::Value, LlmError> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Backend(format!("{vendor} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(LlmError::Backend(format!(
                "{vendor} returned {status}: {error_body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::Backend(format!("{vendor} response parse failed: {e}")))
    }
}

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Works with `OpenAI`, `DeepSeek` and Ollama endpoints.
#[derive(Debug)]
pub struct OpenAiBackend {
    endpoint: Endpoint,
}

impl OpenAiBackend {
    /// Create a backend for `{api_url}/chat/completions`.
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint.api_url);
        let body = serde_json::json!({
            "model": self.endpoint.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": prompt.temperature,
            "max_tokens": prompt.max_tokens,
        });
        let request = self
            .endpoint
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.endpoint.api_key));
        let json = Endpoint::send(request, &body, "OpenAI").await?;
        debug!(model = %self.endpoint.model, "chat completion received");
        extract_openai_content(&json)
    }
}

/// Extract `choices[0].message.content` from a chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, LlmError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            LlmError::Backend("OpenAI response missing choices[0].message.content".to_owned())
        })
}

/// Backend for the Anthropic Messages API.
///
/// The system prompt is a top-level field, the key goes in `x-api-key`
/// and the reply text is at `content[0].text`.
#[derive(Debug)]
pub struct AnthropicBackend {
    endpoint: Endpoint,
}

impl AnthropicBackend {
    /// Create a backend for `{api_url}/messages`.
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, LlmError> {
        let url = format!("{}/messages", self.endpoint.api_url);
        let body = serde_json::json!({
            "model": self.endpoint.model,
            "max_tokens": prompt.max_tokens,
            "temperature": prompt.temperature,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });
        let request = self
            .endpoint
            .client
            .post(&url)
            .header("x-api-key", &self.endpoint.api_key)
            .header("anthropic-version", "2023-06-01");
        let json = Endpoint::send(request, &body, "Anthropic").await?;
        debug!(model = %self.endpoint.model, "message received");
        extract_anthropic_content(&json)
    }
}

/// Extract `content[0].text` from a Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, LlmError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| LlmError::Backend("Anthropic response missing content[0].text".to_owned()))
}

/// Create the backend `config` asks for.
pub fn create_backend(config: &OracleConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(backend_type: BackendType) -> OracleConfig {
        OracleConfig {
            backend_type,
            api_url: String::from("http://localhost:9"),
            api_key: String::new(),
            model: String::from("test-model"),
            templates_dir: PathBuf::from("templates"),
        }
    }

    #[test]
    fn openai_content_is_extracted() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"tool\": \"move\"}"}}]
        });
        assert_eq!(extract_openai_content(&json).unwrap(), "{\"tool\": \"move\"}");
    }

    #[test]
    fn openai_without_choices_is_an_error() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_openai_content(&json).is_err());
    }

    #[test]
    fn anthropic_content_is_extracted() {
        let json = serde_json::json!({
            "content": [{"type": "text", "text": "[]"}]
        });
        assert_eq!(extract_anthropic_content(&json).unwrap(), "[]");
    }

    #[test]
    fn anthropic_without_text_is_an_error() {
        let json = serde_json::json!({"content": [{"type": "tool_use"}]});
        assert!(extract_anthropic_content(&json).is_err());
    }

    #[test]
    fn factory_follows_the_backend_type() {
        assert_eq!(create_backend(&config(BackendType::OpenAi)).name(), "openai-compatible");
        assert_eq!(create_backend(&config(BackendType::Anthropic)).name(), "anthropic");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_backend_error() {
        let backend = create_backend(&config(BackendType::OpenAi));
        let prompt = RenderedPrompt {
            system: String::from("s"),
            user: String::from("u"),
            temperature: 0.5,
            max_tokens: 16,
        };
        let err = backend.complete(&prompt).await.unwrap_err();
        assert!(matches!(err, LlmError::Backend(_)));
    }
}
