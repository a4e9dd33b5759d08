//! Backend configuration from environment variables.
//!
//! | Variable        | Meaning                                        |
//! |-----------------|------------------------------------------------|
//! | `LLM_BACKEND`   | `openai`, `deepseek`, `ollama`, `anthropic`, `claude` |
//! | `LLM_API_URL`   | Base URL, without the endpoint path            |
//! | `LLM_API_KEY`   | API key (may be empty for local servers)       |
//! | `LLM_MODEL`     | Model name                                     |
//! | `TEMPLATES_DIR` | Prompt template directory (default `templates`)|
//!
//! An unset `LLM_BACKEND` means no language model is configured.

use std::path::PathBuf;

use crate::error::LlmError;

/// Default prompt template directory.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Which wire protocol the backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// OpenAI-compatible chat completions.
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as operators write it.
    pub fn parse(name: &str) -> Result<Self, LlmError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LlmError::Config(format!("unknown LLM backend: {other}"))),
        }
    }
}

/// Everything needed to reach one language-model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Wire protocol.
    pub backend_type: BackendType,
    /// Base URL.
    pub api_url: String,
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Prompt template directory.
    pub templates_dir: PathBuf,
}

impl OracleConfig {
    /// Read the configuration from the process environment.
    ///
    /// Returns `Ok(None)` when `LLM_BACKEND` is unset.
    pub fn from_env() -> Result<Option<Self>, LlmError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(backend) = lookup("LLM_BACKEND").filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| LlmError::Config(format!("missing environment variable: {name}")))
        };
        Ok(Some(Self {
            backend_type: BackendType::parse(&backend)?,
            api_url: required("LLM_API_URL")?.trim_end_matches('/').to_owned(),
            api_key: lookup("LLM_API_KEY").unwrap_or_default(),
            model: required("LLM_MODEL")?,
            templates_dir: lookup("TEMPLATES_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR), PathBuf::from),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_backend_means_no_oracle() {
        assert!(OracleConfig::from_lookup(lookup(&[])).unwrap().is_none());
    }

    #[test]
    fn backend_aliases() {
        assert_eq!(BackendType::parse("DeepSeek").unwrap(), BackendType::OpenAi);
        assert_eq!(BackendType::parse("claude").unwrap(), BackendType::Anthropic);
        assert!(BackendType::parse("carrier-pigeon").is_err());
    }

    #[test]
    fn full_configuration() {
        let config = OracleConfig::from_lookup(lookup(&[
            ("LLM_BACKEND", "ollama"),
            ("LLM_API_URL", "http://localhost:11434/v1/"),
            ("LLM_MODEL", "qwen2.5"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.backend_type, BackendType::OpenAi);
        assert_eq!(config.api_url, "http://localhost:11434/v1");
        assert!(config.api_key.is_empty());
        assert_eq!(config.templates_dir, PathBuf::from(DEFAULT_TEMPLATES_DIR));
    }

    #[test]
    fn missing_model_is_an_error() {
        let err = OracleConfig::from_lookup(lookup(&[
            ("LLM_BACKEND", "anthropic"),
            ("LLM_API_URL", "https://api.anthropic.com/v1"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LLM_MODEL"));
    }
}
