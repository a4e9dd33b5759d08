//! Error types for the language-model oracle.

use citysim_core::OracleError;

/// Errors that can occur while asking a language model for a judgment.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// The backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// The model answered but no usable JSON could be recovered.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Backend configuration is invalid or incomplete.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<LlmError> for OracleError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(msg) => Self::Malformed(msg),
            LlmError::Serde(e) => Self::Malformed(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failures_are_malformed_output() {
        let err: OracleError = LlmError::Parse(String::from("no json")).into();
        assert_eq!(err, OracleError::Malformed(String::from("no json")));
    }

    #[test]
    fn transport_failures_are_unavailable() {
        let err: OracleError = LlmError::Backend(String::from("503")).into();
        assert!(matches!(err, OracleError::Unavailable(msg) if msg.contains("503")));
    }
}
