//! Language-model judgment oracle for the citysim world engine.
//!
//! Implements [`citysim_core::Oracle`] by rendering a prompt from the
//! request context, sending it to an OpenAI-compatible or Anthropic
//! backend and recovering JSON from the reply.
//!
//! # Modules
//!
//! - [`config`] -- Backend settings from environment variables.
//! - [`llm`] -- The HTTP backends.
//! - [`prompt`] -- `minijinja` templates loaded from disk.
//! - [`parse`] -- Tolerant parsing of model output.
//! - [`error`] -- [`LlmError`] and its mapping onto [`OracleError`].

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;

use serde::Serialize;
use tracing::{debug, info};

use citysim_core::oracle::{
    ActionContext, Oracle, OracleFuture, PlanContext, SynthesisContext,
};
use citysim_types::{Judgment, RuleDraft, ToolCall};

pub use config::OracleConfig;
pub use error::LlmError;

use crate::llm::{LlmBackend, create_backend};
use crate::prompt::{PromptEngine, Template};

/// An [`Oracle`] backed by a language model.
#[derive(Debug)]
pub struct LlmOracle {
    backend: LlmBackend,
    prompts: PromptEngine,
}

impl LlmOracle {
    /// Build an oracle from explicit settings. Templates are loaded now.
    pub fn new(config: &OracleConfig) -> Result<Self, LlmError> {
        let prompts = PromptEngine::new(&config.templates_dir)?;
        let backend = create_backend(config);
        info!(
            backend = backend.name(),
            model = %config.model,
            templates = %config.templates_dir.display(),
            "language-model oracle ready"
        );
        Ok(Self { backend, prompts })
    }

    /// Build an oracle from the environment, or `None` when no backend is
    /// configured.
    pub fn from_env() -> Result<Option<Self>, LlmError> {
        OracleConfig::from_env()?.map(|config| Self::new(&config)).transpose()
    }

    async fn ask<S: Serialize + Sync>(&self, template: Template, ctx: &S) -> Result<String, LlmError> {
        let prompt = self.prompts.render(template, ctx)?;
        let reply = self.backend.complete(&prompt).await?;
        debug!(
            backend = self.backend.name(),
            template = template.file_name(),
            reply_len = reply.len(),
            "oracle reply"
        );
        Ok(reply)
    }
}

/// Judgment context plus the tool call pre-rendered as JSON.
#[derive(Serialize)]
struct JudgeView<'a> {
    #[serde(flatten)]
    ctx: &'a ActionContext,
    tool_call_json: String,
}

impl Oracle for LlmOracle {
    fn resolve_plan<'a>(&'a self, ctx: &'a PlanContext) -> OracleFuture<'a, ToolCall> {
        Box::pin(async move {
            let reply = self.ask(Template::ResolvePlan, ctx).await?;
            Ok(parse::parse_tool_call(&reply, &ctx.plan)?)
        })
    }

    fn interpret_action<'a>(&'a self, ctx: &'a ActionContext) -> OracleFuture<'a, Judgment> {
        Box::pin(async move {
            let view = JudgeView {
                ctx,
                tool_call_json: serde_json::to_string(&ctx.tool_call).map_err(LlmError::from)?,
            };
            let reply = self.ask(Template::InterpretAction, &view).await?;
            Ok(parse::parse_judgment(&reply)?)
        })
    }

    fn synthesize_rules<'a>(&'a self, ctx: &'a SynthesisContext) -> OracleFuture<'a, Vec<RuleDraft>> {
        Box::pin(async move {
            let reply = self.ask(Template::SynthesizeRules, ctx).await?;
            Ok(parse::parse_rule_drafts(&reply)?)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use citysim_core::OracleError;
    use citysim_core::oracle::ActorBrief;

    use super::*;
    use crate::config::BackendType;

    fn offline_config() -> OracleConfig {
        OracleConfig {
            backend_type: BackendType::OpenAi,
            api_url: String::from("http://127.0.0.1:9"),
            api_key: String::new(),
            model: String::from("offline"),
            templates_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates"),
        }
    }

    fn plan_context() -> PlanContext {
        PlanContext {
            actor: ActorBrief {
                id: String::from("bot_1"),
                name: String::from("Lin"),
                age: 24,
                gender: String::from("female"),
                personality: String::from("restless"),
                money: 300,
                energy: 80,
                satiety: 60,
                hp: 100.0,
                skills: vec![(String::from("tech"), 2)],
            },
            location: String::from("Huaqiangbei"),
            locations: vec![String::from("Huaqiangbei"), String::from("Nanshan Tech Park")],
            nearby: Vec::new(),
            npcs: vec![String::from("Uncle Wang")],
            creations: Vec::new(),
            plan: String::from("look for a job"),
        }
    }

    #[test]
    fn shipped_templates_render_a_plan_prompt() {
        let oracle = LlmOracle::new(&offline_config()).unwrap();
        let prompt = oracle.prompts.render(Template::ResolvePlan, &plan_context()).unwrap();
        assert!(prompt.user.contains("look for a job"));
        assert!(prompt.user.contains("Nanshan Tech Park"));
        assert!(!prompt.system.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        let oracle = LlmOracle::new(&offline_config()).unwrap();
        let ctx = plan_context();
        let err = oracle.resolve_plan(&ctx).await.unwrap_err();
        assert!(matches!(err, OracleError::Unavailable(_)));
    }

    #[test]
    fn missing_templates_fail_construction() {
        let mut config = offline_config();
        config.templates_dir = std::env::temp_dir().join("citysim-no-templates-here");
        assert!(matches!(LlmOracle::new(&config), Err(LlmError::Template(_))));
    }
}
