//! Prompt templates via `minijinja`.
//!
//! Templates live on disk (default `templates/`) so operators can tune the
//! oracle without recompiling. Every request renders the shared
//! `system.j2` plus the template for its operation, both against the same
//! serialized context.

use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::error::LlmError;

/// The operations the oracle renders prompts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Free-text plan to tool call.
    ResolvePlan,
    /// Judgment of a generic tool call.
    InterpretAction,
    /// Rule proposals after a successful action.
    SynthesizeRules,
}

impl Template {
    /// Every operation template.
    pub const ALL: [Self; 3] = [Self::ResolvePlan, Self::InterpretAction, Self::SynthesizeRules];

    /// File name in the template directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::ResolvePlan => "resolve_plan.j2",
            Self::InterpretAction => "interpret_action.j2",
            Self::SynthesizeRules => "synthesize_rules.j2",
        }
    }

    const fn temperature(self) -> f64 {
        match self {
            Self::ResolvePlan => 0.2,
            Self::InterpretAction => 0.7,
            Self::SynthesizeRules => 0.4,
        }
    }

    const fn max_tokens(self) -> u32 {
        match self {
            Self::ResolvePlan => 300,
            Self::InterpretAction => 800,
            Self::SynthesizeRules => 600,
        }
    }
}

const SYSTEM: &str = "system.j2";

/// A prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    /// System message.
    pub system: String,
    /// User message.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Reply length limit.
    pub max_tokens: u32,
}

/// Loaded prompt templates.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Load templates from `dir`.
    ///
    /// Fails unless `system.j2` and every operation template are present
    /// and compile.
    pub fn new(dir: &Path) -> Result<Self, LlmError> {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        let engine = Self { env };
        for name in Template::ALL.into_iter().map(Template::file_name).chain([SYSTEM]) {
            engine.env.get_template(name).map_err(|e| {
                LlmError::Template(format!("failed to load {name} from {}: {e}", dir.display()))
            })?;
        }
        Ok(engine)
    }

    /// Render the prompt for `template` against `ctx`.
    pub fn render<S: Serialize>(&self, template: Template, ctx: &S) -> Result<RenderedPrompt, LlmError> {
        let system = self.render_one(SYSTEM, ctx)?;
        let user = self.render_one(template.file_name(), ctx)?;
        Ok(RenderedPrompt {
            system,
            user,
            temperature: template.temperature(),
            max_tokens: template.max_tokens(),
        })
    }

    fn render_one<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, LlmError> {
        self.env
            .get_template(name)
            .map_err(|e| LlmError::Template(format!("missing {name}: {e}")))?
            .render(ctx)
            .map_err(|e| LlmError::Template(format!("{name} render failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("citysim-prompts-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_templates(dir: &Path) {
        std::fs::write(dir.join(SYSTEM), "You run {{ city }}.").unwrap();
        std::fs::write(dir.join("resolve_plan.j2"), "Plan: {{ plan }}").unwrap();
        std::fs::write(dir.join("interpret_action.j2"), "Judge {{ plan }}").unwrap();
        std::fs::write(
            dir.join("synthesize_rules.j2"),
            "{% for r in rules %}- {{ r }}\n{% endfor %}",
        )
        .unwrap();
    }

    #[test]
    fn renders_system_and_operation() {
        let dir = scratch_dir("render");
        write_templates(&dir);
        let engine = PromptEngine::new(&dir).unwrap();
        let ctx = serde_json::json!({"city": "Shenzhen", "plan": "find work", "rules": ["a", "b"]});

        let plan = engine.render(Template::ResolvePlan, &ctx).unwrap();
        assert_eq!(plan.system, "You run Shenzhen.");
        assert_eq!(plan.user, "Plan: find work");

        let rules = engine.render(Template::SynthesizeRules, &ctx).unwrap();
        assert!(rules.user.contains("- a"));
        assert!(rules.max_tokens > 0);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_template_fails_at_load() {
        let dir = scratch_dir("missing");
        std::fs::write(dir.join(SYSTEM), "system").unwrap();
        let err = PromptEngine::new(&dir).unwrap_err();
        assert!(err.to_string().contains("resolve_plan.j2"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn shipped_templates_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        assert!(PromptEngine::new(&dir).is_ok());
    }
}
