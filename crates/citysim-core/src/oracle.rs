//! The judgment seam.
//!
//! Deciding what an action *means* is delegated to an [`Oracle`]: turning a
//! free-text plan into a [`ToolCall`], judging the consequences of a
//! generic tool call, and proposing new rules after a successful action.
//! The engine never trusts an oracle's numbers; everything it returns is
//! clamped and validated before it touches state.
//!
//! Oracle methods return boxed futures so the engine can hold an
//! `Arc<dyn Oracle>` and swap the language-model backend for the
//! deterministic [`FakeOracle`] in tests or when no backend is configured.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use serde::Serialize;

use citysim_types::{
    InteractArgs, Judgment, RuleDraft, RuleSummary, SocialEffect, ToolCall, UseResourceArgs,
};
use citysim_world::resolve_location;

/// Errors an oracle can report. All of them make the engine fall back to
/// a conservative default.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The backend could not be reached or answered with an error.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The backend answered but the output could not be parsed.
    #[error("malformed oracle output: {0}")]
    Malformed(String),

    /// The call exceeded its deadline.
    #[error("oracle timed out after {ms}ms")]
    Timeout {
        /// The deadline in milliseconds.
        ms: u64,
    },
}

/// Boxed future returned by [`Oracle`] methods.
pub type OracleFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, OracleError>> + Send + 'a>>;

/// Compact description of the acting bot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorBrief {
    /// Slot id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender label.
    pub gender: String,
    /// Personality sketch, shortened.
    pub personality: String,
    /// Money on hand.
    pub money: u64,
    /// Energy 0--100.
    pub energy: u32,
    /// Satiety 0--100.
    pub satiety: u32,
    /// HP 0--100.
    pub hp: f64,
    /// Skill levels as `name: level` pairs.
    pub skills: Vec<(String, u32)>,
}

/// Someone else at the actor's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    /// Slot id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What they are doing.
    pub activity: String,
}

/// Input for turning a free-text plan into a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanContext {
    /// Who is acting.
    pub actor: ActorBrief,
    /// Where the actor is.
    pub location: String,
    /// Every location name.
    pub locations: Vec<String>,
    /// Bots nearby.
    pub nearby: Vec<Neighbor>,
    /// NPC names at the location.
    pub npcs: Vec<String>,
    /// Creations already at the location.
    pub creations: Vec<String>,
    /// The plan text.
    pub plan: String,
}

/// Input for judging a generic tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionContext {
    /// Who is acting.
    pub actor: ActorBrief,
    /// Where the actor is.
    pub location: String,
    /// Bots nearby.
    pub nearby: Vec<Neighbor>,
    /// NPC names at the location.
    pub npcs: Vec<String>,
    /// Creations already at the location, as `name (by creator)`.
    pub creations: Vec<String>,
    /// Weather label.
    pub weather: String,
    /// Virtual timestamp.
    pub time: String,
    /// The call being judged.
    pub tool_call: ToolCall,
}

/// Input for proposing new rules after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisContext {
    /// Who acted.
    pub actor: ActorBrief,
    /// Where it happened.
    pub location: String,
    /// Description of the location.
    pub location_desc: String,
    /// The plan or tool description.
    pub action_desc: String,
    /// What happened.
    pub narrative: String,
    /// Currently active rules, most recent last.
    pub active_rules: Vec<RuleSummary>,
}

/// External judgment collaborator.
pub trait Oracle: Send + Sync {
    /// Turn a free-text plan into a tool call.
    fn resolve_plan<'a>(&'a self, ctx: &'a PlanContext) -> OracleFuture<'a, ToolCall>;

    /// Judge the consequences of a generic tool call.
    fn interpret_action<'a>(&'a self, ctx: &'a ActionContext) -> OracleFuture<'a, Judgment>;

    /// Propose zero or more new rules after a successful action.
    fn synthesize_rules<'a>(&'a self, ctx: &'a SynthesisContext) -> OracleFuture<'a, Vec<RuleDraft>>;
}

/// Deterministic oracle used in tests and when no backend is configured.
///
/// Plans are resolved by keyword: a location name becomes a move, a
/// mention of work becomes a job request, a nearby bot's name becomes an
/// interaction, anything else becomes exploring in place. Judgments are
/// the conservative fallback unless one has been scripted.
#[derive(Debug, Default)]
pub struct FakeOracle {
    judgment: Mutex<Option<Judgment>>,
    drafts: Mutex<Vec<RuleDraft>>,
    failing: bool,
}

impl FakeOracle {
    /// An oracle that answers with fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Answer every judgment with `judgment`.
    #[must_use]
    pub fn with_judgment(self, judgment: Judgment) -> Self {
        if let Ok(mut slot) = self.judgment.lock() {
            *slot = Some(judgment);
        }
        self
    }

    /// Answer every synthesis request with `drafts`.
    #[must_use]
    pub fn with_drafts(self, drafts: Vec<RuleDraft>) -> Self {
        if let Ok(mut slot) = self.drafts.lock() {
            *slot = drafts;
        }
        self
    }

    fn check(&self) -> Result<(), OracleError> {
        if self.failing {
            return Err(OracleError::Unavailable(String::from("scripted failure")));
        }
        Ok(())
    }

    fn plan_to_call(ctx: &PlanContext) -> ToolCall {
        let plan = ctx.plan.to_lowercase();
        let desc = ctx.plan.clone();
        if let Some(dest) = ctx
            .locations
            .iter()
            .find(|l| plan.contains(&l.to_lowercase()) && **l != ctx.location)
            .and_then(|l| resolve_location(l).ok())
        {
            return ToolCall::Move {
                args: citysim_types::MoveArgs {
                    destination: dest.to_owned(),
                    mode: citysim_types::TravelMode::Walk,
                },
                desc,
            };
        }
        if plan.contains("work") || plan.contains("job") || plan.contains("打工") {
            return ToolCall::UseResource {
                args: UseResourceArgs {
                    resource: String::from("job"),
                    amount: 0,
                    purpose: String::new(),
                },
                desc,
            };
        }
        if let Some(n) = ctx
            .nearby
            .iter()
            .find(|n| plan.contains(&n.name.to_lowercase()))
        {
            return ToolCall::Interact {
                args: InteractArgs {
                    target: n.id.clone(),
                    manner: String::from("casual"),
                    content: ctx.plan.clone(),
                },
                desc,
            };
        }
        ToolCall::explore(&ctx.location)
    }

    fn judge(&self, ctx: &ActionContext) -> Judgment {
        if let Ok(slot) = self.judgment.lock()
            && let Some(j) = slot.as_ref()
        {
            return j.clone();
        }
        let mut judgment = Judgment::fallback(&ctx.actor.name, ctx.tool_call.desc());
        if let ToolCall::Interact { args, .. } = &ctx.tool_call
            && ctx.nearby.iter().any(|n| n.id == args.target || n.name == args.target)
        {
            judgment.social_effects.push(SocialEffect {
                target: args.target.clone(),
                effect: String::from("had a chat"),
                warmth_delta: 1,
            });
        }
        judgment
    }
}

impl Oracle for FakeOracle {
    fn resolve_plan<'a>(&'a self, ctx: &'a PlanContext) -> OracleFuture<'a, ToolCall> {
        Box::pin(async move {
            self.check()?;
            Ok(Self::plan_to_call(ctx))
        })
    }

    fn interpret_action<'a>(&'a self, ctx: &'a ActionContext) -> OracleFuture<'a, Judgment> {
        Box::pin(async move {
            self.check()?;
            Ok(self.judge(ctx))
        })
    }

    fn synthesize_rules<'a>(&'a self, _ctx: &'a SynthesisContext) -> OracleFuture<'a, Vec<RuleDraft>> {
        Box::pin(async move {
            self.check()?;
            Ok(self.drafts.lock().map(|d| d.clone()).unwrap_or_default())
        })
    }
}
