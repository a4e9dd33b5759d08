//! Action request and result types.
//!
//! A decision loop submits an [`ActionRequest`] holding a free-text plan and
//! optionally a pre-resolved [`ToolCall`]. The pipeline answers with an
//! [`ActionOutcome`]: what the request resolved to and an
//! [`ActionFeedback`] describing what happened.
//!
//! Generic tools go through an external [`Judgment`]. Every numeric field of
//! a judgment is untrusted and is clamped before it touches state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ModificationKind, Skill, TravelMode};
use crate::rules::RuleSummary;

// ---------------------------------------------------------------------------
// Tool calls
// ---------------------------------------------------------------------------

/// Arguments of `use_resource`: eat, buy, work, rest, study.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UseResourceArgs {
    /// `money`, `energy`, `item` or `job`.
    #[serde(default)]
    pub resource: String,
    /// Amount the bot intends to spend.
    #[serde(default)]
    pub amount: i64,
    /// What for. For `job`, names the job to take.
    #[serde(default)]
    pub purpose: String,
}

/// Arguments of `interact`: talk, trade, quarrel with a bot or NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractArgs {
    /// Bot slot, bot name, NPC name or object.
    #[serde(default)]
    pub target: String,
    /// `friendly`, `hostile`, `business`, `romantic` or `casual`.
    #[serde(default)]
    pub manner: String,
    /// What is said or done.
    #[serde(default)]
    pub content: String,
}

/// Arguments of `move`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveArgs {
    /// Destination location name.
    pub destination: String,
    /// Travel mode.
    #[serde(default)]
    pub mode: TravelMode,
}

/// Arguments of `create`: open a stall, paint, plant, organize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CreateArgs {
    /// What to create.
    #[serde(default)]
    pub what: String,
    /// Where.
    #[serde(default, rename = "where")]
    pub place: String,
    /// Resources the bot intends to use.
    #[serde(default)]
    pub using: String,
}

/// Where an `express` call is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ExpressChannel {
    /// The public social feed.
    #[default]
    Moments,
    /// Talking to oneself.
    Monologue,
    /// Shouting so the whole place hears.
    Shout,
    /// Singing or performing.
    Perform,
}

/// Arguments of `express`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExpressArgs {
    /// Where the content goes.
    #[serde(default)]
    pub channel: ExpressChannel,
    /// The content.
    #[serde(default)]
    pub content: String,
}

/// One invocation of the fixed tool vocabulary.
///
/// Serialized as `{"tool": "move", "args": {...}, "desc": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "tool", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ToolCall {
    /// Spend a resource on something.
    UseResource {
        /// Arguments.
        #[serde(default)]
        args: UseResourceArgs,
        /// Original plan text.
        #[serde(default)]
        desc: String,
    },
    /// Interact with someone or something.
    Interact {
        /// Arguments.
        #[serde(default)]
        args: InteractArgs,
        /// Original plan text.
        #[serde(default)]
        desc: String,
    },
    /// Travel to another location.
    Move {
        /// Arguments.
        args: MoveArgs,
        /// Original plan text.
        #[serde(default)]
        desc: String,
    },
    /// Make something.
    Create {
        /// Arguments.
        #[serde(default)]
        args: CreateArgs,
        /// Original plan text.
        #[serde(default)]
        desc: String,
    },
    /// Post or say something.
    Express {
        /// Arguments.
        #[serde(default)]
        args: ExpressArgs,
        /// Original plan text.
        #[serde(default)]
        desc: String,
    },
}

impl ToolCall {
    /// Snake-case tool name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UseResource { .. } => "use_resource",
            Self::Interact { .. } => "interact",
            Self::Move { .. } => "move",
            Self::Create { .. } => "create",
            Self::Express { .. } => "express",
        }
    }

    /// Original plan text carried by the call.
    pub fn desc(&self) -> &str {
        match self {
            Self::UseResource { desc, .. }
            | Self::Interact { desc, .. }
            | Self::Move { desc, .. }
            | Self::Create { desc, .. }
            | Self::Express { desc, .. } => desc,
        }
    }

    /// An in-place wander, used when a move targets the current location.
    pub fn explore(location: &str) -> Self {
        let desc = format!("wander around {location}");
        Self::UseResource {
            args: UseResourceArgs {
                resource: String::from("energy"),
                amount: 3,
                purpose: desc.clone(),
            },
            desc,
        }
    }
}

/// A request submitted by a decision loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// Natural-language plan.
    pub plan: String,
    /// Pre-resolved tool call; resolved from `plan` when absent.
    #[serde(default)]
    pub tool_call: Option<ToolCall>,
}

/// What a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResolvedAction {
    /// The wake-up shortcut.
    WakeUp,
    /// The sleep shortcut.
    Sleep,
    /// A tool invocation.
    Tool {
        /// The call.
        call: ToolCall,
    },
    /// Nothing could be resolved; the conservative default ran.
    Fallback,
}

impl ResolvedAction {
    /// The tool call, when there is one.
    pub const fn tool_call(&self) -> Option<&ToolCall> {
        match self {
            Self::Tool { call } => Some(call),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Judgments
// ---------------------------------------------------------------------------

/// Category of a proposed world change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum WorldChangeKind {
    /// Something new exists.
    NewEntity,
    /// Something existing changed.
    ModifyEntity,
    /// Something was destroyed.
    DestroyEntity,
    /// Only the actor's standing changed.
    Reputation,
    /// News spread at the location.
    Information,
}

/// A world change proposed by a judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldChange {
    /// Category.
    #[serde(rename = "type")]
    pub change_type: WorldChangeKind,
    /// Known modification kind, which sets a floor on the cost.
    #[serde(default)]
    pub modification: Option<ModificationKind>,
    /// Name of the change.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Whether it becomes a permanent modification.
    #[serde(default)]
    pub permanent: bool,
    /// Stated money cost.
    #[serde(default)]
    pub cost_money: u64,
    /// Stated energy cost.
    #[serde(default)]
    pub cost_energy: u32,
}

/// A proposed effect on another party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SocialEffect {
    /// Bot slot or name.
    pub target: String,
    /// What it did to them.
    #[serde(default)]
    pub effect: String,
    /// Change in relationship warmth.
    #[serde(default)]
    pub warmth_delta: i32,
}

/// Structured consequence of a generic tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Judgment {
    /// Third-person narrative.
    #[serde(default)]
    pub narrative: String,
    /// Whether the action succeeded.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Money change.
    #[serde(default)]
    pub money_delta: i64,
    /// Energy change.
    #[serde(default)]
    pub energy_delta: i64,
    /// Satiety change.
    #[serde(default)]
    pub satiety_delta: i64,
    /// Happiness change.
    #[serde(default)]
    pub happiness_delta: i64,
    /// Skill that improves by one.
    #[serde(default)]
    pub skill_up: Option<Skill>,
    /// Proposed world change.
    #[serde(default)]
    pub world_change: Option<WorldChange>,
    /// Effects on other parties.
    #[serde(default)]
    pub social_effects: Vec<SocialEffect>,
    /// Things bystanders can notice.
    #[serde(default)]
    pub side_effects: Vec<String>,
    /// Direct feedback to the actor.
    #[serde(default)]
    pub feedback_to_actor: String,
}

const fn default_success() -> bool {
    true
}

impl Judgment {
    /// Conservative outcome used when no judgment is available.
    pub fn fallback(actor_name: &str, desc: &str) -> Self {
        Self {
            narrative: format!("{actor_name} tried to {desc}, but nothing special happened."),
            success: true,
            money_delta: 0,
            energy_delta: -3,
            satiety_delta: 0,
            happiness_delta: 0,
            skill_up: None,
            world_change: None,
            social_effects: Vec::new(),
            side_effects: Vec::new(),
            feedback_to_actor: String::from("Everything is as usual."),
        }
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Net resource changes reported back to the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceChanges {
    /// Money.
    pub money: i64,
    /// Energy.
    pub energy: i64,
    /// Satiety.
    pub satiety: i64,
    /// Happiness.
    pub happiness: i64,
}

/// Result of one resolved action, kept as the bot's last feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionFeedback {
    /// Plan that produced it.
    pub plan: String,
    /// Third-person narrative.
    pub narrative: String,
    /// Direct feedback to the actor.
    pub feedback: String,
    /// Whether the action succeeded.
    pub success: bool,
    /// Net resource changes.
    pub resource_changes: ResourceChanges,
    /// Name of the committed world change.
    pub world_change: Option<String>,
    /// Social-effect summaries.
    pub social_effects: Vec<String>,
    /// Rules the action spawned.
    pub rules_created: Vec<RuleSummary>,
}

impl ActionFeedback {
    /// Feedback with no resource changes.
    pub fn simple(plan: &str, narrative: impl Into<String>, feedback: impl Into<String>, success: bool) -> Self {
        Self {
            plan: plan.to_owned(),
            narrative: narrative.into(),
            feedback: feedback.into(),
            success,
            resource_changes: ResourceChanges::default(),
            world_change: None,
            social_effects: Vec::new(),
            rules_created: Vec::new(),
        }
    }
}

/// Response to an [`ActionRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionOutcome {
    /// What the request resolved to.
    pub action: ResolvedAction,
    /// What happened.
    pub result: ActionFeedback,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_uses_tool_tag_and_args() {
        let json = r#"{"tool": "move", "args": {"destination": "Huaqiangbei", "mode": "bus"}, "desc": "go shopping"}"#;
        let call: ToolCall = serde_json::from_str(json).unwrap();
        assert!(matches!(
            &call,
            ToolCall::Move { args, .. }
                if args.destination == "Huaqiangbei" && args.mode == TravelMode::Bus
        ));
        assert_eq!(call.desc(), "go shopping");
        assert_eq!(call.name(), "move");
    }

    #[test]
    fn create_args_accept_where_keyword() {
        let json = r#"{"tool": "create", "args": {"what": "noodle stall", "where": "Dongmen Old Street"}}"#;
        let call: ToolCall = serde_json::from_str(json).unwrap();
        assert!(matches!(call, ToolCall::Create { ref args, .. } if args.place == "Dongmen Old Street"));
    }

    #[test]
    fn judgment_tolerates_missing_fields() {
        let j: Judgment = serde_json::from_str(r#"{"narrative": "ok"}"#).unwrap();
        assert!(j.success);
        assert_eq!(j.money_delta, 0);
        assert!(j.world_change.is_none());
    }

    #[test]
    fn world_change_type_field() {
        let json = r#"{"type": "new_entity", "name": "mural", "permanent": true, "cost_money": 20}"#;
        let wc: WorldChange = serde_json::from_str(json).unwrap();
        assert_eq!(wc.change_type, WorldChangeKind::NewEntity);
        assert_eq!(wc.cost_money, 20);
        assert_eq!(wc.cost_energy, 0);
    }

    #[test]
    fn fallback_costs_a_little_energy() {
        let j = Judgment::fallback("Li Haoran", "look around");
        assert_eq!(j.energy_delta, -3);
        assert!(j.success);
        assert!(j.narrative.contains("nothing special"));
    }

    #[test]
    fn explore_targets_current_location() {
        let call = ToolCall::explore("Futian CBD");
        assert_eq!(call.name(), "use_resource");
        assert!(call.desc().contains("Futian CBD"));
    }
}
