//! Rule records and the rule DSL.
//!
//! A rule is data: a trigger, a [`Condition`] tree and an ordered list of
//! [`Effect`]s, interpreted every tick by the rule engine in
//! `citysim-core`. Rules decay by `decay_rate` per tick and retire
//! permanently when durability reaches zero.
//!
//! The JSON shape is kept close to what a language model can emit:
//!
//! ```json
//! {"and": [{"time_between": [6, 22]}, {"random": 0.15}]}
//! {"type": "modify_bot_attr", "attr": "satiety", "delta": 35, "cost_money": 12}
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BotAttr, MoodDimension, ResourceAttr};
use crate::ids::{BotId, RuleId};

/// When a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Trigger {
    /// Once per eligible bot per tick.
    #[default]
    EveryTick,
    /// Once per bot per continuous presence in the rule's location.
    OnEnter,
    /// Once per day at the given virtual hour, with no subject bot.
    OnTime {
        /// Virtual hour (0-23).
        hour: u32,
    },
}

/// Boolean condition tree.
///
/// Evaluation is pure apart from the random draw. Bot conditions evaluate
/// to `false` when there is no subject bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Condition {
    /// Constant; `{"always": true}`.
    Always(bool),
    /// True with the given probability.
    Random(f64),
    /// Virtual hour within `[start, end]`, wrapping past midnight when
    /// `start > end`.
    TimeBetween(u32, u32),
    /// Subject bot is at the named location.
    BotAt(String),
    /// Subject bot attribute is strictly below the value.
    BotAttrLt(BotAttr, f64),
    /// Subject bot attribute is strictly above the value.
    BotAttrGt(BotAttr, f64),
    /// All sub-conditions hold.
    And(Vec<Condition>),
    /// At least one sub-condition holds.
    Or(Vec<Condition>),
}

impl Default for Condition {
    fn default() -> Self {
        Self::Always(true)
    }
}

/// Fields a `modify_rule` effect may touch.
///
/// Durability may only be lowered and `active` may only be set to `false`;
/// a retired rule is never revived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RuleChanges {
    /// New durability (ignored if higher than the current value).
    #[serde(default)]
    pub durability: Option<f64>,
    /// New decay rate (clamped to the valid range).
    #[serde(default)]
    pub decay_rate: Option<f64>,
    /// `Some(false)` deactivates the rule.
    #[serde(default)]
    pub active: Option<bool>,
}

/// One effect in a rule's effect list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Effect {
    /// Change a resource attribute of the subject bot, optionally for a price.
    ModifyBotAttr {
        /// Attribute to change.
        attr: ResourceAttr,
        /// Signed change.
        delta: i64,
        /// Money the bot must pay first; unaffordable means no-op.
        #[serde(default)]
        cost_money: u64,
    },
    /// Change an emotion or desire of the subject bot.
    ModifyBotEmotion {
        /// Dimension to change.
        emotion: MoodDimension,
        /// Signed change.
        delta: f64,
    },
    /// Append a public-memory entry at a location (rule's own by default).
    AddPublicMemory {
        /// Target location; the rule's location when absent.
        #[serde(default)]
        location: Option<String>,
        /// Memory text.
        content: String,
    },
    /// Possibly nudge one bot elsewhere toward a location.
    AttractBot {
        /// Chance the effect fires at all.
        chance: f64,
        /// Destination; the rule's location when absent.
        #[serde(default)]
        location: Option<String>,
        /// Why the bot feels drawn there.
        #[serde(default)]
        message: String,
    },
    /// Pay the rule's creator if still alive.
    GenerateIncome {
        /// Amount credited.
        #[serde(default)]
        amount: u64,
    },
    /// Append to the world event stream.
    SpawnEvent {
        /// Event headline.
        event_name: String,
        /// Event body.
        #[serde(default)]
        event_desc: String,
    },
    /// Append a sentence to a location description (once).
    ModifyLocationDesc {
        /// Target location; the rule's location when absent.
        #[serde(default)]
        location: Option<String>,
        /// Text to append.
        append: String,
    },
    /// Produce a line of narrative for the tick.
    Narrative {
        /// The narrative text.
        text: String,
    },
    /// Adjust another rule.
    ModifyRule {
        /// The rule to adjust.
        target_rule: RuleId,
        /// The requested changes.
        #[serde(default)]
        changes: RuleChanges,
    },
}

/// A live or retired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rule {
    /// Unique identifier.
    pub id: RuleId,
    /// Short name.
    pub name: String,
    /// Creator id: a bot slot, an NPC id or `system`.
    pub creator: String,
    /// Creator display name.
    pub creator_name: String,
    /// Tick at which the rule was registered.
    pub created_tick: u64,
    /// Whether the rule still runs. Once `false`, stays `false`.
    pub active: bool,
    /// Location scope; `None` is global.
    pub location: Option<String>,
    /// When the rule fires.
    pub trigger: Trigger,
    /// Condition tree.
    pub condition: Condition,
    /// Ordered effects.
    pub effects: Vec<Effect>,
    /// Human-readable description.
    pub description: String,
    /// Remaining lifespan budget.
    pub durability: f64,
    /// Durability lost per tick.
    pub decay_rate: f64,
    /// Number of firings in which at least one effect applied.
    pub execution_count: u64,
    /// Last tick the rule fired.
    pub last_triggered_tick: Option<u64>,
    /// Bots already served by an `on_enter` rule during their current stay.
    #[serde(default)]
    pub triggered: BTreeSet<BotId>,
}

/// A candidate rule returned by the synthesis oracle, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RuleDraft {
    /// Short name; must not be blank.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Location scope; `None` is global.
    #[serde(default)]
    pub location: Option<String>,
    /// When the rule fires.
    #[serde(default)]
    pub trigger: Trigger,
    /// Condition tree.
    #[serde(default)]
    pub condition: Condition,
    /// Ordered effects.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Requested durability (clamped on acceptance).
    #[serde(default = "default_draft_durability")]
    pub durability: f64,
    /// Requested decay rate (clamped on acceptance).
    #[serde(default = "default_draft_decay_rate")]
    pub decay_rate: f64,
}

const fn default_draft_durability() -> f64 {
    100.0
}

const fn default_draft_decay_rate() -> f64 {
    0.1
}

/// Short view of a rule for bot perception and API listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RuleSummary {
    /// Rule id.
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Creator display name.
    pub creator_name: String,
    /// Location scope.
    pub location: Option<String>,
    /// Description.
    pub description: String,
    /// Remaining durability.
    pub durability: f64,
    /// Firing count.
    pub execution_count: u64,
}

impl From<&Rule> for RuleSummary {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id,
            name: rule.name.clone(),
            creator_name: rule.creator_name.clone(),
            location: rule.location.clone(),
            description: rule.description.clone(),
            durability: rule.durability,
            execution_count: rule.execution_count,
        }
    }
}
