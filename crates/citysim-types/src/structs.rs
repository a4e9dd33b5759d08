//! Core entity structs for the citysim world.
//!
//! Covers bots and their inner state, locations with their public memory,
//! and the historical records (modifications, legends, graves, messages,
//! moments, world events) that accumulate as the city evolves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::actions::{ActionFeedback, ToolCall};
use crate::enums::{
    BotAttr, BotStatus, Desire, Emotion, Gender, Impact, LocationKind, MessagePriority,
    ModificationKind, Skill, TaskStatus, Weather,
};
use crate::ids::{BotId, LegendId, ModificationId, MomentId};

/// Upper bound of every 0-100 gauge.
pub const GAUGE_MAX: f64 = 100.0;

fn clamp_gauge(value: f64) -> f64 {
    value.clamp(0.0, GAUGE_MAX)
}

// ---------------------------------------------------------------------------
// Emotions, desires, skills
// ---------------------------------------------------------------------------

/// Five emotion gauges, each kept within 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Emotions {
    /// Contentment.
    pub happiness: f64,
    /// Grief and low mood.
    pub sadness: f64,
    /// Irritation.
    pub anger: f64,
    /// Worry.
    pub anxiety: f64,
    /// Lack of company.
    pub loneliness: f64,
}

impl Default for Emotions {
    fn default() -> Self {
        Self {
            happiness: 50.0,
            sadness: 10.0,
            anger: 5.0,
            anxiety: 20.0,
            loneliness: 30.0,
        }
    }
}

impl Emotions {
    /// Read one dimension.
    pub const fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happiness => self.happiness,
            Emotion::Sadness => self.sadness,
            Emotion::Anger => self.anger,
            Emotion::Anxiety => self.anxiety,
            Emotion::Loneliness => self.loneliness,
        }
    }

    const fn slot(&mut self, emotion: Emotion) -> &mut f64 {
        match emotion {
            Emotion::Happiness => &mut self.happiness,
            Emotion::Sadness => &mut self.sadness,
            Emotion::Anger => &mut self.anger,
            Emotion::Anxiety => &mut self.anxiety,
            Emotion::Loneliness => &mut self.loneliness,
        }
    }

    /// Add `delta` to one dimension, clamping to 0-100.
    pub fn adjust(&mut self, emotion: Emotion, delta: f64) {
        let slot = self.slot(emotion);
        *slot = clamp_gauge(*slot + delta);
    }
}

/// Five desire gauges, each kept within 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Desires {
    /// Romantic and physical desire.
    pub lust: f64,
    /// Wish for influence.
    pub power: f64,
    /// Wish for money.
    pub greed: f64,
    /// Wish to be admired.
    pub vanity: f64,
    /// Wish for safety.
    pub security: f64,
}

impl Desires {
    /// Read one dimension.
    pub const fn get(&self, desire: Desire) -> f64 {
        match desire {
            Desire::Lust => self.lust,
            Desire::Power => self.power,
            Desire::Greed => self.greed,
            Desire::Vanity => self.vanity,
            Desire::Security => self.security,
        }
    }

    /// Overwrite one dimension, clamping to 0-100.
    pub fn set(&mut self, desire: Desire, value: f64) {
        let slot = match desire {
            Desire::Lust => &mut self.lust,
            Desire::Power => &mut self.power,
            Desire::Greed => &mut self.greed,
            Desire::Vanity => &mut self.vanity,
            Desire::Security => &mut self.security,
        };
        *slot = clamp_gauge(value);
    }

    /// Add `delta` to one dimension, clamping to 0-100.
    pub fn adjust(&mut self, desire: Desire, delta: f64) {
        self.set(desire, self.get(desire) + delta);
    }
}

/// Per-bot multipliers on desire growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DesireProfile {
    /// Lust multiplier.
    pub lust: f64,
    /// Power multiplier.
    pub power: f64,
    /// Greed multiplier.
    pub greed: f64,
    /// Vanity multiplier.
    pub vanity: f64,
    /// Security multiplier.
    pub security: f64,
}

impl Default for DesireProfile {
    fn default() -> Self {
        Self {
            lust: 1.0,
            power: 1.0,
            greed: 1.0,
            vanity: 1.0,
            security: 1.0,
        }
    }
}

impl DesireProfile {
    /// Multiplier for one dimension.
    pub const fn get(&self, desire: Desire) -> f64 {
        match desire {
            Desire::Lust => self.lust,
            Desire::Power => self.power,
            Desire::Greed => self.greed,
            Desire::Vanity => self.vanity,
            Desire::Security => self.security,
        }
    }
}

/// Skill levels, each 0-100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Skills {
    /// Programming and technical work.
    pub tech: u32,
    /// Dealing with people.
    pub social: u32,
    /// Art and making things.
    pub creative: u32,
    /// Manual labor.
    pub physical: u32,
}

impl Skills {
    /// Maximum skill level.
    pub const MAX: u32 = 100;

    /// Read one skill.
    pub const fn get(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Tech => self.tech,
            Skill::Social => self.social,
            Skill::Creative => self.creative,
            Skill::Physical => self.physical,
        }
    }

    /// Raise one skill by `amount`, capped at [`Skills::MAX`].
    pub fn raise(&mut self, skill: Skill, amount: u32) {
        let slot = match skill {
            Skill::Tech => &mut self.tech,
            Skill::Social => &mut self.social,
            Skill::Creative => &mut self.creative,
            Skill::Physical => &mut self.physical,
        };
        *slot = slot.saturating_add(amount).min(Self::MAX);
    }
}

// ---------------------------------------------------------------------------
// Work
// ---------------------------------------------------------------------------

/// One unit of work a job offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JobTask {
    /// Task name.
    pub name: String,
    /// Ticks of work needed.
    pub duration: u32,
    /// 0-1; drives challenge chance.
    pub difficulty: f64,
    /// Short description.
    pub desc: String,
}

/// A job listing at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Job {
    /// Job title.
    pub title: String,
    /// Skill the job uses; `None` for unskilled work.
    pub skill: Option<Skill>,
    /// Minimum level of `skill` required to start.
    pub min_skill: u32,
    /// Pay per completed task.
    pub pay: u64,
    /// Tasks offered.
    pub tasks: Vec<JobTask>,
}

/// A task a bot is working on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Task {
    /// Title of the job the task belongs to.
    pub job_title: String,
    /// Name of the task.
    pub task_name: String,
    /// Skill exercised; `None` counts as level 10.
    pub skill: Option<Skill>,
    /// Ticks needed.
    pub duration: u32,
    /// Ticks done.
    pub progress: u32,
    /// 0-1.
    pub difficulty: f64,
    /// Pay on success.
    pub base_pay: u64,
    /// State machine position.
    pub status: TaskStatus,
    /// Complication that arose, if any.
    pub challenge: Option<String>,
    /// Outcome text once resolved.
    pub result: Option<String>,
    /// Tick the task was started.
    pub started_tick: u64,
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

/// Parents and children of a bot, by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Family {
    /// Parent slots.
    pub parents: Vec<BotId>,
    /// Child slots.
    pub children: Vec<BotId>,
}

impl Family {
    /// Parents then children.
    pub fn members(&self) -> impl Iterator<Item = &BotId> {
        self.parents.iter().chain(self.children.iter())
    }
}

/// A directed relationship toward another bot or an NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Bond {
    /// 0-100.
    #[serde(default)]
    pub trust: i32,
    /// 0-100.
    #[serde(default)]
    pub closeness: i32,
    /// 0-100.
    #[serde(default)]
    pub hostility: i32,
    /// Short label ("acquaintance", "heard of", ...).
    #[serde(default)]
    pub label: String,
    /// Recent impressions, newest last.
    #[serde(default)]
    pub impressions: Vec<String>,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            trust: 0,
            closeness: 0,
            hostility: 0,
            label: String::from("acquaintance"),
            impressions: Vec::new(),
        }
    }
}

/// One entry in a bot's deed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Deed {
    /// What was done.
    pub desc: String,
    /// Reputation change it caused.
    pub delta: i32,
    /// When.
    pub tick: u64,
}

/// Public standing of a bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Reputation {
    /// -100 to 100.
    pub score: i32,
    /// Earned labels, at most five.
    pub tags: Vec<String>,
    /// Recent deeds.
    pub deeds: Vec<Deed>,
}

/// Agent-synced value system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Values {
    /// Values the persona started with.
    #[serde(default)]
    pub original: String,
    /// Values now.
    #[serde(default)]
    pub current: String,
    /// Notable shifts.
    #[serde(default)]
    pub shifts: Vec<String>,
}

/// A memory the agent marked as formative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CoreMemory {
    /// What happened.
    pub summary: String,
    /// Feeling attached to it.
    #[serde(default)]
    pub emotion: String,
    /// When.
    #[serde(default)]
    pub tick: u64,
    /// Virtual timestamp.
    #[serde(default)]
    pub time: String,
    /// Optional tag (`legend` for inherited stories).
    #[serde(default)]
    pub tag: Option<String>,
}

/// A directed message waiting for the bot's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PendingReply {
    /// Sender id.
    pub from: String,
    /// Message text.
    pub msg: String,
    /// When it was sent.
    pub tick: u64,
}

/// A pull toward another location planted by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AttractionSignal {
    /// Where the bot feels drawn.
    pub location: String,
    /// Why.
    pub message: String,
    /// Rule that planted it.
    pub rule_name: String,
    /// When.
    pub tick: u64,
}

/// One resolved action in a bot's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionLogEntry {
    /// Tick of resolution.
    pub tick: u64,
    /// Virtual timestamp.
    pub time: String,
    /// Raw plan text.
    pub plan: String,
    /// Tool call it resolved to, if any.
    pub tool_call: Option<ToolCall>,
    /// Resulting feedback.
    pub feedback: ActionFeedback,
}

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

/// A resident of the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Bot {
    /// Identity slot.
    pub id: BotId,
    /// Display name.
    pub name: String,
    /// Age in years; grows one per virtual day.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Hometown.
    pub origin: String,
    /// Education.
    pub edu: String,
    /// Personality sketch.
    #[serde(default)]
    pub personality: String,
    /// Home location; rent is charged here.
    pub home: String,
    /// Current location.
    pub location: String,
    /// Remaining lifespan. Only falls, except for named rare events.
    pub hp: f64,
    /// Last aging rate applied.
    #[serde(default)]
    pub aging_rate: f64,
    /// Money, never negative.
    pub money: u64,
    /// 0-100.
    pub energy: u32,
    /// 0-100.
    pub satiety: u32,
    /// Alive or dead.
    pub status: BotStatus,
    /// Held job title.
    pub job: Option<String>,
    /// Skill levels.
    pub skills: Skills,
    /// Family links.
    pub family: Family,
    /// Emotion gauges.
    pub emotions: Emotions,
    /// Desire gauges.
    pub desires: Desires,
    /// Desire growth multipliers.
    pub desire_profile: DesireProfile,
    /// Asleep flag.
    pub is_sleeping: bool,
    /// Current work.
    pub current_task: Option<Task>,
    /// Agent-synced values.
    pub values: Values,
    /// Agent-synced formative memories.
    pub core_memories: Vec<CoreMemory>,
    /// Bonds keyed by bot slot or NPC name.
    pub bonds: BTreeMap<String, Bond>,
    /// Agent-synced long-term goal.
    pub long_term_goal: Option<String>,
    /// Agent-synced life summary.
    pub narrative_summary: String,
    /// Directed message awaiting a reply.
    pub pending_reply_to: Option<PendingReply>,
    /// Agent-synced recent actions.
    pub recent_actions_synced: Vec<String>,
    /// What the bot is visibly doing (at most 40 chars).
    pub current_activity: String,
    /// Feedback of the last resolved action.
    pub last_action_feedback: Option<ActionFeedback>,
    /// Bounded action history.
    pub action_log: Vec<ActionLogEntry>,
    /// Public standing.
    pub reputation: Reputation,
    /// Modifications this bot created.
    pub created_things: Vec<ModificationId>,
    /// Generation number; 0 for the founding cast.
    pub generation: u32,
    /// Name of the bot this one replaced.
    pub inherited_from: Option<String>,
    /// Legends this bot has heard (at most 10).
    pub known_legends: Vec<LegendId>,
    /// Recent pulls toward other locations (at most 3).
    pub attraction_signals: Vec<AttractionSignal>,
}

impl Bot {
    /// Whether the bot is alive.
    pub fn is_alive(&self) -> bool {
        self.status == BotStatus::Alive
    }

    /// Alive and awake.
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.is_sleeping
    }

    /// Numeric view of an attribute for rule conditions.
    #[allow(clippy::cast_precision_loss)]
    pub fn attr(&self, attr: BotAttr) -> f64 {
        match attr {
            BotAttr::Hp => self.hp,
            BotAttr::Energy => f64::from(self.energy),
            BotAttr::Satiety => f64::from(self.satiety),
            BotAttr::Money => self.money as f64,
            BotAttr::Age => f64::from(self.age),
        }
    }

    /// Level used for a job's skill check; unskilled work counts as 10.
    pub const fn skill_level(&self, skill: Option<Skill>) -> u32 {
        match skill {
            Some(s) => self.skills.get(s),
            None => 10,
        }
    }
}

/// The subset of a bot visible to everybody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BotPublicView {
    /// Slot.
    pub id: BotId,
    /// Display name.
    pub name: String,
    /// Age.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Hometown.
    pub origin: String,
    /// Current location.
    pub location: String,
    /// Alive or dead.
    pub status: BotStatus,
    /// Lifespan.
    pub hp: f64,
    /// Energy.
    pub energy: u32,
    /// Satiety.
    pub satiety: u32,
    /// Money.
    pub money: u64,
    /// Asleep flag.
    pub is_sleeping: bool,
    /// Visible activity.
    pub current_activity: String,
    /// Job title.
    pub job: Option<String>,
    /// Emotions.
    pub emotions: Emotions,
    /// Reputation score.
    pub reputation_score: i32,
    /// Generation.
    pub generation: u32,
}

impl From<&Bot> for BotPublicView {
    fn from(bot: &Bot) -> Self {
        Self {
            id: bot.id.clone(),
            name: bot.name.clone(),
            age: bot.age,
            gender: bot.gender,
            origin: bot.origin.clone(),
            location: bot.location.clone(),
            status: bot.status,
            hp: bot.hp,
            energy: bot.energy,
            satiety: bot.satiety,
            money: bot.money,
            is_sleeping: bot.is_sleeping,
            current_activity: bot.current_activity.clone(),
            job: bot.job.clone(),
            emotions: bot.emotions.clone(),
            reputation_score: bot.reputation.score,
            generation: bot.generation,
        }
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A non-player character living at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Npc {
    /// Display name.
    pub name: String,
    /// Role in the neighbourhood.
    pub role: String,
    /// Times bots have interacted with this NPC.
    #[serde(default)]
    pub interaction_count: u32,
    /// Attitude toward regulars.
    #[serde(default)]
    pub attitude: String,
}

/// An entry in a location's public memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PublicMemory {
    /// What happened.
    pub event: String,
    /// Actor id (bot slot, NPC id, rule or `system`).
    pub actor: String,
    /// Actor display name.
    pub actor_name: String,
    /// When.
    pub tick: u64,
    /// Virtual timestamp.
    pub time: String,
    /// Impact tag.
    pub impact: Impact,
}

/// A side-channel observation others can sense on a later tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RecentEvent {
    /// What could be observed.
    pub event: String,
    /// Who caused it.
    pub source: String,
    /// When.
    pub tick: u64,
}

/// A place in the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Unique name.
    pub name: String,
    /// Description; may grow through rule effects.
    pub desc: String,
    /// Category.
    pub kind: LocationKind,
    /// Bots currently here.
    pub bots: Vec<BotId>,
    /// Resident NPCs.
    pub npcs: Vec<Npc>,
    /// Jobs on offer.
    pub jobs: Vec<Job>,
    /// Bounded public memory, oldest first.
    pub public_memory: Vec<PublicMemory>,
    /// Side-channel observations, last ten.
    pub recent_events: Vec<RecentEvent>,
    /// Permanent creations here.
    pub modifications: Vec<ModificationId>,
    /// Ambience label.
    pub vibe: String,
}

impl Location {
    /// Whether a bot is present.
    pub fn contains(&self, bot: &BotId) -> bool {
        self.bots.contains(bot)
    }
}

/// The subset of a location shown in the world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationView {
    /// Name.
    pub name: String,
    /// Description.
    pub desc: String,
    /// Category.
    pub kind: LocationKind,
    /// Bots present.
    pub bots: Vec<BotId>,
    /// NPC names.
    pub npcs: Vec<String>,
    /// Job titles.
    pub jobs: Vec<String>,
    /// Ambience label.
    pub vibe: String,
    /// Number of permanent creations.
    pub modification_count: usize,
    /// Latest side-channel observations.
    pub recent_events: Vec<RecentEvent>,
}

impl From<&Location> for LocationView {
    fn from(loc: &Location) -> Self {
        Self {
            name: loc.name.clone(),
            desc: loc.desc.clone(),
            kind: loc.kind,
            bots: loc.bots.clone(),
            npcs: loc.npcs.iter().map(|n| n.name.clone()).collect(),
            jobs: loc.jobs.iter().map(|j| j.title.clone()).collect(),
            vibe: loc.vibe.clone(),
            modification_count: loc.modifications.len(),
            recent_events: loc.recent_events.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A permanent creation committed by the action pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Modification {
    /// Unique identifier.
    pub id: ModificationId,
    /// Known kind, if the judgment named one.
    pub kind: Option<ModificationKind>,
    /// Name of the creation.
    pub name: String,
    /// Description.
    pub description: String,
    /// Creator slot.
    pub creator: BotId,
    /// Creator display name.
    pub creator_name: String,
    /// Where it stands.
    pub location: String,
    /// When.
    pub tick: u64,
    /// Virtual timestamp.
    pub time: String,
}

/// A story that outlived the bot it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Legend {
    /// Unique identifier.
    pub id: LegendId,
    /// Slot of the bot it came from.
    pub original_bot: BotId,
    /// Name of the bot it came from.
    pub original_name: String,
    /// The story.
    pub content: String,
    /// Tick of origin.
    pub origin_tick: u64,
    /// Virtual timestamp of origin.
    pub origin_time: String,
    /// Where the bot died.
    pub location: String,
    /// How many bots have heard it.
    pub spread_count: u32,
}

/// Immutable record of a dead bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Grave {
    /// Slot the bot occupied.
    pub bot_id: BotId,
    /// Name.
    pub name: String,
    /// Age at death.
    pub age: u32,
    /// Hometown.
    pub origin: String,
    /// Generation.
    pub generation: u32,
    /// Tick of death.
    pub death_tick: u64,
    /// Virtual timestamp of death.
    pub death_time: String,
    /// Where the bot died.
    pub death_location: String,
    /// Money at death.
    pub final_money: u64,
    /// Final reputation score.
    pub reputation_score: i32,
    /// Final reputation tags.
    pub reputation_tags: Vec<String>,
    /// Creations left behind.
    pub created_things: Vec<ModificationId>,
    /// Unfinished goal.
    pub long_term_goal: Option<String>,
    /// Life summary.
    pub narrative_summary: String,
}

/// A message-board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Message {
    /// Sender id (`system`, `fate`, `rumor`, a slot, ...).
    pub from: String,
    /// Recipient; `None` is a public broadcast.
    pub to: Option<BotId>,
    /// Text.
    pub msg: String,
    /// When.
    pub tick: u64,
    /// Urgency.
    pub priority: MessagePriority,
}

/// A comment under a moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Comment {
    /// Commenter slot.
    pub bot_id: BotId,
    /// Commenter name.
    pub name: String,
    /// Text.
    pub content: String,
    /// When.
    pub tick: u64,
}

/// A post in the public social feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Moment {
    /// Unique identifier.
    pub id: MomentId,
    /// Author slot.
    pub bot_id: BotId,
    /// Author name.
    pub author_name: String,
    /// Text.
    pub content: String,
    /// Virtual timestamp.
    pub time: String,
    /// When.
    pub tick: u64,
    /// Slots that liked it.
    pub likes: Vec<BotId>,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

/// An entry in the world event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldEvent {
    /// When.
    pub tick: u64,
    /// Virtual timestamp.
    pub time: String,
    /// Headline.
    pub event: String,
    /// Details.
    pub desc: String,
}

/// A row of the reputation board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ReputationEntry {
    /// Slot.
    pub bot_id: BotId,
    /// Name.
    pub name: String,
    /// Score.
    pub score: i32,
    /// Tags.
    pub tags: Vec<String>,
    /// Most recent deed.
    pub latest_deed: String,
}

/// Derived virtual time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimeView {
    /// Tick counter.
    pub tick: u64,
    /// Hour 0-23.
    pub virtual_hour: u32,
    /// Day, starting at 1.
    pub virtual_day: u64,
    /// `Day N HH:00`.
    pub virtual_datetime: String,
    /// Today's weather.
    pub weather: Weather,
}
