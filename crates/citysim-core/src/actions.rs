//! Action resolution.
//!
//! Every step here is synchronous and runs under the world lock. The
//! [`crate::world::World`] handle strings them together and makes the
//! oracle calls in between with the lock released:
//!
//! 1. [`precheck`] and [`shortcut`] handle unknown bots and the wake/sleep
//!    fast paths.
//! 2. [`plan_context`] feeds free-text plans to the oracle.
//! 3. [`dispatch`] executes moves, posts and job requests directly and
//!    hands everything else back for judgment.
//! 4. [`commit_judgment`] applies a judgment with every number clamped and
//!    every cost checked.
//! 5. [`record`] does the bookkeeping the decision loop reads next cycle.

use rand::Rng;
use tracing::{info, warn};

use citysim_agents::{
    AgentError, adjust_bond, gauge_apply, keep_last, mirrored_warmth, money_apply, start_task,
};
use citysim_types::{
    ActionFeedback, ActionLogEntry, Bot, BotId, Emotion, ExpressChannel, Gender, Impact, Job,
    JobTask, Judgment, Modification, ModificationId, ModificationKind, MoveArgs,
    ResolvedAction, ResourceChanges, Skill, ToolCall, TravelMode, WorldChange, WorldChangeKind,
};
use citysim_world::{WorldError, location_names, resolve_location};

use crate::config::SimulationConfig;
use crate::oracle::{ActionContext, ActorBrief, Neighbor, PlanContext, SynthesisContext};
use crate::state::{WorldState, clip};

/// Bounds on judgment deltas.
const MONEY_DELTA_MAX: i64 = 500;
const ENERGY_DELTA_MAX: i64 = 30;
const SATIETY_DELTA_MAX: i64 = 50;
const HAPPINESS_DELTA_MAX: i64 = 10;
const WARMTH_MAX: i32 = 10;

/// Warmth at which an interaction is worth a public memory.
const NOTABLE_WARMTH: i32 = 3;

/// Side effects of one action attached to the location.
const SIDE_EFFECTS_KEEP: usize = 3;

/// Reputation for a permanent change of unknown kind.
const UNKNOWN_CREATION_REPUTATION: i32 = 3;

/// Action log bound: trim to `ACTION_LOG_TRIM` once above `ACTION_LOG_CAP`.
const ACTION_LOG_CAP: usize = 50;
const ACTION_LOG_TRIM: usize = 30;

/// Longest `current_activity`.
const ACTIVITY_MAX_CHARS: usize = 40;

/// Neighbors and creations shown to the oracle.
const CONTEXT_ENTRIES: usize = 5;

/// Anxiety shed by going to bed.
const SLEEP_CALM: f64 = -5.0;

/// Base pay of a job opened by a new shop or business.
const NEW_JOB_PAY: u64 = 60;

/// Wake phrases, matched as whole words.
const WAKE_PHRASES: [&[&str]; 2] = [&["wake", "up"], &["get", "up"]];
/// Sleep phrases, matched as whole words.
const SLEEP_PHRASES: [&[&str]; 3] = [&["sleep"], &["go", "to", "bed"], &["go", "to", "sleep"]];
/// Chinese plans that are nothing but the shortcut itself.
const WAKE_PLANS: [&str; 3] = ["起床", "醒来", "起来"];
const SLEEP_PLANS: [&str; 2] = ["睡觉", "去睡觉"];

/// Why an action could not be carried out. Never surfaced as an HTTP
/// failure: the pipeline turns it into `success = false` feedback.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    /// No bot holds this slot.
    #[error("unknown bot {0}")]
    UnknownBot(BotId),

    /// The bot is dead.
    #[error("{0} is no longer alive")]
    NotAlive(String),

    /// The bot is asleep and the plan is not to wake up.
    #[error("{0} is asleep")]
    Asleep(String),

    /// The move destination does not exist.
    #[error(transparent)]
    UnknownLocation(#[from] WorldError),

    /// The bot cannot pay.
    #[error("not enough money: need {need}, have {have}")]
    Unaffordable {
        /// Money needed.
        need: u64,
        /// Money on hand.
        have: u64,
    },

    /// The bot could not start work.
    #[error(transparent)]
    Work(#[from] AgentError),
}

impl ActionError {
    /// Feedback reporting this failure with no resource change.
    pub fn into_feedback(self, plan: &str) -> ActionFeedback {
        let text = self.to_string();
        ActionFeedback::simple(plan, text.clone(), text, false)
    }
}

/// A fast path that needs no tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Get out of bed.
    Wake,
    /// Go to bed.
    Sleep,
}

/// Recognize the wake and sleep shortcuts in a plan.
///
/// English phrases must appear as consecutive whole words, so "sleeping
/// bag" or "get upset" are ordinary plans. Chinese shortcuts must be the
/// entire plan, trailing punctuation aside.
pub fn shortcut(plan: &str) -> Option<Shortcut> {
    let plan = plan.trim().to_lowercase();
    let bare = plan.trim_end_matches(|c: char| c.is_ascii_punctuation() || "。！!～~".contains(c));
    let words: Vec<&str> = plan
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let said = |phrase: &&[&str]| words.windows(phrase.len()).any(|w| w == *phrase);
    if WAKE_PLANS.contains(&bare) || WAKE_PHRASES.iter().any(said) {
        Some(Shortcut::Wake)
    } else if SLEEP_PLANS.contains(&bare) || SLEEP_PHRASES.iter().any(said) {
        Some(Shortcut::Sleep)
    } else {
        None
    }
}

/// The acting bot, if it exists and is alive.
pub fn precheck<'a>(state: &'a WorldState, id: &BotId) -> Result<&'a Bot, ActionError> {
    let bot = state
        .bots
        .get(id)
        .ok_or_else(|| ActionError::UnknownBot(id.clone()))?;
    if !bot.is_alive() {
        return Err(ActionError::NotAlive(bot.name.clone()));
    }
    Ok(bot)
}

/// Run a shortcut.
pub fn apply_shortcut(
    state: &mut WorldState,
    id: &BotId,
    plan: &str,
    shortcut: Shortcut,
) -> Result<ActionFeedback, ActionError> {
    precheck(state, id)?;
    let bot = state
        .bots
        .get_mut(id)
        .ok_or_else(|| ActionError::UnknownBot(id.clone()))?;
    let feedback = match shortcut {
        Shortcut::Wake if bot.is_sleeping => {
            bot.is_sleeping = false;
            "just woke up, stretching".clone_into(&mut bot.current_activity);
            info!(bot_id = %id, "woke up");
            ActionFeedback::simple(
                plan,
                format!("{} got out of bed.", bot.name),
                "You are awake.",
                true,
            )
        }
        Shortcut::Wake => ActionFeedback::simple(
            plan,
            format!("{} is already up.", bot.name),
            "You are already awake.",
            true,
        ),
        Shortcut::Sleep => {
            bot.is_sleeping = true;
            bot.current_task = None;
            bot.emotions.adjust(Emotion::Anxiety, SLEEP_CALM);
            "sleeping".clone_into(&mut bot.current_activity);
            info!(bot_id = %id, location = %bot.location, "went to sleep");
            ActionFeedback::simple(
                plan,
                format!("{} lay down and fell asleep.", bot.name),
                "You fall asleep.",
                true,
            )
        }
    };
    Ok(feedback)
}

const fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
    }
}

const fn skill_label(skill: Skill) -> &'static str {
    match skill {
        Skill::Tech => "tech",
        Skill::Social => "social",
        Skill::Creative => "creative",
        Skill::Physical => "physical",
    }
}

const fn travel_label(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "on foot",
        TravelMode::Bus => "by bus",
        TravelMode::Taxi => "by taxi",
    }
}

/// Compact description of a bot for oracle prompts.
pub fn actor_brief(bot: &Bot) -> ActorBrief {
    ActorBrief {
        id: bot.id.to_string(),
        name: bot.name.clone(),
        age: bot.age,
        gender: gender_label(bot.gender).to_owned(),
        personality: clip(&bot.personality, 60),
        money: bot.money,
        energy: bot.energy,
        satiety: bot.satiety,
        hp: bot.hp,
        skills: Skill::ALL
            .iter()
            .map(|&s| (skill_label(s).to_owned(), bot.skills.get(s)))
            .collect(),
    }
}

struct Scene {
    nearby: Vec<Neighbor>,
    npcs: Vec<String>,
    creations: Vec<String>,
}

fn scene(state: &WorldState, bot: &Bot) -> Scene {
    let nearby = state
        .others_at(&bot.location, &bot.id)
        .into_iter()
        .take(CONTEXT_ENTRIES)
        .map(|b| Neighbor {
            id: b.id.to_string(),
            name: b.name.clone(),
            activity: if b.current_activity.is_empty() {
                String::from("idle")
            } else {
                b.current_activity.clone()
            },
        })
        .collect();
    let npcs = state
        .locations
        .get(&bot.location)
        .map(|l| l.npcs.iter().map(|n| n.name.clone()).collect())
        .unwrap_or_default();
    let creations = state
        .modifications
        .iter()
        .filter(|m| m.location == bot.location)
        .take(CONTEXT_ENTRIES)
        .map(|m| format!("{} (by {})", m.name, m.creator_name))
        .collect();
    Scene {
        nearby,
        npcs,
        creations,
    }
}

/// Oracle input for turning `plan` into a tool call.
pub fn plan_context(state: &WorldState, id: &BotId, plan: &str) -> Result<PlanContext, ActionError> {
    let bot = precheck(state, id)?;
    let Scene {
        nearby,
        npcs,
        creations,
    } = scene(state, bot);
    Ok(PlanContext {
        actor: actor_brief(bot),
        location: bot.location.clone(),
        locations: location_names().map(str::to_owned).collect(),
        nearby,
        npcs,
        creations,
        plan: plan.to_owned(),
    })
}

/// Oracle input for judging `call`.
pub fn action_context(
    state: &WorldState,
    id: &BotId,
    call: &ToolCall,
) -> Result<ActionContext, ActionError> {
    let bot = precheck(state, id)?;
    let Scene {
        nearby,
        npcs,
        creations,
    } = scene(state, bot);
    Ok(ActionContext {
        actor: actor_brief(bot),
        location: bot.location.clone(),
        nearby,
        npcs,
        creations,
        weather: state.weather.label().to_owned(),
        time: state.time(),
        tool_call: call.clone(),
    })
}

/// Oracle input for proposing rules after a successful action.
pub fn synthesis_context(
    state: &WorldState,
    id: &BotId,
    action_desc: &str,
    narrative: &str,
) -> Option<SynthesisContext> {
    let bot = state.bots.get(id)?;
    let location_desc = state
        .locations
        .get(&bot.location)
        .map(|l| l.desc.clone())
        .unwrap_or_default();
    Some(SynthesisContext {
        actor: actor_brief(bot),
        location: bot.location.clone(),
        location_desc,
        action_desc: action_desc.to_owned(),
        narrative: narrative.to_owned(),
        active_rules: state
            .rules
            .iter()
            .filter(|r| r.active)
            .map(citysim_types::RuleSummary::from)
            .collect(),
    })
}

/// Where a tool call goes next.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Executed directly.
    Done(ActionFeedback),
    /// Needs an oracle judgment of this call.
    Judge(ToolCall),
}

/// Execute the calls that need no judgment.
///
/// Moves, moments posts and job requests are resolved here. A move to
/// the current location becomes exploring in place, which is judged.
pub fn dispatch<R: Rng + ?Sized>(
    state: &mut WorldState,
    id: &BotId,
    plan: &str,
    call: ToolCall,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Dispatch, ActionError> {
    let bot = precheck(state, id)?;
    if bot.is_sleeping {
        return Err(ActionError::Asleep(bot.name.clone()));
    }
    match call {
        ToolCall::Move { args, .. } => execute_move(state, id, plan, &args, config),
        ToolCall::Express { args, .. } if args.channel == ExpressChannel::Moments => {
            Ok(Dispatch::Done(post_moment(state, id, plan, &args.content)))
        }
        ToolCall::UseResource { args, .. } if args.resource.trim().eq_ignore_ascii_case("job") => {
            take_job(state, id, plan, &args.purpose, rng).map(Dispatch::Done)
        }
        other => Ok(Dispatch::Judge(other)),
    }
}

fn execute_move(
    state: &mut WorldState,
    id: &BotId,
    plan: &str,
    args: &MoveArgs,
    config: &SimulationConfig,
) -> Result<Dispatch, ActionError> {
    let destination = resolve_location(&args.destination)?;
    let bot = precheck(state, id)?;
    let origin = bot.location.clone();
    if destination == origin {
        return Ok(Dispatch::Judge(ToolCall::explore(&origin)));
    }
    let fare = config.economy.fare(args.mode);
    if fare > bot.money {
        return Err(ActionError::Unaffordable {
            need: fare,
            have: bot.money,
        });
    }
    let name = bot.name.clone();
    state.move_bot(id, destination);
    let energy_before = state.bots.get(id).map_or(0, |b| b.energy);
    if let Some(bot) = state.bots.get_mut(id) {
        bot.money = bot.money.saturating_sub(fare);
        bot.energy = bot.energy.saturating_sub(config.economy.move_energy);
    }
    let energy_after = state.bots.get(id).map_or(0, |b| b.energy);

    let mut narrative = format!(
        "{name} went from {origin} to {destination} {}",
        travel_label(args.mode)
    );
    if fare > 0 {
        narrative.push_str(&format!(" (spent {fare} yuan)"));
    }
    info!(bot_id = %id, from = %origin, to = destination, mode = ?args.mode, fare, "moved");
    let mut feedback =
        ActionFeedback::simple(plan, narrative, format!("You arrived at {destination}."), true);
    feedback.resource_changes = ResourceChanges {
        money: 0_i64.saturating_sub_unsigned(fare),
        energy: i64::from(energy_after).saturating_sub(i64::from(energy_before)),
        satiety: 0,
        happiness: 0,
    };
    Ok(Dispatch::Done(feedback))
}

fn post_moment(state: &mut WorldState, id: &BotId, plan: &str, content: &str) -> ActionFeedback {
    let name = state.name_of(id.as_str());
    if state.push_moment(id, content.to_owned()).is_none() {
        return ActionError::UnknownBot(id.clone()).into_feedback(plan);
    }
    info!(bot_id = %id, content = %clip(content, 40), "posted a moment");
    ActionFeedback::simple(
        plan,
        format!("{name} posted on moments: {}...", clip(content, 30)),
        "Your post is up.",
        true,
    )
}

fn take_job<R: Rng + ?Sized>(
    state: &mut WorldState,
    id: &BotId,
    plan: &str,
    wanted: &str,
    rng: &mut R,
) -> Result<ActionFeedback, ActionError> {
    let tick = state.tick();
    let location = precheck(state, id)?.location.clone();
    let jobs = state
        .locations
        .get(&location)
        .map(|l| l.jobs.clone())
        .unwrap_or_default();
    let bot = state
        .bots
        .get_mut(id)
        .ok_or_else(|| ActionError::UnknownBot(id.clone()))?;
    let energy_before = bot.energy;
    let summary = start_task(bot, &jobs, wanted, tick, rng)?;
    let mut feedback = ActionFeedback::simple(
        plan,
        format!("{} {summary}", bot.name),
        format!("You {summary}"),
        true,
    );
    feedback.resource_changes.energy =
        i64::from(bot.energy).saturating_sub(i64::from(energy_before));
    Ok(feedback)
}

/// Clamp a judgment's deltas to their bounds.
fn clamped(judgment: &Judgment) -> ResourceChanges {
    ResourceChanges {
        money: judgment.money_delta.clamp(-MONEY_DELTA_MAX, MONEY_DELTA_MAX),
        energy: judgment.energy_delta.clamp(-ENERGY_DELTA_MAX, ENERGY_DELTA_MAX),
        satiety: judgment.satiety_delta.clamp(-SATIETY_DELTA_MAX, SATIETY_DELTA_MAX),
        happiness: judgment
            .happiness_delta
            .clamp(-HAPPINESS_DELTA_MAX, HAPPINESS_DELTA_MAX),
    }
}

fn signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Apply a judgment to the world.
///
/// The judgment's numbers are clamped; a money loss the bot cannot cover
/// fails the whole action with no change; a world change is committed only
/// if its cost can be paid at commit time.
pub fn commit_judgment(
    state: &mut WorldState,
    id: &BotId,
    plan: &str,
    call: Option<&ToolCall>,
    judgment: Judgment,
    config: &SimulationConfig,
) -> Result<ActionFeedback, ActionError> {
    let bot = precheck(state, id)?;
    let name = bot.name.clone();
    let location = bot.location.clone();
    let mut changes = clamped(&judgment);
    if changes.money < 0 && changes.money.unsigned_abs() > bot.money {
        let err = ActionError::Unaffordable {
            need: changes.money.unsigned_abs(),
            have: bot.money,
        };
        info!(bot_id = %id, %err, "judged action unaffordable");
        return Ok(err.into_feedback(plan));
    }

    if let Some(bot) = state.bots.get_mut(id) {
        bot.money = money_apply(bot.money, changes.money);
        bot.energy = gauge_apply(bot.energy, changes.energy);
        bot.satiety = gauge_apply(bot.satiety, changes.satiety);
        let happiness = i32::try_from(changes.happiness).unwrap_or(0);
        bot.emotions.adjust(Emotion::Happiness, f64::from(happiness));
        if let Some(skill) = judgment.skill_up {
            bot.skills.raise(skill, 1);
        }
    }

    let mut narrative = if judgment.narrative.trim().is_empty() {
        format!("{name}: {plan}")
    } else {
        judgment.narrative.clone()
    };
    let mut world_change = None;
    if let Some(change) = &judgment.world_change {
        match commit_world_change(state, id, &location, change, call, &config.rules) {
            Some((money, energy)) => {
                changes.money = changes.money.saturating_sub(signed(money));
                changes.energy = changes.energy.saturating_sub(i64::from(energy));
                narrative.push_str(&format!(" [world change: {}]", change.name));
                world_change = Some(change.name.clone());
            }
            None => {
                narrative.push_str(&format!(
                    " (wanted to make {}, but could not afford it)",
                    change.name
                ));
            }
        }
    }

    let social_effects = apply_social_effects(state, id, &location, &judgment, &config.rules);

    for side in judgment.side_effects.iter().take(SIDE_EFFECTS_KEEP) {
        state.add_recent_event(&location, side.clone(), id.as_str());
    }

    info!(
        bot_id = %id,
        tool = call.map_or("fallback", ToolCall::name),
        success = judgment.success,
        narrative = %clip(&narrative, 80),
        "action judged"
    );
    Ok(ActionFeedback {
        plan: plan.to_owned(),
        narrative,
        feedback: judgment.feedback_to_actor,
        success: judgment.success,
        resource_changes: changes,
        world_change,
        social_effects,
        rules_created: Vec::new(),
    })
}

/// Commit a world change if affordable. Returns the money and energy paid.
fn commit_world_change(
    state: &mut WorldState,
    id: &BotId,
    location: &str,
    change: &WorldChange,
    call: Option<&ToolCall>,
    limits: &crate::config::RulesConfig,
) -> Option<(u64, u32)> {
    let kind = change.modification.or_else(|| match call {
        Some(ToolCall::Create { args, .. }) => ModificationKind::parse(&args.what),
        _ => None,
    });
    let cost_money = change
        .cost_money
        .max(kind.map_or(0, ModificationKind::base_money_cost));
    let cost_energy = change
        .cost_energy
        .max(kind.map_or(0, ModificationKind::base_energy_cost));

    let (tick, time) = (state.tick(), state.time());
    let bot = state.bots.get_mut(id)?;
    if bot.money < cost_money || bot.energy < cost_energy {
        info!(
            bot_id = %id,
            change = %change.name,
            cost_money,
            cost_energy,
            money = bot.money,
            energy = bot.energy,
            "world change unaffordable"
        );
        return None;
    }
    bot.money = bot.money.saturating_sub(cost_money);
    bot.energy = bot.energy.saturating_sub(cost_energy);
    let creator_name = bot.name.clone();
    let name = if change.name.trim().is_empty() {
        String::from("an unnamed creation")
    } else {
        change.name.trim().to_owned()
    };

    if change.permanent {
        let modification = Modification {
            id: ModificationId::new(),
            kind,
            name: name.clone(),
            description: change.description.clone(),
            creator: id.clone(),
            creator_name: creator_name.clone(),
            location: location.to_owned(),
            tick,
            time,
        };
        let mod_id = modification.id;
        bot.created_things.push(mod_id);
        state.modifications.push(modification);
        if let Some(loc) = state.locations.get_mut(location) {
            loc.modifications.push(mod_id);
            if kind.is_some_and(ModificationKind::creates_job) {
                loc.jobs.push(Job {
                    title: format!("{name} helper"),
                    skill: None,
                    min_skill: 0,
                    pay: NEW_JOB_PAY,
                    tasks: vec![JobTask {
                        name: format!("Help out at {name}"),
                        duration: 2,
                        difficulty: 0.2,
                        desc: format!("Lend a hand at {creator_name}'s {name}"),
                    }],
                });
            }
        }
        let reputation = kind.map_or(UNKNOWN_CREATION_REPUTATION, ModificationKind::reputation);
        state.record_deed(id, reputation, &format!("created [{name}]"));
        state.add_public_memory(
            location,
            format!(
                "{creator_name} created {name}: {}",
                clip(&change.description, 40)
            ),
            id.as_str(),
            Impact::Creation,
            limits,
        );
        warn!(bot_id = %id, creation = %name, location, ?kind, "permanent world change");
    } else {
        match change.change_type {
            WorldChangeKind::Reputation => {
                state.record_deed(id, 1, &name);
            }
            WorldChangeKind::Information => {
                state.add_public_memory(
                    location,
                    format!("{creator_name}: {}", clip(&change.description, 50)),
                    id.as_str(),
                    Impact::Information,
                    limits,
                );
            }
            WorldChangeKind::NewEntity
            | WorldChangeKind::ModifyEntity
            | WorldChangeKind::DestroyEntity => {}
        }
    }
    Some((cost_money, cost_energy))
}

fn apply_social_effects(
    state: &mut WorldState,
    id: &BotId,
    location: &str,
    judgment: &Judgment,
    limits: &crate::config::RulesConfig,
) -> Vec<String> {
    let mut summaries = Vec::new();
    for effect in &judgment.social_effects {
        let target = state
            .find_bot(&effect.target)
            .filter(|b| b.is_alive() && b.id != *id)
            .map(|b| (b.id.clone(), b.name.clone()));
        let Some((target_id, target_name)) = target else {
            if let Some(npc) = state
                .locations
                .get_mut(location)
                .and_then(|l| l.npcs.iter_mut().find(|n| n.name == effect.target.trim()))
            {
                npc.interaction_count = npc.interaction_count.saturating_add(1);
                summaries.push(format!("{}: {}", npc.name, effect.effect));
            }
            continue;
        };
        let warmth = effect.warmth_delta.clamp(-WARMTH_MAX, WARMTH_MAX);
        let actor_name = state.name_of(id.as_str());
        if let Some(actor) = state.bots.get_mut(id) {
            adjust_bond(actor, target_id.as_str(), warmth, &effect.effect);
        }
        if let Some(other) = state.bots.get_mut(&target_id) {
            adjust_bond(other, id.as_str(), mirrored_warmth(warmth), &effect.effect);
        }
        info!(bot_id = %id, target = %target_id, warmth, effect = %effect.effect, "social effect");
        if warmth.unsigned_abs() >= NOTABLE_WARMTH.unsigned_abs() {
            state.add_public_memory(
                location,
                format!("{actor_name} and {target_name}: {}", clip(&effect.effect, 30)),
                id.as_str(),
                Impact::Social,
                limits,
            );
        }
        summaries.push(format!("{target_name}: {}", effect.effect));
    }
    summaries
}

/// Bookkeeping after an action: action log, current activity, last
/// feedback.
pub fn record(state: &mut WorldState, id: &BotId, plan: &str, action: &ResolvedAction, feedback: &ActionFeedback) {
    let (tick, time) = (state.tick(), state.time());
    let Some(bot) = state.bots.get_mut(id) else {
        return;
    };
    let tool_call = action.tool_call().cloned();
    match action {
        ResolvedAction::WakeUp | ResolvedAction::Sleep => {}
        ResolvedAction::Tool { call } => {
            let desc = if call.desc().trim().is_empty() {
                plan
            } else {
                call.desc()
            };
            bot.current_activity = clip(desc, ACTIVITY_MAX_CHARS);
        }
        ResolvedAction::Fallback => bot.current_activity = clip(plan, ACTIVITY_MAX_CHARS),
    }
    bot.action_log.push(ActionLogEntry {
        tick,
        time,
        plan: plan.to_owned(),
        tool_call,
        feedback: feedback.clone(),
    });
    if bot.action_log.len() > ACTION_LOG_CAP {
        keep_last(&mut bot.action_log, ACTION_LOG_TRIM);
    }
    bot.last_action_feedback = Some(feedback.clone());
}
