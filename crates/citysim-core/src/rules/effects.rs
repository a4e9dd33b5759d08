//! Effect application.
//!
//! Every effect validates before it mutates. An effect that cannot be paid
//! for, or that has nothing to act on, declines quietly and reports
//! [`EffectOutcome::Declined`]; it never errors.

use rand::Rng;
use tracing::debug;

use citysim_agents::{gauge_apply, keep_last, money_apply};
use citysim_types::{
    AttractionSignal, BotId, Effect, Impact, MoodDimension, ResourceAttr, RuleChanges, RuleId,
};

use crate::config::RulesConfig;
use crate::state::WorldState;

/// Attraction signals kept per bot.
const MAX_SIGNALS: usize = 3;

/// Chance that an individual bot notices an attraction.
const ATTRACT_PER_BOT: f64 = 0.3;

/// The parts of a rule an effect needs while the rule table is being
/// mutated.
#[derive(Debug, Clone)]
pub struct RuleFrame {
    /// Rule id.
    pub id: RuleId,
    /// Rule name.
    pub name: String,
    /// Creator slot or `system`.
    pub creator: String,
    /// Location scope.
    pub location: Option<String>,
}

/// What happened when an effect was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect changed the world.
    Applied,
    /// The effect changed the world and produced narrative text.
    Narrated(String),
    /// Nothing changed: unaffordable, no subject, or nothing to act on.
    Declined,
}

impl EffectOutcome {
    /// Whether the world changed.
    pub const fn applied(&self) -> bool {
        !matches!(self, Self::Declined)
    }
}

/// Apply one effect on behalf of `rule`, with `subject` as the bot the
/// rule is currently being applied to.
pub fn apply_effect<R: Rng + ?Sized>(
    state: &mut WorldState,
    rule: &RuleFrame,
    effect: &Effect,
    subject: Option<&BotId>,
    limits: &RulesConfig,
    rng: &mut R,
) -> EffectOutcome {
    match effect {
        Effect::ModifyBotAttr {
            attr,
            delta,
            cost_money,
        } => modify_attr(state, subject, *attr, *delta, *cost_money),
        Effect::ModifyBotEmotion { emotion, delta } => {
            let Some(bot) = subject.and_then(|id| state.bots.get_mut(id)) else {
                return EffectOutcome::Declined;
            };
            match emotion {
                MoodDimension::Emotion(e) => bot.emotions.adjust(*e, *delta),
                MoodDimension::Desire(d) => bot.desires.adjust(*d, *delta),
            }
            EffectOutcome::Applied
        }
        Effect::AddPublicMemory { location, content } => {
            let Some(target) = location.as_ref().or(rule.location.as_ref()) else {
                return EffectOutcome::Declined;
            };
            if content.is_empty() || !state.locations.contains_key(target) {
                return EffectOutcome::Declined;
            }
            state.add_public_memory(target, content.clone(), &rule.creator, Impact::Neutral, limits);
            EffectOutcome::Applied
        }
        Effect::AttractBot {
            chance,
            location,
            message,
        } => attract(state, rule, *chance, location.as_deref(), message, rng),
        Effect::GenerateIncome { amount } => {
            let Some(creator) = state.bots.get_mut(rule.creator.as_str()) else {
                return EffectOutcome::Declined;
            };
            if !creator.is_alive() || *amount == 0 {
                return EffectOutcome::Declined;
            }
            creator.money = creator.money.saturating_add(*amount);
            EffectOutcome::Narrated(format!("{} earned {amount} yuan from {}", creator.name, rule.name))
        }
        Effect::SpawnEvent {
            event_name,
            event_desc,
        } => {
            state.push_event(event_name.clone(), event_desc.clone());
            EffectOutcome::Applied
        }
        Effect::ModifyLocationDesc { location, append } => {
            let Some(loc) = location
                .as_ref()
                .or(rule.location.as_ref())
                .and_then(|name| state.locations.get_mut(name))
            else {
                return EffectOutcome::Declined;
            };
            if append.is_empty() || loc.desc.contains(append.as_str()) {
                return EffectOutcome::Declined;
            }
            loc.desc = format!("{}. {append}", loc.desc.trim_end().trim_end_matches('.'));
            EffectOutcome::Applied
        }
        Effect::Narrative { text } => {
            if text.is_empty() {
                EffectOutcome::Declined
            } else {
                EffectOutcome::Narrated(text.clone())
            }
        }
        Effect::ModifyRule {
            target_rule,
            changes,
        } => modify_rule(state, *target_rule, changes, limits),
    }
}

fn modify_attr(
    state: &mut WorldState,
    subject: Option<&BotId>,
    attr: ResourceAttr,
    delta: i64,
    cost_money: u64,
) -> EffectOutcome {
    let Some(bot) = subject.and_then(|id| state.bots.get_mut(id)) else {
        return EffectOutcome::Declined;
    };
    let withdrawal = if attr == ResourceAttr::Money && delta < 0 {
        delta.unsigned_abs()
    } else {
        0
    };
    if cost_money.saturating_add(withdrawal) > bot.money {
        debug!(bot_id = %bot.id, money = bot.money, cost_money, delta, "rule effect unaffordable");
        return EffectOutcome::Declined;
    }
    bot.money = bot.money.saturating_sub(cost_money);
    match attr {
        ResourceAttr::Money => bot.money = money_apply(bot.money, delta),
        ResourceAttr::Energy => bot.energy = gauge_apply(bot.energy, delta),
        ResourceAttr::Satiety => bot.satiety = gauge_apply(bot.satiety, delta),
    }
    EffectOutcome::Applied
}

fn attract<R: Rng + ?Sized>(
    state: &mut WorldState,
    rule: &RuleFrame,
    chance: f64,
    location: Option<&str>,
    message: &str,
    rng: &mut R,
) -> EffectOutcome {
    let Some(target) = location.or(rule.location.as_deref()).map(str::to_owned) else {
        return EffectOutcome::Declined;
    };
    if rng.random::<f64>() >= chance {
        return EffectOutcome::Declined;
    }
    let tick = state.tick();
    let candidates: Vec<BotId> = state
        .bots
        .values()
        .filter(|b| b.is_active() && b.location != target)
        .map(|b| b.id.clone())
        .collect();
    for id in candidates {
        if rng.random::<f64>() >= ATTRACT_PER_BOT {
            continue;
        }
        if let Some(bot) = state.bots.get_mut(&id) {
            bot.attraction_signals.push(AttractionSignal {
                location: target.clone(),
                message: message.to_owned(),
                rule_name: rule.name.clone(),
                tick,
            });
            keep_last(&mut bot.attraction_signals, MAX_SIGNALS);
            debug!(bot_id = %id, location = %target, rule = %rule.name, "attraction signal queued");
            return EffectOutcome::Applied;
        }
    }
    EffectOutcome::Declined
}

fn modify_rule(
    state: &mut WorldState,
    target: RuleId,
    changes: &RuleChanges,
    limits: &RulesConfig,
) -> EffectOutcome {
    let Some(rule) = state.rules.iter_mut().find(|r| r.id == target && r.active) else {
        return EffectOutcome::Declined;
    };
    let mut changed = false;
    if let Some(durability) = changes.durability
        && durability < rule.durability
    {
        rule.durability = durability;
        changed = true;
    }
    if let Some(rate) = changes.decay_rate {
        rule.decay_rate = rate.clamp(limits.decay_min, limits.decay_max);
        changed = true;
    }
    if changes.active == Some(false) {
        rule.active = false;
        changed = true;
    }
    if changed {
        EffectOutcome::Applied
    } else {
        EffectOutcome::Declined
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_types::{Desire, Emotion};
    use citysim_world::BAOAN_VILLAGE;

    use super::*;
    use crate::config::SimulationConfig;

    fn world() -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let state = WorldState::new(&SimulationConfig::default(), &mut rng);
        (state, rng)
    }

    fn frame(creator: &str) -> RuleFrame {
        RuleFrame {
            id: RuleId::new(),
            name: String::from("Noodle stall"),
            creator: creator.to_owned(),
            location: Some(BAOAN_VILLAGE.to_owned()),
        }
    }

    #[test]
    fn unaffordable_cost_declines_without_debit() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        state.bots.get_mut(&id).unwrap().money = 5;
        let effect = Effect::ModifyBotAttr {
            attr: ResourceAttr::Money,
            delta: -10,
            cost_money: 10,
        };
        let outcome = apply_effect(&mut state, &frame("system"), &effect, Some(&id), &RulesConfig::default(), &mut rng);
        assert_eq!(outcome, EffectOutcome::Declined);
        assert_eq!(state.bots.get(&id).unwrap().money, 5);
    }

    #[test]
    fn paid_satiety_effect_charges_and_clamps() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        {
            let bot = state.bots.get_mut(&id).unwrap();
            bot.money = 30;
            bot.satiety = 90;
        }
        let effect = Effect::ModifyBotAttr {
            attr: ResourceAttr::Satiety,
            delta: 35,
            cost_money: 12,
        };
        let outcome = apply_effect(&mut state, &frame("system"), &effect, Some(&id), &RulesConfig::default(), &mut rng);
        assert!(outcome.applied());
        let bot = state.bots.get(&id).unwrap();
        assert_eq!(bot.money, 18);
        assert_eq!(bot.satiety, 100);
    }

    #[test]
    fn mood_effects_reach_desires_and_emotions() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(2);
        let before = state.bots.get(&id).unwrap().desires.get(Desire::Vanity);
        let vanity = Effect::ModifyBotEmotion {
            emotion: MoodDimension::Desire(Desire::Vanity),
            delta: 3.0,
        };
        apply_effect(&mut state, &frame("system"), &vanity, Some(&id), &RulesConfig::default(), &mut rng);
        let after = state.bots.get(&id).unwrap().desires.get(Desire::Vanity);
        assert!((after - (before + 3.0).min(100.0)).abs() < 1e-9);

        let calm = Effect::ModifyBotEmotion {
            emotion: MoodDimension::Emotion(Emotion::Anxiety),
            delta: -500.0,
        };
        apply_effect(&mut state, &frame("system"), &calm, Some(&id), &RulesConfig::default(), &mut rng);
        assert!(state.bots.get(&id).unwrap().emotions.anxiety.abs() < f64::EPSILON);
        assert_eq!(
            apply_effect(&mut state, &frame("system"), &calm, None, &RulesConfig::default(), &mut rng),
            EffectOutcome::Declined
        );
    }

    #[test]
    fn income_goes_to_living_creator_only() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(3);
        let before = state.bots.get(&id).unwrap().money;
        let income = Effect::GenerateIncome { amount: 7 };
        assert!(apply_effect(&mut state, &frame("bot_3"), &income, None, &RulesConfig::default(), &mut rng).applied());
        assert_eq!(state.bots.get(&id).unwrap().money, before.saturating_add(7));

        state.bots.get_mut(&id).unwrap().status = citysim_types::BotStatus::Dead;
        assert!(!apply_effect(&mut state, &frame("bot_3"), &income, None, &RulesConfig::default(), &mut rng).applied());
        assert!(!apply_effect(&mut state, &frame("system"), &income, None, &RulesConfig::default(), &mut rng).applied());
    }

    #[test]
    fn location_desc_appends_once() {
        let (mut state, mut rng) = world();
        let effect = Effect::ModifyLocationDesc {
            location: None,
            append: String::from("A noodle stall smokes at the corner"),
        };
        let limits = RulesConfig::default();
        assert!(apply_effect(&mut state, &frame("system"), &effect, None, &limits, &mut rng).applied());
        assert!(!apply_effect(&mut state, &frame("system"), &effect, None, &limits, &mut rng).applied());
        let desc = &state.locations.get(BAOAN_VILLAGE).unwrap().desc;
        assert_eq!(desc.matches("noodle stall").count(), 1);
    }

    #[test]
    fn modify_rule_only_weakens() {
        let (mut state, mut rng) = world();
        let limits = RulesConfig::default();
        let target = state.rules.first().unwrap().id;
        let original = state.rules.first().unwrap().durability;

        let stronger = Effect::ModifyRule {
            target_rule: target,
            changes: RuleChanges {
                durability: Some(original + 100.0),
                decay_rate: None,
                active: Some(true),
            },
        };
        assert!(!apply_effect(&mut state, &frame("system"), &stronger, None, &limits, &mut rng).applied());
        assert!((state.rules.first().unwrap().durability - original).abs() < f64::EPSILON);

        let weaker = Effect::ModifyRule {
            target_rule: target,
            changes: RuleChanges {
                durability: Some(10.0),
                decay_rate: Some(9.0),
                active: None,
            },
        };
        assert!(apply_effect(&mut state, &frame("system"), &weaker, None, &limits, &mut rng).applied());
        let rule = state.rules.first().unwrap();
        assert!((rule.durability - 10.0).abs() < f64::EPSILON);
        assert!((rule.decay_rate - 1.0).abs() < f64::EPSILON);

        let stop = Effect::ModifyRule {
            target_rule: target,
            changes: RuleChanges {
                active: Some(false),
                ..RuleChanges::default()
            },
        };
        apply_effect(&mut state, &frame("system"), &stop, None, &limits, &mut rng);
        assert!(!state.rules.first().unwrap().active);
    }

    #[test]
    fn certain_attraction_signals_someone() {
        let (mut state, mut rng) = world();
        let effect = Effect::AttractBot {
            chance: 1.0,
            location: None,
            message: String::from("fresh noodles"),
        };
        let limits = RulesConfig::default();
        let mut hit = false;
        for _ in 0..20 {
            hit |= apply_effect(&mut state, &frame("system"), &effect, None, &limits, &mut rng).applied();
        }
        assert!(hit);
        assert!(state.bots.values().all(|b| b.attraction_signals.len() <= MAX_SIGNALS));
        assert!(
            state
                .bots
                .values()
                .flat_map(|b| b.attraction_signals.iter())
                .all(|s| s.location == BAOAN_VILLAGE)
        );
    }
}
