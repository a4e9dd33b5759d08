//! Per-tick rule scheduling, decay and retirement.

use rand::Rng;
use tracing::{debug, info};

use citysim_types::{BotId, Effect, Trigger};

use super::condition::{EvalContext, evaluate};
use super::effects::{EffectOutcome, RuleFrame, apply_effect};
use crate::config::RulesConfig;
use crate::state::WorldState;

/// What the rule pass did this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTickReport {
    /// Rule executions that changed something.
    pub executions: u64,
    /// Names of rules retired this tick.
    pub retired: Vec<String>,
    /// Narrative lines produced by effects.
    pub narratives: Vec<String>,
}

fn still_active(state: &WorldState, index: usize) -> bool {
    state.rules.get(index).is_some_and(|r| r.active)
}

fn already_triggered(state: &WorldState, index: usize, id: &BotId) -> bool {
    state.rules.get(index).is_some_and(|r| r.triggered.contains(id))
}

fn record_execution(state: &mut WorldState, index: usize, report: &mut RuleTickReport) {
    let tick = state.tick();
    if let Some(rule) = state.rules.get_mut(index) {
        rule.execution_count = rule.execution_count.saturating_add(1);
        rule.last_triggered_tick = Some(tick);
        report.executions = report.executions.saturating_add(1);
    }
}

/// Apply `effects` in order. Returns whether at least one applied.
fn run_effects<R: Rng + ?Sized>(
    state: &mut WorldState,
    frame: &RuleFrame,
    effects: &[Effect],
    subject: Option<&BotId>,
    limits: &RulesConfig,
    rng: &mut R,
    narratives: &mut Vec<String>,
) -> bool {
    let mut any = false;
    for effect in effects {
        match apply_effect(state, frame, effect, subject, limits, rng) {
            EffectOutcome::Applied => any = true,
            EffectOutcome::Narrated(text) => {
                any = true;
                narratives.push(text);
            }
            EffectOutcome::Declined => {}
        }
    }
    any
}

/// Decay every active rule once and run the ones still standing.
///
/// - `every_tick` rules run once per awake, living bot in scope (the
///   rule's location, or everyone when global).
/// - `on_enter` rules run once per bot per continuous stay at the rule's
///   location.
/// - `on_time` rules run once, without a subject, at their hour.
///
/// A rule's execution count only moves when at least one effect applied.
pub fn tick_rules<R: Rng + ?Sized>(
    state: &mut WorldState,
    limits: &RulesConfig,
    rng: &mut R,
) -> RuleTickReport {
    let mut report = RuleTickReport::default();
    let tick = state.tick();
    let hour = state.clock.hour();

    for index in 0..state.rules.len() {
        let Some(rule) = state.rules.get_mut(index) else {
            continue;
        };
        if !rule.active {
            continue;
        }
        rule.durability -= rule.decay_rate;
        if rule.durability <= 0.0 {
            rule.active = false;
            info!(rule = %rule.name, executions = rule.execution_count, tick, "rule retired");
            report.narratives.push(format!("{} has faded away", rule.name));
            report.retired.push(rule.name.clone());
            continue;
        }

        let frame = RuleFrame {
            id: rule.id,
            name: rule.name.clone(),
            creator: rule.creator.clone(),
            location: rule.location.clone(),
        };
        let trigger = rule.trigger;
        let last_triggered = rule.last_triggered_tick;
        let condition = rule.condition.clone();
        let effects = rule.effects.clone();

        match trigger {
            Trigger::EveryTick => {
                let scope = match &frame.location {
                    Some(loc) => state.locations.get(loc).map(|l| l.bots.clone()).unwrap_or_default(),
                    None => state.living(),
                };
                for id in scope {
                    if !still_active(state, index) {
                        break;
                    }
                    let Some(bot) = state.bots.get(&id).filter(|b| b.is_active()) else {
                        continue;
                    };
                    let ctx = EvalContext {
                        hour,
                        subject: Some(bot),
                    };
                    if !evaluate(&condition, &ctx, rng) {
                        continue;
                    }
                    if run_effects(state, &frame, &effects, Some(&id), limits, rng, &mut report.narratives) {
                        record_execution(state, index, &mut report);
                    }
                }
            }
            Trigger::OnEnter => {
                let Some(loc) = &frame.location else {
                    continue;
                };
                let present = state.locations.get(loc).map(|l| l.bots.clone()).unwrap_or_default();
                for id in &present {
                    if !still_active(state, index) || already_triggered(state, index, id) {
                        continue;
                    }
                    // Arrival counts even for a bot that is asleep.
                    let Some(bot) = state.bots.get(id).filter(|b| b.is_alive()) else {
                        continue;
                    };
                    let ctx = EvalContext {
                        hour,
                        subject: Some(bot),
                    };
                    if !evaluate(&condition, &ctx, rng) {
                        continue;
                    }
                    let applied = run_effects(state, &frame, &effects, Some(id), limits, rng, &mut report.narratives);
                    if let Some(rule) = state.rules.get_mut(index) {
                        rule.triggered.insert(id.clone());
                    }
                    if applied {
                        record_execution(state, index, &mut report);
                    }
                }
                if let Some(rule) = state.rules.get_mut(index) {
                    rule.triggered.retain(|id| present.contains(id));
                }
            }
            Trigger::OnTime { hour: at } => {
                let due = at == hour && last_triggered.is_none_or(|t| t < tick.saturating_sub(1));
                if !due {
                    continue;
                }
                let ctx = EvalContext { hour, subject: None };
                if !evaluate(&condition, &ctx, rng) {
                    continue;
                }
                if run_effects(state, &frame, &effects, None, limits, rng, &mut report.narratives) {
                    record_execution(state, index, &mut report);
                } else if let Some(rule) = state.rules.get_mut(index) {
                    rule.last_triggered_tick = Some(tick);
                }
            }
        }
    }

    debug!(
        tick,
        active = state.active_rule_count(),
        total = state.rules.len(),
        executions = report.executions,
        "rules evaluated"
    );
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_types::{Condition, ResourceAttr, Rule, RuleId};
    use citysim_world::{BAOAN_VILLAGE, HUAQIANGBEI};

    use super::*;
    use crate::config::SimulationConfig;

    fn world() -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = WorldState::new(&SimulationConfig::default(), &mut rng);
        state.rules.clear();
        state.clock.advance().unwrap();
        (state, rng)
    }

    fn rule(location: Option<&str>, trigger: Trigger, condition: Condition, effects: Vec<Effect>) -> Rule {
        Rule {
            id: RuleId::new(),
            name: String::from("Test rule"),
            creator: String::from("system"),
            creator_name: String::from("city"),
            created_tick: 0,
            active: true,
            location: location.map(str::to_owned),
            trigger,
            condition,
            effects,
            description: String::new(),
            durability: 1.0,
            decay_rate: 0.3,
            execution_count: 0,
            last_triggered_tick: None,
            triggered: BTreeSet::new(),
        }
    }

    fn isolate(state: &mut WorldState, id: &BotId, location: &str) {
        for bot in state.bots.values_mut() {
            if bot.id != *id {
                bot.is_sleeping = true;
            }
        }
        state.move_bot(id, location);
    }

    #[test]
    fn durability_falls_every_tick_and_retirement_is_permanent() {
        let (mut state, mut rng) = world();
        state.rules.push(rule(None, Trigger::EveryTick, Condition::Always(false), Vec::new()));
        let limits = RulesConfig::default();

        let mut previous = 1.0;
        for _ in 0..3 {
            tick_rules(&mut state, &limits, &mut rng);
            let r = state.rules.first().unwrap();
            assert!(r.active);
            assert!(r.durability < previous);
            assert!((previous - r.durability - 0.3).abs() < 1e-9);
            previous = r.durability;
        }
        let report = tick_rules(&mut state, &limits, &mut rng);
        assert_eq!(report.retired, vec![String::from("Test rule")]);
        let retired = state.rules.first().unwrap().clone();
        assert!(!retired.active);

        for _ in 0..5 {
            tick_rules(&mut state, &limits, &mut rng);
        }
        let r = state.rules.first().unwrap();
        assert!(!r.active);
        assert!((r.durability - retired.durability).abs() < f64::EPSILON);
        assert_eq!(state.rules.len(), 1);
    }

    #[test]
    fn unaffordable_every_tick_effect_does_not_count() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        isolate(&mut state, &id, HUAQIANGBEI);
        state.bots.get_mut(&id).unwrap().money = 5;
        let mut r = rule(
            Some(HUAQIANGBEI),
            Trigger::EveryTick,
            Condition::Random(1.0),
            vec![Effect::ModifyBotAttr {
                attr: ResourceAttr::Money,
                delta: -10,
                cost_money: 10,
            }],
        );
        r.durability = 100.0;
        state.rules.push(r);

        let report = tick_rules(&mut state, &RulesConfig::default(), &mut rng);
        assert_eq!(report.executions, 0);
        assert_eq!(state.bots.get(&id).unwrap().money, 5);
        assert_eq!(state.rules.first().unwrap().execution_count, 0);
    }

    #[test]
    fn sleeping_bots_are_skipped() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        isolate(&mut state, &id, HUAQIANGBEI);
        state.bots.get_mut(&id).unwrap().is_sleeping = true;
        let mut r = rule(
            Some(HUAQIANGBEI),
            Trigger::EveryTick,
            Condition::Always(true),
            vec![Effect::ModifyBotAttr {
                attr: ResourceAttr::Satiety,
                delta: 5,
                cost_money: 0,
            }],
        );
        r.durability = 100.0;
        state.rules.push(r);
        tick_rules(&mut state, &RulesConfig::default(), &mut rng);
        assert_eq!(state.rules.first().unwrap().execution_count, 0);
    }

    #[test]
    fn on_enter_fires_once_per_stay() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        isolate(&mut state, &id, BAOAN_VILLAGE);
        let others: Vec<BotId> = state.bots.keys().filter(|b| **b != id).cloned().collect();
        for other in &others {
            state.move_bot(other, HUAQIANGBEI);
        }
        state.bots.get_mut(&id).unwrap().satiety = 10;
        let mut r = rule(
            Some(BAOAN_VILLAGE),
            Trigger::OnEnter,
            Condition::Always(true),
            vec![Effect::ModifyBotAttr {
                attr: ResourceAttr::Satiety,
                delta: 10,
                cost_money: 0,
            }],
        );
        r.durability = 100.0;
        state.rules.push(r);
        let limits = RulesConfig::default();

        tick_rules(&mut state, &limits, &mut rng);
        tick_rules(&mut state, &limits, &mut rng);
        assert_eq!(state.bots.get(&id).unwrap().satiety, 20);
        assert!(state.rules.first().unwrap().triggered.contains(&id));

        state.move_bot(&id, HUAQIANGBEI);
        tick_rules(&mut state, &limits, &mut rng);
        assert!(state.rules.first().unwrap().triggered.is_empty());

        state.move_bot(&id, BAOAN_VILLAGE);
        tick_rules(&mut state, &limits, &mut rng);
        assert_eq!(state.bots.get(&id).unwrap().satiety, 30);
        assert_eq!(state.rules.first().unwrap().execution_count, 2);
    }

    #[test]
    fn on_enter_greets_a_sleeping_arrival() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(1);
        isolate(&mut state, &id, BAOAN_VILLAGE);
        state.bots.get_mut(&id).unwrap().is_sleeping = true;
        let mut r = rule(
            Some(BAOAN_VILLAGE),
            Trigger::OnEnter,
            Condition::Always(true),
            vec![Effect::Narrative {
                text: String::from("the stall owner nods"),
            }],
        );
        r.durability = 100.0;
        state.rules.push(r);
        tick_rules(&mut state, &RulesConfig::default(), &mut rng);
        assert!(state.rules.first().unwrap().triggered.contains(&id));
    }

    #[test]
    fn on_time_runs_once_at_its_hour() {
        let (mut state, mut rng) = world();
        let hour = state.clock.hour();
        let mut r = rule(
            Some(HUAQIANGBEI),
            Trigger::OnTime { hour },
            Condition::Always(true),
            vec![Effect::Narrative {
                text: String::from("the market bell rings"),
            }],
        );
        r.durability = 100.0;
        state.rules.push(r);
        let limits = RulesConfig::default();

        let report = tick_rules(&mut state, &limits, &mut rng);
        assert_eq!(report.narratives, vec![String::from("the market bell rings")]);
        let again = tick_rules(&mut state, &limits, &mut rng);
        assert!(again.narratives.is_empty());

        state.clock.advance().unwrap();
        let later = tick_rules(&mut state, &limits, &mut rng);
        assert!(later.narratives.is_empty());
        assert_eq!(state.rules.first().unwrap().execution_count, 1);
    }
}
