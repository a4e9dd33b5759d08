//! Accepting new rules proposed after an action.
//!
//! Proposals come from an untrusted oracle. Before a draft becomes a live
//! rule it is rate-limited, structurally validated and clamped, and
//! checked for semantic overlap with every active rule and with drafts
//! accepted earlier in the same batch.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::info;

use citysim_types::{BotId, Condition, Effect, Rule, RuleDraft, RuleId, RuleSummary, Trigger};
use citysim_world::resolve_location;

use crate::config::RulesConfig;
use crate::state::WorldState;

/// Largest magnitude a single synthesized numeric effect may carry.
pub const MAX_EFFECT_DELTA: i64 = 20;

/// Reputation awarded for each accepted rule.
pub const RULE_REPUTATION: i32 = 5;

/// Split text into comparison terms: lowercase ASCII alphanumeric words,
/// plus every non-ASCII alphanumeric character on its own.
pub fn terms(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            word.push(ch.to_ascii_lowercase());
            continue;
        }
        if !word.is_empty() {
            out.insert(std::mem::take(&mut word));
        }
        if !ch.is_ascii() && ch.is_alphanumeric() {
            out.insert(ch.to_string());
        }
    }
    if !word.is_empty() {
        out.insert(word);
    }
    out
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    let num = u32::try_from(numerator).map_or(f64::from(u32::MAX), f64::from);
    let den = u32::try_from(denominator).map_or(f64::from(u32::MAX), f64::from);
    if den > 0.0 { num / den } else { 0.0 }
}

/// Shared terms divided by the size of the larger term set. Two texts
/// without terms do not overlap.
pub fn overlap(a: &str, b: &str) -> f64 {
    let a = terms(a);
    let b = terms(b);
    let shared = a.intersection(&b).count();
    ratio(shared, a.len().max(b.len()))
}

/// Whether a candidate repeats an existing rule.
///
/// `existing` yields `(name, description)` pairs.
pub fn is_duplicate<'a>(
    name: &str,
    description: &str,
    existing: impl IntoIterator<Item = (&'a str, &'a str)>,
    limits: &RulesConfig,
) -> bool {
    existing.into_iter().any(|(other_name, other_desc)| {
        overlap(name, other_name) >= limits.name_overlap
            || overlap(description, other_desc) >= limits.description_overlap
    })
}

/// Roll whether synthesis is attempted at all given `active` rules.
pub fn synthesis_allowed<R: Rng + ?Sized>(active: usize, limits: &RulesConfig, rng: &mut R) -> bool {
    rng.random::<f64>() < limits.synthesis_acceptance(active)
}

fn clamp_delta(delta: i64) -> i64 {
    delta.clamp(MAX_EFFECT_DELTA.saturating_neg(), MAX_EFFECT_DELTA)
}

fn clamp_effect(effect: Effect) -> Effect {
    let bound = f64::from(i32::try_from(MAX_EFFECT_DELTA).unwrap_or(i32::MAX));
    match effect {
        Effect::ModifyBotAttr {
            attr,
            delta,
            cost_money,
        } => Effect::ModifyBotAttr {
            attr,
            delta: clamp_delta(delta),
            cost_money,
        },
        Effect::ModifyBotEmotion { emotion, delta } => Effect::ModifyBotEmotion {
            emotion,
            delta: if delta.is_finite() { delta.clamp(-bound, bound) } else { 0.0 },
        },
        Effect::AttractBot {
            chance,
            location,
            message,
        } => Effect::AttractBot {
            chance: if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 },
            location,
            message,
        },
        Effect::GenerateIncome { amount } => Effect::GenerateIncome {
            amount: amount.min(MAX_EFFECT_DELTA.unsigned_abs()),
        },
        other => other,
    }
}

fn condition_is_sane(condition: &Condition) -> bool {
    match condition {
        Condition::Random(p) => p.is_finite(),
        Condition::TimeBetween(start, end) => *start < 24 && *end < 24,
        Condition::BotAttrLt(_, v) | Condition::BotAttrGt(_, v) => v.is_finite(),
        Condition::And(children) | Condition::Or(children) => children.iter().all(condition_is_sane),
        Condition::Always(_) | Condition::BotAt(_) => true,
    }
}

/// Validate and clamp a draft. Returns `None` when the draft is unusable.
///
/// A missing or unknown location scopes the rule to `fallback_location`.
pub fn validate_draft(mut draft: RuleDraft, fallback_location: &str, limits: &RulesConfig) -> Option<RuleDraft> {
    draft.name = draft.name.trim().to_owned();
    if draft.name.is_empty() || draft.effects.is_empty() {
        return None;
    }
    if let Trigger::OnTime { hour } = draft.trigger
        && hour >= 24
    {
        return None;
    }
    if !condition_is_sane(&draft.condition) {
        return None;
    }
    if draft.description.trim().is_empty() {
        draft.description.clone_from(&draft.name);
    }
    let location = draft
        .location
        .as_deref()
        .and_then(|l| resolve_location(l).ok())
        .unwrap_or(fallback_location);
    draft.location = Some(location.to_owned());
    draft.durability = if draft.durability.is_finite() {
        draft.durability.clamp(limits.durability_min, limits.durability_max)
    } else {
        limits.durability_min
    };
    draft.decay_rate = if draft.decay_rate.is_finite() {
        draft.decay_rate.clamp(limits.decay_min, limits.decay_max)
    } else {
        limits.decay_max
    };
    draft.effects = draft.effects.into_iter().map(clamp_effect).collect();
    Some(draft)
}

/// Turn drafts into live rules owned by `creator`.
///
/// Each accepted rule earns the creator reputation. Returns summaries of
/// the rules that were created.
pub fn accept_drafts(
    state: &mut WorldState,
    drafts: Vec<RuleDraft>,
    creator: &BotId,
    fallback_location: &str,
    limits: &RulesConfig,
) -> Vec<RuleSummary> {
    let creator_name = state.name_of(creator.as_str());
    let tick = state.tick();
    let mut seen: Vec<(String, String)> = state
        .rules
        .iter()
        .filter(|r| r.active)
        .map(|r| (r.name.clone(), r.description.clone()))
        .collect();
    let mut created = Vec::new();

    for draft in drafts {
        let Some(draft) = validate_draft(draft, fallback_location, limits) else {
            continue;
        };
        let existing = seen.iter().map(|(n, d)| (n.as_str(), d.as_str()));
        if is_duplicate(&draft.name, &draft.description, existing, limits) {
            info!(rule = %draft.name, "synthesized rule skipped as duplicate");
            continue;
        }
        let rule = Rule {
            id: RuleId::new(),
            name: draft.name,
            creator: creator.as_str().to_owned(),
            creator_name: creator_name.clone(),
            created_tick: tick,
            active: true,
            location: draft.location,
            trigger: draft.trigger,
            condition: draft.condition,
            effects: draft.effects,
            description: draft.description,
            durability: draft.durability,
            decay_rate: draft.decay_rate,
            execution_count: 0,
            last_triggered_tick: None,
            triggered: BTreeSet::new(),
        };
        info!(
            bot_id = %creator,
            rule = %rule.name,
            location = ?rule.location,
            durability = rule.durability,
            decay_rate = rule.decay_rate,
            "new rule injected"
        );
        seen.push((rule.name.clone(), rule.description.clone()));
        state.record_deed(creator, RULE_REPUTATION, &format!("created rule [{}]", rule.name));
        created.push(RuleSummary::from(&rule));
        state.rules.push(rule);
    }
    created
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_types::ResourceAttr;
    use citysim_world::{DONGMEN_OLD_STREET, HUAQIANGBEI};

    use super::*;
    use crate::config::SimulationConfig;

    fn draft(name: &str, description: &str) -> RuleDraft {
        RuleDraft {
            name: name.to_owned(),
            description: description.to_owned(),
            location: Some(HUAQIANGBEI.to_owned()),
            trigger: Trigger::EveryTick,
            condition: Condition::Random(0.2),
            effects: vec![Effect::ModifyBotAttr {
                attr: ResourceAttr::Satiety,
                delta: 60,
                cost_money: 12,
            }],
            durability: 5000.0,
            decay_rate: 0.0,
        }
    }

    #[test]
    fn terms_split_ascii_words_and_cjk_chars() {
        let t = terms("Fried-noodle stall, 炒粉摊!");
        let expected: BTreeSet<String> = ["fried", "noodle", "stall", "炒", "粉", "摊"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(t, expected);
    }

    #[test]
    fn overlap_uses_larger_set() {
        assert!((overlap("night market food", "night market") - 2.0 / 3.0).abs() < 1e-9);
        assert!(overlap("", "").abs() < f64::EPSILON);
        assert!((overlap("炒粉摊", "炒粉") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn description_sharing_forty_percent_is_duplicate() {
        let limits = RulesConfig::default();
        let existing = [(
            "Guitar corner",
            "hungry people buy fried noodles at the stall every evening",
        )];
        // 4 of 10 terms shared.
        assert!(is_duplicate(
            "Cheap eats",
            "hungry workers buy cold drinks near metro exit noodles stall",
            existing,
            &limits
        ));
        assert!(!is_duplicate(
            "Street chess",
            "old men gather to play chess under the banyan tree",
            existing,
            &limits
        ));
        assert!(is_duplicate("Guitar corner live", "unrelated", existing, &limits));
    }

    #[test]
    fn validation_clamps_and_rejects() {
        let limits = RulesConfig::default();
        let ok = validate_draft(draft("Noodle stall", ""), DONGMEN_OLD_STREET, &limits).unwrap();
        assert!((ok.durability - 1000.0).abs() < f64::EPSILON);
        assert!((ok.decay_rate - 0.01).abs() < f64::EPSILON);
        assert_eq!(ok.description, "Noodle stall");
        assert!(matches!(ok.effects.first(), Some(Effect::ModifyBotAttr { delta: 20, .. })));

        let mut nowhere = draft("Pop-up", "x");
        nowhere.location = Some(String::from("Atlantis"));
        let scoped = validate_draft(nowhere, DONGMEN_OLD_STREET, &limits).unwrap();
        assert_eq!(scoped.location.as_deref(), Some(DONGMEN_OLD_STREET));

        assert!(validate_draft(draft("  ", "x"), DONGMEN_OLD_STREET, &limits).is_none());
        let mut empty = draft("Nothing", "x");
        empty.effects.clear();
        assert!(validate_draft(empty, DONGMEN_OLD_STREET, &limits).is_none());
        let mut late = draft("Late", "x");
        late.trigger = Trigger::OnTime { hour: 25 };
        assert!(validate_draft(late, DONGMEN_OLD_STREET, &limits).is_none());
    }

    #[test]
    fn batch_dedups_against_itself_and_rewards_creator() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = WorldState::new(&SimulationConfig::default(), &mut rng);
        let before = state.rules.len();
        let creator = BotId::slot(7);
        let created = accept_drafts(
            &mut state,
            vec![
                draft("Fried noodle stall", "hungry people buy fried noodles at the stall"),
                draft("Noodle stall two", "hungry people buy fried noodles at the stall cheaply"),
            ],
            &creator,
            HUAQIANGBEI,
            &RulesConfig::default(),
        );
        assert_eq!(created.len(), 1);
        assert_eq!(state.rules.len(), before.saturating_add(1));
        let bot = state.bots.get(&creator).unwrap();
        assert_eq!(bot.reputation.score, RULE_REPUTATION);
        assert_eq!(state.rules.last().unwrap().creator, "bot_7");
    }

    #[test]
    fn gate_closes_as_rules_accumulate() {
        let mut rng = StdRng::seed_from_u64(9);
        let limits = RulesConfig::default();
        assert!((0..20).all(|_| synthesis_allowed(5, &limits, &mut rng)));
        let accepted = (0..1000).filter(|_| synthesis_allowed(60, &limits, &mut rng)).count();
        assert!(accepted < 300, "accepted {accepted}");
    }
}
