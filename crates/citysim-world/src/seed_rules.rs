//! Rules present in every fresh world.
//!
//! Seed rules give each district a baseline behavior before any bot has
//! synthesized rules of its own. They are ordinary [`Rule`] records and
//! decay like any other, only much slower.

use std::collections::BTreeSet;

use citysim_types::{
    Condition, Desire, Effect, Emotion, MoodDimension, ResourceAttr, Rule, RuleId, Trigger,
};

use crate::locations::{BAOAN_VILLAGE, BAY_PARK, DONGMEN_OLD_STREET, FUTIAN_CBD, HUAQIANGBEI};

/// Creator id used for rules that belong to the city itself.
pub const SYSTEM_CREATOR: &str = "system";

struct SeedSpec {
    name: &'static str,
    creator: &'static str,
    creator_name: &'static str,
    location: &'static str,
    description: &'static str,
    durability: f64,
    decay_rate: f64,
}

fn build(spec: &SeedSpec, tick: u64, condition: Condition, effects: Vec<Effect>) -> Rule {
    Rule {
        id: RuleId::new(),
        name: spec.name.to_owned(),
        creator: spec.creator.to_owned(),
        creator_name: spec.creator_name.to_owned(),
        created_tick: tick,
        active: true,
        location: Some(spec.location.to_owned()),
        trigger: Trigger::EveryTick,
        condition,
        effects,
        description: spec.description.to_owned(),
        durability: spec.durability,
        decay_rate: spec.decay_rate,
        execution_count: 0,
        last_triggered_tick: None,
        triggered: BTreeSet::new(),
    }
}

const fn emotion(e: Emotion, delta: f64) -> Effect {
    Effect::ModifyBotEmotion {
        emotion: MoodDimension::Emotion(e),
        delta,
    }
}

const fn desire(d: Desire, delta: f64) -> Effect {
    Effect::ModifyBotEmotion {
        emotion: MoodDimension::Desire(d),
        delta,
    }
}

fn narrative(text: &str) -> Effect {
    Effect::Narrative {
        text: text.to_owned(),
    }
}

fn daytime(start: u32, end: u32, chance: f64) -> Condition {
    Condition::And(vec![
        Condition::TimeBetween(start, end),
        Condition::Random(chance),
    ])
}

/// The five seed rules, stamped with the creation tick.
pub fn seed_rules(tick: u64) -> Vec<Rule> {
    vec![
        build(
            &SeedSpec {
                name: "Old Li's breakfast stall",
                creator: "npc_old_li",
                creator_name: "Old Li's breakfast stall",
                location: BAOAN_VILLAGE,
                description: "Steamed buns and soy milk for 12 yuan; hungry passers-by stop to eat",
                durability: 500.0,
                decay_rate: 0.02,
            },
            tick,
            daytime(6, 22, 0.15),
            vec![
                Effect::ModifyBotAttr {
                    attr: ResourceAttr::Satiety,
                    delta: 35,
                    cost_money: 12,
                },
                emotion(Emotion::Happiness, 3.0),
                Effect::GenerateIncome { amount: 0 },
                narrative("bought steamed buns and soy milk at Old Li's stall"),
            ],
        ),
        build(
            &SeedSpec {
                name: "Huaqiangbei street economy",
                creator: SYSTEM_CREATOR,
                creator_name: "the city",
                location: HUAQIANGBEI,
                description: "Cheap gadgets everywhere; the crowd makes everyone want to show off",
                durability: 999.0,
                decay_rate: 0.005,
            },
            tick,
            daytime(9, 21, 0.1),
            vec![
                desire(Desire::Vanity, 2.0),
                narrative("was drawn in by a stall of flashy new gadgets"),
            ],
        ),
        build(
            &SeedSpec {
                name: "Bay Park calm",
                creator: SYSTEM_CREATOR,
                creator_name: "the city",
                location: BAY_PARK,
                description: "Sea breeze and open sky; the park slows everyone down",
                durability: 999.0,
                decay_rate: 0.005,
            },
            tick,
            Condition::Random(0.2),
            vec![
                Effect::ModifyBotAttr {
                    attr: ResourceAttr::Energy,
                    delta: 5,
                    cost_money: 0,
                },
                emotion(Emotion::Happiness, 5.0),
                emotion(Emotion::Anxiety, -3.0),
                Effect::AttractBot {
                    chance: 0.05,
                    location: Some(BAY_PARK.to_owned()),
                    message: String::from("Someone says the sunset at the bay is beautiful today"),
                },
            ],
        ),
        build(
            &SeedSpec {
                name: "CBD pressure",
                creator: SYSTEM_CREATOR,
                creator_name: "the city",
                location: FUTIAN_CBD,
                description: "Glass towers and tailored suits; standing here makes people restless",
                durability: 999.0,
                decay_rate: 0.005,
            },
            tick,
            daytime(9, 18, 0.15),
            vec![
                emotion(Emotion::Anxiety, 3.0),
                desire(Desire::Vanity, 2.0),
                narrative("felt small among the office towers"),
            ],
        ),
        build(
            &SeedSpec {
                name: "Dongmen day labor",
                creator: "npc_foreman_chen",
                creator_name: "Foreman Chen",
                location: DONGMEN_OLD_STREET,
                description: "Foreman Chen hires whoever is standing around for a shift of hauling",
                durability: 800.0,
                decay_rate: 0.01,
            },
            tick,
            daytime(7, 17, 0.1),
            vec![
                Effect::ModifyBotAttr {
                    attr: ResourceAttr::Money,
                    delta: 80,
                    cost_money: 0,
                },
                Effect::ModifyBotAttr {
                    attr: ResourceAttr::Energy,
                    delta: -30,
                    cost_money: 0,
                },
                narrative("was hired by Foreman Chen for a day of hauling"),
            ],
        ),
    ]
}
