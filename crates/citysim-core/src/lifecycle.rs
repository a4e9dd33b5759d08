//! Death and succession.
//!
//! A bot whose hp reaches zero dies exactly once. Its money passes to the
//! closest living contact, its last core memories become legends, a grave
//! is dug, its bonds are notified, and a newcomer takes over the slot with
//! fresh vitals and a faint echo of the dead bot's social world.
//!
//! The guard is `alive && hp <= 0`. The replacement reuses the slot with
//! full hp, so a second call for the same slot finds nothing to do.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{info, warn};

use citysim_agents::{Newcomer, closest_bond, heard_of, keep_last, spawn_bot, strong_bonds};
use citysim_types::{
    Bot, BotId, BotStatus, CoreMemory, Grave, Impact, Legend, LegendId, MessagePriority,
};
use citysim_world::{REPLACEMENT_TEMPLATES, SPAWN_HOMES, location_names};

use crate::config::RulesConfig;
use crate::state::{WorldState, clip};

/// Core memories turned into legends on death.
const LEGENDS_PER_DEATH: usize = 3;

/// Recent legends a newcomer already knows.
const LEGENDS_INHERITED: usize = 3;

/// Upper bound on `known_legends`.
pub const KNOWN_LEGENDS_KEEP: usize = 10;

/// Newcomer starting money range.
const NEWCOMER_MONEY: std::ops::RangeInclusive<u64> = 100..=500;

/// What a death produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeathRecord {
    /// Slot that changed hands.
    pub slot: BotId,
    /// Name of the dead bot.
    pub name: String,
    /// Heir and amount inherited, if anyone inherited.
    pub heir: Option<(BotId, u64)>,
    /// Legends created.
    pub legends: usize,
    /// Name of the newcomer now holding the slot.
    pub successor: String,
}

/// Process the death of `id` if it is due.
///
/// Returns `None` when the bot is unknown, already dead, or still has hp.
pub fn handle_death<R: Rng + ?Sized>(
    state: &mut WorldState,
    id: &BotId,
    limits: &RulesConfig,
    rng: &mut R,
) -> Option<DeathRecord> {
    let dead = {
        let bot = state.bots.get_mut(id)?;
        if !bot.is_alive() || bot.hp > 0.0 {
            return None;
        }
        bot.status = BotStatus::Dead;
        bot.hp = 0.0;
        bot.is_sleeping = false;
        bot.current_task = None;
        bot.clone()
    };
    state.unplace(id);
    info!(
        bot_id = %id,
        name = %dead.name,
        age = dead.age,
        location = %dead.location,
        money = dead.money,
        "bot died"
    );

    let heir = pass_on_money(state, &dead);
    let legends = fossilize(state, &dead);
    dig_grave(state, &dead);

    state.add_public_memory(
        &dead.location,
        format!("{} left the world here", dead.name),
        id.as_str(),
        Impact::Death,
        limits,
    );
    notify_bonds(state, &dead);

    let successor = spawn_successor(state, &dead, rng);
    state.push_event(
        format!("{} left this world", dead.name),
        format!("{}'s life is over. {}", dead.name, dead.narrative_summary)
            .trim_end()
            .to_owned(),
    );
    state.reputation_board.remove(id);

    Some(DeathRecord {
        slot: id.clone(),
        name: dead.name,
        heir,
        legends,
        successor,
    })
}

/// Family first, otherwise the closest living bond.
fn heir_of(state: &WorldState, dead: &Bot) -> Option<BotId> {
    dead.family
        .members()
        .find(|m| *m != &dead.id && state.is_alive(m.as_str()))
        .cloned()
        .or_else(|| {
            closest_bond(dead, |k| k != dead.id.as_str() && state.is_alive(k)).map(BotId::from)
        })
}

fn pass_on_money(state: &mut WorldState, dead: &Bot) -> Option<(BotId, u64)> {
    if dead.money == 0 {
        return None;
    }
    let heir_id = heir_of(state, dead)?;
    let heir = state.bots.get_mut(&heir_id)?;
    heir.money = heir.money.saturating_add(dead.money);
    let heir_name = heir.name.clone();
    if let Some(bot) = state.bots.get_mut(&dead.id) {
        bot.money = 0;
    }
    state.send_message(
        "system",
        Some(heir_id.clone()),
        format!(
            "[inheritance] {} has left this world. As the closest person, you inherit {} yuan.",
            dead.name, dead.money
        ),
        MessagePriority::High,
    );
    info!(from = %dead.id, heir = %heir_id, heir_name = %heir_name, amount = dead.money, "inheritance");
    Some((heir_id, dead.money))
}

fn fossilize(state: &mut WorldState, dead: &Bot) -> usize {
    let start = dead.core_memories.len().saturating_sub(LEGENDS_PER_DEATH);
    let memories = dead.core_memories.get(start..).unwrap_or_default();
    for memory in memories {
        state.legends.push(Legend {
            id: LegendId::new(),
            original_bot: dead.id.clone(),
            original_name: dead.name.clone(),
            content: memory.summary.clone(),
            origin_tick: state.tick(),
            origin_time: state.time(),
            location: dead.location.clone(),
            spread_count: 0,
        });
    }
    memories.len()
}

fn dig_grave(state: &mut WorldState, dead: &Bot) {
    let grave = Grave {
        bot_id: dead.id.clone(),
        name: dead.name.clone(),
        age: dead.age,
        origin: dead.origin.clone(),
        generation: dead.generation,
        death_tick: state.tick(),
        death_time: state.time(),
        death_location: dead.location.clone(),
        final_money: dead.money,
        reputation_score: dead.reputation.score,
        reputation_tags: dead.reputation.tags.clone(),
        created_things: dead.created_things.clone(),
        long_term_goal: dead.long_term_goal.clone(),
        narrative_summary: dead.narrative_summary.clone(),
    };
    state.graveyard.push(grave);
}

fn notify_bonds(state: &mut WorldState, dead: &Bot) {
    let living: Vec<BotId> = dead
        .bonds
        .keys()
        .filter(|k| k.as_str() != dead.id.as_str() && state.is_alive(k))
        .map(|k| BotId::from(k.as_str()))
        .collect();
    for target in living {
        state.send_message(
            "system",
            Some(target),
            format!("[obituary] {} has left this world.", dead.name),
            MessagePriority::High,
        );
    }
}

fn spawn_successor<R: Rng + ?Sized>(state: &mut WorldState, dead: &Bot, rng: &mut R) -> String {
    let Some(template) = REPLACEMENT_TEMPLATES.choose(rng) else {
        warn!(slot = %dead.id, "no replacement templates; slot stays empty");
        return String::new();
    };
    let generation = state.generation_count.max(dead.generation).saturating_add(1);
    state.generation_count = generation;

    let places: Vec<&str> = location_names().collect();
    let location = places.choose(rng).copied().unwrap_or(dead.location.as_str()).to_owned();
    let home = SPAWN_HOMES.choose(rng).copied().unwrap_or(dead.home.as_str()).to_owned();

    let mut bot = spawn_bot(
        Newcomer {
            slot: dead.id.clone(),
            template,
            generation,
            inherited_from: dead.name.clone(),
            location: location.clone(),
            home,
            money: rng.random_range(NEWCOMER_MONEY),
            profile: dead.desire_profile.clone(),
        },
        rng,
    );

    for (target, _) in strong_bonds(dead) {
        if target != dead.id.as_str() && state.is_alive(target) {
            bot.bonds.insert(target.to_owned(), heard_of(&dead.name));
        }
    }

    let start = state.legends.len().saturating_sub(LEGENDS_INHERITED);
    let (tick, time) = (state.tick(), state.time());
    for legend in state.legends.iter().skip(start) {
        bot.known_legends.push(legend.id);
        bot.core_memories.push(CoreMemory {
            summary: format!(
                "[legend] heard the story of {}: {}",
                legend.original_name,
                clip(&legend.content, 50)
            ),
            emotion: String::from("neutral"),
            tick,
            time: time.clone(),
            tag: Some(String::from("legend")),
        });
    }
    keep_last(&mut bot.known_legends, KNOWN_LEGENDS_KEEP);

    let name = bot.name.clone();
    let desc = format!("{name} from {}, {}", bot.origin, clip(template.background, 30));
    info!(
        slot = %dead.id,
        name = %name,
        generation,
        location = %location,
        "newcomer took over slot"
    );
    state.bots.insert(dead.id.clone(), bot);
    state.place(&dead.id, &location);
    state.push_event(format!("New resident {name} arrived in Shenzhen"), desc);
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_agents::adjust_bond;

    use super::*;
    use crate::config::SimulationConfig;

    fn world() -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(17);
        let state = WorldState::new(&SimulationConfig::default(), &mut rng);
        (state, rng)
    }

    fn kill(state: &mut WorldState, id: &BotId) {
        state.bots.get_mut(id).unwrap().hp = 0.0;
    }

    #[test]
    fn death_is_processed_once() {
        let (mut state, mut rng) = world();
        let limits = RulesConfig::default();
        let id = BotId::slot(5);
        let friend = BotId::slot(6);
        {
            let bot = state.bots.get_mut(&id).unwrap();
            bot.money = 300;
            adjust_bond(bot, friend.as_str(), 40, "old friend");
        }
        let friend_money = state.bots.get(&friend).unwrap().money;
        kill(&mut state, &id);

        let first = handle_death(&mut state, &id, &limits, &mut rng).unwrap();
        assert_eq!(first.heir, Some((friend.clone(), 300)));
        let second = handle_death(&mut state, &id, &limits, &mut rng);
        assert!(second.is_none());

        assert_eq!(state.graveyard.len(), 1);
        assert_eq!(state.bots.get(&friend).unwrap().money, friend_money + 300);
        assert_eq!(state.generation_count, 1);

        let newcomer = state.bots.get(&id).unwrap();
        assert!(newcomer.is_alive());
        assert_eq!(newcomer.generation, 1);
        assert_eq!(newcomer.inherited_from.as_deref(), Some(first.name.as_str()));
        assert_eq!(newcomer.bonds.get(friend.as_str()).unwrap().label, "heard of");
        let holders = state.locations.values().filter(|l| l.contains(&id)).count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn living_bots_are_left_alone() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(2);
        assert!(handle_death(&mut state, &id, &RulesConfig::default(), &mut rng).is_none());
        assert!(handle_death(&mut state, &BotId::slot(99), &RulesConfig::default(), &mut rng).is_none());
        assert!(state.graveyard.is_empty());
    }

    #[test]
    fn family_inherits_before_friends() {
        let (mut state, mut rng) = world();
        let child = BotId::slot(3);
        let parent = BotId::slot(8);
        let friend = BotId::slot(1);
        {
            let bot = state.bots.get_mut(&child).unwrap();
            bot.money = 120;
            adjust_bond(bot, friend.as_str(), 90, "best friend");
        }
        kill(&mut state, &child);
        let record = handle_death(&mut state, &child, &RulesConfig::default(), &mut rng).unwrap();
        assert_eq!(record.heir, Some((parent.clone(), 120)));
        let msg = state.message_board.iter().find(|m| m.to.as_ref() == Some(&parent)).unwrap();
        assert!(msg.msg.starts_with("[inheritance]"));
        assert_eq!(state.graveyard.first().unwrap().final_money, 120);
    }

    #[test]
    fn core_memories_become_legends_for_the_next_generation() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(4);
        {
            let bot = state.bots.get_mut(&id).unwrap();
            for i in 0..5 {
                bot.core_memories.push(CoreMemory {
                    summary: format!("memory {i}"),
                    ..CoreMemory::default()
                });
            }
        }
        kill(&mut state, &id);
        let record = handle_death(&mut state, &id, &RulesConfig::default(), &mut rng).unwrap();
        assert_eq!(record.legends, 3);
        let contents: Vec<_> = state.legends.iter().map(|l| l.content.as_str()).collect();
        assert_eq!(contents, vec!["memory 2", "memory 3", "memory 4"]);

        let newcomer = state.bots.get(&id).unwrap();
        assert_eq!(newcomer.known_legends.len(), 3);
        assert!(state.legends.iter().all(|l| l.spread_count == 0));
        assert!(
            newcomer
                .core_memories
                .iter()
                .all(|m| m.tag.as_deref() == Some("legend"))
        );
        assert!(state.events.iter().any(|e| e.event.starts_with("New resident")));
    }
}
