//! Ambient happenings that are not driven by any bot's action.
//!
//! Weather changes each morning, random city events shift everyone's mood,
//! personal fate strikes one bot at a time, legends spread in the evening,
//! bots idly like each other's posts, and NPCs warm up to regulars.

use rand::Rng;
use rand::seq::{IndexedMutRandom, IndexedRandom};
use tracing::{debug, info, warn};

use citysim_agents::{gauge_add, gauge_apply, keep_last, money_apply};
use citysim_types::{BotId, MessagePriority, Weather};
use citysim_world::{
    EventSpecial, FATE_EVENTS, FateEventSpec, FateSocial, WORLD_EVENTS, WorldEventSpec,
    next_weather, weather_info,
};

use crate::config::EventsConfig;
use crate::lifecycle::KNOWN_LEGENDS_KEEP;
use crate::state::{WorldState, clip};

/// Money found by the lucky bot in a `found_money` event.
const FOUND_MONEY: u64 = 50;

/// Chance per awake bot of a free snack in a `free_food` event.
const FREE_FOOD_CHANCE: f64 = 0.3;

/// Satiety gained from a free snack.
const FREE_FOOD_SATIETY: u32 = 15;

/// Moments considered by passive browsing.
const BROWSED_MOMENTS: usize = 10;

/// NPC attitude thresholds.
const NPC_FAMILIAR: u32 = 5;
const NPC_LOCAL: u32 = 10;

/// A random awake bot.
pub fn random_awake<R: Rng + ?Sized>(state: &WorldState, rng: &mut R) -> Option<BotId> {
    state.awake().choose(rng).cloned()
}

/// Draw the day's weather.
pub fn change_weather<R: Rng + ?Sized>(state: &mut WorldState, rng: &mut R) -> Weather {
    let previous = state.weather;
    state.weather = next_weather(previous, rng);
    info!(?previous, weather = ?state.weather, "weather changed");
    state.weather
}

/// Roll for random city events. Returns the names of those that fired.
pub fn roll_world_events<R: Rng + ?Sized>(
    state: &mut WorldState,
    cfg: &EventsConfig,
    rng: &mut R,
) -> Vec<&'static str> {
    let chance = cfg.world_event_chance + weather_info(state.weather).event_chance_mod;
    let mut fired = Vec::new();
    for roll in [chance, cfg.second_event_chance] {
        if rng.random::<f64>() < roll
            && let Some(spec) = WORLD_EVENTS.choose(rng)
        {
            trigger_world_event(state, spec, rng);
            fired.push(spec.name);
        }
    }
    fired
}

/// Apply a city event to every awake bot.
pub fn trigger_world_event<R: Rng + ?Sized>(
    state: &mut WorldState,
    spec: &WorldEventSpec,
    rng: &mut R,
) {
    state.push_event(spec.name, spec.desc);
    for bot in state.bots.values_mut().filter(|b| b.is_active()) {
        for &(emotion, delta) in spec.mood {
            bot.emotions.adjust(emotion, delta);
        }
    }
    match spec.special {
        EventSpecial::None => {}
        EventSpecial::FoundMoney => {
            if let Some(lucky) = random_awake(state, rng)
                && let Some(bot) = state.bots.get_mut(&lucky)
            {
                bot.money = bot.money.saturating_add(FOUND_MONEY);
                info!(bot_id = %lucky, amount = FOUND_MONEY, "found money");
            }
        }
        EventSpecial::FreeFood => {
            for bot in state.bots.values_mut().filter(|b| b.is_active()) {
                if rng.random::<f64>() < FREE_FOOD_CHANCE {
                    bot.satiety = gauge_add(bot.satiety, FREE_FOOD_SATIETY);
                    debug!(bot_id = %bot.id, "free snack");
                }
            }
        }
    }
    warn!(event = spec.name, "random world event");
}

/// Roll for a personal fate event on one awake bot.
pub fn roll_fate<R: Rng + ?Sized>(
    state: &mut WorldState,
    cfg: &EventsConfig,
    rng: &mut R,
) -> Option<&'static str> {
    if rng.random::<f64>() >= cfg.fate_chance {
        return None;
    }
    let target = random_awake(state, rng)?;
    let spec = FATE_EVENTS.choose(rng)?;
    trigger_fate(state, &target, spec, rng);
    Some(spec.name)
}

/// Apply a fate event to `target` and tell it what happened.
pub fn trigger_fate<R: Rng + ?Sized>(
    state: &mut WorldState,
    target: &BotId,
    spec: &FateEventSpec,
    rng: &mut R,
) {
    let Some(bot) = state.bots.get_mut(target) else {
        return;
    };
    bot.money = money_apply(bot.money, spec.money);
    bot.energy = gauge_apply(bot.energy, spec.energy);
    bot.satiety = gauge_apply(bot.satiety, spec.satiety);
    for &(emotion, delta) in spec.mood {
        bot.emotions.adjust(emotion, delta);
    }
    if spec.job_lost && bot.job.is_some() {
        bot.job = None;
        bot.current_task = None;
    }
    let name = bot.name.clone();
    let location = bot.location.clone();

    let mut msg = format!("[fate] {}: {}", spec.name, spec.desc);
    if let Some(social) = spec.social {
        let nearby: Vec<String> = state
            .others_at(&location, target)
            .into_iter()
            .map(|b| b.name.clone())
            .collect();
        if let Some(other) = nearby.choose(rng) {
            match social {
                FateSocial::BorrowRequest => msg.push_str(&format!(" (it was {other} asking)")),
                FateSocial::GossipVictim => msg.push_str(&format!(" (it seemed to be {other})")),
            }
        }
    }
    state.send_message("fate", Some(target.clone()), msg, MessagePriority::High);
    state.push_event(format!("{name}: {}", spec.name), spec.desc);
    warn!(bot_id = %target, event = spec.name, "personal fate");
}

/// Passive likes: some awake bots scroll the feed and like recent posts.
pub fn browse_moments<R: Rng + ?Sized>(state: &mut WorldState, cfg: &EventsConfig, rng: &mut R) -> usize {
    let start = state.moments.len().saturating_sub(BROWSED_MOMENTS);
    if start == state.moments.len() {
        return 0;
    }
    let mut likes = 0_usize;
    for reader in state.awake() {
        if rng.random::<f64>() >= cfg.moment_browse_chance {
            continue;
        }
        for moment in state.moments.iter_mut().skip(start) {
            if moment.bot_id != reader
                && !moment.likes.contains(&reader)
                && rng.random::<f64>() < cfg.moment_like_chance
            {
                moment.likes.push(reader.clone());
                likes = likes.saturating_add(1);
            }
        }
    }
    likes
}

/// Evening gossip: each living bot may hear a legend it did not know.
pub fn spread_legends<R: Rng + ?Sized>(state: &mut WorldState, cfg: &EventsConfig, rng: &mut R) -> usize {
    if state.legends.is_empty() {
        return 0;
    }
    let mut heard = 0_usize;
    for listener in state.living() {
        if rng.random::<f64>() >= cfg.legend_chance {
            continue;
        }
        let Some(legend) = state.legends.choose_mut(rng) else {
            continue;
        };
        let Some(bot) = state.bots.get_mut(&listener) else {
            continue;
        };
        if bot.known_legends.contains(&legend.id) {
            continue;
        }
        bot.known_legends.push(legend.id);
        keep_last(&mut bot.known_legends, KNOWN_LEGENDS_KEEP);
        legend.spread_count = legend.spread_count.saturating_add(1);
        let msg = format!(
            "[legend] They say {} once: {}",
            legend.original_name,
            clip(&legend.content, 60)
        );
        state.send_message("rumor", Some(listener), msg, MessagePriority::Normal);
        heard = heard.saturating_add(1);
    }
    if heard > 0 {
        info!(heard, "legends spread");
    }
    heard
}

/// Rewrite the one-paragraph city diary from today's events and residents.
pub fn write_narrative(state: &mut WorldState) {
    let day = state.clock.day();
    let today: Vec<&str> = state
        .events
        .iter()
        .filter(|e| e.time.starts_with(&format!("Day {day} ")))
        .map(|e| e.event.as_str())
        .collect();
    let happenings = match today.len().checked_sub(5) {
        Some(skip) => today.get(skip..).unwrap_or_default().join("; "),
        None if today.is_empty() => String::from("a quiet day"),
        None => today.join("; "),
    };
    let living = state.living().len();
    let richest = state
        .bots
        .values()
        .filter(|b| b.is_alive())
        .max_by_key(|b| b.money)
        .map(|b| b.name.clone());
    let mut narrative = format!(
        "Day {day} in Shenzhen, {}. {living} residents still at it. What happened: {happenings}.",
        state.weather.label()
    );
    if let Some(name) = richest {
        narrative.push_str(&format!(" {name} ends the day with the fattest wallet."));
    }
    info!(day, narrative = %narrative, "world narrative");
    state.world_narrative = narrative;
}

/// NPCs who have been talked to often grow familiar.
pub fn evolve_npcs(state: &mut WorldState) {
    for npc in state.locations.values_mut().flat_map(|l| l.npcs.iter_mut()) {
        if npc.interaction_count >= NPC_LOCAL {
            "knows everyone around here".clone_into(&mut npc.attitude);
        } else if npc.interaction_count >= NPC_FAMILIAR {
            "starting to recognize the regulars".clone_into(&mut npc.attitude);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_types::{Emotion, Legend, LegendId};

    use super::*;
    use crate::config::SimulationConfig;

    fn world() -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(23);
        let state = WorldState::new(&SimulationConfig::default(), &mut rng);
        (state, rng)
    }

    #[test]
    fn world_event_moves_only_awake_moods() {
        let (mut state, mut rng) = world();
        let sleeper = BotId::slot(1);
        state.bots.get_mut(&sleeper).unwrap().is_sleeping = true;
        let before_sleeper = state.bots.get(&sleeper).unwrap().emotions.get(Emotion::Happiness);
        let awake = BotId::slot(2);
        state.bots.get_mut(&awake).unwrap().emotions.adjust(Emotion::Happiness, -100.0);

        let sunset = WORLD_EVENTS.iter().find(|e| e.name == "A beautiful sunset").unwrap();
        trigger_world_event(&mut state, sunset, &mut rng);

        let happy = state.bots.get(&awake).unwrap().emotions.get(Emotion::Happiness);
        assert!((happy - 8.0).abs() < f64::EPSILON);
        let unmoved = state.bots.get(&sleeper).unwrap().emotions.get(Emotion::Happiness);
        assert!((unmoved - before_sleeper).abs() < f64::EPSILON);
        assert_eq!(state.events.last().unwrap().event, "A beautiful sunset");
    }

    #[test]
    fn fate_costs_money_without_going_negative() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(4);
        state.bots.get_mut(&id).unwrap().money = 50;
        let stolen = FATE_EVENTS.iter().find(|e| e.name == "Phone stolen").unwrap();
        trigger_fate(&mut state, &id, stolen, &mut rng);
        assert_eq!(state.bots.get(&id).unwrap().money, 0);
        let msg = state.message_board.last().unwrap();
        assert_eq!(msg.from, "fate");
        assert_eq!(msg.priority, MessagePriority::High);
    }

    #[test]
    fn fired_bots_lose_job_and_task() {
        let (mut state, mut rng) = world();
        let id = BotId::slot(6);
        state.bots.get_mut(&id).unwrap().job = Some(String::from("courier"));
        let fired = FATE_EVENTS.iter().find(|e| e.job_lost).unwrap();
        trigger_fate(&mut state, &id, fired, &mut rng);
        let bot = state.bots.get(&id).unwrap();
        assert!(bot.job.is_none());
        assert!(bot.current_task.is_none());
    }

    #[test]
    fn legends_are_heard_once_per_bot() {
        let (mut state, mut rng) = world();
        let cfg = EventsConfig {
            legend_chance: 1.0,
            ..EventsConfig::default()
        };
        state.legends.push(Legend {
            id: LegendId::new(),
            original_bot: BotId::slot(1),
            original_name: String::from("Old Zhang"),
            content: String::from("fixed every bike on the street for free"),
            origin_tick: 0,
            origin_time: String::from("Day 1 06:00"),
            location: String::from("Dongmen Old Street"),
            spread_count: 0,
        });
        let first = spread_legends(&mut state, &cfg, &mut rng);
        assert_eq!(first, 10);
        assert_eq!(spread_legends(&mut state, &cfg, &mut rng), 0);
        assert_eq!(state.legends.first().unwrap().spread_count, 10);
    }

    #[test]
    fn browsing_never_likes_own_post() {
        let (mut state, mut rng) = world();
        let cfg = EventsConfig {
            moment_browse_chance: 1.0,
            moment_like_chance: 1.0,
            ..EventsConfig::default()
        };
        let author = BotId::slot(1);
        state.push_moment(&author, String::from("first day in Shenzhen")).unwrap();
        let likes = browse_moments(&mut state, &cfg, &mut rng);
        assert_eq!(likes, 9);
        let moment = state.moments.first().unwrap();
        assert!(!moment.likes.contains(&author));
        assert_eq!(browse_moments(&mut state, &cfg, &mut rng), 0);
    }

    #[test]
    fn npcs_warm_up_to_regulars() {
        let (mut state, _) = world();
        let npc = state
            .locations
            .values_mut()
            .flat_map(|l| l.npcs.iter_mut())
            .next()
            .unwrap();
        npc.interaction_count = 12;
        evolve_npcs(&mut state);
        let npc = state.locations.values().flat_map(|l| l.npcs.iter()).next().unwrap();
        assert_eq!(npc.attitude, "knows everyone around here");
    }

    #[test]
    fn narrative_mentions_the_day() {
        let (mut state, _) = world();
        write_narrative(&mut state);
        assert!(state.world_narrative.starts_with("Day 1 in Shenzhen"));
        assert!(state.world_narrative.contains("a quiet day"));
    }
}
