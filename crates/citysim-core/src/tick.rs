//! Tick cycle: the loop body that drives the city.
//!
//! One call to [`run_tick`] advances the clock by one virtual hour and then
//! runs these phases against the store, in order:
//!
//! 1. **Weather** -- a new day's weather at 06:00.
//! 2. **Vitals** -- sleep or awake mechanics for every living bot, task
//!    progress and auto-sleep. Deaths are handled as soon as they happen.
//! 3. **Daily costs** -- rent and living costs at the rent hour; bots that
//!    cannot pay are evicted to the fallback location.
//! 4. **Birthdays** -- everyone ages a year at midnight.
//! 5. **Events** -- random city events, personal fate, passive moment
//!    likes and the evening legend circle.
//! 6. **Reputation and narrative** -- morning reputation decay, the
//!    evening narrative and NPC familiarity.
//! 7. **Rules** -- every active rule is scheduled, decayed and possibly
//!    retired.
//! 8. **Sweep** -- anything that left a bot at hp 0 this tick is turned
//!    into a death before the tick ends.
//!
//! The whole call runs under the world lock. It never fails for a single
//! bot's sake; the only error is clock overflow.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use citysim_agents::{
    DecayConfig, Surroundings, TaskProgress, apply_birthday, apply_sleep_tick, apply_vital_tick,
    progress_task, reputation, should_fall_asleep,
};
use citysim_types::{BotId, Weather};
use citysim_world::weather_info;

use crate::clock::ClockError;
use crate::config::SimulationConfig;
use crate::events;
use crate::lifecycle::{DeathRecord, handle_death};
use crate::rules::tick_rules;
use crate::state::WorldState;

/// Hour at which weather changes and reputation decays.
const MORNING_HOUR: u32 = 6;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Virtual timestamp after the tick.
    pub time: String,
    /// Weather during this tick.
    pub weather: Weather,
    /// Living bots at the end of the tick.
    pub alive: usize,
    /// Deaths processed this tick.
    pub deaths: Vec<DeathRecord>,
    /// Bots evicted for unpaid rent.
    pub evictions: Vec<BotId>,
    /// Random city events that fired.
    pub world_events: Vec<String>,
    /// Personal fate event that fired, if any.
    pub fate: Option<String>,
    /// Rule executions that changed something.
    pub rule_executions: u64,
    /// Rules retired this tick.
    pub rules_retired: Vec<String>,
}

/// Run one full tick against `state`.
pub fn run_tick<R: Rng + ?Sized>(
    state: &mut WorldState,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let hour = state.clock.hour();
    let first_tick = tick <= 1;

    if hour == MORNING_HOUR && !first_tick {
        events::change_weather(state, rng);
    }
    info!(tick, hour, weather = ?state.weather, "tick started");

    let decay = config.decay.to_decay_config();
    let mut deaths = phase_vitals(state, &decay, config, hour, rng);

    let evictions = if hour == config.economy.rent_hour && !first_tick {
        charge_daily_costs(state, config)
    } else {
        Vec::new()
    };

    if hour == 0 && !first_tick {
        celebrate_birthdays(state);
    }

    let world_events = events::roll_world_events(state, &config.events, rng)
        .into_iter()
        .map(str::to_owned)
        .collect();
    let fate = events::roll_fate(state, &config.events, rng).map(str::to_owned);
    events::browse_moments(state, &config.events, rng);
    if hour == config.events.legend_hour {
        events::spread_legends(state, &config.events, rng);
    }

    if hour == MORNING_HOUR {
        for bot in state.bots.values_mut().filter(|b| b.is_alive()) {
            reputation::decay(&mut bot.reputation);
        }
        state.refresh_reputation_board();
    }
    if hour == config.events.narrative_hour {
        events::write_narrative(state);
    }
    events::evolve_npcs(state);

    let rules = tick_rules(state, &config.rules, rng);

    deaths.extend(sweep_deaths(state, config, rng));

    let summary = TickSummary {
        tick,
        time: state.time(),
        weather: state.weather,
        alive: state.living().len(),
        deaths,
        evictions,
        world_events,
        fate,
        rule_executions: rules.executions,
        rules_retired: rules.retired,
    };
    info!(
        tick,
        alive = summary.alive,
        deaths = summary.deaths.len(),
        rule_executions = summary.rule_executions,
        active_rules = state.active_rule_count(),
        "tick completed"
    );
    Ok(summary)
}

/// Sleep or awake mechanics for every living bot.
fn phase_vitals<R: Rng + ?Sized>(
    state: &mut WorldState,
    decay: &DecayConfig,
    config: &SimulationConfig,
    hour: u32,
    rng: &mut R,
) -> Vec<DeathRecord> {
    let weather_mood = weather_info(state.weather).mood;
    let mut deaths = Vec::new();

    for id in state.living() {
        let Some((others_present, opposite_gender_present)) = company(state, &id) else {
            continue;
        };
        let Some(bot) = state.bots.get_mut(&id) else {
            continue;
        };

        if bot.is_sleeping {
            if apply_sleep_tick(bot, hour, decay) {
                info!(bot_id = %id, energy = bot.energy, "woke up");
            }
            continue;
        }

        let surroundings = Surroundings {
            hour,
            weather_mood,
            others_present,
            opposite_gender_present,
        };
        let vitals = apply_vital_tick(bot, &surroundings, decay, rng);
        if vitals.died {
            if let Some(record) = handle_death(state, &id, &config.rules, rng) {
                deaths.push(record);
            }
            continue;
        }

        match progress_task(bot, rng) {
            Some(TaskProgress::Completed { pay }) => {
                debug!(bot_id = %id, pay, "task paid out");
            }
            Some(TaskProgress::Failed { pay }) => {
                debug!(bot_id = %id, pay, "task paid consolation");
            }
            Some(TaskProgress::Working { .. }) | None => {}
        }

        if should_fall_asleep(bot, hour) {
            bot.is_sleeping = true;
            info!(bot_id = %id, energy = bot.energy, "fell asleep at home");
        }
    }
    deaths
}

/// Whether anyone else is around, and whether one of them is of the
/// opposite gender. `None` when the bot is unknown.
fn company(state: &WorldState, id: &BotId) -> Option<(bool, bool)> {
    let bot = state.bots.get(id)?;
    let others = state.others_at(&bot.location, id);
    let opposite = bot.gender.opposite();
    Some((
        !others.is_empty(),
        others.iter().any(|o| o.gender == opposite),
    ))
}

/// Deduct rent and living costs. Returns the bots that were evicted.
fn charge_daily_costs(state: &mut WorldState, config: &SimulationConfig) -> Vec<BotId> {
    let fallback = config.economy.fallback_location.as_str();
    let mut evicted = Vec::new();

    for id in state.living() {
        let Some(bot) = state.bots.get_mut(&id) else {
            continue;
        };
        let cost = config.economy.daily_cost(&bot.home);
        if let Some(left) = bot.money.checked_sub(cost) {
            bot.money = left;
            debug!(bot_id = %id, cost, money = left, "daily costs paid");
            continue;
        }
        warn!(bot_id = %id, cost, money = bot.money, home = %bot.home, "cannot pay rent, evicted");
        bot.money = 0;
        fallback.clone_into(&mut bot.home);
        let name = bot.name.clone();
        state.move_bot(&id, fallback);
        state.push_event(
            format!("{name} was evicted"),
            format!("{name} could not make rent and ended up at {fallback}"),
        );
        evicted.push(id);
    }
    evicted
}

fn celebrate_birthdays(state: &mut WorldState) {
    for bot in state.bots.values_mut().filter(|b| b.is_alive()) {
        let loss = apply_birthday(bot);
        debug!(bot_id = %bot.id, age = bot.age, hp_loss = loss, "birthday");
    }
}

/// Turn every remaining hp-0 bot into a death.
fn sweep_deaths<R: Rng + ?Sized>(
    state: &mut WorldState,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<DeathRecord> {
    let due: Vec<BotId> = state
        .bots
        .values()
        .filter(|b| b.is_alive() && b.hp <= 0.0)
        .map(|b| b.id.clone())
        .collect();
    due.iter()
        .filter_map(|id| handle_death(state, id, &config.rules, rng))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_world::NANSHAN_APARTMENTS;

    use super::*;
    use crate::clock::WorldClock;

    fn world(seed: u64) -> (WorldState, SimulationConfig, StdRng) {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let state = WorldState::new(&config, &mut rng);
        (state, config, rng)
    }

    /// Put the clock one hour before `hour`, past the first tick.
    fn set_hour_before(state: &mut WorldState, hour: u32) {
        state.clock = WorldClock::new(hour.saturating_add(22));
        state.clock.advance().unwrap();
    }

    #[test]
    fn clock_moves_one_hour() {
        let (mut state, config, mut rng) = world(1);
        let before = state.clock.hour();
        let summary = run_tick(&mut state, &config, &mut rng).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(state.clock.hour(), before.saturating_add(1).checked_rem(24).unwrap());
    }

    #[test]
    fn unpaid_rent_evicts_to_the_fallback() {
        let (mut state, config, mut rng) = world(2);
        set_hour_before(&mut state, config.economy.rent_hour);
        let id = BotId::slot(1);
        state.move_bot(&id, NANSHAN_APARTMENTS);
        {
            let bot = state.bots.get_mut(&id).unwrap();
            bot.money = 10;
            bot.satiety = 5;
            bot.home = NANSHAN_APARTMENTS.to_owned();
            bot.current_task = None;
            bot.is_sleeping = false;
        }

        let summary = run_tick(&mut state, &config, &mut rng).unwrap();
        assert_eq!(state.clock.hour(), config.economy.rent_hour);
        assert!(summary.evictions.contains(&id));

        let bot = state.bots.get(&id).unwrap();
        assert_eq!(bot.money, 0);
        assert_eq!(bot.home, config.economy.fallback_location);
        assert_eq!(bot.location, config.economy.fallback_location);
        let fallback = state.locations.get(&config.economy.fallback_location).unwrap();
        assert!(fallback.contains(&id));
    }

    #[test]
    fn rent_is_deducted_when_affordable() {
        let (mut state, config, _) = world(3);
        let id = BotId::slot(2);
        let home = state.bots.get(&id).unwrap().home.clone();
        state.bots.get_mut(&id).unwrap().money = 10_000;

        let evicted = charge_daily_costs(&mut state, &config);
        assert!(!evicted.contains(&id));
        let bot = state.bots.get(&id).unwrap();
        assert_eq!(bot.money, 10_000 - config.economy.daily_cost(&home));
        assert_eq!(bot.home, home);
    }

    #[test]
    fn starving_bot_dies_within_the_tick() {
        let (mut state, config, mut rng) = world(4);
        let id = BotId::slot(3);
        let name = {
            let bot = state.bots.get_mut(&id).unwrap();
            bot.hp = 0.1;
            bot.satiety = 0;
            bot.is_sleeping = false;
            bot.name.clone()
        };

        let summary = run_tick(&mut state, &config, &mut rng).unwrap();
        assert!(summary.deaths.iter().any(|d| d.name == name));
        assert!(state.graveyard.iter().any(|g| g.name == name));
        let holder = state.bots.get(&id).unwrap();
        assert!(holder.is_alive());
        assert_ne!(holder.name, name);
        assert!(state.bots.values().all(|b| !b.is_alive() || b.hp > 0.0));
    }

    #[test]
    fn sleeping_bot_at_zero_hp_is_swept() {
        let (mut state, config, mut rng) = world(5);
        let id = BotId::slot(4);
        {
            let bot = state.bots.get_mut(&id).unwrap();
            bot.hp = 0.0;
            bot.is_sleeping = true;
        }
        let summary = run_tick(&mut state, &config, &mut rng).unwrap();
        assert_eq!(summary.deaths.iter().filter(|d| d.slot == id).count(), 1);
        assert_eq!(state.graveyard.len(), 1);
    }

    #[test]
    fn every_gauge_stays_in_range_over_two_days() {
        let (mut state, config, mut rng) = world(6);
        for _ in 0..48 {
            run_tick(&mut state, &config, &mut rng).unwrap();
            for bot in state.bots.values().filter(|b| b.is_alive()) {
                assert!(bot.energy <= 100);
                assert!(bot.satiety <= 100);
                assert!((0.0..=100.0).contains(&bot.hp));
                assert!(bot.hp > 0.0);
            }
        }
    }
}
