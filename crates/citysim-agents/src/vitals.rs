//! Vital mechanics applied to bots each tick.
//!
//! Sleeping bots recover; awake bots age, get hungry and drift
//! emotionally. The order of operations for an awake bot is fixed:
//!
//! 1. Aging (HP loss, accelerated by starvation or exhaustion)
//! 2. Satiety decay
//! 3. Energy flux (day cost, night recovery)
//! 4. Starvation mood
//! 5. Emotion drift toward baseline
//! 6. Weather mood
//! 7. Loneliness from company or its absence
//! 8. Money anxiety
//! 9. Low-energy mood
//! 10. Desire growth
//!
//! Every gauge is clamped after each step. Death is only reported here;
//! the caller runs succession so it happens exactly once.

use citysim_types::{Bot, Emotion};
use rand::Rng;
use tracing::{debug, warn};

use crate::config::DecayConfig;
use crate::desires::{DesireContext, grow_desires};

/// Upper bound of the integer gauges (energy, satiety).
pub const GAUGE_MAX: u32 = 100;

/// Per-tick emotion drift toward each dimension's baseline.
const EMOTION_DRIFT: [(Emotion, f64); 5] = [
    (Emotion::Happiness, -0.5),
    (Emotion::Sadness, -1.0),
    (Emotion::Anger, -2.0),
    (Emotion::Anxiety, -0.5),
    (Emotion::Loneliness, 0.5),
];

/// Energy at which a sleeping bot wakes on its own during the day.
const WAKE_ENERGY: u32 = 80;

/// Energy below which a bot at home falls asleep at night.
const DROWSY_ENERGY: u32 = 30;

/// What a bot can perceive around it this tick.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    /// Virtual hour of day (0--23).
    pub hour: u32,
    /// Emotion deltas from today's weather.
    pub weather_mood: &'a [(Emotion, f64)],
    /// Whether any other bot shares the location.
    pub others_present: bool,
    /// Whether a living bot of the opposite gender shares the location.
    pub opposite_gender_present: bool,
}

/// Result of one awake tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalTickResult {
    /// HP lost to aging this tick.
    pub aging_rate: f64,
    /// Whether the bot was starving.
    pub starving: bool,
    /// Whether HP reached zero.
    pub died: bool,
}

/// Whether the hour counts as night for energy recovery and desire.
pub const fn is_night(hour: u32) -> bool {
    hour >= 22 || hour < 6
}

/// Add to an integer gauge, capped at [`GAUGE_MAX`].
pub fn gauge_add(value: u32, amount: u32) -> u32 {
    value.saturating_add(amount).min(GAUGE_MAX)
}

/// Apply a signed delta to an integer gauge, clamped to `0..=GAUGE_MAX`.
pub fn gauge_apply(value: u32, delta: i64) -> u32 {
    let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
    if delta >= 0 {
        gauge_add(value, magnitude)
    } else {
        value.saturating_sub(magnitude).min(GAUGE_MAX)
    }
}

/// Apply a signed delta to a money balance; never goes below zero.
pub fn money_apply(value: u64, delta: i64) -> u64 {
    value.saturating_add_signed(delta)
}

/// One tick of sleep. Returns `true` if the bot woke up.
pub fn apply_sleep_tick(bot: &mut Bot, hour: u32, config: &DecayConfig) -> bool {
    bot.energy = gauge_add(bot.energy, config.energy_sleep_recover);
    bot.satiety = bot.satiety.saturating_sub(1);
    bot.emotions.adjust(Emotion::Anxiety, -3.0);
    bot.emotions.adjust(Emotion::Anger, -2.0);
    bot.emotions.adjust(Emotion::Loneliness, -1.0);

    if (7..23).contains(&hour) && bot.energy >= WAKE_ENERGY {
        bot.is_sleeping = false;
        debug!(bot_id = %bot.id, energy = bot.energy, "woke up naturally");
        return true;
    }
    false
}

/// One tick of vital mechanics for an awake bot.
pub fn apply_vital_tick<R: Rng + ?Sized>(
    bot: &mut Bot,
    surroundings: &Surroundings<'_>,
    config: &DecayConfig,
    rng: &mut R,
) -> VitalTickResult {
    // 1. Aging
    let aging_rate = config.aging_rate(bot.satiety, bot.energy);
    let starving = bot.satiety <= config.starvation_satiety;
    if starving {
        warn!(bot_id = %bot.id, satiety = bot.satiety, "starvation is accelerating aging");
    }
    bot.hp = round3((bot.hp - aging_rate).max(0.0));
    bot.aging_rate = aging_rate;

    // 2. Satiety
    bot.satiety = bot.satiety.saturating_sub(config.satiety_decay);

    // 3. Energy
    if is_night(surroundings.hour) {
        bot.energy = gauge_add(bot.energy, config.energy_night_recover);
    } else {
        bot.energy = bot.energy.saturating_sub(config.energy_day_cost);
    }

    // 4. Starvation mood
    if bot.satiety == 0 {
        bot.emotions.adjust(Emotion::Sadness, 3.0);
        bot.emotions.adjust(Emotion::Anxiety, 2.0);
    }

    // 5. Drift
    for (emotion, delta) in EMOTION_DRIFT {
        bot.emotions.adjust(emotion, delta);
    }

    // 6. Weather
    for &(emotion, delta) in surroundings.weather_mood {
        bot.emotions.adjust(emotion, delta);
    }

    // 7. Company
    if surroundings.others_present {
        bot.emotions.adjust(Emotion::Loneliness, -5.0);
    } else {
        bot.emotions.adjust(Emotion::Loneliness, 0.5);
    }

    // 8. Money
    if bot.money < 50 {
        bot.emotions.adjust(Emotion::Anxiety, 3.0);
        bot.emotions.adjust(Emotion::Sadness, 2.0);
    } else if bot.money < 100 {
        bot.emotions.adjust(Emotion::Anxiety, 1.0);
    }

    // 9. Fatigue
    if bot.energy < 20 {
        bot.emotions.adjust(Emotion::Sadness, 2.0);
        bot.emotions.adjust(Emotion::Happiness, -3.0);
    }

    // 10. Desires
    let ctx = DesireContext {
        hour: surroundings.hour,
        others_present: surroundings.others_present,
        opposite_gender_present: surroundings.opposite_gender_present,
    };
    grow_desires(bot, &ctx, rng);

    let died = bot.hp <= 0.0;
    debug!(
        bot_id = %bot.id,
        hp = bot.hp,
        energy = bot.energy,
        satiety = bot.satiety,
        money = bot.money,
        aging_rate,
        "vitals applied"
    );

    VitalTickResult {
        aging_rate,
        starving,
        died,
    }
}

/// Whether a bot should fall asleep on its own this tick.
pub fn should_fall_asleep(bot: &Bot, hour: u32) -> bool {
    (hour >= 23 || hour < 7) && bot.energy < DROWSY_ENERGY && bot.location == bot.home
}

/// Once-a-day aging: +1 year, with extra HP loss for older bots.
///
/// Returns the HP lost.
pub fn apply_birthday(bot: &mut Bot) -> f64 {
    bot.age = bot.age.saturating_add(1);
    let loss = if bot.age >= 70 {
        2.0
    } else if bot.age >= 55 {
        0.5
    } else {
        0.0
    };
    bot.hp = (bot.hp - loss).max(0.0);
    loss
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
