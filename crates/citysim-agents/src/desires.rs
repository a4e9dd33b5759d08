//! Desire growth.
//!
//! Each desire grows by a base rate scaled by the bot's profile and by a
//! few situational multipliers. Desires are soft-capped: at 80 growth
//! slows to 30%, and at 90 the desire starts falling back by a random
//! 0.5--1.5 per tick.

use citysim_types::{Bot, Desire, Emotion};
use rand::Rng;

use crate::vitals::is_night;

/// Desire level above which growth slows.
const SLOW_GROWTH_LEVEL: f64 = 80.0;

/// Desire level above which the desire recedes on its own.
const SATURATION_LEVEL: f64 = 90.0;

/// Situational inputs to desire growth.
#[derive(Debug, Clone, Copy)]
pub struct DesireContext {
    /// Virtual hour of day.
    pub hour: u32,
    /// Whether any other bot shares the location.
    pub others_present: bool,
    /// Whether a living bot of the opposite gender shares the location.
    pub opposite_gender_present: bool,
}

/// Situational multiplier for one desire.
pub fn situational_multiplier(bot: &Bot, desire: Desire, ctx: &DesireContext) -> f64 {
    let mut mult = 1.0;
    match desire {
        Desire::Security => {
            if bot.hp < 30.0 || bot.money < 50 {
                mult *= 1.5;
            }
        }
        Desire::Greed => {
            if bot.money < 100 {
                mult *= 1.3;
            }
        }
        Desire::Lust => {
            if bot.energy > 60 && bot.satiety > 30 {
                mult *= 1.2;
            }
            if is_night(ctx.hour) {
                mult *= 1.5;
            }
            if ctx.opposite_gender_present {
                mult *= 1.3;
            }
            if !ctx.others_present && bot.emotions.get(Emotion::Loneliness) > 60.0 {
                mult *= 0.5;
            }
        }
        Desire::Power | Desire::Vanity => {}
    }
    mult
}

/// Grow every desire by one tick.
pub fn grow_desires<R: Rng + ?Sized>(bot: &mut Bot, ctx: &DesireContext, rng: &mut R) {
    for desire in Desire::ALL {
        let current = bot.desires.get(desire);
        let next = if current >= SATURATION_LEVEL {
            current - rng.random_range(0.5..=1.5)
        } else {
            let growth = desire.base_growth()
                * bot.desire_profile.get(desire)
                * situational_multiplier(bot, desire, ctx);
            if current >= SLOW_GROWTH_LEVEL {
                current + growth * 0.3
            } else {
                current + growth
            }
        };
        bot.desires.set(desire, next);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::agent::found_bot;

    fn bot() -> Bot {
        let mut rng = StdRng::seed_from_u64(9);
        let mut b = found_bot(citysim_world::FOUNDING_PERSONAS.first().unwrap(), &mut rng);
        b.desire_profile = citysim_types::DesireProfile::default();
        b
    }

    const DAY_ALONE: DesireContext = DesireContext {
        hour: 12,
        others_present: false,
        opposite_gender_present: false,
    };

    #[test]
    fn plain_growth_uses_base_rate() {
        let mut b = bot();
        b.money = 1000;
        b.energy = 50;
        b.desires.set(Desire::Power, 10.0);
        let mut rng = StdRng::seed_from_u64(1);
        grow_desires(&mut b, &DAY_ALONE, &mut rng);
        assert!((b.desires.get(Desire::Power) - 10.3).abs() < 1e-9);
    }

    #[test]
    fn poverty_boosts_greed_and_security() {
        let mut b = bot();
        b.money = 10;
        assert!((situational_multiplier(&b, Desire::Greed, &DAY_ALONE) - 1.3).abs() < 1e-9);
        assert!((situational_multiplier(&b, Desire::Security, &DAY_ALONE) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn lust_multipliers_compound() {
        let mut b = bot();
        b.energy = 80;
        b.satiety = 80;
        let ctx = DesireContext {
            hour: 23,
            others_present: true,
            opposite_gender_present: true,
        };
        let m = situational_multiplier(&b, Desire::Lust, &ctx);
        assert!((m - 1.2 * 1.5 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn saturated_desire_recedes() {
        let mut b = bot();
        b.desires.set(Desire::Vanity, 95.0);
        let mut rng = StdRng::seed_from_u64(5);
        grow_desires(&mut b, &DAY_ALONE, &mut rng);
        let v = b.desires.get(Desire::Vanity);
        assert!((93.5..=94.5).contains(&v), "{v}");
    }

    #[test]
    fn near_cap_growth_slows() {
        let mut b = bot();
        b.money = 1000;
        b.desires.set(Desire::Power, 85.0);
        let mut rng = StdRng::seed_from_u64(1);
        grow_desires(&mut b, &DAY_ALONE, &mut rng);
        assert!((b.desires.get(Desire::Power) - (85.0 + 0.3 * 0.3)).abs() < 1e-9);
    }
}
