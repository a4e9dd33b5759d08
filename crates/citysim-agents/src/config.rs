//! Tunable parameters for per-tick bot arithmetic.
//!
//! The engine builds a [`DecayConfig`] from the `decay` section of
//! `citysim-config.yaml` and passes it into the vital update functions.

/// Rates applied to every living bot once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayConfig {
    /// HP lost per awake tick before multipliers (default: 0.5).
    pub aging_base: f64,
    /// Aging multiplier while starving (default: 5.0).
    pub starvation_multiplier: f64,
    /// Satiety at or below which a bot counts as starving (default: 10).
    pub starvation_satiety: u32,
    /// Aging multiplier while exhausted (default: 3.0).
    pub exhaustion_multiplier: f64,
    /// Energy below which a bot counts as exhausted (default: 10).
    pub exhaustion_energy: u32,
    /// Satiety lost per awake tick (default: 2).
    pub satiety_decay: u32,
    /// Energy spent per daytime tick (default: 2).
    pub energy_day_cost: u32,
    /// Energy regained per night tick while awake (default: 5).
    pub energy_night_recover: u32,
    /// Energy regained per tick asleep (default: 15).
    pub energy_sleep_recover: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            aging_base: 0.5,
            starvation_multiplier: 5.0,
            starvation_satiety: 10,
            exhaustion_multiplier: 3.0,
            exhaustion_energy: 10,
            satiety_decay: 2,
            energy_day_cost: 2,
            energy_night_recover: 5,
            energy_sleep_recover: 15,
        }
    }
}

impl DecayConfig {
    /// HP lost this tick given current satiety and energy.
    pub fn aging_rate(&self, satiety: u32, energy: u32) -> f64 {
        let mut rate = self.aging_base;
        if satiety <= self.starvation_satiety {
            rate *= self.starvation_multiplier;
        }
        if energy < self.exhaustion_energy {
            rate *= self.exhaustion_multiplier;
        }
        rate
    }
}
