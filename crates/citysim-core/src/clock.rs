//! World clock.
//!
//! The tick counter is the single source of truth for time. The virtual
//! hour, day and timestamp are derived from it and never stored
//! independently. One tick is one virtual hour.

use serde::{Deserialize, Serialize};

use citysim_types::{TimeView, Weather};

/// Hours in a virtual day.
const HOURS_PER_DAY: u64 = 24;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter plus the virtual hour the world started at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClock {
    /// Current tick, 0 before the first advance.
    tick: u64,
    /// Virtual hour at tick 0.
    start_hour: u32,
}

impl WorldClock {
    /// Create a clock at tick 0. `start_hour` is taken modulo 24.
    pub fn new(start_hour: u32) -> Self {
        Self {
            tick: 0,
            start_hour: start_hour.checked_rem(24).unwrap_or(0),
        }
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Virtual hour of day, `(start_hour + tick) % 24`.
    pub fn hour(&self) -> u32 {
        let hour = u64::from(self.start_hour)
            .saturating_add(self.tick)
            .checked_rem(HOURS_PER_DAY)
            .unwrap_or(0);
        u32::try_from(hour).unwrap_or(0)
    }

    /// Virtual day, starting at 1.
    pub fn day(&self) -> u64 {
        self.tick
            .checked_div(HOURS_PER_DAY)
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Human-readable timestamp, e.g. `Day 3 07:00`.
    pub fn datetime(&self) -> String {
        format!("Day {} {:02}:00", self.day(), self.hour())
    }

    /// Public view of the clock together with the current weather.
    pub fn view(&self, weather: Weather) -> TimeView {
        TimeView {
            tick: self.tick,
            virtual_hour: self.hour(),
            virtual_day: self.day(),
            virtual_datetime: self.datetime(),
            weather,
        }
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(6)
    }
}
