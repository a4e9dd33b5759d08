//! Daily weather for the city.
//!
//! Weather changes once per virtual day. The next day's weather is drawn
//! uniformly from a per-weather transition list; repeated entries weight
//! the draw, so sunny spells tend to persist.
//!
//! | Weather    | Mood effect                  | Event chance |
//! |------------|------------------------------|--------------|
//! | Sunny      | happiness +1, sadness -1     | +0.00        |
//! | Cloudy     | none                         | +0.00        |
//! | Light rain | sadness +2, loneliness +2    | +0.02        |
//! | Rainstorm  | anxiety +3, sadness +3       | +0.05        |
//! | Typhoon    | anxiety +8, sadness +2       | +0.15        |
//! | Muggy      | anger +3, happiness -2       | +0.01        |
//! | Cool       | happiness +2, anxiety -2     | +0.00        |

use citysim_types::{Emotion, Weather};
use rand::Rng;

/// Per-weather effects.
#[derive(Debug, Clone, Copy)]
pub struct WeatherInfo {
    /// One-line description.
    pub desc: &'static str,
    /// Emotion deltas applied to every awake bot each tick.
    pub mood: &'static [(Emotion, f64)],
    /// Added to the base chance of a random world event.
    pub event_chance_mod: f64,
}

/// Effects of a weather state.
pub const fn weather_info(weather: Weather) -> WeatherInfo {
    match weather {
        Weather::Sunny => WeatherInfo {
            desc: "Bright sunshine, good for going out",
            mood: &[(Emotion::Happiness, 1.0), (Emotion::Sadness, -1.0)],
            event_chance_mod: 0.0,
        },
        Weather::Cloudy => WeatherInfo {
            desc: "A grey, overcast sky",
            mood: &[],
            event_chance_mod: 0.0,
        },
        Weather::LightRain => WeatherInfo {
            desc: "A light, steady drizzle",
            mood: &[(Emotion::Sadness, 2.0), (Emotion::Loneliness, 2.0)],
            event_chance_mod: 0.02,
        },
        Weather::Rainstorm => WeatherInfo {
            desc: "Pouring rain, hard to get around",
            mood: &[(Emotion::Anxiety, 3.0), (Emotion::Sadness, 3.0)],
            event_chance_mod: 0.05,
        },
        Weather::Typhoon => WeatherInfo {
            desc: "Typhoon warning! Everybody stay indoors",
            mood: &[(Emotion::Anxiety, 8.0), (Emotion::Sadness, 2.0)],
            event_chance_mod: 0.15,
        },
        Weather::Muggy => WeatherInfo {
            desc: "Hot and sticky, everyone is irritable",
            mood: &[(Emotion::Anger, 3.0), (Emotion::Happiness, -2.0)],
            event_chance_mod: 0.01,
        },
        Weather::Cool => WeatherInfo {
            desc: "A rare cool day",
            mood: &[(Emotion::Happiness, 2.0), (Emotion::Anxiety, -2.0)],
            event_chance_mod: 0.0,
        },
    }
}

/// Candidate next-day weather for each state.
pub const fn transitions(weather: Weather) -> &'static [Weather] {
    match weather {
        Weather::Sunny => &[
            Weather::Sunny,
            Weather::Sunny,
            Weather::Cloudy,
            Weather::Muggy,
            Weather::Cool,
        ],
        Weather::Cloudy => &[
            Weather::Cloudy,
            Weather::Sunny,
            Weather::LightRain,
            Weather::Muggy,
        ],
        Weather::LightRain => &[
            Weather::LightRain,
            Weather::Cloudy,
            Weather::Rainstorm,
            Weather::Cloudy,
        ],
        Weather::Rainstorm => &[
            Weather::Rainstorm,
            Weather::LightRain,
            Weather::Cloudy,
            Weather::Typhoon,
        ],
        Weather::Typhoon => &[Weather::Typhoon, Weather::Rainstorm, Weather::LightRain],
        Weather::Muggy => &[
            Weather::Muggy,
            Weather::Sunny,
            Weather::Rainstorm,
            Weather::Cloudy,
        ],
        Weather::Cool => &[Weather::Cool, Weather::Sunny, Weather::Cloudy],
    }
}

/// Draw tomorrow's weather.
pub fn next_weather<R: Rng + ?Sized>(current: Weather, rng: &mut R) -> Weather {
    let candidates = transitions(current);
    if candidates.is_empty() {
        return Weather::Cloudy;
    }
    let pick = rng.random_range(0..candidates.len());
    candidates.get(pick).copied().unwrap_or(Weather::Cloudy)
}
