//! Static city data for the citysim simulation.
//!
//! This crate holds everything about the world that does not change while
//! it runs: the districts, their NPCs and job boards, the founding cast,
//! weather behavior, event catalogs and the rules every fresh world starts
//! with.
//!
//! # Modules
//!
//! - [`locations`] -- The seven districts with NPC rosters and jobs.
//! - [`personas`] -- Founding residents and replacement templates.
//! - [`environment`] -- Weather effects and day-to-day transitions.
//! - [`events`] -- Random world events and personal fate events.
//! - [`seed_rules`] -- Baseline rules for each district.
//! - [`error`] -- Lookup errors.

pub mod environment;
pub mod error;
pub mod events;
pub mod locations;
pub mod personas;
pub mod seed_rules;

pub use environment::{WeatherInfo, next_weather, weather_info};
pub use error::WorldError;
pub use events::{EventSpecial, FATE_EVENTS, FateEventSpec, FateSocial, WORLD_EVENTS, WorldEventSpec};
pub use locations::{
    BAOAN_VILLAGE, BAY_PARK, DONGMEN_OLD_STREET, FUTIAN_CBD, HUAQIANGBEI, NANSHAN_APARTMENTS,
    NANSHAN_TECH_PARK, SPAWN_HOMES, is_known_location, location_names, resolve_location,
    starting_locations,
};
pub use personas::{
    FOUNDING_PERSONAS, Persona, REPLACEMENT_TEMPLATES, Template, founding_family, persona,
};
pub use seed_rules::{SYSTEM_CREATOR, seed_rules};
