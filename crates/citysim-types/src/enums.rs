//! Enumeration types for the citysim world.
//!
//! Every small fixed vocabulary in the simulation (weather, emotions,
//! desires, skills, travel modes, modification kinds) is a closed enum so
//! dispatch over it is checked exhaustively at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Bot lifecycle and identity
// ---------------------------------------------------------------------------

/// Terminal-state flag of a bot. `Alive -> Dead` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BotStatus {
    /// The bot participates in ticks and may act.
    Alive,
    /// The bot has died; its record is kept for history.
    Dead,
}

/// Gender of a persona. Used by desire growth (co-located opposite gender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Gender {
    /// Male persona.
    Male,
    /// Female persona.
    Female,
}

impl Gender {
    /// The opposite gender.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

// ---------------------------------------------------------------------------
// Emotions and desires
// ---------------------------------------------------------------------------

/// One of the five emotion dimensions (each 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Emotion {
    /// Contentment.
    Happiness,
    /// Grief and low mood.
    Sadness,
    /// Irritation.
    Anger,
    /// Worry about the future.
    Anxiety,
    /// Lack of company.
    Loneliness,
}

impl Emotion {
    /// All emotion dimensions in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Happiness,
        Self::Sadness,
        Self::Anger,
        Self::Anxiety,
        Self::Loneliness,
    ];
}

/// One of the five desire dimensions (each 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Desire {
    /// Romantic and physical desire.
    Lust,
    /// Wish for influence over others.
    Power,
    /// Wish for money.
    Greed,
    /// Wish to be admired.
    Vanity,
    /// Wish for safety and stability.
    Security,
}

impl Desire {
    /// All desire dimensions in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Lust,
        Self::Power,
        Self::Greed,
        Self::Vanity,
        Self::Security,
    ];

    /// Base growth per awake tick before profile and context multipliers.
    pub const fn base_growth(self) -> f64 {
        match self {
            Self::Lust => 0.8,
            Self::Power => 0.3,
            Self::Greed => 0.5,
            Self::Vanity => 0.4,
            Self::Security => 0.2,
        }
    }
}

/// Either an emotion or a desire. Rule effects may target both.
///
/// Serialized untagged, so `"happiness"` and `"vanity"` are both valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum MoodDimension {
    /// An emotion dimension.
    Emotion(Emotion),
    /// A desire dimension.
    Desire(Desire),
}

// ---------------------------------------------------------------------------
// Skills, tasks, numeric attributes
// ---------------------------------------------------------------------------

/// A named skill (each 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Skill {
    /// Programming and technical work.
    Tech,
    /// Dealing with people.
    Social,
    /// Art and making things.
    Creative,
    /// Manual labor.
    Physical,
}

impl Skill {
    /// All skills in canonical order.
    pub const ALL: [Self; 4] = [Self::Tech, Self::Social, Self::Creative, Self::Physical];

    /// Parse a loosely-formatted skill name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tech" => Some(Self::Tech),
            "social" => Some(Self::Social),
            "creative" => Some(Self::Creative),
            "physical" => Some(Self::Physical),
            _ => None,
        }
    }
}

/// State of a job task. `InProgress -> Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TaskStatus {
    /// Work is ongoing.
    InProgress,
    /// Finished and paid in full.
    Completed,
    /// Finished badly, paid a fraction.
    Failed,
}

/// A numeric bot attribute readable by rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BotAttr {
    /// Remaining lifespan.
    Hp,
    /// Energy 0-100.
    Energy,
    /// Satiety 0-100.
    Satiety,
    /// Money, never negative.
    Money,
    /// Age in years.
    Age,
}

/// A numeric bot attribute writable by rule effects.
///
/// `hp` is intentionally absent: lifespan only moves through aging and
/// named rare events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceAttr {
    /// Energy 0-100.
    Energy,
    /// Satiety 0-100.
    Satiety,
    /// Money, never negative.
    Money,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Daily weather. Changes once per virtual day at 06:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Weather {
    /// Bright and pleasant.
    Sunny,
    /// Grey skies.
    Cloudy,
    /// Drizzle.
    LightRain,
    /// Heavy rain, hard to get around.
    Rainstorm,
    /// Typhoon warning, everybody indoors.
    Typhoon,
    /// Hot and humid.
    Muggy,
    /// Rare cool day.
    Cool,
}

impl Weather {
    /// Short human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::LightRain => "light rain",
            Self::Rainstorm => "rainstorm",
            Self::Typhoon => "typhoon",
            Self::Muggy => "muggy",
            Self::Cool => "cool",
        }
    }
}

/// Broad category of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LocationKind {
    /// Housing; rent is charged for homes here.
    Residential,
    /// Offices.
    Business,
    /// Shops and markets.
    Commercial,
    /// Parks.
    Leisure,
}

/// Impact tag on a public-memory entry. Drives the location vibe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Impact {
    /// Something good happened.
    Positive,
    /// Something bad happened.
    Negative,
    /// Nothing notable either way.
    Neutral,
    /// A permanent creation.
    Creation,
    /// A quarrel or fight.
    Conflict,
    /// Someone died here.
    Death,
    /// A notable social interaction.
    Social,
    /// News or rumor spread here.
    Information,
}

/// How a bot travels between locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TravelMode {
    /// Free.
    #[default]
    Walk,
    /// Cheap.
    Bus,
    /// Expensive.
    Taxi,
}

/// Known kinds of permanent world change, each with a floor cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ModificationKind {
    /// Open a shop or street stall.
    OpenShop,
    /// Graffiti, murals, sculpture.
    CreateArt,
    /// Greening.
    PlantTree,
    /// Reading corner, fitness spot, notice board.
    BuildFacility,
    /// Concerts, markets, parties.
    OrganizeEvent,
    /// Naming a place or leaving a mark.
    NamePlace,
    /// Teaching others a skill.
    TeachSkill,
    /// Founding a company.
    StartBusiness,
}

impl ModificationKind {
    /// Minimum money the creator must pay.
    pub const fn base_money_cost(self) -> u64 {
        match self {
            Self::OpenShop => 200,
            Self::CreateArt | Self::NamePlace | Self::TeachSkill => 0,
            Self::PlantTree => 10,
            Self::BuildFacility => 500,
            Self::OrganizeEvent => 100,
            Self::StartBusiness => 1000,
        }
    }

    /// Minimum energy the creator must spend.
    pub const fn base_energy_cost(self) -> u32 {
        match self {
            Self::OpenShop => 5,
            Self::CreateArt => 3,
            Self::PlantTree => 2,
            Self::BuildFacility => 8,
            Self::OrganizeEvent => 6,
            Self::NamePlace => 1,
            Self::TeachSkill => 4,
            Self::StartBusiness => 10,
        }
    }

    /// Reputation awarded when the change is committed.
    pub const fn reputation(self) -> i32 {
        match self {
            Self::OpenShop => 5,
            Self::CreateArt => 3,
            Self::PlantTree => 2,
            Self::BuildFacility => 8,
            Self::OrganizeEvent => 6,
            Self::NamePlace => 1,
            Self::TeachSkill => 4,
            Self::StartBusiness => 10,
        }
    }

    /// Whether committing this kind opens a new job listing at the location.
    pub const fn creates_job(self) -> bool {
        matches!(self, Self::OpenShop | Self::StartBusiness)
    }

    /// Parse the snake-case name used by judgments (`open_shop`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open_shop" => Some(Self::OpenShop),
            "create_art" => Some(Self::CreateArt),
            "plant_tree" => Some(Self::PlantTree),
            "build_facility" => Some(Self::BuildFacility),
            "organize_event" => Some(Self::OrganizeEvent),
            "name_place" => Some(Self::NamePlace),
            "teach_skill" => Some(Self::TeachSkill),
            "start_business" => Some(Self::StartBusiness),
            _ => None,
        }
    }
}

/// Priority of a message-board entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MessagePriority {
    /// Background chatter.
    Low,
    /// Default.
    #[default]
    Normal,
    /// Inheritance, obituaries, fate.
    High,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mood_dimension_accepts_emotions_and_desires() {
        let e: MoodDimension = serde_json::from_str("\"happiness\"").unwrap();
        assert_eq!(e, MoodDimension::Emotion(Emotion::Happiness));
        let d: MoodDimension = serde_json::from_str("\"vanity\"").unwrap();
        assert_eq!(d, MoodDimension::Desire(Desire::Vanity));
        assert!(serde_json::from_str::<MoodDimension>("\"hunger\"").is_err());
    }

    #[test]
    fn weather_uses_snake_case() {
        let json = serde_json::to_string(&Weather::LightRain).unwrap();
        assert_eq!(json, "\"light_rain\"");
    }

    #[test]
    fn modification_costs_match_catalog() {
        assert_eq!(ModificationKind::StartBusiness.base_money_cost(), 1000);
        assert_eq!(ModificationKind::BuildFacility.base_energy_cost(), 8);
        assert_eq!(ModificationKind::parse("open_shop"), Some(ModificationKind::OpenShop));
        assert!(ModificationKind::OpenShop.creates_job());
        assert!(!ModificationKind::CreateArt.creates_job());
        assert_eq!(ModificationKind::parse("nonsense"), None);
    }

    #[test]
    fn skill_parse_is_case_insensitive() {
        assert_eq!(Skill::parse(" Tech "), Some(Skill::Tech));
        assert_eq!(Skill::parse("cooking"), None);
    }
}
