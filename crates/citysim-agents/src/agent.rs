//! Bot creation.
//!
//! Founders are built from the static persona table at world start.
//! Newcomers are built from a replacement template when a bot dies and
//! take over its slot; the caller fills in inherited bonds and legends.

use std::collections::BTreeMap;

use citysim_types::{
    Bot, BotId, BotStatus, Desire, DesireProfile, Desires, Emotions, Family, Gender, Reputation,
    Skill, Skills, Values,
};
use citysim_world::{Persona, Template, founding_family};
use rand::Rng;

/// Starting HP for every bot.
pub const STARTING_HP: f64 = 100.0;

/// Starting energy for every bot.
pub const STARTING_ENERGY: u32 = 100;

/// Starting satiety for every bot.
pub const STARTING_SATIETY: u32 = 70;

/// Everything needed to seat a replacement bot.
#[derive(Debug, Clone)]
pub struct Newcomer<'a> {
    /// Slot the bot takes over.
    pub slot: BotId,
    /// Persona template.
    pub template: &'a Template,
    /// Generation number.
    pub generation: u32,
    /// Name of the bot being replaced.
    pub inherited_from: String,
    /// Where the newcomer appears.
    pub location: String,
    /// Where the newcomer lives.
    pub home: String,
    /// Starting money.
    pub money: u64,
    /// Desire growth multipliers of the slot.
    pub profile: DesireProfile,
}

fn random_skills<R: Rng + ?Sized>(rng: &mut R) -> Skills {
    let mut skills = Skills::default();
    for skill in Skill::ALL {
        skills.raise(skill, rng.random_range(5..=30));
    }
    skills
}

fn initial_desires<R: Rng + ?Sized>(profile: &DesireProfile, rng: &mut R) -> Desires {
    let mut desires = Desires::default();
    for desire in Desire::ALL {
        let (lo, hi) = match desire {
            Desire::Lust | Desire::Greed => (10, 30),
            Desire::Power | Desire::Security => (5, 20),
            Desire::Vanity => (10, 25),
        };
        let roll: u32 = rng.random_range(lo..=hi);
        desires.set(desire, f64::from(roll) * profile.get(desire));
    }
    desires
}

struct Identity {
    id: BotId,
    name: String,
    age: u32,
    gender: Gender,
    origin: String,
    edu: String,
    personality: String,
    home: String,
    location: String,
    money: u64,
    family: Family,
    values: Values,
    profile: DesireProfile,
    generation: u32,
    inherited_from: Option<String>,
}

fn build<R: Rng + ?Sized>(identity: Identity, rng: &mut R) -> Bot {
    let desires = initial_desires(&identity.profile, rng);
    Bot {
        id: identity.id,
        name: identity.name,
        age: identity.age,
        gender: identity.gender,
        origin: identity.origin,
        edu: identity.edu,
        personality: identity.personality,
        home: identity.home,
        location: identity.location,
        hp: STARTING_HP,
        aging_rate: 0.0,
        money: identity.money,
        energy: STARTING_ENERGY,
        satiety: STARTING_SATIETY,
        status: BotStatus::Alive,
        job: None,
        skills: random_skills(rng),
        family: identity.family,
        emotions: Emotions::default(),
        desires,
        desire_profile: identity.profile,
        is_sleeping: false,
        current_task: None,
        values: identity.values,
        core_memories: Vec::new(),
        bonds: BTreeMap::new(),
        long_term_goal: None,
        narrative_summary: String::new(),
        pending_reply_to: None,
        recent_actions_synced: Vec::new(),
        current_activity: String::new(),
        last_action_feedback: None,
        action_log: Vec::new(),
        reputation: Reputation::default(),
        created_things: Vec::new(),
        generation: identity.generation,
        inherited_from: identity.inherited_from,
        known_legends: Vec::new(),
        attraction_signals: Vec::new(),
    }
}

/// Build a founding bot from its persona.
pub fn found_bot<R: Rng + ?Sized>(persona: &Persona, rng: &mut R) -> Bot {
    let id = persona.id();
    let family = founding_family(&id);
    build(
        Identity {
            id,
            name: persona.name.to_owned(),
            age: persona.age,
            gender: persona.gender,
            origin: persona.origin.to_owned(),
            edu: persona.edu.to_owned(),
            personality: persona.personality.to_owned(),
            home: persona.home.to_owned(),
            location: persona.start_location.to_owned(),
            money: persona.money,
            family,
            values: Values::default(),
            profile: persona.profile.clone(),
            generation: 0,
            inherited_from: None,
        },
        rng,
    )
}

/// Build a replacement bot.
pub fn spawn_bot<R: Rng + ?Sized>(newcomer: Newcomer<'_>, rng: &mut R) -> Bot {
    let template = newcomer.template;
    build(
        Identity {
            id: newcomer.slot,
            name: template.name.to_owned(),
            age: template.age,
            gender: template.gender,
            origin: template.origin.to_owned(),
            edu: template.edu.to_owned(),
            personality: template.personality.to_owned(),
            home: newcomer.home,
            location: newcomer.location,
            money: newcomer.money,
            family: Family::default(),
            values: Values {
                original: template.values.to_owned(),
                current: template.values.to_owned(),
                shifts: Vec::new(),
            },
            profile: newcomer.profile,
            generation: newcomer.generation,
            inherited_from: Some(newcomer.inherited_from),
        },
        rng,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use citysim_world::{FOUNDING_PERSONAS, REPLACEMENT_TEMPLATES};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn founder_matches_persona() {
        let mut rng = StdRng::seed_from_u64(11);
        let persona = FOUNDING_PERSONAS.get(2).unwrap();
        let bot = found_bot(persona, &mut rng);
        assert_eq!(bot.id, BotId::slot(3));
        assert_eq!(bot.name, "Zhang Wei");
        assert_eq!(bot.money, 300);
        assert_eq!(bot.family.parents, vec![BotId::slot(8)]);
        assert!((bot.hp - STARTING_HP).abs() < f64::EPSILON);
        assert_eq!(bot.generation, 0);
        assert!(bot.is_alive());
    }

    #[test]
    fn skills_start_between_five_and_thirty() {
        let mut rng = StdRng::seed_from_u64(12);
        for persona in &FOUNDING_PERSONAS {
            let bot = found_bot(persona, &mut rng);
            for skill in Skill::ALL {
                assert!((5..=30).contains(&bot.skills.get(skill)));
            }
        }
    }

    #[test]
    fn desires_scale_with_profile() {
        let mut rng = StdRng::seed_from_u64(13);
        let profile = DesireProfile {
            vanity: 2.0,
            ..DesireProfile::default()
        };
        let desires = initial_desires(&profile, &mut rng);
        assert!((20.0..=50.0).contains(&desires.vanity));
        assert!((10.0..=30.0).contains(&desires.lust));
    }

    #[test]
    fn newcomer_takes_over_slot() {
        let mut rng = StdRng::seed_from_u64(14);
        let template = REPLACEMENT_TEMPLATES.first().unwrap();
        let bot = spawn_bot(
            Newcomer {
                slot: BotId::slot(4),
                template,
                generation: 2,
                inherited_from: String::from("Chen Jing"),
                location: String::from("Huaqiangbei"),
                home: String::from("Nanshan Apartments"),
                money: 250,
                profile: DesireProfile::default(),
            },
            &mut rng,
        );
        assert_eq!(bot.id, BotId::slot(4));
        assert_eq!(bot.name, template.name);
        assert_eq!(bot.generation, 2);
        assert_eq!(bot.inherited_from.as_deref(), Some("Chen Jing"));
        assert_eq!(bot.values.original, template.values);
        assert!(bot.bonds.is_empty());
        assert_eq!(bot.family, Family::default());
    }
}
