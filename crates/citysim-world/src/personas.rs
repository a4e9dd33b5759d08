//! Founding cast and replacement templates.
//!
//! The ten founding personas occupy slots `bot_1` to `bot_10`. When a bot
//! dies, a replacement drawn from [`REPLACEMENT_TEMPLATES`] takes over the
//! slot.

use citysim_types::{BotId, DesireProfile, Family, Gender};

use crate::error::WorldError;
use crate::locations::{
    BAOAN_VILLAGE, DONGMEN_OLD_STREET, FUTIAN_CBD, HUAQIANGBEI, NANSHAN_APARTMENTS,
};

/// Static description of a founding resident.
#[derive(Debug, Clone)]
pub struct Persona {
    /// Slot number (`bot_{slot}`).
    pub slot: u32,
    /// Display name.
    pub name: &'static str,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Hometown.
    pub origin: &'static str,
    /// Education.
    pub edu: &'static str,
    /// Personality sketch.
    pub personality: &'static str,
    /// Home location.
    pub home: &'static str,
    /// Starting location.
    pub start_location: &'static str,
    /// Starting money.
    pub money: u64,
    /// Desire growth multipliers.
    pub profile: DesireProfile,
}

impl Persona {
    /// The slot id.
    pub fn id(&self) -> BotId {
        BotId::slot(self.slot)
    }
}

/// A fresh persona for a replacement bot.
#[derive(Debug, Clone)]
pub struct Template {
    /// Display name.
    pub name: &'static str,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Hometown.
    pub origin: &'static str,
    /// Education.
    pub edu: &'static str,
    /// Personality sketch.
    pub personality: &'static str,
    /// Values statement.
    pub values: &'static str,
    /// Backstory.
    pub background: &'static str,
    /// Habits.
    pub habits: &'static str,
}

const fn profile(lust: f64, power: f64, greed: f64, vanity: f64, security: f64) -> DesireProfile {
    DesireProfile {
        lust,
        power,
        greed,
        vanity,
        security,
    }
}

/// The ten founding residents.
pub const FOUNDING_PERSONAS: [Persona; 10] = [
    Persona {
        slot: 1,
        name: "Li Haoran",
        age: 24,
        gender: Gender::Male,
        origin: "Changsha, Hunan",
        edu: "MSc in computer science",
        personality: "Introverted but curious; terse, with a dry sense of humour.",
        home: BAOAN_VILLAGE,
        start_location: BAOAN_VILLAGE,
        money: 800,
        profile: profile(0.8, 0.5, 0.6, 0.3, 1.2),
    },
    Persona {
        slot: 2,
        name: "Wang Xue",
        age: 26,
        gender: Gender::Female,
        origin: "Shanghai",
        edu: "BA in finance",
        personality: "Sharp and capable, reads people well, polite but occasionally cutting.",
        home: NANSHAN_APARTMENTS,
        start_location: NANSHAN_APARTMENTS,
        money: 2000,
        profile: profile(0.6, 1.5, 1.8, 1.5, 0.8),
    },
    Persona {
        slot: 3,
        name: "Zhang Wei",
        age: 28,
        gender: Gender::Male,
        origin: "Zhoukou, Henan",
        edu: "High school",
        personality: "Honest and quiet, loyal to a fault and easily taken advantage of.",
        home: BAOAN_VILLAGE,
        start_location: BAOAN_VILLAGE,
        money: 300,
        profile: profile(1.0, 0.3, 0.8, 0.2, 1.5),
    },
    Persona {
        slot: 4,
        name: "Chen Jing",
        age: 22,
        gender: Gender::Female,
        origin: "Chengdu, Sichuan",
        edu: "Art and design diploma",
        personality: "Sensitive and artistic; moods swing, expresses herself through drawing.",
        home: BAOAN_VILLAGE,
        start_location: BAOAN_VILLAGE,
        money: 500,
        profile: profile(0.7, 0.2, 0.3, 1.2, 0.9),
    },
    Persona {
        slot: 5,
        name: "Zhao Lei",
        age: 25,
        gender: Gender::Male,
        origin: "Shenzhen",
        edu: "Community college",
        personality: "Loud and flashy, many friends but few close ones.",
        home: NANSHAN_APARTMENTS,
        start_location: HUAQIANGBEI,
        money: 3000,
        profile: profile(2.0, 0.8, 1.5, 1.8, 0.3),
    },
    Persona {
        slot: 6,
        name: "Liu Yue",
        age: 30,
        gender: Gender::Female,
        origin: "Qingdao, Shandong",
        edu: "MBA",
        personality: "Rational and driven; struggles to show feelings but wants to be understood.",
        home: NANSHAN_APARTMENTS,
        start_location: FUTIAN_CBD,
        money: 5000,
        profile: profile(0.5, 1.8, 1.2, 0.8, 1.0),
    },
    Persona {
        slot: 7,
        name: "Zhou Jianguo",
        age: 45,
        gender: Gender::Male,
        origin: "Wenzhou, Zhejiang",
        edu: "Primary school",
        personality: "Worldly and shrewd, speaks in metaphors.",
        home: BAOAN_VILLAGE,
        start_location: HUAQIANGBEI,
        money: 1500,
        profile: profile(1.0, 1.5, 2.0, 1.0, 1.3),
    },
    Persona {
        slot: 8,
        name: "Wu Xiuying",
        age: 52,
        gender: Gender::Female,
        origin: "Chaoshan, Guangdong",
        edu: "Middle school",
        personality: "Tough and warm, worries about everyone, nags out of love.",
        home: BAOAN_VILLAGE,
        start_location: BAOAN_VILLAGE,
        money: 600,
        profile: profile(0.2, 0.3, 0.5, 0.3, 2.0),
    },
    Persona {
        slot: 9,
        name: "Lin Feng",
        age: 21,
        gender: Gender::Male,
        origin: "Xiamen, Fujian",
        edu: "Music conservatory dropout",
        personality: "Idealist, emotional, talented but bad with money.",
        home: BAOAN_VILLAGE,
        start_location: DONGMEN_OLD_STREET,
        money: 200,
        profile: profile(1.2, 0.2, 0.3, 1.5, 0.7),
    },
    Persona {
        slot: 10,
        name: "Su Xiaoxiao",
        age: 19,
        gender: Gender::Female,
        origin: "Wuhan, Hubei",
        edu: "Influencer bootcamp",
        personality: "Lively show-off, a little vain but good at heart.",
        home: BAOAN_VILLAGE,
        start_location: HUAQIANGBEI,
        money: 400,
        profile: profile(0.8, 0.5, 1.0, 2.5, 0.5),
    },
];

/// Personas a replacement bot is drawn from.
pub const REPLACEMENT_TEMPLATES: [Template; 5] = [
    Template {
        name: "Sun Mingda",
        age: 23,
        gender: Gender::Male,
        origin: "Chaoshan, Guangdong",
        edu: "Vocational school",
        personality: "Steady and hard-working, says little but can be relied on. Studies small businesses.",
        values: "Get rich through hard work, be honest, provide for the family",
        background: "A young man new to Shenzhen, drawn by talk of opportunity",
        habits: "Early to rise, late to bed, street food, finance news",
    },
    Template {
        name: "Lin Tingting",
        age: 20,
        gender: Gender::Female,
        origin: "Nanchang, Jiangxi",
        edu: "College student",
        personality: "Cheerful and open, a bit careless but sincere.",
        values: "Happiness comes first; life is short",
        background: "A student interning in Shenzhen, curious about everything",
        habits: "Photos, posting moments, eating, making friends",
    },
    Template {
        name: "Chen Zhiqiang",
        age: 35,
        gender: Gender::Male,
        origin: "Hengyang, Hunan",
        edu: "Middle school",
        personality: "Silent and experienced; cold outside, soft inside.",
        values: "Survival first; trust must be earned",
        background: "Years of drifting through Shenzhen's workshops",
        habits: "Solitude, a drink, the news, early shifts",
    },
    Template {
        name: "Zhou Yuqing",
        age: 27,
        gender: Gender::Female,
        origin: "Wenzhou, Zhejiang",
        edu: "Bachelor's degree",
        personality: "Shrewd and capable with a head for business; blunt.",
        values: "Efficiency above all; time is money",
        background: "From a Wenzhou trading family, looking for a startup opportunity",
        habits: "Financial reports, networking, the gym, polished posts",
    },
    Template {
        name: "Liu Xiaohai",
        age: 18,
        gender: Gender::Male,
        origin: "Zunyi, Guizhou",
        edu: "High school dropout",
        personality: "Rebellious but kind, street smart, sharp tongue and soft heart.",
        values: "Freedom matters most",
        background: "Dropped out and came to Shenzhen alone, afraid of nothing",
        habits: "Wandering, music, making friends, street food",
    },
];

/// Look up the founding persona for a slot.
pub fn persona(id: &BotId) -> Result<&'static Persona, WorldError> {
    FOUNDING_PERSONAS
        .iter()
        .find(|p| BotId::slot(p.slot) == *id)
        .ok_or_else(|| WorldError::UnknownPersona(id.clone()))
}

/// Family links among the founding cast.
pub fn founding_family(id: &BotId) -> Family {
    match id.as_str() {
        "bot_3" => Family {
            parents: vec![BotId::slot(8)],
            children: Vec::new(),
        },
        "bot_8" => Family {
            parents: Vec::new(),
            children: vec![BotId::slot(3)],
        },
        _ => Family::default(),
    }
}
