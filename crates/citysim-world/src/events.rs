//! Catalogs of random world events and personal fate events.
//!
//! World events hit every awake bot with a mood effect; a few carry an
//! extra material effect. Fate events hit a single bot and may move money,
//! energy and satiety or cost the bot its job.

use citysim_types::Emotion;

/// Material side effect of a world event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSpecial {
    /// Mood only.
    None,
    /// One random awake bot finds 50 yuan.
    FoundMoney,
    /// Each awake bot has a 30% chance of a free snack (satiety +15).
    FreeFood,
}

/// A city-wide event.
#[derive(Debug, Clone, Copy)]
pub struct WorldEventSpec {
    /// Headline.
    pub name: &'static str,
    /// Description.
    pub desc: &'static str,
    /// Mood deltas for every awake bot.
    pub mood: &'static [(Emotion, f64)],
    /// Extra effect.
    pub special: EventSpecial,
}

const fn world_event(
    name: &'static str,
    desc: &'static str,
    mood: &'static [(Emotion, f64)],
) -> WorldEventSpec {
    WorldEventSpec {
        name,
        desc,
        mood,
        special: EventSpecial::None,
    }
}

use Emotion::{Anger, Anxiety, Happiness, Loneliness, Sadness};

/// Random world events.
pub const WORLD_EVENTS: &[WorldEventSpec] = &[
    world_event(
        "Sudden downpour",
        "The sky opens up and everyone without an umbrella runs for cover",
        &[(Sadness, 5.0), (Anxiety, 3.0)],
    ),
    world_event(
        "A beautiful sunset",
        "The sky turns gold and people stop to take photos",
        &[(Happiness, 8.0), (Loneliness, -3.0)],
    ),
    world_event("Mosquito bites", "A row of itchy bumps along the arm", &[(Anger, 3.0)]),
    world_event(
        "The lift is broken",
        "The building's lift is down again; stairs it is",
        &[(Anger, 4.0), (Anxiety, 2.0)],
    ),
    world_event(
        "Roadside argument",
        "Two drivers shout about a parking spot while a crowd gathers",
        &[(Anxiety, 3.0), (Anger, 2.0)],
    ),
    WorldEventSpec {
        name: "Free samples nearby",
        desc: "A new shop is handing out free food and the queue is long",
        mood: &[(Happiness, 5.0)],
        special: EventSpecial::FreeFood,
    },
    world_event(
        "Scam call",
        "Someone claiming to be the police demands a bank transfer",
        &[(Anxiety, 8.0), (Anger, 5.0)],
    ),
    WorldEventSpec {
        name: "Found 50 yuan",
        desc: "A 50 yuan note lying on the pavement",
        mood: &[(Happiness, 10.0)],
        special: EventSpecial::FoundMoney,
    },
    world_event(
        "A stray cat",
        "A thin stray cat mews by the road, clearly hungry",
        &[(Sadness, 3.0), (Loneliness, -2.0)],
    ),
    world_event(
        "Street music",
        "Someone plays guitar on the corner and a small crowd listens",
        &[(Happiness, 6.0), (Loneliness, -4.0)],
    ),
    world_event(
        "Red envelope from home",
        "Family sends a small red envelope: take care of yourself",
        &[(Happiness, 10.0), (Loneliness, -8.0)],
    ),
    world_event(
        "Someone is livestreaming",
        "An influencer streams on the street, drawing a lively crowd",
        &[(Happiness, 2.0)],
    ),
    world_event(
        "Prices went up again",
        "The usual canteen raised prices by 2 yuan, blaming the rent",
        &[(Anxiety, 4.0), (Anger, 3.0)],
    ),
    world_event(
        "The landlady comes for rent",
        "Sister Wang knocks for the rent and mutters about a rise next month",
        &[(Anxiety, 8.0), (Anger, 3.0)],
    ),
    world_event(
        "An extra egg from Old Li",
        "Old Li is in a good mood and adds a fried egg for free",
        &[(Happiness, 6.0), (Loneliness, -3.0)],
    ),
    world_event(
        "Residence permit check",
        "Old Zhang is checking permits; no permit, no stay",
        &[(Anxiety, 10.0), (Anger, 5.0)],
    ),
    world_event(
        "HR reaches out",
        "Xiao Chen from HR asks if anyone is interested in a job",
        &[(Happiness, 5.0), (Anxiety, -3.0)],
    ),
    world_event(
        "Dinner invitation",
        "Xiao Liu is cooking tonight and asks who wants to join",
        &[(Happiness, 8.0), (Loneliness, -10.0)],
    ),
    world_event(
        "A tip from A Qiang",
        "A Qiang messages: new stock arrived, great prices",
        &[(Happiness, 3.0)],
    ),
    world_event(
        "Street magician",
        "A young man performs magic tricks to a big crowd",
        &[(Happiness, 5.0), (Loneliness, -3.0)],
    ),
    world_event(
        "A new shop opened",
        "A milk tea shop opens on the corner with opening discounts",
        &[(Happiness, 3.0)],
    ),
    world_event(
        "City inspectors arrive",
        "Inspectors clear the street stalls and the mood turns tense",
        &[(Anxiety, 5.0), (Anger, 3.0)],
    ),
    world_event(
        "Flyers being handed out",
        "A flyer promises high pay: 200 a day, paid daily",
        &[(Happiness, 2.0)],
    ),
    world_event(
        "Late-night quarrel",
        "A couple argues loudly downstairs in the middle of the night",
        &[(Anger, 3.0), (Anxiety, 4.0), (Sadness, 2.0)],
    ),
    world_event(
        "A parcel arrived",
        "The online order finally arrived; unboxing joy",
        &[(Happiness, 8.0)],
    ),
    world_event(
        "A classmate's new car",
        "An old classmate posts a photo with a new car while you squeeze onto the bus",
        &[(Sadness, 8.0), (Anxiety, 5.0), (Happiness, -5.0)],
    ),
];

/// How a fate event pulls in another bot at the same location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FateSocial {
    /// Someone nearby was gossiping about the bot.
    GossipVictim,
    /// Someone nearby asks to borrow money.
    BorrowRequest,
}

/// A personal misfortune or windfall.
#[derive(Debug, Clone, Copy)]
pub struct FateEventSpec {
    /// Headline.
    pub name: &'static str,
    /// What happened, addressed to the bot.
    pub desc: &'static str,
    /// Money change.
    pub money: i64,
    /// Energy change.
    pub energy: i64,
    /// Satiety change.
    pub satiety: i64,
    /// Mood deltas.
    pub mood: &'static [(Emotion, f64)],
    /// Whether the bot loses its job.
    pub job_lost: bool,
    /// Another bot involved, if any.
    pub social: Option<FateSocial>,
}

const fn fate(name: &'static str, desc: &'static str, mood: &'static [(Emotion, f64)]) -> FateEventSpec {
    FateEventSpec {
        name,
        desc,
        money: 0,
        energy: 0,
        satiety: 0,
        mood,
        job_lost: false,
        social: None,
    }
}

/// Personal fate events.
pub const FATE_EVENTS: &[FateEventSpec] = &[
    FateEventSpec {
        money: -200,
        ..fate(
            "Phone stolen",
            "Your phone is gone from your pocket. Probably on the crowded bus.",
            &[(Anxiety, 20.0), (Anger, 15.0), (Sadness, 10.0)],
        )
    },
    FateEventSpec {
        money: 200,
        ..fate(
            "Found a wallet",
            "A wallet lies by the road with 200 yuan and an ID card. What will you do?",
            &[(Happiness, 5.0), (Anxiety, 5.0)],
        )
    },
    fate(
        "Rent hike notice",
        "The landlord writes: rent goes up 200 next month, take it or leave it.",
        &[(Anxiety, 15.0), (Anger, 10.0)],
    ),
    FateEventSpec {
        money: 1000,
        ..fate(
            "1000 yuan from home",
            "Your parents sent 1000 yuan: don't waste it, look after yourself.",
            &[(Happiness, 10.0), (Sadness, 5.0), (Loneliness, -10.0)],
        )
    },
    FateEventSpec {
        job_lost: true,
        ..fate(
            "Fired",
            "Business is slow, says the boss. You are let go.",
            &[(Sadness, 20.0), (Anxiety, 15.0), (Anger, 10.0)],
        )
    },
    fate(
        "A job tip",
        "A friend says a place is hiring with good pay. Interested?",
        &[(Happiness, 8.0), (Anxiety, -5.0)],
    ),
    FateEventSpec {
        social: Some(FateSocial::GossipVictim),
        ..fate(
            "Talked about behind your back",
            "You overhear someone calling you unreliable.",
            &[(Anger, 15.0), (Sadness, 10.0), (Anxiety, 8.0)],
        )
    },
    FateEventSpec {
        social: Some(FateSocial::BorrowRequest),
        ..fate(
            "Asked for a loan",
            "Someone nearby asks: can you lend me 100? I'm short this month.",
            &[(Anxiety, 5.0)],
        )
    },
    fate(
        "A small gift",
        "Someone you know gives you a little gift to thank you for last time.",
        &[(Happiness, 12.0), (Loneliness, -8.0)],
    ),
    fate(
        "Witnessed a theft",
        "You see someone shoplifting. They notice you and look at you pleadingly.",
        &[(Anxiety, 10.0), (Sadness, 5.0)],
    ),
    fate(
        "An old man fell",
        "An old man falls in front of you. People watch; nobody moves.",
        &[(Anxiety, 8.0), (Sadness, 5.0)],
    ),
    FateEventSpec {
        money: 200,
        ..fate(
            "Lottery win",
            "Your lottery ticket won 200 yuan. Not much, but it feels great.",
            &[(Happiness, 15.0)],
        )
    },
    FateEventSpec {
        energy: -15,
        ..fate(
            "Chased by a dog",
            "An unleashed dog charges at you and you run three blocks.",
            &[(Anxiety, 12.0), (Anger, 5.0)],
        )
    },
    fate(
        "Met someone from home",
        "You run into an acquaintance from your hometown and talk for ages.",
        &[(Happiness, 15.0), (Loneliness, -20.0), (Sadness, 5.0)],
    ),
    FateEventSpec {
        energy: -20,
        satiety: -30,
        ..fate(
            "Food poisoning",
            "Something from a street stall did not agree with you.",
            &[(Sadness, 10.0), (Anger, 8.0)],
        )
    },
];
