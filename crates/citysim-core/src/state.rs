//! The authoritative world store.
//!
//! [`WorldState`] holds time, weather, every bot (living and dead), every
//! location, the rule registry and the historical tables. It is plain
//! data: the tick cycle and the action pipeline mutate it while holding
//! the world lock, and the persistence layer serializes it whole.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use citysim_agents::{apply_deed, found_bot, keep_last, latest_deed};
use citysim_types::{
    Bot, BotId, BotPublicView, Grave, Impact, Legend, Location, LocationView, Message,
    MessagePriority, Modification, Moment, MomentId, PublicMemory, RecentEvent, ReputationEntry,
    Rule, RuleSummary, TimeView, Weather, WorldEvent,
};
use citysim_world::{FOUNDING_PERSONAS, seed_rules, starting_locations};

use crate::clock::WorldClock;
use crate::config::{RulesConfig, SimulationConfig};
use crate::memory;

/// World events kept in memory.
const EVENT_LOG_KEEP: usize = 200;

/// Messages kept in memory.
const MESSAGE_BOARD_KEEP: usize = 300;

/// Moments feed bound: trim to `MOMENTS_TRIM` once above `MOMENTS_CAP`.
const MOMENTS_CAP: usize = 100;
const MOMENTS_TRIM: usize = 80;

/// Side-channel entries kept per location.
pub const RECENT_EVENTS_KEEP: usize = 10;

/// The complete state of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Tick counter and derived virtual time.
    pub clock: WorldClock,
    /// Current weather.
    pub weather: Weather,
    /// Every bot that ever held a slot's current life, keyed by slot.
    pub bots: BTreeMap<BotId, Bot>,
    /// Locations keyed by name.
    pub locations: BTreeMap<String, Location>,
    /// All rules, active and retired.
    pub rules: Vec<Rule>,
    /// Permanent creations.
    pub modifications: Vec<Modification>,
    /// Memories of the dead.
    pub legends: Vec<Legend>,
    /// Terminal records.
    pub graveyard: Vec<Grave>,
    /// Directed and public messages.
    pub message_board: Vec<Message>,
    /// Social feed.
    pub moments: Vec<Moment>,
    /// World event stream.
    pub events: Vec<WorldEvent>,
    /// Highest generation number handed out so far.
    pub generation_count: u32,
    /// Reputation standings, refreshed after every deed.
    pub reputation_board: BTreeMap<BotId, ReputationEntry>,
    /// One-paragraph account of the city, rewritten each evening.
    pub world_narrative: String,
}

impl WorldState {
    /// A fresh world: founding residents, starting locations, seed rules,
    /// sunny weather, tick 0.
    pub fn new<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let locations = starting_locations()
            .into_iter()
            .map(|l| (l.name.clone(), l))
            .collect();
        let mut state = Self {
            clock: WorldClock::new(config.world.start_hour),
            weather: Weather::Sunny,
            bots: BTreeMap::new(),
            locations,
            rules: seed_rules(0),
            modifications: Vec::new(),
            legends: Vec::new(),
            graveyard: Vec::new(),
            message_board: Vec::new(),
            moments: Vec::new(),
            events: Vec::new(),
            generation_count: 0,
            reputation_board: BTreeMap::new(),
            world_narrative: String::new(),
        };
        for persona in &FOUNDING_PERSONAS {
            let bot = found_bot(persona, rng);
            state.place(&bot.id, &bot.location);
            state.bots.insert(bot.id.clone(), bot);
        }
        info!(
            world = %config.world.name,
            bots = state.bots.len(),
            locations = state.locations.len(),
            rules = state.rules.len(),
            "fresh world created"
        );
        state
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Current virtual timestamp.
    pub fn time(&self) -> String {
        self.clock.datetime()
    }

    /// Public clock view.
    pub fn time_view(&self) -> TimeView {
        self.clock.view(self.weather)
    }

    /// Whether `id` names a living bot.
    pub fn is_alive(&self, id: &str) -> bool {
        self.bots.get(id).is_some_and(Bot::is_alive)
    }

    /// Slots of every living bot, in slot order.
    pub fn living(&self) -> Vec<BotId> {
        self.bots
            .values()
            .filter(|b| b.is_alive())
            .map(|b| b.id.clone())
            .collect()
    }

    /// Slots of every living, awake bot.
    pub fn awake(&self) -> Vec<BotId> {
        self.bots
            .values()
            .filter(|b| b.is_active())
            .map(|b| b.id.clone())
            .collect()
    }

    /// Display name of a bot, or the raw id when unknown.
    pub fn name_of(&self, id: &str) -> String {
        self.bots
            .get(id)
            .map_or_else(|| id.to_owned(), |b| b.name.clone())
    }

    /// Find a bot by slot or by display name.
    pub fn find_bot(&self, key: &str) -> Option<&Bot> {
        let key = key.trim();
        self.bots
            .get(key)
            .or_else(|| self.bots.values().find(|b| b.is_alive() && b.name == key))
    }

    /// Living bots at `location` other than `except`.
    pub fn others_at(&self, location: &str, except: &BotId) -> Vec<&Bot> {
        self.locations.get(location).map_or_else(Vec::new, |loc| {
            loc.bots
                .iter()
                .filter(|id| *id != except)
                .filter_map(|id| self.bots.get(id))
                .filter(|b| b.is_alive())
                .collect()
        })
    }

    /// Add `id` to the occupancy list of `location`.
    pub fn place(&mut self, id: &BotId, location: &str) {
        if let Some(loc) = self.locations.get_mut(location)
            && !loc.contains(id)
        {
            loc.bots.push(id.clone());
        }
    }

    /// Remove `id` from every occupancy list.
    pub fn unplace(&mut self, id: &BotId) {
        for loc in self.locations.values_mut() {
            loc.bots.retain(|b| b != id);
        }
    }

    /// Move a bot, keeping occupancy consistent. Unknown destinations are
    /// ignored.
    pub fn move_bot(&mut self, id: &BotId, destination: &str) {
        if !self.locations.contains_key(destination) {
            warn!(bot_id = %id, destination, "move to unknown location ignored");
            return;
        }
        self.unplace(id);
        self.place(id, destination);
        if let Some(bot) = self.bots.get_mut(id) {
            destination.clone_into(&mut bot.location);
        }
    }

    /// Append a public memory at `location`.
    pub fn add_public_memory(
        &mut self,
        location: &str,
        event: String,
        actor: &str,
        impact: Impact,
        limits: &RulesConfig,
    ) {
        let actor_name = self.name_of(actor);
        let entry = PublicMemory {
            event,
            actor: actor.to_owned(),
            actor_name,
            tick: self.tick(),
            time: self.time(),
            impact,
        };
        if let Some(loc) = self.locations.get_mut(location) {
            memory::record(loc, entry, limits.public_memory_cap, limits.public_memory_trim);
        }
    }

    /// Leave a side-channel note at `location` for bots who come later.
    pub fn add_recent_event(&mut self, location: &str, event: String, source: &str) {
        let tick = self.tick();
        if let Some(loc) = self.locations.get_mut(location) {
            loc.recent_events.push(RecentEvent {
                event,
                source: source.to_owned(),
                tick,
            });
            keep_last(&mut loc.recent_events, RECENT_EVENTS_KEEP);
        }
    }

    /// Append to the world event stream.
    pub fn push_event(&mut self, event: impl Into<String>, desc: impl Into<String>) {
        let event = WorldEvent {
            tick: self.tick(),
            time: self.time(),
            event: event.into(),
            desc: desc.into(),
        };
        info!(tick = event.tick, event = %event.event, "world event");
        self.events.push(event);
        keep_last(&mut self.events, EVENT_LOG_KEEP);
    }

    /// Post to the message board. `to: None` is a broadcast.
    pub fn send_message(
        &mut self,
        from: &str,
        to: Option<BotId>,
        msg: impl Into<String>,
        priority: MessagePriority,
    ) {
        self.message_board.push(Message {
            from: from.to_owned(),
            to,
            msg: msg.into(),
            tick: self.tick(),
            priority,
        });
        keep_last(&mut self.message_board, MESSAGE_BOARD_KEEP);
    }

    /// Record a deed for a bot and refresh its reputation board entry.
    pub fn record_deed(&mut self, id: &BotId, delta: i32, desc: &str) {
        let tick = self.tick();
        let Some(bot) = self.bots.get_mut(id) else {
            return;
        };
        apply_deed(&mut bot.reputation, delta, desc, tick);
        let entry = reputation_entry(bot);
        self.reputation_board.insert(id.clone(), entry);
    }

    /// Refresh every board entry from the bots' current reputation.
    pub fn refresh_reputation_board(&mut self) {
        for bot in self.bots.values() {
            if bot.is_alive() && !bot.reputation.deeds.is_empty() {
                self.reputation_board.insert(bot.id.clone(), reputation_entry(bot));
            }
        }
    }

    /// Post to the moments feed. Returns the new moment's id.
    pub fn push_moment(&mut self, author: &BotId, content: String) -> Option<MomentId> {
        let bot = self.bots.get(author)?;
        let moment = Moment {
            id: MomentId::new(),
            bot_id: author.clone(),
            author_name: bot.name.clone(),
            content,
            time: self.time(),
            tick: self.tick(),
            likes: Vec::new(),
            comments: Vec::new(),
        };
        let id = moment.id;
        self.moments.push(moment);
        if self.moments.len() > MOMENTS_CAP {
            keep_last(&mut self.moments, MOMENTS_TRIM);
        }
        Some(id)
    }

    /// Number of active rules.
    pub fn active_rule_count(&self) -> usize {
        self.rules.iter().filter(|r| r.active).count()
    }

    /// Reputation standings, highest score first.
    pub fn reputation_standings(&self) -> Vec<ReputationEntry> {
        let mut board: Vec<_> = self
            .reputation_board
            .values()
            .filter(|e| self.is_alive(e.bot_id.as_str()))
            .cloned()
            .collect();
        board.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.bot_id.cmp(&b.bot_id)));
        board
    }

    /// Public snapshot of the whole world.
    pub fn view(&self) -> WorldView {
        let start = self.events.len().saturating_sub(RECENT_EVENTS_KEEP);
        WorldView {
            time: self.time_view(),
            bots: self.bots.values().map(BotPublicView::from).collect(),
            locations: self.locations.values().map(LocationView::from).collect(),
            active_rules: self
                .rules
                .iter()
                .filter(|r| r.active)
                .map(RuleSummary::from)
                .collect(),
            reputation_board: self.reputation_standings(),
            modifications: self.modifications.clone(),
            legends: self.legends.clone(),
            graveyard: self.graveyard.clone(),
            recent_events: self.events.get(start..).unwrap_or_default().to_vec(),
            world_narrative: self.world_narrative.clone(),
            generation_count: self.generation_count,
        }
    }
}

/// The first `max` characters of `text`.
pub fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn reputation_entry(bot: &Bot) -> ReputationEntry {
    ReputationEntry {
        bot_id: bot.id.clone(),
        name: bot.name.clone(),
        score: bot.reputation.score,
        tags: bot.reputation.tags.clone(),
        latest_deed: latest_deed(&bot.reputation).to_owned(),
    }
}

/// Everything `GET /world` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    /// Clock and weather.
    pub time: TimeView,
    /// Every bot's public fields.
    pub bots: Vec<BotPublicView>,
    /// Every location's public fields.
    pub locations: Vec<LocationView>,
    /// Rules currently in force.
    pub active_rules: Vec<RuleSummary>,
    /// Reputation standings, highest first.
    pub reputation_board: Vec<ReputationEntry>,
    /// Permanent creations.
    pub modifications: Vec<Modification>,
    /// Legends.
    pub legends: Vec<Legend>,
    /// Graves.
    pub graveyard: Vec<Grave>,
    /// Most recent world events.
    pub recent_events: Vec<WorldEvent>,
    /// Evening summary of the city.
    pub world_narrative: String,
    /// Highest generation so far.
    pub generation_count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_world::{DONGMEN_OLD_STREET, HUAQIANGBEI};

    use super::*;

    fn world() -> WorldState {
        let mut rng = StdRng::seed_from_u64(5);
        WorldState::new(&SimulationConfig::default(), &mut rng)
    }

    #[test]
    fn fresh_world_places_every_founder() {
        let state = world();
        assert_eq!(state.bots.len(), 10);
        assert_eq!(state.rules.len(), 5);
        for bot in state.bots.values() {
            let loc = state.locations.get(&bot.location).unwrap();
            assert!(loc.contains(&bot.id), "{} not placed", bot.name);
        }
        let occupied: usize = state.locations.values().map(|l| l.bots.len()).sum();
        assert_eq!(occupied, 10);
    }

    #[test]
    fn move_keeps_occupancy_consistent() {
        let mut state = world();
        let id = BotId::slot(1);
        state.move_bot(&id, HUAQIANGBEI);
        state.move_bot(&id, DONGMEN_OLD_STREET);
        let holders: Vec<_> = state
            .locations
            .values()
            .filter(|l| l.contains(&id))
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(holders, vec![DONGMEN_OLD_STREET]);
        assert_eq!(state.bots.get(&id).unwrap().location, DONGMEN_OLD_STREET);

        state.move_bot(&id, "Atlantis");
        assert_eq!(state.bots.get(&id).unwrap().location, DONGMEN_OLD_STREET);
    }

    #[test]
    fn deeds_refresh_the_board() {
        let mut state = world();
        let id = BotId::slot(2);
        state.record_deed(&id, 20, "fixed the street lights");
        let entry = state.reputation_board.get(&id).unwrap();
        assert_eq!(entry.score, 20);
        assert_eq!(entry.latest_deed, "fixed the street lights");
        state.record_deed(&BotId::slot(3), 40, "saved a cat");
        let standings = state.reputation_standings();
        assert_eq!(standings.first().unwrap().bot_id, BotId::slot(3));
    }

    #[test]
    fn moments_feed_is_bounded() {
        let mut state = world();
        let id = BotId::slot(1);
        for i in 0..=MOMENTS_CAP {
            state.push_moment(&id, format!("post {i}")).unwrap();
        }
        assert_eq!(state.moments.len(), MOMENTS_TRIM);
        assert!(state.push_moment(&BotId::slot(99), String::from("ghost")).is_none());
    }

    #[test]
    fn clip_counts_characters() {
        assert_eq!(clip("深圳湾公园", 2), "深圳");
        assert_eq!(clip("abc", 10), "abc");
    }

    #[test]
    fn find_bot_by_slot_or_name() {
        let state = world();
        let by_slot = state.find_bot("bot_4").unwrap();
        let by_name = state.find_bot(&by_slot.name).unwrap();
        assert_eq!(by_slot.id, by_name.id);
        assert!(state.find_bot("nobody").is_none());
    }
}
