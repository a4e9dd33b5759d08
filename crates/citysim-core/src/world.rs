//! The shared world handle.
//!
//! [`World`] owns the store behind one coarse lock, the random number
//! generator, the configuration and the oracle. The tick loop and every
//! API handler go through it.
//!
//! Action resolution releases the lock around every oracle call and takes
//! it again to commit, so a slow backend never stalls the tick loop. A
//! second, per-bot gate keeps two submissions for the same bot from
//! interleaving between those steps.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracing::{debug, info, warn};

use citysim_agents::keep_last;
use citysim_types::{
    ActionFeedback, ActionOutcome, ActionRequest, BotId, Comment, Judgment, MessagesView,
    PendingReply, ResolvedAction, SendMessageRequest, SyncStateRequest, ToolCall,
};

use crate::actions::{self, ActionError, Dispatch, Shortcut};
use crate::config::SimulationConfig;
use crate::oracle::{Oracle, OracleError, OracleFuture};
use crate::persistence::{self, PersistenceError};
use crate::rules::{accept_drafts, synthesis_allowed};
use crate::state::WorldState;
use crate::tick::{TickError, TickSummary, run_tick};

/// Core memories kept from a sync.
const SYNCED_MEMORIES: usize = 20;

/// Recent actions kept from a sync.
const SYNCED_ACTIONS: usize = 10;

/// Messages returned to a bot.
const MESSAGES_SHOWN: usize = 20;

/// Errors from requests that address something that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// No bot holds this slot.
    #[error("unknown bot {0}")]
    UnknownBot(BotId),

    /// No moment at this index.
    #[error("no moment at index {0}")]
    UnknownMoment(usize),

    /// Writing the snapshot failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Everything the world lock guards.
#[derive(Debug)]
pub struct Shared {
    /// The store.
    pub state: WorldState,
    /// Randomness for ticks and actions.
    pub rng: StdRng,
}

/// Handle to the running world.
pub struct World {
    shared: Mutex<Shared>,
    config: SimulationConfig,
    oracle: Arc<dyn Oracle>,
    /// One gate per identity slot. Slots are fixed at founding since
    /// successors reuse them.
    gates: BTreeMap<BotId, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("world", &self.config.world.name)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Wrap a store. A configured seed makes the random stream repeatable.
    pub fn new(state: WorldState, config: SimulationConfig, oracle: Arc<dyn Oracle>) -> Self {
        let rng = config
            .world
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let gates = state
            .bots
            .keys()
            .map(|id| (id.clone(), Arc::new(Mutex::new(()))))
            .collect();
        Self {
            shared: Mutex::new(Shared { state, rng }),
            config,
            oracle,
            gates,
        }
    }

    /// The configuration the world runs with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Take the world lock.
    pub async fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().await
    }

    /// Run one tick under the lock.
    pub async fn tick(&self) -> Result<TickSummary, TickError> {
        let mut shared = self.lock().await;
        let Shared { state, rng } = &mut *shared;
        run_tick(state, &self.config, rng)
    }

    /// Copy the store under the lock and write it to `path` after
    /// releasing it.
    pub async fn save_snapshot(&self, path: &Path) -> Result<(), RequestError> {
        let copy = self.lock().await.state.clone();
        persistence::save(path, &copy).await?;
        Ok(())
    }

    /// Serialize actions of one bot. Unknown ids get no gate; the
    /// pipeline rejects them anyway.
    async fn gate(&self, id: &BotId) -> Option<OwnedMutexGuard<()>> {
        let gate = Arc::clone(self.gates.get(id)?);
        Some(gate.lock_owned().await)
    }

    /// Bound an oracle call by the configured timeout.
    async fn ask<T>(&self, call: OracleFuture<'_, T>) -> Result<T, OracleError> {
        let ms = self.config.world.oracle_timeout_ms;
        match tokio::time::timeout(Duration::from_millis(ms), call).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!(%elapsed, ms, "oracle call timed out");
                Err(OracleError::Timeout { ms })
            }
        }
    }

    /// Resolve one action for `id`.
    ///
    /// Never fails: anything that goes wrong ends up as `success = false`
    /// feedback or the conservative default.
    pub async fn submit_action(&self, id: &BotId, request: ActionRequest) -> ActionOutcome {
        let _gate = self.gate(id).await;
        let plan = request.plan.trim().to_owned();

        if request.tool_call.is_none()
            && let Some(shortcut) = actions::shortcut(&plan)
        {
            return self.run_shortcut(id, &plan, shortcut).await;
        }
        if let Err(e) = self.require_awake(id).await {
            info!(bot_id = %id, error = %e, "action rejected");
            let feedback = e.into_feedback(&plan);
            return self.finish(id, &plan, ResolvedAction::Fallback, feedback).await;
        }

        let call = match request.tool_call {
            Some(call) => Some(call),
            None => match self.resolve_plan(id, &plan).await {
                Ok(call) => call,
                Err(e) => {
                    let feedback = e.into_feedback(&plan);
                    return self.finish(id, &plan, ResolvedAction::Fallback, feedback).await;
                }
            },
        };
        let Some(call) = call else {
            let feedback = self.commit(id, &plan, None, None).await;
            return self.finish(id, &plan, ResolvedAction::Fallback, feedback).await;
        };

        let routed = {
            let mut shared = self.lock().await;
            let Shared { state, rng } = &mut *shared;
            actions::dispatch(state, id, &plan, call.clone(), &self.config, rng)
        };
        let (mut feedback, judged) = match routed {
            Ok(Dispatch::Done(feedback)) => (feedback, true),
            Ok(Dispatch::Judge(judged_call)) => {
                let judgment = self.judge(id, &judged_call).await;
                let judged = judgment.is_some();
                (self.commit(id, &plan, Some(&judged_call), judgment).await, judged)
            }
            Err(e) => {
                info!(bot_id = %id, error = %e, "action rejected");
                (e.into_feedback(&plan), false)
            }
        };

        if feedback.success && judged {
            feedback.rules_created = self.synthesize(id, &call, &feedback).await;
        }
        self.finish(id, &plan, ResolvedAction::Tool { call }, feedback).await
    }

    async fn run_shortcut(&self, id: &BotId, plan: &str, shortcut: Shortcut) -> ActionOutcome {
        let action = match shortcut {
            Shortcut::Wake => ResolvedAction::WakeUp,
            Shortcut::Sleep => ResolvedAction::Sleep,
        };
        let feedback = {
            let mut shared = self.lock().await;
            actions::apply_shortcut(&mut shared.state, id, plan, shortcut)
                .unwrap_or_else(|e| e.into_feedback(plan))
        };
        self.finish(id, plan, action, feedback).await
    }

    async fn require_awake(&self, id: &BotId) -> Result<(), ActionError> {
        let shared = self.lock().await;
        let bot = actions::precheck(&shared.state, id)?;
        if bot.is_sleeping {
            return Err(ActionError::Asleep(bot.name.clone()));
        }
        Ok(())
    }

    /// Turn a plan into a tool call. `Ok(None)` means the oracle could not
    /// help and the conservative default applies.
    async fn resolve_plan(&self, id: &BotId, plan: &str) -> Result<Option<ToolCall>, ActionError> {
        let ctx = {
            let shared = self.lock().await;
            actions::plan_context(&shared.state, id, plan)?
        };
        match self.ask(self.oracle.resolve_plan(&ctx)).await {
            Ok(call) => {
                debug!(bot_id = %id, ?call, "plan resolved");
                Ok(Some(call))
            }
            Err(e) => {
                warn!(bot_id = %id, error = %e, "plan resolution failed, using fallback");
                Ok(None)
            }
        }
    }

    /// Ask the oracle to judge `call`. `None` means no judgment is
    /// available.
    async fn judge(&self, id: &BotId, call: &ToolCall) -> Option<Judgment> {
        let ctx = {
            let shared = self.lock().await;
            actions::action_context(&shared.state, id, call).ok()?
        };
        match self.ask(self.oracle.interpret_action(&ctx)).await {
            Ok(judgment) => Some(judgment),
            Err(e) => {
                warn!(bot_id = %id, error = %e, "judgment failed, using fallback");
                None
            }
        }
    }

    /// Commit a judgment, or the conservative default when there is none.
    async fn commit(
        &self,
        id: &BotId,
        plan: &str,
        call: Option<&ToolCall>,
        judgment: Option<Judgment>,
    ) -> ActionFeedback {
        let mut shared = self.lock().await;
        let state = &mut shared.state;
        let judgment = judgment.unwrap_or_else(|| {
            let desc = call.map_or(plan, ToolCall::desc);
            Judgment::fallback(&state.name_of(id.as_str()), desc)
        });
        actions::commit_judgment(state, id, plan, call, judgment, &self.config)
            .unwrap_or_else(|e| e.into_feedback(plan))
    }

    /// Let the oracle propose rules after a successful action.
    async fn synthesize(
        &self,
        id: &BotId,
        call: &ToolCall,
        feedback: &ActionFeedback,
    ) -> Vec<citysim_types::RuleSummary> {
        let ctx = {
            let mut shared = self.lock().await;
            let Shared { state, rng } = &mut *shared;
            if !synthesis_allowed(state.active_rule_count(), &self.config.rules, rng) {
                return Vec::new();
            }
            let Some(ctx) = actions::synthesis_context(state, id, call.desc(), &feedback.narrative)
            else {
                return Vec::new();
            };
            ctx
        };
        let drafts = match self.ask(self.oracle.synthesize_rules(&ctx)).await {
            Ok(drafts) => drafts,
            Err(e) => {
                warn!(bot_id = %id, error = %e, "rule synthesis failed");
                return Vec::new();
            }
        };
        if drafts.is_empty() {
            return Vec::new();
        }
        let mut shared = self.lock().await;
        accept_drafts(&mut shared.state, drafts, id, &ctx.location, &self.config.rules)
    }

    async fn finish(
        &self,
        id: &BotId,
        plan: &str,
        action: ResolvedAction,
        feedback: ActionFeedback,
    ) -> ActionOutcome {
        let mut shared = self.lock().await;
        actions::record(&mut shared.state, id, plan, &action, &feedback);
        info!(
            bot_id = %id,
            success = feedback.success,
            rules_created = feedback.rules_created.len(),
            "action resolved"
        );
        ActionOutcome {
            action,
            result: feedback,
        }
    }

    /// Store the inner state a bot's decision loop pushed.
    pub async fn sync_state(&self, id: &BotId, sync: SyncStateRequest) -> Result<(), RequestError> {
        let mut shared = self.lock().await;
        let bot = shared
            .state
            .bots
            .get_mut(id)
            .ok_or_else(|| RequestError::UnknownBot(id.clone()))?;
        if !sync.core_memories.is_empty() {
            bot.core_memories = sync.core_memories;
            keep_last(&mut bot.core_memories, SYNCED_MEMORIES);
        }
        if let Some(values) = sync.values {
            bot.values = values;
        }
        if !sync.bonds.is_empty() {
            bot.bonds = sync.bonds;
        }
        if let Some(mut recent) = sync.recent_actions {
            keep_last(&mut recent, SYNCED_ACTIONS);
            bot.recent_actions_synced = recent;
        }
        if let Some(goal) = sync.long_term_goal.filter(|g| !g.trim().is_empty()) {
            bot.long_term_goal = Some(goal);
        }
        if let Some(summary) = sync.narrative_summary.filter(|s| !s.trim().is_empty()) {
            bot.narrative_summary = summary;
        }
        if sync.clear_pending_reply {
            bot.pending_reply_to = None;
        }
        debug!(bot_id = %id, "inner state synced");
        Ok(())
    }

    /// Post to the message board. A directed message waits for a reply.
    pub async fn send_message(&self, message: SendMessageRequest) -> Result<(), RequestError> {
        let mut shared = self.lock().await;
        let state = &mut shared.state;
        let tick = state.tick();
        if let Some(to) = &message.to {
            let bot = state
                .bots
                .get_mut(to)
                .ok_or_else(|| RequestError::UnknownBot(to.clone()))?;
            bot.pending_reply_to = Some(PendingReply {
                from: message.from.clone(),
                msg: message.message.clone(),
                tick,
            });
        }
        info!(from = %message.from, to = ?message.to, priority = ?message.priority, "message posted");
        state.send_message(&message.from, message.to, message.message, message.priority);
        Ok(())
    }

    /// Latest messages for `id` and any pending directed message.
    pub async fn messages_for(&self, id: &BotId) -> Result<MessagesView, RequestError> {
        let shared = self.lock().await;
        let state = &shared.state;
        let bot = state
            .bots
            .get(id)
            .ok_or_else(|| RequestError::UnknownBot(id.clone()))?;
        let mut messages: Vec<_> = state
            .message_board
            .iter()
            .filter(|m| m.to.as_ref().is_none_or(|to| to == id))
            .cloned()
            .collect();
        keep_last(&mut messages, MESSAGES_SHOWN);
        Ok(MessagesView {
            messages,
            pending_reply_to: bot.pending_reply_to.clone(),
        })
    }

    /// Like the moment at `index`. Returns its like count.
    pub async fn like_moment(&self, index: usize, liker: &BotId) -> Result<usize, RequestError> {
        let mut shared = self.lock().await;
        let state = &mut shared.state;
        if !state.bots.contains_key(liker) {
            return Err(RequestError::UnknownBot(liker.clone()));
        }
        let moment = state
            .moments
            .get_mut(index)
            .ok_or(RequestError::UnknownMoment(index))?;
        if !moment.likes.contains(liker) {
            moment.likes.push(liker.clone());
        }
        Ok(moment.likes.len())
    }

    /// Comment on the moment at `index`. Returns its comment count.
    pub async fn comment_moment(
        &self,
        index: usize,
        author: &BotId,
        content: String,
    ) -> Result<usize, RequestError> {
        let mut shared = self.lock().await;
        let state = &mut shared.state;
        let tick = state.tick();
        let name = state
            .bots
            .get(author)
            .map(|b| b.name.clone())
            .ok_or_else(|| RequestError::UnknownBot(author.clone()))?;
        let moment = state
            .moments
            .get_mut(index)
            .ok_or(RequestError::UnknownMoment(index))?;
        moment.comments.push(Comment {
            bot_id: author.clone(),
            name,
            content,
            tick,
        });
        Ok(moment.comments.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use citysim_types::{
        Condition, Effect, InteractArgs, MessagePriority, RuleDraft, SocialEffect, Trigger,
    };

    use super::*;
    use crate::oracle::FakeOracle;

    fn world_with(oracle: FakeOracle) -> World {
        let mut config = SimulationConfig::default();
        config.world.seed = Some(11);
        let mut rng = StdRng::seed_from_u64(11);
        let state = WorldState::new(&config, &mut rng);
        World::new(state, config, Arc::new(oracle))
    }

    fn request(plan: &str, call: Option<ToolCall>) -> ActionRequest {
        ActionRequest {
            plan: plan.to_owned(),
            tool_call: call,
        }
    }

    /// Two awake bots at the same place.
    async fn pair(world: &World) -> (BotId, BotId) {
        let (a, b) = (BotId::slot(1), BotId::slot(2));
        let mut shared = world.lock().await;
        let place = shared.state.bots.get(&a).unwrap().location.clone();
        shared.state.move_bot(&b, &place);
        for id in [&a, &b] {
            shared.state.bots.get_mut(id).unwrap().is_sleeping = false;
        }
        (a, b)
    }

    fn warm_judgment(target: &BotId) -> Judgment {
        let mut judgment = Judgment::fallback("someone", "chat");
        judgment.social_effects.push(SocialEffect {
            target: target.to_string(),
            effect: String::from("shared dumplings"),
            warmth_delta: 6,
        });
        judgment
    }

    #[tokio::test]
    async fn mutual_warmth_is_mirrored_at_half() {
        let (a, b) = (BotId::slot(1), BotId::slot(2));
        let world = world_with(FakeOracle::new().with_judgment(warm_judgment(&b)));
        pair(&world).await;
        let call = ToolCall::Interact {
            args: InteractArgs {
                target: b.to_string(),
                manner: String::from("friendly"),
                content: String::from("want some dumplings?"),
            },
            desc: String::from("share dumplings"),
        };
        let before = {
            let shared = world.lock().await;
            let closeness = |from: &BotId, to: &BotId| {
                shared
                    .state
                    .bots
                    .get(from)
                    .and_then(|x| x.bonds.get(to.as_str()))
                    .map_or(0, |bond| bond.closeness)
            };
            (closeness(&a, &b), closeness(&b, &a))
        };

        let outcome = world.submit_action(&a, request("share dumplings", Some(call))).await;
        assert!(outcome.result.success);

        let shared = world.lock().await;
        let bond_ab = shared.state.bots.get(&a).unwrap().bonds.get(b.as_str()).unwrap();
        let bond_ba = shared.state.bots.get(&b).unwrap().bonds.get(a.as_str()).unwrap();
        assert_eq!(bond_ab.closeness, (before.0 + 6).min(100));
        assert_eq!(bond_ba.closeness, (before.1 + 3).min(100));
    }

    #[tokio::test]
    async fn sleep_and_wake_shortcuts_skip_the_oracle() {
        let world = world_with(FakeOracle::failing());
        let id = BotId::slot(3);
        let outcome = world.submit_action(&id, request("time to sleep", None)).await;
        assert_eq!(outcome.action, ResolvedAction::Sleep);
        assert!(world.lock().await.state.bots.get(&id).unwrap().is_sleeping);

        let outcome = world.submit_action(&id, request("wake up", None)).await;
        assert_eq!(outcome.action, ResolvedAction::WakeUp);
        let shared = world.lock().await;
        let bot = shared.state.bots.get(&id).unwrap();
        assert!(!bot.is_sleeping);
        assert_eq!(bot.action_log.len(), 2);
    }

    #[tokio::test]
    async fn failing_oracle_falls_back_without_rules() {
        let world = world_with(FakeOracle::failing());
        let id = BotId::slot(1);
        world.lock().await.state.bots.get_mut(&id).unwrap().is_sleeping = false;
        let rules_before = world.lock().await.state.rules.len();

        let outcome = world.submit_action(&id, request("stare at the sea", None)).await;
        assert_eq!(outcome.action, ResolvedAction::Fallback);
        assert!(outcome.result.success);
        assert_eq!(outcome.result.resource_changes.energy, -3);
        assert!(outcome.result.rules_created.is_empty());
        assert_eq!(world.lock().await.state.rules.len(), rules_before);
    }

    #[tokio::test]
    async fn sleeping_bot_must_wake_first() {
        let world = world_with(FakeOracle::new());
        let id = BotId::slot(2);
        world.lock().await.state.bots.get_mut(&id).unwrap().is_sleeping = true;
        let outcome = world.submit_action(&id, request("go for a run", None)).await;
        assert!(!outcome.result.success);
        assert!(world.lock().await.state.bots.get(&id).unwrap().is_sleeping);
    }

    #[tokio::test]
    async fn unknown_ids_do_not_grow_the_gates() {
        let world = world_with(FakeOracle::new());
        let slots = world.gates.len();
        for i in 0..50 {
            let id = BotId::from(format!("ghost_{i}"));
            let outcome = world.submit_action(&id, request("look around", None)).await;
            assert!(!outcome.result.success);
        }
        assert_eq!(world.gates.len(), slots);
        assert!(world.gates.contains_key(&BotId::slot(1)));
    }

    #[tokio::test]
    async fn unknown_bot_gets_failed_feedback() {
        let world = world_with(FakeOracle::new());
        let outcome = world
            .submit_action(&BotId::from("bot_99"), request("open a shop", None))
            .await;
        assert!(!outcome.result.success);
    }

    #[tokio::test]
    async fn synthesized_rules_are_echoed_in_feedback() {
        let draft = RuleDraft {
            name: String::from("Night noodle cart"),
            description: String::from("A cart sells cheap noodles after dark"),
            location: None,
            trigger: Trigger::EveryTick,
            condition: Condition::Always(true),
            effects: vec![Effect::Narrative {
                text: String::from("steam rises from the noodle cart"),
            }],
            durability: 50.0,
            decay_rate: 1.0,
        };
        let world = world_with(FakeOracle::new().with_drafts(vec![draft]));
        let id = BotId::slot(1);
        {
            let mut shared = world.lock().await;
            shared.state.rules.clear();
            shared.state.bots.get_mut(&id).unwrap().is_sleeping = false;
        }
        let outcome = world.submit_action(&id, request("look around the market", None)).await;
        assert_eq!(outcome.result.rules_created.len(), 1);
        let shared = world.lock().await;
        assert_eq!(shared.state.active_rule_count(), 1);
        assert!(shared.state.bots.get(&id).unwrap().reputation.score >= 5);
    }

    #[tokio::test]
    async fn directed_message_waits_for_a_reply() {
        let world = world_with(FakeOracle::new());
        let id = BotId::slot(2);
        world
            .send_message(SendMessageRequest {
                from: String::from("bot_5"),
                to: Some(id.clone()),
                message: String::from("are you free tonight?"),
                priority: MessagePriority::Normal,
            })
            .await
            .unwrap();
        let view = world.messages_for(&id).await.unwrap();
        assert_eq!(view.pending_reply_to.unwrap().msg, "are you free tonight?");
        assert!(view.messages.iter().any(|m| m.msg == "are you free tonight?"));

        world
            .sync_state(
                &id,
                SyncStateRequest {
                    clear_pending_reply: true,
                    ..SyncStateRequest::default()
                },
            )
            .await
            .unwrap();
        assert!(world.messages_for(&id).await.unwrap().pending_reply_to.is_none());
    }

    #[tokio::test]
    async fn messages_for_shows_only_own_and_public() {
        let world = world_with(FakeOracle::new());
        {
            let mut shared = world.lock().await;
            shared.state.message_board.clear();
            shared.state.send_message("system", None, "city news", MessagePriority::Low);
            shared
                .state
                .send_message("system", Some(BotId::slot(4)), "private", MessagePriority::High);
        }
        let view = world.messages_for(&BotId::slot(1)).await.unwrap();
        assert_eq!(view.messages.len(), 1);
        assert!(matches!(
            world.messages_for(&BotId::from("nobody")).await,
            Err(RequestError::UnknownBot(_))
        ));
    }

    #[tokio::test]
    async fn likes_are_not_duplicated() {
        let world = world_with(FakeOracle::new());
        let author = BotId::slot(1);
        let fan = BotId::slot(2);
        {
            let mut shared = world.lock().await;
            shared.state.moments.clear();
            shared.state.push_moment(&author, String::from("sunset at the bay")).unwrap();
        }
        let index = 0;
        assert_eq!(world.like_moment(index, &fan).await.unwrap(), 1);
        assert_eq!(world.like_moment(index, &fan).await.unwrap(), 1);
        assert_eq!(
            world.comment_moment(index, &fan, String::from("beautiful")).await.unwrap(),
            1
        );
        assert!(matches!(
            world.like_moment(7, &fan).await,
            Err(RequestError::UnknownMoment(7))
        ));
    }

    #[tokio::test]
    async fn sync_keeps_the_latest_memories() {
        let world = world_with(FakeOracle::new());
        let id = BotId::slot(1);
        let memories = (0..25)
            .map(|i| citysim_types::CoreMemory {
                summary: format!("memory {i}"),
                ..citysim_types::CoreMemory::default()
            })
            .collect();
        let actions = (0..15).map(|i| format!("action {i}")).collect();
        world
            .sync_state(
                &id,
                SyncStateRequest {
                    core_memories: memories,
                    recent_actions: Some(actions),
                    long_term_goal: Some(String::from("open a noodle shop")),
                    ..SyncStateRequest::default()
                },
            )
            .await
            .unwrap();
        let shared = world.lock().await;
        let bot = shared.state.bots.get(&id).unwrap();
        assert_eq!(bot.core_memories.len(), SYNCED_MEMORIES);
        assert_eq!(bot.core_memories.first().unwrap().summary, "memory 5");
        assert_eq!(bot.recent_actions_synced.len(), SYNCED_ACTIONS);
        assert_eq!(bot.long_term_goal.as_deref(), Some("open a noodle shop"));
    }

    #[tokio::test]
    async fn ticks_advance_the_shared_clock() {
        let world = world_with(FakeOracle::new());
        let summary = world.tick().await.unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(world.lock().await.state.tick(), 1);
    }
}
