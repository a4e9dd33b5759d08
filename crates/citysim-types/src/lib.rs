//! Shared type definitions for the citysim workspace.
//!
//! This crate is the single source of truth for the data model shared by
//! the engine, the oracle and the boundary API. Types flow downstream to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Bot slots and UUID wrappers for other entities
//! - [`enums`] -- Small closed vocabularies (weather, emotions, skills, ...)
//! - [`structs`] -- Bots, locations and historical records
//! - [`rules`] -- The rule record and its condition/effect DSL
//! - [`actions`] -- Tool calls, judgments and action feedback
//! - [`api`] -- Boundary request and response bodies

pub mod actions;
pub mod api;
pub mod enums;
pub mod ids;
pub mod rules;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{
    ActionFeedback, ActionOutcome, ActionRequest, CreateArgs, ExpressArgs, ExpressChannel,
    InteractArgs, Judgment, MoveArgs, ResolvedAction, ResourceChanges, SocialEffect, ToolCall,
    UseResourceArgs, WorldChange, WorldChangeKind,
};
pub use api::{CommentRequest, LikeRequest, MessagesView, SendMessageRequest, SyncStateRequest};
pub use enums::{
    BotAttr, BotStatus, Desire, Emotion, Gender, Impact, LocationKind, MessagePriority,
    ModificationKind, MoodDimension, ResourceAttr, Skill, TaskStatus, TravelMode, Weather,
};
pub use ids::{BotId, LegendId, ModificationId, MomentId, RuleId};
pub use rules::{Condition, Effect, Rule, RuleChanges, RuleDraft, RuleSummary, Trigger};
pub use structs::{
    ActionLogEntry, AttractionSignal, Bond, Bot, BotPublicView, Comment, CoreMemory, Deed,
    DesireProfile, Desires, Emotions, Family, Grave, Job, JobTask, Legend, Location,
    LocationView, Message, Modification, Moment, Npc, PendingReply, PublicMemory, RecentEvent,
    Reputation, ReputationEntry, Skills, Task, TimeView, Values, WorldEvent,
};
