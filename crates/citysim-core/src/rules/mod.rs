//! The rule engine.
//!
//! Rules are interpreted data: a trigger, a condition tree and an ordered
//! effect list. Once per tick every active rule loses `decay_rate`
//! durability, retires permanently at zero, and otherwise runs against
//! the bots in its scope.
//!
//! - [`condition`] -- Pure condition evaluation
//! - [`effects`] -- Effect application with affordability checks
//! - [`engine`] -- Per-tick scheduling, decay and retirement
//! - [`synthesis`] -- Rate limiting, validation and dedup of new rules

pub mod condition;
pub mod effects;
pub mod engine;
pub mod synthesis;

pub use condition::{EvalContext, evaluate, hour_in_window};
pub use effects::{EffectOutcome, RuleFrame, apply_effect};
pub use engine::{RuleTickReport, tick_rules};
pub use synthesis::{accept_drafts, is_duplicate, overlap, synthesis_allowed, terms, validate_draft};
