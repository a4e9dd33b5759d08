//! Error types for the citysim-agents crate.
//!
//! Per-bot arithmetic never fails; these errors cover requests a bot
//! cannot satisfy, such as starting work it is not qualified for.

/// Errors that can occur while acting on a single bot.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgentError {
    /// The bot is already part-way through a task.
    #[error("already working on {task}")]
    TaskInProgress {
        /// Name of the unfinished task.
        task: String,
    },

    /// The location has no jobs on offer.
    #[error("no jobs available at {0}")]
    NoJobs(String),

    /// The bot's skill is below the job's requirement.
    #[error("skill too low for {job}: need {required}, have {actual}")]
    SkillTooLow {
        /// Job title.
        job: String,
        /// Minimum skill level.
        required: u32,
        /// The bot's current level.
        actual: u32,
    },
}
