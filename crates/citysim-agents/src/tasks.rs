//! Jobs and the task state machine.
//!
//! A task moves `in_progress -> completed | failed`. It advances one hour
//! per tick and may hit a random challenge on the way, which lowers the
//! odds of success but pays a bonus if the bot pulls through.

use citysim_types::{Bot, Emotion, Job, Task, TaskStatus};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{info, warn};

use crate::error::AgentError;

/// Energy spent to start a task.
pub const START_ENERGY_COST: u32 = 8;

/// Setbacks a task can run into.
const CHALLENGES: [&str; 7] = [
    "the client changed the requirements",
    "a tool broke",
    "a coworker called in sick and needed cover",
    "materials ran short",
    "the boss is pushing for speed",
    "a tricky technical problem came up",
    "the weather got in the way",
];

/// What happened to a task this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskProgress {
    /// Still under way.
    Working {
        /// Hours done.
        progress: u32,
        /// Hours needed.
        duration: u32,
        /// Challenge hit this tick, if any.
        challenge: Option<String>,
    },
    /// Finished successfully.
    Completed {
        /// Money earned, bonus included.
        pay: u64,
    },
    /// Finished badly.
    Failed {
        /// Consolation pay.
        pay: u64,
    },
}

fn pick_job<'a>(jobs: &'a [Job], wanted: &str) -> Option<&'a Job> {
    let wanted = wanted.trim();
    jobs.iter()
        .find(|j| j.title.eq_ignore_ascii_case(wanted))
        .or_else(|| {
            if wanted.is_empty() {
                return None;
            }
            let lower = wanted.to_lowercase();
            jobs.iter().find(|j| {
                let title = j.title.to_lowercase();
                title.contains(&lower) || lower.contains(&title)
            })
        })
        .or_else(|| jobs.first())
}

/// Start a task from one of `jobs`.
///
/// `wanted` names the job; an inexact or empty name falls back to a
/// partial match and then to the first job on offer. Returns a short
/// description of the task that was started.
pub fn start_task<R: Rng + ?Sized>(
    bot: &mut Bot,
    jobs: &[Job],
    wanted: &str,
    tick: u64,
    rng: &mut R,
) -> Result<String, AgentError> {
    if let Some(task) = &bot.current_task
        && task.status == TaskStatus::InProgress
    {
        return Err(AgentError::TaskInProgress {
            task: task.task_name.clone(),
        });
    }
    bot.current_task = None;

    let job = pick_job(jobs, wanted).ok_or_else(|| AgentError::NoJobs(bot.location.clone()))?;
    let actual = bot.skill_level(job.skill);
    if actual < job.min_skill {
        return Err(AgentError::SkillTooLow {
            job: job.title.clone(),
            required: job.min_skill,
            actual,
        });
    }

    let (name, duration, difficulty, desc) = job.tasks.choose(rng).map_or_else(
        || (String::from("Work"), 2, 0.2, String::from("Routine work")),
        |t| (t.name.clone(), t.duration, t.difficulty, t.desc.clone()),
    );
    let base_pay = job.pay.saturating_add_signed(rng.random_range(-10..=10));

    let summary = format!("started [{name}]: {desc} | about {duration} hours");
    bot.current_task = Some(Task {
        job_title: job.title.clone(),
        task_name: name,
        skill: job.skill,
        duration,
        progress: 0,
        difficulty,
        base_pay,
        status: TaskStatus::InProgress,
        challenge: None,
        result: None,
        started_tick: tick,
    });
    bot.energy = bot.energy.saturating_sub(START_ENERGY_COST);
    bot.job = Some(job.title.clone());
    info!(bot_id = %bot.id, job = %job.title, "{summary}");
    Ok(summary)
}

/// Advance the bot's task by one hour.
///
/// Returns `None` when there is no task in progress.
pub fn progress_task<R: Rng + ?Sized>(bot: &mut Bot, rng: &mut R) -> Option<TaskProgress> {
    let skill_level = bot
        .current_task
        .as_ref()
        .map(|t| bot.skill_level(t.skill))?;
    let task = bot
        .current_task
        .as_mut()
        .filter(|t| t.status == TaskStatus::InProgress)?;

    task.progress = task.progress.saturating_add(1);
    let mut new_challenge = None;
    if task.challenge.is_none() && rng.random::<f64>() < task.difficulty * 0.5 {
        let challenge = CHALLENGES.choose(rng).copied().unwrap_or("something went wrong");
        task.challenge = Some(challenge.to_owned());
        new_challenge = Some(challenge.to_owned());
        info!(bot_id = %bot.id, challenge, "task hit a challenge");
    }

    if task.progress < task.duration {
        return Some(TaskProgress::Working {
            progress: task.progress,
            duration: task.duration,
            challenge: new_challenge,
        });
    }

    let challenged = task.challenge.is_some();
    let mut success_rate = (0.5 + f64::from(skill_level) / 200.0).min(0.95);
    if challenged {
        success_rate -= 0.15;
    }

    let outcome = if rng.random::<f64>() < success_rate {
        let bonus: u64 = if challenged { rng.random_range(10..=30) } else { 0 };
        let pay = task.base_pay.saturating_add(bonus);
        task.status = TaskStatus::Completed;
        task.result = Some(if bonus > 0 {
            format!("done! earned {pay} yuan (including a {bonus} yuan bonus for the trouble)")
        } else {
            format!("done! earned {pay} yuan")
        });
        TaskProgress::Completed { pay }
    } else {
        let pay = task.base_pay.saturating_div(3).max(10);
        task.status = TaskStatus::Failed;
        task.result = Some(format!("the task failed... only got {pay} yuan for the effort"));
        TaskProgress::Failed { pay }
    };
    let skill = task.skill;
    let task_name = task.task_name.clone();

    match &outcome {
        TaskProgress::Completed { pay } => {
            bot.money = bot.money.saturating_add(*pay);
            if let Some(s) = skill {
                bot.skills.raise(s, rng.random_range(2..=4));
            }
            bot.emotions.adjust(Emotion::Happiness, 12.0);
            bot.emotions.adjust(Emotion::Anxiety, -5.0);
            bot.emotions.adjust(Emotion::Sadness, -3.0);
            info!(bot_id = %bot.id, task = %task_name, pay, "task completed");
        }
        TaskProgress::Failed { pay } => {
            bot.money = bot.money.saturating_add(*pay);
            if let Some(s) = skill {
                bot.skills.raise(s, 1);
            }
            bot.emotions.adjust(Emotion::Sadness, 5.0);
            bot.emotions.adjust(Emotion::Anxiety, 3.0);
            warn!(bot_id = %bot.id, task = %task_name, pay, "task failed");
        }
        TaskProgress::Working { .. } => {}
    }
    Some(outcome)
}
