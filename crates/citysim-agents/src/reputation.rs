//! Public reputation.
//!
//! Each bot has a single score in `[-100, 100]`, a short deed log and a
//! handful of tags earned when the score crosses a threshold. Tags are
//! awarded one step at a time, so a bot falling fast is first "bad name"
//! and only later "notorious". Scores drift one point back toward zero
//! each morning.

use citysim_types::{Deed, Reputation};

/// Lowest possible score.
pub const SCORE_MIN: i32 = -100;

/// Highest possible score.
pub const SCORE_MAX: i32 = 100;

/// Deed log length that triggers a trim.
const DEED_LOG_LIMIT: usize = 20;

/// Deed log length kept after a trim.
const DEED_LOG_KEEP: usize = 15;

/// Tags kept per bot.
const MAX_TAGS: usize = 5;

/// Tag for a score of 30 or more.
pub const TAG_RESPECTED: &str = "respected";
/// Tag for a score of 15 or more.
pub const TAG_WELL_REGARDED: &str = "well regarded";
/// Tag for a score of -15 or less.
pub const TAG_BAD_NAME: &str = "bad name";
/// Tag for a score of -30 or less.
pub const TAG_NOTORIOUS: &str = "notorious";

/// Keep only the last `keep` items of `items`.
pub fn keep_last<T>(items: &mut Vec<T>, keep: usize) {
    let excess = items.len().saturating_sub(keep);
    if excess > 0 {
        items.drain(..excess);
    }
}

fn next_tag(score: i32, tags: &[String]) -> Option<&'static str> {
    let has = |tag: &str| tags.iter().any(|t| t == tag);
    if score >= 30 && !has(TAG_RESPECTED) {
        Some(TAG_RESPECTED)
    } else if score >= 15 && !has(TAG_WELL_REGARDED) {
        Some(TAG_WELL_REGARDED)
    } else if score <= -15 && !has(TAG_BAD_NAME) {
        Some(TAG_BAD_NAME)
    } else if score <= -30 && !has(TAG_NOTORIOUS) {
        Some(TAG_NOTORIOUS)
    } else {
        None
    }
}

/// Record a deed and move the score by `delta`.
pub fn apply_deed(rep: &mut Reputation, delta: i32, desc: &str, tick: u64) {
    rep.score = rep.score.saturating_add(delta).clamp(SCORE_MIN, SCORE_MAX);
    rep.deeds.push(Deed {
        desc: desc.to_owned(),
        delta,
        tick,
    });
    if rep.deeds.len() > DEED_LOG_LIMIT {
        keep_last(&mut rep.deeds, DEED_LOG_KEEP);
    }
    if let Some(tag) = next_tag(rep.score, &rep.tags) {
        rep.tags.push(tag.to_owned());
    }
    keep_last(&mut rep.tags, MAX_TAGS);
}

/// Move the score one point toward zero.
pub fn decay(rep: &mut Reputation) {
    rep.score = match rep.score.signum() {
        1 => rep.score.saturating_sub(1),
        -1 => rep.score.saturating_add(1),
        _ => 0,
    };
}

/// The most recent deed, if any.
pub fn latest_deed(rep: &Reputation) -> &str {
    rep.deeds.last().map_or("", |d| d.desc.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn score_is_clamped() {
        let mut rep = Reputation::default();
        apply_deed(&mut rep, 250, "saved the city", 1);
        assert_eq!(rep.score, SCORE_MAX);
        apply_deed(&mut rep, -500, "burned it down", 2);
        assert_eq!(rep.score, SCORE_MIN);
    }

    #[test]
    fn deed_log_trims_to_fifteen() {
        let mut rep = Reputation::default();
        for i in 0..21 {
            apply_deed(&mut rep, 0, &format!("deed {i}"), i);
        }
        assert_eq!(rep.deeds.len(), 15);
        assert_eq!(latest_deed(&rep), "deed 20");
    }

    #[test]
    fn tags_step_up_one_at_a_time() {
        let mut rep = Reputation::default();
        apply_deed(&mut rep, 35, "opened a shop", 1);
        assert_eq!(rep.tags, vec![TAG_RESPECTED.to_owned()]);
        apply_deed(&mut rep, 0, "kept it open", 2);
        assert_eq!(rep.tags, vec![TAG_RESPECTED.to_owned(), TAG_WELL_REGARDED.to_owned()]);
    }

    #[test]
    fn falling_bot_gets_bad_name_before_notorious() {
        let mut rep = Reputation::default();
        apply_deed(&mut rep, -40, "scammed a neighbor", 1);
        assert_eq!(rep.tags, vec![TAG_BAD_NAME.to_owned()]);
        apply_deed(&mut rep, -1, "lied again", 2);
        assert!(rep.tags.iter().any(|t| t == TAG_NOTORIOUS));
    }

    #[test]
    fn decay_moves_toward_zero() {
        let mut rep = Reputation {
            score: 2,
            ..Reputation::default()
        };
        decay(&mut rep);
        assert_eq!(rep.score, 1);
        rep.score = -1;
        decay(&mut rep);
        assert_eq!(rep.score, 0);
        decay(&mut rep);
        assert_eq!(rep.score, 0);
    }

    #[test]
    fn keep_last_drops_oldest() {
        let mut v = vec![1, 2, 3, 4, 5];
        keep_last(&mut v, 2);
        assert_eq!(v, vec![4, 5]);
        keep_last(&mut v, 10);
        assert_eq!(v, vec![4, 5]);
    }
}
