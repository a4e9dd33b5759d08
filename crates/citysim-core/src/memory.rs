//! Location public memory and the ambience ("vibe") it produces.
//!
//! Every location keeps a bounded log of notable things that happened
//! there. Every tenth entry the vibe is recomputed from the most recent
//! entries by majority impact.

use citysim_agents::keep_last;
use citysim_types::{Impact, Location, PublicMemory};

/// Entries considered when recomputing the vibe.
const VIBE_WINDOW: usize = 15;

/// Recompute the vibe every this many entries.
const VIBE_EVERY: usize = 10;

/// Vibe of a location with nothing remarkable in its recent memory.
pub const ORDINARY_VIBE: &str = "ordinary";

/// Append `memory` to the location, trimming to `trim` entries once the
/// log exceeds `cap`. Returns the new vibe if it was recomputed.
pub fn record(location: &mut Location, memory: PublicMemory, cap: usize, trim: usize) -> Option<String> {
    location.public_memory.push(memory);
    if location.public_memory.len() > cap {
        keep_last(&mut location.public_memory, trim);
    }
    let len = location.public_memory.len();
    if len == 0 || len.checked_rem(VIBE_EVERY) != Some(0) {
        return None;
    }
    let start = len.saturating_sub(VIBE_WINDOW);
    let vibe = vibe_of(location.public_memory.get(start..).unwrap_or_default()).to_owned();
    if vibe != location.vibe {
        tracing::info!(location = %location.name, vibe = %vibe, "location vibe changed");
    }
    location.vibe.clone_from(&vibe);
    Some(vibe)
}

/// Vibe label for a window of memories.
///
/// A category wins when it covers more than half of the window. Deaths
/// outrank tension, tension outranks creation, creation outranks
/// plain good news.
pub fn vibe_of(memories: &[PublicMemory]) -> &'static str {
    let count = |pred: &dyn Fn(Impact) -> bool| memories.iter().filter(|m| pred(m.impact)).count();
    let majority = |n: usize| n.saturating_mul(2) > memories.len();

    if majority(count(&|i| i == Impact::Death)) {
        "somber"
    } else if majority(count(&|i| matches!(i, Impact::Negative | Impact::Conflict))) {
        "tense"
    } else if majority(count(&|i| i == Impact::Creation)) {
        "creative"
    } else if majority(count(&|i| i == Impact::Positive)) {
        "lively"
    } else {
        ORDINARY_VIBE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use citysim_world::starting_locations;

    use super::*;

    fn memory(impact: Impact) -> PublicMemory {
        PublicMemory {
            event: String::from("something happened"),
            actor: String::from("bot_1"),
            actor_name: String::from("Li Haoran"),
            tick: 1,
            time: String::from("Day 1 07:00"),
            impact,
        }
    }

    #[test]
    fn majority_decides_vibe() {
        let mut window = vec![memory(Impact::Creation); 6];
        window.extend(vec![memory(Impact::Neutral); 4]);
        assert_eq!(vibe_of(&window), "creative");

        let mut window = vec![memory(Impact::Conflict); 3];
        window.extend(vec![memory(Impact::Negative); 3]);
        window.extend(vec![memory(Impact::Positive); 5]);
        assert_eq!(vibe_of(&window), "tense");

        let even = vec![memory(Impact::Positive), memory(Impact::Neutral)];
        assert_eq!(vibe_of(&even), ORDINARY_VIBE);
    }

    #[test]
    fn log_is_capped_and_vibe_recomputed_every_tenth() {
        let mut loc = starting_locations().into_iter().next().unwrap();
        for i in 1..=9 {
            assert!(record(&mut loc, memory(Impact::Death), 30, 25).is_none(), "entry {i}");
        }
        assert_eq!(record(&mut loc, memory(Impact::Death), 30, 25).as_deref(), Some("somber"));
        assert_eq!(loc.vibe, "somber");

        for _ in 0..25 {
            record(&mut loc, memory(Impact::Positive), 30, 25);
        }
        assert!(loc.public_memory.len() <= 30);
    }
}
