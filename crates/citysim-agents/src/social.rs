//! Bonds between bots.
//!
//! A bond is one-directional: each bot keeps its own view of everyone it
//! has met, keyed by the other bot's slot. Closeness is clamped to
//! `0..=100` on every update and the impression list keeps only the most
//! recent few entries.

use citysim_types::{Bond, Bot};

use crate::reputation::keep_last;

/// Lowest closeness value.
pub const CLOSENESS_MIN: i32 = 0;

/// Highest closeness value.
pub const CLOSENESS_MAX: i32 = 100;

/// Impressions kept per bond.
const MAX_IMPRESSIONS: usize = 5;

/// Closeness above which a bond survives into the next generation.
pub const STRONG_BOND: i32 = 30;

/// Label given to bonds a newcomer inherits second-hand.
pub const HEARD_OF_LABEL: &str = "heard of";

/// Shift a bond's closeness by `warmth` and remember the impression.
pub fn warm(bond: &mut Bond, warmth: i32, impression: &str) {
    bond.closeness = bond
        .closeness
        .saturating_add(warmth)
        .clamp(CLOSENESS_MIN, CLOSENESS_MAX);
    if !impression.is_empty() {
        bond.impressions.push(impression.to_owned());
        keep_last(&mut bond.impressions, MAX_IMPRESSIONS);
    }
}

/// Apply `warmth` to the bot's bond with `target`, creating the bond if
/// the two have never met. Returns the new closeness.
pub fn adjust_bond(bot: &mut Bot, target: &str, warmth: i32, impression: &str) -> i32 {
    let bond = bot.bonds.entry(target.to_owned()).or_default();
    warm(bond, warmth, impression);
    bond.closeness
}

/// The warmth the other side of an interaction feels: half, rounded
/// toward zero.
pub const fn mirrored_warmth(warmth: i32) -> i32 {
    match warmth.checked_div(2) {
        Some(half) => half,
        None => 0,
    }
}

/// A weak bond to someone the newcomer only knows by reputation.
pub fn heard_of(dead_name: &str) -> Bond {
    Bond {
        trust: 20,
        closeness: 5,
        hostility: 0,
        label: HEARD_OF_LABEL.to_owned(),
        impressions: vec![format!("heard {dead_name} was close to this person")],
    }
}

/// Bonds strong enough to be passed on, as `(target, bond)` pairs.
pub fn strong_bonds(bot: &Bot) -> impl Iterator<Item = (&str, &Bond)> {
    bot.bonds
        .iter()
        .filter(|(_, b)| b.closeness > STRONG_BOND)
        .map(|(k, b)| (k.as_str(), b))
}

/// The closest bond with positive closeness whose target passes `alive`.
pub fn closest_bond<'a>(bot: &'a Bot, alive: impl Fn(&str) -> bool) -> Option<&'a str> {
    bot.bonds
        .iter()
        .filter(|(k, b)| b.closeness > 0 && alive(k))
        .max_by_key(|(_, b)| b.closeness)
        .map(|(k, _)| k.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::agent::found_bot;

    fn bot() -> Bot {
        let mut rng = StdRng::seed_from_u64(31);
        found_bot(citysim_world::FOUNDING_PERSONAS.first().unwrap(), &mut rng)
    }

    #[test]
    fn warmth_creates_and_clamps_bond() {
        let mut b = bot();
        assert_eq!(adjust_bond(&mut b, "bot_2", 6, "shared noodles"), 6);
        assert_eq!(adjust_bond(&mut b, "bot_2", 200, ""), CLOSENESS_MAX);
        assert_eq!(adjust_bond(&mut b, "bot_2", -500, "argued"), CLOSENESS_MIN);
        let bond = b.bonds.get("bot_2").unwrap();
        assert_eq!(bond.impressions, vec!["shared noodles", "argued"]);
        assert_eq!(bond.label, "acquaintance");
    }

    #[test]
    fn impressions_keep_last_five() {
        let mut b = bot();
        for i in 0..8 {
            adjust_bond(&mut b, "bot_3", 1, &format!("met {i}"));
        }
        let bond = b.bonds.get("bot_3").unwrap();
        assert_eq!(bond.impressions.len(), 5);
        assert_eq!(bond.impressions.first().map(String::as_str), Some("met 3"));
    }

    #[test]
    fn mirror_is_half_toward_zero() {
        assert_eq!(mirrored_warmth(6), 3);
        assert_eq!(mirrored_warmth(5), 2);
        assert_eq!(mirrored_warmth(-5), -2);
        assert_eq!(mirrored_warmth(1), 0);
    }

    #[test]
    fn closest_skips_dead_and_cold_bonds() {
        let mut b = bot();
        adjust_bond(&mut b, "bot_2", 40, "");
        adjust_bond(&mut b, "bot_3", 70, "");
        adjust_bond(&mut b, "bot_4", 0, "");
        assert_eq!(closest_bond(&b, |_| true), Some("bot_3"));
        assert_eq!(closest_bond(&b, |id| id != "bot_3"), Some("bot_2"));
        assert_eq!(closest_bond(&b, |id| id == "bot_4"), None);
    }

    #[test]
    fn only_strong_bonds_pass_on() {
        let mut b = bot();
        adjust_bond(&mut b, "bot_2", 30, "");
        adjust_bond(&mut b, "bot_5", 31, "");
        let strong: Vec<_> = strong_bonds(&b).map(|(k, _)| k).collect();
        assert_eq!(strong, vec!["bot_5"]);
        let inherited = heard_of("Chen Jing");
        assert_eq!(inherited.closeness, 5);
        assert_eq!(inherited.label, HEARD_OF_LABEL);
    }
}
