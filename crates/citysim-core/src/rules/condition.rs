//! Condition evaluation.
//!
//! Evaluation reads state and draws from the RNG but never mutates the
//! world. A missing subject makes every bot-specific condition false, so
//! location- and world-scoped rules can share the same tree shape.

use rand::Rng;

use citysim_types::{Bot, Condition};

/// What a condition is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Virtual hour of day.
    pub hour: u32,
    /// The bot the rule is being applied to, if any.
    pub subject: Option<&'a Bot>,
}

/// Whether `hour` falls in `start..=end`, wrapping past midnight when
/// `start > end`.
pub const fn hour_in_window(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        start <= hour && hour <= end
    } else {
        hour >= start || hour <= end
    }
}

/// Evaluate a condition tree.
pub fn evaluate<R: Rng + ?Sized>(condition: &Condition, ctx: &EvalContext<'_>, rng: &mut R) -> bool {
    match condition {
        Condition::Always(value) => *value,
        Condition::Random(p) => rng.random::<f64>() < *p,
        Condition::TimeBetween(start, end) => hour_in_window(ctx.hour, *start, *end),
        Condition::BotAt(location) => ctx.subject.is_some_and(|b| b.location == *location),
        Condition::BotAttrLt(attr, value) => ctx.subject.is_some_and(|b| b.attr(*attr) < *value),
        Condition::BotAttrGt(attr, value) => ctx.subject.is_some_and(|b| b.attr(*attr) > *value),
        Condition::And(children) => children.iter().all(|c| evaluate(c, ctx, rng)),
        Condition::Or(children) => children.iter().any(|c| evaluate(c, ctx, rng)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_agents::found_bot;
    use citysim_types::BotAttr;
    use citysim_world::FOUNDING_PERSONAS;

    use super::*;

    fn bot() -> Bot {
        let mut rng = StdRng::seed_from_u64(2);
        let mut bot = found_bot(FOUNDING_PERSONAS.first().unwrap(), &mut rng);
        bot.satiety = 20;
        bot
    }

    #[test]
    fn time_window_wraps_midnight() {
        assert!(hour_in_window(6, 6, 22));
        assert!(hour_in_window(22, 6, 22));
        assert!(!hour_in_window(23, 6, 22));
        assert!(hour_in_window(23, 22, 2));
        assert!(hour_in_window(1, 22, 2));
        assert!(!hour_in_window(12, 22, 2));
    }

    #[test]
    fn bot_conditions_need_a_subject() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = bot();
        let with = EvalContext { hour: 9, subject: Some(&b) };
        let without = EvalContext { hour: 9, subject: None };

        let hungry = Condition::BotAttrLt(BotAttr::Satiety, 30.0);
        assert!(evaluate(&hungry, &with, &mut rng));
        assert!(!evaluate(&hungry, &without, &mut rng));

        let here = Condition::BotAt(b.location.clone());
        assert!(evaluate(&here, &with, &mut rng));
        assert!(!evaluate(&here, &without, &mut rng));
    }

    #[test]
    fn boolean_combinators() {
        let mut rng = StdRng::seed_from_u64(1);
        let ctx = EvalContext { hour: 12, subject: None };
        let yes = Condition::And(vec![Condition::Random(1.0), Condition::TimeBetween(10, 14)]);
        let no = Condition::And(vec![Condition::Always(true), Condition::Random(0.0)]);
        let either = Condition::Or(vec![no.clone(), yes.clone()]);
        assert!(evaluate(&yes, &ctx, &mut rng));
        assert!(!evaluate(&no, &ctx, &mut rng));
        assert!(evaluate(&either, &ctx, &mut rng));
        assert!(evaluate(&Condition::And(Vec::new()), &ctx, &mut rng));
        assert!(!evaluate(&Condition::Or(Vec::new()), &ctx, &mut rng));
    }
}
