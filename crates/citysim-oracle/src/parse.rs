//! Model output parsing.
//!
//! Models wrap JSON in prose or code fences, leave trailing commas, write
//! `12.0` where an integer belongs and invent skill names. Everything here
//! recovers what it can and leaves validation of the numbers to the
//! engine, which clamps whatever it receives.

use serde_json::{Map, Value};
use tracing::warn;

use citysim_types::{Effect, Judgment, RuleDraft, Skill, ToolCall, WorldChange};

use crate::error::LlmError;

/// Integer fields of a judgment.
const JUDGMENT_INTEGERS: [&str; 4] = ["money_delta", "energy_delta", "satiety_delta", "happiness_delta"];

/// Integer fields of a world change.
const WORLD_CHANGE_INTEGERS: [&str; 2] = ["cost_money", "cost_energy"];

/// Location values models use to mean "everywhere".
const GLOBAL_LOCATIONS: [&str; 4] = ["", "null", "none", "global"];

/// Recover a JSON value from raw model output.
///
/// Tried in order: the text as is, the contents of a markdown code block,
/// and the outermost `{...}` or `[...]` span, each also with trailing
/// commas stripped.
pub fn extract_json(raw: &str) -> Result<Value, LlmError> {
    let trimmed = raw.trim();
    let candidates = [
        Some(trimmed),
        extract_json_from_codeblock(trimmed),
        outermost_span(trimmed),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str(candidate) {
            return Ok(value);
        }
        if let Ok(value) = serde_json::from_str(&strip_trailing_commas(candidate)) {
            return Ok(value);
        }
    }
    Err(LlmError::Parse(format!("no JSON found in: {trimmed}")))
}

/// Parse a plan resolution into a [`ToolCall`].
///
/// Accepts `{"tool": ..., "args": ...}` as well as the function-call shape
/// `{"name": ..., "arguments": ...}`. A missing description becomes
/// `plan`.
pub fn parse_tool_call(raw: &str, plan: &str) -> Result<ToolCall, LlmError> {
    let mut value = extract_json(raw)?;
    let obj = as_object(&mut value, "tool call")?;

    if !obj.contains_key("tool")
        && let Some(name) = obj.remove("name").or_else(|| obj.remove("function"))
    {
        obj.insert(String::from("tool"), name);
    }
    if let Some(arguments) = obj.remove("arguments") {
        let arguments = match arguments {
            Value::String(s) => serde_json::from_str(&s)?,
            other => other,
        };
        obj.entry("args").or_insert(arguments);
    }
    if let Some(tool) = obj.get_mut("tool")
        && let Some(name) = tool.as_str()
    {
        *tool = Value::String(name.trim().to_lowercase());
    }
    if obj.get("desc").and_then(Value::as_str).is_none_or(str::is_empty) {
        obj.insert(String::from("desc"), Value::String(plan.to_owned()));
    }
    if let Some(args) = obj.get_mut("args").and_then(Value::as_object_mut) {
        round_fields(args, &["amount"]);
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse an action judgment.
///
/// Unknown skills and unparseable world changes are dropped rather than
/// failing the whole judgment.
pub fn parse_judgment(raw: &str) -> Result<Judgment, LlmError> {
    let mut value = extract_json(raw)?;
    let obj = as_object(&mut value, "judgment")?;

    round_fields(obj, &JUDGMENT_INTEGERS);

    if let Some(skill) = obj.get_mut("skill_up") {
        *skill = match skill.as_str().and_then(Skill::parse) {
            Some(s) => serde_json::to_value(s)?,
            None => Value::Null,
        };
    }

    if let Some(change) = obj.get_mut("world_change") {
        if let Some(fields) = change.as_object_mut() {
            round_fields(fields, &WORLD_CHANGE_INTEGERS);
        }
        if !change.is_null() && serde_json::from_value::<WorldChange>(change.clone()).is_err() {
            warn!(world_change = %change, "dropping unparseable world change");
            *change = Value::Null;
        }
    }

    if let Some(Value::Array(effects)) = obj.get_mut("social_effects") {
        for effect in effects.iter_mut().filter_map(Value::as_object_mut) {
            round_fields(effect, &["warmth_delta"]);
        }
    }

    if let Some(Value::String(side)) = obj.get("side_effects") {
        let wrapped = Value::Array(vec![Value::String(side.clone())]);
        obj.insert(String::from("side_effects"), wrapped);
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse rule proposals.
///
/// Accepts an array, an object with a `rules` array, or a single rule
/// object. The flat trigger form `"trigger": "on_time", "trigger_hour": 20`
/// is accepted. Proposals and effects that do not parse are skipped.
pub fn parse_rule_drafts(raw: &str) -> Result<Vec<RuleDraft>, LlmError> {
    let items = match extract_json(raw)? {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("rules") {
            Some(Value::Array(items)) => items,
            Some(_) => Vec::new(),
            None if obj.is_empty() => Vec::new(),
            None => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter_map(|mut item| {
            if let Some(obj) = item.as_object_mut() {
                normalize_rule(obj);
            }
            match serde_json::from_value::<RuleDraft>(item) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    warn!(error = %e, "skipping unparseable rule proposal");
                    None
                }
            }
        })
        .collect())
}

fn normalize_rule(obj: &mut Map<String, Value>) {
    let hour = obj.remove("trigger_hour");
    if let Some(trigger) = obj.get_mut("trigger")
        && trigger.as_str() == Some("on_time")
    {
        let mut hour = hour.unwrap_or_else(|| Value::from(0));
        round_in_place(&mut hour);
        *trigger = serde_json::json!({"on_time": {"hour": hour}});
    }

    if let Some(location) = obj.get_mut("location")
        && location
            .as_str()
            .is_some_and(|l| GLOBAL_LOCATIONS.contains(&l.trim().to_lowercase().as_str()))
    {
        *location = Value::Null;
    }

    if let Some(Value::Array(effects)) = obj.get_mut("effects") {
        for effect in effects.iter_mut().filter_map(Value::as_object_mut) {
            round_fields(effect, &["cost_money", "amount"]);
            if effect.get("type").and_then(Value::as_str) == Some("modify_bot_attr") {
                round_fields(effect, &["delta"]);
            }
        }
        effects.retain(|effect| serde_json::from_value::<Effect>(effect.clone()).is_ok());
    }
}

fn as_object<'a>(value: &'a mut Value, what: &str) -> Result<&'a mut Map<String, Value>, LlmError> {
    value
        .as_object_mut()
        .ok_or_else(|| LlmError::Parse(format!("expected a JSON object for the {what}")))
}

fn round_fields(obj: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(v) = obj.get_mut(*key) {
            round_in_place(v);
        }
    }
}

/// Turn `12.0`, `11.6` or `"12"` into the integer `12`.
fn round_in_place(v: &mut Value) {
    if v.is_i64() || v.is_u64() {
        return;
    }
    let float = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    if let Some(rounded) = float.and_then(|f| format!("{f:.0}").parse::<i64>().ok()) {
        *v = Value::from(rounded);
    }
}

/// Extract the contents of the first markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let fence = text.find("```")?;
    let after_fence = text.get(fence.checked_add(3)?..)?;
    let body_start = after_fence.find('\n').and_then(|nl| nl.checked_add(1))?;
    let body = after_fence.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// The text from the first opening bracket to the last matching closer.
fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text.get(start..)?.starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Strip trailing commas before closing braces and brackets.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == ',' {
            let next = i
                .checked_add(1)
                .and_then(|after| text.get(after..))
                .and_then(|rest| rest.trim_start().chars().next());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }
    result
}
