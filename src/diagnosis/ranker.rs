use serde_json::{Map, Value};

use super::types::{Condition, DiagnosisResult};

pub const NO_DIAGNOSIS: &str = "No diagnosis available";

/// Read the `conditions` array of a parsed reply.
///
/// Entries without a usable name or likelihood are skipped. Likelihoods may
/// arrive as numbers or numeric strings (`"70"`, `"70%"`) and are clamped to
/// `[0, 100]`.
pub fn extract_conditions(reply: &Map<String, Value>) -> Vec<Condition> {
    let Some(entries) = reply.get("conditions").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let condition = condition_from_value(entry);
            if condition.is_none() {
                tracing::warn!("Skipping malformed condition entry: {}", entry);
            }
            condition
        })
        .collect()
}

fn condition_from_value(entry: &Value) -> Option<Condition> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let likelihood = likelihood_from_value(entry.get("likelihood")?)?;
    let explanation = entry
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(Condition::new(name, likelihood, explanation))
}

fn likelihood_from_value(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    raw.is_finite().then(|| raw.clamp(0.0, 100.0))
}

/// Conditions ordered by likelihood, highest first. Ties keep input order.
pub fn rank(conditions: &[Condition]) -> Vec<&Condition> {
    let mut ranked: Vec<&Condition> = conditions.iter().collect();
    ranked.sort_by(|a, b| b.likelihood.total_cmp(&a.likelihood));
    ranked
}

/// Human-readable headline for a set of conditions.
pub fn summarize(conditions: &[Condition]) -> String {
    let ranked = rank(conditions);
    match ranked.as_slice() {
        [] => NO_DIAGNOSIS.to_string(),
        [top] | [top, _] => top.label(),
        _ => {
            let top_three: Vec<String> = ranked.iter().take(3).map(|c| c.label()).collect();
            format!("Top 3 possible diagnoses: {}", top_three.join(", "))
        }
    }
}

impl DiagnosisResult {
    /// Shape a parsed reply. Missing `urgent` reads as `false`, missing
    /// `consult`/`homecare` as empty text.
    pub fn from_reply(reply: &Map<String, Value>) -> Self {
        Self {
            conditions: extract_conditions(reply),
            urgent: reply.get("urgent").map(truthy).unwrap_or(false),
            consult: text_field(reply, "consult"),
            homecare: text_field(reply, "homecare"),
        }
    }

    pub fn summary(&self) -> String {
        summarize(&self.conditions)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    }
}

fn text_field(reply: &Map<String, Value>, key: &str) -> String {
    match reply.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
