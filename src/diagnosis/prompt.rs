//! Prompt templates sent to the provider.
//!
//! Both prompts ask for bare JSON; the coercer still copes when the model
//! wraps it in prose or code fences.

use serde_json::Value;

use super::types::{DetailQuery, PetProfile};

const DIAGNOSIS_HEADER: &str = "You are an expert veterinary diagnostic AI. Provide a JSON response with ranked possible diagnoses for this pet, their likelihood (%), explanation, urgency (true/false), veterinary consultation advice, and home care suggestions based on this data:\n";

const DIAGNOSIS_TRAILER: &str = "\nReturn a valid JSON object with fields: conditions (list of {name, likelihood, explanation}), urgent (bool), consult (str), homecare (str). Focus on common conditions for the specified species and breed. Ensure the response is strictly JSON, with no additional text or code blocks.\n";

/// Build the diagnosis prompt: one `Key: value` line per attribute.
pub fn build_diagnosis_prompt(profile: &PetProfile) -> String {
    let mut prompt = String::from(DIAGNOSIS_HEADER);
    for (key, value) in profile.iter() {
        prompt.push_str(&capitalize(key));
        prompt.push_str(": ");
        prompt.push_str(&render_value(value));
        prompt.push('\n');
    }
    prompt.push_str(DIAGNOSIS_TRAILER);
    prompt
}

pub fn build_details_prompt(query: &DetailQuery) -> String {
    format!(
        r#"Provide a JSON object with detailed veterinary information about "{diagnosis}" in {species} (breed: {breed}) using general veterinary knowledge. Include these fields:
    - Overview (str)
    - Symptoms (list or str)
    - When to see a veterinarian (str)
    - Causes (str)
    - Risk factors (list or str)
    - Complications (str)
    - Prevention (str)
    - Treatment options (str)
    Focus on species-specific and breed-specific considerations where relevant.
    Return a valid JSON object, with no additional text or code blocks."#,
        diagnosis = query.diagnosis,
        species = query.species,
        breed = query.breed,
    )
}

/// First character uppercased, the rest lowercased.
fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
