use serde_json::Value;

use super::TutorObservation;
use crate::config;
use crate::density::{compute_buoyancy, compute_density};
use crate::error::ExplainError;

/// Local explanation built only from the water comparison. Never empty.
pub fn fallback_observation(mass: f64, volume: f64) -> TutorObservation {
    let density = compute_density(mass, volume);
    let water = config::WATER_DENSITY;
    let comparison = if density > water {
        "mayor"
    } else if density < water {
        "menor"
    } else {
        "igual"
    };
    let outcome = if density > water {
        "se hunde"
    } else {
        "se mantiene a flote"
    };
    TutorObservation {
        explanation: format!(
            "La densidad calculada es {:.2} g/cm³. Como es {} que la del agua ({:.1}), el objeto {}.",
            density, comparison, water, outcome
        ),
        scientific_fact: config::FALLBACK_FACT.to_string(),
        is_floating: compute_buoyancy(density, water),
    }
}

pub fn tutor_prompt(mass: f64, volume: f64) -> String {
    let density = compute_density(mass, volume);
    format!(
        "Como un profesor de física experto, analiza un objeto de {}g y {}cm³ (ρ={:.2} g/cm³).\n\
         Explica su comportamiento de flotación en agua (ρ=1) y danos un dato científico curioso.\n\
         Responde estrictamente en formato JSON con los campos: explanation, isFloating, scientificFact.",
        mass, volume, density
    )
}

/// Parse the tutor's JSON answer. Fields that are missing, blank or of the
/// wrong type are filled from the local fallback one by one.
pub fn parse_observation(text: &str, mass: f64, volume: f64) -> Result<TutorObservation, ExplainError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| ExplainError::Malformed(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ExplainError::Malformed("expected a JSON object".into()))?;

    let fallback = fallback_observation(mass, volume);
    let text_field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(TutorObservation {
        explanation: text_field("explanation").unwrap_or(fallback.explanation),
        scientific_fact: text_field("scientificFact").unwrap_or(fallback.scientific_fact),
        is_floating: obj
            .get("isFloating")
            .and_then(Value::as_bool)
            .unwrap_or(fallback.is_floating),
    })
}
