//! "Make it float in honey but sink in oil."

use serde::Serialize;

use crate::density::compute_buoyancy;
use crate::presets::Liquid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeStatus {
    Solved,
    /// Too dense: sinks in honey as well.
    SinksInHoney,
    /// Too light: floats in oil as well.
    FloatsInOil,
}

pub fn evaluate(density: f64) -> ChallengeStatus {
    if !compute_buoyancy(density, Liquid::Miel.density()) {
        ChallengeStatus::SinksInHoney
    } else if compute_buoyancy(density, Liquid::Aceite.density()) {
        ChallengeStatus::FloatsInOil
    } else {
        ChallengeStatus::Solved
    }
}

impl ChallengeStatus {
    pub fn hint(&self) -> &'static str {
        match self {
            ChallengeStatus::Solved => "¡Reto superado! Flota en Miel y se hunde en Aceite.",
            ChallengeStatus::SinksInHoney => "Demasiado denso: también se hunde en Miel.",
            ChallengeStatus::FloatsInOil => "Demasiado ligero: también flota en Aceite.",
        }
    }
}
