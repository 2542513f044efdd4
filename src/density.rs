//! Density and single-axis buoyancy.
//!
//! Everything here is a total function over the input domain: volume never
//! drops below [`crate::config::VOLUME_RANGE`]'s lower bound, so the division is
//! always finite.

use serde::Serialize;

/// ρ = m / V in g/cm³.
pub fn compute_density(mass: f64, volume: f64) -> f64 {
    mass / volume
}

/// Ties float.
pub fn compute_buoyancy(density: f64, liquid_density: f64) -> bool {
    density <= liquid_density
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuoyancyResult {
    pub density: f64,
    pub liquid_density: f64,
    pub is_floating: bool,
}

impl BuoyancyResult {
    /// Fraction of the object's height below the surface, before any display clamp.
    pub fn immersed_ratio(&self) -> f64 {
        self.density / self.liquid_density
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_floating {
            "FLOTACIÓN POSITIVA"
        } else {
            "FLOTACIÓN NEGATIVA"
        }
    }
}

pub fn evaluate(mass: f64, volume: f64, liquid_density: f64) -> BuoyancyResult {
    let density = compute_density(mass, volume);
    BuoyancyResult {
        density,
        liquid_density,
        is_floating: compute_buoyancy(density, liquid_density),
    }
}

/// Round to a fixed number of decimals, as the host snapshot does.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_is_mass_over_volume() {
        for mass in [1.0, 17.0, 150.0, 999.0, 1000.0] {
            for volume in [10.0, 33.0, 300.0, 1000.0] {
                let d = compute_density(mass, volume);
                assert!((d - mass / volume).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn equal_density_floats() {
        assert!(compute_buoyancy(1.0, 1.0));
        assert!(compute_buoyancy(0.99, 1.0));
        assert!(!compute_buoyancy(1.01, 1.0));
    }

    #[test]
    fn half_density_object_floats_in_water() {
        let r = evaluate(150.0, 300.0, 1.0);
        assert_eq!(r.density, 0.5);
        assert!(r.is_floating);
        assert_eq!(r.status_label(), "FLOTACIÓN POSITIVA");
        assert_eq!(r.immersed_ratio(), 0.5);
    }

    #[test]
    fn rounding_keeps_four_decimals() {
        assert_eq!(round_to(1.0 / 3.0, 4), 0.3333);
        assert_eq!(round_to(2.0 / 3.0, 4), 0.6667);
    }
}
