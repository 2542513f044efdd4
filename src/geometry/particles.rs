use serde::Serialize;
use ultraviolet::Vec2;

use crate::config;

/// Decorative marker inside the object's silhouette. `pos` is in the unit square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleParams {
    /// Grams of mass represented by one marker.
    pub mass_per_particle: f64,
    pub cap: usize,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            mass_per_particle: config::MASS_PER_PARTICLE,
            cap: config::PARTICLE_CAP,
        }
    }
}

/// N = min(floor(mass / k), cap)
pub fn particle_count(mass: f64, params: &ParticleParams) -> usize {
    let n = (mass / params.mass_per_particle).floor().max(0.0) as usize;
    n.min(params.cap)
}

/// Reproducible scatter seeded by the mass value.
pub fn scatter(mass: f64, count: usize) -> Vec<Particle> {
    let mut rng = fastrand::Rng::with_seed(mass.to_bits());
    (0..count)
        .map(|_| Particle {
            pos: Vec2::new(rng.f32(), rng.f32()),
            radius: config::PARTICLE_MIN_RADIUS + rng.f32() * config::PARTICLE_RADIUS_SPREAD,
        })
        .collect()
}
