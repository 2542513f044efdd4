use serde::Serialize;

use crate::config;
use crate::density::{self, BuoyancyResult};
use crate::presets::{Liquid, Material};

/// Canonical inputs of the lab. Density is never stored; it is derived from
/// mass and volume on every read.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub(crate) mass: f64,
    pub(crate) volume: f64,
    pub(crate) liquid_density: f64,
    pub(crate) material: Material,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            mass: config::DEFAULT_MASS,
            volume: config::DEFAULT_VOLUME,
            liquid_density: Liquid::Agua.density(),
            material: Material::Manual,
        }
    }
}

impl SimulationState {
    /// Start state with inputs clamped into their domains.
    pub fn new(mass: f64, volume: f64, liquid: Liquid) -> Self {
        Self {
            mass: clamp_mass(mass),
            volume: clamp_volume(volume),
            liquid_density: liquid.density(),
            material: Material::Manual,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn liquid_density(&self) -> f64 {
        self.liquid_density
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Catalog liquid currently selected, if the density matches one.
    pub fn liquid(&self) -> Option<Liquid> {
        Liquid::for_density(self.liquid_density)
    }

    pub fn density(&self) -> f64 {
        density::compute_density(self.mass, self.volume)
    }

    pub fn buoyancy(&self) -> BuoyancyResult {
        density::evaluate(self.mass, self.volume, self.liquid_density)
    }

    pub fn snapshot(&self) -> OutboundSnapshot {
        let buoyancy = self.buoyancy();
        OutboundSnapshot {
            mass: self.mass,
            volume: self.volume,
            density: density::round_to(buoyancy.density, 4),
            liquid_density: self.liquid_density,
            is_floating: buoyancy.is_floating,
        }
    }
}

/// Value reported to the host. Built fresh for every push.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundSnapshot {
    pub mass: f64,
    pub volume: f64,
    pub density: f64,
    pub liquid_density: f64,
    pub is_floating: bool,
}

pub fn clamp_mass(mass: f64) -> f64 {
    mass.clamp(*config::MASS_RANGE.start(), *config::MASS_RANGE.end())
}

pub fn clamp_volume(volume: f64) -> f64 {
    volume.clamp(*config::VOLUME_RANGE.start(), *config::VOLUME_RANGE.end())
}

pub fn clamp_liquid_density(liquid_density: f64) -> f64 {
    let (lo, hi) = crate::presets::liquid_density_range();
    liquid_density.clamp(lo, hi)
}
