//! Maps the numeric state onto the scene drawn by the visualizer.
//!
//! Coordinates follow the SVG scene (800 x 600, y grows downward). The
//! liquid surface sits at [`config::WATER_LEVEL`] and sunk objects rest on
//! [`config::FLOOR_LEVEL`].

use std::sync::Arc;

use palette::{Srgb, Srgba, WithAlpha};
use parking_lot::Mutex;
use ultraviolet::Vec2;

use crate::config;
use crate::density::BuoyancyResult;
use crate::presets::Liquid;
use crate::profile_scope;

pub mod particles;

#[cfg(test)]
mod tests;

pub use particles::{Particle, ParticleParams};

const FLOAT_OUTLINE: Srgb<u8> = Srgb::new(0x34, 0xd3, 0x99);
const SINK_OUTLINE: Srgb<u8> = Srgb::new(0xf4, 0x3f, 0x5e);
pub const LIQUID_FILL_ALPHA: f32 = 0.2;

/// Side length of the square drawn for `volume`.
pub fn size_for(volume: f64) -> f32 {
    (volume as f32).powf(config::SIZE_EXPONENT) * config::SIZE_SCALE + config::SIZE_OFFSET
}

/// Immersed fraction drawn for a floating object, never below the display floor.
pub fn immersed_ratio(buoyancy: &BuoyancyResult) -> f32 {
    (buoyancy.immersed_ratio() as f32).clamp(config::MIN_IMMERSED_RATIO, 1.0)
}

/// Top edge of the object.
pub fn y_position(size: f32, buoyancy: &BuoyancyResult) -> f32 {
    if buoyancy.is_floating {
        let immersed = size * immersed_ratio(buoyancy);
        config::WATER_LEVEL - (size - immersed)
    } else {
        config::FLOOR_LEVEL - size
    }
}

pub fn outline_color(buoyancy: &BuoyancyResult) -> Srgb<u8> {
    if buoyancy.is_floating {
        FLOAT_OUTLINE
    } else {
        SINK_OUTLINE
    }
}

/// Translucent fill for the liquid body. Off-catalog densities take the
/// closest-looking catalog color.
pub fn liquid_fill(liquid_density: f64) -> Srgba<f32> {
    let liquid = Liquid::for_density(liquid_density).unwrap_or(if liquid_density < 1.0 {
        Liquid::Aceite
    } else if liquid_density > 1.0 {
        Liquid::Miel
    } else {
        Liquid::Agua
    });
    liquid
        .color()
        .into_format::<f32>()
        .with_alpha(LIQUID_FILL_ALPHA)
}

#[derive(Clone, Debug)]
pub struct RenderGeometry {
    pub size: f32,
    pub y_position: f32,
    /// Top-left corner of the object in scene coordinates.
    pub origin: Vec2,
    /// `Some` while floating.
    pub immersed_ratio: Option<f32>,
    pub outline: Srgb<u8>,
    pub particles: Arc<[Particle]>,
}

impl RenderGeometry {
    /// Particle centers in object-local coordinates.
    pub fn particle_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(move |p| p.pos * self.size)
    }
}

/// Derives [`RenderGeometry`] and keeps the last particle layout around,
/// keyed by mass, so repeated renders of the same mass share one scatter.
pub struct GeometryMapper {
    params: ParticleParams,
    memo: Mutex<Option<(u64, Arc<[Particle]>)>>,
}

impl GeometryMapper {
    pub fn new(params: ParticleParams) -> Self {
        Self {
            params,
            memo: Mutex::new(None),
        }
    }

    pub fn particles_for(&self, mass: f64) -> Arc<[Particle]> {
        let key = mass.to_bits();
        let mut memo = self.memo.lock();
        if let Some((k, layout)) = memo.as_ref() {
            if *k == key {
                return Arc::clone(layout);
            }
        }
        let count = particles::particle_count(mass, &self.params);
        let layout: Arc<[Particle]> = particles::scatter(mass, count).into();
        *memo = Some((key, Arc::clone(&layout)));
        layout
    }

    pub fn map(&self, mass: f64, volume: f64, buoyancy: &BuoyancyResult) -> RenderGeometry {
        profile_scope!("derive_geometry");
        let size = size_for(volume);
        let y = y_position(size, buoyancy);
        RenderGeometry {
            size,
            y_position: y,
            origin: Vec2::new(config::SCENE_CENTER_X - size / 2.0, y),
            immersed_ratio: buoyancy.is_floating.then(|| immersed_ratio(buoyancy)),
            outline: outline_color(buoyancy),
            particles: self.particles_for(mass),
        }
    }
}

impl Default for GeometryMapper {
    fn default() -> Self {
        Self::new(ParticleParams::default())
    }
}
