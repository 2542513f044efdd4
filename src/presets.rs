use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// Material catalog shown as the preset strip. `Manual` leaves mass and
/// volume under direct control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Material {
    #[default]
    Manual,
    Madera,
    Hielo,
    Acero,
    Oro,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Manual,
        Material::Madera,
        Material::Hielo,
        Material::Acero,
        Material::Oro,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Material::Manual => "Manual",
            Material::Madera => "Madera",
            Material::Hielo => "Hielo",
            Material::Acero => "Acero",
            Material::Oro => "Oro",
        }
    }

    /// Fixed density in g/cm³, `None` for manual mode.
    pub fn density(&self) -> Option<f64> {
        match self {
            Material::Manual => None,
            Material::Madera => Some(0.7),
            Material::Hielo => Some(0.92),
            Material::Acero => Some(7.8),
            Material::Oro => Some(19.3),
        }
    }

    pub fn color(&self) -> Srgb<u8> {
        match self {
            Material::Manual => Srgb::new(0xf1, 0xf5, 0xf9),
            Material::Madera => Srgb::new(0xb4, 0x53, 0x09),
            Material::Hielo => Srgb::new(0xdb, 0xea, 0xfe),
            Material::Acero => Srgb::new(0x64, 0x74, 0x8b),
            Material::Oro => Srgb::new(0xfb, 0xbf, 0x24),
        }
    }

    /// Mass and volume a fixed-density preset resets the object to.
    pub fn derive_mass_volume(&self, reference_volume: f64) -> Option<(f64, f64)> {
        self.density()
            .map(|d| ((reference_volume * d).round(), reference_volume))
    }

    pub fn from_name(name: &str) -> Option<Material> {
        Material::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Liquid {
    Aceite,
    Agua,
    Miel,
}

impl Default for Liquid {
    fn default() -> Self {
        Liquid::Agua
    }
}

impl Liquid {
    pub const ALL: [Liquid; 3] = [Liquid::Aceite, Liquid::Agua, Liquid::Miel];

    pub fn name(&self) -> &'static str {
        match self {
            Liquid::Aceite => "Aceite",
            Liquid::Agua => "Agua",
            Liquid::Miel => "Miel",
        }
    }

    pub fn density(&self) -> f64 {
        match self {
            Liquid::Aceite => 0.8,
            Liquid::Agua => 1.0,
            Liquid::Miel => 1.4,
        }
    }

    pub fn color(&self) -> Srgb<u8> {
        match self {
            Liquid::Aceite => Srgb::new(0xf5, 0x9e, 0x0b),
            Liquid::Agua => Srgb::new(0x3b, 0x82, 0xf6),
            Liquid::Miel => Srgb::new(0xea, 0x58, 0x0c),
        }
    }

    pub fn from_name(name: &str) -> Option<Liquid> {
        Liquid::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Catalog entry whose density matches exactly, used for highlighting.
    pub fn for_density(density: f64) -> Option<Liquid> {
        Liquid::ALL.into_iter().find(|l| l.density() == density)
    }
}

impl fmt::Display for Liquid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lowest and highest liquid density in the catalog.
pub fn liquid_density_range() -> (f64, f64) {
    Liquid::ALL.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), l| {
        (lo.min(l.density()), hi.max(l.density()))
    })
}

pub fn hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REFERENCE_VOLUME;

    #[test]
    fn manual_has_no_fixed_density() {
        assert_eq!(Material::Manual.density(), None);
        assert_eq!(Material::Manual.derive_mass_volume(REFERENCE_VOLUME), None);
        assert_eq!(Material::default(), Material::Manual);
    }

    #[test]
    fn preset_density_survives_rounding() {
        for m in Material::ALL {
            if let Some((mass, volume)) = m.derive_mass_volume(REFERENCE_VOLUME) {
                let d = m.density().unwrap();
                assert_eq!(volume, REFERENCE_VOLUME);
                assert!((mass / volume - d).abs() < 0.005, "{} drifted", m);
            }
        }
    }

    #[test]
    fn steel_is_2340_grams() {
        assert_eq!(
            Material::Acero.derive_mass_volume(300.0),
            Some((2340.0, 300.0))
        );
    }

    #[test]
    fn lookups_are_case_insensitive() {
        assert_eq!(Material::from_name("acero"), Some(Material::Acero));
        assert_eq!(Liquid::from_name(" MIEL "), Some(Liquid::Miel));
        assert_eq!(Liquid::from_name("mercurio"), None);
        assert_eq!(Liquid::for_density(0.8), Some(Liquid::Aceite));
        assert_eq!(Liquid::for_density(0.9), None);
    }

    #[test]
    fn liquid_range_spans_catalog() {
        assert_eq!(liquid_density_range(), (0.8, 1.4));
    }

    #[test]
    fn hex_formats_tags() {
        assert_eq!(hex(Liquid::Agua.color()), "#3b82f6");
    }
}
