// init_config.rs
// Loads optional runtime overrides from lab_config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::controller::{ControllerSettings, SimulationState};
use crate::error::ConfigError;
use crate::explain::{ApiKey, ExplainerConfig};
use crate::geometry::ParticleParams;
use crate::presets::Liquid;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabConfig {
    pub timing: TimingConfig,
    pub presets: PresetsConfig,
    pub defaults: DefaultsConfig,
    pub particles: ParticlesConfig,
    pub explainer: ExplainerSection,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub ready_delay_ms: u64,
    pub sync_debounce_ms: u64,
    pub explain_debounce_ms: u64,
    pub explain_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ready_delay_ms: config::READY_DELAY_MS,
            sync_debounce_ms: config::SYNC_DEBOUNCE_MS,
            explain_debounce_ms: config::EXPLAIN_DEBOUNCE_MS,
            explain_timeout_ms: config::EXPLAIN_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Volume fixed-density materials reset to, in cm³.
    pub reference_volume: f64,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            reference_volume: config::REFERENCE_VOLUME,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub mass: f64,
    pub volume: f64,
    /// Liquid preset name.
    pub liquid: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            mass: config::DEFAULT_MASS,
            volume: config::DEFAULT_VOLUME,
            liquid: config::DEFAULT_LIQUID.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ParticlesConfig {
    pub mass_per_particle: f64,
    pub cap: usize,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            mass_per_particle: config::MASS_PER_PARTICLE,
            cap: config::PARTICLE_CAP,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplainerSection {
    /// argv of the tutor program, e.g. `["tutor-cli", "--json"]`.
    pub command: Option<Vec<String>>,
    pub api_key: Option<String>,
}

impl LabConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LabConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `$DENSITY_LAB_CONFIG`, else `lab_config.toml` if present, else defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match std::env::var_os(config::CONFIG_PATH_ENV) {
            Some(path) => Self::load_from_file(PathBuf::from(path)),
            None if Path::new(config::DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(config::DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        for (name, ms) in [
            ("timing.ready_delay_ms", t.ready_delay_ms),
            ("timing.sync_debounce_ms", t.sync_debounce_ms),
            ("timing.explain_debounce_ms", t.explain_debounce_ms),
            ("timing.explain_timeout_ms", t.explain_timeout_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if !self.presets.reference_volume.is_finite() || self.presets.reference_volume <= 0.0 {
            return Err(ConfigError::Invalid(
                "presets.reference_volume must be a positive finite value".into(),
            ));
        }
        if !self.defaults.mass.is_finite() || !self.defaults.volume.is_finite() {
            return Err(ConfigError::Invalid("defaults must be finite".into()));
        }
        if !self.particles.mass_per_particle.is_finite() || self.particles.mass_per_particle <= 0.0 {
            return Err(ConfigError::Invalid(
                "particles.mass_per_particle must be positive".into(),
            ));
        }
        self.default_liquid()?;
        if matches!(&self.explainer.command, Some(argv) if argv.is_empty()) {
            return Err(ConfigError::Invalid("explainer.command must not be empty".into()));
        }
        Ok(())
    }

    pub fn default_liquid(&self) -> Result<Liquid, ConfigError> {
        Liquid::from_name(&self.defaults.liquid)
            .ok_or_else(|| ConfigError::Invalid(format!("Unknown liquid: {}", self.defaults.liquid)))
    }

    pub fn controller_settings(&self) -> Result<ControllerSettings, ConfigError> {
        let t = &self.timing;
        Ok(ControllerSettings {
            ready_delay: config::millis(t.ready_delay_ms),
            sync_debounce: config::millis(t.sync_debounce_ms),
            explain_debounce: config::millis(t.explain_debounce_ms),
            reference_volume: self.presets.reference_volume,
            particles: ParticleParams {
                mass_per_particle: self.particles.mass_per_particle,
                cap: self.particles.cap,
            },
            initial: SimulationState::new(
                self.defaults.mass,
                self.defaults.volume,
                self.default_liquid()?,
            ),
        })
    }

    /// A key in the file wins over `env_key`.
    pub fn explainer_config(&self, env_key: Option<String>) -> ExplainerConfig {
        let credential = self
            .explainer
            .api_key
            .clone()
            .and_then(ApiKey::new)
            .or_else(|| env_key.and_then(ApiKey::new));
        ExplainerConfig {
            command: self.explainer.command.clone(),
            credential,
            timeout: config::millis(self.timing.explain_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = LabConfig::from_toml("").unwrap();
        assert_eq!(cfg.timing.sync_debounce_ms, 150);
        assert_eq!(cfg.timing.explain_debounce_ms, 1500);
        assert_eq!(cfg.presets.reference_volume, 300.0);
        let settings = cfg.controller_settings().unwrap();
        assert_eq!(settings.initial, SimulationState::default());
    }

    #[test]
    fn partial_sections_override_only_given_keys() {
        let cfg = LabConfig::from_toml(
            r#"
            [timing]
            sync_debounce_ms = 100

            [defaults]
            liquid = "miel"
            mass = 5000

            [particles]
            mass_per_particle = 5
            cap = 100
            "#,
        )
        .unwrap();
        assert_eq!(cfg.timing.sync_debounce_ms, 100);
        assert_eq!(cfg.timing.ready_delay_ms, 150);
        let settings = cfg.controller_settings().unwrap();
        assert_eq!(settings.initial.liquid_density(), 1.4);
        assert_eq!(settings.initial.mass(), 1000.0);
        assert_eq!(settings.particles.cap, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            LabConfig::from_toml("[timing]\nsync_debounce_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LabConfig::from_toml("[defaults]\nliquid = \"Mercurio\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LabConfig::from_toml("[presets]\nreference_volume = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LabConfig::from_toml("[explainer]\ncommand = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LabConfig::from_toml("[timing"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn file_credential_beats_environment() {
        let cfg = LabConfig::from_toml("[explainer]\napi_key = \"from-file\"").unwrap();
        let ex = cfg.explainer_config(Some("from-env".into()));
        assert_eq!(ex.credential.unwrap().expose(), "from-file");

        let cfg = LabConfig::default();
        assert!(cfg.explainer_config(None).credential.is_none());
        assert_eq!(
            cfg.explainer_config(Some("from-env".into())).credential.unwrap().expose(),
            "from-env"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("density_lab_missing_config.toml");
        assert!(matches!(
            LabConfig::load_from_file(path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("density_lab_cfg_{}.toml", std::process::id()));
        fs::write(&path, "[presets]\nreference_volume = 400.0\n").unwrap();
        let cfg = LabConfig::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(cfg.presets.reference_volume, 400.0);
    }
}
