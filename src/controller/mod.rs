//! State & sync controller.
//!
//! Owns the lab state, derives what the visualizer draws, and keeps the host
//! informed through a debounced snapshot push. All methods take the current
//! `Instant`; the event loop calls [`LabController::tick`] whenever
//! [`LabController::next_deadline`] comes due.

use std::time::{Duration, Instant};

use crossbeam::channel::Sender;
use palette::Srgba;
use tracing::{debug, info, trace, warn};

use crate::challenge::{self, ChallengeStatus};
use crate::config;
use crate::debounce::Debouncer;
use crate::density::BuoyancyResult;
use crate::explain::{ExplanationClient, ExplanationReply, TutorObservation};
use crate::geometry::{self, GeometryMapper, ParticleParams, RenderGeometry};
use crate::host::HostChannel;
use crate::presets::{Liquid, Material};
use crate::profile_scope;

pub mod state;


pub use state::{OutboundSnapshot, SimulationState};

#[derive(Clone, Debug)]
pub struct ControllerSettings {
    pub ready_delay: Duration,
    pub sync_debounce: Duration,
    pub explain_debounce: Duration,
    pub reference_volume: f64,
    pub particles: ParticleParams,
    pub initial: SimulationState,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            ready_delay: config::millis(config::READY_DELAY_MS),
            sync_debounce: config::millis(config::SYNC_DEBOUNCE_MS),
            explain_debounce: config::millis(config::EXPLAIN_DEBOUNCE_MS),
            reference_volume: config::REFERENCE_VOLUME,
            particles: ParticleParams::default(),
            initial: SimulationState::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

/// Everything the visualizer needs for one render pass.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    pub buoyancy: BuoyancyResult,
    pub geometry: RenderGeometry,
    pub material: Material,
    pub liquid: Option<Liquid>,
    pub liquid_fill: Srgba<f32>,
    pub tutor_text: String,
    pub tutor_fact: Option<String>,
    pub challenge: ChallengeStatus,
}

pub struct LabController {
    state: SimulationState,
    reference_volume: f64,
    geometry: GeometryMapper,
    host: Option<Box<dyn HostChannel>>,
    explainer: ExplanationClient,
    reply_tx: Sender<ExplanationReply>,
    lifecycle: Lifecycle,
    ready_timer: Debouncer,
    sync_timer: Debouncer,
    explain_timer: Debouncer,
    last_seq: u64,
    observation: Option<TutorObservation>,
}

impl LabController {
    /// `host` is `None` in standalone mode. Replies to explanation requests
    /// are delivered on `reply_tx` and must be fed back via [`Self::apply_reply`].
    pub fn new(
        settings: ControllerSettings,
        host: Option<Box<dyn HostChannel>>,
        explainer: ExplanationClient,
        reply_tx: Sender<ExplanationReply>,
        now: Instant,
    ) -> Self {
        if host.is_none() {
            info!("no host channel; running standalone");
        }
        let mut ready_timer = Debouncer::new(settings.ready_delay);
        ready_timer.schedule(now);
        // first explanation once the widget has settled
        let mut explain_timer = Debouncer::new(settings.explain_debounce);
        explain_timer.schedule(now);

        Self {
            state: settings.initial,
            reference_volume: settings.reference_volume,
            geometry: GeometryMapper::new(settings.particles),
            host,
            explainer,
            reply_tx,
            lifecycle: Lifecycle::Uninitialized,
            ready_timer,
            sync_timer: Debouncer::new(settings.sync_debounce),
            explain_timer,
            last_seq: 0,
            observation: None,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_standalone(&self) -> bool {
        self.host.is_none()
    }

    pub fn observation(&self) -> Option<&TutorObservation> {
        self.observation.as_ref()
    }

    pub fn buoyancy(&self) -> BuoyancyResult {
        self.state.buoyancy()
    }

    pub fn geometry(&self) -> RenderGeometry {
        self.geometry
            .map(self.state.mass, self.state.volume, &self.state.buoyancy())
    }

    pub fn frame(&self) -> RenderFrame {
        let buoyancy = self.buoyancy();
        RenderFrame {
            buoyancy,
            geometry: self.geometry(),
            material: self.state.material,
            liquid: self.state.liquid(),
            liquid_fill: geometry::liquid_fill(self.state.liquid_density),
            tutor_text: self
                .observation
                .as_ref()
                .map(|o| o.explanation.clone())
                .unwrap_or_else(|| config::TUTOR_PLACEHOLDER.to_string()),
            tutor_fact: self.observation.as_ref().map(|o| o.scientific_fact.clone()),
            challenge: challenge::evaluate(buoyancy.density),
        }
    }

    // ====================
    // Inputs
    // ====================

    pub fn set_mass(&mut self, mass: f64, now: Instant) {
        let Some(mass) = finite("mass", mass) else { return };
        let clamped = state::clamp_mass(mass);
        if clamped != mass {
            trace!(requested = mass, clamped, "mass clamped");
        }
        if clamped != self.state.mass {
            self.state.mass = clamped;
            self.inputs_changed(now, true);
        }
    }

    pub fn set_volume(&mut self, volume: f64, now: Instant) {
        let Some(volume) = finite("volume", volume) else { return };
        let clamped = state::clamp_volume(volume);
        if clamped != volume {
            trace!(requested = volume, clamped, "volume clamped");
        }
        if clamped != self.state.volume {
            self.state.volume = clamped;
            self.inputs_changed(now, true);
        }
    }

    pub fn set_liquid_density(&mut self, liquid_density: f64, now: Instant) {
        let Some(liquid_density) = finite("liquid density", liquid_density) else { return };
        let clamped = state::clamp_liquid_density(liquid_density);
        if clamped != liquid_density {
            trace!(requested = liquid_density, clamped, "liquid density clamped");
        }
        if clamped != self.state.liquid_density {
            self.state.liquid_density = clamped;
            // the tutor only looks at mass and volume
            self.inputs_changed(now, false);
        }
    }

    pub fn select_liquid(&mut self, liquid: Liquid, now: Instant) {
        debug!(%liquid, "liquid selected");
        self.set_liquid_density(liquid.density(), now);
    }

    /// Fixed-density presets reset the object to the reference volume. The
    /// derived mass is not clamped to the slider range.
    pub fn select_material(&mut self, material: Material, now: Instant) {
        debug!(%material, "material selected");
        self.state.material = material;
        let Some((mass, volume)) = material.derive_mass_volume(self.reference_volume) else {
            return;
        };
        if mass != self.state.mass || volume != self.state.volume {
            self.state.mass = mass;
            self.state.volume = volume;
            self.inputs_changed(now, true);
        }
    }

    fn inputs_changed(&mut self, now: Instant, explain: bool) {
        let b = self.state.buoyancy();
        debug!(
            mass = self.state.mass,
            volume = self.state.volume,
            liquid_density = self.state.liquid_density,
            density = b.density,
            floating = b.is_floating,
            "state changed"
        );
        // Before readiness the initial push carries whatever state is current.
        if self.lifecycle == Lifecycle::Ready {
            self.sync_timer.schedule(now);
        }
        if explain {
            self.explain_timer.schedule(now);
        }
    }

    // ====================
    // Timers
    // ====================

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.ready_timer.deadline(),
            self.sync_timer.deadline(),
            self.explain_timer.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn tick(&mut self, now: Instant) {
        if self.lifecycle == Lifecycle::Uninitialized && self.ready_timer.fire_if_due(now) {
            self.become_ready();
        }
        if self.sync_timer.fire_if_due(now) {
            self.push_snapshot();
        }
        if self.explain_timer.fire_if_due(now) {
            self.request_explanation();
        }
    }

    fn become_ready(&mut self) {
        self.lifecycle = Lifecycle::Ready;
        info!("lab ready");
        if let Some(host) = self.host.as_mut() {
            if let Err(e) = host.signal_ready() {
                warn!("failed to signal readiness: {}", e);
            }
        }
        self.sync_timer.cancel();
        self.push_snapshot();
    }

    fn push_snapshot(&mut self) {
        profile_scope!("snapshot_push");
        let Some(host) = self.host.as_mut() else { return };
        let snapshot = self.state.snapshot();
        debug!(?snapshot, "pushing snapshot");
        if let Err(e) = host.push_snapshot(&snapshot) {
            warn!("failed to push snapshot: {}", e);
        }
    }

    fn request_explanation(&mut self) {
        self.last_seq += 1;
        self.explainer.request(
            self.last_seq,
            self.state.mass,
            self.state.volume,
            self.reply_tx.clone(),
        );
    }

    /// Apply a tutor reply. Replies to anything but the latest request are
    /// dropped. Returns whether the displayed observation changed.
    pub fn apply_reply(&mut self, reply: ExplanationReply) -> bool {
        if reply.seq != self.last_seq {
            debug!(seq = reply.seq, latest = self.last_seq, "dropping stale explanation");
            return false;
        }
        self.observation = Some(reply.observation);
        true
    }

    /// Cancel pending timers. Nothing is pushed after this.
    pub fn shutdown(&mut self) {
        self.ready_timer.cancel();
        self.sync_timer.cancel();
        self.explain_timer.cancel();
        info!("lab shut down");
    }
}

fn finite(what: &str, value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        warn!("ignoring non-finite {}: {}", what, value);
        None
    }
}
