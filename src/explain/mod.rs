//! Tutor explanations for the current object.
//!
//! The text comes from an external generator behind the [`Explainer`] trait.
//! [`ExplanationClient`] runs it off the event-loop thread with a timeout and
//! always answers: any failure is logged and replaced by
//! [`fallback_observation`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config;
use crate::error::ExplainError;

pub mod fallback;
pub mod process;


pub use fallback::{fallback_observation, parse_observation, tutor_prompt};
pub use process::ProcessExplainer;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorObservation {
    pub explanation: String,
    pub scientific_fact: String,
    pub is_floating: bool,
}

pub trait Explainer: Send + Sync {
    fn explain(&self, mass: f64, volume: f64) -> Result<TutorObservation, ExplainError>;
}

/// Tutor service credential. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Blank keys count as "not configured".
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Clone, Debug)]
pub struct ExplainerConfig {
    /// argv of the external tutor program.
    pub command: Option<Vec<String>>,
    pub credential: Option<ApiKey>,
    pub timeout: Duration,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            command: None,
            credential: None,
            timeout: config::millis(config::EXPLAIN_TIMEOUT_MS),
        }
    }
}

/// Answer to one request, tagged with the sequence number it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplanationReply {
    pub seq: u64,
    pub mass: f64,
    pub volume: f64,
    pub observation: TutorObservation,
}

enum Backend {
    Offline,
    Service(Arc<dyn Explainer>),
}

pub struct ExplanationClient {
    backend: Backend,
    timeout: Duration,
}

impl ExplanationClient {
    pub fn new(config: ExplainerConfig) -> Self {
        let backend = match &config.command {
            None => {
                info!("no tutor command configured; using local explanations");
                Backend::Offline
            }
            Some(command) => match ProcessExplainer::new(
                command,
                config.credential.clone(),
                config.timeout,
            ) {
                Ok(explainer) => Backend::Service(Arc::new(explainer)),
                Err(e) => {
                    info!("tutor offline ({}); using local explanations", e);
                    Backend::Offline
                }
            },
        };
        Self {
            backend,
            timeout: config.timeout,
        }
    }

    pub fn offline() -> Self {
        Self {
            backend: Backend::Offline,
            timeout: config::millis(config::EXPLAIN_TIMEOUT_MS),
        }
    }

    pub fn with_explainer(explainer: Arc<dyn Explainer>, timeout: Duration) -> Self {
        Self {
            backend: Backend::Service(explainer),
            timeout,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.backend, Backend::Offline)
    }

    /// Issue a request. The reply is always delivered on `reply_tx`, either
    /// from a worker thread or, when offline, before this returns.
    pub fn request(&self, seq: u64, mass: f64, volume: f64, reply_tx: Sender<ExplanationReply>) {
        let explainer = match &self.backend {
            Backend::Offline => {
                let _ = reply_tx.send(ExplanationReply {
                    seq,
                    mass,
                    volume,
                    observation: fallback_observation(mass, volume),
                });
                return;
            }
            Backend::Service(explainer) => Arc::clone(explainer),
        };
        let timeout = self.timeout;
        debug!(seq, mass, volume, "requesting tutor explanation");

        std::thread::spawn(move || {
            let observation = match explain_with_timeout(explainer, mass, volume, timeout) {
                Ok(observation) => observation,
                Err(e) => {
                    warn!(seq, "tutor explanation failed: {}", e);
                    fallback_observation(mass, volume)
                }
            };
            // The loop may have shut down meanwhile.
            let _ = reply_tx.send(ExplanationReply {
                seq,
                mass,
                volume,
                observation,
            });
        });
    }
}

/// Upper bound for any [`Explainer`]. [`ProcessExplainer`] also enforces the
/// same deadline itself, so a timed-out tutor program does not outlive it.
fn explain_with_timeout(
    explainer: Arc<dyn Explainer>,
    mass: f64,
    volume: f64,
    timeout: Duration,
) -> Result<TutorObservation, ExplainError> {
    let (tx, rx) = channel::bounded(1);
    std::thread::spawn(move || {
        let _ = tx.send(explainer.explain(mass, volume));
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ExplainError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(ExplainError::Disconnected),
    }
}
