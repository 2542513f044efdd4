use std::io::BufRead;
use std::time::Instant;

use crossbeam::channel::{self, Sender};
use tracing::{debug, info, warn};

use crate::commands::LabCommand;
use crate::config;
use crate::controller::LabController;
use crate::error::ConfigError;
use crate::explain::ExplanationClient;
use crate::host::{HostChannel, JsonLinesHost};
use crate::init_config::LabConfig;

pub mod event_loop;

/// Standalone binary entry: commands on stdin, host messages as JSON lines on stdout.
pub fn run() -> Result<(), ConfigError> {
    let lab_config = LabConfig::load_default()?;
    let settings = lab_config.controller_settings()?;
    let explainer = ExplanationClient::new(
        lab_config.explainer_config(std::env::var(config::API_KEY_ENV).ok()),
    );

    let (cmd_tx, cmd_rx) = channel::unbounded();
    let (reply_tx, reply_rx) = channel::unbounded();

    let host: Box<dyn HostChannel> = Box::new(JsonLinesHost::new(std::io::stdout()));
    let controller = LabController::new(settings, Some(host), explainer, reply_tx, Instant::now());

    spawn_stdin_reader(cmd_tx);
    info!("density lab running; type `status` or `quit`");
    event_loop::run_lab_loop(cmd_rx, reply_rx, controller);

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().log_and_clear();
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<LabCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("failed to read stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<LabCommand>() {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("ignoring `{}`: {}", line.trim(), e),
            }
        }
        debug!("stdin closed");
        let _ = tx.send(LabCommand::Shutdown);
    });
}
