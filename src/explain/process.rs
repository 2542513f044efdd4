use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use tracing::{debug, warn};

use super::fallback::{parse_observation, tutor_prompt};
use super::{ApiKey, Explainer, TutorObservation};
use crate::error::ExplainError;

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external tutor program per request.
///
/// The prompt goes to the child's stdin, the credential into its `API_KEY`
/// environment variable, and stdout must hold the JSON observation. A child
/// still running at the deadline is killed and reaped.
pub struct ProcessExplainer {
    program: String,
    args: Vec<String>,
    credential: ApiKey,
    timeout: Duration,
}

impl ProcessExplainer {
    pub fn new(
        command: &[String],
        credential: Option<ApiKey>,
        timeout: Duration,
    ) -> Result<Self, ExplainError> {
        let credential = credential.ok_or(ExplainError::MissingCredential)?;
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ExplainError::Malformed("empty tutor command".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            credential,
            timeout,
        })
    }

    fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .env(crate::config::API_KEY_ENV, self.credential.expose())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
    }
}

impl Explainer for ProcessExplainer {
    fn explain(&self, mass: f64, volume: f64) -> Result<TutorObservation, ExplainError> {
        debug!(program = %self.program, mass, volume, "running tutor command");
        let deadline = Instant::now() + self.timeout;
        let mut child = self.spawn()?;

        if let Some(stdin) = child.stdin.take() {
            if let Err(e) = send_prompt(stdin, &tutor_prompt(mass, volume)) {
                kill_and_reap(&mut child);
                return Err(e.into());
            }
        }

        // Drained on its own thread so a chatty child never blocks on a full pipe.
        let (out_tx, out_rx) = channel::bounded(1);
        if let Some(mut stdout) = child.stdout.take() {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = out_tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
            });
        }

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(program = %self.program, "tutor command timed out; killing it");
                kill_and_reap(&mut child);
                return Err(ExplainError::Timeout(self.timeout));
            }
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(e.into());
            }
        };
        if !status.success() {
            return Err(ExplainError::CommandFailed(status));
        }

        let stdout = match out_rx.recv_deadline(deadline) {
            Ok(read) => read?,
            Err(RecvTimeoutError::Timeout) => return Err(ExplainError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => return Err(ExplainError::Disconnected),
        };
        let text = String::from_utf8_lossy(&stdout);
        parse_observation(&text, mass, volume)
    }
}

/// A child that exits without reading its stdin is not an error; its stdout
/// still decides the answer.
fn send_prompt(mut stdin: impl Write, prompt: &str) -> io::Result<()> {
    match stdin.write_all(prompt.as_bytes()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// `Ok(None)` when the child is still running at `deadline`.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        std::thread::sleep(EXIT_POLL_INTERVAL.min(deadline - now));
    }
}

fn kill_and_reap(child: &mut Child) {
    // Already exited is fine; wait() still reaps it.
    let _ = child.kill();
    let _ = child.wait();
}
