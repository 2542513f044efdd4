use std::time::Instant;

use crossbeam::channel::{self, Receiver};
use tracing::debug;

use crate::commands::{process_command, LabCommand};
use crate::controller::LabController;
use crate::explain::ExplanationReply;
use crate::profile_scope;

/// Drive the controller until a `Shutdown` command arrives or the command
/// channel closes. Blocks on commands, tutor replies and the controller's
/// next timer deadline; everything runs on the calling thread.
pub fn run_lab_loop(
    cmd_rx: Receiver<LabCommand>,
    reply_rx: Receiver<ExplanationReply>,
    mut controller: LabController,
) -> LabController {
    loop {
        controller.tick(Instant::now());

        let timer = match controller.next_deadline() {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        };

        channel::select! {
            recv(cmd_rx) -> msg => match msg {
                Ok(cmd) => {
                    profile_scope!("command_handling");
                    if process_command(cmd, &mut controller, Instant::now()).is_break() {
                        break;
                    }
                }
                Err(_) => {
                    debug!("command channel closed");
                    break;
                }
            },
            recv(reply_rx) -> msg => {
                if let Ok(reply) = msg {
                    controller.apply_reply(reply);
                }
            },
            recv(timer) -> _ => {},
        }
    }
    controller.shutdown();
    controller
}
