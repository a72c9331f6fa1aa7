//! Timer driver task
//!
//! The single task that owns the [`Controller`]. Poll deliveries and control
//! commands are handled one at a time, so a tick that expires the countdown
//! finishes its transition, poll cancellation included, before anything else
//! runs.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::{
    engine::PollId,
    state::{ControlOutcome, ControlPress, Controller, TimerSnapshot},
};

/// Requests for the driver task
#[derive(Debug)]
pub enum Command {
    /// A control press, with an optional reply for the caller
    Press {
        press: ControlPress,
        reply: Option<oneshot::Sender<ControlOutcome>>,
    },
}

/// Drive the controller until every command sender is gone
pub async fn timer_driver_task(
    mut controller: Controller,
    mut polls: mpsc::UnboundedReceiver<PollId>,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<TimerSnapshot>,
) {
    info!("Starting timer driver task");

    controller.boot();
    snapshots.send_replace(controller.snapshot());

    loop {
        tokio::select! {
            Some(poll) = polls.recv() => {
                controller.poll(poll);
            }

            command = commands.recv() => match command {
                Some(Command::Press { press, reply }) => {
                    let accepted = controller.press(press);
                    let outcome = ControlOutcome {
                        accepted,
                        snapshot: controller.snapshot(),
                    };
                    if let Some(reply) = reply {
                        if reply.send(outcome).is_err() {
                            debug!("Press caller went away before the reply");
                        }
                    }
                }
                None => {
                    info!("Command channel closed, stopping timer driver");
                    break;
                }
            }
        }

        snapshots.send_replace(controller.snapshot());
    }

    controller.shutdown();
    snapshots.send_replace(controller.snapshot());
}
