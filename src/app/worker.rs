use crate::app::controller::FlightController;
use crate::app::protocol::{ControlMessage, ControlResponse};
use log::{debug, info};
use tokio::sync::mpsc::{Receiver, Sender};

/// Own the controller on one task and process messages strictly in order.
pub async fn control_worker_loop(
    mut rx: Receiver<ControlMessage>,
    tx: Sender<ControlResponse>,
    controller: FlightController,
) {
    let mut controller = controller;
    info!("control worker started");

    while let Some(message) = rx.recv().await {
        let outcome = handle_message(&mut controller, message);
        if let Some(response) = outcome.response {
            if tx.send(response).await.is_err() {
                break;
            }
        }

        if outcome.done {
            break;
        }
    }

    info!("control worker stopped");
}

fn handle_message(controller: &mut FlightController, message: ControlMessage) -> HandlerOutcome {
    match message {
        ControlMessage::Input(frame) => {
            let fired = controller.input_tick(&frame);
            if fired.is_empty() {
                HandlerOutcome::continue_without_response()
            } else {
                HandlerOutcome::respond(ControlResponse::Fired {
                    commands: fired,
                    telemetry: controller.telemetry(),
                })
            }
        }
        ControlMessage::PhysicsTick => HandlerOutcome::respond(ControlResponse::Actuation {
            frame: controller.recompute(),
            telemetry: controller.telemetry(),
        }),
        ControlMessage::UpdateActuators(actuators) => {
            debug!("actuator set replaced ({} slots)", actuators.len());
            controller.set_actuators(actuators);
            HandlerOutcome::respond(ControlResponse::Preview {
                actuators: controller.actuators().to_vec(),
                frame: controller.recompute(),
            })
        }
        ControlMessage::UpdateActuation(actuation) => {
            controller.set_actuation(actuation);
            HandlerOutcome::continue_without_response()
        }
        ControlMessage::Snapshot => {
            HandlerOutcome::respond(ControlResponse::Snapshot(controller.telemetry()))
        }
        ControlMessage::Shutdown => HandlerOutcome::exit(),
    }
}

struct HandlerOutcome {
    response: Option<ControlResponse>,
    done: bool,
}

impl HandlerOutcome {
    fn respond(response: ControlResponse) -> Self {
        Self {
            response: Some(response),
            done: false,
        }
    }

    fn continue_without_response() -> Self {
        Self {
            response: None,
            done: false,
        }
    }

    fn exit() -> Self {
        Self {
            response: None,
            done: true,
        }
    }
}
