//! Messages exchanged between the front end and the control worker.

use crate::actuation::ActuationFrame;
use crate::config::ActuationConfig;
use crate::control::{CommandSet, Telemetry};
use crate::input::InputFrame;
use crate::mixer::Actuator;

/// Requests sent to the control worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// One input tick.
    Input(InputFrame),
    /// One physics step; answered with the actuation frame for it.
    PhysicsTick,
    /// Replace the actuator set; answered with a recomputed preview.
    UpdateActuators(Vec<Option<Actuator>>),
    UpdateActuation(ActuationConfig),
    Snapshot,
    Shutdown,
}

/// Responses emitted by the control worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlResponse {
    /// Sent only for input ticks where something fired.
    Fired {
        commands: CommandSet,
        telemetry: Telemetry,
    },
    Actuation {
        frame: ActuationFrame,
        telemetry: Telemetry,
    },
    Preview {
        actuators: Vec<Option<Actuator>>,
        frame: ActuationFrame,
    },
    Snapshot(Telemetry),
}
