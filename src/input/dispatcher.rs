//! Turns a tick's raw input into at most one firing per logical command.
//!
//! Both channels are aliases of the same command: the edge channel passes through
//! unchanged, the level channel goes through [`ButtonEdgeState`]. A command fires if
//! either reports a press this tick, and fires once even if both do.

use crate::control::{CommandSet, CommandState, ControlCommand, Sensitivity};
use crate::input::edge::ButtonEdgeState;
use crate::input::frame::InputFrame;
use log::debug;

/// Result of one input tick: the new state and latches, plus what fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchOutcome {
    pub state: CommandState,
    pub edges: ButtonEdgeState,
    pub fired: CommandSet,
}

/// Edge-detecting command dispatcher.
///
/// Holds only the configuration it needs; all mutable state is passed in and handed
/// back so a tick can be replayed deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEdgeDispatcher {
    flap_deployed: f32,
}

impl InputEdgeDispatcher {
    pub fn new(flap_deployed: f32) -> Self {
        Self { flap_deployed }
    }

    pub fn tick(
        &self,
        mut state: CommandState,
        mut edges: ButtonEdgeState,
        frame: &InputFrame,
        tuning: &Sensitivity,
    ) -> DispatchOutcome {
        state.set_axes(frame.axes.pitch, frame.axes.roll, frame.axes.yaw);

        let mut fired = CommandSet::empty();
        for command in ControlCommand::ALL {
            let rising = edges.observe(command, frame.held.contains(command));
            if rising || frame.pressed.contains(command) {
                self.apply(command, &mut state, tuning);
                fired.insert(command);
            }
        }

        DispatchOutcome {
            state,
            edges,
            fired,
        }
    }

    fn apply(&self, command: ControlCommand, state: &mut CommandState, tuning: &Sensitivity) {
        match command {
            ControlCommand::ThrustDown => {
                let thrust = state.step_thrust(-tuning.thrust_step);
                debug!("thrust changed to {thrust}");
            }
            ControlCommand::ThrustUp => {
                let thrust = state.step_thrust(tuning.thrust_step);
                debug!("thrust changed to {thrust}");
            }
            ControlCommand::BrakeToggle => {
                let active = state.toggle_brake();
                debug!("brake toggled, active = {active}");
            }
            ControlCommand::FlapToggle => {
                let flap = state.toggle_flap(self.flap_deployed);
                debug!("flap moved to {flap}");
            }
        }
    }
}
