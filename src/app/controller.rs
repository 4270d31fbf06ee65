//! Synchronous owner of the control path: input tick in, actuation tick out.

use crate::actuation::{ActuationFrame, ActuationSink, WheelCommand};
use crate::config::{ActuationConfig, ControllerConfig};
use crate::control::{CommandSet, CommandState, SharedSensitivity, Telemetry};
use crate::input::{ButtonEdgeState, InputEdgeDispatcher, InputFrame};
use crate::mixer::{Actuator, SurfaceMixer};

/// Command state, button latches and the actuator set for one vehicle.
///
/// Sensitivity is read from the shared handle at the start of every tick, so a
/// collaborator may retune it between ticks.
#[derive(Debug, Clone)]
pub struct FlightController {
    state: CommandState,
    edges: ButtonEdgeState,
    dispatcher: InputEdgeDispatcher,
    mixer: SurfaceMixer,
    sensitivity: SharedSensitivity,
    actuation: ActuationConfig,
}

impl FlightController {
    pub fn new(config: &ControllerConfig, sensitivity: SharedSensitivity) -> Self {
        Self::from_parts(config.actuator_slots(), sensitivity, config.actuation)
    }

    pub fn from_parts(
        actuators: Vec<Option<Actuator>>,
        sensitivity: SharedSensitivity,
        actuation: ActuationConfig,
    ) -> Self {
        Self {
            state: CommandState::new(),
            edges: ButtonEdgeState::new(),
            dispatcher: InputEdgeDispatcher::new(actuation.flap_deployed),
            mixer: SurfaceMixer::new(actuators),
            sensitivity,
            actuation,
        }
    }

    /// Run the dispatcher over one input frame. Returns the commands that fired.
    pub fn input_tick(&mut self, frame: &InputFrame) -> CommandSet {
        let tuning = self.sensitivity.current();
        let outcome = self.dispatcher.tick(self.state, self.edges, frame, &tuning);
        self.state = outcome.state;
        self.edges = outcome.edges;
        outcome.fired
    }

    /// Push surface deflections, thrust and wheel torques for the current state.
    pub fn actuation_tick(&self, sink: &mut dyn ActuationSink) {
        let tuning = self.sensitivity.current();
        self.mixer.mix_into(&self.state, &tuning, sink);
        sink.set_thrust(self.state.thrust());
        sink.set_wheels(WheelCommand::from_brake(
            self.state.brake_active(),
            &self.actuation,
        ));
    }

    /// Recompute every command off the physics loop, e.g. after the actuator set changed.
    pub fn recompute(&self) -> ActuationFrame {
        let mut frame = ActuationFrame::new(self.mixer.actuators().len());
        self.actuation_tick(&mut frame);
        frame
    }

    pub fn set_actuators(&mut self, actuators: Vec<Option<Actuator>>) {
        self.mixer.set_actuators(actuators);
    }

    /// Swap the actuation settings. The current flap position is kept until the next toggle.
    pub fn set_actuation(&mut self, actuation: ActuationConfig) {
        self.dispatcher = InputEdgeDispatcher::new(actuation.flap_deployed);
        self.actuation = actuation;
    }

    pub fn actuators(&self) -> &[Option<Actuator>] {
        self.mixer.actuators()
    }

    pub fn state(&self) -> &CommandState {
        &self.state
    }

    pub fn telemetry(&self) -> Telemetry {
        self.state.telemetry()
    }

    pub fn sensitivity(&self) -> &SharedSensitivity {
        &self.sensitivity
    }
}

/// One line per actuator slot: `name role gain -> command`, or `skipped`.
pub fn describe_actuation(actuators: &[Option<Actuator>], frame: &ActuationFrame) -> Vec<String> {
    actuators
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let command = match frame.deflections.get(index).copied().flatten() {
                Some(deflection) => format!("{deflection:+.3}"),
                None => "skipped".to_string(),
            };
            match slot {
                Some(actuator) => format!(
                    "{} {} {} -> {}",
                    actuator.name, actuator.role, actuator.gain, command
                ),
                None => format!("#{index} (empty) -> {command}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlCommand, Sensitivity};
    use crate::input::AxisSample;
    use crate::mixer::ControlRole;

    fn controller() -> (FlightController, SharedSensitivity) {
        let sensitivity = SharedSensitivity::new(Sensitivity::default());
        let controller = FlightController::from_parts(
            vec![
                Some(Actuator::new("elevator", ControlRole::Pitch, 1.0)),
                None,
                Some(Actuator::new("flap", ControlRole::Flap, 1.0)),
            ],
            sensitivity.clone(),
            ActuationConfig::default(),
        );
        (controller, sensitivity)
    }

    #[test]
    fn input_then_actuation() {
        let (mut controller, _) = controller();
        let frame = InputFrame::new(AxisSample::new(0.5, 0.0, 0.0))
            .with_pressed(ControlCommand::ThrustUp)
            .with_pressed(ControlCommand::BrakeToggle);

        let fired = controller.input_tick(&frame);
        assert_eq!(fired.len(), 2);

        let out = controller.recompute();
        assert!((out.deflections[0].unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(out.deflections[1], None);
        assert_eq!(out.deflections[2], Some(0.0));
        assert!((out.thrust - 0.2).abs() < 1e-6);
        assert_eq!(out.wheels.brake_torque, 100.0);
        assert_eq!(out.wheels.motor_torque, 0.01);
    }

    #[test]
    fn held_button_fires_once_across_ticks() {
        let (mut controller, _) = controller();
        let held = InputFrame::default().with_held(ControlCommand::ThrustUp);

        for _ in 0..10 {
            controller.input_tick(&held);
        }
        assert!((controller.state().thrust() - 0.2).abs() < 1e-6);

        controller.input_tick(&InputFrame::default());
        controller.input_tick(&held);
        assert!((controller.state().thrust() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn retuning_applies_on_next_tick() {
        let (mut controller, sensitivity) = controller();
        controller.input_tick(&InputFrame::new(AxisSample::new(1.0, 0.0, 0.0)));
        assert!((controller.recompute().deflections[0].unwrap() - 0.2).abs() < 1e-6);

        sensitivity.replace(Sensitivity {
            pitch: 0.5,
            ..Sensitivity::default()
        });
        assert!((controller.recompute().deflections[0].unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn new_actuation_settings_change_flap_and_brake() {
        let (mut controller, _) = controller();
        controller.set_actuation(ActuationConfig {
            flap_deployed: 0.5,
            brake_torque: 40.0,
            wheel_wake_torque: 0.0,
        });
        controller.input_tick(
            &InputFrame::default()
                .with_pressed(ControlCommand::FlapToggle)
                .with_pressed(ControlCommand::BrakeToggle),
        );

        let out = controller.recompute();
        assert_eq!(out.deflections[2], Some(0.5));
        assert_eq!(out.wheels.brake_torque, 40.0);
    }

    #[test]
    fn replacing_actuators_resizes_output() {
        let (mut controller, _) = controller();
        controller.set_actuators(vec![Some(Actuator::new("rudder", ControlRole::Yaw, 1.0))]);
        assert_eq!(controller.recompute().deflections.len(), 1);
    }

    #[test]
    fn describes_each_slot() {
        let (controller, _) = controller();
        let lines = describe_actuation(controller.actuators(), &controller.recompute());
        assert_eq!(
            lines,
            vec![
                "elevator pitch 1 -> +0.000".to_string(),
                "#1 (empty) -> skipped".to_string(),
                "flap flap 1 -> +0.000".to_string(),
            ]
        );
    }
}
