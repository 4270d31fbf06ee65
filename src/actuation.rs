//! Actuation sink interface and the per-tick frame of commands sent through it.

use crate::config::ActuationConfig;

/// Receives the commands produced by one actuation tick.
pub trait ActuationSink {
    /// Deflection for the actuator registered at `index`.
    fn set_deflection(&mut self, index: usize, deflection: f32);
    fn set_thrust(&mut self, thrust: f32);
    fn set_wheels(&mut self, wheels: WheelCommand);
}

/// Torques applied to every wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelCommand {
    pub brake_torque: f32,
    /// Small constant drive torque so the physics engine keeps the wheels awake.
    pub motor_torque: f32,
}

impl WheelCommand {
    /// Two-position brake: full configured torque when engaged, zero otherwise.
    pub fn from_brake(brake_active: bool, config: &ActuationConfig) -> Self {
        Self {
            brake_torque: if brake_active {
                config.brake_torque
            } else {
                0.0
            },
            motor_torque: config.wheel_wake_torque,
        }
    }
}

/// Recorded output of one actuation tick.
///
/// `deflections[i]` is `None` when actuator `i` was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActuationFrame {
    pub deflections: Vec<Option<f32>>,
    pub thrust: f32,
    pub wheels: WheelCommand,
}

impl ActuationFrame {
    pub fn new(actuator_count: usize) -> Self {
        Self {
            deflections: vec![None; actuator_count],
            ..Self::default()
        }
    }
}

impl ActuationSink for ActuationFrame {
    fn set_deflection(&mut self, index: usize, deflection: f32) {
        if index >= self.deflections.len() {
            self.deflections.resize(index + 1, None);
        }
        self.deflections[index] = Some(deflection);
    }

    fn set_thrust(&mut self, thrust: f32) {
        self.thrust = thrust;
    }

    fn set_wheels(&mut self, wheels: WheelCommand) {
        self.wheels = wheels;
    }
}
