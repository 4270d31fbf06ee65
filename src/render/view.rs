//! What the HUD shows, kept separate from how it is drawn.

use crate::actuation::{ActuationFrame, WheelCommand};
use crate::control::{CommandState, Telemetry};
use crate::mixer::{Actuator, ControlRole};

/// One actuator row.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRow {
    pub name: String,
    pub role: ControlRole,
    pub gain: f32,
    /// Last commanded deflection; `None` when the mixer skipped the slot.
    pub deflection: Option<f32>,
}

/// Everything the HUD renders.
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub telemetry: Telemetry,
    pub surfaces: Vec<SurfaceRow>,
    pub thrust_command: f32,
    pub wheels: WheelCommand,
    /// Whether held-button bindings are live in this terminal.
    pub level_channel: bool,
    pub message: Option<String>,
}

impl HudView {
    pub fn new(level_channel: bool) -> Self {
        Self {
            telemetry: CommandState::new().telemetry(),
            surfaces: Vec::new(),
            thrust_command: 0.0,
            wheels: WheelCommand::default(),
            level_channel,
            message: None,
        }
    }

    pub fn update_telemetry(&mut self, telemetry: Telemetry) {
        self.telemetry = telemetry;
    }

    /// Rebuild the actuator rows from the registered set and the last frame.
    pub fn update_actuation(&mut self, actuators: &[Option<Actuator>], frame: &ActuationFrame) {
        self.surfaces = actuators
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let deflection = frame.deflections.get(index).copied().flatten();
                match slot {
                    Some(actuator) => SurfaceRow {
                        name: actuator.name.clone(),
                        role: actuator.role,
                        gain: actuator.gain,
                        deflection,
                    },
                    None => SurfaceRow {
                        name: format!("#{index}"),
                        role: ControlRole::None,
                        gain: 0.0,
                        deflection: None,
                    },
                }
            })
            .collect();
        self.thrust_command = frame.thrust;
        self.wheels = frame.wheels;
    }

    /// Refresh deflections only, keeping the current rows.
    pub fn update_deflections(&mut self, frame: &ActuationFrame) {
        for (index, row) in self.surfaces.iter_mut().enumerate() {
            row.deflection = frame.deflections.get(index).copied().flatten();
        }
        self.thrust_command = frame.thrust;
        self.wheels = frame.wheels;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Status block text: thrust, brake, flap and stick position.
    pub fn status_lines(&self) -> Vec<String> {
        let t = &self.telemetry;
        vec![
            format!("T: {}%", t.thrust_percent),
            t.brake.to_string(),
            format!("F: {:.2}", t.flap),
            format!("P: {:+.2}  R: {:+.2}  Y: {:+.2}", t.pitch, t.roll, t.yaw),
        ]
    }
}
