//! Control-surface mixer.
//!
//! Maps the four command axes onto an arbitrary set of actuators. Each actuator is
//! handled on its own: its role picks the axis, the matching sensitivity scales it
//! (flap excepted), and the actuator's gain scales the result. Actuators that are
//! missing, not control surfaces, or have no role get no command at all.

use crate::actuation::ActuationSink;
use crate::control::{CommandState, Sensitivity};
use serde::Deserialize;
use std::fmt;

/// Which command axis drives an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ControlRole {
    Pitch,
    Roll,
    Yaw,
    Flap,
    /// No role, or one we do not recognise.
    None,
}

impl From<String> for ControlRole {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pitch" => ControlRole::Pitch,
            "roll" => ControlRole::Roll,
            "yaw" => ControlRole::Yaw,
            "flap" => ControlRole::Flap,
            _ => ControlRole::None,
        }
    }
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlRole::Pitch => "pitch",
            ControlRole::Roll => "roll",
            ControlRole::Yaw => "yaw",
            ControlRole::Flap => "flap",
            ControlRole::None => "none",
        };
        f.write_str(name)
    }
}

fn default_gain() -> f32 {
    1.0
}

fn default_control() -> bool {
    true
}

/// A physical actuator as seen by the mixer. The mixer never modifies it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Actuator {
    #[serde(default)]
    pub name: String,
    pub role: ControlRole,
    #[serde(default = "default_gain")]
    pub gain: f32,
    #[serde(default = "default_control", rename = "control")]
    pub is_control_actuator: bool,
}

impl Actuator {
    pub fn new(name: impl Into<String>, role: ControlRole, gain: f32) -> Self {
        Self {
            name: name.into(),
            role,
            gain,
            is_control_actuator: true,
        }
    }

    pub fn passive(mut self) -> Self {
        self.is_control_actuator = false;
        self
    }
}

/// Deflection command for the actuator at `index` in the registered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCommand {
    pub index: usize,
    pub deflection: f32,
}

/// Deflection for a single actuator, or `None` when it takes no command.
pub fn deflection_for(
    actuator: &Actuator,
    state: &CommandState,
    tuning: &Sensitivity,
) -> Option<f32> {
    if !actuator.is_control_actuator {
        return None;
    }
    let axis = match actuator.role {
        ControlRole::Pitch => state.pitch() * tuning.pitch,
        ControlRole::Roll => state.roll() * tuning.roll,
        ControlRole::Yaw => state.yaw() * tuning.yaw,
        ControlRole::Flap => state.flap(),
        ControlRole::None => return None,
    };
    Some(axis * actuator.gain)
}

/// Registered actuators, with `None` standing in for empty slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMixer {
    actuators: Vec<Option<Actuator>>,
}

impl SurfaceMixer {
    pub fn new(actuators: Vec<Option<Actuator>>) -> Self {
        Self { actuators }
    }

    pub fn actuators(&self) -> &[Option<Actuator>] {
        &self.actuators
    }

    pub fn set_actuators(&mut self, actuators: Vec<Option<Actuator>>) {
        self.actuators = actuators;
    }

    /// Commands for every participating actuator. Pure: same inputs, same output.
    pub fn mix(&self, state: &CommandState, tuning: &Sensitivity) -> Vec<SurfaceCommand> {
        self.actuators
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let actuator = slot.as_ref()?;
                let deflection = deflection_for(actuator, state, tuning)?;
                Some(SurfaceCommand { index, deflection })
            })
            .collect()
    }

    /// Issue each command to `sink`; skipped actuators are not touched.
    pub fn mix_into(
        &self,
        state: &CommandState,
        tuning: &Sensitivity,
        sink: &mut dyn ActuationSink,
    ) {
        for command in self.mix(state, tuning) {
            sink.set_deflection(command.index, command.deflection);
        }
    }
}
