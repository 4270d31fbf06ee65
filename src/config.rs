//! Configuration loaded from `config.toml`.
//!
//! Every table is optional. A missing file falls back to the stock tuning and
//! airframe, matching the values the controller shipped with.

use crate::control::{ControlCommand, Sensitivity, DEFAULT_FLAP_DEPLOYED};
use crate::error::{FlightCtlError, Result};
use crate::input::KeyBindings;
use crate::mixer::{Actuator, ControlRole};
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR: &str = "flightctl";
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Highest input or physics rate accepted from configuration.
pub const MAX_TICK_HZ: u32 = 1000;

/// `[actuation]` table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActuationConfig {
    /// Flap position when deployed.
    pub flap_deployed: f32,
    /// Brake torque applied to each wheel while the brake is on.
    pub brake_torque: f32,
    pub wheel_wake_torque: f32,
}

impl Default for ActuationConfig {
    fn default() -> Self {
        Self {
            flap_deployed: DEFAULT_FLAP_DEPLOYED,
            brake_torque: 100.0,
            wheel_wake_torque: 0.01,
        }
    }
}

/// `[timing]` table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub input_hz: u32,
    pub physics_hz: u32,
    /// How long a key counts as held after its last press or repeat, for
    /// terminals that do not report releases.
    ///
    /// On those terminals a second press of the same key inside this window is
    /// read as autorepeat, so repeated taps (thrust steps) must be spaced
    /// further apart than this. Lower it if the keyboard repeat delay allows.
    pub key_hold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            input_hz: 60,
            physics_hz: 50,
            key_hold_ms: 600,
        }
    }
}

impl TimingConfig {
    pub fn input_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.input_hz.max(1)))
    }

    pub fn physics_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.physics_hz.max(1)))
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}

/// `[axes]` table: how fast keyboard axes move, in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub sensitivity: f32,
    pub gravity: f32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            sensitivity: 3.0,
            gravity: 3.0,
        }
    }
}

/// Keys for one logical command: `keys` fire on press, `buttons` are held.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelBinding {
    pub keys: Vec<String>,
    pub buttons: Vec<String>,
}

impl ChannelBinding {
    fn new(keys: &[&str], buttons: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            buttons: buttons.iter().map(|b| b.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisBinding {
    pub negative: String,
    pub positive: String,
}

impl AxisBinding {
    fn new(negative: &str, positive: &str) -> Self {
        Self {
            negative: negative.to_string(),
            positive: positive.to_string(),
        }
    }
}

/// `[bindings]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub thrust_down: ChannelBinding,
    pub thrust_up: ChannelBinding,
    pub brake_toggle: ChannelBinding,
    pub flap_toggle: ChannelBinding,
    pub pitch: AxisBinding,
    pub roll: AxisBinding,
    pub yaw: AxisBinding,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            thrust_down: ChannelBinding::new(&[","], &["x"]),
            thrust_up: ChannelBinding::new(&["."], &["y"]),
            brake_toggle: ChannelBinding::new(&["space"], &["a"]),
            flap_toggle: ChannelBinding::new(&["f"], &[]),
            pitch: AxisBinding::new("down", "up"),
            roll: AxisBinding::new("left", "right"),
            yaw: AxisBinding::new("q", "e"),
        }
    }
}

impl BindingsConfig {
    pub fn channel(&self, command: ControlCommand) -> &ChannelBinding {
        match command {
            ControlCommand::ThrustDown => &self.thrust_down,
            ControlCommand::ThrustUp => &self.thrust_up,
            ControlCommand::BrakeToggle => &self.brake_toggle,
            ControlCommand::FlapToggle => &self.flap_toggle,
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub sensitivity: Sensitivity,
    pub actuation: ActuationConfig,
    pub timing: TimingConfig,
    pub axes: AxisConfig,
    pub bindings: BindingsConfig,
    pub actuators: Vec<Actuator>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::default(),
            actuation: ActuationConfig::default(),
            timing: TimingConfig::default(),
            axes: AxisConfig::default(),
            bindings: BindingsConfig::default(),
            actuators: default_airframe(),
        }
    }
}

/// Conventional single-engine layout used when no actuators are configured.
pub fn default_airframe() -> Vec<Actuator> {
    vec![
        Actuator::new("elevator", ControlRole::Pitch, 1.0),
        Actuator::new("aileron_left", ControlRole::Roll, 1.0),
        Actuator::new("aileron_right", ControlRole::Roll, -1.0),
        Actuator::new("rudder", ControlRole::Yaw, 1.0),
        Actuator::new("flap_left", ControlRole::Flap, 1.0),
        Actuator::new("flap_right", ControlRole::Flap, 1.0),
    ]
}

impl ControllerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ControllerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.sensitivity;
        for (name, value) in [("pitch", s.pitch), ("roll", s.roll), ("yaw", s.yaw)] {
            if !value.is_finite() {
                return Err(FlightCtlError::config(format!(
                    "sensitivity.{name} must be a finite number"
                )));
            }
        }
        if !(s.thrust_step > 0.0 && s.thrust_step <= 1.0) {
            return Err(FlightCtlError::config(
                "sensitivity.thrust_step must be in (0, 1]",
            ));
        }

        let a = &self.actuation;
        if !(a.flap_deployed > 0.0 && a.flap_deployed <= 1.0) {
            return Err(FlightCtlError::config(
                "actuation.flap_deployed must be in (0, 1]",
            ));
        }
        if !(a.brake_torque.is_finite() && a.brake_torque >= 0.0) {
            return Err(FlightCtlError::config(
                "actuation.brake_torque must be a non-negative number",
            ));
        }
        if !(a.wheel_wake_torque.is_finite() && a.wheel_wake_torque >= 0.0) {
            return Err(FlightCtlError::config(
                "actuation.wheel_wake_torque must be a non-negative number",
            ));
        }

        let rates = 1..=MAX_TICK_HZ;
        if !(rates.contains(&self.timing.input_hz) && rates.contains(&self.timing.physics_hz)) {
            return Err(FlightCtlError::config(format!(
                "timing.input_hz and timing.physics_hz must be between 1 and {MAX_TICK_HZ}"
            )));
        }
        if !(self.axes.sensitivity > 0.0 && self.axes.gravity > 0.0) {
            return Err(FlightCtlError::config(
                "axes.sensitivity and axes.gravity must be positive",
            ));
        }

        if let Some(bad) = self.actuators.iter().find(|a| !a.gain.is_finite()) {
            return Err(FlightCtlError::config(format!(
                "actuator '{}' has a non-finite gain",
                bad.name
            )));
        }

        KeyBindings::from_config(&self.bindings)?;
        Ok(())
    }

    /// Actuators in the slot form the mixer works with.
    pub fn actuator_slots(&self) -> Vec<Option<Actuator>> {
        self.actuators.iter().cloned().map(Some).collect()
    }
}

/// `$XDG_CONFIG_HOME/flightctl/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Load configuration from `path`, or from the default location when `path` is `None`.
///
/// An explicit path must exist. Without one, a missing default file yields the
/// built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ControllerConfig> {
    let resolved = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(found) => found,
            None => {
                warn!("no configuration file found, using defaults");
                return Ok(ControllerConfig::default());
            }
        },
    };

    let contents = std::fs::read_to_string(&resolved).map_err(|err| {
        FlightCtlError::file_error(format!("Failed to read {}", resolved.display()), err)
    })?;
    let config = ControllerConfig::from_toml_str(&contents)?;
    info!("loaded configuration from {}", resolved.display());
    Ok(config)
}
