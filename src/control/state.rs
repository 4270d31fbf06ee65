//! The command state mutated once per control tick, and its read-only telemetry view.

use std::fmt;

/// Flap position used when the flap toggle deploys and no override is configured.
pub const DEFAULT_FLAP_DEPLOYED: f32 = 0.3;

/// Normalised control commands produced by the input tick.
///
/// Invariants:
/// - `pitch`, `roll`, `yaw` in `[-1, 1]`, replaced wholesale every tick
/// - `flap` is either `0` or the deployed position, changed only by [`Self::toggle_flap`]
/// - `thrust` in `[0, 1]`, changed only by [`Self::step_thrust`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandState {
    pitch: f32,
    roll: f32,
    yaw: f32,
    flap: f32,
    thrust: f32,
    brake_active: bool,
}

impl CommandState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn flap(&self) -> f32 {
        self.flap
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn brake_active(&self) -> bool {
        self.brake_active
    }

    /// Pass-through of the sampled axes. The input layer clamps them beforehand.
    pub fn set_axes(&mut self, pitch: f32, roll: f32, yaw: f32) {
        self.pitch = pitch;
        self.roll = roll;
        self.yaw = yaw;
    }

    /// Add `delta` to thrust, saturating at both ends of `[0, 1]`.
    pub fn step_thrust(&mut self, delta: f32) -> f32 {
        self.thrust = (self.thrust + delta).clamp(0.0, 1.0);
        self.thrust
    }

    pub fn toggle_brake(&mut self) -> bool {
        self.brake_active = !self.brake_active;
        self.brake_active
    }

    /// Two-position toggle between retracted (`0`) and `deployed`.
    pub fn toggle_flap(&mut self, deployed: f32) -> f32 {
        self.flap = if self.flap > 0.0 { 0.0 } else { deployed };
        self.flap
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from(self)
    }
}

/// Brake state as shown to the pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrakeStatus {
    On,
    Off,
}

impl fmt::Display for BrakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrakeStatus::On => f.write_str("B: ON"),
            BrakeStatus::Off => f.write_str("B: OFF"),
        }
    }
}

/// Display-oriented snapshot of a [`CommandState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    /// Thrust in whole percent, truncated.
    pub thrust_percent: u32,
    pub brake: BrakeStatus,
    pub flap: f32,
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl From<&CommandState> for Telemetry {
    fn from(state: &CommandState) -> Self {
        Self {
            thrust_percent: (state.thrust * 100.0) as u32,
            brake: if state.brake_active {
                BrakeStatus::On
            } else {
                BrakeStatus::Off
            },
            flap: state.flap,
            pitch: state.pitch,
            roll: state.roll,
            yaw: state.yaw,
        }
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T: {}%\n{}", self.thrust_percent, self.brake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let state = CommandState::new();
        assert_eq!(state.thrust(), 0.0);
        assert_eq!(state.flap(), 0.0);
        assert!(!state.brake_active());
    }

    #[test]
    fn thrust_saturates_at_one() {
        let mut state = CommandState::new();
        for _ in 0..3 {
            state.step_thrust(0.3);
        }
        assert!((state.thrust() - 0.9).abs() < 1e-6);
        assert_eq!(state.step_thrust(0.2), 1.0);
        assert_eq!(state.step_thrust(0.2), 1.0);
    }

    #[test]
    fn thrust_saturates_at_zero() {
        let mut state = CommandState::new();
        assert_eq!(state.step_thrust(-0.2), 0.0);
        state.step_thrust(0.5);
        assert_eq!(state.step_thrust(-0.7), 0.0);
    }

    #[test]
    fn flap_toggle_is_two_position() {
        let mut state = CommandState::new();
        assert_eq!(state.toggle_flap(DEFAULT_FLAP_DEPLOYED), 0.3);
        assert_eq!(state.toggle_flap(DEFAULT_FLAP_DEPLOYED), 0.0);
    }

    #[test]
    fn brake_toggle_restores_state() {
        let mut state = CommandState::new();
        let before = state;
        state.toggle_brake();
        assert!(state.brake_active());
        state.toggle_brake();
        assert_eq!(state, before);
    }

    #[test]
    fn telemetry_formats_like_the_cockpit_readout() {
        let mut state = CommandState::new();
        state.step_thrust(0.5);
        state.toggle_brake();

        let telemetry = state.telemetry();
        assert_eq!(telemetry.thrust_percent, 50);
        assert_eq!(telemetry.brake, BrakeStatus::On);
        assert_eq!(telemetry.to_string(), "T: 50%\nB: ON");

        state.toggle_brake();
        assert_eq!(state.telemetry().to_string(), "T: 50%\nB: OFF");
    }
}
