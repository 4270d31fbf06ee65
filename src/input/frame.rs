//! One tick's worth of raw input and the collaborator interfaces that produce it.

use crate::control::{CommandSet, ControlCommand};

/// Analog stick sample, clamped to `[-1, 1]` on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisSample {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl AxisSample {
    pub fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self {
            pitch: clamp_axis(pitch),
            roll: clamp_axis(roll),
            yaw: clamp_axis(yaw),
        }
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Yields pitch, roll and yaw once per tick.
pub trait AxisSource {
    fn sample_axes(&mut self) -> AxisSample;
}

/// Edge channel: reports commands whose key went down since the previous tick.
pub trait KeyEventSource {
    fn pressed_this_tick(&mut self, command: ControlCommand) -> bool;
}

/// Level channel: reports whether the button bound to a command is held right now.
pub trait ButtonSource {
    fn is_held(&mut self, command: ControlCommand) -> bool;
}

/// Button source with nothing attached; every command reads as released.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoButtons;

impl ButtonSource for NoButtons {
    fn is_held(&mut self, _command: ControlCommand) -> bool {
        false
    }
}

/// A precomputed set doubles as either channel.
impl KeyEventSource for CommandSet {
    fn pressed_this_tick(&mut self, command: ControlCommand) -> bool {
        self.contains(command)
    }
}

impl ButtonSource for CommandSet {
    fn is_held(&mut self, command: ControlCommand) -> bool {
        self.contains(command)
    }
}

/// Everything the dispatcher needs for one input tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub axes: AxisSample,
    /// Edge channel: went down this tick.
    pub pressed: CommandSet,
    /// Level channel: currently held.
    pub held: CommandSet,
}

impl InputFrame {
    pub fn new(axes: AxisSample) -> Self {
        Self {
            axes,
            ..Self::default()
        }
    }

    pub fn with_pressed(mut self, command: ControlCommand) -> Self {
        self.pressed.insert(command);
        self
    }

    pub fn with_held(mut self, command: ControlCommand) -> Self {
        self.held.insert(command);
        self
    }

    /// Sample every collaborator once.
    pub fn poll(
        axes: &mut dyn AxisSource,
        keys: &mut dyn KeyEventSource,
        buttons: &mut dyn ButtonSource,
    ) -> Self {
        let mut frame = Self::new(axes.sample_axes());
        for command in ControlCommand::ALL {
            if keys.pressed_this_tick(command) {
                frame.pressed.insert(command);
            }
            if buttons.is_held(command) {
                frame.held.insert(command);
            }
        }
        frame
    }
}
