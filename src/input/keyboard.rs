//! Keyboard-backed input sources for the terminal front end.
//!
//! Key presses feed the edge channel. Held keys feed the level channel and the
//! three stick axes. Terminals that cannot report key releases only give us a
//! stream of presses and autorepeats, so a key counts as held while repeats keep
//! arriving within the hold window, and the level channel is switched off.

use crate::config::{AxisBinding, AxisConfig, BindingsConfig, ChannelBinding};
use crate::control::{CommandSet, ControlCommand};
use crate::error::{FlightCtlError, Result};
use crate::input::frame::{AxisSample, AxisSource, InputFrame};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Parse a key name from the bindings table.
///
/// Accepts single characters (`","`, `"f"`) and the names `space`, `up`, `down`,
/// `left`, `right`, `enter`, `tab`, `backspace`, `home`, `end`, `pageup`,
/// `pagedown`, `insert`, `delete`.
pub fn parse_key(name: &str) -> Result<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(ch.to_ascii_lowercase()));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,
        _ => {
            return Err(FlightCtlError::InvalidBinding {
                name: name.to_string(),
            })
        }
    };
    Ok(code)
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
        other => other,
    }
}

/// Negative/positive key pair driving one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisKeys {
    pub negative: KeyCode,
    pub positive: KeyCode,
}

impl AxisKeys {
    fn from_binding(binding: &AxisBinding) -> Result<Self> {
        Ok(Self {
            negative: parse_key(&binding.negative)?,
            positive: parse_key(&binding.positive)?,
        })
    }
}

/// Key bindings resolved to key codes.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    keys: [Vec<KeyCode>; ControlCommand::COUNT],
    buttons: [Vec<KeyCode>; ControlCommand::COUNT],
    pub pitch: AxisKeys,
    pub roll: AxisKeys,
    pub yaw: AxisKeys,
}

impl KeyBindings {
    pub fn from_config(config: &BindingsConfig) -> Result<Self> {
        let mut keys: [Vec<KeyCode>; ControlCommand::COUNT] = Default::default();
        let mut buttons: [Vec<KeyCode>; ControlCommand::COUNT] = Default::default();

        for command in ControlCommand::ALL {
            let binding: &ChannelBinding = config.channel(command);
            keys[command.index()] = binding
                .keys
                .iter()
                .map(|name| parse_key(name))
                .collect::<Result<Vec<_>>>()?;
            buttons[command.index()] = binding
                .buttons
                .iter()
                .map(|name| parse_key(name))
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(Self {
            keys,
            buttons,
            pitch: AxisKeys::from_binding(&config.pitch)?,
            roll: AxisKeys::from_binding(&config.roll)?,
            yaw: AxisKeys::from_binding(&config.yaw)?,
        })
    }

    /// Commands whose edge-channel keys include `code`.
    fn edge_commands(&self, code: KeyCode) -> impl Iterator<Item = ControlCommand> + '_ {
        ControlCommand::ALL
            .into_iter()
            .filter(move |command| self.keys[command.index()].contains(&code))
    }

    fn button_keys(&self, command: ControlCommand) -> &[KeyCode] {
        &self.buttons[command.index()]
    }
}

/// Tracks which keys are currently down.
#[derive(Debug, Clone)]
struct HeldKeys {
    last_seen: HashMap<KeyCode, Instant>,
    release_events: bool,
    hold_window: Duration,
}

impl HeldKeys {
    fn new(release_events: bool, hold_window: Duration) -> Self {
        Self {
            last_seen: HashMap::new(),
            release_events,
            hold_window,
        }
    }

    fn press(&mut self, code: KeyCode, now: Instant) {
        self.last_seen.insert(code, now);
    }

    fn release(&mut self, code: KeyCode) {
        self.last_seen.remove(&code);
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        match self.last_seen.get(&code) {
            Some(_) if self.release_events => true,
            Some(seen) => now.saturating_duration_since(*seen) < self.hold_window,
            None => false,
        }
    }

    fn expire(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        let window = self.hold_window;
        self.last_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) < window);
    }
}

/// Keyboard axis that eases toward the held direction and falls back to centre.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SmoothedAxis {
    value: f32,
}

impl SmoothedAxis {
    fn advance(&mut self, target: f32, tuning: &AxisConfig, dt: f32) -> f32 {
        if target == 0.0 {
            let step = tuning.gravity * dt;
            self.value = if self.value.abs() <= step {
                0.0
            } else {
                self.value - step * self.value.signum()
            };
        } else {
            // Reversing direction starts from centre instead of sweeping through it.
            if self.value != 0.0 && self.value.signum() != target.signum() {
                self.value = 0.0;
            }
            self.value += tuning.sensitivity * dt * target.signum();
        }
        self.value = self.value.clamp(-1.0, 1.0);
        self.value
    }
}

/// Axis values computed by the last [`KeyboardInput::frame`] call.
#[derive(Debug, Clone, Copy, Default)]
struct KeyboardAxes {
    sample: AxisSample,
}

impl AxisSource for KeyboardAxes {
    fn sample_axes(&mut self) -> AxisSample {
        self.sample
    }
}

/// Keyboard state machine producing one [`InputFrame`] per input tick.
#[derive(Debug, Clone)]
pub struct KeyboardInput {
    bindings: KeyBindings,
    axis_tuning: AxisConfig,
    held: HeldKeys,
    pressed: HashSet<KeyCode>,
    pitch: SmoothedAxis,
    roll: SmoothedAxis,
    yaw: SmoothedAxis,
    axes: KeyboardAxes,
}

impl KeyboardInput {
    /// `release_events` says whether the terminal reports key releases.
    pub fn new(
        bindings: KeyBindings,
        axis_tuning: AxisConfig,
        release_events: bool,
        hold_window: Duration,
    ) -> Self {
        Self {
            bindings,
            axis_tuning,
            held: HeldKeys::new(release_events, hold_window),
            pressed: HashSet::new(),
            pitch: SmoothedAxis { value: 0.0 },
            roll: SmoothedAxis { value: 0.0 },
            yaw: SmoothedAxis { value: 0.0 },
            axes: KeyboardAxes::default(),
        }
    }

    /// Whether held-button bindings can be honoured at all.
    pub fn level_channel_enabled(&self) -> bool {
        self.held.release_events
    }

    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                // Without release reporting, autorepeat arrives as fresh presses.
                let repeat = !self.held.release_events && self.held.is_held(code, now);
                if !repeat {
                    self.pressed.insert(code);
                }
                self.held.press(code, now);
            }
            KeyEventKind::Repeat => self.held.press(code, now),
            KeyEventKind::Release => self.held.release(code),
        }
    }

    /// Build the input frame for one tick and clear the per-tick press buffer.
    pub fn frame(&mut self, now: Instant, dt: Duration) -> InputFrame {
        self.held.expire(now);
        let dt = dt.as_secs_f32();

        let pitch_target = self.axis_target(self.bindings.pitch, now);
        let roll_target = self.axis_target(self.bindings.roll, now);
        let yaw_target = self.axis_target(self.bindings.yaw, now);
        self.axes.sample = AxisSample::new(
            self.pitch.advance(pitch_target, &self.axis_tuning, dt),
            self.roll.advance(roll_target, &self.axis_tuning, dt),
            self.yaw.advance(yaw_target, &self.axis_tuning, dt),
        );

        let mut pressed = self.pressed_commands();
        let mut held = self.held_commands(now);
        self.pressed.clear();

        InputFrame::poll(&mut self.axes, &mut pressed, &mut held)
    }

    fn axis_target(&self, keys: AxisKeys, now: Instant) -> f32 {
        let negative = self.held.is_held(keys.negative, now);
        let positive = self.held.is_held(keys.positive, now);
        match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    fn pressed_commands(&self) -> CommandSet {
        self.pressed
            .iter()
            .flat_map(|code| self.bindings.edge_commands(*code))
            .collect()
    }

    fn held_commands(&self, now: Instant) -> CommandSet {
        if !self.level_channel_enabled() {
            return CommandSet::empty();
        }
        ControlCommand::ALL
            .into_iter()
            .filter(|command| {
                self.bindings
                    .button_keys(*command)
                    .iter()
                    .any(|code| self.held.is_held(*code, now))
            })
            .collect()
    }
}
