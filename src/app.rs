//! Application orchestration layer
//!
//! [`FlightController`] is the synchronous control path. [`Application`] wires it
//! to the terminal: raw key events come in on a blocking thread, the controller
//! runs on a tokio task, and two intervals pace the input and physics ticks.

pub mod controller;
pub mod protocol;
pub mod runtime;
pub mod worker;

pub use controller::{describe_actuation, FlightController};
pub use protocol::{ControlMessage, ControlResponse};

use crate::config::{load_config, ControllerConfig, TimingConfig};
use crate::control::SharedSensitivity;
use crate::error::{FlightCtlError, Result};
use crate::input::{KeyBindings, KeyboardInput, RawInputEvent};
use crate::mixer::Actuator;
use crate::render::{HudRenderer, HudView};
use log::{info, warn};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

const COMMAND_CHANNEL_CAPACITY: usize = 64;
const RESPONSE_CHANNEL_CAPACITY: usize = 64;
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// What a key means to the application before it reaches the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Reload,
    Control,
}

pub fn classify_key(key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Control;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => KeyAction::Quit,
        (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Quit
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reload,
        _ => KeyAction::Control,
    }
}

/// Fold a worker response into the HUD view.
pub fn apply_response(
    view: &mut HudView,
    actuators: &mut Vec<Option<Actuator>>,
    response: ControlResponse,
) {
    match response {
        ControlResponse::Fired { telemetry, .. } | ControlResponse::Snapshot(telemetry) => {
            view.update_telemetry(telemetry);
        }
        ControlResponse::Actuation { frame, telemetry } => {
            view.update_telemetry(telemetry);
            if view.surfaces.len() == actuators.len() {
                view.update_deflections(&frame);
            } else {
                view.update_actuation(actuators, &frame);
            }
        }
        ControlResponse::Preview {
            actuators: updated,
            frame,
        } => {
            view.update_actuation(&updated, &frame);
            *actuators = updated;
        }
    }
}

/// Terminal front end around the control worker.
pub struct Application {
    config_path: Option<PathBuf>,
    config: ControllerConfig,
    sensitivity: SharedSensitivity,
    hud: Box<dyn HudRenderer>,
}

impl Application {
    pub fn new(
        config_path: Option<PathBuf>,
        config: ControllerConfig,
        hud: Box<dyn HudRenderer>,
    ) -> Self {
        let sensitivity = SharedSensitivity::new(config.sensitivity);
        Self {
            config_path,
            config,
            sensitivity,
            hud,
        }
    }

    /// Run until the pilot quits. The terminal is restored even when the loop fails.
    pub async fn run(&mut self) -> Result<()> {
        self.hud.initialize()?;
        let result = self.event_loop().await;
        self.hud.cleanup()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let release_events = self.hud.reports_key_release();
        if !release_events {
            warn!("held-button bindings disabled: no key release events");
        }
        let keyboard = build_keyboard(&self.config, release_events)?;

        let controller = FlightController::new(&self.config, self.sensitivity.clone());
        let actuators = controller.actuators().to_vec();
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (resp_tx, resp_rx) = mpsc::channel(RESPONSE_CHANNEL_CAPACITY);
        let worker = tokio::spawn(worker::control_worker_loop(cmd_rx, resp_tx, controller));

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread =
            runtime::spawn_input_thread(input_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let mut session = Session {
            view: HudView::new(keyboard.level_channel_enabled()),
            keyboard,
            release_events,
            actuators,
            cmd_tx,
            resp_rx,
            input_rx,
        };

        info!(
            "control loop started: input {} Hz, physics {} Hz",
            self.config.timing.input_hz, self.config.timing.physics_hz
        );
        let outcome = self.drive(&mut session).await;

        shutdown.store(true, Ordering::SeqCst);
        let _ = session.cmd_tx.send(ControlMessage::Shutdown).await;
        drop(session);
        if let Err(err) = worker.await {
            warn!("control worker ended abnormally: {err}");
        }
        let _ = tokio::task::spawn_blocking(move || input_thread.join()).await;
        info!("control loop stopped");

        outcome
    }

    async fn drive(&mut self, session: &mut Session) -> Result<()> {
        let mut pacing = TickPacing::new(self.config.timing);
        let mut last_input = Instant::now();

        loop {
            tokio::select! {
                event = session.input_rx.recv() => match event {
                    Some(RawInputEvent::Key(key)) => match classify_key(&key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Reload => {
                            if let Some(keyboard) = self.reload(&mut session.view, session.release_events) {
                                session.keyboard = keyboard;
                                pacing.retime(self.config.timing);
                                session.send(ControlMessage::UpdateActuation(self.config.actuation)).await?;
                                session.send(ControlMessage::UpdateActuators(self.config.actuator_slots())).await?;
                            }
                        }
                        KeyAction::Control => {
                            session.view.clear_message();
                            session.keyboard.handle_key(key, Instant::now());
                        }
                    },
                    Some(RawInputEvent::Resize { .. }) => self.hud.render(&session.view)?,
                    None => return Err(FlightCtlError::channel_closed("input thread stopped")),
                },
                _ = pacing.input.tick() => {
                    let now = Instant::now();
                    let frame = session.keyboard.frame(now, now.saturating_duration_since(last_input));
                    last_input = now;
                    session.send(ControlMessage::Input(frame)).await?;
                }
                _ = pacing.physics.tick() => {
                    session.send(ControlMessage::PhysicsTick).await?;
                }
                response = session.resp_rx.recv() => match response {
                    Some(response) => {
                        let redraw = matches!(
                            response,
                            ControlResponse::Actuation { .. } | ControlResponse::Preview { .. }
                        );
                        apply_response(&mut session.view, &mut session.actuators, response);
                        if redraw {
                            self.hud.render(&session.view)?;
                        }
                    }
                    None => return Err(FlightCtlError::channel_closed("control worker stopped")),
                },
            }
        }
    }

    /// Re-read the config file. On success the shared sensitivity is replaced at
    /// once and a keyboard with the new bindings is returned.
    fn reload(&mut self, view: &mut HudView, release_events: bool) -> Option<KeyboardInput> {
        let loaded = load_config(self.config_path.as_deref()).and_then(|config| {
            let keyboard = build_keyboard(&config, release_events)?;
            Ok((config, keyboard))
        });
        match loaded {
            Ok((config, keyboard)) => {
                self.config = config;
                self.sensitivity.replace(self.config.sensitivity);
                info!("configuration reloaded");
                view.set_message("configuration reloaded");
                Some(keyboard)
            }
            Err(err) => {
                warn!("configuration reload failed: {err}");
                view.set_message(format!("reload failed: {err}"));
                None
            }
        }
    }
}

/// The two tick intervals, rebuilt when a reload changes their rates.
struct TickPacing {
    timing: TimingConfig,
    input: Interval,
    physics: Interval,
}

impl TickPacing {
    fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            input: tick_interval(timing.input_period()),
            physics: tick_interval(timing.physics_period()),
        }
    }

    /// Returns whether either interval was rebuilt.
    fn retime(&mut self, timing: TimingConfig) -> bool {
        let input_changed = timing.input_hz != self.timing.input_hz;
        let physics_changed = timing.physics_hz != self.timing.physics_hz;
        if input_changed {
            self.input = tick_interval(timing.input_period());
        }
        if physics_changed {
            self.physics = tick_interval(timing.physics_period());
        }
        self.timing = timing;
        if input_changed || physics_changed {
            info!(
                "tick rates changed: input {} Hz, physics {} Hz",
                timing.input_hz, timing.physics_hz
            );
        }
        input_changed || physics_changed
    }
}

fn tick_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Per-run loop state: channels to the worker and input thread plus the HUD model.
struct Session {
    keyboard: KeyboardInput,
    release_events: bool,
    view: HudView,
    actuators: Vec<Option<Actuator>>,
    cmd_tx: mpsc::Sender<ControlMessage>,
    resp_rx: mpsc::Receiver<ControlResponse>,
    input_rx: mpsc::UnboundedReceiver<RawInputEvent>,
}

impl Session {
    async fn send(&self, message: ControlMessage) -> Result<()> {
        self.cmd_tx
            .send(message)
            .await
            .map_err(|_| FlightCtlError::channel_closed("control worker unavailable"))
    }
}

fn build_keyboard(config: &ControllerConfig, release_events: bool) -> Result<KeyboardInput> {
    Ok(KeyboardInput::new(
        KeyBindings::from_config(&config.bindings)?,
        config.axes,
        release_events,
        config.timing.key_hold(),
    ))
}
