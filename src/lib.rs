//! # flightctl - input-to-actuation control path
//!
//! Turns continuously polled input (stick axes, held buttons, key presses) into a
//! small set of normalised commands, and spreads those commands over a
//! configurable set of actuators.
//!
//! ## Architecture
//!
//! - [`control`] - command state, sensitivity and the logical commands
//! - [`input`] - edge detection, the per-tick dispatcher and keyboard sources
//! - [`mixer`] - per-actuator deflection from role and gain
//! - [`actuation`] - the sink interface commands are pushed through
//! - [`config`] - TOML configuration
//! - [`app`] - the controller, its tokio worker and the terminal front end
//! - [`render`] - HUD rendering with ratatui
//! - [`error`] - centralized error types

// Core
pub mod control;
pub mod error;
pub mod input;
pub mod mixer;

pub mod actuation;
pub mod config;

// Front end
pub mod app;
pub mod render;

pub use error::{FlightCtlError, Result};

pub use actuation::{ActuationFrame, ActuationSink, WheelCommand};
pub use app::{Application, FlightController};
pub use config::{load_config, ControllerConfig};
pub use control::{CommandState, ControlCommand, Sensitivity, SharedSensitivity, Telemetry};
pub use input::{ButtonEdgeState, InputEdgeDispatcher, InputFrame};
pub use mixer::{Actuator, ControlRole, SurfaceMixer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
