//! Shared command-state data model.
//!
//! The input tick writes a [`CommandState`]; the surface mixer and actuation sink read
//! it. Tuning lives in [`Sensitivity`], shared through [`SharedSensitivity`] so it can be
//! changed between ticks.

pub mod command;
pub mod state;
pub mod tuning;

pub use command::{CommandSet, ControlCommand};
pub use state::{BrakeStatus, CommandState, Telemetry, DEFAULT_FLAP_DEPLOYED};
pub use tuning::{Sensitivity, SharedSensitivity, DEFAULT_SENSITIVITY};
