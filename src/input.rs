//! Input subsystem.
//!
//! Raw terminal events are collected in [`raw`], folded into per-tick [`InputFrame`]s by
//! [`keyboard`], and turned into one-shot command firings by [`InputEdgeDispatcher`].

pub mod dispatcher;
pub mod edge;
pub mod frame;
pub mod keyboard;
pub mod raw;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::input` rather than reaching into submodules.
pub use dispatcher::{DispatchOutcome, InputEdgeDispatcher};
pub use edge::ButtonEdgeState;
pub use frame::{AxisSample, AxisSource, ButtonSource, InputFrame, KeyEventSource, NoButtons};
pub use keyboard::{parse_key, AxisKeys, KeyBindings, KeyboardInput};
pub use raw::{RawInputCollector, RawInputEvent};
