//! Sensitivity gains and the shared handle collaborators use to retune them.

use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// Default gain for every axis and the thrust step.
pub const DEFAULT_SENSITIVITY: f32 = 0.2;

/// Per-axis gains plus the size of one thrust step.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sensitivity {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    pub thrust_step: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_SENSITIVITY,
            roll: DEFAULT_SENSITIVITY,
            yaw: DEFAULT_SENSITIVITY,
            thrust_step: DEFAULT_SENSITIVITY,
        }
    }
}

/// Sensitivity shared between the control loop and whoever reconfigures it.
///
/// The loop takes a fresh [`SharedSensitivity::current`] snapshot on every tick and
/// never keeps one across ticks.
#[derive(Debug, Clone, Default)]
pub struct SharedSensitivity {
    inner: Arc<RwLock<Sensitivity>>,
}

impl SharedSensitivity {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            inner: Arc::new(RwLock::new(sensitivity)),
        }
    }

    pub fn current(&self) -> Sensitivity {
        *self.inner.read()
    }

    pub fn replace(&self, sensitivity: Sensitivity) {
        *self.inner.write() = sensitivity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_tuning() {
        let s = Sensitivity::default();
        assert_eq!(s.pitch, 0.2);
        assert_eq!(s.roll, 0.2);
        assert_eq!(s.yaw, 0.2);
        assert_eq!(s.thrust_step, 0.2);
    }

    #[test]
    fn clones_observe_replacement() {
        let shared = SharedSensitivity::new(Sensitivity::default());
        let loop_side = shared.clone();

        shared.replace(Sensitivity {
            pitch: 0.5,
            ..Sensitivity::default()
        });

        assert_eq!(loop_side.current().pitch, 0.5);
    }
}
