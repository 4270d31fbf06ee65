//! Level-to-edge conversion for held buttons.

use crate::control::ControlCommand;

/// One "currently latched" flag per logical command.
///
/// A latch goes up on the tick its button goes from released to held (that is the
/// tick the command fires) and comes down on the first tick the button reads as
/// released. Holding the button keeps the latch up without firing again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdgeState {
    latched: [bool; ControlCommand::COUNT],
}

impl ButtonEdgeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's level for `command`; returns true on a rising edge.
    ///
    /// Must run every tick for every command, whether or not another channel fired,
    /// so releases are never missed.
    pub fn observe(&mut self, command: ControlCommand, held: bool) -> bool {
        let latch = &mut self.latched[command.index()];
        let rising = held && !*latch;
        *latch = held;
        rising
    }

    #[cfg(test)]
    pub fn is_latched(&self, command: ControlCommand) -> bool {
        self.latched[command.index()]
    }
}
