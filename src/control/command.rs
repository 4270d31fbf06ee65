//! Logical one-shot commands and a compact set type for per-tick channel samples.

use std::fmt;

/// Discrete commands that fire once per physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    ThrustDown,
    ThrustUp,
    BrakeToggle,
    FlapToggle,
}

impl ControlCommand {
    pub const COUNT: usize = 4;

    pub const ALL: [ControlCommand; Self::COUNT] = [
        ControlCommand::ThrustDown,
        ControlCommand::ThrustUp,
        ControlCommand::BrakeToggle,
        ControlCommand::FlapToggle,
    ];

    /// Dense index used by [`CommandSet`] and the edge latch table.
    pub const fn index(self) -> usize {
        match self {
            ControlCommand::ThrustDown => 0,
            ControlCommand::ThrustUp => 1,
            ControlCommand::BrakeToggle => 2,
            ControlCommand::FlapToggle => 3,
        }
    }

    /// Name used in the `[bindings]` configuration table.
    pub fn config_name(self) -> &'static str {
        match self {
            ControlCommand::ThrustDown => "thrust_down",
            ControlCommand::ThrustUp => "thrust_up",
            ControlCommand::BrakeToggle => "brake_toggle",
            ControlCommand::FlapToggle => "flap_toggle",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Set of commands, one bit per [`ControlCommand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandSet(u8);

impl CommandSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, command: ControlCommand) {
        self.0 |= 1 << command.index();
    }

    pub fn contains(&self, command: ControlCommand) -> bool {
        self.0 & (1 << command.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ControlCommand> + '_ {
        ControlCommand::ALL
            .into_iter()
            .filter(move |command| self.contains(*command))
    }
}

impl FromIterator<ControlCommand> for CommandSet {
    fn from_iter<I: IntoIterator<Item = ControlCommand>>(iter: I) -> Self {
        let mut set = CommandSet::empty();
        for command in iter {
            set.insert(command);
        }
        set
    }
}
