//! Color theme for the HUD using ratatui colors directly.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for HUD elements
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// Block titles and labels
    pub label: Style,

    pub brake_on: Style,
    pub brake_off: Style,

    /// Actuators the mixer skipped
    pub skipped: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Warnings such as a failed reload
    pub warning: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None,
            label: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            brake_on: Style::default().fg(Color::Black).bg(Color::Red),
            brake_off: Style::default().fg(Color::Green),
            skipped: Style::default().fg(Color::DarkGray),
            status_bg: Color::Blue,
            status_fg: Color::White,
            warning: Color::Yellow,
        }
    }
}

impl ColorTheme {
    /// Theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            normal_text: None,
            label: Style::default().add_modifier(Modifier::BOLD),
            brake_on: Style::default().add_modifier(Modifier::REVERSED),
            brake_off: Style::default(),
            skipped: Style::default().add_modifier(Modifier::DIM),
            status_bg: Color::Black,
            status_fg: Color::White,
            warning: Color::White,
        }
    }

    pub fn text(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
