//! Terminal HUD implementation using ratatui
//!
//! Draws the command state and actuator table. Input is read elsewhere; this type
//! only owns the terminal modes it switches on.

use crate::control::BrakeStatus;
use crate::error::{FlightCtlError, Result};
use crate::render::renderer::HudRenderer;
use crate::render::theme::ColorTheme;
use crate::render::view::HudView;
use log::warn;
use ratatui::crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const HELP_TEXT: &str = ", . thrust  space brake  f flaps  arrows/q/e stick  r reload  esc quit";
// Repeated presses of one key inside the hold window count as autorepeat.
const NO_RELEASE_HINT: &str = "(no key release: tap slowly)";

/// Ratatui-backed HUD
pub struct TerminalHud {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
    keyboard_enhanced: bool,
}

impl TerminalHud {
    pub fn with_theme(theme: ColorTheme) -> Self {
        Self {
            terminal: None,
            theme,
            keyboard_enhanced: false,
        }
    }
}

/// Lay out and draw the whole HUD into `frame`.
pub fn draw_hud(frame: &mut Frame, view: &HudView, theme: &ColorTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_status(frame, chunks[0], view, theme);
    render_surfaces(frame, chunks[1], view, theme);
    render_footer(frame, chunks[2], view, theme);
}

fn render_status(frame: &mut Frame, area: Rect, view: &HudView, theme: &ColorTheme) {
    let brake_style = if view.telemetry.brake == BrakeStatus::On {
        theme.brake_on
    } else {
        theme.brake_off
    };

    let lines: Vec<Line> = view
        .status_lines()
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            let style = if idx == 1 { brake_style } else { theme.text() };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Controls", theme.label));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_surfaces(frame: &mut Frame, area: Rect, view: &HudView, theme: &ColorTheme) {
    let mut lines: Vec<Line> = view
        .surfaces
        .iter()
        .map(|row| {
            let (command, style) = match row.deflection {
                Some(deflection) => (format!("{deflection:+.3}"), theme.text()),
                None => ("skipped".to_string(), theme.skipped),
            };
            Line::from(Span::styled(
                format!(
                    "{:<16} {:<6} {:>6.2}  {:>8}",
                    row.name,
                    row.role.to_string(),
                    row.gain,
                    command
                ),
                style,
            ))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        format!(
            "thrust {:.2}  wheel brake {:.1}  wheel motor {:.2}",
            view.thrust_command, view.wheels.brake_torque, view.wheels.motor_torque
        ),
        theme.text(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Actuators", theme.label));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, view: &HudView, theme: &ColorTheme) {
    let base = Style::default().fg(theme.status_fg).bg(theme.status_bg);
    let line = match &view.message {
        Some(message) => Line::from(Span::styled(message.clone(), base.fg(theme.warning))),
        None if !view.level_channel => {
            Line::from(Span::styled(format!("{HELP_TEXT}  {NO_RELEASE_HINT}"), base))
        }
        None => Line::from(Span::styled(HELP_TEXT, base)),
    };
    frame.render_widget(Paragraph::new(line).style(base), area);
}

impl HudRenderer for TerminalHud {
    fn render(&mut self, view: &HudView) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal
                .draw(|frame| draw_hud(frame, view, theme))
                .map_err(|err| FlightCtlError::ui(format!("failed to draw HUD: {err}")))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        self.keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            warn!("terminal does not report key releases");
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)
            .map_err(|err| FlightCtlError::ui(format!("failed to open terminal: {err}")))?;
        terminal.hide_cursor()?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            if self.keyboard_enhanced {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
                self.keyboard_enhanced = false;
            }
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    fn reports_key_release(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl Drop for TerminalHud {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
