//! HUD renderer trait
//!
//! Defines the `HudRenderer` trait the application drives, along with its
//! lifecycle hooks.

use crate::error::Result;
use crate::render::view::HudView;

/// Core trait for HUD rendering
pub trait HudRenderer {
    /// Draw the current view
    fn render(&mut self, view: &HudView) -> Result<()>;

    /// Take over the terminal
    ///
    /// This method should:
    /// - Set up raw mode
    /// - Enter the alternate screen
    /// - Ask for key release reporting where the terminal supports it
    fn initialize(&mut self) -> Result<()>;

    /// Restore the terminal to the state `initialize` found it in
    fn cleanup(&mut self) -> Result<()>;

    /// Whether key release events will be delivered after `initialize`
    fn reports_key_release(&self) -> bool;
}
