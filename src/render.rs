//! HUD rendering.
//!
//! [`HudView`] holds what is shown, [`HudRenderer`] is the seam the application
//! drives, and [`TerminalHud`] is the ratatui implementation.

pub mod renderer;
pub mod terminal;
pub mod theme;
pub mod view;

pub use renderer::HudRenderer;
pub use terminal::{draw_hud, TerminalHud};
pub use theme::ColorTheme;
pub use view::{HudView, SurfaceRow};

#[cfg(test)]
pub use renderer::tests::MockHudRenderer;
