//! Hardware boundaries of the dashboard.
//!
//! The core never talks to SPI or GPIO itself. The host binary implements
//! these traits over the real panel and buttons; tests and the simulator
//! implement them in memory.

use crate::framebuffer::Framebuffer;
use crate::input::LineLevels;

/// A display that shows full frames and has a switchable backlight.
pub trait Panel {
    type Error;

    /// Send a complete frame to the panel.
    fn push_frame(
        &mut self,
        frame: &Framebuffer,
    ) -> Result<(), Self::Error>;

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), Self::Error>;
}

/// The eight digital input lines, sampled on demand.
pub trait InputLines {
    type Error;

    /// Current raw level of every line, decoded to "pressed" / "released".
    fn sample(&mut self) -> Result<LineLevels, Self::Error>;
}
