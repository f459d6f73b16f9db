//! Color constants for the dashboard.
//!
//! Values are authored as 8-bit RGB triples and packed to RGB565 at compile
//! time with [`rgb`], so the palette reads like the design it came from.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Pack an 8-bit-per-channel color into RGB565.
#[inline]
pub const fn rgb(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Chrome
// =============================================================================

/// Pure white. Title text and active indicators.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Page background, a dark navy.
pub const BACKGROUND: Rgb565 = rgb(26, 26, 46);

/// Inactive screen dot.
pub const DOT_INACTIVE: Rgb565 = rgb(80, 80, 100);

/// Inactive page pip.
pub const PIP_INACTIVE: Rgb565 = rgb(60, 60, 80);

/// Unfilled part of a progress bar.
pub const BAR_TRACK: Rgb565 = rgb(50, 50, 70);

/// Sparkline plot background.
pub const SPARK_BACKGROUND: Rgb565 = rgb(40, 40, 60);

/// Muted label text.
pub const LABEL: Rgb565 = rgb(150, 150, 170);

/// Disabled or missing values.
pub const DIM: Rgb565 = rgb(100, 100, 120);

// =============================================================================
// Screen Header Colors
// =============================================================================

/// CPU screen title bar (royal blue).
pub const CPU_HEADER: Rgb565 = rgb(65, 105, 225);

/// Network screen title bar (green).
pub const NETWORK_HEADER: Rgb565 = rgb(0, 160, 100);

/// Resources screen title bar (orange).
pub const RESOURCES_HEADER: Rgb565 = rgb(220, 120, 0);

// =============================================================================
// Severity Colors
// =============================================================================

/// Normal range.
pub const OK_GREEN: Rgb565 = rgb(0, 200, 120);

/// Warning range.
pub const WARN_YELLOW: Rgb565 = rgb(255, 200, 0);

/// Critical range.
pub const CRIT_RED: Rgb565 = rgb(255, 60, 60);

// =============================================================================
// Value Accents
// =============================================================================

pub const INFO_BLUE: Rgb565 = rgb(100, 180, 255);
pub const SKY: Rgb565 = rgb(100, 200, 255);
pub const ICE: Rgb565 = rgb(180, 220, 255);
pub const TEAL: Rgb565 = rgb(0, 230, 180);
pub const SEAFOAM: Rgb565 = rgb(100, 220, 180);
pub const MINT: Rgb565 = rgb(100, 255, 200);
pub const SAND: Rgb565 = rgb(255, 220, 100);
pub const PEACH: Rgb565 = rgb(255, 180, 100);
pub const MIST: Rgb565 = rgb(200, 200, 220);
pub const PERIWINKLE: Rgb565 = rgb(180, 200, 255);
pub const VIOLET: Rgb565 = rgb(180, 160, 255);

/// "CURRENT" heading on the throttle page.
pub const AMBER_HEADING: Rgb565 = rgb(255, 200, 100);

/// "SINCE BOOT" heading on the throttle page.
pub const DUSK_HEADING: Rgb565 = rgb(180, 160, 120);

// =============================================================================
// Throttle Flag Colors
// =============================================================================

// Active flags are bright, since-boot flags are the same hue dimmed.
pub const FLAG_UNDER_VOLTAGE: Rgb565 = rgb(255, 60, 60);
pub const FLAG_FREQ_CAPPED: Rgb565 = rgb(255, 200, 0);
pub const FLAG_THROTTLED: Rgb565 = rgb(255, 100, 50);
pub const FLAG_SOFT_LIMIT: Rgb565 = rgb(255, 150, 0);
pub const FLAG_UNDER_VOLTAGE_BOOT: Rgb565 = rgb(180, 80, 80);
pub const FLAG_FREQ_CAPPED_BOOT: Rgb565 = rgb(180, 160, 60);
pub const FLAG_THROTTLED_BOOT: Rgb565 = rgb(180, 100, 70);
pub const FLAG_SOFT_LIMIT_BOOT: Rgb565 = rgb(180, 130, 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_packs_extremes() {
        assert_eq!(rgb(255, 255, 255), Rgb565::WHITE);
        assert_eq!(rgb(0, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_rgb_drops_low_bits() {
        let c = rgb(26, 26, 46);
        assert_eq!((c.r(), c.g(), c.b()), (3, 6, 5));
    }
}
