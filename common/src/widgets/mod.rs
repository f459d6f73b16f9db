//! Widget components for the dashboard display.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod chrome;
mod primitives;

pub use chrome::{dot_center, draw_page_pips, draw_screen_dots, draw_title_bar, pip_origin};
pub use primitives::{
    BarReading,
    BarSpec,
    PERCENT_BAR,
    Palette,
    STATUS_PALETTE,
    SparkPoint,
    SparkPoints,
    SparkScale,
    StatusLine,
    TEMPERATURE_BAR,
    draw_bar,
    draw_sparkline,
    sparkline_points,
    status_color,
    text_width,
    truncate_chars,
};
