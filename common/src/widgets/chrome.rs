//! Page chrome: title bar, screen dots and page pips.
//!
//! Dots along the bottom show which of the three screens is active; pips on
//! the right edge show the page within the screen.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;

use crate::colors::{DOT_INACTIVE, PIP_INACTIVE, WHITE};
use crate::config::{DOTS_Y, SCREEN_HEIGHT, SCREEN_WIDTH, TITLE_BAR_HEIGHT};
use crate::styles::{TITLE_STYLE, TOP_CENTER};

const TITLE_POS: Point = Point::new((SCREEN_WIDTH / 2) as i32, 1);
const TITLE_BAR_SIZE: Size = Size::new(SCREEN_WIDTH, TITLE_BAR_HEIGHT);

const DOT_RADIUS: i32 = 2;
const DOT_SPACING: i32 = 10;

const PIP_SIZE: Size = Size::new(4, 4);
const PIP_SPACING: i32 = 7;
const PIP_X: i32 = SCREEN_WIDTH as i32 - 5;

/// Draw the coloured title bar with a centred title.
pub fn draw_title_bar<D>(
    display: &mut D,
    title: &str,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::zero(), TITLE_BAR_SIZE)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();

    Text::with_text_style(title, TITLE_POS, TITLE_STYLE, TOP_CENTER)
        .draw(display)
        .ok();
}

/// Centre of screen dot `index` out of `total`, centred horizontally.
pub const fn dot_center(
    index: usize,
    total: usize,
) -> Point {
    let total = total as i32;
    let span = total * DOT_RADIUS * 2 + (total - 1) * (DOT_SPACING - DOT_RADIUS * 2);
    let start_x = (SCREEN_WIDTH as i32 - span) / 2;
    Point::new(start_x + index as i32 * DOT_SPACING + DOT_RADIUS, DOTS_Y)
}

/// Draw one dot per screen, the active one in white.
pub fn draw_screen_dots<D>(
    display: &mut D,
    active: usize,
    total: usize,
) where
    D: DrawTarget<Color = Rgb565>,
{
    for i in 0..total {
        let color = if i == active { WHITE } else { DOT_INACTIVE };
        Circle::with_center(dot_center(i, total), (DOT_RADIUS * 2 + 1) as u32)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

/// Top-left corner of page pip `index` out of `total`, centred vertically.
pub const fn pip_origin(
    index: usize,
    total: usize,
) -> Point {
    let total = total as i32;
    let pip_h = PIP_SIZE.height as i32 - 1;
    let span = total * pip_h + (total - 1) * (PIP_SPACING - pip_h);
    let start_y = (SCREEN_HEIGHT as i32 - span) / 2;
    Point::new(PIP_X, start_y + index as i32 * PIP_SPACING)
}

/// Draw one pip per page on the right edge, the active one in white.
pub fn draw_page_pips<D>(
    display: &mut D,
    active: usize,
    total: usize,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if total < 2 {
        return;
    }
    for i in 0..total {
        let color = if i == active { WHITE } else { PIP_INACTIVE };
        RoundedRectangle::with_equal_corners(Rectangle::new(pip_origin(i, total), PIP_SIZE), Size::new(1, 1))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}
