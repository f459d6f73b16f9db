//! Low-level drawing primitives shared across pages.
//!
//! Every primitive is split in two: a pure function that turns values into
//! geometry or a colour category (unit-tested without a display), and a
//! `draw_*` function that paints that result onto any `DrawTarget`.
//! Thresholds and colours are passed in by the page; nothing here decides
//! what "too hot" means.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;
use heapless::Vec;

use crate::colors::{BAR_TRACK, CRIT_RED, OK_GREEN, SPARK_BACKGROUND, WARN_YELLOW, WHITE};
use crate::config::{CONTENT_LEFT, CONTENT_RIGHT, HISTORY_SIZE};
use crate::history::is_gap;
use crate::styles::{LABEL_STYLE, SMALL_FONT, TOP_LEFT};
use crate::thresholds::{Severity, TEMPERATURE, Thresholds, UTILISATION};

// =============================================================================
// Severity Palette
// =============================================================================

/// Colour per severity category.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub normal: Rgb565,
    pub warning: Rgb565,
    pub critical: Rgb565,
}

impl Palette {
    pub const fn new(
        normal: Rgb565,
        warning: Rgb565,
        critical: Rgb565,
    ) -> Self {
        Self { normal, warning, critical }
    }

    #[inline]
    pub const fn color(
        &self,
        severity: Severity,
    ) -> Rgb565 {
        match severity {
            Severity::Normal => self.normal,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }
}

/// Green / yellow / red.
pub const STATUS_PALETTE: Palette = Palette::new(OK_GREEN, WARN_YELLOW, CRIT_RED);

/// Red when `alert` holds, green otherwise.
#[inline]
pub const fn status_color(alert: bool) -> Rgb565 { if alert { CRIT_RED } else { OK_GREEN } }

// =============================================================================
// Color-coded Bar
// =============================================================================

/// Domain and breakpoints of a progress bar.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BarSpec {
    pub min: f32,
    pub max: f32,
    pub thresholds: Thresholds,
}

/// Result of evaluating a value against a [`BarSpec`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BarReading {
    /// Filled share of the bar, `0.0..=1.0`.
    pub fraction: f32,
    pub severity: Severity,
}

impl BarSpec {
    pub const fn new(
        min: f32,
        max: f32,
        thresholds: Thresholds,
    ) -> Self {
        Self { min, max, thresholds }
    }

    /// Fill fraction (clamped to the domain) and severity of `value`.
    pub fn evaluate(
        &self,
        value: f32,
    ) -> BarReading {
        let range = self.max - self.min;
        let fraction = if range > 0.0 && !value.is_nan() {
            ((value - self.min) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        BarReading {
            fraction,
            severity: self.thresholds.severity(value),
        }
    }
}

impl BarReading {
    /// Filled width in pixels for a bar `width` pixels wide.
    #[inline]
    pub fn fill_width(
        &self,
        width: u32,
    ) -> u32 {
        (width as f32 * self.fraction) as u32
    }
}

/// 0..100 % with the utilisation breakpoints.
pub const PERCENT_BAR: BarSpec = BarSpec::new(0.0, 100.0, UTILISATION);

/// 0..100 C with the temperature breakpoints.
pub const TEMPERATURE_BAR: BarSpec = BarSpec::new(0.0, 100.0, TEMPERATURE);

/// Draw a rounded progress bar: the track, then the filled share on top.
pub fn draw_bar<D>(
    display: &mut D,
    top_left: Point,
    size: Size,
    reading: BarReading,
    palette: &Palette,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let radius = size.height / 2;
    RoundedRectangle::with_equal_corners(Rectangle::new(top_left, size), Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(BAR_TRACK))
        .draw(display)
        .ok();

    let fill_w = reading.fill_width(size.width);
    if fill_w == 0 {
        return;
    }
    let fill_radius = radius.min(fill_w / 2);
    RoundedRectangle::with_equal_corners(
        Rectangle::new(top_left, Size::new(fill_w, size.height)),
        Size::new(fill_radius, fill_radius),
    )
    .into_styled(PrimitiveStyle::with_fill(palette.color(reading.severity)))
    .draw(display)
    .ok();
}

// =============================================================================
// Sparkline
// =============================================================================

/// Vertical scaling of a sparkline.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SparkScale {
    /// Min-max of the real samples currently in the window.
    Auto,
    /// Fixed domain; samples outside it are clamped to the edge.
    Fixed { min: f32, max: f32 },
}

/// One plotted sample: its position in the input and its pixel, relative to
/// the sparkline's top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SparkPoint {
    pub index: usize,
    pub point: Point,
}

pub type SparkPoints = Vec<SparkPoint, HISTORY_SIZE>;

/// Lay out `samples` (oldest first) inside a `size` box.
///
/// Gap samples keep their slot on the x axis but produce no point. Fewer than
/// two real samples, or a box too small to draw a line in, yields no points.
/// Only the most recent `HISTORY_SIZE` samples are considered.
pub fn sparkline_points(
    samples: &[f32],
    size: Size,
    scale: SparkScale,
) -> SparkPoints {
    let mut points = SparkPoints::new();
    let samples = &samples[samples.len().saturating_sub(HISTORY_SIZE)..];

    let mut count = 0usize;
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for sample in samples.iter().copied().filter(|s| !is_gap(*s)) {
        count += 1;
        lo = lo.min(sample);
        hi = hi.max(sample);
    }
    if count < 2 || size.width < 2 || size.height < 2 {
        return points;
    }

    let (lo, hi) = match scale {
        SparkScale::Auto => (lo, hi),
        SparkScale::Fixed { min, max } => (min, max),
    };
    let range = hi - lo;
    let max_x = (size.width - 1) as f32;
    let max_y = (size.height - 1) as f32;
    let last_index = (samples.len() - 1) as f32;

    for (index, sample) in samples.iter().copied().enumerate() {
        if is_gap(sample) {
            continue;
        }
        // A flat series sits on the midline
        let norm = if range > 0.0 {
            ((sample - lo) / range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let x = (index as f32 * max_x / last_index + 0.5) as i32;
        let y = (max_y - norm * max_y + 0.5) as i32;
        let _ = points.push(SparkPoint {
            index,
            point: Point::new(x, y),
        });
    }
    points
}

/// Draw a sparkline with its background box. Runs of consecutive samples are
/// joined; a gap breaks the line.
pub fn draw_sparkline<D>(
    display: &mut D,
    area: Rectangle,
    samples: &[f32],
    scale: SparkScale,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_fill(SPARK_BACKGROUND))
        .draw(display)
        .ok();

    let points = sparkline_points(samples, area.size, scale);
    let origin = area.top_left;
    let line_style = PrimitiveStyle::with_stroke(color, 1);

    for p in &points {
        Pixel(origin + p.point, color).draw(display).ok();
    }
    for pair in points.windows(2) {
        if pair[1].index == pair[0].index + 1 {
            Line::new(origin + pair[0].point, origin + pair[1].point)
                .into_styled(line_style)
                .draw(display)
                .ok();
        }
    }
}

// =============================================================================
// Status Line
// =============================================================================

/// Gap between a label and its value.
const LABEL_GAP: i32 = 3;

/// Width of `text` in a monospaced font.
#[inline]
pub fn text_width(
    text: &str,
    font: &MonoFont,
) -> i32 {
    let advance = font.character_size.width + font.character_spacing;
    (text.chars().count() as u32 * advance) as i32
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(
    text: &str,
    max_chars: usize,
) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A `LABEL: value` row in the body font.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StatusLine<'a> {
    label: &'a str,
    value: &'a str,
    color: Rgb565,
}

impl<'a> StatusLine<'a> {
    /// A row with a white value.
    pub const fn new(
        label: &'a str,
        value: &'a str,
    ) -> Self {
        Self {
            label,
            value,
            color: WHITE,
        }
    }

    /// Override the value colour.
    pub const fn with_color(
        self,
        color: Rgb565,
    ) -> Self {
        Self { color, ..self }
    }

    /// Colour the value red when `alert` holds, green otherwise.
    pub const fn alert_if(
        self,
        alert: bool,
    ) -> Self {
        self.with_color(status_color(alert))
    }

    #[inline]
    pub const fn value_color(&self) -> Rgb565 { self.color }

    /// Left edge of the value text.
    pub fn value_x(&self) -> i32 { CONTENT_LEFT + text_width(self.label, SMALL_FONT) + LABEL_GAP }

    /// The value, cut to what fits before the content edge.
    pub fn visible_value(&self) -> &'a str {
        let advance = (SMALL_FONT.character_size.width + SMALL_FONT.character_spacing) as i32;
        let room = (CONTENT_RIGHT - self.value_x()).max(0) / advance;
        truncate_chars(self.value, room as usize)
    }

    pub fn draw<D>(
        &self,
        display: &mut D,
        y: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        Text::with_text_style(self.label, Point::new(CONTENT_LEFT, y), LABEL_STYLE, TOP_LEFT)
            .draw(display)
            .ok();
        Text::with_text_style(
            self.visible_value(),
            Point::new(self.value_x(), y),
            MonoTextStyle::new(SMALL_FONT, self.color),
            TOP_LEFT,
        )
        .draw(display)
        .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::GAP;

    #[test]
    fn test_temperature_bar_categories() {
        assert_eq!(TEMPERATURE_BAR.evaluate(49.0).severity, Severity::Normal);
        assert_eq!(TEMPERATURE_BAR.evaluate(50.0).severity, Severity::Warning);
        assert_eq!(TEMPERATURE_BAR.evaluate(71.0).severity, Severity::Critical);
    }

    #[test]
    fn test_bar_fraction_clamped() {
        assert_eq!(PERCENT_BAR.evaluate(25.0).fraction, 0.25);
        assert_eq!(PERCENT_BAR.evaluate(-10.0).fraction, 0.0);
        assert_eq!(PERCENT_BAR.evaluate(150.0).fraction, 1.0);
        assert_eq!(PERCENT_BAR.evaluate(f32::NAN).fraction, 0.0);
    }

    #[test]
    fn test_bar_custom_domain() {
        let spec = BarSpec::new(20.0, 40.0, Thresholds::new(30.0, 35.0));
        let reading = spec.evaluate(25.0);
        assert_eq!(reading.fraction, 0.25);
        assert_eq!(reading.fill_width(100), 25);
        assert_eq!(spec.evaluate(35.0).severity, Severity::Critical);
    }

    #[test]
    fn test_palette_maps_severity() {
        assert_eq!(STATUS_PALETTE.color(Severity::Normal), OK_GREEN);
        assert_eq!(STATUS_PALETTE.color(Severity::Warning), WARN_YELLOW);
        assert_eq!(STATUS_PALETTE.color(Severity::Critical), CRIT_RED);
    }

    #[test]
    fn test_sparkline_needs_two_real_samples() {
        let size = Size::new(100, 20);
        assert!(sparkline_points(&[], size, SparkScale::Auto).is_empty());
        assert!(sparkline_points(&[5.0], size, SparkScale::Auto).is_empty());
        assert!(sparkline_points(&[GAP, 5.0, GAP], size, SparkScale::Auto).is_empty());
    }

    #[test]
    fn test_sparkline_min_max_normalized() {
        let points = sparkline_points(&[10.0, 20.0, 15.0], Size::new(11, 11), SparkScale::Auto);
        assert_eq!(points.len(), 3);
        // Min at the bottom, max at the top, x spread edge to edge
        assert_eq!(points[0].point, Point::new(0, 10));
        assert_eq!(points[1].point, Point::new(5, 0));
        assert_eq!(points[2].point, Point::new(10, 5));
    }

    #[test]
    fn test_sparkline_skips_gaps() {
        let points = sparkline_points(&[GAP, 0.0, GAP, 10.0], Size::new(31, 11), SparkScale::Auto);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].index, 1);
        assert_eq!(points[1].index, 3);
        // Gap is skipped, not plotted as zero: the real zero is the minimum
        assert_eq!(points[0].point, Point::new(10, 10));
        assert_eq!(points[1].point, Point::new(30, 0));
    }

    #[test]
    fn test_sparkline_flat_series_on_midline() {
        let points = sparkline_points(&[3.0, 3.0, 3.0], Size::new(10, 11), SparkScale::Auto);
        assert!(points.iter().all(|p| p.point.y == 5));
    }

    #[test]
    fn test_sparkline_fixed_scale_clamps() {
        let scale = SparkScale::Fixed { min: 0.0, max: 100.0 };
        let points = sparkline_points(&[-50.0, 50.0, 150.0], Size::new(3, 11), scale);
        assert_eq!(points[0].point.y, 10);
        assert_eq!(points[1].point.y, 5);
        assert_eq!(points[2].point.y, 0);
    }

    #[test]
    fn test_status_line_alert_colors() {
        assert_eq!(StatusLine::new("ERRORS:", "0").alert_if(false).value_color(), OK_GREEN);
        assert_eq!(StatusLine::new("ERRORS:", "3").alert_if(true).value_color(), CRIT_RED);
        assert_eq!(StatusLine::new("HOST:", "pi").value_color(), WHITE);
    }

    #[test]
    fn test_status_line_value_position() {
        // "IP:" is 3 cells of 6px, plus the 3px gap
        assert_eq!(StatusLine::new("IP:", "x").value_x(), CONTENT_LEFT + 18 + 3);
    }

    #[test]
    fn test_status_line_truncates_long_values() {
        let line = StatusLine::new("HOST:", "a-very-long-hostname-indeed");
        let visible = line.visible_value();
        assert!(line.value_x() + text_width(visible, SMALL_FONT) <= CONTENT_RIGHT);
        assert!(visible.len() < "a-very-long-hostname-indeed".len());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("systemd-journald", 14), "systemd-journa");
        assert_eq!(truncate_chars("sshd", 14), "sshd");
    }
}
