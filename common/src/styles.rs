//! Pre-computed static text styles.
//!
//! All text is positioned by its top edge, matching the row-based layout of
//! the pages (`y` is where the glyph cell starts, not the baseline).
//!
//! # Dynamic Color Styles
//!
//! Values are colour-coded per reading, so the fonts are exposed on their own
//! and callers build `MonoTextStyle::new(SMALL_FONT, color)` as needed.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_5X8, FONT_6X10, FONT_6X13_BOLD},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_10_POINT;

use crate::colors::{LABEL, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, top-anchored text. The default for labels and values.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Centered, top-anchored text. Used for the title bar.
pub const TOP_CENTER: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, top-anchored text. Used for values pinned to the content edge.
pub const TOP_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Font References
// =============================================================================

/// Body font for label/value rows (6x10).
pub const SMALL_FONT: &MonoFont = &FONT_6X10;

/// Dense font for lists and sparkline captions (5x8).
pub const TINY_FONT: &MonoFont = &FONT_5X8;

/// Large font for headline values.
pub const LARGE_FONT: &MonoFont = &PROFONT_10_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// White bold title text.
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X13_BOLD, WHITE);

/// Muted label text in the body font.
pub const LABEL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, LABEL);

