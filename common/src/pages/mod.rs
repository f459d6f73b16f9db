//! The nine dashboard pages.
//!
//! Every page implements [`Page`]: `refresh` pulls fresh values from a
//! [`MetricSource`] and caches them (plus any history or rate baselines the
//! page owns), and `draw` paints the cached values. Drawing never touches a
//! source, so a slow or failing metric can only delay a refresh, never a
//! frame. Missing values are drawn as [`NOT_AVAILABLE`] on the affected row.
//!
//! The pages are stored in a [`PageSet`], one per grid position, and
//! dispatched through the [`PageSlot`] enum rather than trait objects.
//!
//! | | Page 0 | Page 1 | Page 2 |
//! |-|--------|--------|--------|
//! | CPU | [`CpuOverviewPage`] | [`ThrottlePage`] | [`CpuHistoryPage`] |
//! | Network | [`IdentityPage`] | [`TrafficPage`] | [`WifiPage`] |
//! | Resources | [`ResourceOverviewPage`] | [`MemoryPage`] | [`ProcessesPage`] |

mod cpu;
mod network;
mod resources;

pub use cpu::{CpuHistoryPage, CpuOverviewPage, ThrottlePage};
pub use network::{IdentityPage, TrafficPage, WifiPage};
pub use resources::{MemoryPage, ProcessesPage, ResourceOverviewPage, format_uptime};

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::BACKGROUND;
use crate::config::{PAGES_PER_SCREEN, SCREEN_COUNT};
use crate::metrics::{Label, MetricSource};
use crate::navigation::Position;
use crate::widgets::{draw_page_pips, draw_screen_dots, draw_title_bar};

/// Placeholder for a value that could not be read.
pub const NOT_AVAILABLE: &str = "N/A";

/// Contract shared by all pages.
pub trait Page {
    /// Pull fresh values from `source` and update cached state.
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    );

    /// Draw the page body (below the title bar) from cached state.
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    );
}

/// One of the nine pages.
#[allow(clippy::large_enum_variant)]
pub enum PageSlot {
    CpuOverview(CpuOverviewPage),
    Throttle(ThrottlePage),
    CpuHistory(CpuHistoryPage),
    Identity(IdentityPage),
    Traffic(TrafficPage),
    Wifi(WifiPage),
    ResourceOverview(ResourceOverviewPage),
    Memory(MemoryPage),
    Processes(ProcessesPage),
}

impl PageSlot {
    /// Fresh page for a grid position.
    pub fn for_position(position: Position) -> Self {
        match (position.screen(), position.page()) {
            (0, 0) => Self::CpuOverview(CpuOverviewPage::default()),
            (0, 1) => Self::Throttle(ThrottlePage::default()),
            (0, _) => Self::CpuHistory(CpuHistoryPage::default()),
            (1, 0) => Self::Identity(IdentityPage::default()),
            (1, 1) => Self::Traffic(TrafficPage::default()),
            (1, _) => Self::Wifi(WifiPage::default()),
            (_, 0) => Self::ResourceOverview(ResourceOverviewPage::default()),
            (_, 1) => Self::Memory(MemoryPage::default()),
            (_, _) => Self::Processes(ProcessesPage::default()),
        }
    }

    /// Short name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CpuOverview(_) => "cpu-overview",
            Self::Throttle(_) => "throttle",
            Self::CpuHistory(_) => "cpu-history",
            Self::Identity(_) => "identity",
            Self::Traffic(_) => "traffic",
            Self::Wifi(_) => "wifi",
            Self::ResourceOverview(_) => "resources",
            Self::Memory(_) => "memory",
            Self::Processes(_) => "processes",
        }
    }
}

impl Page for PageSlot {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) {
        match self {
            Self::CpuOverview(p) => p.refresh(source, now_ms),
            Self::Throttle(p) => p.refresh(source, now_ms),
            Self::CpuHistory(p) => p.refresh(source, now_ms),
            Self::Identity(p) => p.refresh(source, now_ms),
            Self::Traffic(p) => p.refresh(source, now_ms),
            Self::Wifi(p) => p.refresh(source, now_ms),
            Self::ResourceOverview(p) => p.refresh(source, now_ms),
            Self::Memory(p) => p.refresh(source, now_ms),
            Self::Processes(p) => p.refresh(source, now_ms),
        }
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        match self {
            Self::CpuOverview(p) => p.draw(display),
            Self::Throttle(p) => p.draw(display),
            Self::CpuHistory(p) => p.draw(display),
            Self::Identity(p) => p.draw(display),
            Self::Traffic(p) => p.draw(display),
            Self::Wifi(p) => p.draw(display),
            Self::ResourceOverview(p) => p.draw(display),
            Self::Memory(p) => p.draw(display),
            Self::Processes(p) => p.draw(display),
        }
    }
}

/// All nine pages, created once and kept for the life of the process.
pub struct PageSet {
    pages: [PageSlot; SCREEN_COUNT * PAGES_PER_SCREEN],
}

impl PageSet {
    pub fn new() -> Self {
        Self {
            pages: core::array::from_fn(|i| PageSlot::for_position(Position::from_linear(i))),
        }
    }

    #[inline]
    pub fn get(
        &self,
        position: Position,
    ) -> &PageSlot {
        &self.pages[position.linear()]
    }

    #[inline]
    pub fn get_mut(
        &mut self,
        position: Position,
    ) -> &mut PageSlot {
        &mut self.pages[position.linear()]
    }
}

impl Default for PageSet {
    fn default() -> Self { Self::new() }
}

/// Draw a complete frame for `page` at `position`: background, title bar,
/// page body, screen dots and page pips.
pub fn render_frame<D>(
    display: &mut D,
    position: Position,
    page: &PageSlot,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let screen = position.screen_kind();
    display.clear(BACKGROUND).ok();
    draw_title_bar(display, screen.title(), screen.header_color());
    page.draw(display);
    draw_screen_dots(display, position.screen(), SCREEN_COUNT);
    draw_page_pips(display, position.page(), PAGES_PER_SCREEN);
}

// =============================================================================
// Shared Drawing Helpers
// =============================================================================

/// Cached text value or the placeholder.
#[inline]
pub(crate) fn or_na(value: &Option<Label>) -> &str { value.as_deref().unwrap_or(NOT_AVAILABLE) }

/// Draw `text` in `font` and `color` at `(x, y)`.
#[inline]
pub(crate) fn draw_text<D>(
    display: &mut D,
    text: &str,
    x: i32,
    y: i32,
    font: &MonoFont<'static>,
    color: Rgb565,
    align: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_text_style(text, Point::new(x, y), MonoTextStyle::new(font, color), align)
        .draw(display)
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{CPU_HEADER, RESOURCES_HEADER, WHITE};
    use crate::demo::SyntheticSource;
    use crate::framebuffer::Framebuffer;
    use crate::widgets::{dot_center, pip_origin};

    #[test]
    fn test_page_set_layout() {
        let pages = PageSet::new();
        assert_eq!(pages.get(Position::new(0, 0)).name(), "cpu-overview");
        assert_eq!(pages.get(Position::new(0, 2)).name(), "cpu-history");
        assert_eq!(pages.get(Position::new(1, 1)).name(), "traffic");
        assert_eq!(pages.get(Position::new(2, 2)).name(), "processes");
    }

    #[test]
    fn test_render_frame_chrome() {
        let mut frame = Framebuffer::new();
        let pages = PageSet::new();
        let position = Position::new(2, 1);
        render_frame(&mut frame, position, pages.get(position));

        assert_eq!(frame.pixel(0, 0), Some(RESOURCES_HEADER));
        assert_eq!(frame.pixel(0, 60), Some(BACKGROUND));
        let dot = dot_center(2, SCREEN_COUNT);
        assert_eq!(frame.pixel(dot.x as u32, dot.y as u32), Some(WHITE));
        let pip = pip_origin(1, PAGES_PER_SCREEN) + Point::new(1, 1);
        assert_eq!(frame.pixel(pip.x as u32, pip.y as u32), Some(WHITE));
    }

    #[test]
    fn test_every_page_renders_with_and_without_data() {
        let mut source = SyntheticSource::new();
        let mut pages = PageSet::new();
        for i in 0..SCREEN_COUNT * PAGES_PER_SCREEN {
            let position = Position::from_linear(i);
            let mut empty = Framebuffer::new();
            render_frame(&mut empty, position, pages.get(position));

            pages.get_mut(position).refresh(&mut source, 0);
            source.set_clock(2_000);
            pages.get_mut(position).refresh(&mut source, 2_000);
            let mut full = Framebuffer::new();
            render_frame(&mut full, position, pages.get(position));

            assert_ne!(empty, full, "page {i} must show its data");
        }
    }

    #[test]
    fn test_title_colors_follow_screen() {
        let mut frame = Framebuffer::new();
        let pages = PageSet::new();
        render_frame(&mut frame, Position::new(0, 2), pages.get(Position::new(0, 2)));
        assert_eq!(frame.pixel(127, 0), Some(CPU_HEADER));
    }
}
