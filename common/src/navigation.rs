//! Screen/page navigation, backlight and demo auto-advance.
//!
//! The dashboard is a fixed 3x3 grid: three screens ([`Screen`]) of three
//! pages each. [`NavState`] is the only writer of the current position and
//! the backlight flag; it changes them in response to debounced buttons and
//! to the demo timer.
//!
//! | Input | Effect |
//! |-------|--------|
//! | LEFT / RIGHT | Previous / next screen, page kept, wraps |
//! | UP / DOWN | Previous / next page, screen kept, wraps |
//! | PRESS | Toggle backlight |
//! | KEY1 / KEY2 / KEY3 | Jump to screen 0 / 1 / 2, page 0 |

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::{CPU_HEADER, NETWORK_HEADER, RESOURCES_HEADER};
use crate::config::{PAGE_COUNT, PAGES_PER_SCREEN, SCREEN_COUNT};
use crate::input::Button;

/// Top-level screen of the dashboard.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Screen {
    /// Temperature, clocks, throttling and their history.
    #[default]
    Cpu,
    /// Identity, traffic and Wi-Fi link details.
    Network,
    /// Load, memory, storage and processes.
    Resources,
}

impl Screen {
    pub const ALL: [Self; SCREEN_COUNT] = [Self::Cpu, Self::Network, Self::Resources];

    /// Screen at `index`, wrapping.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        match index % SCREEN_COUNT {
            0 => Self::Cpu,
            1 => Self::Network,
            _ => Self::Resources,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Cpu => 0,
            Self::Network => 1,
            Self::Resources => 2,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Cpu => "CPU STATS",
            Self::Network => "NETWORK",
            Self::Resources => "RESOURCES",
        }
    }

    pub const fn header_color(self) -> Rgb565 {
        match self {
            Self::Cpu => CPU_HEADER,
            Self::Network => NETWORK_HEADER,
            Self::Resources => RESOURCES_HEADER,
        }
    }
}

/// A cell of the 3x3 grid. Both indices are always in range.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Position {
    screen: usize,
    page: usize,
}

impl Position {
    /// Position at (`screen`, `page`), each wrapped into range.
    #[inline]
    pub const fn new(
        screen: usize,
        page: usize,
    ) -> Self {
        Self {
            screen: screen % SCREEN_COUNT,
            page: page % PAGES_PER_SCREEN,
        }
    }

    #[inline]
    pub const fn screen(self) -> usize { self.screen }

    #[inline]
    pub const fn page(self) -> usize { self.page }

    #[inline]
    pub const fn screen_kind(self) -> Screen { Screen::from_index(self.screen) }

    /// Row-major index into the nine pages, `0..PAGE_COUNT`.
    #[inline]
    pub const fn linear(self) -> usize { self.screen * PAGES_PER_SCREEN + self.page }

    #[inline]
    pub const fn from_linear(index: usize) -> Self {
        let index = index % PAGE_COUNT;
        Self::new(index / PAGES_PER_SCREEN, index % PAGES_PER_SCREEN)
    }

    pub const fn next_screen(self) -> Self { Self::new(self.screen + 1, self.page) }

    pub const fn prev_screen(self) -> Self { Self::new(self.screen + SCREEN_COUNT - 1, self.page) }

    pub const fn next_page(self) -> Self { Self::new(self.screen, self.page + 1) }

    pub const fn prev_page(self) -> Self { Self::new(self.screen, self.page + PAGES_PER_SCREEN - 1) }

    /// Next page in reading order, wrapping from the last page of the last
    /// screen to the first page of the first.
    pub const fn advance(self) -> Self { Self::from_linear(self.linear() + 1) }
}

/// What an input did to the navigation state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavChange {
    /// The active page changed.
    Moved { from: Position, to: Position },
    /// The backlight was switched to the contained state.
    Backlight(bool),
    /// Nothing visible changed (e.g. KEY1 while already on screen 0, page 0).
    Unchanged,
}

/// Navigation state: position, backlight, demo mode and the demo idle timer.
#[derive(Clone, Debug)]
pub struct NavState {
    position: Position,
    backlight: bool,
    demo: bool,
    /// Last input or demo advance; demo mode advances once this is old enough.
    last_activity_ms: u64,
}

impl NavState {
    /// Initial state: screen 0, page 0, backlight on.
    pub const fn new(
        demo: bool,
        now_ms: u64,
    ) -> Self {
        Self {
            position: Position::new(0, 0),
            backlight: true,
            demo,
            last_activity_ms: now_ms,
        }
    }

    #[inline]
    pub const fn position(&self) -> Position { self.position }

    #[inline]
    pub const fn backlight(&self) -> bool { self.backlight }

    #[inline]
    pub const fn is_demo(&self) -> bool { self.demo }

    /// Apply a confirmed button press.
    ///
    /// Any press restarts the demo idle timer; it never leaves demo mode.
    pub fn apply(
        &mut self,
        button: Button,
        now_ms: u64,
    ) -> NavChange {
        self.last_activity_ms = now_ms;

        let from = self.position;
        let to = match button {
            Button::Left => from.prev_screen(),
            Button::Right => from.next_screen(),
            Button::Up => from.prev_page(),
            Button::Down => from.next_page(),
            Button::Key1 => Position::new(0, 0),
            Button::Key2 => Position::new(1, 0),
            Button::Key3 => Position::new(2, 0),
            Button::Press => {
                self.backlight = !self.backlight;
                return NavChange::Backlight(self.backlight);
            }
        };

        if to == from {
            return NavChange::Unchanged;
        }
        self.position = to;
        log::debug!("{}: page {} -> {}", button.name(), from.linear(), to.linear());
        NavChange::Moved { from, to }
    }

    /// Advance to the next page if demo mode is on and nothing happened for
    /// `interval_ms`. Returns the new position when it advanced.
    pub fn demo_tick(
        &mut self,
        now_ms: u64,
        interval_ms: u64,
    ) -> Option<Position> {
        if !self.demo || now_ms.saturating_sub(self.last_activity_ms) < interval_ms {
            return None;
        }
        self.last_activity_ms = now_ms;
        self.position = self.position.advance();
        Some(self.position)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
