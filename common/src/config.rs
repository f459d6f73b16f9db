//! Layout and timing configuration constants.
//!
//! Layout values describe the fixed 128x128 panel; timing values are in
//! milliseconds of the caller's monotonic clock.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7735S, 128x128 visible area).
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 128;

/// Number of top-level screens (CPU, network, resources).
pub const SCREEN_COUNT: usize = 3;

/// Number of pages inside every screen.
pub const PAGES_PER_SCREEN: usize = 3;

/// Total number of pages in the grid.
pub const PAGE_COUNT: usize = SCREEN_COUNT * PAGES_PER_SCREEN;

// =============================================================================
// Layout
// =============================================================================

/// Height of the coloured title bar.
pub const TITLE_BAR_HEIGHT: u32 = 14;

/// First row of page content below the title bar.
pub const CONTENT_TOP: i32 = 18;

/// Left margin of page content.
pub const CONTENT_LEFT: i32 = 4;

/// Usable content width (leaves room for the page pips on the right edge).
pub const CONTENT_WIDTH: u32 = 118;

/// Right edge of the content area, exclusive.
pub const CONTENT_RIGHT: i32 = CONTENT_LEFT + CONTENT_WIDTH as i32;

/// Height of progress bars.
pub const BAR_HEIGHT: u32 = 6;

/// Height of the large sparklines on the history page.
pub const SPARKLINE_HEIGHT: u32 = 30;

/// Vertical centre of the screen indicator dots.
pub const DOTS_Y: i32 = SCREEN_HEIGHT as i32 - 6;

const _: () = assert!(CONTENT_TOP > TITLE_BAR_HEIGHT as i32);
const _: () = assert!(CONTENT_RIGHT <= SCREEN_WIDTH as i32 - 5);

// =============================================================================
// History and Timing
// =============================================================================

/// Samples kept per sparkline history.
pub const HISTORY_SIZE: usize = 60;

/// Number of processes listed on the processes page.
pub const TOP_PROCESS_COUNT: usize = 4;

/// A raw line change must hold this long before it counts.
pub const DEBOUNCE_MS: u64 = 50;

/// Input poll cadence of the main loop.
pub const POLL_INTERVAL_MS: u64 = 20;

/// Data refresh cadence for the active page.
pub const REFRESH_INTERVAL_MS: u64 = 2_000;

/// Idle time before demo mode advances to the next page.
pub const DEMO_PAGE_INTERVAL_MS: u64 = 4_000;

// A press must survive at least two polls to be confirmed
const _: () = assert!(POLL_INTERVAL_MS < DEBOUNCE_MS);
const _: () = assert!(DEBOUNCE_MS < REFRESH_INTERVAL_MS);
const _: () = assert!(REFRESH_INTERVAL_MS <= DEMO_PAGE_INTERVAL_MS);
