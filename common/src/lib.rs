//! Platform-agnostic core of the LCD stats dashboard.
//!
//! Everything that does not touch hardware lives here so it can be exercised
//! on the host and shared between the Raspberry Pi binary and the simulator:
//!
//! - [`config`]: Layout and timing constants
//! - [`colors`] / [`styles`]: RGB565 palette and pre-computed text styles
//! - [`thresholds`]: Severity breakpoints for temperatures and percentages
//! - [`history`]: Fixed-capacity ring buffer feeding the sparklines
//! - [`rate`]: Counter-to-rate conversion
//! - [`widgets`]: Drawing primitives (bar, sparkline, status line) and page chrome
//! - [`metrics`]: The [`MetricSource`] trait and the values it returns
//! - [`demo`]: Placeholder network identity and fully synthetic data
//! - [`pages`]: The nine dashboard pages
//! - [`input`]: Per-line debouncing of the joystick and keys
//! - [`navigation`]: Screen/page/backlight state machine
//! - [`dashboard`]: One loop iteration (input, demo advance, refresh, render)
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. It has no notion of wall-clock time;
//! callers pass monotonic milliseconds into every time-dependent operation.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod device;
pub mod framebuffer;
pub mod history;
pub mod input;
pub mod metrics;
pub mod navigation;
pub mod pages;
pub mod rate;
pub mod render;
pub mod styles;
pub mod thresholds;
pub mod widgets;

// Re-export commonly used items
pub use dashboard::{Dashboard, DashboardConfig, TickOutcome};
pub use device::{InputLines, Panel};
pub use framebuffer::Framebuffer;
pub use history::HistoryBuffer;
pub use input::{Button, LineLevels};
pub use metrics::MetricSource;
pub use navigation::{NavState, Position};
