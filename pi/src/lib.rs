//! Raspberry Pi side of the LCD stats dashboard.
//!
//! - [`st7735`]: Generic ST7735S driver over `embedded-hal` SPI and pins
//! - [`display`]: Opens the Waveshare 1.44" HAT (spidev + GPIO character device)
//! - [`buttons`]: The joystick and three keys as [`lcd_stats_common::InputLines`]
//! - [`sources`]: [`sources::HostSource`], metrics read from `/proc`, `/sys` and a few commands
//! - [`signals`]: SIGINT/SIGTERM shutdown flag
//! - [`app`]: The main loop

pub mod app;
pub mod buttons;
pub mod config;
pub mod display;
pub mod error;
pub mod signals;
pub mod sources;
pub mod st7735;

pub use error::DisplayError;
