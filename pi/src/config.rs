//! Hardware and host configuration.
//!
//! Pin numbers are BCM GPIO lines of the Waveshare 1.44" LCD HAT.

use std::time::Duration;

// =============================================================================
// Devices
// =============================================================================

pub const SPI_DEVICE: &str = "/dev/spidev0.0";
pub const GPIO_CHIP: &str = "/dev/gpiochip0";

/// SPI clock. The ST7735S is specified for 15 MHz writes but runs reliably here.
pub const SPI_SPEED_HZ: u32 = 16_000_000;

/// Consumer label for requested GPIO lines.
pub const GPIO_CONSUMER: &str = "lcd-stats";

// =============================================================================
// Panel Pins
// =============================================================================

pub const DC_PIN: u32 = 25;
pub const RST_PIN: u32 = 27;
pub const BL_PIN: u32 = 24;

/// Offset of the visible 128x128 area inside the controller's 132x162 RAM.
pub const X_OFFSET: u16 = 1;
pub const Y_OFFSET: u16 = 2;

// =============================================================================
// Input Pins
// =============================================================================

pub const KEY1_PIN: u32 = 21;
pub const KEY2_PIN: u32 = 20;
pub const KEY3_PIN: u32 = 16;
pub const UP_PIN: u32 = 6;
pub const DOWN_PIN: u32 = 19;
pub const LEFT_PIN: u32 = 5;
pub const RIGHT_PIN: u32 = 26;
pub const PRESS_PIN: u32 = 13;

// =============================================================================
// Metric Sources
// =============================================================================

/// Upper bound for any external command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// How often a running command is polled for exit.
pub const COMMAND_POLL: Duration = Duration::from_millis(10);

/// Wireless interface whose link and counters are shown.
pub const WIRELESS_INTERFACE: &str = "wlan0";

/// Interfaces searched for an IPv4 address, in order.
pub const ADDRESS_INTERFACES: [&str; 2] = ["wlan0", "eth0"];

const _: () = assert!(COMMAND_POLL.as_millis() < COMMAND_TIMEOUT.as_millis());
