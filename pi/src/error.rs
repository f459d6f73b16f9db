//! Errors of the hardware layer.

use std::io;

use linux_embedded_hal::gpio_cdev;
use thiserror::Error;

use crate::st7735::PanelError;

/// Failure to open or drive the LCD HAT.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The HAT is not attached or its device nodes are unavailable.
    #[error("LCD HAT not detected: {0}")]
    NotFound(String),

    #[error("GPIO error: {0}")]
    Gpio(#[from] gpio_cdev::errors::Error),

    #[error("SPI error: {0}")]
    Spi(#[from] io::Error),

    #[error("panel error: {0}")]
    Panel(#[from] PanelError),
}

impl DisplayError {
    /// Whether this error means the hardware is absent rather than faulty.
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable() {
        assert!(DisplayError::NotFound("no spidev".into()).is_not_found());
        assert!(!DisplayError::Spi(io::Error::other("bus")).is_not_found());
        assert!(!DisplayError::Panel(PanelError::Pin).is_not_found());
    }

    #[test]
    fn test_messages() {
        let err = DisplayError::NotFound("/dev/spidev0.0 missing".into());
        assert_eq!(err.to_string(), "LCD HAT not detected: /dev/spidev0.0 missing");
    }
}
