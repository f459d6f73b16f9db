//! ST7735S panel driver over `embedded-hal` 1.0.
//!
//! The driver is generic over the SPI device and the DC/RST/backlight pins so
//! it runs on `linux-embedded-hal` in production and on in-memory fakes in
//! tests. It only supports what the dashboard needs: a full init, a
//! full-screen window write and the backlight.
//!
//! # Wire Format
//!
//! - DC low: command byte; DC high: parameter or pixel bytes
//! - MADCTL `0x60` (row/column exchange, BGR panel): red and blue are swapped
//!   per pixel before sending
//! - Writes are split into [`MAX_TRANSFER`] chunks (the spidev default buffer)

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiDevice};
use lcd_stats_common::Panel;
use lcd_stats_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use lcd_stats_common::framebuffer::{FRAME_BYTES, Framebuffer};
use thiserror::Error;

use crate::config::{X_OFFSET, Y_OFFSET};

/// Largest single SPI write.
pub const MAX_TRANSFER: usize = 4096;

// ST7735S Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVOFF: u8 = 0x20;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;
const FRMCTR1: u8 = 0xB1;
const FRMCTR2: u8 = 0xB2;
const FRMCTR3: u8 = 0xB3;
const INVCTR: u8 = 0xB4;
const PWCTR1: u8 = 0xC0;
const PWCTR2: u8 = 0xC1;
const PWCTR3: u8 = 0xC2;
const PWCTR4: u8 = 0xC3;
const PWCTR5: u8 = 0xC4;
const VMCTR1: u8 = 0xC5;
const GMCTRP1: u8 = 0xE0;
const GMCTRN1: u8 = 0xE1;

// MADCTL flags
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange

/// 16 bits per pixel.
const COLMOD_RGB565: u8 = 0x05;

/// Register setup sent between sleep-out and display-on.
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    // Frame rate
    (FRMCTR1, &[0x01, 0x2C, 0x2D]),
    (FRMCTR2, &[0x01, 0x2C, 0x2D]),
    (FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
    (INVCTR, &[0x07]),
    // Power
    (PWCTR1, &[0xA2, 0x02, 0x84]),
    (PWCTR2, &[0xC5]),
    (PWCTR3, &[0x0A, 0x00]),
    (PWCTR4, &[0x8A, 0x2A]),
    (PWCTR5, &[0x8A, 0xEE]),
    (VMCTR1, &[0x0E]),
    (INVOFF, &[]),
    (MADCTL, &[MADCTL_MV | MADCTL_MX]),
    (COLMOD, &[COLMOD_RGB565]),
    // Gamma
    (GMCTRP1, &[
        0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
    ]),
    (GMCTRN1, &[
        0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
    ]),
];

/// Bus or pin failure, with the HAL error reduced to its kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum PanelError {
    #[error("SPI transfer failed")]
    Spi,
    #[error("GPIO write failed")]
    Pin,
}

fn spi_error<E: spi::Error>(e: E) -> PanelError {
    log::debug!("spi: {:?}", e.kind());
    PanelError::Spi
}

fn pin_error<E: digital::Error>(e: E) -> PanelError {
    log::debug!("pin: {:?}", e.kind());
    PanelError::Pin
}

/// Swap the red and blue fields of a big-endian RGB565 pixel.
#[inline]
pub const fn swap_red_blue(pixel: u16) -> u16 { (pixel & 0x07E0) | (pixel << 11) | (pixel >> 11) }

/// ST7735S on a 4-wire SPI bus with reset and backlight lines.
pub struct St7735<SPI, DC, RST, BL> {
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: BL,
    /// Panel-order copy of the frame being sent.
    wire: Vec<u8>,
}

impl<SPI, DC, RST, BL> St7735<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    pub fn new(
        spi: SPI,
        dc: DC,
        rst: RST,
        backlight: BL,
    ) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight,
            wire: Vec::with_capacity(FRAME_BYTES),
        }
    }

    /// Reset and configure the controller, then switch the display on.
    /// The backlight is left untouched.
    pub fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), PanelError> {
        self.hard_reset(delay)?;

        self.command(SWRESET, &[])?;
        delay.delay_ms(150);

        self.command(SLPOUT, &[])?;
        delay.delay_ms(500);

        for (cmd, params) in INIT_SEQUENCE {
            self.command(*cmd, params)?;
        }

        self.command(NORON, &[])?;
        delay.delay_ms(10);

        self.command(DISPON, &[])?;
        delay.delay_ms(100);
        Ok(())
    }

    fn hard_reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), PanelError> {
        self.rst.set_high().map_err(pin_error)?;
        delay.delay_ms(10);
        self.rst.set_low().map_err(pin_error)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(pin_error)?;
        delay.delay_ms(150);
        Ok(())
    }

    /// Send a command byte, then its parameters if any.
    fn command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) -> Result<(), PanelError> {
        self.dc.set_low().map_err(pin_error)?;
        self.spi.write(&[cmd]).map_err(spi_error)?;
        if !params.is_empty() {
            self.write_data(params)?;
        }
        Ok(())
    }

    fn write_data(
        &mut self,
        data: &[u8],
    ) -> Result<(), PanelError> {
        self.dc.set_high().map_err(pin_error)?;
        for chunk in data.chunks(MAX_TRANSFER) {
            self.spi.write(chunk).map_err(spi_error)?;
        }
        Ok(())
    }

    /// Set the RAM window to `(x0, y0)..=(x1, y1)` in screen coordinates and
    /// start a memory write.
    fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), PanelError> {
        let (x0, x1) = (x0 + X_OFFSET, x1 + X_OFFSET);
        let (y0, y1) = (y0 + Y_OFFSET, y1 + Y_OFFSET);
        self.command(CASET, &[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8])?;
        self.command(RASET, &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8])?;
        self.command(RAMWR, &[])
    }

    /// Send a full frame.
    pub fn write_frame(
        &mut self,
        frame: &Framebuffer,
    ) -> Result<(), PanelError> {
        self.wire.clear();
        for px in frame.as_bytes().chunks_exact(2) {
            let swapped = swap_red_blue(u16::from_be_bytes([px[0], px[1]]));
            self.wire.extend_from_slice(&swapped.to_be_bytes());
        }

        self.set_window(0, 0, SCREEN_WIDTH as u16 - 1, SCREEN_HEIGHT as u16 - 1)?;
        let wire = std::mem::take(&mut self.wire);
        let result = self.write_data(&wire);
        self.wire = wire;
        result
    }

    pub fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), PanelError> {
        if on {
            self.backlight.set_high().map_err(pin_error)
        } else {
            self.backlight.set_low().map_err(pin_error)
        }
    }
}

impl<SPI, DC, RST, BL> Panel for St7735<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    type Error = PanelError;

    fn push_frame(
        &mut self,
        frame: &Framebuffer,
    ) -> Result<(), PanelError> {
        self.write_frame(frame)
    }

    fn set_backlight(
        &mut self,
        on: bool,
    ) -> Result<(), PanelError> {
        St7735::set_backlight(self, on)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
