//! Bring-up of the LCD HAT: SPI bus, control lines, buttons.

use std::path::Path;

use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};

use crate::buttons::HatButtons;
use crate::config::{BL_PIN, DC_PIN, GPIO_CONSUMER, RST_PIN, SPI_SPEED_HZ};
use crate::error::DisplayError;
use crate::st7735::St7735;

/// The panel as wired on the HAT.
pub type HatPanel = St7735<SpidevDevice, CdevPin, CdevPin, CdevPin>;

fn output(
    chip: &mut Chip,
    pin: u32,
    initial: u8,
) -> Result<CdevPin, DisplayError> {
    let handle = chip.get_line(pin)?.request(LineRequestFlags::OUTPUT, initial, GPIO_CONSUMER)?;
    Ok(CdevPin::new(handle)?)
}

/// Open the panel and buttons, initialise the controller and light the
/// backlight.
///
/// A missing SPI node or GPIO chip yields [`DisplayError::NotFound`]; every
/// later failure is a real hardware fault.
pub fn open(
    spi_path: &Path,
    chip_path: &Path,
) -> Result<(HatPanel, HatButtons), DisplayError> {
    if !spi_path.exists() {
        return Err(DisplayError::NotFound(format!("{} does not exist", spi_path.display())));
    }
    let mut spi = SpidevDevice::open(spi_path)
        .map_err(|e| DisplayError::NotFound(format!("{}: {e}", spi_path.display())))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)?;

    let mut chip =
        Chip::new(chip_path).map_err(|e| DisplayError::NotFound(format!("{}: {e}", chip_path.display())))?;
    let dc = output(&mut chip, DC_PIN, 0)?;
    let rst = output(&mut chip, RST_PIN, 1)?;
    let backlight = output(&mut chip, BL_PIN, 0)?;
    let buttons = HatButtons::request(&mut chip)?;

    let mut panel = St7735::new(spi, dc, rst, backlight);
    panel.init(&mut Delay {})?;
    panel.set_backlight(true)?;
    log::info!("LCD ready on {} at {} MHz", spi_path.display(), SPI_SPEED_HZ / 1_000_000);

    Ok((panel, buttons))
}
