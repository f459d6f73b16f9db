//! Joystick and key lines of the HAT.
//!
//! All eight lines are active-low: pressed reads 0, released reads 1. The
//! pull-ups come from `gpio=6,19,5,26,13,21,20,16=pu` in `/boot/config.txt`.

use lcd_stats_common::input::{Button, LINE_COUNT};
use lcd_stats_common::{InputLines, LineLevels};
use linux_embedded_hal::gpio_cdev::{self, Chip, LineHandle, LineRequestFlags};

use crate::config::{
    DOWN_PIN,
    GPIO_CONSUMER,
    KEY1_PIN,
    KEY2_PIN,
    KEY3_PIN,
    LEFT_PIN,
    PRESS_PIN,
    RIGHT_PIN,
    UP_PIN,
};

/// BCM line of every button.
pub const BUTTON_PINS: [(Button, u32); LINE_COUNT] = [
    (Button::Up, UP_PIN),
    (Button::Down, DOWN_PIN),
    (Button::Left, LEFT_PIN),
    (Button::Right, RIGHT_PIN),
    (Button::Press, PRESS_PIN),
    (Button::Key1, KEY1_PIN),
    (Button::Key2, KEY2_PIN),
    (Button::Key3, KEY3_PIN),
];

/// Decode raw line values, in [`BUTTON_PINS`] order, to pressed levels.
pub fn decode_levels(raw: impl IntoIterator<Item = (Button, u8)>) -> LineLevels {
    raw.into_iter()
        .fold(LineLevels::RELEASED, |levels, (button, value)| levels.with(button, value == 0))
}

/// The eight requested input lines.
pub struct HatButtons {
    lines: Vec<(Button, LineHandle)>,
}

impl HatButtons {
    /// Request every button line of `chip` as an input.
    pub fn request(chip: &mut Chip) -> Result<Self, gpio_cdev::errors::Error> {
        let lines = BUTTON_PINS
            .iter()
            .map(|&(button, pin)| {
                // Default 1 is the idle, pulled-up level
                let handle = chip.get_line(pin)?.request(LineRequestFlags::INPUT, 1, GPIO_CONSUMER)?;
                Ok((button, handle))
            })
            .collect::<Result<Vec<_>, gpio_cdev::errors::Error>>()?;
        log::debug!("Requested {} button lines", lines.len());
        Ok(Self { lines })
    }
}

impl InputLines for HatButtons {
    type Error = gpio_cdev::errors::Error;

    fn sample(&mut self) -> Result<LineLevels, Self::Error> {
        let raw = self
            .lines
            .iter()
            .map(|(button, handle)| Ok((*button, handle.get_value()?)))
            .collect::<Result<Vec<_>, Self::Error>>()?;
        Ok(decode_levels(raw))
    }
}
