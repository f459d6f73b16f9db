//! CPU screen: overview, throttle status and history.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{NOT_AVAILABLE, Page, draw_text, or_na};
use crate::colors::{
    AMBER_HEADING,
    DIM,
    DUSK_HEADING,
    FLAG_FREQ_CAPPED,
    FLAG_FREQ_CAPPED_BOOT,
    FLAG_SOFT_LIMIT,
    FLAG_SOFT_LIMIT_BOOT,
    FLAG_THROTTLED,
    FLAG_THROTTLED_BOOT,
    FLAG_UNDER_VOLTAGE,
    FLAG_UNDER_VOLTAGE_BOOT,
    LABEL,
    OK_GREEN,
    PEACH,
    SKY,
    TEAL,
    WHITE,
};
use crate::config::{BAR_HEIGHT, CONTENT_LEFT, CONTENT_RIGHT, CONTENT_TOP, CONTENT_WIDTH, SPARKLINE_HEIGHT};
use crate::history::HistoryBuffer;
use crate::metrics::{Label, MetricSource, ThrottleFlag, ThrottleFlags, label_fmt};
use crate::styles::{LARGE_FONT, SMALL_FONT, TINY_FONT, TOP_CENTER, TOP_LEFT, TOP_RIGHT};
use crate::thresholds::{TEMP_HISTORY_MAX, TEMP_HISTORY_MIN};
use crate::widgets::{PERCENT_BAR, STATUS_PALETTE, SparkScale, StatusLine, TEMPERATURE_BAR, draw_bar, draw_sparkline};

const BAR_SIZE: Size = Size::new(CONTENT_WIDTH, BAR_HEIGHT);

// =============================================================================
// Overview
// =============================================================================

/// Temperature, voltage, frequency and utilisation.
#[derive(Default)]
pub struct CpuOverviewPage {
    temperature: Option<f32>,
    voltage: Option<Label>,
    frequency_mhz: Option<u32>,
    usage: Option<f32>,
}

impl CpuOverviewPage {
    const TEMP_Y: i32 = CONTENT_TOP;
    const TEMP_BAR_Y: i32 = CONTENT_TOP + 14;
    const VOLT_Y: i32 = CONTENT_TOP + 26;
    const FREQ_Y: i32 = CONTENT_TOP + 40;
    const CPU_Y: i32 = CONTENT_TOP + 54;
    const CPU_BAR_Y: i32 = CONTENT_TOP + 66;
    const VALUE_X: i32 = 50;
}

impl Page for CpuOverviewPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.temperature = source.cpu_temperature();
        self.voltage = source.core_voltage();
        self.frequency_mhz = source.cpu_frequency_mhz();
        self.usage = source.cpu_usage();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        let temp = TEMPERATURE_BAR.evaluate(self.temperature.unwrap_or(f32::NAN));
        draw_text(display, "TEMP", CONTENT_LEFT, Self::TEMP_Y + 2, SMALL_FONT, LABEL, TOP_LEFT);
        match self.temperature {
            Some(t) => draw_text(
                display,
                &label_fmt(format_args!("{t:.1}C")),
                Self::VALUE_X,
                Self::TEMP_Y,
                LARGE_FONT,
                STATUS_PALETTE.color(temp.severity),
                TOP_LEFT,
            ),
            None => draw_text(display, NOT_AVAILABLE, Self::VALUE_X, Self::TEMP_Y + 2, SMALL_FONT, DIM, TOP_LEFT),
        }
        draw_bar(display, Point::new(CONTENT_LEFT, Self::TEMP_BAR_Y), BAR_SIZE, temp, &STATUS_PALETTE);

        StatusLine::new("VOLT", or_na(&self.voltage)).draw(display, Self::VOLT_Y);

        let freq = self.frequency_mhz.map(|mhz| label_fmt(format_args!("{mhz} MHz")));
        StatusLine::new("FREQ", or_na(&freq)).draw(display, Self::FREQ_Y);

        let usage = PERCENT_BAR.evaluate(self.usage.unwrap_or(f32::NAN));
        draw_text(display, "CPU", CONTENT_LEFT, Self::CPU_Y, SMALL_FONT, LABEL, TOP_LEFT);
        match self.usage {
            Some(u) => draw_text(
                display,
                &label_fmt(format_args!("{u:.1}%")),
                CONTENT_RIGHT,
                Self::CPU_Y,
                SMALL_FONT,
                STATUS_PALETTE.color(usage.severity),
                TOP_RIGHT,
            ),
            None => draw_text(display, NOT_AVAILABLE, CONTENT_RIGHT, Self::CPU_Y, SMALL_FONT, DIM, TOP_RIGHT),
        }
        draw_bar(display, Point::new(CONTENT_LEFT, Self::CPU_BAR_Y), BAR_SIZE, usage, &STATUS_PALETTE);
    }
}

// =============================================================================
// Throttle Status
// =============================================================================

/// Firmware throttle bits and the frequency governor.
#[derive(Default)]
pub struct ThrottlePage {
    flags: Option<ThrottleFlags>,
    governor: Option<Label>,
}

/// Bright while active, muted once it is only a since-boot record.
const fn flag_color(
    flag: ThrottleFlag,
    since_boot: bool,
) -> Rgb565 {
    match (flag, since_boot) {
        (ThrottleFlag::UnderVoltage, false) => FLAG_UNDER_VOLTAGE,
        (ThrottleFlag::FrequencyCapped, false) => FLAG_FREQ_CAPPED,
        (ThrottleFlag::Throttled, false) => FLAG_THROTTLED,
        (ThrottleFlag::SoftTempLimit, false) => FLAG_SOFT_LIMIT,
        (ThrottleFlag::UnderVoltage, true) => FLAG_UNDER_VOLTAGE_BOOT,
        (ThrottleFlag::FrequencyCapped, true) => FLAG_FREQ_CAPPED_BOOT,
        (ThrottleFlag::Throttled, true) => FLAG_THROTTLED_BOOT,
        (ThrottleFlag::SoftTempLimit, true) => FLAG_SOFT_LIMIT_BOOT,
    }
}

impl ThrottlePage {
    const LINE_HEIGHT: i32 = 10;
    const GOVERNOR_Y: i32 = 108;
    const CENTER_X: i32 = (CONTENT_LEFT + CONTENT_RIGHT) / 2;

    /// Draw a heading followed by one line per flag, or `None`. Returns the
    /// y below the last line.
    fn draw_flag_list<D, I>(
        display: &mut D,
        heading: &str,
        flags: I,
        since_boot: bool,
        y: i32,
    ) -> i32
    where
        D: DrawTarget<Color = Rgb565>,
        I: Iterator<Item = ThrottleFlag>,
    {
        let heading_color = if since_boot { DUSK_HEADING } else { AMBER_HEADING };
        draw_text(display, heading, CONTENT_LEFT, y, SMALL_FONT, heading_color, TOP_LEFT);
        let mut y = y + Self::LINE_HEIGHT + 1;
        let mut any = false;
        for flag in flags {
            any = true;
            draw_text(
                display,
                flag.label(since_boot),
                CONTENT_LEFT + 4,
                y,
                TINY_FONT,
                flag_color(flag, since_boot),
                TOP_LEFT,
            );
            y += Self::LINE_HEIGHT - 1;
        }
        if !any {
            draw_text(display, "None", CONTENT_LEFT + 4, y, TINY_FONT, OK_GREEN, TOP_LEFT);
            y += Self::LINE_HEIGHT - 1;
        }
        y + 2
    }
}

impl Page for ThrottlePage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.flags = source.throttle_flags();
        self.governor = source.cpu_governor();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        match self.flags {
            None => {
                draw_text(display, "Cannot read", Self::CENTER_X, CONTENT_TOP + 24, SMALL_FONT, DIM, TOP_CENTER);
                draw_text(display, "throttle status", Self::CENTER_X, CONTENT_TOP + 36, SMALL_FONT, DIM, TOP_CENTER);
            }
            Some(flags) if flags.is_clear() => {
                draw_text(display, "ALL CLEAR", Self::CENTER_X, CONTENT_TOP + 20, LARGE_FONT, OK_GREEN, TOP_CENTER);
                draw_text(
                    display,
                    "No throttling detected",
                    Self::CENTER_X,
                    CONTENT_TOP + 40,
                    TINY_FONT,
                    LABEL,
                    TOP_CENTER,
                );
            }
            Some(flags) => {
                let y = Self::draw_flag_list(display, "CURRENT", flags.current(), false, CONTENT_TOP);
                Self::draw_flag_list(display, "SINCE BOOT", flags.since_boot(), true, y);
            }
        }

        StatusLine::new("GOV", or_na(&self.governor))
            .with_color(SKY)
            .draw(display, Self::GOVERNOR_Y);
    }
}

// =============================================================================
// History
// =============================================================================

/// Rolling temperature and utilisation sparklines.
#[derive(Default)]
pub struct CpuHistoryPage {
    temperature: HistoryBuffer,
    usage: HistoryBuffer,
}

impl CpuHistoryPage {
    const TEMP_LABEL_Y: i32 = CONTENT_TOP;
    const TEMP_SPARK_Y: i32 = CONTENT_TOP + 11;
    const CPU_LABEL_Y: i32 = CONTENT_TOP + 45;
    const CPU_SPARK_Y: i32 = CONTENT_TOP + 56;

    #[allow(clippy::too_many_arguments)]
    fn draw_series<D>(
        display: &mut D,
        title: &str,
        current: Option<Label>,
        label_y: i32,
        spark_y: i32,
        history: &HistoryBuffer,
        scale: SparkScale,
        color: Rgb565,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_text(display, title, CONTENT_LEFT, label_y, SMALL_FONT, LABEL, TOP_LEFT);
        match current {
            Some(value) => draw_text(display, &value, CONTENT_RIGHT, label_y, SMALL_FONT, WHITE, TOP_RIGHT),
            None => draw_text(display, NOT_AVAILABLE, CONTENT_RIGHT, label_y, SMALL_FONT, DIM, TOP_RIGHT),
        }
        let area = Rectangle::new(Point::new(CONTENT_LEFT, spark_y), Size::new(CONTENT_WIDTH, SPARKLINE_HEIGHT));
        draw_sparkline(display, area, &history.snapshot(), scale, color);
    }
}

impl Page for CpuHistoryPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.temperature.push_or_gap(source.cpu_temperature());
        self.usage.push_or_gap(source.cpu_usage());
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        Self::draw_series(
            display,
            "TEMP",
            self.temperature.latest().map(|t| label_fmt(format_args!("{t:.1}C"))),
            Self::TEMP_LABEL_Y,
            Self::TEMP_SPARK_Y,
            &self.temperature,
            SparkScale::Fixed {
                min: TEMP_HISTORY_MIN,
                max: TEMP_HISTORY_MAX,
            },
            PEACH,
        );
        Self::draw_series(
            display,
            "CPU",
            self.usage.latest().map(|u| label_fmt(format_args!("{u:.1}%"))),
            Self::CPU_LABEL_Y,
            Self::CPU_SPARK_Y,
            &self.usage,
            SparkScale::Fixed { min: 0.0, max: 100.0 },
            TEAL,
        );
    }
}
