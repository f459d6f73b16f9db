//! Resources screen: system overview, memory detail and processes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::{NOT_AVAILABLE, Page, draw_text, or_na};
use crate::colors::{AMBER_HEADING, DIM, ICE, LABEL, MIST, SAND, SKY, WARN_YELLOW, WHITE};
use crate::config::{BAR_HEIGHT, CONTENT_LEFT, CONTENT_RIGHT, CONTENT_TOP, CONTENT_WIDTH, TOP_PROCESS_COUNT};
use crate::metrics::{DiskUsage, Label, LoadAverage, MemoryStats, MetricSource, TopProcesses, label, label_fmt};
use crate::rate::RateTracker;
use crate::styles::{SMALL_FONT, TINY_FONT, TOP_LEFT, TOP_RIGHT};
use crate::thresholds::{is_dirty_high, is_iowait_high};
use crate::widgets::{PERCENT_BAR, STATUS_PALETTE, StatusLine, draw_bar, truncate_chars};

const BAR_SIZE: Size = Size::new(CONTENT_WIDTH, BAR_HEIGHT);
const KIB: u64 = 1024;
const GIB: f32 = 1024.0 * 1024.0 * 1024.0;

/// `Xd Yh Zm`, or `Yh Zm` under a day.
pub fn format_uptime(secs: u64) -> Label {
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    if days > 0 {
        label_fmt(format_args!("{days}d {hours}h {minutes}m"))
    } else {
        label_fmt(format_args!("{hours}h {minutes}m"))
    }
}

/// `used/totalM` from kilobyte counts.
fn megabytes_of(
    used_kb: u64,
    total_kb: u64,
) -> Label {
    label_fmt(format_args!("{}/{}M", used_kb / KIB, total_kb / KIB))
}

/// Label on the left, value right-aligned in its severity colour, bar below.
fn draw_usage_row<D>(
    display: &mut D,
    name: &str,
    value: Option<(Label, f32)>,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_text(display, name, CONTENT_LEFT, y, SMALL_FONT, LABEL, TOP_LEFT);
    let reading = PERCENT_BAR.evaluate(value.as_ref().map_or(f32::NAN, |(_, pct)| *pct));
    match &value {
        Some((text, _)) => draw_text(
            display,
            text,
            CONTENT_RIGHT,
            y,
            SMALL_FONT,
            STATUS_PALETTE.color(reading.severity),
            TOP_RIGHT,
        ),
        None => draw_text(display, NOT_AVAILABLE, CONTENT_RIGHT, y, SMALL_FONT, DIM, TOP_RIGHT),
    }
    draw_bar(display, Point::new(CONTENT_LEFT, y + 12), BAR_SIZE, reading, &STATUS_PALETTE);
}

// =============================================================================
// Overview
// =============================================================================

/// Load, RAM, SD card, process count and uptime.
#[derive(Default)]
pub struct ResourceOverviewPage {
    load: Option<LoadAverage>,
    memory: Option<MemoryStats>,
    disk: Option<DiskUsage>,
    processes: Option<u32>,
    uptime_secs: Option<u64>,
}

impl ResourceOverviewPage {
    const LOAD_Y: i32 = CONTENT_TOP;
    const RAM_Y: i32 = CONTENT_TOP + 14;
    const SD_Y: i32 = CONTENT_TOP + 38;
    const PROCS_Y: i32 = CONTENT_TOP + 62;
    const UPTIME_Y: i32 = CONTENT_TOP + 76;
}

impl Page for ResourceOverviewPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.load = source.load_average();
        self.memory = source.memory();
        self.disk = source.disk_usage();
        self.processes = source.process_count();
        self.uptime_secs = source.uptime_secs();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        let load = self
            .load
            .map(|l| label_fmt(format_args!("{:.2} {:.2} {:.2}", l.one, l.five, l.fifteen)));
        StatusLine::new("LOAD", or_na(&load))
            .with_color(SAND)
            .draw(display, Self::LOAD_Y);

        let ram = self
            .memory
            .map(|m| (megabytes_of(m.used_kb(), m.total_kb), m.used_percent()));
        draw_usage_row(display, "RAM", ram, Self::RAM_Y);

        let sd = self.disk.map(|d| {
            let text = label_fmt(format_args!(
                "{:.1}/{:.1}G",
                d.used_bytes as f32 / GIB,
                d.total_bytes as f32 / GIB
            ));
            (text, d.used_percent())
        });
        draw_usage_row(display, "SD", sd, Self::SD_Y);

        let procs = self.processes.map(|n| label_fmt(format_args!("{n}")));
        StatusLine::new("PROCS", or_na(&procs))
            .with_color(SKY)
            .draw(display, Self::PROCS_Y);

        let uptime = self.uptime_secs.map(format_uptime);
        StatusLine::new("UP", or_na(&uptime))
            .with_color(ICE)
            .draw(display, Self::UPTIME_Y);
    }
}

// =============================================================================
// Memory Detail
// =============================================================================

/// Swap, page cache and the firmware memory split.
#[derive(Default)]
pub struct MemoryPage {
    memory: Option<MemoryStats>,
    gpu: Option<Label>,
    arm: Option<Label>,
}

impl MemoryPage {
    const SWAP_Y: i32 = CONTENT_TOP;
    const CACHE_Y: i32 = CONTENT_TOP + 24;
    const AVAIL_Y: i32 = CONTENT_TOP + 37;
    const DIRTY_Y: i32 = CONTENT_TOP + 50;
    const GPU_Y: i32 = CONTENT_TOP + 66;
    const ARM_Y: i32 = CONTENT_TOP + 79;
}

impl Page for MemoryPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        _now_ms: u64,
    ) {
        self.memory = source.memory();
        self.gpu = source.gpu_memory();
        self.arm = source.arm_memory();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        match self.memory {
            Some(m) if m.has_swap() => {
                let swap = megabytes_of(m.swap_used_kb(), m.swap_total_kb);
                draw_usage_row(display, "SWAP", Some((swap, m.swap_percent())), Self::SWAP_Y);
            }
            Some(_) => StatusLine::new("SWAP", "disabled")
                .with_color(DIM)
                .draw(display, Self::SWAP_Y),
            None => draw_usage_row(display, "SWAP", None, Self::SWAP_Y),
        }

        let cache = self
            .memory
            .map(|m| label_fmt(format_args!("{}/{}M", m.buffers_kb / KIB, m.cached_kb / KIB)));
        StatusLine::new("BUF/CACHE", or_na(&cache))
            .with_color(MIST)
            .draw(display, Self::CACHE_Y);

        let avail = self.memory.map(|m| label_fmt(format_args!("{}M", m.available_kb / KIB)));
        StatusLine::new("AVAIL", or_na(&avail))
            .with_color(SKY)
            .draw(display, Self::AVAIL_Y);

        let dirty = self.memory.map(|m| label_fmt(format_args!("{}K", m.dirty_kb)));
        let dirty_color = match self.memory {
            Some(m) if is_dirty_high(m.dirty_kb) => WARN_YELLOW,
            _ => WHITE,
        };
        StatusLine::new("DIRTY", or_na(&dirty))
            .with_color(dirty_color)
            .draw(display, Self::DIRTY_Y);

        StatusLine::new("GPU", or_na(&self.gpu))
            .with_color(SAND)
            .draw(display, Self::GPU_Y);
        StatusLine::new("ARM", or_na(&self.arm))
            .with_color(SAND)
            .draw(display, Self::ARM_Y);
    }
}

// =============================================================================
// Processes
// =============================================================================

/// Disk throughput, I/O wait and the busiest processes.
#[derive(Default)]
pub struct ProcessesPage {
    read: RateTracker,
    written: RateTracker,
    read_rate: Option<f32>,
    write_rate: Option<f32>,
    iowait: Option<f32>,
    top: Option<TopProcesses>,
}

impl ProcessesPage {
    const DISK_Y: i32 = CONTENT_TOP;
    const RW_Y: i32 = CONTENT_TOP + 12;
    const IOWAIT_Y: i32 = CONTENT_TOP + 24;
    const TOP_Y: i32 = CONTENT_TOP + 40;
    const ROW_HEIGHT: i32 = 11;
    const NAME_CHARS: usize = 14;
    const PERCENT_X: i32 = 120;
}

impl Page for ProcessesPage {
    fn refresh<S: MetricSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) {
        match source.disk_io() {
            Some(io) => {
                self.read_rate = self.read.update(io.read_bytes, now_ms);
                self.write_rate = self.written.update(io.written_bytes, now_ms);
            }
            None => {
                self.read.reset();
                self.written.reset();
                self.read_rate = None;
                self.write_rate = None;
            }
        }
        self.iowait = source.iowait_percent();
        self.top = source.top_processes();
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) {
        draw_text(display, "DISK I/O", CONTENT_LEFT, Self::DISK_Y, SMALL_FONT, AMBER_HEADING, TOP_LEFT);
        let rw = match (self.read_rate, self.write_rate) {
            (Some(r), Some(w)) => label_fmt(format_args!("R {:.1}  W {:.1} KB/s", r / 1024.0, w / 1024.0)),
            _ => label("R --  W -- KB/s"),
        };
        draw_text(display, &rw, CONTENT_LEFT + 4, Self::RW_Y, TINY_FONT, WHITE, TOP_LEFT);

        let iowait = self.iowait.map(|p| label_fmt(format_args!("{p:.1}%")));
        let line = StatusLine::new("IOWAIT", or_na(&iowait));
        match self.iowait {
            Some(p) => line.alert_if(is_iowait_high(p)),
            None => line.with_color(DIM),
        }
        .draw(display, Self::IOWAIT_Y);

        draw_text(display, "TOP PROCS", CONTENT_LEFT, Self::TOP_Y, SMALL_FONT, AMBER_HEADING, TOP_LEFT);
        let Some(top) = &self.top else {
            draw_text(display, NOT_AVAILABLE, CONTENT_LEFT + 4, Self::TOP_Y + 12, SMALL_FONT, DIM, TOP_LEFT);
            return;
        };
        for (i, process) in top.iter().take(TOP_PROCESS_COUNT).enumerate() {
            let y = Self::TOP_Y + 12 + i as i32 * Self::ROW_HEIGHT;
            let name = truncate_chars(&process.name, Self::NAME_CHARS);
            draw_text(display, name, CONTENT_LEFT, y, SMALL_FONT, WHITE, TOP_LEFT);
            let severity = PERCENT_BAR.evaluate(process.cpu_percent).severity;
            draw_text(
                display,
                &label_fmt(format_args!("{:.1}%", process.cpu_percent)),
                Self::PERCENT_X,
                y,
                SMALL_FONT,
                STATUS_PALETTE.color(severity),
                TOP_RIGHT,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{CRIT_RED, OK_GREEN};
    use crate::demo::SyntheticSource;
    use crate::framebuffer::Framebuffer;
    use crate::metrics::{NullSource, ProcessInfo};

    fn count_color(
        frame: &Framebuffer,
        color: Rgb565,
    ) -> usize {
        frame.pixels().filter(|Pixel(_, c)| *c == color).count()
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0).as_str(), "0h 0m");
        assert_eq!(format_uptime(3_660).as_str(), "1h 1m");
        assert_eq!(format_uptime(86_399).as_str(), "23h 59m");
        assert_eq!(format_uptime(3 * 86_400 + 5 * 3_600 + 7 * 60 + 59).as_str(), "3d 5h 7m");
    }

    #[test]
    fn test_megabytes_of() {
        assert_eq!(megabytes_of(380_000, 948_304).as_str(), "371/926M");
    }

    #[test]
    fn test_swap_disabled() {
        let mut frame = Framebuffer::new();
        MemoryPage {
            memory: Some(MemoryStats {
                total_kb: 1_000_000,
                available_kb: 500_000,
                ..Default::default()
            }),
            ..Default::default()
        }
        .draw(&mut frame);
        // No swap means no usage bar and no severity colour on that row
        assert_eq!(count_color(&frame, OK_GREEN), 0);
        assert!(count_color(&frame, DIM) > 0);
    }

    #[test]
    fn test_dirty_threshold_colour() {
        let page = |dirty_kb| MemoryPage {
            memory: Some(MemoryStats {
                total_kb: 1_000_000,
                dirty_kb,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut low = Framebuffer::new();
        page(1024).draw(&mut low);
        assert_eq!(count_color(&low, WARN_YELLOW), 0);

        let mut high = Framebuffer::new();
        page(1025).draw(&mut high);
        assert!(count_color(&high, WARN_YELLOW) > 0);
    }

    #[test]
    fn test_iowait_alert() {
        let page = |iowait| ProcessesPage {
            iowait: Some(iowait),
            top: Some(TopProcesses::new()),
            ..Default::default()
        };
        let mut calm = Framebuffer::new();
        page(4.0).draw(&mut calm);
        assert_eq!(count_color(&calm, CRIT_RED), 0);

        let mut busy = Framebuffer::new();
        page(12.5).draw(&mut busy);
        assert!(count_color(&busy, CRIT_RED) > 0);
    }

    #[test]
    fn test_disk_rates_need_two_samples() {
        let mut source = SyntheticSource::new();
        let mut page = ProcessesPage::default();
        page.refresh(&mut source, 0);
        assert_eq!(page.read_rate, None);

        source.set_clock(2_000);
        page.refresh(&mut source, 2_000);
        assert!(page.read_rate.is_some_and(|r| r > 0.0));
        assert!(page.write_rate.is_some_and(|r| r > 0.0));
    }

    #[test]
    fn test_top_process_rows() {
        let mut top = TopProcesses::new();
        top.push(ProcessInfo::new("a-very-long-process", 85.0)).unwrap();
        top.push(ProcessInfo::new("idle", 0.5)).unwrap();
        let mut frame = Framebuffer::new();
        ProcessesPage {
            top: Some(top),
            ..Default::default()
        }
        .draw(&mut frame);
        assert!(count_color(&frame, CRIT_RED) > 0);
        assert!(count_color(&frame, OK_GREEN) > 0);
    }

    #[test]
    fn test_overview_refresh_from_synthetic_source() {
        let mut page = ResourceOverviewPage::default();
        page.refresh(&mut SyntheticSource::new(), 0);
        assert!(page.memory.is_some());
        assert_eq!(page.processes, Some(142));

        page.refresh(&mut NullSource, 0);
        assert!(page.memory.is_none());
    }
}
