//! Renders every dashboard page from synthetic data to PNG files.
//!
//! The dashboard runs in demo mode on a simulated clock, so one cycle through
//! the nine pages takes `9 * DEMO_PAGE_INTERVAL_MS` of simulated time and no
//! real time at all. The last frame seen on each page is written out.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use env_logger::Env;
use lcd_stats_common::config::{PAGE_COUNT, POLL_INTERVAL_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use lcd_stats_common::demo::SyntheticSource;
use lcd_stats_common::{Dashboard, DashboardConfig, Framebuffer, LineLevels, Position};

#[derive(Parser, Debug)]
#[command(name = "lcd-stats-simulator", version, about)]
struct Cli {
    /// Directory the PNG files are written to
    #[arg(long, value_name = "DIR", default_value = "screenshots")]
    out: PathBuf,

    /// Simulated run time in seconds; longer runs fill the history graphs
    #[arg(long, value_name = "N", default_value_t = 120)]
    seconds: u64,
}

/// Run the dashboard for `duration_ms` of simulated time and keep the last
/// frame of every page.
fn capture(duration_ms: u64) -> Vec<Option<Framebuffer>> {
    let config = DashboardConfig {
        demo: true,
        ..DashboardConfig::default()
    };
    let mut dashboard = Dashboard::new(config, 0);
    let mut source = SyntheticSource::new();
    let mut frames = vec![None; PAGE_COUNT];

    for now_ms in (0..=duration_ms).step_by(POLL_INTERVAL_MS as usize) {
        source.set_clock(now_ms);
        let outcome = dashboard.tick(now_ms, LineLevels::RELEASED, &mut source);
        if outcome.frame_ready {
            frames[dashboard.position().linear()] = Some(dashboard.frame().clone());
            dashboard.mark_pushed();
        }
    }
    frames
}

fn save_png(
    frame: &Framebuffer,
    path: &Path,
) -> anyhow::Result<()> {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    display.draw_iter(frame.pixels()).ok();
    let settings = OutputSettingsBuilder::new().scale(2).build();
    display
        .to_rgb_output_image(&settings)
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    fs::create_dir_all(&cli.out).with_context(|| format!("creating {}", cli.out.display()))?;

    let frames = capture(cli.seconds * 1000);
    let mut written = 0;
    for (index, frame) in frames.iter().enumerate() {
        let position = Position::from_linear(index);
        let Some(frame) = frame else {
            log::warn!("page {index} never shown; run longer");
            continue;
        };
        let path = cli.out.join(format!("screen{}_page{}.png", position.screen(), position.page()));
        save_png(frame, &path)?;
        log::info!("wrote {}", path.display());
        written += 1;
    }
    if written == 0 {
        bail!("no pages rendered in {} s", cli.seconds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_demo_cycle_shows_every_page() {
        let cycle_ms = DashboardConfig::default().demo_interval_ms * PAGE_COUNT as u64;
        let frames = capture(cycle_ms);
        assert!(frames.iter().all(Option::is_some));
    }

    #[test]
    fn test_short_run_shows_first_page_only() {
        let frames = capture(1_000);
        assert!(frames[0].is_some());
        assert!(frames[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_png_written() {
        let dir = std::env::temp_dir().join(format!("lcd-stats-sim-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");
        save_png(&Framebuffer::new(), &path).unwrap();
        assert!(path.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
