//! `lcd-stats`: system stats on the Waveshare 1.44" LCD HAT.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use lcd_stats_common::demo::DemoNetwork;
use lcd_stats_common::{Dashboard, DashboardConfig, MetricSource};
use lcd_stats_pi::config::{GPIO_CHIP, SPI_DEVICE};
use lcd_stats_pi::signals::ShutdownFlag;
use lcd_stats_pi::sources::HostSource;
use lcd_stats_pi::{app, display};

#[derive(Parser, Debug)]
#[command(name = "lcd-stats", version, about)]
struct Cli {
    /// Auto-advance through every page with placeholder network identity
    #[arg(long)]
    demo: bool,

    /// SPI device of the panel
    #[arg(long, value_name = "PATH", default_value = SPI_DEVICE)]
    spi: PathBuf,

    /// GPIO character device of the control and button lines
    #[arg(long, value_name = "PATH", default_value = GPIO_CHIP)]
    gpiochip: PathBuf,

    /// Data refresh interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(100..))]
    refresh_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mode = if cli.demo { "demo" } else { "interactive" };
    log::info!("lcd-stats {} starting ({mode} mode)", env!("CARGO_PKG_VERSION"));

    let (mut panel, mut buttons) = match display::open(&cli.spi, &cli.gpiochip) {
        Ok(hardware) => hardware,
        Err(e) if e.is_not_found() => {
            log::info!("{e}; exiting");
            return Ok(());
        }
        Err(e) => return Err(e).context("initialising LCD HAT"),
    };

    let mut config = DashboardConfig {
        demo: cli.demo,
        ..DashboardConfig::default()
    };
    if let Some(ms) = cli.refresh_ms {
        config.refresh_interval_ms = ms;
    }
    let mut dashboard = Dashboard::new(config, 0);

    let host = HostSource::new();
    let mut source: Box<dyn MetricSource> = if cli.demo {
        Box::new(DemoNetwork::new(host))
    } else {
        Box::new(host)
    };

    let shutdown = ShutdownFlag::register();
    app::run(&mut dashboard, &mut panel, &mut buttons, source.as_mut(), &shutdown);
    Ok(())
}
