//! The dashboard main loop.

use std::fmt::Debug;
use std::thread;
use std::time::{Duration, Instant};

use lcd_stats_common::config::POLL_INTERVAL_MS;
use lcd_stats_common::{Dashboard, InputLines, LineLevels, MetricSource, Panel};

use crate::signals::ShutdownFlag;

/// Run the dashboard until `shutdown` is set, then switch the backlight off.
///
/// Input read errors count as "nothing pressed" and push errors are logged;
/// neither stops the loop.
pub fn run<P, I, S>(
    dashboard: &mut Dashboard,
    panel: &mut P,
    input: &mut I,
    source: &mut S,
    shutdown: &ShutdownFlag,
) where
    P: Panel,
    P::Error: Debug,
    I: InputLines,
    I::Error: Debug,
    S: MetricSource + ?Sized,
{
    let started = Instant::now();
    let poll = Duration::from_millis(POLL_INTERVAL_MS);
    log::info!("Main loop starting");

    while !shutdown.should_shutdown() {
        let tick_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        let levels = input.sample().unwrap_or_else(|e| {
            log::debug!("input read failed: {e:?}");
            LineLevels::RELEASED
        });
        let outcome = dashboard.tick(now_ms, levels, source);
        if let Err(e) = dashboard.present(&outcome, panel) {
            log::warn!("panel update failed: {e:?}");
        }

        thread::sleep(poll.saturating_sub(tick_start.elapsed()));
    }

    log::info!("Shutting down");
    if let Err(e) = panel.set_backlight(false) {
        log::warn!("failed to switch backlight off: {e:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use lcd_stats_common::demo::SyntheticSource;
    use lcd_stats_common::{DashboardConfig, Framebuffer};

    use super::*;

    /// Requests shutdown after a fixed number of frames.
    struct StoppingPanel {
        frames: usize,
        stop_after: usize,
        backlight: Option<bool>,
        shutdown: ShutdownFlag,
    }

    impl Panel for StoppingPanel {
        type Error = Infallible;

        fn push_frame(
            &mut self,
            _frame: &Framebuffer,
        ) -> Result<(), Self::Error> {
            self.frames += 1;
            if self.frames >= self.stop_after {
                self.shutdown.request_shutdown();
            }
            Ok(())
        }

        fn set_backlight(
            &mut self,
            on: bool,
        ) -> Result<(), Self::Error> {
            self.backlight = Some(on);
            Ok(())
        }
    }

    struct Idle;

    impl InputLines for Idle {
        type Error = Infallible;

        fn sample(&mut self) -> Result<LineLevels, Self::Error> { Ok(LineLevels::RELEASED) }
    }

    #[test]
    fn test_runs_until_shutdown_then_darkens() {
        let shutdown = ShutdownFlag::default();
        let mut panel = StoppingPanel {
            frames: 0,
            stop_after: 1,
            backlight: None,
            shutdown: shutdown.clone(),
        };
        let mut dashboard = Dashboard::new(DashboardConfig::default(), 0);

        run(&mut dashboard, &mut panel, &mut Idle, &mut SyntheticSource::new(), &shutdown);

        assert_eq!(panel.frames, 1);
        assert_eq!(panel.backlight, Some(false));
    }

    #[test]
    fn test_preset_shutdown_skips_loop() {
        let shutdown = ShutdownFlag::default();
        shutdown.request_shutdown();
        let mut panel = StoppingPanel {
            frames: 0,
            stop_after: usize::MAX,
            backlight: None,
            shutdown: shutdown.clone(),
        };
        let mut dashboard = Dashboard::new(DashboardConfig::default(), 0);

        run(&mut dashboard, &mut panel, &mut Idle, &mut SyntheticSource::new(), &shutdown);

        assert_eq!(panel.frames, 0);
        assert_eq!(panel.backlight, Some(false));
    }
}
