//! One iteration of the dashboard loop.
//!
//! [`Dashboard::tick`] runs the whole loop body deterministically for a given
//! time and input sample:
//!
//! 1. Feed the line levels through the [`Debouncer`] and apply every
//!    confirmed press to the [`NavState`].
//! 2. In demo mode, advance to the next page once the idle interval elapsed.
//! 3. Refresh the active page when the refresh interval elapsed or the
//!    active page just changed.
//! 4. Re-render the framebuffer if anything above changed it.
//!
//! The caller owns the clock, the inputs and the panel. It pushes the frame
//! when [`TickOutcome::frame_ready`] is set (see [`Dashboard::present`]).

use crate::config::{DEBOUNCE_MS, DEMO_PAGE_INTERVAL_MS, REFRESH_INTERVAL_MS};
use crate::device::Panel;
use crate::framebuffer::Framebuffer;
use crate::input::{Debouncer, LineLevels};
use crate::metrics::MetricSource;
use crate::navigation::{NavChange, NavState, Position};
use crate::pages::{Page, PageSet, render_frame};
use crate::render::RenderState;

/// Timing and mode of a [`Dashboard`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DashboardConfig {
    /// Minimum time between two refreshes of the active page.
    pub refresh_interval_ms: u64,
    /// Idle time after which demo mode advances to the next page.
    pub demo_interval_ms: u64,
    pub debounce_ms: u64,
    pub demo: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: REFRESH_INTERVAL_MS,
            demo_interval_ms: DEMO_PAGE_INTERVAL_MS,
            debounce_ms: DEBOUNCE_MS,
            demo: false,
        }
    }
}

/// What a [`Dashboard::tick`] changed.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TickOutcome {
    /// New backlight state, when it was toggled.
    pub backlight: Option<bool>,
    /// The framebuffer holds a frame the panel should receive.
    pub frame_ready: bool,
    /// The active page pulled new data.
    pub refreshed: bool,
    /// The active page changed.
    pub moved: bool,
}

/// Navigation, pages and the framebuffer of the running dashboard.
pub struct Dashboard {
    config: DashboardConfig,
    nav: NavState,
    debouncer: Debouncer,
    pages: PageSet,
    frame: Framebuffer,
    render: RenderState,
    last_refresh_ms: Option<u64>,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        now_ms: u64,
    ) -> Self {
        if config.demo {
            log::info!("demo mode: advancing every {} ms", config.demo_interval_ms);
        }
        Self {
            config,
            nav: NavState::new(config.demo, now_ms),
            debouncer: Debouncer::new(config.debounce_ms),
            pages: PageSet::new(),
            frame: Framebuffer::new(),
            render: RenderState::new(),
            last_refresh_ms: None,
        }
    }

    #[inline]
    pub const fn config(&self) -> &DashboardConfig { &self.config }

    #[inline]
    pub const fn nav(&self) -> &NavState { &self.nav }

    #[inline]
    pub const fn position(&self) -> Position { self.nav.position() }

    /// The most recently rendered frame.
    #[inline]
    pub const fn frame(&self) -> &Framebuffer { &self.frame }

    /// Run one loop iteration.
    pub fn tick<S: MetricSource + ?Sized>(
        &mut self,
        now_ms: u64,
        levels: LineLevels,
        source: &mut S,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for button in self.debouncer.poll(levels, now_ms) {
            match self.nav.apply(button, now_ms) {
                NavChange::Moved { .. } => outcome.moved = true,
                NavChange::Backlight(on) => {
                    log::info!("backlight {}", if on { "on" } else { "off" });
                    if on {
                        // The panel may have been cleared while dark
                        self.render.invalidate();
                    }
                    self.render.mark_dirty();
                    outcome.backlight = Some(on);
                }
                NavChange::Unchanged => {}
            }
        }

        if let Some(position) = self.nav.demo_tick(now_ms, self.config.demo_interval_ms) {
            log::debug!("demo: page {}", position.linear());
            outcome.moved = true;
        }

        let position = self.nav.position();
        let due = outcome.moved
            || self
                .last_refresh_ms
                .is_none_or(|at| now_ms.saturating_sub(at) >= self.config.refresh_interval_ms);
        if due {
            let page = self.pages.get_mut(position);
            log::debug!("refresh {}", page.name());
            page.refresh(source, now_ms);
            self.last_refresh_ms = Some(now_ms);
            self.render.mark_dirty();
            outcome.refreshed = true;
        }

        if self.render.take_dirty() {
            render_frame(&mut self.frame, position, self.pages.get(position));
        }
        outcome.frame_ready = self.nav.backlight() && self.render.needs_push(&self.frame);
        outcome
    }

    /// Record that the panel now shows [`Self::frame`].
    pub fn mark_pushed(&mut self) { self.render.record_push(&self.frame); }

    /// Apply `outcome` to `panel`: switch the backlight and push the frame
    /// when ready.
    pub fn present<P: Panel>(
        &mut self,
        outcome: &TickOutcome,
        panel: &mut P,
    ) -> Result<(), P::Error> {
        if outcome.frame_ready {
            panel.push_frame(&self.frame)?;
            self.mark_pushed();
            log::debug!("frame pushed");
        }
        if let Some(on) = outcome.backlight {
            panel.set_backlight(on)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::POLL_INTERVAL_MS;
    use crate::demo::SyntheticSource;
    use crate::input::Button;

    /// Records what reached the panel.
    #[derive(Default)]
    struct RecordingPanel {
        frames: usize,
        backlight: std::vec::Vec<bool>,
    }

    impl Panel for RecordingPanel {
        type Error = core::convert::Infallible;

        fn push_frame(
            &mut self,
            _frame: &Framebuffer,
        ) -> Result<(), Self::Error> {
            self.frames += 1;
            Ok(())
        }

        fn set_backlight(
            &mut self,
            on: bool,
        ) -> Result<(), Self::Error> {
            self.backlight.push(on);
            Ok(())
        }
    }

    struct Harness {
        dashboard: Dashboard,
        source: SyntheticSource,
        panel: RecordingPanel,
        now_ms: u64,
    }

    impl Harness {
        fn new(demo: bool) -> Self {
            let config = DashboardConfig {
                demo,
                ..Default::default()
            };
            Self {
                dashboard: Dashboard::new(config, 0),
                source: SyntheticSource::new(),
                panel: RecordingPanel::default(),
                now_ms: 0,
            }
        }

        fn step(
            &mut self,
            levels: LineLevels,
        ) -> TickOutcome {
            self.source.set_clock(self.now_ms);
            let outcome = self.dashboard.tick(self.now_ms, levels, &mut self.source);
            self.dashboard.present(&outcome, &mut self.panel).ok();
            self.now_ms += POLL_INTERVAL_MS;
            outcome
        }

        fn idle(
            &mut self,
            duration_ms: u64,
        ) {
            for _ in 0..duration_ms / POLL_INTERVAL_MS {
                self.step(LineLevels::RELEASED);
            }
        }

        /// Hold `button` long enough to pass the debouncer, then release it.
        fn press(
            &mut self,
            button: Button,
        ) {
            for _ in 0..4 {
                self.step(LineLevels::only(button));
            }
            self.idle(100);
        }
    }

    #[test]
    fn test_first_tick_refreshes_and_pushes() {
        let mut h = Harness::new(false);
        let outcome = h.step(LineLevels::RELEASED);
        assert!(outcome.refreshed);
        assert!(outcome.frame_ready);
        assert_eq!(h.panel.frames, 1);
    }

    #[test]
    fn test_refresh_cadence() {
        let mut h = Harness::new(false);
        let mut refreshes = 0;
        for _ in 0..(REFRESH_INTERVAL_MS * 3 / POLL_INTERVAL_MS) {
            if h.step(LineLevels::RELEASED).refreshed {
                refreshes += 1;
            }
        }
        // t = 0, 2000 and 4000 within [0, 6000)
        assert_eq!(refreshes, 3);
    }

    #[test]
    fn test_idle_ticks_do_not_push() {
        let mut h = Harness::new(false);
        h.step(LineLevels::RELEASED);
        h.idle(1_000);
        assert_eq!(h.panel.frames, 1);
    }

    #[test]
    fn test_end_to_end_navigation() {
        let mut h = Harness::new(false);
        h.step(LineLevels::RELEASED);
        for button in [Button::Right, Button::Right, Button::Down, Button::Press] {
            h.press(button);
        }
        assert_eq!(h.dashboard.position(), Position::new(2, 1));
        assert!(!h.dashboard.nav().backlight());
        assert_eq!(h.panel.backlight, [false]);

        h.press(Button::Key1);
        assert_eq!(h.dashboard.position(), Position::new(0, 0));
        assert!(!h.dashboard.nav().backlight());
    }

    #[test]
    fn test_navigation_refreshes_new_page_immediately() {
        let mut h = Harness::new(false);
        h.step(LineLevels::RELEASED);
        let mut refreshed_on_move = false;
        for _ in 0..4 {
            let outcome = h.step(LineLevels::only(Button::Key3));
            if outcome.moved {
                refreshed_on_move = outcome.refreshed;
            }
        }
        assert!(refreshed_on_move);
        assert_eq!(h.dashboard.position(), Position::new(2, 0));
    }

    #[test]
    fn test_backlight_off_suppresses_push_and_on_forces_it() {
        let mut h = Harness::new(false);
        h.step(LineLevels::RELEASED);
        h.press(Button::Press);
        let pushed_before = h.panel.frames;

        // Data keeps refreshing while dark but nothing is pushed
        h.idle(REFRESH_INTERVAL_MS * 2);
        assert_eq!(h.panel.frames, pushed_before);

        h.press(Button::Press);
        assert_eq!(h.panel.frames, pushed_before + 1);
        assert_eq!(h.panel.backlight, [false, true]);
    }

    #[test]
    fn test_demo_mode_advances_and_wraps() {
        let mut h = Harness::new(true);
        h.step(LineLevels::RELEASED);
        h.idle(DEMO_PAGE_INTERVAL_MS * 9);
        assert_eq!(h.dashboard.position(), Position::new(0, 0));

        h.idle(DEMO_PAGE_INTERVAL_MS);
        assert_eq!(h.dashboard.position(), Position::new(0, 1));
    }

    #[test]
    fn test_demo_input_restarts_idle_timer() {
        let mut h = Harness::new(true);
        h.step(LineLevels::RELEASED);
        h.idle(DEMO_PAGE_INTERVAL_MS - 500);
        h.press(Button::Key2);
        h.idle(DEMO_PAGE_INTERVAL_MS - 500);
        assert_eq!(h.dashboard.position(), Position::new(1, 0));
    }
}
