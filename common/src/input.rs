//! Debouncing of the joystick and the three keys.
//!
//! Each line runs its own small state machine:
//!
//! ```text
//! Idle --raw pressed--> Candidate --held for DEBOUNCE_MS--> Confirmed (event) --raw released--> Releasing --held--> Idle
//!          ^               |                                     ^                                 |
//!          +--raw released-+                                     +----------raw pressed------------+
//! ```
//!
//! A press is reported once when `Confirmed` is entered and never again while
//! the line stays down (no auto-repeat). Bounces shorter than the window, in
//! either direction, are absorbed.

use heapless::Vec;

use crate::config::DEBOUNCE_MS;

/// Number of physical input lines.
pub const LINE_COUNT: usize = 8;

/// A physical input line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Joystick centre push.
    Press,
    Key1,
    Key2,
    Key3,
}

impl Button {
    pub const ALL: [Self; LINE_COUNT] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Press,
        Self::Key1,
        Self::Key2,
        Self::Key3,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Press => 4,
            Self::Key1 => 5,
            Self::Key2 => 6,
            Self::Key3 => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Press => "PRESS",
            Self::Key1 => "KEY1",
            Self::Key2 => "KEY2",
            Self::Key3 => "KEY3",
        }
    }
}

/// Raw "pressed" level of all eight lines, one bit per [`Button::index`].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct LineLevels(u8);

impl LineLevels {
    /// All lines released.
    pub const RELEASED: Self = Self(0);

    /// Return a copy with `button` set to `pressed`.
    #[inline]
    pub const fn with(
        self,
        button: Button,
        pressed: bool,
    ) -> Self {
        let mask = 1 << button.index();
        if pressed { Self(self.0 | mask) } else { Self(self.0 & !mask) }
    }

    /// Levels with exactly `button` pressed.
    #[inline]
    pub const fn only(button: Button) -> Self { Self::RELEASED.with(button, true) }

    #[inline]
    pub const fn is_pressed(
        self,
        button: Button,
    ) -> bool {
        self.0 & (1 << button.index()) != 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LineState {
    Idle,
    Candidate { since_ms: u64 },
    Confirmed,
    Releasing { since_ms: u64 },
}

/// Debounce state of one line.
#[derive(Clone, Copy, Debug)]
pub struct LineDebouncer {
    state: LineState,
}

impl LineDebouncer {
    /// Create a line in the released state.
    pub const fn new() -> Self { Self { state: LineState::Idle } }

    /// Feed one raw sample. Returns true exactly once per confirmed press.
    pub fn update(
        &mut self,
        pressed: bool,
        now_ms: u64,
        window_ms: u64,
    ) -> bool {
        let elapsed = |since: u64| now_ms.saturating_sub(since) >= window_ms;
        let (next, fired) = match (self.state, pressed) {
            (LineState::Idle, true) if window_ms == 0 => (LineState::Confirmed, true),
            (LineState::Idle, true) => (LineState::Candidate { since_ms: now_ms }, false),
            (LineState::Idle, false) => (LineState::Idle, false),
            (LineState::Candidate { since_ms }, true) if elapsed(since_ms) => (LineState::Confirmed, true),
            (LineState::Candidate { .. }, true) => (self.state, false),
            (LineState::Candidate { .. }, false) => (LineState::Idle, false),
            (LineState::Confirmed, true) => (LineState::Confirmed, false),
            (LineState::Confirmed, false) => (LineState::Releasing { since_ms: now_ms }, false),
            (LineState::Releasing { .. }, true) => (LineState::Confirmed, false),
            (LineState::Releasing { since_ms }, false) if elapsed(since_ms) => (LineState::Idle, false),
            (LineState::Releasing { .. }, false) => (self.state, false),
        };
        self.state = next;
        fired
    }
}

impl Default for LineDebouncer {
    fn default() -> Self { Self::new() }
}

/// Debouncer for all eight lines.
pub struct Debouncer {
    lines: [LineDebouncer; LINE_COUNT],
    window_ms: u64,
}

impl Debouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            lines: [LineDebouncer::new(); LINE_COUNT],
            window_ms,
        }
    }

    /// Feed one sample of every line and return the presses confirmed by it,
    /// in [`Button::ALL`] order.
    pub fn poll(
        &mut self,
        levels: LineLevels,
        now_ms: u64,
    ) -> Vec<Button, LINE_COUNT> {
        let mut events = Vec::new();
        for button in Button::ALL {
            if self.lines[button.index()].update(levels.is_pressed(button), now_ms, self.window_ms) {
                // At most one event per line per poll
                let _ = events.push(button);
            }
        }
        events
    }
}

impl Default for Debouncer {
    fn default() -> Self { Self::new(DEBOUNCE_MS) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `levels(t)` every 10 ms from 0 to `until_ms` and collect all events.
    fn run(
        until_ms: u64,
        levels: impl Fn(u64) -> LineLevels,
    ) -> std::vec::Vec<(u64, Button)> {
        let mut debouncer = Debouncer::new(DEBOUNCE_MS);
        let mut out = std::vec::Vec::new();
        for t in (0..=until_ms).step_by(10) {
            for b in debouncer.poll(levels(t), t) {
                out.push((t, b));
            }
        }
        out
    }

    #[test]
    fn test_button_indices_unique() {
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }

    #[test]
    fn test_line_levels_bits() {
        let levels = LineLevels::only(Button::Key2).with(Button::Up, true);
        assert!(levels.is_pressed(Button::Key2));
        assert!(levels.is_pressed(Button::Up));
        assert!(!levels.is_pressed(Button::Down));
        assert!(!levels.with(Button::Up, false).is_pressed(Button::Up));
    }

    #[test]
    fn test_stable_press_fires_once() {
        let events = run(500, |t| LineLevels::RELEASED.with(Button::Left, t >= 100));
        assert_eq!(events, [(150, Button::Left)], "one event, after the 50 ms window");
    }

    #[test]
    fn test_bounce_faster_than_window_fires_nothing() {
        // Toggles every 20 ms, never stable for 50 ms
        let events = run(1_000, |t| LineLevels::RELEASED.with(Button::Press, (t / 20) % 2 == 0));
        assert!(events.is_empty(), "got {events:?}");
    }

    #[test]
    fn test_bouncy_press_then_hold_fires_once() {
        let events = run(600, |t| {
            let pressed = match t {
                0..100 => false,
                100..140 => (t / 10) % 2 == 0,
                _ => true,
            };
            LineLevels::RELEASED.with(Button::Key1, pressed)
        });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, Button::Key1);
    }

    #[test]
    fn test_release_bounce_does_not_refire() {
        let events = run(800, |t| {
            let pressed = match t {
                100..300 => true,
                // Contact chatter on release
                300..330 => (t / 10) % 2 == 1,
                _ => false,
            };
            LineLevels::RELEASED.with(Button::Down, pressed)
        });
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_two_distinct_presses() {
        let events = run(800, |t| {
            let pressed = (100..200).contains(&t) || (400..500).contains(&t);
            LineLevels::RELEASED.with(Button::Right, pressed)
        });
        assert_eq!(events, [(150, Button::Right), (450, Button::Right)]);
    }

    #[test]
    fn test_lines_are_independent() {
        let events = run(300, |t| {
            LineLevels::only(Button::Up).with(Button::Key3, t >= 20)
        });
        assert_eq!(events, [(50, Button::Up), (70, Button::Key3)]);
    }
}
