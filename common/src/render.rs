//! Render state tracking for optimized display updates.
//!
//! The main loop ticks much faster than anything on screen changes, so a frame
//! is only re-rendered when something marked it dirty (navigation, backlight,
//! fresh data), and only pushed to the panel when its bytes differ from the
//! last frame the panel actually received.
//!
//! # Update Strategy
//!
//! | Event | Render | Push |
//! |-------|--------|------|
//! | Idle tick | No | No |
//! | Data refresh, same pixels | Yes | No |
//! | Data refresh, new pixels | Yes | Yes (if backlight on) |
//! | Backlight turned back on | Yes | Yes (forced) |

use crate::framebuffer::Framebuffer;

/// Tracks whether the frame needs re-rendering and what the panel last showed.
pub struct RenderState {
    dirty: bool,
    /// Copy of the last frame handed to the panel, valid when `has_pushed`.
    pushed: Framebuffer,
    has_pushed: bool,
}

impl RenderState {
    /// New state; the first tick always renders and pushes.
    pub const fn new() -> Self {
        Self {
            dirty: true,
            pushed: Framebuffer::new(),
            has_pushed: false,
        }
    }

    /// Request a re-render on the next tick.
    #[inline]
    pub fn mark_dirty(&mut self) { self.dirty = true; }

    /// Return and clear the dirty flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool { core::mem::replace(&mut self.dirty, false) }

    /// Whether `frame` differs from what the panel currently shows.
    pub fn needs_push(
        &self,
        frame: &Framebuffer,
    ) -> bool {
        !self.has_pushed || self.pushed != *frame
    }

    /// Remember `frame` as the panel's current content.
    pub fn record_push(
        &mut self,
        frame: &Framebuffer,
    ) {
        self.pushed.copy_from(frame);
        self.has_pushed = true;
    }

    /// Forget the panel's content so the next frame is pushed unconditionally.
    #[inline]
    pub fn invalidate(&mut self) { self.has_pushed = false; }
}

impl Default for RenderState {
    fn default() -> Self { Self::new() }
}
