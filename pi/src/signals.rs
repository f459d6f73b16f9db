//! SIGINT/SIGTERM handling.
//!
//! The main loop polls [`ShutdownFlag`] every iteration instead of blocking
//! on signals.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::{SIGINT, SIGTERM};

/// Set once SIGINT or SIGTERM arrives.
#[derive(Clone, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Flag wired to SIGINT and SIGTERM. Registration is best-effort.
    pub fn register() -> Self {
        let handler = Self::default();
        for (signal, name) in [(SIGINT, "SIGINT"), (SIGTERM, "SIGTERM")] {
            if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&handler.flag)) {
                log::warn!("Failed to register {name}: {e}");
            }
        }
        handler
    }

    pub fn should_shutdown(&self) -> bool { self.flag.load(Ordering::Relaxed) }

    pub fn request_shutdown(&self) { self.flag.store(true, Ordering::Relaxed); }
}
