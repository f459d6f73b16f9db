//! Fixed-capacity rolling history for sparkline pages.
//!
//! The buffer is an index-based ring: `push` is O(1), memory is fixed at
//! construction and the oldest sample is evicted once the buffer is full.
//!
//! A sample may be [`GAP`] when the metric was unavailable for a tick. Gaps
//! occupy a slot like any other sample so the time axis stays regular, and
//! the sparkline primitive skips them instead of plotting them as zero.

use heapless::Vec;

use crate::config::HISTORY_SIZE;

/// Sentinel for "no data for this tick".
pub const GAP: f32 = f32::NAN;

/// Check whether a sample is the [`GAP`] sentinel.
#[inline]
pub fn is_gap(sample: f32) -> bool { sample.is_nan() }

/// Ring buffer of the most recent `N` samples, oldest first.
#[derive(Clone, Debug)]
pub struct HistoryBuffer<const N: usize = HISTORY_SIZE> {
    samples: [f32; N],
    /// Slot the next push writes to.
    head: usize,
    len: usize,
}

impl<const N: usize> HistoryBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            samples: [GAP; N],
            head: 0,
            len: 0,
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(
        &mut self,
        sample: f32,
    ) {
        if N == 0 {
            return;
        }
        self.samples[self.head] = sample;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Append `value`, or a [`GAP`] when the metric was unavailable.
    #[inline]
    pub fn push_or_gap(
        &mut self,
        value: Option<f32>,
    ) {
        self.push(value.unwrap_or(GAP));
    }

    #[inline]
    pub const fn len(&self) -> usize { self.len }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    #[inline]
    pub const fn capacity(&self) -> usize { N }

    /// Iterate samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        // When not yet full the oldest sample sits at index 0
        let start = if self.len < N { 0 } else { self.head };
        (0..self.len).map(move |i| self.samples[(start + i) % N])
    }

    /// Copy of the current samples, oldest first.
    pub fn snapshot(&self) -> Vec<f32, N> {
        let mut out = Vec::new();
        for sample in self.iter() {
            // Never exceeds N: len <= N
            let _ = out.push(sample);
        }
        out
    }

    /// Most recent sample; `None` when empty or when the last push was a gap.
    pub fn latest(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        Some(self.samples[(self.head + N - 1) % N]).filter(|s| !is_gap(*s))
    }

    /// Number of samples that are not gaps.
    pub fn real_count(&self) -> usize { self.iter().filter(|s| !is_gap(*s)).count() }
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
