//! Centralized severity threshold configuration.
//!
//! All breakpoints are compile-time constants with ordering assertions, so a
//! misconfigured pair (e.g., `CRITICAL < WARNING`) fails the build.
//!
//! Breakpoints are inclusive on the upper category: a value equal to the
//! warning breakpoint is already a warning.

/// Severity category of a measured value.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

/// Warning and critical breakpoints for one kind of measurement.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Thresholds {
    pub warning: f32,
    pub critical: f32,
}

impl Thresholds {
    pub const fn new(
        warning: f32,
        critical: f32,
    ) -> Self {
        Self { warning, critical }
    }

    /// Classify a value. NaN is never above a breakpoint, so it is `Normal`.
    #[inline]
    pub fn severity(
        &self,
        value: f32,
    ) -> Severity {
        if value >= self.critical {
            Severity::Critical
        } else if value >= self.warning {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

// =============================================================================
// CPU Temperature
// =============================================================================

/// Temperature where the SoC leaves the comfortable range (C).
pub const TEMP_WARNING: f32 = 50.0;

/// Temperature approaching the firmware soft limit (C).
pub const TEMP_CRITICAL: f32 = 70.0;

const _: () = assert!(TEMP_WARNING < TEMP_CRITICAL);

pub const TEMPERATURE: Thresholds = Thresholds::new(TEMP_WARNING, TEMP_CRITICAL);

/// Fixed vertical range of the temperature sparkline (C).
pub const TEMP_HISTORY_MIN: f32 = 25.0;
pub const TEMP_HISTORY_MAX: f32 = 85.0;

const _: () = assert!(TEMP_HISTORY_MIN < TEMP_WARNING);
const _: () = assert!(TEMP_CRITICAL < TEMP_HISTORY_MAX);

// =============================================================================
// Utilisation Percentages (CPU, RAM, disk, swap, per-process CPU)
// =============================================================================

pub const PERCENT_WARNING: f32 = 50.0;
pub const PERCENT_CRITICAL: f32 = 80.0;

const _: () = assert!(PERCENT_WARNING < PERCENT_CRITICAL);
const _: () = assert!(PERCENT_CRITICAL <= 100.0);

pub const UTILISATION: Thresholds = Thresholds::new(PERCENT_WARNING, PERCENT_CRITICAL);

// =============================================================================
// Single-breakpoint Alerts
// =============================================================================

/// Dirty page cache above this many KiB is highlighted.
pub const DIRTY_WARNING_KB: u64 = 1024;

/// iowait above this percentage is highlighted.
pub const IOWAIT_CRITICAL: f32 = 10.0;

/// Check if the amount of dirty memory deserves attention.
#[inline]
pub const fn is_dirty_high(dirty_kb: u64) -> bool { dirty_kb > DIRTY_WARNING_KB }

/// Check if the CPU is spending too long waiting on I/O.
#[inline]
pub fn is_iowait_high(percent: f32) -> bool { percent > IOWAIT_CRITICAL }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_boundaries_inclusive() {
        assert_eq!(TEMPERATURE.severity(49.0), Severity::Normal);
        assert_eq!(TEMPERATURE.severity(50.0), Severity::Warning, "50C is a warning");
        assert_eq!(TEMPERATURE.severity(69.9), Severity::Warning);
        assert_eq!(TEMPERATURE.severity(70.0), Severity::Critical, "70C is critical");
        assert_eq!(TEMPERATURE.severity(71.0), Severity::Critical);
    }

    #[test]
    fn test_utilisation_boundaries() {
        assert_eq!(UTILISATION.severity(0.0), Severity::Normal);
        assert_eq!(UTILISATION.severity(49.9), Severity::Normal);
        assert_eq!(UTILISATION.severity(50.0), Severity::Warning);
        assert_eq!(UTILISATION.severity(80.0), Severity::Critical);
        assert_eq!(UTILISATION.severity(100.0), Severity::Critical);
    }

    #[test]
    fn test_nan_is_normal() {
        assert_eq!(TEMPERATURE.severity(f32::NAN), Severity::Normal);
    }

    #[test]
    fn test_single_breakpoint_alerts() {
        assert!(!is_dirty_high(1024));
        assert!(is_dirty_high(1025));
        assert!(!is_iowait_high(10.0));
        assert!(is_iowait_high(10.5));
    }
}
