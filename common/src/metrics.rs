//! Metric source contract and the values it produces.
//!
//! Pages pull every value they show through [`MetricSource`]. Each accessor
//! returns `None` when the value is unavailable (missing file, failed or
//! timed-out command, unparsable output); the page then renders a
//! placeholder for that field only. Implementations must return within a
//! bounded time because they run on the single UI loop.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::TOP_PROCESS_COUNT;

/// Short text value (hostnames, addresses, labels).
pub type Label = String<32>;

/// Process name as shown on the processes page (`comm` is at most 15 bytes).
pub type ProcessName = String<16>;

/// Build a [`Label`] from `text`, cutting it at the last character that fits.
pub fn label(text: &str) -> Label { truncated(text) }

/// Build a fixed-capacity string from `text`, cutting it at the last
/// character that fits.
pub fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Format into a [`Label`]; output that does not fit is cut.
pub fn label_fmt(args: core::fmt::Arguments<'_>) -> Label {
    let mut out = Label::new();
    let _ = out.write_fmt(args);
    out
}

// =============================================================================
// CPU
// =============================================================================

/// One throttling condition reported by the firmware.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThrottleFlag {
    UnderVoltage,
    FrequencyCapped,
    Throttled,
    SoftTempLimit,
}

impl ThrottleFlag {
    pub const ALL: [Self; 4] = [
        Self::UnderVoltage,
        Self::FrequencyCapped,
        Self::Throttled,
        Self::SoftTempLimit,
    ];

    /// Bit of the "currently active" flag; the since-boot flag is 16 bits higher.
    #[inline]
    pub const fn bit(self) -> u32 {
        match self {
            Self::UnderVoltage => 0,
            Self::FrequencyCapped => 1,
            Self::Throttled => 2,
            Self::SoftTempLimit => 3,
        }
    }

    pub const fn label(
        self,
        since_boot: bool,
    ) -> &'static str {
        match (self, since_boot) {
            (Self::UnderVoltage, false) => "Under-voltage",
            (Self::FrequencyCapped, false) => "Freq capped",
            (Self::Throttled, false) => "Throttled",
            (Self::SoftTempLimit, false) => "Soft temp limit",
            (Self::UnderVoltage, true) => "Under-volt (boot)",
            (Self::FrequencyCapped, true) => "Freq cap (boot)",
            (Self::Throttled, true) => "Throttled (boot)",
            (Self::SoftTempLimit, true) => "Soft limit (boot)",
        }
    }
}

/// Raw `get_throttled` bitmask: bits 0-3 are active now, bits 16-19 have
/// occurred since boot.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ThrottleFlags(pub u32);

impl ThrottleFlags {
    const SINCE_BOOT_SHIFT: u32 = 16;

    #[inline]
    pub const fn is_clear(self) -> bool { self.0 == 0 }

    #[inline]
    pub const fn is_active(
        self,
        flag: ThrottleFlag,
    ) -> bool {
        self.0 & (1 << flag.bit()) != 0
    }

    #[inline]
    pub const fn occurred_since_boot(
        self,
        flag: ThrottleFlag,
    ) -> bool {
        self.0 & (1 << (flag.bit() + Self::SINCE_BOOT_SHIFT)) != 0
    }

    /// Flags active right now.
    pub fn current(self) -> impl Iterator<Item = ThrottleFlag> {
        ThrottleFlag::ALL.into_iter().filter(move |f| self.is_active(*f))
    }

    /// Flags that occurred at some point since boot.
    pub fn since_boot(self) -> impl Iterator<Item = ThrottleFlag> {
        ThrottleFlag::ALL
            .into_iter()
            .filter(move |f| self.occurred_since_boot(*f))
    }
}

// =============================================================================
// Network
// =============================================================================

/// Cumulative byte counters of the monitored interface.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TrafficCounters {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
}

/// Radio link details; both come from one query of the wireless driver.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct WifiLink {
    /// e.g. `2437 MHz`
    pub frequency: Option<Label>,
    /// Transmit bitrate, e.g. `72.2 MBit/s`.
    pub bitrate: Option<Label>,
}

/// Cumulative error and drop counters across all interfaces.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct LinkFaults {
    pub errors: u64,
    pub drops: u64,
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct LoadAverage {
    pub one: f32,
    pub five: f32,
    pub fifteen: f32,
}

/// Memory figures in KiB, as reported by the kernel.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct MemoryStats {
    pub total_kb: u64,
    pub available_kb: u64,
    pub buffers_kb: u64,
    pub cached_kb: u64,
    pub dirty_kb: u64,
    pub swap_total_kb: u64,
    pub swap_free_kb: u64,
}

impl MemoryStats {
    #[inline]
    pub const fn used_kb(&self) -> u64 { self.total_kb.saturating_sub(self.available_kb) }

    pub fn used_percent(&self) -> f32 { percent(self.used_kb(), self.total_kb) }

    #[inline]
    pub const fn swap_used_kb(&self) -> u64 { self.swap_total_kb.saturating_sub(self.swap_free_kb) }

    pub fn swap_percent(&self) -> f32 { percent(self.swap_used_kb(), self.swap_total_kb) }

    #[inline]
    pub const fn has_swap(&self) -> bool { self.swap_total_kb > 0 }
}

/// Root filesystem usage in bytes.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    /// Space available to unprivileged users (excludes reserved blocks).
    pub available_bytes: u64,
}

impl DiskUsage {
    /// Used share of the space a user could fill, like `df`.
    pub fn used_percent(&self) -> f32 { percent(self.used_bytes, self.used_bytes + self.available_bytes) }
}

/// Cumulative disk transfer counters in bytes.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct IoCounters {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// A process and its recent CPU share.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ProcessInfo {
    pub name: ProcessName,
    pub cpu_percent: f32,
}

impl ProcessInfo {
    pub fn new(
        name: &str,
        cpu_percent: f32,
    ) -> Self {
        Self {
            name: truncated(name),
            cpu_percent,
        }
    }
}

pub type TopProcesses = Vec<ProcessInfo, TOP_PROCESS_COUNT>;

fn percent(
    part: u64,
    whole: u64,
) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    part as f32 * 100.0 / whole as f32
}

// =============================================================================
// Metric Source
// =============================================================================

/// Pull-based access to every metric the dashboard displays.
pub trait MetricSource {
    // CPU
    /// SoC temperature in C.
    fn cpu_temperature(&mut self) -> Option<f32>;
    /// Core voltage as reported, e.g. `1.2000V`.
    fn core_voltage(&mut self) -> Option<Label>;
    fn cpu_frequency_mhz(&mut self) -> Option<u32>;
    /// Busy share of all cores since the previous call, in percent.
    fn cpu_usage(&mut self) -> Option<f32>;
    fn cpu_governor(&mut self) -> Option<Label>;
    fn throttle_flags(&mut self) -> Option<ThrottleFlags>;

    // Network identity
    fn hostname(&mut self) -> Option<Label>;
    fn ip_address(&mut self) -> Option<Label>;
    fn mac_address(&mut self) -> Option<Label>;
    fn ssid(&mut self) -> Option<Label>;
    /// Signal level, e.g. `-52 dBm`.
    fn signal_level(&mut self) -> Option<Label>;
    /// Frequency and bitrate of the wireless link, read together.
    fn wifi_link(&mut self) -> WifiLink;
    /// Link quality from the wireless extensions.
    fn link_quality(&mut self) -> Option<Label>;
    fn default_gateway(&mut self) -> Option<Label>;
    fn dns_server(&mut self) -> Option<Label>;

    // Network counters
    fn traffic(&mut self) -> Option<TrafficCounters>;
    fn link_faults(&mut self) -> Option<LinkFaults>;
    /// Number of open inet sockets.
    fn socket_count(&mut self) -> Option<u32>;

    // Resources
    fn load_average(&mut self) -> Option<LoadAverage>;
    fn memory(&mut self) -> Option<MemoryStats>;
    /// GPU memory split, e.g. `76M`.
    fn gpu_memory(&mut self) -> Option<Label>;
    /// ARM memory split, e.g. `948M`.
    fn arm_memory(&mut self) -> Option<Label>;
    fn disk_usage(&mut self) -> Option<DiskUsage>;
    fn disk_io(&mut self) -> Option<IoCounters>;
    /// Share of CPU time spent waiting on I/O since the previous call, in percent.
    fn iowait_percent(&mut self) -> Option<f32>;
    fn process_count(&mut self) -> Option<u32>;
    /// Busiest processes since the previous call, highest first.
    fn top_processes(&mut self) -> Option<TopProcesses>;
    fn uptime_secs(&mut self) -> Option<u64>;
}

/// A source where every metric is unavailable.
#[cfg(test)]
pub(crate) struct NullSource;

#[cfg(test)]
impl MetricSource for NullSource {
    fn cpu_temperature(&mut self) -> Option<f32> { None }
    fn core_voltage(&mut self) -> Option<Label> { None }
    fn cpu_frequency_mhz(&mut self) -> Option<u32> { None }
    fn cpu_usage(&mut self) -> Option<f32> { None }
    fn cpu_governor(&mut self) -> Option<Label> { None }
    fn throttle_flags(&mut self) -> Option<ThrottleFlags> { None }
    fn hostname(&mut self) -> Option<Label> { None }
    fn ip_address(&mut self) -> Option<Label> { None }
    fn mac_address(&mut self) -> Option<Label> { None }
    fn ssid(&mut self) -> Option<Label> { None }
    fn signal_level(&mut self) -> Option<Label> { None }
    fn wifi_link(&mut self) -> WifiLink { WifiLink::default() }
    fn link_quality(&mut self) -> Option<Label> { None }
    fn default_gateway(&mut self) -> Option<Label> { None }
    fn dns_server(&mut self) -> Option<Label> { None }
    fn traffic(&mut self) -> Option<TrafficCounters> { None }
    fn link_faults(&mut self) -> Option<LinkFaults> { None }
    fn socket_count(&mut self) -> Option<u32> { None }
    fn load_average(&mut self) -> Option<LoadAverage> { None }
    fn memory(&mut self) -> Option<MemoryStats> { None }
    fn gpu_memory(&mut self) -> Option<Label> { None }
    fn arm_memory(&mut self) -> Option<Label> { None }
    fn disk_usage(&mut self) -> Option<DiskUsage> { None }
    fn disk_io(&mut self) -> Option<IoCounters> { None }
    fn iowait_percent(&mut self) -> Option<f32> { None }
    fn process_count(&mut self) -> Option<u32> { None }
    fn top_processes(&mut self) -> Option<TopProcesses> { None }
    fn uptime_secs(&mut self) -> Option<u64> { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_flags_split() {
        // Under-voltage now, throttled since boot
        let flags = ThrottleFlags(0x0004_0001);
        assert!(!flags.is_clear());
        assert_eq!(flags.current().collect::<std::vec::Vec<_>>(), [ThrottleFlag::UnderVoltage]);
        assert_eq!(flags.since_boot().collect::<std::vec::Vec<_>>(), [ThrottleFlag::Throttled]);
    }

    #[test]
    fn test_throttle_flags_clear() {
        let flags = ThrottleFlags(0);
        assert!(flags.is_clear());
        assert_eq!(flags.current().count(), 0);
        assert_eq!(flags.since_boot().count(), 0);
    }

    #[test]
    fn test_throttle_labels() {
        assert_eq!(ThrottleFlag::FrequencyCapped.label(false), "Freq capped");
        assert_eq!(ThrottleFlag::SoftTempLimit.label(true), "Soft limit (boot)");
    }

    #[test]
    fn test_memory_percentages() {
        let mem = MemoryStats {
            total_kb: 1000,
            available_kb: 250,
            swap_total_kb: 0,
            ..MemoryStats::default()
        };
        assert_eq!(mem.used_kb(), 750);
        assert_eq!(mem.used_percent(), 75.0);
        assert!(!mem.has_swap());
        assert_eq!(mem.swap_percent(), 0.0, "no swap must not divide by zero");
    }

    #[test]
    fn test_disk_percent_excludes_reserved() {
        let disk = DiskUsage {
            total_bytes: 110,
            used_bytes: 50,
            available_bytes: 50,
        };
        assert_eq!(disk.used_percent(), 50.0);
    }

    #[test]
    fn test_label_truncates_on_char_boundary() {
        let long = "é".repeat(40);
        let l = label(&long);
        assert_eq!(l.chars().count(), 16, "2-byte chars fill 32 bytes at 16 chars");
        let short: String<4> = truncated("abcdef");
        assert_eq!(short.as_str(), "abcd");
    }

    #[test]
    fn test_label_fmt() {
        assert_eq!(label_fmt(format_args!("{} MHz", 2437)).as_str(), "2437 MHz");
    }
}
