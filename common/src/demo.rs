//! Demo-mode data.
//!
//! - [`DemoNetwork`] wraps a real source and swaps every network identity
//!   field (hostname, addresses, SSID, ...) for a fixed placeholder, so the
//!   screen can be recorded or shown without leaking the real network.
//! - [`SyntheticSource`] produces every metric from a clock, for the
//!   simulator and for tests that need a full, deterministic data set.

#[cfg(not(test))]
use micromath::F32Ext;

use crate::metrics::{
    DiskUsage,
    IoCounters,
    Label,
    LinkFaults,
    LoadAverage,
    MemoryStats,
    MetricSource,
    ProcessInfo,
    ThrottleFlags,
    TopProcesses,
    TrafficCounters,
    WifiLink,
    label,
};

// =============================================================================
// Placeholder Network Identity
// =============================================================================

pub const DEMO_HOSTNAME: &str = "raspberrypi";
pub const DEMO_IP: &str = "10.0.1.42";
pub const DEMO_SSID: &str = "MyHomeWiFi";
pub const DEMO_SIGNAL: &str = "-52 dBm";
pub const DEMO_MAC: &str = "b8:27:eb:a1:b2:c3";
pub const DEMO_GATEWAY: &str = "10.0.1.1";
pub const DEMO_DNS: &str = "1.1.1.1";
pub const DEMO_FREQUENCY: &str = "2437 MHz";
pub const DEMO_BITRATE: &str = "72.2 MBit/s";
pub const DEMO_QUALITY: &str = "48";

fn demo_link() -> WifiLink {
    WifiLink {
        frequency: Some(label(DEMO_FREQUENCY)),
        bitrate: Some(label(DEMO_BITRATE)),
    }
}

/// A source whose network identity is replaced by placeholders.
///
/// Counters (traffic, faults, sockets) and all CPU/resource metrics pass
/// through to the wrapped source unchanged.
pub struct DemoNetwork<S> {
    inner: S,
}

impl<S> DemoNetwork<S> {
    pub const fn new(inner: S) -> Self { Self { inner } }
}

impl<S: MetricSource> MetricSource for DemoNetwork<S> {
    fn cpu_temperature(&mut self) -> Option<f32> { self.inner.cpu_temperature() }

    fn core_voltage(&mut self) -> Option<Label> { self.inner.core_voltage() }

    fn cpu_frequency_mhz(&mut self) -> Option<u32> { self.inner.cpu_frequency_mhz() }

    fn cpu_usage(&mut self) -> Option<f32> { self.inner.cpu_usage() }

    fn cpu_governor(&mut self) -> Option<Label> { self.inner.cpu_governor() }

    fn throttle_flags(&mut self) -> Option<ThrottleFlags> { self.inner.throttle_flags() }

    fn hostname(&mut self) -> Option<Label> { Some(label(DEMO_HOSTNAME)) }

    fn ip_address(&mut self) -> Option<Label> { Some(label(DEMO_IP)) }

    fn mac_address(&mut self) -> Option<Label> { Some(label(DEMO_MAC)) }

    fn ssid(&mut self) -> Option<Label> { Some(label(DEMO_SSID)) }

    fn signal_level(&mut self) -> Option<Label> { Some(label(DEMO_SIGNAL)) }

    fn wifi_link(&mut self) -> WifiLink { demo_link() }

    fn link_quality(&mut self) -> Option<Label> { Some(label(DEMO_QUALITY)) }

    fn default_gateway(&mut self) -> Option<Label> { Some(label(DEMO_GATEWAY)) }

    fn dns_server(&mut self) -> Option<Label> { Some(label(DEMO_DNS)) }

    fn traffic(&mut self) -> Option<TrafficCounters> { self.inner.traffic() }

    fn link_faults(&mut self) -> Option<LinkFaults> { self.inner.link_faults() }

    fn socket_count(&mut self) -> Option<u32> { self.inner.socket_count() }

    fn load_average(&mut self) -> Option<LoadAverage> { self.inner.load_average() }

    fn memory(&mut self) -> Option<MemoryStats> { self.inner.memory() }

    fn gpu_memory(&mut self) -> Option<Label> { self.inner.gpu_memory() }

    fn arm_memory(&mut self) -> Option<Label> { self.inner.arm_memory() }

    fn disk_usage(&mut self) -> Option<DiskUsage> { self.inner.disk_usage() }

    fn disk_io(&mut self) -> Option<IoCounters> { self.inner.disk_io() }

    fn iowait_percent(&mut self) -> Option<f32> { self.inner.iowait_percent() }

    fn process_count(&mut self) -> Option<u32> { self.inner.process_count() }

    fn top_processes(&mut self) -> Option<TopProcesses> { self.inner.top_processes() }

    fn uptime_secs(&mut self) -> Option<u64> { self.inner.uptime_secs() }
}

// =============================================================================
// Synthetic Source
// =============================================================================

/// Boot offset of the synthetic uptime: 3 days, 5 hours.
const SYNTHETIC_BOOT_SECS: u64 = 3 * 86_400 + 5 * 3_600;

/// Every metric computed from a clock set by the caller.
///
/// Gauges follow slow sine waves; counters grow at a base rate plus a
/// wave that never makes them decrease.
#[derive(Clone, Debug, Default)]
pub struct SyntheticSource {
    now_ms: u64,
}

impl SyntheticSource {
    pub const fn new() -> Self { Self { now_ms: 0 } }

    /// Set the time every subsequent reading is computed for.
    pub fn set_clock(
        &mut self,
        now_ms: u64,
    ) {
        self.now_ms = now_ms;
    }

    #[inline]
    fn secs(&self) -> f32 { self.now_ms as f32 / 1000.0 }

    /// `mid + amp * sin(t / period)`.
    fn wave(
        &self,
        mid: f32,
        amp: f32,
        period: f32,
    ) -> f32 {
        mid + amp * (self.secs() / period).sin()
    }

    /// Monotonic counter growing at `base` per second, modulated by up to
    /// `amp` per second. Requires `amp <= base`.
    fn counter(
        &self,
        base: u64,
        amp: f32,
        period: f32,
    ) -> u64 {
        let linear = base * self.now_ms / 1000;
        // Integral of amp * sin(t / period), always >= 0
        let wobble = amp * period * (1.0 - (self.secs() / period).cos());
        linear + wobble as u64
    }
}

impl MetricSource for SyntheticSource {
    fn cpu_temperature(&mut self) -> Option<f32> { Some(self.wave(52.0, 9.0, 20.0)) }

    fn core_voltage(&mut self) -> Option<Label> { Some(label("1.2000V")) }

    fn cpu_frequency_mhz(&mut self) -> Option<u32> {
        let usage = self.wave(40.0, 30.0, 9.0);
        Some(if usage > 50.0 { 1500 } else { 600 })
    }

    fn cpu_usage(&mut self) -> Option<f32> { Some(self.wave(40.0, 30.0, 9.0)) }

    fn cpu_governor(&mut self) -> Option<Label> { Some(label("ondemand")) }

    fn throttle_flags(&mut self) -> Option<ThrottleFlags> {
        // Frequency capped now, under-voltage and throttling seen since boot
        Some(ThrottleFlags(0x0005_0002))
    }

    fn hostname(&mut self) -> Option<Label> { Some(label(DEMO_HOSTNAME)) }

    fn ip_address(&mut self) -> Option<Label> { Some(label(DEMO_IP)) }

    fn mac_address(&mut self) -> Option<Label> { Some(label(DEMO_MAC)) }

    fn ssid(&mut self) -> Option<Label> { Some(label(DEMO_SSID)) }

    fn signal_level(&mut self) -> Option<Label> { Some(label(DEMO_SIGNAL)) }

    fn wifi_link(&mut self) -> WifiLink { demo_link() }

    fn link_quality(&mut self) -> Option<Label> { Some(label(DEMO_QUALITY)) }

    fn default_gateway(&mut self) -> Option<Label> { Some(label(DEMO_GATEWAY)) }

    fn dns_server(&mut self) -> Option<Label> { Some(label(DEMO_DNS)) }

    fn traffic(&mut self) -> Option<TrafficCounters> {
        Some(TrafficCounters {
            tx_bytes: self.counter(12_000, 9_000.0, 7.0),
            rx_bytes: self.counter(48_000, 40_000.0, 11.0),
        })
    }

    fn link_faults(&mut self) -> Option<LinkFaults> { Some(LinkFaults { errors: 0, drops: 3 }) }

    fn socket_count(&mut self) -> Option<u32> { Some(14) }

    fn load_average(&mut self) -> Option<LoadAverage> {
        Some(LoadAverage {
            one: self.wave(0.6, 0.4, 15.0),
            five: self.wave(0.5, 0.2, 60.0),
            fifteen: 0.42,
        })
    }

    fn memory(&mut self) -> Option<MemoryStats> {
        let used = self.wave(380_000.0, 60_000.0, 30.0) as u64;
        Some(MemoryStats {
            total_kb: 948_304,
            available_kb: 948_304 - used,
            buffers_kb: 38_912,
            cached_kb: 301_056,
            dirty_kb: self.wave(600.0, 900.0, 13.0).max(0.0) as u64,
            swap_total_kb: 102_396,
            swap_free_kb: 97_280,
        })
    }

    fn gpu_memory(&mut self) -> Option<Label> { Some(label("76M")) }

    fn arm_memory(&mut self) -> Option<Label> { Some(label("948M")) }

    fn disk_usage(&mut self) -> Option<DiskUsage> {
        const GIB: u64 = 1024 * 1024 * 1024;
        Some(DiskUsage {
            total_bytes: 29 * GIB,
            used_bytes: 9 * GIB,
            available_bytes: 18 * GIB,
        })
    }

    fn disk_io(&mut self) -> Option<IoCounters> {
        Some(IoCounters {
            read_bytes: self.counter(20_000, 15_000.0, 5.0),
            written_bytes: self.counter(60_000, 50_000.0, 17.0),
        })
    }

    fn iowait_percent(&mut self) -> Option<f32> { Some(self.wave(6.0, 6.0, 10.0).max(0.0)) }

    fn process_count(&mut self) -> Option<u32> { Some(142) }

    fn top_processes(&mut self) -> Option<TopProcesses> {
        let mut top = TopProcesses::new();
        for (name, cpu) in [
            ("lcd-stats", self.wave(12.0, 4.0, 6.0)),
            ("python3", 6.5),
            ("kworker/0:1-events", 2.1),
            ("systemd", 0.7),
        ] {
            let _ = top.push(ProcessInfo::new(name, cpu));
        }
        Some(top)
    }

    fn uptime_secs(&mut self) -> Option<u64> { Some(SYNTHETIC_BOOT_SECS + self.now_ms / 1000) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_network_masks_identity() {
        let mut source = DemoNetwork::new(SyntheticSource::new());
        assert_eq!(source.hostname().as_deref(), Some(DEMO_HOSTNAME));
        assert_eq!(source.ip_address().as_deref(), Some(DEMO_IP));
        assert_eq!(source.dns_server().as_deref(), Some(DEMO_DNS));
    }

    #[test]
    fn test_demo_network_passes_counters_through() {
        let mut inner = SyntheticSource::new();
        inner.set_clock(5_000);
        let expected = inner.traffic();
        let mut source = DemoNetwork::new(inner);
        assert_eq!(source.traffic(), expected);
        assert_eq!(source.socket_count(), Some(14));
    }

    #[test]
    fn test_synthetic_counters_never_decrease() {
        let mut source = SyntheticSource::new();
        let mut last = TrafficCounters::default();
        for t in (0..120_000).step_by(500) {
            source.set_clock(t);
            let now = source.traffic().unwrap_or_default();
            assert!(now.tx_bytes >= last.tx_bytes, "tx went backwards at {t}");
            assert!(now.rx_bytes >= last.rx_bytes, "rx went backwards at {t}");
            last = now;
        }
    }

    #[test]
    fn test_synthetic_gauges_in_range() {
        let mut source = SyntheticSource::new();
        for t in (0..60_000).step_by(1_000) {
            source.set_clock(t);
            let temp = source.cpu_temperature().unwrap_or(0.0);
            assert!((40.0..=62.0).contains(&temp));
            let usage = source.cpu_usage().unwrap_or(-1.0);
            assert!((0.0..=100.0).contains(&usage));
        }
    }

    #[test]
    fn test_synthetic_top_processes_full() {
        let top = SyntheticSource::new().top_processes().unwrap_or_default();
        assert_eq!(top.len(), 4);
        assert_eq!(top[2].name.as_str(), "kworker/0:1-even", "names cut to 16 bytes");
    }
}
