//! Parsers for `/proc`, `/sys` and command output.
//!
//! Every parser takes the text it needs and returns `None` when the input is
//! malformed, so the callers stay a thin layer of file reads.

use lcd_stats_common::metrics::{IoCounters, Label, LinkFaults, LoadAverage, MemoryStats, TrafficCounters, label};

/// Bytes per sector in `/proc/diskstats`.
const SECTOR_BYTES: u64 = 512;

// =============================================================================
// CPU
// =============================================================================

/// Aggregate CPU time from the `cpu` line of `/proc/stat`, in clock ticks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CpuTimes {
    pub total: u64,
    /// Idle plus iowait.
    pub idle: u64,
    pub iowait: u64,
}

impl CpuTimes {
    /// Busy share in percent since `previous`, or since boot without one.
    pub fn usage_since(
        &self,
        previous: Option<&Self>,
    ) -> Option<f32> {
        let (total, idle) = match previous {
            Some(p) => (self.total.checked_sub(p.total)?, self.idle.checked_sub(p.idle)?),
            None => (self.total, self.idle),
        };
        if total == 0 {
            return None;
        }
        Some(total.saturating_sub(idle) as f32 * 100.0 / total as f32)
    }

    /// I/O wait share in percent since `previous`, or since boot without one.
    pub fn iowait_since(
        &self,
        previous: Option<&Self>,
    ) -> Option<f32> {
        let (total, iowait) = match previous {
            Some(p) => (self.total.checked_sub(p.total)?, self.iowait.checked_sub(p.iowait)?),
            None => (self.total, self.iowait),
        };
        if total == 0 {
            return None;
        }
        Some(iowait as f32 * 100.0 / total as f32)
    }
}

/// `cpu  user nice system idle iowait irq softirq steal ...`
pub fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 5 {
        return None;
    }
    // guest and guest_nice are already counted in user and nice
    let total = fields.iter().take(8).sum();
    Some(CpuTimes {
        total,
        idle: fields[3] + fields[4],
        iowait: fields[4],
    })
}

/// `temp=48.3'C`
pub fn parse_vcgencmd_temp(output: &str) -> Option<f32> {
    vcgencmd_value(output)?.trim_end_matches("'C").parse().ok()
}

/// Value of a `key=value` line, e.g. `volt=1.2000V` or `gpu=76M`.
pub fn vcgencmd_value(output: &str) -> Option<&str> {
    let (_, value) = output.trim().split_once('=')?;
    (!value.is_empty()).then_some(value)
}

/// `throttled=0x50005`
pub fn parse_throttled(output: &str) -> Option<u32> {
    let value = vcgencmd_value(output)?;
    u32::from_str_radix(value.trim_start_matches("0x"), 16).ok()
}

/// Millidegrees from a thermal zone.
pub fn parse_thermal_zone(text: &str) -> Option<f32> { text.trim().parse::<i64>().ok().map(|m| m as f32 / 1000.0) }

/// `scaling_cur_freq` in kHz to MHz.
pub fn parse_frequency_mhz(text: &str) -> Option<u32> { text.trim().parse::<u32>().ok().map(|khz| khz / 1000) }

// =============================================================================
// Network
// =============================================================================

/// Columns of one `/proc/net/dev` interface line.
struct NetDevLine<'a> {
    name: &'a str,
    values: Vec<u64>,
}

fn net_dev_lines(text: &str) -> impl Iterator<Item = NetDevLine<'_>> {
    // Two header lines
    text.lines().skip(2).filter_map(|line| {
        let (name, rest) = line.split_once(':')?;
        let values = rest
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<u64>, _>>()
            .ok()?;
        (values.len() >= 16).then_some(NetDevLine {
            name: name.trim(),
            values,
        })
    })
}

/// Byte counters of `interface`.
pub fn parse_net_dev_traffic(
    text: &str,
    interface: &str,
) -> Option<TrafficCounters> {
    let line = net_dev_lines(text).find(|l| l.name == interface)?;
    Some(TrafficCounters {
        rx_bytes: line.values[0],
        tx_bytes: line.values[8],
    })
}

/// Errors and drops summed over every interface and both directions.
pub fn parse_net_dev_faults(text: &str) -> Option<LinkFaults> {
    let mut seen = false;
    let mut faults = LinkFaults::default();
    for line in net_dev_lines(text) {
        seen = true;
        faults.errors += line.values[2] + line.values[10];
        faults.drops += line.values[3] + line.values[11];
    }
    seen.then_some(faults)
}

/// Entries in a `/proc/net/{tcp,udp}*` table (one header line).
pub fn count_socket_entries(text: &str) -> u32 { text.lines().skip(1).filter(|l| !l.trim().is_empty()).count() as u32 }

/// Link quality of `interface` from `/proc/net/wireless`, e.g. `48`.
pub fn parse_wireless_quality(
    text: &str,
    interface: &str,
) -> Option<Label> {
    let line = text
        .lines()
        .find(|l| l.trim_start().starts_with(interface) && l.contains(':'))?;
    let quality = line.split_whitespace().nth(2)?;
    Some(label(quality.trim_end_matches('.')))
}

/// `Signal level=-52 dBm` from `iwconfig`.
pub fn parse_iwconfig_signal(output: &str) -> Option<Label> {
    let (_, rest) = output.split_once("Signal level=")?;
    let level = rest.split_whitespace().next()?;
    Some(label(&format!("{level} dBm")))
}

/// Frequency and tx bitrate from `iw dev <if> link`.
pub fn parse_iw_link(output: &str) -> (Option<Label>, Option<Label>) {
    let mut frequency = None;
    let mut bitrate = None;
    for line in output.lines().map(str::trim) {
        if let Some(freq) = line.strip_prefix("freq:") {
            let mhz = freq.trim().trim_end_matches(".0");
            frequency = Some(label(&format!("{mhz} MHz")));
        } else if let Some(rate) = line.strip_prefix("tx bitrate:") {
            let rate: Vec<&str> = rate.split_whitespace().take(2).collect();
            if !rate.is_empty() {
                bitrate = Some(label(&rate.join(" ")));
            }
        }
    }
    (frequency, bitrate)
}

/// `default via 192.168.0.1 dev wlan0 ...`
pub fn parse_default_gateway(output: &str) -> Option<Label> {
    let mut parts = output.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("default"), Some("via"), Some(gateway)) => Some(label(gateway)),
        _ => None,
    }
}

/// First `nameserver` of `resolv.conf`.
pub fn parse_nameserver(text: &str) -> Option<Label> {
    text.lines()
        .filter_map(|l| l.strip_prefix("nameserver"))
        .find_map(|rest| rest.split_whitespace().next())
        .map(label)
}

// =============================================================================
// Resources
// =============================================================================

/// `0.52 0.48 0.42 1/234 5678`
pub fn parse_loadavg(text: &str) -> Option<LoadAverage> {
    let mut fields = text.split_whitespace().map(str::parse::<f32>);
    Some(LoadAverage {
        one: fields.next()?.ok()?,
        five: fields.next()?.ok()?,
        fifteen: fields.next()?.ok()?,
    })
}

/// Seconds since boot from `/proc/uptime`.
pub fn parse_uptime(text: &str) -> Option<u64> {
    let secs: f64 = text.split_whitespace().next()?.parse().ok()?;
    Some(secs as u64)
}

/// `/proc/meminfo`; `MemAvailable` falls back to free + buffers + cached on
/// old kernels.
pub fn parse_meminfo(text: &str) -> Option<MemoryStats> {
    let field = |key: &str| {
        text.lines()
            .find_map(|l| l.strip_prefix(key)?.strip_prefix(':'))
            .and_then(|v| v.split_whitespace().next()?.parse::<u64>().ok())
    };
    let total_kb = field("MemTotal")?;
    let buffers_kb = field("Buffers").unwrap_or(0);
    let cached_kb = field("Cached").unwrap_or(0);
    let available_kb = field("MemAvailable").or_else(|| Some(field("MemFree")? + buffers_kb + cached_kb))?;
    Some(MemoryStats {
        total_kb,
        available_kb,
        buffers_kb,
        cached_kb,
        dirty_kb: field("Dirty").unwrap_or(0),
        swap_total_kb: field("SwapTotal").unwrap_or(0),
        swap_free_kb: field("SwapFree").unwrap_or(0),
    })
}

/// Whether a block device name is a whole disk rather than a partition or
/// a virtual device.
pub fn is_whole_disk(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("mmcblk") {
        return !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit());
    }
    if let Some(rest) = name.strip_prefix("nvme") {
        return !rest.contains('p');
    }
    if let Some(rest) = name.strip_prefix("sd").or_else(|| name.strip_prefix("vd")) {
        return !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_lowercase());
    }
    false
}

/// Bytes read and written by whole disks from `/proc/diskstats`.
pub fn parse_diskstats(text: &str) -> Option<IoCounters> {
    let mut seen = false;
    let mut io = IoCounters::default();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 || !is_whole_disk(fields[2]) {
            continue;
        }
        let (Ok(read), Ok(written)) = (fields[5].parse::<u64>(), fields[9].parse::<u64>()) else {
            continue;
        };
        seen = true;
        io.read_bytes += read * SECTOR_BYTES;
        io.written_bytes += written * SECTOR_BYTES;
    }
    seen.then_some(io)
}

/// The parts of `/proc/<pid>/stat` the process list needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProcStat {
    pub name: String,
    /// User plus system time in clock ticks.
    pub cpu_ticks: u64,
    /// Start time after boot in clock ticks.
    pub start_ticks: u64,
}

/// `pid (comm) state ppid ...`; `comm` may contain spaces and parentheses.
pub fn parse_pid_stat(text: &str) -> Option<ProcStat> {
    let open = text.find('(')?;
    let close = text.rfind(')')?;
    let name = text.get(open + 1..close)?.to_owned();
    // Fields after comm start at field 3 (state)
    let fields: Vec<&str> = text.get(close + 1..)?.split_whitespace().collect();
    let field = |n: usize| fields.get(n - 3)?.parse::<u64>().ok();
    Some(ProcStat {
        name,
        cpu_ticks: field(14)? + field(15)?,
        start_ticks: field(22)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  4705 356 584 3699 23 23 0 0 0 0\n\
                        cpu0 1393 280 155 1000 10 11 0 0 0 0\n\
                        intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]\n";

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:    1000      10    0    0    0     0          0         0     1000      10    0    0    0     0       0          0
 wlan0: 5000000    4000    1    2    0     0          0         0  1200000    3000    3    4    0     0       0          0
  eth0:       0       0    0    5    0     0          0         0        0       0    0    0    0     0       0          0
";

    #[test]
    fn test_cpu_times() {
        let times = parse_cpu_times(STAT).unwrap();
        assert_eq!(times.total, 4705 + 356 + 584 + 3699 + 23 + 23);
        assert_eq!(times.idle, 3699 + 23);
        assert_eq!(times.iowait, 23);
    }

    #[test]
    fn test_cpu_usage_deltas() {
        let before = CpuTimes { total: 1000, idle: 800, iowait: 10 };
        let after = CpuTimes { total: 1200, idle: 850, iowait: 30 };
        assert_eq!(after.usage_since(Some(&before)), Some(75.0));
        assert_eq!(after.iowait_since(Some(&before)), Some(10.0));
        assert_eq!(before.usage_since(None), Some(20.0));
        // No ticks elapsed
        assert_eq!(before.usage_since(Some(&before)), None);
        // Counters went backwards
        assert_eq!(before.usage_since(Some(&after)), None);
    }

    #[test]
    fn test_vcgencmd() {
        assert_eq!(parse_vcgencmd_temp("temp=48.3'C\n"), Some(48.3));
        assert_eq!(vcgencmd_value("volt=1.2000V\n"), Some("1.2000V"));
        assert_eq!(vcgencmd_value("gpu=76M"), Some("76M"));
        assert_eq!(parse_throttled("throttled=0x50005\n"), Some(0x50005));
        assert_eq!(parse_throttled("throttled=0x0"), Some(0));
        assert_eq!(vcgencmd_value("error"), None);
        assert_eq!(parse_vcgencmd_temp("temp="), None);
    }

    #[test]
    fn test_sysfs_values() {
        assert_eq!(parse_thermal_zone("48312\n"), Some(48.312));
        assert_eq!(parse_frequency_mhz("1500000\n"), Some(1500));
        assert_eq!(parse_frequency_mhz("n/a"), None);
    }

    #[test]
    fn test_net_dev() {
        let traffic = parse_net_dev_traffic(NET_DEV, "wlan0").unwrap();
        assert_eq!(traffic.rx_bytes, 5_000_000);
        assert_eq!(traffic.tx_bytes, 1_200_000);
        assert_eq!(parse_net_dev_traffic(NET_DEV, "wlan1"), None);

        let faults = parse_net_dev_faults(NET_DEV).unwrap();
        assert_eq!(faults.errors, 1 + 3);
        assert_eq!(faults.drops, 2 + 4 + 5);
    }

    #[test]
    fn test_socket_entries() {
        let tcp = "  sl  local_address rem_address   st\n   0: 00000000:0016 00000000:0000 0A\n   1: 0100007F:0277 00000000:0000 0A\n";
        assert_eq!(count_socket_entries(tcp), 2);
        assert_eq!(count_socket_entries("  sl  local_address\n"), 0);
    }

    #[test]
    fn test_wireless_quality() {
        let text = "Inter-| sta-|   Quality        |   Discarded packets\n \
                    face | tus | link level noise |  nwid  crypt   frag\n\
                    wlan0: 0000   48.  -62.  -256        0      0      0\n";
        assert_eq!(parse_wireless_quality(text, "wlan0").as_deref(), Some("48"));
        assert_eq!(parse_wireless_quality(text, "wlan1"), None);
    }

    #[test]
    fn test_iw_output() {
        let iwconfig = "wlan0     IEEE 802.11  ESSID:\"MyHomeWiFi\"\n          Link Quality=48/70  Signal level=-62 dBm\n";
        assert_eq!(parse_iwconfig_signal(iwconfig).as_deref(), Some("-62 dBm"));

        let link = "Connected to b8:27:eb:00:00:01 (on wlan0)\n\tSSID: MyHomeWiFi\n\tfreq: 2437.0\n\ttx bitrate: 72.2 MBit/s MCS 7 short GI\n";
        let (freq, rate) = parse_iw_link(link);
        assert_eq!(freq.as_deref(), Some("2437 MHz"));
        assert_eq!(rate.as_deref(), Some("72.2 MBit/s"));
        assert_eq!(parse_iw_link("Not connected."), (None, None));
    }

    #[test]
    fn test_gateway_and_dns() {
        assert_eq!(
            parse_default_gateway("default via 192.168.0.1 dev wlan0 proto dhcp metric 600\n").as_deref(),
            Some("192.168.0.1")
        );
        assert_eq!(parse_default_gateway(""), None);
        let resolv = "# Generated by resolvconf\nsearch lan\nnameserver 192.168.0.1\nnameserver 1.1.1.1\n";
        assert_eq!(parse_nameserver(resolv).as_deref(), Some("192.168.0.1"));
        assert_eq!(parse_nameserver("search lan\n"), None);
    }

    #[test]
    fn test_loadavg_and_uptime() {
        let load = parse_loadavg("0.52 0.48 0.42 1/234 5678\n").unwrap();
        assert_eq!((load.one, load.five, load.fifteen), (0.52, 0.48, 0.42));
        assert_eq!(parse_uptime("277201.53 1095421.30\n"), Some(277_201));
        assert_eq!(parse_loadavg("garbage"), None);
    }

    #[test]
    fn test_meminfo() {
        let text = "MemTotal:         948304 kB\nMemFree:          123456 kB\nMemAvailable:     568304 kB\n\
                    Buffers:           38912 kB\nCached:           301056 kB\nSwapCached:            0 kB\n\
                    SwapTotal:        102396 kB\nSwapFree:          97280 kB\nDirty:               120 kB\n";
        let mem = parse_meminfo(text).unwrap();
        assert_eq!(mem.total_kb, 948_304);
        assert_eq!(mem.available_kb, 568_304);
        assert_eq!(mem.cached_kb, 301_056, "SwapCached must not match Cached");
        assert_eq!(mem.swap_total_kb, 102_396);
        assert_eq!(mem.dirty_kb, 120);

        let old = "MemTotal: 1000 kB\nMemFree: 100 kB\nBuffers: 50 kB\nCached: 200 kB\n";
        assert_eq!(parse_meminfo(old).unwrap().available_kb, 350);
        assert_eq!(parse_meminfo("MemFree: 1 kB\n"), None);
    }

    #[test]
    fn test_whole_disks() {
        assert!(is_whole_disk("mmcblk0"));
        assert!(!is_whole_disk("mmcblk0p1"));
        assert!(is_whole_disk("sda"));
        assert!(!is_whole_disk("sda1"));
        assert!(is_whole_disk("nvme0n1"));
        assert!(!is_whole_disk("nvme0n1p2"));
        assert!(!is_whole_disk("loop0"));
        assert!(!is_whole_disk("ram0"));
    }

    #[test]
    fn test_diskstats() {
        let text = "   7       0 loop0 10 0 100 0 0 0 0 0 0 0 0\n \
                    179       0 mmcblk0 5000 100 200000 3000 8000 900 400000 9000 0 5000 12000\n \
                    179       1 mmcblk0p1 100 0 2000 10 1 0 8 0 0 10 10\n";
        let io = parse_diskstats(text).unwrap();
        assert_eq!(io.read_bytes, 200_000 * 512);
        assert_eq!(io.written_bytes, 400_000 * 512);
        assert_eq!(parse_diskstats("   7 0 loop0 1 0 1 0 0 0 0 0 0 0 0\n"), None);
    }

    #[test]
    fn test_pid_stat() {
        let text = "1234 (my (odd) proc) S 1 1234 1234 0 -1 4194560 500 0 0 0 150 50 0 0 20 0 1 0 98765 1000000 200\n";
        let stat = parse_pid_stat(text).unwrap();
        assert_eq!(stat.name, "my (odd) proc");
        assert_eq!(stat.cpu_ticks, 200);
        assert_eq!(stat.start_ticks, 98_765);
        assert_eq!(parse_pid_stat("1234 (truncated"), None);
    }
}
