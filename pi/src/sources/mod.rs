//! Metric collection on a Raspberry Pi host.
//!
//! [`HostSource`] implements [`MetricSource`] over `/proc`, `/sys`, a few
//! syscalls and a handful of external commands. Every accessor is
//! best-effort: a missing file, a failing command or unparsable output yields
//! `None` for that metric only.
//!
//! File paths are resolved under a configurable root (`/` in production) so
//! the readers can be tested against a fake tree.

pub mod command;
pub mod procfs;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Instant;

use lcd_stats_common::config::TOP_PROCESS_COUNT;
use lcd_stats_common::metrics::{
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
use nix::sys::statvfs::statvfs;
use nix::unistd::{SysconfVar, sysconf};

use self::command::{CommandRunner, SystemCommands};
use self::procfs::CpuTimes;
use crate::config::{ADDRESS_INTERFACES, WIRELESS_INTERFACE};

/// Clock ticks per second when `sysconf` cannot tell.
const DEFAULT_CLK_TCK: u64 = 100;

/// Previous sample of every process, for CPU deltas.
#[derive(Default)]
struct ProcessBaseline {
    ticks: HashMap<u32, u64>,
    taken_at: Option<Instant>,
}

/// Metric source backed by the running system.
pub struct HostSource<R = SystemCommands> {
    root: PathBuf,
    runner: R,
    /// Programs whose last run failed; logged once until they succeed again.
    failing: HashSet<String>,
    usage_baseline: Option<CpuTimes>,
    iowait_baseline: Option<CpuTimes>,
    processes: ProcessBaseline,
    clk_tck: u64,
}

impl HostSource {
    /// Source reading the real system.
    pub fn new() -> Self { Self::with_root("/", SystemCommands::default()) }
}

impl Default for HostSource {
    fn default() -> Self { Self::new() }
}

impl<R: CommandRunner> HostSource<R> {
    /// Source reading files under `root` and running commands through `runner`.
    pub fn with_root(
        root: impl Into<PathBuf>,
        runner: R,
    ) -> Self {
        let clk_tck = sysconf(SysconfVar::CLK_TCK)
            .ok()
            .flatten()
            .and_then(|t| u64::try_from(t).ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_CLK_TCK);
        Self {
            root: root.into(),
            runner,
            failing: HashSet::new(),
            usage_baseline: None,
            iowait_baseline: None,
            processes: ProcessBaseline::default(),
            clk_tck,
        }
    }

    fn path(
        &self,
        relative: &str,
    ) -> PathBuf {
        self.root.join(relative)
    }

    fn read(
        &self,
        relative: &str,
    ) -> Option<String> {
        fs::read_to_string(self.path(relative)).ok()
    }

    /// Run a command, logging the first failure of each program.
    fn command(
        &mut self,
        program: &str,
        args: &[&str],
    ) -> Option<String> {
        match self.runner.run(program, args) {
            Ok(out) => {
                self.failing.remove(program);
                Some(out)
            }
            Err(e) => {
                if self.failing.insert(e.program().to_owned()) {
                    log::warn!("{e}");
                } else {
                    log::debug!("{e}");
                }
                None
            }
        }
    }

    fn vcgencmd(
        &mut self,
        args: &[&str],
    ) -> Option<String> {
        self.command("vcgencmd", args)
    }

    fn vcgencmd_label(
        &mut self,
        args: &[&str],
    ) -> Option<Label> {
        let out = self.vcgencmd(args)?;
        procfs::vcgencmd_value(&out).map(label)
    }

    fn cpu_times(&self) -> Option<CpuTimes> { procfs::parse_cpu_times(&self.read("proc/stat")?) }

    /// Numeric entries of `/proc`.
    fn pids(&self) -> Option<Vec<u32>> {
        let entries = fs::read_dir(self.path("proc")).ok()?;
        Some(
            entries
                .filter_map(Result::ok)
                .filter_map(|e| e.file_name().to_str()?.parse().ok())
                .collect(),
        )
    }
}

impl<R: CommandRunner> MetricSource for HostSource<R> {
    // =========================================================================
    // CPU
    // =========================================================================

    fn cpu_temperature(&mut self) -> Option<f32> {
        self.vcgencmd(&["measure_temp"])
            .and_then(|out| procfs::parse_vcgencmd_temp(&out))
            .or_else(|| procfs::parse_thermal_zone(&self.read("sys/class/thermal/thermal_zone0/temp")?))
    }

    fn core_voltage(&mut self) -> Option<Label> { self.vcgencmd_label(&["measure_volts"]) }

    fn cpu_frequency_mhz(&mut self) -> Option<u32> {
        procfs::parse_frequency_mhz(&self.read("sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq")?)
    }

    fn cpu_usage(&mut self) -> Option<f32> {
        let now = self.cpu_times()?;
        let usage = now.usage_since(self.usage_baseline.as_ref());
        self.usage_baseline = Some(now);
        usage
    }

    fn cpu_governor(&mut self) -> Option<Label> {
        let text = self.read("sys/devices/system/cpu/cpu0/cpufreq/scaling_governor")?;
        Some(label(text.trim()))
    }

    fn throttle_flags(&mut self) -> Option<ThrottleFlags> {
        let out = self.vcgencmd(&["get_throttled"])?;
        procfs::parse_throttled(&out).map(ThrottleFlags)
    }

    // =========================================================================
    // Network Identity
    // =========================================================================

    fn hostname(&mut self) -> Option<Label> {
        let name = nix::unistd::gethostname().ok()?;
        Some(label(&name.to_string_lossy()))
    }

    fn ip_address(&mut self) -> Option<Label> {
        let addrs: Vec<_> = nix::ifaddrs::getifaddrs().ok()?.collect();
        ADDRESS_INTERFACES.iter().find_map(|iface| {
            addrs
                .iter()
                .filter(|a| a.interface_name == *iface)
                .find_map(|a| a.address.as_ref()?.as_sockaddr_in().map(|sin| Ipv4Addr::from(sin.ip())))
                .map(|ip| label(&ip.to_string()))
        })
    }

    fn mac_address(&mut self) -> Option<Label> {
        let text = self.read(&format!("sys/class/net/{WIRELESS_INTERFACE}/address"))?;
        let mac = text.trim();
        (!mac.is_empty()).then(|| label(mac))
    }

    fn ssid(&mut self) -> Option<Label> {
        let out = self.command("iwgetid", &["-r"])?;
        let ssid = out.trim();
        (!ssid.is_empty()).then(|| label(ssid))
    }

    fn signal_level(&mut self) -> Option<Label> {
        let out = self.command("iwconfig", &[WIRELESS_INTERFACE])?;
        procfs::parse_iwconfig_signal(&out)
    }

    fn wifi_link(&mut self) -> WifiLink {
        let Some(out) = self.command("iw", &["dev", WIRELESS_INTERFACE, "link"]) else {
            return WifiLink::default();
        };
        let (frequency, bitrate) = procfs::parse_iw_link(&out);
        WifiLink { frequency, bitrate }
    }

    fn link_quality(&mut self) -> Option<Label> {
        procfs::parse_wireless_quality(&self.read("proc/net/wireless")?, WIRELESS_INTERFACE)
    }

    fn default_gateway(&mut self) -> Option<Label> {
        let out = self.command("ip", &["route", "show", "default"])?;
        procfs::parse_default_gateway(&out)
    }

    fn dns_server(&mut self) -> Option<Label> { procfs::parse_nameserver(&self.read("etc/resolv.conf")?) }

    // =========================================================================
    // Network Counters
    // =========================================================================

    fn traffic(&mut self) -> Option<TrafficCounters> {
        procfs::parse_net_dev_traffic(&self.read("proc/net/dev")?, WIRELESS_INTERFACE)
    }

    fn link_faults(&mut self) -> Option<LinkFaults> { procfs::parse_net_dev_faults(&self.read("proc/net/dev")?) }

    fn socket_count(&mut self) -> Option<u32> {
        let tables = ["proc/net/tcp", "proc/net/tcp6", "proc/net/udp", "proc/net/udp6"];
        let counts: Vec<u32> = tables
            .iter()
            .filter_map(|t| self.read(t))
            .map(|text| procfs::count_socket_entries(&text))
            .collect();
        (!counts.is_empty()).then(|| counts.iter().sum())
    }

    // =========================================================================
    // Resources
    // =========================================================================

    fn load_average(&mut self) -> Option<LoadAverage> { procfs::parse_loadavg(&self.read("proc/loadavg")?) }

    fn memory(&mut self) -> Option<MemoryStats> { procfs::parse_meminfo(&self.read("proc/meminfo")?) }

    fn gpu_memory(&mut self) -> Option<Label> { self.vcgencmd_label(&["get_mem", "gpu"]) }

    fn arm_memory(&mut self) -> Option<Label> { self.vcgencmd_label(&["get_mem", "arm"]) }

    fn disk_usage(&mut self) -> Option<DiskUsage> {
        let stat = statvfs(self.root.as_path()).ok()?;
        let block = stat.fragment_size() as u64;
        let total = stat.blocks() as u64 * block;
        let free = stat.blocks_free() as u64 * block;
        Some(DiskUsage {
            total_bytes: total,
            used_bytes: total.saturating_sub(free),
            available_bytes: stat.blocks_available() as u64 * block,
        })
    }

    fn disk_io(&mut self) -> Option<IoCounters> { procfs::parse_diskstats(&self.read("proc/diskstats")?) }

    fn iowait_percent(&mut self) -> Option<f32> {
        let now = self.cpu_times()?;
        let iowait = now.iowait_since(self.iowait_baseline.as_ref());
        self.iowait_baseline = Some(now);
        iowait
    }

    fn process_count(&mut self) -> Option<u32> { self.pids().map(|p| p.len() as u32) }

    fn top_processes(&mut self) -> Option<TopProcesses> {
        let pids = self.pids()?;
        let now = Instant::now();
        let uptime_ticks = self
            .read("proc/uptime")
            .and_then(|t| procfs::parse_uptime(&t))
            .map(|secs| secs * self.clk_tck);
        let elapsed_ticks = self
            .processes
            .taken_at
            .map(|at| now.duration_since(at).as_secs_f32() * self.clk_tck as f32);

        let mut ticks = HashMap::with_capacity(pids.len());
        let mut ranked: Vec<(String, f32)> = Vec::with_capacity(pids.len());
        for pid in pids {
            let Some(stat) = self
                .read(&format!("proc/{pid}/stat"))
                .and_then(|t| procfs::parse_pid_stat(&t))
            else {
                // Exited between listing and reading
                continue;
            };
            ticks.insert(pid, stat.cpu_ticks);

            // Delta since the last call, else the average over the process lifetime
            let percent = match (self.processes.ticks.get(&pid), elapsed_ticks) {
                (Some(prev), Some(window)) if window > 0.0 => stat.cpu_ticks.saturating_sub(*prev) as f32 / window,
                _ => match uptime_ticks.map(|u| u.saturating_sub(stat.start_ticks)) {
                    Some(lifetime) if lifetime > 0 => stat.cpu_ticks as f32 / lifetime as f32,
                    _ => 0.0,
                },
            } * 100.0;
            ranked.push((stat.name, percent));
        }
        self.processes = ProcessBaseline {
            ticks,
            taken_at: Some(now),
        };

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut top = TopProcesses::new();
        for (name, percent) in ranked.into_iter().take(TOP_PROCESS_COUNT) {
            let _ = top.push(ProcessInfo::new(&name, percent));
        }
        Some(top)
    }

    fn uptime_secs(&mut self) -> Option<u64> { procfs::parse_uptime(&self.read("proc/uptime")?) }
}

// =============================================================================
// Unit Tests
// =============================================================================
