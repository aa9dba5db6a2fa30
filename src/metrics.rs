//! System metrics providers for the STAT screen.
//!
//! Every getter returns a formatted string; a failed read degrades to a
//! placeholder ("N/A", "ERR", "No IP") so one missing /proc file never stops
//! the render loop. CPU usage needs two /proc/stat snapshots, so the provider
//! owns the previous sample explicitly rather than hiding it in a static.

use std::ffi::CString;
use std::fs;
use std::process::Command;

use tracing::debug;

/// One /proc/stat aggregate snapshot.
#[derive(Clone, Copy)]
struct CpuSample {
    idle: u64,
    total: u64,
}

/// Metrics provider instance. Owns the cached CPU sample carried between
/// calls.
pub struct SystemMetrics {
    prev_cpu: Option<CpuSample>,
}

impl SystemMetrics {
    /// Create the provider and prime the first CPU sample so the second
    /// render already has a delta to show.
    pub fn new() -> Self {
        let mut metrics = Self { prev_cpu: None };
        let _ = metrics.cpu_percent();
        metrics
    }

    /// CPU usage percentage since the previous call.
    pub fn cpu_percent(&mut self) -> String {
        let Some(sample) = read_cpu_sample() else {
            return "ERR".into();
        };
        let prev = self.prev_cpu.replace(sample);
        let Some(prev) = prev else {
            return "N/A".into();
        };
        let d_idle = sample.idle.saturating_sub(prev.idle);
        let d_total = sample.total.saturating_sub(prev.total);
        if d_total == 0 {
            return "0%".into();
        }
        let busy = 100.0 * (1.0 - d_idle as f64 / d_total as f64);
        format!("{}%", busy as u64)
    }

    /// RAM as "(used, total)" strings in MB, from /proc/meminfo.
    pub fn ram_info(&self) -> (String, String) {
        match read_meminfo() {
            Some((used_mb, total_mb)) => (format!("{used_mb}MB"), format!("{total_mb}MB")),
            None => ("ERR".into(), "ERR".into()),
        }
    }

    /// Root filesystem usage as "(used, total)" strings in MB.
    pub fn disk_info(&self) -> (String, String) {
        match read_statvfs("/") {
            Some((used_mb, total_mb)) => (format!("{used_mb}MB"), format!("{total_mb}MB")),
            None => ("ERR".into(), "ERR".into()),
        }
    }

    /// Best-effort local IP via `hostname -I`.
    pub fn ip_address(&self) -> String {
        let output = Command::new("hostname").arg("-I").output();
        match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                stdout
                    .split_whitespace()
                    .next()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "No IP".into())
            }
            _ => "No IP".into(),
        }
    }

    /// Human-readable uptime from /proc/uptime.
    pub fn uptime(&self) -> String {
        let Some(secs) = fs::read_to_string("/proc/uptime")
            .ok()
            .and_then(|s| s.split_whitespace().next().map(str::to_owned))
            .and_then(|s| s.parse::<f64>().ok())
        else {
            return "ERR".into();
        };
        format_uptime(secs as u64)
    }

    /// CPU temperature from the thermal zone, in whole degrees C.
    pub fn cpu_temp(&self) -> String {
        let Some(millideg) = fs::read_to_string("/sys/class/thermal/thermal_zone0/temp")
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
        else {
            return "N/A".into();
        };
        format!("{}C", millideg / 1000)
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn read_cpu_sample() -> Option<CpuSample> {
    let stat = fs::read_to_string("/proc/stat").ok()?;
    let line = stat.lines().next()?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|f| f.parse().ok())
        .collect();
    // idle is the 4th jiffy column
    let idle = *fields.get(3)?;
    let total: u64 = fields.iter().sum();
    Some(CpuSample { idle, total })
}

fn read_meminfo() -> Option<(u64, u64)> {
    let meminfo = fs::read_to_string("/proc/meminfo").ok()?;
    let mut total_kb = None;
    let mut avail_kb = None;
    for line in meminfo.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("MemTotal:") => total_kb = parts.next()?.parse::<u64>().ok(),
            Some("MemAvailable:") => avail_kb = parts.next()?.parse::<u64>().ok(),
            _ => {}
        }
    }
    let total_mb = total_kb? / 1024;
    let used_mb = total_mb.saturating_sub(avail_kb? / 1024);
    Some((used_mb, total_mb))
}

fn read_statvfs(path: &str) -> Option<(u64, u64)> {
    let c_path = CString::new(path).ok()?;
    let mut st: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut st) };
    if rc != 0 {
        debug!(path, "statvfs failed");
        return None;
    }
    let frsize = st.f_frsize as u64;
    let total_mb = st.f_blocks as u64 * frsize / (1024 * 1024);
    let free_mb = st.f_bavail as u64 * frsize / (1024 * 1024);
    Some((total_mb.saturating_sub(free_mb), total_mb))
}

fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}
