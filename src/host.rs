//! Host capabilities, probed once at startup.

use std::fmt;

use crate::format::format_bytes;

/// Process memory usage at probe time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub resident_bytes: u64,
}

/// Host facts used to size the worker pool and print a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostInfo {
    pub cpu_threads: usize,
    /// `None` where the platform gives no cheap answer.
    pub memory: Option<MemoryUsage>,
}

impl HostInfo {
    /// Reads the current host state.
    pub fn probe() -> Self {
        Self {
            cpu_threads: num_cpus::get(),
            memory: probe_memory(),
        }
    }

    /// Worker count when none is requested: one thread left for the coordinator.
    pub fn default_jobs(&self) -> usize {
        self.cpu_threads.saturating_sub(1).max(1)
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "threads: {}", self.cpu_threads)?;
        match self.memory {
            Some(mem) => write!(f, ", rss: {}", format_bytes(mem.resident_bytes)),
            None => write!(f, ", rss: unknown"),
        }
    }
}

#[cfg(target_os = "linux")]
fn probe_memory() -> Option<MemoryUsage> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status).map(|resident_bytes| MemoryUsage { resident_bytes })
}

#[cfg(not(target_os = "linux"))]
fn probe_memory() -> Option<MemoryUsage> {
    None
}

/// Extracts `VmRSS` (reported in kB) from `/proc/self/status` text.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_jobs() {
        let host = |cpu_threads| HostInfo {
            cpu_threads,
            memory: None,
        };
        assert_eq!(host(0).default_jobs(), 1);
        assert_eq!(host(1).default_jobs(), 1);
        assert_eq!(host(2).default_jobs(), 1);
        assert_eq!(host(8).default_jobs(), 7);
    }

    #[test]
    fn test_probe() {
        let host = HostInfo::probe();
        assert!(host.cpu_threads >= 1);
        assert!(host.default_jobs() >= 1);
    }

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\tcargo\nVmPeak:\t  9000 kB\nVmRSS:\t    2048 kB\nThreads:\t4\n";
        assert_eq!(parse_vm_rss(status), Some(2048 * 1024));
        assert_eq!(parse_vm_rss("Name:\tx\n"), None);
    }

    #[test]
    fn test_display() {
        let host = HostInfo {
            cpu_threads: 4,
            memory: Some(MemoryUsage {
                resident_bytes: 1536,
            }),
        };
        assert_eq!(host.to_string(), "threads: 4, rss: 1.50KB");
    }
}
