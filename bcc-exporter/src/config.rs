//! Runtime configuration
//!
//! Built once from the command line and handed to the server and profiler at
//! construction. Nothing reads configuration from global state.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Sampling frequency passed to both profilers
pub const DEFAULT_FREQUENCY: u32 = 999;

/// Names (or paths) of the external tools sessions invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub perf: String,
    pub pprof: String,
    /// BCC `profile` tool that emits folded stacks
    pub profiler: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            perf: "perf".to_string(),
            pprof: "pprof".to_string(),
            profiler: "profile-bpfcc".to_string(),
        }
    }
}

/// Everything a profiling session needs to know
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    pub tools: ToolPaths,
    pub frequency: u32,
    /// Run the BCC profiler through `sudo`
    pub use_sudo: bool,
    /// Parent for session workspaces; `None` means the system temp dir
    pub temp_root: Option<PathBuf>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            frequency: DEFAULT_FREQUENCY,
            use_sudo: true,
            temp_root: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen: SocketAddr,
    /// Basic auth password for user `admin`; auth is off when `None`
    pub password: Option<String>,
    pub profiler: ProfilerConfig,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
            password: None,
            profiler: ProfilerConfig::default(),
        }
    }
}
