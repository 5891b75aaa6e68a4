//! CLI argument definitions

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::config::{ExporterConfig, ProfilerConfig, ToolPaths, DEFAULT_FREQUENCY};

#[derive(Parser, Debug)]
#[command(
    name = "bcc-exporter",
    version,
    about = "Serve CPU profiles of running processes over HTTP",
    after_help = "\
EXAMPLES:
    sudo bcc-exporter                            Listen on :8080
    sudo bcc-exporter --port 9000 --password s3  Require basic auth (user admin)

ENDPOINTS:
    /debug/pprof/profile?pid=<PID>&seconds=<N>   gzipped pprof protobuf
    /debug/folded/profile?pid=<PID>&seconds=<N>  folded stacks (text)
    Add &test=true for synthetic output without profiling."
)]
pub struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Password for basic authentication (optional)
    #[arg(long, env = "BCC_EXPORTER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// perf binary used for pprof captures
    #[arg(long, default_value = "perf")]
    pub perf: String,

    /// pprof binary used to convert perf.data
    #[arg(long, default_value = "pprof")]
    pub pprof: String,

    /// BCC profile tool used for folded output
    #[arg(long, default_value = "profile-bpfcc")]
    pub profiler: String,

    /// Sampling frequency in Hz
    #[arg(short = 'F', long, default_value_t = DEFAULT_FREQUENCY)]
    pub frequency: u32,

    /// Run the BCC profile tool directly instead of through sudo
    #[arg(long)]
    pub no_sudo: bool,

    /// Directory to create per-session workspaces in
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,
}

impl Args {
    #[must_use]
    pub fn into_config(self) -> ExporterConfig {
        ExporterConfig {
            listen: SocketAddr::new(self.bind, self.port),
            password: self.password.filter(|p| !p.is_empty()),
            profiler: ProfilerConfig {
                tools: ToolPaths { perf: self.perf, pprof: self.pprof, profiler: self.profiler },
                frequency: self.frequency,
                use_sudo: !self.no_sudo,
                temp_root: self.temp_dir,
            },
        }
    }
}
