//! Pre-flight checks for bcc-exporter
//!
//! Validates that external profilers can be found before a session allocates
//! anything, and warns at startup about missing privileges or tools.
//! Provides clear, actionable error messages when requirements aren't met.

#![allow(unsafe_code)] // geteuid() requires unsafe

use log::{info, warn};
use std::path::PathBuf;

use crate::config::ProfilerConfig;
use crate::domain::ProfileError;

pub const PERF_HINT: &str = "sudo apt-get install linux-perf";
pub const PPROF_HINT: &str = "go install github.com/google/pprof@latest";
pub const BCC_HINT: &str = "sudo apt-get install bpfcc-tools";

/// Resolves an external executable by name or path.
pub trait ToolResolver: Send + Sync {
    fn resolve(&self, tool: &str) -> Option<PathBuf>;
}

/// [`ToolResolver`] that searches `$PATH` like a shell would.
///
/// Names containing a `/` are checked directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPath;

impl ToolResolver for SearchPath {
    fn resolve(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }
}

/// An executable a pipeline cannot run without
#[derive(Debug, Clone, Copy)]
pub struct RequiredTool<'a> {
    pub name: &'a str,
    pub hint: &'static str,
}

/// Resolve a tool before anything is allocated for the session.
///
/// # Errors
/// [`ProfileError::ToolUnavailable`] naming the tool and how to install it.
pub fn require_tool(
    resolver: &dyn ToolResolver,
    tool: RequiredTool<'_>,
) -> Result<PathBuf, ProfileError> {
    resolver.resolve(tool.name).ok_or_else(|| ProfileError::ToolUnavailable {
        tool: tool.name.to_string(),
        hint: tool.hint,
    })
}

/// Warn about conditions that will make real sessions fail.
///
/// Never fatal: test-mode sessions work without privileges or tools.
pub fn run_startup_checks(config: &ProfilerConfig, resolver: &dyn ToolResolver) {
    check_privileges();

    let tools = [
        RequiredTool { name: &config.tools.perf, hint: PERF_HINT },
        RequiredTool { name: &config.tools.pprof, hint: PPROF_HINT },
    ];
    for tool in tools {
        match resolver.resolve(tool.name) {
            Some(path) => info!("found {}: {}", tool.name, path.display()),
            None => warn!(
                "{} not found, pprof profiles will fail. Install with: {}",
                tool.name, tool.hint
            ),
        }
    }

    // With sudo the profiler lives on root's PATH, which may differ from ours
    if !config.use_sudo && resolver.resolve(&config.tools.profiler).is_none() {
        warn!(
            "{} not found, folded profiles will fail. Install with: {BCC_HINT}",
            config.tools.profiler
        );
    }
}

fn check_privileges() {
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    warn!(
        "not running as root: perf record usually needs elevated privileges. \
         Run with sudo or lower /proc/sys/kernel/perf_event_paranoid"
    );
}
