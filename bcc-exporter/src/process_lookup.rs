//! Confirm that a requested PID names a live process.
//!
//! The lookup sits behind [`ProcessTable`] so sessions can be exercised
//! without a real process table.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::{Pid, PidError};

/// Process table consulted before any profiler is launched.
pub trait ProcessTable: Send + Sync {
    /// Parse `pid` and confirm the process exists and is inspectable.
    ///
    /// # Errors
    /// - [`PidError::Malformed`] if `pid` is not a non-negative integer
    /// - [`PidError::NotFound`] if no such process exists
    /// - [`PidError::Inaccessible`] if the entry exists but cannot be inspected
    fn lookup(&self, pid: &str) -> Result<Pid, PidError>;

    /// Command name of the process, for log lines only.
    fn command_name(&self, _pid: Pid) -> Option<String> {
        None
    }
}

/// [`ProcessTable`] backed by procfs.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    #[must_use]
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Use a different mount point, e.g. a host `/proc` bind-mounted into a container.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for ProcFs {
    fn lookup(&self, pid: &str) -> Result<Pid, PidError> {
        let pid = parse_pid(pid)?;
        let proc_path = self.root.join(pid.to_string());
        match fs::metadata(&proc_path) {
            Ok(_) => Ok(pid),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PidError::NotFound(pid)),
            Err(source) => Err(PidError::Inaccessible { pid, source }),
        }
    }

    fn command_name(&self, pid: Pid) -> Option<String> {
        let stat_path = self.root.join(pid.to_string()).join("stat");
        let stat_content = fs::read_to_string(stat_path).ok()?;
        extract_comm(&stat_content)
    }
}

/// Accept decimal digits only; no sign, no whitespace.
fn parse_pid(raw: &str) -> Result<Pid, PidError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PidError::Malformed(raw.to_string()));
    }
    raw.parse::<u32>().map(Pid).map_err(|_| PidError::Malformed(raw.to_string()))
}

/// Extract command name from `/proc/<pid>/stat`.
/// Format: "pid (comm) state ..."
fn extract_comm(stat_line: &str) -> Option<String> {
    let open = stat_line.find('(')?;
    let close = stat_line.rfind(')')?;
    if open >= close {
        return None;
    }
    stat_line.get(open + 1..close).map(str::to_string)
}
