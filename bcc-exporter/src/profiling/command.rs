//! Running external tools to completion
//!
//! Sessions wait for the tool to exit; there is no timeout beyond the
//! tool's own bounded run length.

use log::{info, warn};
use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::domain::ProfileError;

/// What a finished subprocess left behind
#[derive(Debug)]
pub struct SubprocessOutcome {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl SubprocessOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit is not an error here; callers classify it.
///
/// # Errors
/// [`ProfileError::Spawn`] if the process could not be started or waited on.
pub async fn run(program: &Path, args: &[OsString]) -> Result<SubprocessOutcome, ProfileError> {
    let tool = program.display().to_string();
    info!("Running command: {} {}", tool, display_args(args));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProfileError::Spawn { tool: tool.clone(), source })?;

    let outcome = SubprocessOutcome {
        status: output.status,
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !outcome.success() {
        warn!("{tool} failed: {}", outcome.status);
        warn!("{tool} stderr: {}", outcome.stderr.trim_end());
    }
    Ok(outcome)
}

fn display_args(args: &[OsString]) -> String {
    args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
}
