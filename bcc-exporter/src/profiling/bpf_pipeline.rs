//! Folded stacks via the BCC `profile` tool
//!
//! A single call; stdout is the artifact, so no workspace is needed.

use log::info;
use std::ffi::OsString;
use std::path::PathBuf;

use super::command;
use crate::config::ProfilerConfig;
use crate::domain::{Pid, ProfileError, Seconds};
use crate::export::{Artifact, ContentMeta, ProducedArtifact};

const SUDO: &str = "sudo";

#[derive(Debug, Clone)]
pub struct BpfPipeline {
    profiler: String,
    frequency: u32,
    use_sudo: bool,
}

impl BpfPipeline {
    #[must_use]
    pub fn new(config: &ProfilerConfig) -> Self {
        Self {
            profiler: config.tools.profiler.clone(),
            frequency: config.frequency,
            use_sudo: config.use_sudo,
        }
    }

    /// Run the profiler against `pid` and return its folded output.
    ///
    /// # Errors
    /// [`ProfileError::ProfilerFailed`] with the raw stderr on a non-zero
    /// exit, [`ProfileError::Spawn`] if it could not be started.
    pub async fn run(&self, pid: Pid, duration: Seconds) -> Result<ProducedArtifact, ProfileError> {
        let (program, args) = self.command(pid, duration);
        let outcome = command::run(&program, &args).await?;
        if !outcome.success() {
            return Err(ProfileError::ProfilerFailed {
                status: outcome.status,
                stderr: outcome.stderr,
            });
        }

        info!("Collected {} bytes of folded stacks for PID {pid}", outcome.stdout.len());
        Ok(ProducedArtifact {
            artifact: Artifact::Buffer(outcome.stdout),
            meta: ContentMeta::text(),
        })
    }

    /// `[sudo] <profiler> -p <pid> -F <freq> -f <seconds>`
    fn command(&self, pid: Pid, duration: Seconds) -> (PathBuf, Vec<OsString>) {
        let mut args: Vec<OsString> = Vec::new();
        let program = if self.use_sudo {
            args.push(self.profiler.clone().into());
            PathBuf::from(SUDO)
        } else {
            PathBuf::from(&self.profiler)
        };
        args.push("-p".into());
        args.push(pid.to_string().into());
        args.push("-F".into());
        args.push(self.frequency.to_string().into());
        // folded output
        args.push("-f".into());
        // duration is positional
        args.push(duration.to_string().into());
        (program, args)
    }
}
