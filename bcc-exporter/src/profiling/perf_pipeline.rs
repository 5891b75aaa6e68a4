//! pprof profiles via `perf record` + `pprof -proto`
//!
//! Two tools, one workspace:
//! 1. `perf record` samples the target into `perf.data`
//! 2. `pprof -proto` symbolizes and converts it into `profile.pb.gz`
//!
//! Each stage's failure is classified from its stderr, and each stage's
//! output must exist and be non-empty before the next step runs.

use log::info;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::classifier::{FailureKind, StderrClassifier};
use super::command::{self, SubprocessOutcome};
use super::workspace::SessionWorkspace;
use crate::config::ProfilerConfig;
use crate::domain::{Pid, ProfileError, Seconds, Stage};
use crate::export::{Artifact, ContentMeta, ProducedArtifact};
use crate::preflight::{require_tool, RequiredTool, ToolResolver, PERF_HINT, PPROF_HINT};

pub const PERF_DATA: &str = "perf.data";
pub const PPROF_OUTPUT: &str = "profile.pb.gz";

const PERF_PERMISSION_DENIED: &str = "perf requires elevated privileges. \
     Run with sudo or adjust perf_event_paranoid settings.";
const PPROF_PERMISSION_DENIED: &str = "pprof could not read perf.data";

#[derive(Debug, Clone)]
pub struct PerfPipeline {
    perf: String,
    pprof: String,
    frequency: u32,
    temp_root: Option<PathBuf>,
    capture_rules: StderrClassifier,
    conversion_rules: StderrClassifier,
}

impl PerfPipeline {
    #[must_use]
    pub fn new(config: &ProfilerConfig) -> Self {
        Self {
            perf: config.tools.perf.clone(),
            pprof: config.tools.pprof.clone(),
            frequency: config.frequency,
            temp_root: config.temp_root.clone(),
            capture_rules: StderrClassifier::capture_defaults(),
            conversion_rules: StderrClassifier::conversion_defaults(),
        }
    }

    /// Replace the stderr rules for either stage.
    #[must_use]
    pub fn with_classifiers(
        mut self,
        capture: StderrClassifier,
        conversion: StderrClassifier,
    ) -> Self {
        self.capture_rules = capture;
        self.conversion_rules = conversion;
        self
    }

    /// Capture and convert a profile of `pid`.
    ///
    /// Both tools are resolved before the workspace exists. On error the
    /// workspace is removed before this returns; on success it travels with
    /// the artifact and is removed once the artifact has been streamed.
    ///
    /// # Errors
    /// Any [`ProfileError`] from tool resolution, either stage, or the
    /// workspace itself.
    pub async fn run(
        &self,
        resolver: &dyn ToolResolver,
        pid: Pid,
        duration: Seconds,
    ) -> Result<ProducedArtifact, ProfileError> {
        let perf = require_tool(resolver, RequiredTool { name: &self.perf, hint: PERF_HINT })?;
        let pprof = require_tool(resolver, RequiredTool { name: &self.pprof, hint: PPROF_HINT })?;

        let workspace =
            SessionWorkspace::acquire(self.temp_root.as_deref()).map_err(ProfileError::Workspace)?;
        let perf_data = workspace.file(PERF_DATA);
        let output = workspace.file(PPROF_OUTPUT);

        info!("Starting perf record for PID {pid}, duration {duration} seconds");
        let outcome = command::run(&perf, &self.capture_args(pid, duration, &perf_data)).await?;
        if !outcome.success() {
            return Err(self.capture_failure(pid, outcome));
        }
        verify_artifact(Stage::Capture, &perf_data).await?;

        info!("Converting perf.data to pprof format");
        let outcome = command::run(&pprof, &conversion_args(&perf_data, &output)).await?;
        if !outcome.success() {
            return Err(self.conversion_failure(outcome));
        }
        verify_artifact(Stage::Conversion, &output).await?;

        Ok(ProducedArtifact {
            artifact: Artifact::File { path: output, workspace },
            meta: ContentMeta::pprof_download(pid, duration),
        })
    }

    /// `perf record -g --pid <pid> -F <freq> -o <out> -- sleep <seconds>`
    fn capture_args(&self, pid: Pid, duration: Seconds, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["record", "-g", "--pid"].map(OsString::from).into();
        args.push(pid.to_string().into());
        args.push("-F".into());
        args.push(self.frequency.to_string().into());
        args.push("-o".into());
        args.push(out.into());
        args.extend(["--", "sleep"].map(OsString::from));
        args.push(duration.to_string().into());
        args
    }

    fn capture_failure(&self, pid: Pid, outcome: SubprocessOutcome) -> ProfileError {
        match self.capture_rules.classify(&outcome.stderr) {
            FailureKind::PermissionDenied => {
                ProfileError::PermissionDenied(PERF_PERMISSION_DENIED.to_string())
            }
            FailureKind::ProcessVanished => ProfileError::ProcessVanished(pid),
            FailureKind::NoSamples => ProfileError::NoSamplesCollected(Stage::Capture),
            FailureKind::Generic => {
                ProfileError::CaptureFailed { status: outcome.status, stderr: outcome.stderr }
            }
        }
    }

    fn conversion_failure(&self, outcome: SubprocessOutcome) -> ProfileError {
        match self.conversion_rules.classify(&outcome.stderr) {
            FailureKind::NoSamples => ProfileError::NoSamplesInCapture,
            FailureKind::PermissionDenied => {
                ProfileError::PermissionDenied(PPROF_PERMISSION_DENIED.to_string())
            }
            FailureKind::ProcessVanished | FailureKind::Generic => {
                ProfileError::ConversionFailed { status: outcome.status, stderr: outcome.stderr }
            }
        }
    }
}

/// `pprof -proto -output <out> <perf.data>`
fn conversion_args(perf_data: &Path, out: &Path) -> Vec<OsString> {
    vec!["-proto".into(), "-output".into(), out.into(), perf_data.into()]
}

/// A stage succeeded only if it left a non-empty file behind.
async fn verify_artifact(stage: Stage, path: &Path) -> Result<(), ProfileError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() == 0 => Err(ProfileError::NoSamplesCollected(stage)),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ProfileError::ArtifactMissing { stage, path: path.to_path_buf() })
        }
        Err(e) => Err(e.into()),
    }
}
