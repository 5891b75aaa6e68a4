//! Structured error types for bcc-exporter
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Every [`ProfileError`] carries a fixed HTTP status so the caller can tell
//! "fix my request" apart from "install a tool" and "grant a capability".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use super::types::{Pid, Seconds};

/// Problems with the query parameters themselves
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing required parameter(s): {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("seconds must be an integer, got {0:?}")]
    DurationNotANumber(String),

    #[error(
        "seconds must be between {min} and {max}, got {0}",
        min = Seconds::MIN,
        max = Seconds::MAX
    )]
    DurationOutOfRange(String),
}

/// Why a target PID was rejected
#[derive(Error, Debug)]
pub enum PidError {
    #[error("invalid PID format: {0}")]
    Malformed(String),

    #[error("process with PID {0} does not exist")]
    NotFound(Pid),

    #[error("cannot access process {pid}: {source}")]
    Inaccessible {
        pid: Pid,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage that produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Conversion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capture => f.write_str("perf record"),
            Self::Conversion => f.write_str("pprof conversion"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Invalid PID: {0}")]
    InvalidPid(#[from] PidError),

    #[error("Required tools not available: {tool} not found. Install with: {hint}")]
    ToolUnavailable { tool: String, hint: &'static str },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Process with PID {0} not found or exited during profiling")]
    ProcessVanished(Pid),

    #[error("No samples collected: {0} produced an empty file")]
    NoSamplesCollected(Stage),

    #[error("No samples found in perf.data - process may have been idle during profiling")]
    NoSamplesInCapture,

    #[error("perf record failed: {status}\nStderr: {stderr}")]
    CaptureFailed { status: ExitStatus, stderr: String },

    #[error("pprof conversion failed: {status}\nStderr: {stderr}")]
    ConversionFailed { status: ExitStatus, stderr: String },

    #[error("Profiler failed: {status}\nStderr: {stderr}")]
    ProfilerFailed { status: ExitStatus, stderr: String },

    #[error("{stage} did not create {}", .path.display())]
    ArtifactMissing { stage: Stage, path: PathBuf },

    #[error("Failed to open {}: {source}", .path.display())]
    OpenArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create temp directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    /// Caller-supplied problems map to 4xx, tool and environment problems to 5xx.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidPid(_)
            | Self::ProcessVanished(_)
            | Self::NoSamplesCollected(_)
            | Self::NoSamplesInCapture => StatusCode::BAD_REQUEST,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::ToolUnavailable { .. }
            | Self::CaptureFailed { .. }
            | Self::ConversionFailed { .. }
            | Self::ProfilerFailed { .. }
            | Self::ArtifactMissing { .. }
            | Self::OpenArtifact { .. }
            | Self::Workspace(_)
            | Self::Spawn { .. }
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        (status, self.to_string()).into_response()
    }
}
