//! Artifacts produced by a session and how they should be labelled.

use std::path::PathBuf;

use crate::domain::{Pid, Seconds};
use crate::profiling::SessionWorkspace;

pub const CONTENT_TYPE_BINARY: &str = "application/octet-stream";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Response metadata for an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMeta {
    pub content_type: &'static str,
    /// Suggested download name, sent as `Content-Disposition: attachment`
    pub filename: Option<String>,
}

impl ContentMeta {
    #[must_use]
    pub fn text() -> Self {
        Self { content_type: CONTENT_TYPE_TEXT, filename: None }
    }

    #[must_use]
    pub fn binary() -> Self {
        Self { content_type: CONTENT_TYPE_BINARY, filename: None }
    }

    /// gzipped pprof download named after the session
    #[must_use]
    pub fn pprof_download(pid: Pid, duration: Seconds) -> Self {
        Self {
            content_type: CONTENT_TYPE_BINARY,
            filename: Some(format!("profile-{pid}-{duration}.pb.gz")),
        }
    }
}

/// Output of a successful session
#[derive(Debug)]
pub enum Artifact {
    /// A file inside a workspace; the workspace travels with it
    File { path: PathBuf, workspace: SessionWorkspace },
    /// Captured bytes, no filesystem involved
    Buffer(Vec<u8>),
}

#[derive(Debug)]
pub struct ProducedArtifact {
    pub artifact: Artifact,
    pub meta: ContentMeta,
}
