//! Copy an artifact into an HTTP response body.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use futures::stream;
use log::{error, info, warn};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::artifact::{Artifact, ContentMeta, ProducedArtifact};
use crate::domain::ProfileError;
use crate::profiling::SessionWorkspace;

const CHUNK_SIZE: usize = 64 * 1024;

/// Build the response for a finished session.
///
/// Headers are fixed before the first byte goes out, so a read failure
/// part-way through can only be logged and the body cut short.
pub async fn stream_artifact(produced: ProducedArtifact) -> Response {
    let ProducedArtifact { artifact, meta } = produced;

    let body = match artifact {
        Artifact::Buffer(bytes) => Body::from(bytes),
        Artifact::File { path, workspace } => match File::open(&path).await {
            Ok(file) => file_body(file, path, workspace),
            // workspace is dropped, and removed, on the way out
            Err(source) => return ProfileError::OpenArtifact { path, source }.into_response(),
        },
    };

    let mut response = Response::new(body);
    apply_headers(&mut response, &meta);
    response
}

fn apply_headers(response: &mut Response, meta: &ContentMeta) {
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(meta.content_type));

    if let Some(ref filename) = meta.filename {
        match HeaderValue::from_str(&format!("attachment; filename={filename}")) {
            Ok(value) => {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            Err(e) => warn!("dropping Content-Disposition for {filename:?}: {e}"),
        }
    }
}

/// Read state for a file artifact; owns the workspace until the read is done.
struct FileStream {
    file: File,
    path: PathBuf,
    workspace: Option<SessionWorkspace>,
    sent: usize,
}

impl FileStream {
    /// Runs on the runtime thread polling the body; see [`SessionWorkspace::release`].
    fn finish(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            workspace.release();
        }
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if self.workspace.is_some() {
            warn!(
                "client disconnected after {} bytes of {}",
                self.sent,
                self.path.display()
            );
            self.finish();
        }
    }
}

fn file_body(file: File, path: PathBuf, workspace: SessionWorkspace) -> Body {
    let state = FileStream { file, path, workspace: Some(workspace), sent: 0 };

    let chunks = stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match state.file.read(&mut buf).await {
            Ok(0) => {
                info!("Successfully served {} ({} bytes)", state.path.display(), state.sent);
                state.finish();
                None
            }
            Ok(n) => {
                buf.truncate(n);
                state.sent += n;
                Some((Ok::<_, std::io::Error>(Bytes::from(buf)), Some(state)))
            }
            Err(e) => {
                error!("Failed to stream {}: {e}", state.path.display());
                state.finish();
                Some((Err(e), None))
            }
        }
    });

    Body::from_stream(chunks)
}
