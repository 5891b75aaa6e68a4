//! Per-session scratch directories
//!
//! A [`SessionWorkspace`] is removed when it is released or dropped, whichever
//! comes first, so every exit path of a session (including unwinding) cleans
//! up after itself.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "bcc-exporter-";

#[derive(Debug)]
pub struct SessionWorkspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl SessionWorkspace {
    /// Create a fresh, uniquely named directory under `root`
    /// (the system temp dir when `None`).
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn acquire(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let path = dir.path().to_path_buf();
        debug!("created workspace {}", path.display());
        Ok(Self { path, dir: Some(dir) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the workspace
    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Recursively delete the workspace now.
    ///
    /// Removal is a blocking `remove_dir_all`; it runs inline even on a
    /// runtime worker. Workspaces hold two small files at most.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!("removed workspace {}", self.path.display()),
            Err(e) => warn!("failed to remove workspace {}: {e}", self.path.display()),
        }
    }
}

impl Drop for SessionWorkspace {
    fn drop(&mut self) {
        self.teardown();
    }
}
