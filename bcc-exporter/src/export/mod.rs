//! Artifact delivery
//!
//! Pipelines hand over a [`ProducedArtifact`]; this module turns it into an
//! HTTP response. File artifacts are streamed straight from the session
//! workspace, which is torn down only after the last byte is read.

pub mod artifact;
pub mod stream;

pub use artifact::{Artifact, ContentMeta, ProducedArtifact};
pub use stream::stream_artifact;
