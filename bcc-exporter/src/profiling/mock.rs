//! Synthetic profiles for `test=true` requests
//!
//! Lets the full request/response contract be exercised without privileges,
//! a live target, or any profiler installed.

use crate::domain::{ProfileFormat, ProfileRequest, Seconds};
use crate::export::{Artifact, ContentMeta, ProducedArtifact};

/// Folded-stack text that embeds `pid` and `duration`; identical for identical input.
#[must_use]
pub fn generate_mock_profile(pid: &str, duration: Seconds) -> String {
    format!(
        "# Mock profile data for PID {pid}, duration {duration} seconds
main;std::rt::lang_start;app::main;tokio::runtime::Runtime::block_on 12
main;std::rt::lang_start;app::main;tokio::runtime::Runtime::block_on;app::server::accept 31
main;std::rt::lang_start;app::main;tokio::runtime::Runtime::block_on;app::server::accept;app::handler::handle_request 18
tokio-runtime-w;std::thread::start;tokio::runtime::scheduler::worker::run;app::handler::parse_body 44
tokio-runtime-w;std::thread::start;tokio::runtime::scheduler::worker::run;app::handler::parse_body;serde_json::de::from_slice 27
tokio-runtime-w;std::thread::start;tokio::runtime::scheduler::worker::run;app::db::query;epoll_wait 9
"
    )
}

/// Response for a test-mode session; the body is the same for both formats.
#[must_use]
pub fn mock_artifact(request: &ProfileRequest) -> ProducedArtifact {
    let meta = match request.format {
        ProfileFormat::Pprof => ContentMeta::binary(),
        ProfileFormat::Folded => ContentMeta::text(),
    };
    let body = generate_mock_profile(&request.pid, request.duration);
    ProducedArtifact { artifact: Artifact::Buffer(body.into_bytes()), meta }
}
