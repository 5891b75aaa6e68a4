//! Profiling core
//!
//! - `session`: request → artifact orchestration
//! - `perf_pipeline`: `perf record` + `pprof -proto` (binary output)
//! - `bpf_pipeline`: BCC `profile` (folded text output)
//! - `mock`: synthetic output for test mode
//! - `workspace`: scratch directories removed on every exit path
//! - `command`: subprocess execution
//! - `classifier`: stderr pattern rules

pub mod bpf_pipeline;
pub mod classifier;
pub mod command;
pub mod mock;
pub mod perf_pipeline;
pub mod session;
pub mod workspace;

// Re-export common types
pub use bpf_pipeline::BpfPipeline;
pub use classifier::{FailureKind, StderrClassifier};
pub use command::SubprocessOutcome;
pub use mock::generate_mock_profile;
pub use perf_pipeline::PerfPipeline;
pub use session::Profiler;
pub use workspace::SessionWorkspace;
