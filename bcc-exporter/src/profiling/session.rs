//! Session orchestration
//!
//! validate → (mock bypass) → PID check → pipeline. Sessions share nothing
//! but read-only configuration; each gets its own workspace.

use log::info;
use std::sync::Arc;

use super::bpf_pipeline::BpfPipeline;
use super::mock::mock_artifact;
use super::perf_pipeline::PerfPipeline;
use crate::config::ProfilerConfig;
use crate::domain::{ProfileError, ProfileFormat, ProfileQuery};
use crate::export::ProducedArtifact;
use crate::preflight::{SearchPath, ToolResolver};
use crate::process_lookup::{ProcFs, ProcessTable};
use crate::validation::validate;

pub struct Profiler {
    processes: Arc<dyn ProcessTable>,
    tools: Arc<dyn ToolResolver>,
    perf: PerfPipeline,
    bpf: BpfPipeline,
}

impl Profiler {
    /// Profiler backed by `/proc` and `$PATH`
    #[must_use]
    pub fn new(config: &ProfilerConfig) -> Self {
        Self::with_collaborators(config, Arc::new(ProcFs::new()), Arc::new(SearchPath))
    }

    #[must_use]
    pub fn with_collaborators(
        config: &ProfilerConfig,
        processes: Arc<dyn ProcessTable>,
        tools: Arc<dyn ToolResolver>,
    ) -> Self {
        Self { processes, tools, perf: PerfPipeline::new(config), bpf: BpfPipeline::new(config) }
    }

    /// Swap in a pipeline with custom stderr rules.
    #[must_use]
    pub fn with_perf_pipeline(mut self, perf: PerfPipeline) -> Self {
        self.perf = perf;
        self
    }

    /// Run one profiling session to completion.
    ///
    /// Test-mode requests return before `/proc` or any tool is consulted.
    ///
    /// # Errors
    /// The first [`ProfileError`] hit; nothing partial is ever returned.
    pub async fn run(
        &self,
        format: ProfileFormat,
        query: &ProfileQuery,
    ) -> Result<ProducedArtifact, ProfileError> {
        let request = validate(query, format)?;

        if request.test_mode {
            info!("Serving mock {format} profile for PID {}", request.pid);
            return Ok(mock_artifact(&request));
        }

        let pid = self.processes.lookup(&request.pid)?;
        if let Some(command) = self.processes.command_name(pid) {
            info!("Profiling PID {pid} ({command}) for {} seconds", request.duration);
        }

        match format {
            ProfileFormat::Pprof => self.perf.run(self.tools.as_ref(), pid, request.duration).await,
            ProfileFormat::Folded => self.bpf.run(pid, request.duration).await,
        }
    }
}
