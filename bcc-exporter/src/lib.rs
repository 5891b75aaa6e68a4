//! # bcc-exporter - CPU profiles of running processes over HTTP
//!
//! bcc-exporter is a small HTTP front end for two Linux sampling toolchains.
//! A caller asks for a profile of a PID for N seconds and gets back either a
//! gzipped pprof protobuf or folded-stack text, ready for `go tool pprof`,
//! speedscope, or `flamegraph.pl`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            GET /debug/{pprof,folded}/profile?pid=&seconds=      │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ basic auth (optional), request log
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      bcc-exporter (this crate)                  │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │  Validation  │──▶│  PID / tool  │──▶│   Pipeline   │         │
//! │  │ (pid,seconds)│   │    checks    │   │              │         │
//! │  └──────┬───────┘   └──────────────┘   └──────┬───────┘         │
//! │         │ test=true                           │                 │
//! │         ▼                                     ▼                 │
//! │  ┌──────────────┐                     ┌──────────────┐          │
//! │  │     Mock     │────────────────────▶│    Export    │          │
//! │  │  generator   │                     │  (streaming) │          │
//! │  └──────────────┘                     └──────────────┘          │
//! └─────────────────────────────────────────────────────────────────┘
//!                         │
//!                         ▼
//!      perf record ──▶ pprof -proto          sudo profile-bpfcc -f
//!      (workspace: perf.data, profile.pb.gz)  (stdout: folded stacks)
//! ```
//!
//! ## Module Structure
//!
//! - [`validation`]: query parameters → [`domain::ProfileRequest`]
//! - [`process_lookup`]: does the PID exist? (`/proc`)
//! - [`preflight`]: are the tools on `$PATH`? startup warnings
//! - [`profiling`]: workspaces, subprocesses, stderr classification, both
//!   pipelines, the mock generator and the session orchestrator
//! - [`export`]: streaming an artifact into a response
//! - [`server`]: routes, basic auth, request logging
//! - [`cli`] / [`config`]: command line → [`config::ExporterConfig`]
//! - [`domain`]: core types and the error taxonomy
//!
//! ## Error Mapping
//!
//! | Cause | Status |
//! |-------|--------|
//! | bad/missing parameters, unknown PID, process exited, no samples | 400 |
//! | perf or pprof lacked permissions | 403 |
//! | missing tools, tool crashes, filesystem errors | 500 |
//!
//! ## Typical Usage
//!
//! ```bash
//! sudo bcc-exporter --port 8080
//!
//! curl -o profile.pb.gz 'http://host:8080/debug/pprof/profile?pid=1234&seconds=30'
//! curl 'http://host:8080/debug/folded/profile?pid=1234&seconds=30' | flamegraph.pl > cpu.svg
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod preflight;
pub mod process_lookup;
pub mod profiling;
pub mod server;
pub mod validation;
