//! Request/response contract of both endpoints, without real profilers.

mod common;

use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, StatusCode};
use bcc_exporter::config::ProfilerConfig;
use bcc_exporter::domain::{Pid, PidError};
use bcc_exporter::preflight::ToolResolver;
use bcc_exporter::process_lookup::ProcessTable;
use bcc_exporter::profiling::Profiler;
use bcc_exporter::server::{FOLDED_ROUTE, PPROF_ROUTE};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{is_folded_line, server_for};

/// Counts every lookup so tests can prove nothing was consulted.
#[derive(Default)]
struct Recorder {
    process_lookups: AtomicUsize,
    tool_lookups: AtomicUsize,
}

struct RecordingProcesses(Arc<Recorder>);

impl ProcessTable for RecordingProcesses {
    fn lookup(&self, pid: &str) -> Result<Pid, PidError> {
        self.0.process_lookups.fetch_add(1, Ordering::SeqCst);
        Err(PidError::Malformed(pid.to_string()))
    }
}

struct RecordingTools(Arc<Recorder>);

impl ToolResolver for RecordingTools {
    fn resolve(&self, _tool: &str) -> Option<PathBuf> {
        self.0.tool_lookups.fetch_add(1, Ordering::SeqCst);
        None
    }
}

fn recording_profiler() -> (Profiler, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let profiler = Profiler::with_collaborators(
        &ProfilerConfig::default(),
        Arc::new(RecordingProcesses(recorder.clone())),
        Arc::new(RecordingTools(recorder.clone())),
    );
    (profiler, recorder)
}

fn default_server() -> axum_test::TestServer {
    server_for(Profiler::new(&ProfilerConfig::default()), None)
}

#[tokio::test]
async fn test_pprof_test_mode() {
    let server = default_server();

    let response = server
        .get(PPROF_ROUTE)
        .add_query_param("pid", "1234")
        .add_query_param("seconds", "5")
        .add_query_param("test", "true")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(CONTENT_TYPE), "application/octet-stream");
    assert!(response.maybe_header(CONTENT_DISPOSITION).is_none());
    let body = response.text();
    assert!(body.contains("1234"), "{body}");
    assert!(body.contains("duration 5 seconds"), "{body}");
}

#[tokio::test]
async fn test_folded_test_mode() {
    let server = default_server();

    let response = server
        .get(FOLDED_ROUTE)
        .add_query_param("pid", "1234")
        .add_query_param("seconds", "5")
        .add_query_param("test", "true")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(CONTENT_TYPE), "text/plain");
    let body = response.text();
    assert!(body.contains("1234"));
    assert!(body.contains("duration 5 seconds"));
    assert!(body.lines().any(is_folded_line), "{body}");
}

#[tokio::test]
async fn test_test_mode_is_deterministic_and_same_for_both_formats() {
    let server = default_server();
    let fetch = |route: &'static str| {
        server
            .get(route)
            .add_query_param("pid", "77")
            .add_query_param("seconds", "12")
            .add_query_param("test", "true")
    };

    let first = fetch(PPROF_ROUTE).await.text();
    let second = fetch(PPROF_ROUTE).await.text();
    let folded = fetch(FOLDED_ROUTE).await.text();
    assert_eq!(first, second);
    assert_eq!(first, folded);
}

#[tokio::test]
async fn test_test_mode_touches_no_process_table_or_tools() {
    let (profiler, recorder) = recording_profiler();
    let server = server_for(profiler, None);

    for route in [PPROF_ROUTE, FOLDED_ROUTE] {
        let response = server
            .get(route)
            // not even a number: test mode never parses it
            .add_query_param("pid", "not-a-pid")
            .add_query_param("seconds", "300")
            .add_query_param("test", "true")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    assert_eq!(recorder.process_lookups.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.tool_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_repeated_parameters_use_first_value() {
    let server = default_server();

    for route in [PPROF_ROUTE, FOLDED_ROUTE] {
        let response = server
            .get(route)
            .add_raw_query_param("pid=77&pid=88&seconds=5&seconds=900&test=true")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
        let body = response.text();
        assert!(body.starts_with("# Mock profile data for PID 77, duration 5 seconds"), "{body}");
    }
}

#[tokio::test]
async fn test_missing_parameters() {
    let (profiler, recorder) = recording_profiler();
    let server = server_for(profiler, None);

    let cases: [(&[(&str, &str)], &str); 3] = [
        (&[("seconds", "5")], "pid"),
        (&[("pid", "1234")], "seconds"),
        (&[], "pid, seconds"),
    ];

    for route in [PPROF_ROUTE, FOLDED_ROUTE] {
        for test_mode in [false, true] {
            for (params, missing) in cases {
                let mut request = server.get(route);
                for (key, value) in params {
                    request = request.add_query_param(key, value);
                }
                if test_mode {
                    request = request.add_query_param("test", "true");
                }
                let response = request.await;

                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{route} {params:?}");
                assert!(response.text().contains(missing), "{}", response.text());
            }
        }
    }

    assert_eq!(recorder.process_lookups.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.tool_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_seconds() {
    let (profiler, recorder) = recording_profiler();
    let server = server_for(profiler, None);

    let cases = [
        ("0", "between 1 and 300"),
        ("-5", "between 1 and 300"),
        ("301", "between 1 and 300"),
        ("100000", "between 1 and 300"),
        ("abc", "must be an integer"),
        ("2.5", "must be an integer"),
    ];

    for route in [PPROF_ROUTE, FOLDED_ROUTE] {
        for (seconds, reason) in cases {
            let response = server
                .get(route)
                .add_query_param("pid", "1234")
                .add_query_param("seconds", seconds)
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "seconds={seconds}");
            assert!(response.text().contains(reason), "{}", response.text());
        }
    }

    assert_eq!(recorder.process_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_nonexistent_pid() {
    let server = default_server();

    for route in [PPROF_ROUTE, FOLDED_ROUTE] {
        let response = server
            .get(route)
            // above any possible pid_max
            .add_query_param("pid", "999999999")
            .add_query_param("seconds", "5")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.text().contains("does not exist"), "{}", response.text());
    }
}

#[tokio::test]
async fn test_malformed_pid() {
    let server = default_server();

    let response = server
        .get(FOLDED_ROUTE)
        .add_query_param("pid", "abc")
        .add_query_param("seconds", "5")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().contains("invalid PID format: abc"));
}

#[tokio::test]
async fn test_missing_tools_reported_before_anything_runs() {
    let root = tempfile::tempdir().unwrap();
    let mut config = common::config("perf-ok", "pprof-ok", "profiler-ok", root.path());
    config.tools.pprof = "/nonexistent/bin/pprof".to_string();
    let server = common::fake_server(&config);

    let response = server
        .get(PPROF_ROUTE)
        .add_query_param("pid", common::own_pid())
        .add_query_param("seconds", "1")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text();
    assert!(body.contains("/nonexistent/bin/pprof"), "{body}");
    assert!(body.contains("go install github.com/google/pprof@latest"), "{body}");
    assert!(common::leftovers(root.path()).is_empty());
}

fn basic(value: &'static str) -> HeaderValue {
    HeaderValue::from_static(value)
}

#[tokio::test]
async fn test_basic_auth() {
    let server = server_for(Profiler::new(&ProfilerConfig::default()), Some("testpass"));

    let cases = [
        // admin:testpass; passes auth, then fails on missing params
        (Some(basic("Basic YWRtaW46dGVzdHBhc3M=")), StatusCode::BAD_REQUEST),
        // wrong:testpass
        (Some(basic("Basic d3Jvbmc6dGVzdHBhc3M=")), StatusCode::UNAUTHORIZED),
        // admin:wrong
        (Some(basic("Basic YWRtaW46d3Jvbmc=")), StatusCode::UNAUTHORIZED),
        (None, StatusCode::UNAUTHORIZED),
    ];

    for (authorization, expected) in cases {
        let mut request = server.get(PPROF_ROUTE);
        if let Some(value) = authorization.clone() {
            request = request.add_header(AUTHORIZATION, value);
        }
        let response = request.await;
        assert_eq!(response.status_code(), expected, "{authorization:?}");
        if expected == StatusCode::UNAUTHORIZED {
            assert_eq!(response.header(WWW_AUTHENTICATE), "Basic realm=\"bcc-exporter\"");
        }
    }
}

#[tokio::test]
async fn test_no_auth_without_password() {
    let server = default_server();
    let response = server
        .get(FOLDED_ROUTE)
        .add_query_param("pid", "1")
        .add_query_param("seconds", "1")
        .add_query_param("test", "true")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
