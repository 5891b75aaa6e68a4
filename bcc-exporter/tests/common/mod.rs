//! Shared fixtures: stand-in profiler scripts and server builders.

#![allow(dead_code)]

use axum_test::TestServer;
use bcc_exporter::config::{ProfilerConfig, ToolPaths};
use bcc_exporter::profiling::Profiler;
use bcc_exporter::server::create_router;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

/// What the fake pprof "converts" every capture into, before gzip
pub const PROFILE_PAYLOAD: &[u8] = b"\x0a\x04fake pprof protobuf";

const PERF_RECORD: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
"#;

fn scripts(fixture: &Path) -> Vec<(&'static str, String)> {
    vec![
        ("perf-ok", format!("{PERF_RECORD}printf 'PERFILE2' > \"$out\"\n")),
        ("perf-empty", format!("{PERF_RECORD}: > \"$out\"\n")),
        ("perf-nofile", "exit 0\n".to_string()),
        (
            "perf-denied",
            "echo 'Error: Access to performance monitoring is limited. Permission denied' >&2\n\
             exit 255\n"
                .to_string(),
        ),
        (
            "perf-vanished",
            "echo 'failed to open thread maps: No such process' >&2\nexit 1\n".to_string(),
        ),
        ("perf-crash", "echo 'perf: unexpected mmap failure' >&2\nexit 2\n".to_string()),
        // pprof -proto -output <out> <perf.data>
        ("pprof-ok", format!("[ -s \"$4\" ] || exit 9\ncp '{}' \"$3\"\n", fixture.display())),
        ("pprof-empty", ": > \"$3\"\n".to_string()),
        ("pprof-nosamples", "echo 'perf.data: profile has no samples' >&2\nexit 1\n".to_string()),
        ("pprof-crash", "echo 'parsing profile: unrecognized format' >&2\nexit 1\n".to_string()),
        // profile-bpfcc -p <pid> -F <freq> -f <seconds>
        (
            "profiler-ok",
            "printf 'target-%s;main;spin %s\\ntarget-%s;main;idle 7\\n' \"$2\" \"$6\" \"$2\"\n"
                .to_string(),
        ),
        ("profiler-fail", "echo 'could not attach to pid' >&2\nexit 1\n".to_string()),
    ]
}

/// Directory holding the fake tools, created once per test binary.
///
/// Everything is written before the first test can spawn anything, so no
/// script is ever executed while still open for writing.
pub fn fake_tools() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir_in(env!("CARGO_TARGET_TMPDIR")).unwrap();

        let fixture = dir.path().join("fixture.pb.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PROFILE_PAYLOAD).unwrap();
        fs::write(&fixture, encoder.finish().unwrap()).unwrap();

        for (name, body) in scripts(&fixture) {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
    .path()
}

pub fn tool(name: &str) -> String {
    fake_tools().join(name).to_string_lossy().into_owned()
}

/// Config wired to fake tools, with workspaces under `temp_root`.
pub fn config(perf: &str, pprof: &str, profiler: &str, temp_root: &Path) -> ProfilerConfig {
    ProfilerConfig {
        tools: ToolPaths { perf: tool(perf), pprof: tool(pprof), profiler: tool(profiler) },
        frequency: 99,
        use_sudo: false,
        temp_root: Some(temp_root.to_path_buf()),
    }
}

pub fn server_for(profiler: Profiler, password: Option<&str>) -> TestServer {
    TestServer::new(create_router(Arc::new(profiler), password)).unwrap()
}

pub fn fake_server(config: &ProfilerConfig) -> TestServer {
    server_for(Profiler::new(config), None)
}

/// Entries left under a workspace root
pub fn leftovers(root: &Path) -> Vec<PathBuf> {
    fs::read_dir(root).unwrap().map(|e| e.unwrap().path()).collect()
}

pub fn own_pid() -> String {
    std::process::id().to_string()
}

/// `frame;frame;...;frame COUNT`
pub fn is_folded_line(line: &str) -> bool {
    let Some((stack, count)) = line.rsplit_once(' ') else {
        return false;
    };
    count.parse::<u64>().is_ok() && stack.contains(';') && stack.split(';').all(|f| !f.is_empty())
}
