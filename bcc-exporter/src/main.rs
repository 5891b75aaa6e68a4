//! # bcc-exporter - Main Entry Point
//!
//! Parses flags, warns about missing privileges or tools, then serves until
//! Ctrl+C.

use anyhow::Result;
use clap::Parser;

use bcc_exporter::cli::Args;
use bcc_exporter::preflight::{run_startup_checks, SearchPath};
use bcc_exporter::server;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            log::error!("{e:#}");
            code
        }
    });
}

/// Binding a privileged port without root is the usual permission failure.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    let is_permission = err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
    });
    if is_permission {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let config = Args::parse().into_config();

    log::info!("bcc-exporter v{}", env!("CARGO_PKG_VERSION"));
    run_startup_checks(&config.profiler, &SearchPath);

    server::serve(config).await
}
