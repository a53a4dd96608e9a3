use lgo_downloader::{cli, errors};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> errors::AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(cli::cli())
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Download run failed");
            ExitCode::FAILURE
        }
    }
}
