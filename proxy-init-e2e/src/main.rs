use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use cli::Args;
use orchestrator::RunError;
use toolchain::Toolset;

mod cli;
mod config;
mod orchestrator;
mod poll;
mod teardown;
mod toolchain;

#[cfg(test)]
mod fake;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Args::parse().into_config()?;
    tracing::debug!(?config, "Starting proxy-init-e2e");

    let tools = Toolset::new(&config);
    tokio::select! {
        outcome = orchestrator::run(&config, &tools) => {
            outcome?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::warn!("Interrupted, cleaning up");
            return Err(RunError::Interrupted.into());
        }
    }

    Ok(())
}
