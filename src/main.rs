use clap::Parser;
use std::process::ExitCode;

use local_mcp_demo::cli::{run_commands, Cli};
use local_mcp_demo::infra::{self, config::Config};

#[tokio::main]
async fn main() -> ExitCode {
    infra::logging::init();

    let cli = Cli::parse();
    if let Some(command) = cli.command {
        return run_commands(command).await;
    }

    let cfg = Config::from_env();
    if let Err(e) = cfg.validate() {
        tracing::error!(error = %e, "invalid configuration");
        return ExitCode::FAILURE;
    }
    match infra::boot::run_server(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
