mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            subscription_id,
            config,
            terraform_dir,
            outputs_file,
            format,
            tenant_id,
            client_id,
            client_secret,
        } => {
            commands::check(
                subscription_id,
                config,
                terraform_dir,
                outputs_file,
                format,
                tenant_id,
                client_id,
                client_secret,
            )
            .await
        }
        Command::Outputs { config, terraform_dir, outputs_file } => {
            commands::outputs(config, terraform_dir, outputs_file)
                .await
                .map(|()| true)
        }
    };

    // 0 = all checks passed, 1 = failed sub-checks, 2 = fatal error.
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("nsgcheck: {:#}", e);
            ExitCode::from(2)
        }
    }
}
