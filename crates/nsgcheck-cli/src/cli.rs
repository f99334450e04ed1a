use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "nsgcheck",
    about = "Verify a deployed Azure network security group is associated with the expected subnets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the association check against live Azure state.
    Check {
        /// Azure subscription to read from.
        #[arg(long, env = "ARM_SUBSCRIPTION_ID")]
        subscription_id: Option<String>,

        /// Path to the check plan. Defaults to ./nsgcheck.yml when present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory `terraform output` runs in (overrides the plan).
        #[arg(long)]
        terraform_dir: Option<PathBuf>,

        /// Read a saved `terraform output -json` snapshot instead of running
        /// terraform.
        #[arg(long)]
        outputs_file: Option<PathBuf>,

        /// Report format.
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Service principal tenant. Absent = ambient credential discovery.
        #[arg(long, env = "AZURE_TENANT_ID")]
        tenant_id: Option<String>,

        /// Service principal client id.
        #[arg(long, env = "AZURE_CLIENT_ID")]
        client_id: Option<String>,

        /// Service principal client secret.
        #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,
    },

    /// Print the resolved deployment outputs without contacting Azure.
    Outputs {
        /// Path to the check plan. Defaults to ./nsgcheck.yml when present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory `terraform output` runs in (overrides the plan).
        #[arg(long)]
        terraform_dir: Option<PathBuf>,

        /// Read a saved `terraform output -json` snapshot instead of running
        /// terraform.
        #[arg(long)]
        outputs_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
