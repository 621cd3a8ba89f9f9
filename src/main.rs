use clap::Parser;
use registry_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::SetAlias(args) => cli::registry::set_alias(args).await,
        Command::LatestRunId(args) => cli::registry::latest_run_id(args).await,
    }
}
