//! Registry commands - one-shot registry operations from the command line

use clap::Args;
use serde_json::json;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::RegistryService;

#[derive(Args, Debug)]
pub struct SetAliasArgs {
    /// Registered model name
    #[arg(long)]
    pub model_name: String,

    /// Alias to set, e.g. `production`
    #[arg(long)]
    pub alias: String,

    /// Version the alias should point to
    #[arg(long)]
    pub version: String,
}

#[derive(Args, Debug)]
pub struct LatestRunIdArgs {
    /// Registered model name
    #[arg(long)]
    pub model_name: String,
}

fn registry_service() -> anyhow::Result<RegistryService> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    crate::create_registry_service(&config)
}

/// Same upsert the `/update-alias` endpoint performs
pub async fn set_alias(args: SetAliasArgs) -> anyhow::Result<()> {
    let binding = registry_service()?
        .set_alias(&args.model_name, &args.alias, &args.version)
        .await?;

    println!("{}", binding);

    Ok(())
}

pub async fn latest_run_id(args: LatestRunIdArgs) -> anyhow::Result<()> {
    let run_id = registry_service()?
        .get_latest_run_id_for_model(&args.model_name)
        .await?;

    println!("{}", json!({ "run_id": run_id }));

    Ok(())
}
