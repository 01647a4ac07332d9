use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::generator::create_client;
use crate::output::render_plan;
use crate::runner::Orchestrator;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::info;

pub async fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    // Credential check happens here, before any network call
    let client = create_client(&config.gemini)?;
    let storage = Arc::new(Storage::new(&config.data_dir));

    let profile = storage.get_profile(&args.user).await?;
    info!(user = %args.user, days = profile.days_per_week, "generating plan");

    let orchestrator = Orchestrator::new(storage, client, config);
    let plan = orchestrator.generate(&profile).await?;

    print!("{}", render_plan(&plan));
    Ok(())
}
