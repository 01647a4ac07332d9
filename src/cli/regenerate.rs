use crate::cli::RegenerateArgs;
use crate::config::Config;
use crate::generator::create_client;
use crate::model::FeedbackType;
use crate::output::render_plan;
use crate::runner::Orchestrator;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::info;

pub async fn execute(args: RegenerateArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.validate()?;

    let feedback: FeedbackType = args.feedback.parse()?;
    let client = create_client(&config.gemini)?;
    let storage = Arc::new(Storage::new(&config.data_dir));

    info!(user = %args.user, %feedback, "regenerating plan");
    let orchestrator = Orchestrator::new(storage, client, config);
    let plan = orchestrator.regenerate(&args.user, feedback).await?;

    print!("{}", render_plan(&plan));
    Ok(())
}
