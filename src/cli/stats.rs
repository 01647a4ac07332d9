use crate::cli::StatsArgs;
use crate::config::Config;
use crate::error::StorageError;
use crate::output::render_stats;
use crate::storage::Storage;
use crate::tracker;

pub async fn execute(args: StatsArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    let profile = storage.get_profile(&args.user).await?;

    let history = storage.get_plan_history(&args.user).await?;
    let current_plan = history.last();
    let completion = current_plan.map(tracker::compute_completion).unwrap_or(0.0);

    let progress = match storage.get_progress(&args.user).await {
        Ok(progress) => Some(progress),
        Err(StorageError::ProgressNotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    print!(
        "{}",
        render_stats(
            &profile,
            current_plan,
            history.len(),
            progress.as_ref(),
            completion
        )
    );
    Ok(())
}
