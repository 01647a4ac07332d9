use crate::cli::{ProgressArgs, StreakArgs, ToggleArgs};
use crate::config::Config;
use crate::output::render_progress;
use crate::storage::Storage;
use crate::tracker;
use tracing::info;

pub async fn toggle(args: ToggleArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    let mut plan = storage.get_current_plan(&args.user).await?;
    let mut progress = storage.get_progress(&args.user).await?;

    let completed = !args.undone;
    tracker::toggle_exercise(&mut plan, &mut progress, &args.day, args.exercise, completed)?;

    storage.update_current_plan(&plan).await?;
    storage.save_progress(&progress).await?;

    info!(
        user = %args.user,
        day = %args.day,
        exercise = args.exercise,
        completed,
        "exercise toggled"
    );
    println!(
        "{} exercise {} on {}",
        if completed { "Completed" } else { "Uncompleted" },
        args.exercise,
        args.day
    );
    Ok(())
}

pub async fn show(args: ProgressArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    let plan = storage.get_current_plan(&args.user).await?;
    let progress = storage.get_progress(&args.user).await?;
    let completion = tracker::compute_completion(&plan);

    print!("{}", render_progress(&progress, completion));
    Ok(())
}

pub async fn streak(args: StreakArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    let mut progress = storage.get_progress(&args.user).await?;
    tracker::update_streak(&mut progress, !args.reset);
    storage.save_progress(&progress).await?;

    println!("Streak for '{}' is now {}", args.user, progress.current_streak);
    Ok(())
}
