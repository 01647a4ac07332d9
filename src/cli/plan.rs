use crate::cli::PlanArgs;
use crate::config::Config;
use crate::output::render_plan;
use crate::storage::Storage;

pub async fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let storage = Storage::new(&config.data_dir);

    if args.history {
        let history = storage.get_plan_history(&args.user).await?;
        if history.is_empty() {
            println!("No plans yet for user '{}'", args.user);
            return Ok(());
        }
        for plan in &history {
            print!("{}", render_plan(plan));
            println!("---");
        }
    } else {
        let plan = storage.get_current_plan(&args.user).await?;
        print!("{}", render_plan(&plan));
    }

    Ok(())
}
