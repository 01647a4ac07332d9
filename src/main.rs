use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod generator;
mod model;
mod output;
mod prompt;
mod runner;
mod storage;
mod tracker;

use cli::{Cli, Commands, ProfileAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("fitplan=debug")
    } else {
        EnvFilter::new("fitplan=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Profile(args) => match args.action {
            ProfileAction::Create(args) => cli::profile::create(args).await,
            ProfileAction::Show(args) => cli::profile::show(args).await,
            ProfileAction::Delete(args) => cli::profile::delete(args).await,
        },
        Commands::Generate(args) => cli::generate::execute(args).await,
        Commands::Regenerate(args) => cli::regenerate::execute(args).await,
        Commands::Plan(args) => cli::plan::execute(args).await,
        Commands::Toggle(args) => cli::progress::toggle(args).await,
        Commands::Progress(args) => cli::progress::show(args).await,
        Commands::Streak(args) => cli::progress::streak(args).await,
        Commands::Stats(args) => cli::stats::execute(args).await,
        Commands::Quote => cli::quote::execute(),
        Commands::Schema => cli::schema::execute(),
    }
}
