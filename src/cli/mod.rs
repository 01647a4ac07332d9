pub mod generate;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod quote;
pub mod regenerate;
pub mod schema;
pub mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(
    author,
    version,
    about = "AI-personalized weekly workout plans with feedback-driven regeneration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, show or delete a user profile
    Profile(ProfileArgs),

    /// Generate a workout plan for a stored profile
    Generate(GenerateArgs),

    /// Regenerate the current plan from feedback
    Regenerate(RegenerateArgs),

    /// Show the current plan, or the whole history
    Plan(PlanArgs),

    /// Mark an exercise complete or incomplete
    Toggle(ToggleArgs),

    /// Show completion and streak for the current week
    Progress(ProgressArgs),

    /// Increment or reset the workout streak
    Streak(StreakArgs),

    /// Show aggregate stats for a user
    Stats(StatsArgs),

    /// Print a motivational quote
    Quote,

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

#[derive(Subcommand, Clone)]
pub enum ProfileAction {
    /// Create or replace a profile
    Create(CreateProfileArgs),

    /// Show a stored profile
    Show(UserArgs),

    /// Delete a user's profile, plans and progress
    Delete(UserArgs),
}

#[derive(Parser, Clone)]
pub struct UserArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct CreateProfileArgs {
    /// User id (a fresh one is generated when omitted)
    #[arg(long)]
    pub user: Option<String>,

    /// Age in years
    #[arg(long)]
    pub age: u32,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub height_cm: Option<u32>,

    #[arg(long)]
    pub weight_kg: Option<f64>,

    /// Training goal: fat_loss | muscle_gain | general_fitness
    #[arg(long)]
    pub goal: String,

    /// Experience level: beginner | intermediate | advanced
    #[arg(long)]
    pub experience: String,

    /// Comma-separated equipment: bodyweight,dumbbells,gym
    #[arg(long, value_delimiter = ',')]
    pub equipment: Vec<String>,

    /// Session duration in minutes
    #[arg(long)]
    pub minutes: u32,

    /// Training days per week
    #[arg(long)]
    pub days: u8,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct GenerateArgs {
    /// User id with a stored profile
    #[arg(long)]
    pub user: String,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct RegenerateArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Feedback type: too_easy | too_hard | missed_day
    #[arg(long)]
    pub feedback: String,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Show the full plan history instead of the current week
    #[arg(long)]
    pub history: bool,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct ToggleArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Day label, e.g. "Day 2"
    #[arg(long)]
    pub day: String,

    /// Zero-based exercise index within the day
    #[arg(long)]
    pub exercise: usize,

    /// Mark incomplete instead of complete
    #[arg(long)]
    pub undone: bool,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct ProgressArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct StreakArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Reset the streak to zero instead of incrementing it
    #[arg(long)]
    pub reset: bool,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}

#[derive(Parser, Clone)]
pub struct StatsArgs {
    /// User id
    #[arg(long)]
    pub user: String,

    /// Path to config file
    #[arg(long, default_value = "fitplan.yaml")]
    pub config: PathBuf,
}
