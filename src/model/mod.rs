mod plan;
mod profile;
mod progress;

pub use plan::{DayPlan, Exercise, FeedbackType, WorkoutPlan};
pub use profile::{validate_user_id, Equipment, ExperienceLevel, FitnessGoal, Profile};
pub use progress::{DayProgress, Progress};
