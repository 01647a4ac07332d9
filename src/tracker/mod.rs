use crate::error::TrackerError;
use crate::model::{DayProgress, Progress, WorkoutPlan};

/// Overall completion percentage for a plan; 0 when the plan is empty.
pub fn compute_completion(plan: &WorkoutPlan) -> f64 {
    let (completed, total) = plan.exercise_counts();
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Set one exercise's completion flag and re-sync that day's progress
/// counts from the plan. Nothing is mutated on a failed lookup.
pub fn toggle_exercise(
    plan: &mut WorkoutPlan,
    progress: &mut Progress,
    day_label: &str,
    index: usize,
    completed: bool,
) -> Result<(), TrackerError> {
    let day = plan
        .find_day_mut(day_label)
        .ok_or_else(|| TrackerError::DayNotFound(day_label.to_string()))?;

    let len = day.exercises.len();
    match day.exercises.get_mut(index) {
        Some(exercise) => exercise.completed = completed,
        None => {
            return Err(TrackerError::ExerciseNotFound {
                day: day.day.clone(),
                index,
                len,
            })
        }
    }

    let done = day.exercises.iter().filter(|e| e.completed).count();
    let day_name = day.day.clone();
    match progress.day_mut(&day_name) {
        Some(day_progress) => {
            day_progress.total = len;
            day_progress.completed = done;
        }
        None => progress.days.push(DayProgress {
            day: day_name,
            completed: done,
            total: len,
        }),
    }

    Ok(())
}

/// Explicit streak update; the core has no calendar awareness, so the
/// caller decides when a workout counts.
pub fn update_streak(progress: &mut Progress, incremented: bool) {
    if incremented {
        progress.current_streak += 1;
    } else {
        progress.current_streak = 0;
    }
}
