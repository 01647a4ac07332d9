use super::plan::WorkoutPlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayProgress {
    pub day: String,
    pub completed: usize,
    pub total: usize,
}

/// Per-week completion tracking. Created fresh whenever a plan is generated
/// for that week; the streak is only changed through explicit updates.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Progress {
    pub user_id: String,

    pub week: u32,

    pub days: Vec<DayProgress>,

    #[serde(default)]
    pub current_streak: u32,

    /// Back-to-back missed_day regenerations; drives the streak-reset policy
    #[serde(default)]
    pub consecutive_missed: u32,
}

impl Progress {
    /// Build a fresh record with counts synced from the plan's flags
    pub fn for_plan(plan: &WorkoutPlan) -> Self {
        let days = plan
            .days
            .iter()
            .map(|d| DayProgress {
                day: d.day.clone(),
                completed: d.exercises.iter().filter(|e| e.completed).count(),
                total: d.exercises.len(),
            })
            .collect();

        Self {
            user_id: plan.user_id.clone(),
            week: plan.week,
            days,
            current_streak: 0,
            consecutive_missed: 0,
        }
    }

    pub fn totals(&self) -> (usize, usize) {
        let completed = self.days.iter().map(|d| d.completed).sum();
        let total = self.days.iter().map(|d| d.total).sum();
        (completed, total)
    }

    pub fn day_mut(&mut self, label: &str) -> Option<&mut DayProgress> {
        self.days
            .iter_mut()
            .find(|d| d.day.eq_ignore_ascii_case(label))
    }
}
