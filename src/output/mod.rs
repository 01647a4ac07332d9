use crate::model::{Profile, Progress, WorkoutPlan};

/// Render a plan for the terminal
pub fn render_plan(plan: &WorkoutPlan) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Week {} (generated {})\n",
        plan.week,
        plan.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(context) = &plan.context {
        out.push_str(&format!("{}\n", context));
    }
    out.push('\n');

    for day in &plan.days {
        out.push_str(&format!("{} - {}\n", day.day, day.focus));
        for (idx, exercise) in day.exercises.iter().enumerate() {
            let mark = if exercise.completed { "x" } else { " " };
            out.push_str(&format!(
                "  [{}] {}. {}: {} x {} reps, rest {}s\n",
                mark,
                idx,
                exercise.name,
                exercise.sets,
                exercise.reps,
                exercise.rest_seconds
            ));
            if let Some(notes) = &exercise.notes {
                if !notes.is_empty() {
                    out.push_str(&format!("         {}\n", notes));
                }
            }
        }
        out.push('\n');
    }

    out
}

pub fn render_progress(progress: &Progress, completion: f64) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Week {} progress: {:.0}% complete, streak {}\n\n",
        progress.week, completion, progress.current_streak
    ));

    for day in &progress.days {
        out.push_str(&format!(
            "  {}: {}/{} exercises\n",
            day.day, day.completed, day.total
        ));
    }

    out
}

pub fn render_profile(profile: &Profile) -> String {
    let equipment = profile
        .equipment
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!(
        "User: {}\nAge: {}\nGoal: {}\nExperience: {}\nEquipment: {}\nSession: {} minutes, {} days/week\n",
        profile.user_id,
        profile.age,
        profile.goal,
        profile.experience,
        equipment,
        profile.session_minutes,
        profile.days_per_week
    );
    if let Some(gender) = &profile.gender {
        out.push_str(&format!("Gender: {}\n", gender));
    }
    if let Some(height) = profile.height_cm {
        out.push_str(&format!("Height: {} cm\n", height));
    }
    if let Some(weight) = profile.weight_kg {
        out.push_str(&format!("Weight: {} kg\n", weight));
    }
    out
}

pub fn render_stats(
    profile: &Profile,
    current_plan: Option<&WorkoutPlan>,
    plan_count: usize,
    progress: Option<&Progress>,
    completion: f64,
) -> String {
    let mut out = render_profile(profile);
    out.push('\n');

    out.push_str(&format!("Plans generated: {}\n", plan_count));
    match current_plan {
        Some(plan) => {
            let (completed, total) = plan.exercise_counts();
            out.push_str(&format!(
                "Current week: {} ({}/{} exercises done, {:.0}%)\n",
                plan.week, completed, total, completion
            ));
        }
        None => out.push_str("Current week: no plan yet\n"),
    }

    match progress {
        Some(progress) => out.push_str(&format!("Streak: {}\n", progress.current_streak)),
        None => out.push_str("Streak: 0\n"),
    }

    out
}
