use crate::model::{ExperienceLevel, FeedbackType, FitnessGoal, Profile, WorkoutPlan};

/// Fixed trainer persona and JSON-only output contract, sent as the
/// system instruction on every generation call.
pub fn system_instruction() -> &'static str {
    r#"You are an expert fitness coach AI.

You MUST return ONLY valid JSON.
NO explanations.
NO markdown.
NO text outside the JSON object.

The JSON MUST strictly follow this schema:

{
  "days": [
    {
      "day": string,
      "focus": string,
      "exercises": [
        {
          "name": string,
          "sets": number,
          "reps": string,
          "rest_seconds": number,
          "notes": string
        }
      ]
    }
  ]
}

"reps" is always a string and may be a range like "8-10".
"rest_seconds" is a whole number of seconds."#
}

/// Appended to the user prompt when a response could not be parsed and the
/// call is re-issued once.
pub fn strict_json_reminder() -> &'static str {
    "STRICT MODE: your previous response was not a single valid JSON object. \
     Respond again with EXACTLY ONE JSON object matching the schema. \
     No prose, no markdown, no code fences."
}

fn goal_directives(goal: FitnessGoal) -> &'static str {
    match goal {
        FitnessGoal::FatLoss => {
            "Training emphasis: fat loss. Favor compound movements at moderate to high \
             rep ranges with short rests to keep energy expenditure high."
        }
        FitnessGoal::MuscleGain => {
            "Training emphasis: muscle gain. Program progressive overload with moderate \
             rep ranges and longer rest periods between sets."
        }
        FitnessGoal::GeneralFitness => {
            "Training emphasis: general fitness. Keep the week balanced across the whole \
             body, mixing strength and conditioning work."
        }
    }
}

fn safety_directives(experience: ExperienceLevel) -> &'static str {
    match experience {
        ExperienceLevel::Beginner => {
            "The user is a beginner: every exercise MUST carry form cues and \
             injury-prevention caveats in its notes field. Choose conservative loads \
             and simple movement patterns."
        }
        ExperienceLevel::Intermediate => {
            "The user is intermediate: standard exercise selection is fine; include \
             notes where technique matters."
        }
        ExperienceLevel::Advanced => {
            "The user is advanced: harder variations and higher intensity techniques \
             are allowed."
        }
    }
}

fn profile_lines(profile: &Profile) -> String {
    let equipment = profile
        .equipment
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut s = format!(
        "User profile:\n- age: {}\n- goal: {}\n- experience: {}\n- session duration: {} minutes\n- available equipment: {}\n",
        profile.age, profile.goal, profile.experience, profile.session_minutes, equipment
    );
    if let Some(gender) = &profile.gender {
        s.push_str(&format!("- gender: {gender}\n"));
    }
    if let Some(height) = profile.height_cm {
        s.push_str(&format!("- height: {height} cm\n"));
    }
    if let Some(weight) = profile.weight_kg {
        s.push_str(&format!("- weight: {weight} kg\n"));
    }
    s
}

fn common_rules(profile: &Profile) -> String {
    let days = profile.days_per_week;
    let equipment = profile
        .equipment
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CRITICAL RULES:\n\
         1. Generate EXACTLY {days} workout days, numbered \"Day 1\" to \"Day {days}\".\n\
         2. Do NOT generate more or fewer days under any circumstance.\n\
         3. Exercises must use ONLY this equipment: {equipment}. No other equipment.\n\
         4. Each day must fit within {minutes} minutes including rests.\n\
         5. Use realistic, well-known exercises; make the week varied and progressive.",
        days = days,
        equipment = equipment,
        minutes = profile.session_minutes,
    )
}

/// Request text for a first-time plan. Pure function of the profile.
pub fn build_initial_prompt(profile: &Profile) -> String {
    format!(
        "{profile}\n{goal}\n\n{safety}\n\n{rules}",
        profile = profile_lines(profile),
        goal = goal_directives(profile.goal),
        safety = safety_directives(profile.experience),
        rules = common_rules(profile),
    )
}

/// One line per exercise so the model sees what it is adjusting.
pub fn summarize_plan(plan: &WorkoutPlan) -> String {
    let mut s = String::new();
    for day in &plan.days {
        s.push_str(&format!("{} (focus: {})\n", day.day, day.focus));
        for exercise in &day.exercises {
            s.push_str(&format!(
                "  - {}: {} sets x {} reps, rest {}s\n",
                exercise.name, exercise.sets, exercise.reps, exercise.rest_seconds
            ));
        }
    }
    s
}

fn feedback_directives(feedback: FeedbackType) -> &'static str {
    match feedback {
        FeedbackType::TooEasy => {
            "The user found the previous week TOO EASY. Increase sets or reps, reduce \
             rest periods, and introduce harder variations of the same movements. Keep \
             each day's focus area unchanged."
        }
        FeedbackType::TooHard => {
            "The user found the previous week TOO HARD. Decrease sets or reps, increase \
             rest periods, and substitute easier variations. Keep each day's focus area \
             unchanged."
        }
        FeedbackType::MissedDay => {
            "The user MISSED a training day last week. Redistribute and compress the \
             remaining training stimulus across the available days without exceeding the \
             session duration, preserving the total weekly volume intent."
        }
    }
}

/// Request text for a feedback-driven regeneration. Pure function of
/// (profile, previous plan, feedback).
pub fn build_regeneration_prompt(
    profile: &Profile,
    previous: &WorkoutPlan,
    feedback: FeedbackType,
) -> String {
    format!(
        "{profile}\nPrevious week's plan (week {week}):\n{summary}\n{directives}\n\n{rules}",
        profile = profile_lines(profile),
        week = previous.week,
        summary = summarize_plan(previous),
        directives = feedback_directives(feedback),
        rules = common_rules(profile),
    )
}

pub fn motivational_quotes() -> &'static [&'static str] {
    &[
        "Push yourself, because no one else is going to do it for you.",
        "Your body can stand almost anything. It's your mind you have to convince.",
        "Success starts with self-discipline.",
        "No pain, no gain. Shut up and train.",
        "Small progress is still progress.",
        "Don't limit your challenges. Challenge your limits.",
        "Sweat is just fat crying.",
        "Train insane or remain the same.",
        "Discipline is choosing between what you want now and what you want most.",
        "The hard part isn't getting your body in shape. The hard part is getting your mind in shape.",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayPlan, Equipment, Exercise};
    use chrono::Utc;

    fn profile() -> Profile {
        Profile {
            user_id: "u1".to_string(),
            age: 28,
            gender: None,
            height_cm: None,
            weight_kg: None,
            goal: FitnessGoal::FatLoss,
            experience: ExperienceLevel::Beginner,
            equipment: vec![Equipment::Bodyweight, Equipment::Dumbbells],
            session_minutes: 45,
            days_per_week: 4,
        }
    }

    fn previous_plan() -> WorkoutPlan {
        WorkoutPlan {
            user_id: "u1".to_string(),
            week: 1,
            days: vec![DayPlan {
                day: "Day 1".to_string(),
                focus: "Upper Body".to_string(),
                exercises: vec![Exercise {
                    name: "Push-Up".to_string(),
                    sets: 4,
                    reps: "8-10".to_string(),
                    rest_seconds: 60,
                    notes: None,
                    completed: false,
                }],
            }],
            generated_at: Utc::now(),
            context: None,
        }
    }

    #[test]
    fn test_initial_prompt_states_exact_day_count() {
        let prompt = build_initial_prompt(&profile());
        assert!(prompt.contains("EXACTLY 4 workout days"));
        assert!(prompt.contains("\"Day 1\" to \"Day 4\""));
    }

    #[test]
    fn test_initial_prompt_restricts_equipment_to_profile_set() {
        let prompt = build_initial_prompt(&profile());
        assert!(prompt.contains("ONLY this equipment: bodyweight, dumbbells"));
        assert!(!prompt.contains("gym"));
    }

    #[test]
    fn test_beginner_gets_safety_tier() {
        let prompt = build_initial_prompt(&profile());
        assert!(prompt.contains("form cues"));
        assert!(prompt.contains("injury-prevention"));
    }

    #[test]
    fn test_goal_directives_differ() {
        let mut p = profile();
        let fat_loss = build_initial_prompt(&p);
        p.goal = FitnessGoal::MuscleGain;
        let muscle_gain = build_initial_prompt(&p);
        assert!(fat_loss.contains("fat loss"));
        assert!(muscle_gain.contains("progressive overload"));
        assert_ne!(fat_loss, muscle_gain);
    }

    #[test]
    fn test_regeneration_prompt_embeds_previous_plan() {
        let prompt = build_regeneration_prompt(&profile(), &previous_plan(), FeedbackType::TooHard);
        assert!(prompt.contains("Push-Up: 4 sets x 8-10 reps, rest 60s"));
        assert!(prompt.contains("TOO HARD"));
        assert!(prompt.contains("increase rest"));
    }

    #[test]
    fn test_missed_day_preserves_volume_intent() {
        let prompt =
            build_regeneration_prompt(&profile(), &previous_plan(), FeedbackType::MissedDay);
        assert!(prompt.contains("Redistribute"));
        assert!(prompt.contains("weekly volume"));
    }

    #[test]
    fn test_system_instruction_demands_json_only() {
        let system = system_instruction();
        assert!(system.contains("ONLY valid JSON"));
        assert!(system.contains("\"rest_seconds\""));
    }
}
