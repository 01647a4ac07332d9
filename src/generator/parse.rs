use crate::error::GenerationError;
use crate::model::{DayPlan, Equipment, Exercise, Profile, WorkoutPlan};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

/// Wire shape the model is instructed to produce. Required fields are
/// enforced here by serde; everything else is validated explicitly after
/// decoding.
#[derive(Debug, Deserialize)]
struct PlanPayload {
    days: Vec<DayPayload>,
}

#[derive(Debug, Deserialize)]
struct DayPayload {
    day: String,
    focus: String,
    exercises: Vec<ExercisePayload>,
}

#[derive(Debug, Deserialize)]
struct ExercisePayload {
    name: String,
    sets: u32,
    reps: String,
    rest_seconds: u32,
    #[serde(default)]
    notes: Option<String>,
}

fn parse_err(reason: impl Into<String>, raw: &str) -> GenerationError {
    GenerationError::Parse {
        reason: reason.into(),
        raw: raw.to_string(),
    }
}

/// Extract a single JSON object from model output that may be wrapped in
/// prose or markdown code fences.
pub(crate) fn extract_json(raw: &str) -> Option<String> {
    // Fenced blocks first: the model sometimes ignores the no-markdown rule
    if let Ok(re) = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```") {
        for cap in re.captures_iter(raw) {
            if let Some(m) = cap.get(1) {
                if let Some(obj) = first_object(m.as_str()) {
                    if serde_json::from_str::<serde_json::Value>(obj).is_ok() {
                        return Some(obj.to_string());
                    }
                }
            }
        }
    }

    let obj = first_object(raw)?;
    if serde_json::from_str::<serde_json::Value>(obj).is_ok() {
        Some(obj.to_string())
    } else {
        None
    }
}

/// First `{` through its matching `}` by brace-depth counting
fn first_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0i32;

    for (i, c) in s[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Equipment implied by an exercise name. Names that hint at neither
/// dumbbells nor gym machinery are treated as bodyweight.
pub(crate) fn implied_equipment(name: &str) -> Equipment {
    let lower = name.to_lowercase();

    if lower.contains("dumbbell") {
        return Equipment::Dumbbells;
    }

    const GYM_KEYWORDS: &[&str] = &[
        "barbell",
        "machine",
        "cable",
        "smith",
        "kettlebell",
        "pulldown",
        "pull-down",
        "leg press",
        "bench press",
        "pec deck",
        "hack squat",
        "treadmill",
        "rowing machine",
        "erg",
    ];

    if GYM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Equipment::Gym;
    }

    Equipment::Bodyweight
}

/// Bodyweight stand-in for a movement the profile's equipment cannot cover.
/// Matched longest-pattern-first so "bench press" wins over "press".
fn bodyweight_substitute(name: &str) -> Option<&'static str> {
    const SUBSTITUTES: &[(&str, &str)] = &[
        ("bench press", "Push-Up"),
        ("chest press", "Push-Up"),
        ("shoulder press", "Pike Push-Up"),
        ("overhead press", "Pike Push-Up"),
        ("pulldown", "Inverted Row"),
        ("pull-down", "Inverted Row"),
        ("leg press", "Bodyweight Squat"),
        ("hack squat", "Bodyweight Squat"),
        ("squat", "Bodyweight Squat"),
        ("deadlift", "Single-Leg Hip Hinge"),
        ("lunge", "Bodyweight Lunge"),
        ("row", "Inverted Row"),
        ("curl", "Chin-Up Hold"),
    ];

    let lower = name.to_lowercase();
    SUBSTITUTES
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, substitute)| *substitute)
}

fn convert_day(
    payload: DayPayload,
    profile: &Profile,
    min_exercises: usize,
    raw: &str,
) -> Result<DayPlan, GenerationError> {
    if payload.exercises.is_empty() {
        return Err(parse_err(
            format!("day '{}' has no exercises", payload.day),
            raw,
        ));
    }

    let mut exercises = Vec::new();
    let mut dropped = Vec::new();

    for exercise in payload.exercises {
        if exercise.sets == 0 {
            return Err(parse_err(
                format!("exercise '{}' has zero sets", exercise.name),
                raw,
            ));
        }

        let implied = implied_equipment(&exercise.name);
        if profile.has_equipment(implied) {
            exercises.push(Exercise {
                name: exercise.name,
                sets: exercise.sets,
                reps: exercise.reps,
                rest_seconds: exercise.rest_seconds,
                notes: exercise.notes,
                completed: false,
            });
        } else if profile.has_equipment(Equipment::Bodyweight) {
            match bodyweight_substitute(&exercise.name) {
                Some(substitute) => {
                    debug!(
                        original = %exercise.name,
                        substitute,
                        "substituted exercise outside the profile's equipment set"
                    );
                    exercises.push(Exercise {
                        name: substitute.to_string(),
                        sets: exercise.sets,
                        reps: exercise.reps,
                        rest_seconds: exercise.rest_seconds,
                        notes: exercise.notes,
                        completed: false,
                    });
                }
                None => dropped.push(exercise.name),
            }
        } else {
            dropped.push(exercise.name);
        }
    }

    if !dropped.is_empty() {
        warn!(
            day = %payload.day,
            dropped = ?dropped,
            "removed exercises requiring unavailable equipment"
        );
    }

    if exercises.len() < min_exercises {
        return Err(GenerationError::Constraint(format!(
            "day '{}' keeps only {} usable exercise(s) for the available equipment (minimum {})",
            payload.day,
            exercises.len(),
            min_exercises
        )));
    }

    Ok(DayPlan {
        day: payload.day,
        focus: payload.focus,
        exercises,
    })
}

/// Decode and validate a raw model response into a `WorkoutPlan`.
///
/// Week numbering and context are owned by the caller; whatever the model
/// claims about them is ignored.
pub fn plan_from_response(
    raw: &str,
    profile: &Profile,
    week: u32,
    context: Option<String>,
    min_exercises: usize,
) -> Result<WorkoutPlan, GenerationError> {
    let json =
        extract_json(raw).ok_or_else(|| parse_err("no JSON object found in response", raw))?;

    let payload: PlanPayload =
        serde_json::from_str(&json).map_err(|e| parse_err(format!("schema mismatch: {e}"), raw))?;

    let expected = usize::from(profile.days_per_week);
    if payload.days.len() != expected {
        return Err(parse_err(
            format!(
                "expected {} days, model produced {}",
                expected,
                payload.days.len()
            ),
            raw,
        ));
    }

    let days = payload
        .days
        .into_iter()
        .map(|d| convert_day(d, profile, min_exercises, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkoutPlan {
        user_id: profile.user_id.clone(),
        week,
        days,
        generated_at: Utc::now(),
        context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExperienceLevel, FitnessGoal};

    fn profile(equipment: Vec<Equipment>) -> Profile {
        Profile {
            user_id: "u1".to_string(),
            age: 28,
            gender: None,
            height_cm: None,
            weight_kg: None,
            goal: FitnessGoal::FatLoss,
            experience: ExperienceLevel::Beginner,
            equipment,
            session_minutes: 45,
            days_per_week: 2,
        }
    }

    fn two_day_json(first_exercise: &str) -> String {
        format!(
            r#"{{"days": [
                {{"day": "Day 1", "focus": "Upper Body", "exercises": [
                    {{"name": "{first_exercise}", "sets": 3, "reps": "8-10", "rest_seconds": 60, "notes": "keep core tight"}}
                ]}},
                {{"day": "Day 2", "focus": "Lower Body", "exercises": [
                    {{"name": "Bodyweight Squat", "sets": 4, "reps": "15", "rest_seconds": 45}}
                ]}}
            ]}}"#
        )
    }

    #[test]
    fn test_extract_direct_json() {
        let raw = r#"{"days": []}"#;
        assert_eq!(extract_json(raw).unwrap(), raw);
    }

    #[test]
    fn test_extract_from_code_fence() {
        let raw = "Here is your plan:\n```json\n{\"days\": []}\n```\nEnjoy!";
        assert_eq!(extract_json(raw).unwrap(), "{\"days\": []}");
    }

    #[test]
    fn test_extract_from_surrounding_prose() {
        let raw = "Sure! {\"days\": [], \"nested\": {\"a\": 1}} hope that helps";
        assert_eq!(
            extract_json(raw).unwrap(),
            "{\"days\": [], \"nested\": {\"a\": 1}}"
        );
    }

    #[test]
    fn test_extract_rejects_non_json() {
        assert!(extract_json("no braces here").is_none());
        assert!(extract_json("{ not json }").is_none());
    }

    #[test]
    fn test_valid_response_maps_to_plan() {
        let p = profile(vec![Equipment::Bodyweight, Equipment::Dumbbells]);
        let raw = two_day_json("Dumbbell Row");
        let plan = plan_from_response(&raw, &p, 1, None, 1).unwrap();

        assert_eq!(plan.days.len(), 2);
        assert_eq!(plan.week, 1);
        assert_eq!(plan.days[0].exercises[0].name, "Dumbbell Row");
        assert!(!plan.days[0].exercises[0].completed);
        assert_eq!(
            plan.days[0].exercises[0].notes.as_deref(),
            Some("keep core tight")
        );
    }

    #[test]
    fn test_wrong_day_count_is_parse_failure() {
        let mut p = profile(vec![Equipment::Bodyweight]);
        p.days_per_week = 3;
        let raw = two_day_json("Push-Up");
        match plan_from_response(&raw, &p, 1, None, 1) {
            Err(GenerationError::Parse { reason, .. }) => {
                assert!(reason.contains("expected 3 days"));
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_is_parse_failure_with_raw() {
        let p = profile(vec![Equipment::Bodyweight]);
        let raw = r#"{"days": [{"day": "Day 1"}]}"#;
        match plan_from_response(raw, &p, 1, None, 1) {
            Err(GenerationError::Parse { raw: carried, .. }) => assert_eq!(carried, raw),
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_gym_exercise_substituted_for_bodyweight_profile() {
        let p = profile(vec![Equipment::Bodyweight]);
        let raw = two_day_json("Barbell Bench Press");
        let plan = plan_from_response(&raw, &p, 1, None, 1).unwrap();
        assert_eq!(plan.days[0].exercises[0].name, "Push-Up");
    }

    #[test]
    fn test_unsubstitutable_day_is_constraint_violation() {
        // Dumbbells-only profile cannot take bodyweight substitutions
        let p = profile(vec![Equipment::Dumbbells]);
        let raw = two_day_json("Cable Fly");
        match plan_from_response(&raw, &p, 1, None, 1) {
            Err(GenerationError::Constraint(_)) => {}
            other => panic!("expected constraint violation, got {other:?}"),
        }
    }

    #[test]
    fn test_implied_equipment_keywords() {
        assert_eq!(implied_equipment("Dumbbell Bench Press"), Equipment::Dumbbells);
        assert_eq!(implied_equipment("Barbell Squat"), Equipment::Gym);
        assert_eq!(implied_equipment("Lat Pulldown"), Equipment::Gym);
        assert_eq!(implied_equipment("Push-Up"), Equipment::Bodyweight);
        assert_eq!(implied_equipment("Plank"), Equipment::Bodyweight);
    }

    #[test]
    fn test_zero_sets_rejected() {
        let p = profile(vec![Equipment::Bodyweight]);
        let raw = r#"{"days": [
            {"day": "Day 1", "focus": "Core", "exercises": [
                {"name": "Plank", "sets": 0, "reps": "30s", "rest_seconds": 30}
            ]},
            {"day": "Day 2", "focus": "Legs", "exercises": [
                {"name": "Bodyweight Squat", "sets": 3, "reps": "12", "rest_seconds": 60}
            ]}
        ]}"#;
        assert!(matches!(
            plan_from_response(raw, &p, 1, None, 1),
            Err(GenerationError::Parse { .. })
        ));
    }
}
