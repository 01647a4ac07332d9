use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Exercise {
    pub name: String,

    pub sets: u32,

    /// Free-form rep prescription, supports ranges like "8-10"
    pub reps: String,

    pub rest_seconds: u32,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayPlan {
    /// Day label, e.g. "Day 1" or a weekday name
    pub day: String,

    /// Muscle group / training emphasis
    pub focus: String,

    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkoutPlan {
    pub user_id: String,

    pub week: u32,

    pub days: Vec<DayPlan>,

    pub generated_at: DateTime<Utc>,

    /// Human-readable description of the feedback that produced this plan;
    /// None for an initial generation
    #[serde(default)]
    pub context: Option<String>,
}

impl WorkoutPlan {
    /// (completed, total) exercise counts across the whole week
    pub fn exercise_counts(&self) -> (usize, usize) {
        let total = self.days.iter().map(|d| d.exercises.len()).sum();
        let completed = self
            .days
            .iter()
            .flat_map(|d| &d.exercises)
            .filter(|e| e.completed)
            .count();
        (completed, total)
    }

    /// Day lookup is case-insensitive; labels come back from clients verbatim
    pub fn find_day_mut(&mut self, label: &str) -> Option<&mut DayPlan> {
        self.days
            .iter_mut()
            .find(|d| d.day.eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    TooEasy,
    TooHard,
    MissedDay,
}

impl FeedbackType {
    /// Context line stored on the regenerated plan
    pub fn describe(&self) -> &'static str {
        match self {
            FeedbackType::TooEasy => {
                "Regenerated after feedback: previous week was too easy, difficulty increased"
            }
            FeedbackType::TooHard => {
                "Regenerated after feedback: previous week was too hard, difficulty reduced"
            }
            FeedbackType::MissedDay => {
                "Regenerated after feedback: a training day was missed, volume redistributed"
            }
        }
    }
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackType::TooEasy => write!(f, "too_easy"),
            FeedbackType::TooHard => write!(f, "too_hard"),
            FeedbackType::MissedDay => write!(f, "missed_day"),
        }
    }
}

impl std::str::FromStr for FeedbackType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "too_easy" => Ok(FeedbackType::TooEasy),
            "too_hard" => Ok(FeedbackType::TooHard),
            "missed_day" => Ok(FeedbackType::MissedDay),
            _ => Err(ValidationError::UnknownVariant {
                field: "feedback",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> WorkoutPlan {
        WorkoutPlan {
            user_id: "u1".to_string(),
            week: 1,
            days: vec![
                DayPlan {
                    day: "Day 1".to_string(),
                    focus: "Upper Body".to_string(),
                    exercises: vec![
                        Exercise {
                            name: "Push-Up".to_string(),
                            sets: 3,
                            reps: "10-12".to_string(),
                            rest_seconds: 60,
                            notes: None,
                            completed: true,
                        },
                        Exercise {
                            name: "Dumbbell Row".to_string(),
                            sets: 3,
                            reps: "8-10".to_string(),
                            rest_seconds: 90,
                            notes: None,
                            completed: false,
                        },
                    ],
                },
                DayPlan {
                    day: "Day 2".to_string(),
                    focus: "Lower Body".to_string(),
                    exercises: vec![Exercise {
                        name: "Bodyweight Squat".to_string(),
                        sets: 4,
                        reps: "15".to_string(),
                        rest_seconds: 60,
                        notes: None,
                        completed: false,
                    }],
                },
            ],
            generated_at: Utc::now(),
            context: None,
        }
    }

    #[test]
    fn test_exercise_counts() {
        assert_eq!(sample_plan().exercise_counts(), (1, 3));
    }

    #[test]
    fn test_find_day_case_insensitive() {
        let mut plan = sample_plan();
        assert!(plan.find_day_mut("day 1").is_some());
        assert!(plan.find_day_mut("DAY 2").is_some());
        assert!(plan.find_day_mut("Day 3").is_none());
    }

    #[test]
    fn test_feedback_round_trip() {
        for feedback in [
            FeedbackType::TooEasy,
            FeedbackType::TooHard,
            FeedbackType::MissedDay,
        ] {
            let parsed: FeedbackType = feedback.to_string().parse().unwrap();
            assert_eq!(parsed, feedback);
        }
        assert_eq!(
            "too-hard".parse::<FeedbackType>().unwrap(),
            FeedbackType::TooHard
        );
    }
}
