use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

const AGE_RANGE: (i64, i64) = (13, 120);
const SESSION_MINUTES_RANGE: (i64, i64) = (15, 180);
const DAYS_PER_WEEK_RANGE: (i64, i64) = (3, 6);
const MAX_USER_ID_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    FatLoss,
    MuscleGain,
    GeneralFitness,
}

impl std::fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitnessGoal::FatLoss => write!(f, "fat_loss"),
            FitnessGoal::MuscleGain => write!(f, "muscle_gain"),
            FitnessGoal::GeneralFitness => write!(f, "general_fitness"),
        }
    }
}

impl std::str::FromStr for FitnessGoal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fat_loss" => Ok(FitnessGoal::FatLoss),
            "muscle_gain" => Ok(FitnessGoal::MuscleGain),
            "general_fitness" => Ok(FitnessGoal::GeneralFitness),
            _ => Err(ValidationError::UnknownVariant {
                field: "goal",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(ValidationError::UnknownVariant {
                field: "experience",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    Bodyweight,
    Dumbbells,
    Gym,
}

impl std::fmt::Display for Equipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Equipment::Bodyweight => write!(f, "bodyweight"),
            Equipment::Dumbbells => write!(f, "dumbbells"),
            Equipment::Gym => write!(f, "gym"),
        }
    }
}

impl std::str::FromStr for Equipment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bodyweight" => Ok(Equipment::Bodyweight),
            "dumbbells" | "dumbbell" => Ok(Equipment::Dumbbells),
            "gym" => Ok(Equipment::Gym),
            _ => Err(ValidationError::UnknownVariant {
                field: "equipment",
                value: s.to_string(),
            }),
        }
    }
}

/// Validated user fitness attributes driving generation constraints.
/// Immutable from the core's point of view; a new profile supersedes
/// the stored one on the next generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub user_id: String,

    pub age: u32,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub height_cm: Option<u32>,

    #[serde(default)]
    pub weight_kg: Option<f64>,

    pub goal: FitnessGoal,

    pub experience: ExperienceLevel,

    pub equipment: Vec<Equipment>,

    pub session_minutes: u32,

    pub days_per_week: u8,
}

impl Profile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_user_id(&self.user_id)?;

        check_range("age", i64::from(self.age), AGE_RANGE)?;
        check_range(
            "session_minutes",
            i64::from(self.session_minutes),
            SESSION_MINUTES_RANGE,
        )?;
        check_range(
            "days_per_week",
            i64::from(self.days_per_week),
            DAYS_PER_WEEK_RANGE,
        )?;

        if self.equipment.is_empty() {
            return Err(ValidationError::NoEquipment);
        }

        Ok(())
    }

    pub fn has_equipment(&self, equipment: Equipment) -> bool {
        self.equipment.contains(&equipment)
    }
}

fn check_range(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// User ids become directory names under the data dir, so the charset is
/// restricted up front rather than sanitized later.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidUserId(user_id.to_string()))
    }
}
