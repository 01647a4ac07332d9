use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Root directory for per-user profiles, plan history and progress
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub plan: PlanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Wall-clock bound on a single generation call
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            timeout_sec: default_timeout_sec(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PlanConfig {
    /// Floor below which a generated day is rejected outright
    #[serde(default = "default_min_exercises_per_day")]
    pub min_exercises_per_day: usize,

    /// Consecutive missed_day regenerations tolerated before the streak resets
    #[serde(default = "default_missed_day_streak_threshold")]
    pub missed_day_streak_threshold: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            min_exercises_per_day: default_min_exercises_per_day(),
            missed_day_streak_threshold: default_missed_day_streak_threshold(),
        }
    }
}
