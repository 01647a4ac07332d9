use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

pub fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_max_output_tokens() -> u32 {
    4096
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}

pub fn default_min_exercises_per_day() -> usize {
    1
}

pub fn default_missed_day_streak_threshold() -> u32 {
    2
}
