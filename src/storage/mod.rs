use crate::error::StorageError;
use crate::model::{validate_user_id, Profile, Progress, WorkoutPlan};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const USERS_DIR: &str = "users";
const PROFILE_FILE: &str = "profile.json";
const PLANS_FILE: &str = "plans.json";
const PROGRESS_FILE: &str = "progress.json";

/// File-backed store for profiles, plan history and progress, one directory
/// per user. Operations on the same user are serialized through a per-user
/// async lock; operations on different users only share the lock registry.
pub struct Storage {
    data_dir: PathBuf,
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(USERS_DIR).join(user_id)
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        validate_user_id(&profile.user_id)?;
        let lock = self.user_lock(&profile.user_id);
        let _guard = lock.lock().await;

        write_json(&self.user_dir(&profile.user_id).join(PROFILE_FILE), profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, StorageError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let path = self.user_dir(user_id).join(PROFILE_FILE);
        if !path.exists() {
            return Err(StorageError::UserNotFound(user_id.to_string()));
        }
        read_json(&path)
    }

    /// Append to the user's plan history; the appended plan becomes current
    pub async fn save_plan(&self, plan: &WorkoutPlan) -> Result<(), StorageError> {
        validate_user_id(&plan.user_id)?;
        let lock = self.user_lock(&plan.user_id);
        let _guard = lock.lock().await;

        let path = self.user_dir(&plan.user_id).join(PLANS_FILE);
        let mut history: Vec<WorkoutPlan> = if path.exists() {
            read_json(&path)?
        } else {
            Vec::new()
        };
        history.push(plan.clone());
        debug!(user = %plan.user_id, week = plan.week, "saving plan");
        write_json(&path, &history)
    }

    /// Overwrite the current (latest) plan in place, e.g. after a completion
    /// toggle
    pub async fn update_current_plan(&self, plan: &WorkoutPlan) -> Result<(), StorageError> {
        validate_user_id(&plan.user_id)?;
        let lock = self.user_lock(&plan.user_id);
        let _guard = lock.lock().await;

        let path = self.user_dir(&plan.user_id).join(PLANS_FILE);
        if !path.exists() {
            return Err(StorageError::PlanNotFound(plan.user_id.clone()));
        }
        let mut history: Vec<WorkoutPlan> = read_json(&path)?;
        match history.last_mut() {
            Some(current) => *current = plan.clone(),
            None => return Err(StorageError::PlanNotFound(plan.user_id.clone())),
        }
        write_json(&path, &history)
    }

    pub async fn get_current_plan(&self, user_id: &str) -> Result<WorkoutPlan, StorageError> {
        let mut history = self.get_plan_history(user_id).await?;
        history
            .pop()
            .ok_or_else(|| StorageError::PlanNotFound(user_id.to_string()))
    }

    pub async fn get_plan_history(&self, user_id: &str) -> Result<Vec<WorkoutPlan>, StorageError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let dir = self.user_dir(user_id);
        if !dir.exists() {
            return Err(StorageError::UserNotFound(user_id.to_string()));
        }
        let path = dir.join(PLANS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    pub async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        validate_user_id(&progress.user_id)?;
        let lock = self.user_lock(&progress.user_id);
        let _guard = lock.lock().await;

        write_json(
            &self.user_dir(&progress.user_id).join(PROGRESS_FILE),
            progress,
        )
    }

    pub async fn get_progress(&self, user_id: &str) -> Result<Progress, StorageError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let dir = self.user_dir(user_id);
        if !dir.exists() {
            return Err(StorageError::UserNotFound(user_id.to_string()));
        }
        let path = dir.join(PROGRESS_FILE);
        if !path.exists() {
            return Err(StorageError::ProgressNotFound(user_id.to_string()));
        }
        read_json(&path)
    }

    /// Purge profile, plan history and progress for a user
    pub async fn delete_user(&self, user_id: &str) -> Result<(), StorageError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let dir = self.user_dir(user_id);
        if !dir.exists() {
            return Err(StorageError::UserNotFound(user_id.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        debug!(user = %user_id, "deleted all user data");
        Ok(())
    }
}

/// Durable write: serialize, write to a temp sibling, fsync, rename over
/// the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
