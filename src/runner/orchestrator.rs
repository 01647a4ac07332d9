use crate::config::Config;
use crate::error::{GenerationError, RunnerError, StorageError};
use crate::generator::{plan_from_response, TextCompletion};
use crate::model::{FeedbackType, Profile, Progress, WorkoutPlan};
use crate::prompt;
use crate::storage::Storage;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::retry::retry_with_backoff;

/// Lifecycle of one generation request. Tagged states instead of ad hoc
/// flags so each transition can be tested on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    PromptBuilt,
    AwaitingGeneration,
    Validated,
    Persisted,
    Failed { reason: String },
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Persisted | Stage::Failed { .. })
    }

    fn allows(&self, next: &Stage) -> bool {
        if matches!(next, Stage::Failed { .. }) {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Stage::Idle, Stage::PromptBuilt)
                | (Stage::PromptBuilt, Stage::AwaitingGeneration)
                | (Stage::AwaitingGeneration, Stage::Validated)
                | (Stage::Validated, Stage::Persisted)
        )
    }
}

#[derive(Debug)]
pub struct GenerationRun {
    user_id: String,
    stage: Stage,
}

impl GenerationRun {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns false and leaves the stage unchanged on an illegal transition
    pub fn advance(&mut self, next: Stage) -> bool {
        if self.stage.allows(&next) {
            debug!(user = %self.user_id, from = ?self.stage, to = ?next, "stage transition");
            self.stage = next;
            true
        } else {
            warn!(user = %self.user_id, from = ?self.stage, to = ?next, "illegal stage transition ignored");
            false
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.advance(Stage::Failed {
            reason: reason.into(),
        });
    }
}

/// Streak state carried into the progress record of a newly persisted plan
#[derive(Debug, Default, Clone, Copy)]
struct StreakCarry {
    streak: u32,
    missed: u32,
}

/// Drives a profile through prompt building, generation, validation and
/// persistence. One request per user at a time.
pub struct Orchestrator {
    storage: Arc<Storage>,
    client: Arc<dyn TextCompletion>,
    config: Config,
    in_flight: Mutex<HashSet<String>>,
}

struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    user_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.user_id);
    }
}

impl Orchestrator {
    pub fn new(storage: Arc<Storage>, client: Arc<dyn TextCompletion>, config: Config) -> Self {
        Self {
            storage,
            client,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// A second request for the same user while one is in flight is
    /// rejected, not queued.
    fn claim(&self, user_id: &str) -> Result<InFlightGuard<'_>, RunnerError> {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !set.insert(user_id.to_string()) {
            return Err(RunnerError::Busy(user_id.to_string()));
        }
        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            user_id: user_id.to_string(),
        })
    }

    /// Generate a plan for the given profile, superseding any stored one.
    /// Week numbering continues from the previous plan when one exists.
    pub async fn generate(&self, profile: &Profile) -> Result<WorkoutPlan, RunnerError> {
        profile.validate()?;
        let _guard = self.claim(&profile.user_id)?;

        self.storage.save_profile(profile).await?;

        let week = match self.storage.get_current_plan(&profile.user_id).await {
            Ok(previous) => previous.week + 1,
            Err(StorageError::PlanNotFound(_)) => 1,
            Err(e) => return Err(e.into()),
        };

        let mut run = GenerationRun::new(&profile.user_id);
        let user_prompt = prompt::build_initial_prompt(profile);
        run.advance(Stage::PromptBuilt);

        let plan = self
            .run_generation(&mut run, profile, &user_prompt, week, None)
            .await?;

        let carry = match self.storage.get_progress(&profile.user_id).await {
            Ok(progress) => StreakCarry {
                streak: progress.current_streak,
                missed: 0,
            },
            Err(StorageError::ProgressNotFound(_)) | Err(StorageError::UserNotFound(_)) => {
                StreakCarry::default()
            }
            Err(e) => return Err(e.into()),
        };

        self.persist(&mut run, &plan, carry).await?;
        info!(user = %profile.user_id, week, "generated plan");
        Ok(plan)
    }

    /// Regenerate the current plan from feedback. All feedback types need a
    /// previous plan for context.
    pub async fn regenerate(
        &self,
        user_id: &str,
        feedback: FeedbackType,
    ) -> Result<WorkoutPlan, RunnerError> {
        let profile = self.storage.get_profile(user_id).await?;
        let _guard = self.claim(user_id)?;

        let previous = match self.storage.get_current_plan(user_id).await {
            Ok(plan) => plan,
            Err(StorageError::PlanNotFound(_)) => {
                return Err(RunnerError::NoPreviousPlan(user_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut run = GenerationRun::new(user_id);
        let user_prompt = prompt::build_regeneration_prompt(&profile, &previous, feedback);
        run.advance(Stage::PromptBuilt);

        let context = Some(feedback.describe().to_string());
        let plan = self
            .run_generation(&mut run, &profile, &user_prompt, previous.week + 1, context)
            .await?;

        let carry = self.streak_after(user_id, feedback).await?;
        self.persist(&mut run, &plan, carry).await?;
        info!(user = %user_id, week = plan.week, %feedback, "regenerated plan");
        Ok(plan)
    }

    /// Call the model (with bounded retries on upstream failures), then
    /// decode and validate. An unparseable response gets exactly one strict
    /// re-prompt before the failure surfaces.
    async fn run_generation(
        &self,
        run: &mut GenerationRun,
        profile: &Profile,
        user_prompt: &str,
        week: u32,
        context: Option<String>,
    ) -> Result<WorkoutPlan, RunnerError> {
        run.advance(Stage::AwaitingGeneration);
        let system = prompt::system_instruction();
        let min_exercises = self.config.plan.min_exercises_per_day;

        let raw = match retry_with_backoff(&self.config.retry, || {
            self.client.complete(system, user_prompt)
        })
        .await
        {
            Ok(raw) => raw,
            Err(e) => {
                run.fail(e.to_string());
                return Err(e.into());
            }
        };

        match plan_from_response(&raw, profile, week, context.clone(), min_exercises) {
            Ok(plan) => {
                run.advance(Stage::Validated);
                Ok(plan)
            }
            Err(GenerationError::Parse { reason, .. }) => {
                warn!(
                    user = %profile.user_id,
                    %reason,
                    "response was not a valid plan; re-prompting once in strict mode"
                );
                let strict_prompt = format!("{user_prompt}\n\n{}", prompt::strict_json_reminder());
                let raw = match retry_with_backoff(&self.config.retry, || {
                    self.client.complete(system, &strict_prompt)
                })
                .await
                {
                    Ok(raw) => raw,
                    Err(e) => {
                        run.fail(e.to_string());
                        return Err(e.into());
                    }
                };
                match plan_from_response(&raw, profile, week, context, min_exercises) {
                    Ok(plan) => {
                        run.advance(Stage::Validated);
                        Ok(plan)
                    }
                    Err(e) => {
                        run.fail(e.to_string());
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                run.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Streak policy: carried through regenerations; reset only after more
    /// than `missed_day_streak_threshold` consecutive missed-day events.
    async fn streak_after(
        &self,
        user_id: &str,
        feedback: FeedbackType,
    ) -> Result<StreakCarry, RunnerError> {
        let (mut streak, mut missed) = match self.storage.get_progress(user_id).await {
            Ok(progress) => (progress.current_streak, progress.consecutive_missed),
            Err(StorageError::ProgressNotFound(_)) | Err(StorageError::UserNotFound(_)) => (0, 0),
            Err(e) => return Err(e.into()),
        };

        if feedback == FeedbackType::MissedDay {
            missed += 1;
            if missed > self.config.plan.missed_day_streak_threshold {
                info!(user = %user_id, missed, "streak reset after repeated missed days");
                streak = 0;
            }
        } else {
            missed = 0;
        }

        Ok(StreakCarry { streak, missed })
    }

    async fn persist(
        &self,
        run: &mut GenerationRun,
        plan: &WorkoutPlan,
        carry: StreakCarry,
    ) -> Result<(), RunnerError> {
        self.storage.save_plan(plan).await?;

        let mut progress = Progress::for_plan(plan);
        progress.current_streak = carry.streak;
        progress.consecutive_missed = carry.missed;
        self.storage.save_progress(&progress).await?;

        run.advance(Stage::Persisted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::model::{Equipment, ExperienceLevel, FitnessGoal};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::Path;

    struct FakeClient {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    }

    impl FakeClient {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
            })
        }
    }

    #[async_trait]
    impl TextCompletion for FakeClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
            self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(GenerationError::Api {
                    status: 500,
                    message: "no scripted reply".to_string(),
                })
            })
        }
    }

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

    fn plan_json(days: u8) -> String {
        let day_objects: Vec<String> = (1..=days)
            .map(|i| {
                format!(
                    r#"{{"day": "Day {i}", "focus": "Full Body", "exercises": [
                        {{"name": "Push-Up", "sets": 3, "reps": "10-12", "rest_seconds": 60}},
                        {{"name": "Dumbbell Row", "sets": 3, "reps": "8-10", "rest_seconds": 90}}
                    ]}}"#
                )
            })
            .collect();
        format!(r#"{{"days": [{}]}}"#, day_objects.join(","))
    }

    fn build(dir: &Path, client: Arc<dyn TextCompletion>) -> (Orchestrator, Arc<Storage>) {
        let mut config = Config::default();
        config.data_dir = dir.to_path_buf();
        config.retry = RetryConfig {
            max_attempts: 2,
            backoff_base_ms: 1,
        };
        let storage = Arc::new(Storage::new(&config.data_dir));
        (Orchestrator::new(storage.clone(), client, config), storage)
    }

    #[tokio::test]
    async fn test_initial_generation_matches_profile() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![Ok(plan_json(4))]);
        let (orchestrator, storage) = build(dir.path(), client);

        let plan = orchestrator.generate(&profile()).await.unwrap();
        assert_eq!(plan.week, 1);
        assert_eq!(plan.days.len(), 4);
        assert!(plan.context.is_none());

        let stored = storage.get_current_plan("u1").await.unwrap();
        assert_eq!(stored.week, 1);

        let progress = storage.get_progress("u1").await.unwrap();
        assert_eq!(progress.week, 1);
        assert_eq!(progress.totals(), (0, 8));
        assert_eq!(progress.current_streak, 0);
    }

    #[tokio::test]
    async fn test_regeneration_increments_week_and_sets_context() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![Ok(plan_json(4)), Ok(plan_json(4))]);
        let (orchestrator, storage) = build(dir.path(), client);

        orchestrator.generate(&profile()).await.unwrap();

        // Mid-week state that the regeneration must not inherit
        let mut progress = storage.get_progress("u1").await.unwrap();
        progress.current_streak = 3;
        progress.days[0].completed = 2;
        storage.save_progress(&progress).await.unwrap();

        let plan = orchestrator
            .regenerate("u1", FeedbackType::TooHard)
            .await
            .unwrap();
        assert_eq!(plan.week, 2);
        assert!(plan.context.as_deref().unwrap().contains("too hard"));

        let progress = storage.get_progress("u1").await.unwrap();
        assert_eq!(progress.week, 2);
        assert_eq!(progress.totals(), (0, 8));
        // Streak survives regeneration
        assert_eq!(progress.current_streak, 3);
    }

    #[tokio::test]
    async fn test_parse_failure_leaves_stored_plan_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![
            Ok(plan_json(4)),
            Ok("sorry, no JSON today".to_string()),
            Ok("still not JSON".to_string()),
        ]);
        let (orchestrator, storage) = build(dir.path(), client);

        orchestrator.generate(&profile()).await.unwrap();
        let result = orchestrator.regenerate("u1", FeedbackType::TooEasy).await;

        assert!(matches!(
            result,
            Err(RunnerError::Generation(GenerationError::Parse { .. }))
        ));
        assert_eq!(storage.get_current_plan("u1").await.unwrap().week, 1);
        assert_eq!(storage.get_progress("u1").await.unwrap().week, 1);
    }

    #[tokio::test]
    async fn test_strict_reprompt_recovers_from_one_bad_response() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![
            Ok("I'd love to help! Here are some thoughts...".to_string()),
            Ok(plan_json(4)),
        ]);
        let (orchestrator, _storage) = build(dir.path(), client);

        let plan = orchestrator.generate(&profile()).await.unwrap();
        assert_eq!(plan.week, 1);
        assert_eq!(plan.days.len(), 4);
    }

    #[tokio::test]
    async fn test_missed_day_streak_reset_beyond_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![
            Ok(plan_json(4)),
            Ok(plan_json(4)),
            Ok(plan_json(4)),
            Ok(plan_json(4)),
        ]);
        let (orchestrator, storage) = build(dir.path(), client);

        orchestrator.generate(&profile()).await.unwrap();
        let mut progress = storage.get_progress("u1").await.unwrap();
        progress.current_streak = 5;
        storage.save_progress(&progress).await.unwrap();

        // Threshold is 2: the first two missed days keep the streak
        orchestrator
            .regenerate("u1", FeedbackType::MissedDay)
            .await
            .unwrap();
        assert_eq!(storage.get_progress("u1").await.unwrap().current_streak, 5);

        orchestrator
            .regenerate("u1", FeedbackType::MissedDay)
            .await
            .unwrap();
        assert_eq!(storage.get_progress("u1").await.unwrap().current_streak, 5);

        // The third consecutive missed day crosses it
        orchestrator
            .regenerate("u1", FeedbackType::MissedDay)
            .await
            .unwrap();
        assert_eq!(storage.get_progress("u1").await.unwrap().current_streak, 0);
    }

    #[tokio::test]
    async fn test_non_missed_feedback_clears_missed_counter() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![Ok(plan_json(4)), Ok(plan_json(4)), Ok(plan_json(4))]);
        let (orchestrator, storage) = build(dir.path(), client);

        orchestrator.generate(&profile()).await.unwrap();
        orchestrator
            .regenerate("u1", FeedbackType::MissedDay)
            .await
            .unwrap();
        assert_eq!(storage.get_progress("u1").await.unwrap().consecutive_missed, 1);

        orchestrator
            .regenerate("u1", FeedbackType::TooEasy)
            .await
            .unwrap();
        assert_eq!(storage.get_progress("u1").await.unwrap().consecutive_missed, 0);
    }

    #[tokio::test]
    async fn test_regenerate_without_plan_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![]);
        let (orchestrator, storage) = build(dir.path(), client);

        storage.save_profile(&profile()).await.unwrap();
        assert!(matches!(
            orchestrator.regenerate("u1", FeedbackType::TooHard).await,
            Err(RunnerError::NoPreviousPlan(_))
        ));
    }

    #[tokio::test]
    async fn test_second_request_for_same_user_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![]);
        let (orchestrator, _storage) = build(dir.path(), client);

        let guard = orchestrator.claim("u1").unwrap();
        assert!(matches!(
            orchestrator.claim("u1"),
            Err(RunnerError::Busy(_))
        ));
        assert!(orchestrator.claim("u2").is_ok());

        drop(guard);
        assert!(orchestrator.claim("u1").is_ok());
    }

    #[test]
    fn test_stage_transitions_follow_the_machine() {
        let mut run = GenerationRun::new("u1");
        assert_eq!(*run.stage(), Stage::Idle);

        // Skipping a stage is not allowed
        assert!(!run.advance(Stage::AwaitingGeneration));
        assert_eq!(*run.stage(), Stage::Idle);

        assert!(run.advance(Stage::PromptBuilt));
        assert!(run.advance(Stage::AwaitingGeneration));
        assert!(run.advance(Stage::Validated));
        assert!(run.advance(Stage::Persisted));
        assert!(run.stage().is_terminal());

        // Terminal states are final
        assert!(!run.advance(Stage::PromptBuilt));
        run.fail("too late");
        assert_eq!(*run.stage(), Stage::Persisted);
    }

    #[test]
    fn test_any_live_stage_can_fail() {
        let mut run = GenerationRun::new("u1");
        run.advance(Stage::PromptBuilt);
        run.advance(Stage::AwaitingGeneration);
        run.fail("upstream went away");
        assert!(matches!(run.stage(), Stage::Failed { .. }));
        assert!(run.stage().is_terminal());
    }
}
