use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use quiz_core::model::{Competency, CompetencyId, Profile, ProgressEntry, Question, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by the account/authentication side of the remote store.
///
/// The `Display` text of every variant is shown to the user verbatim; there
/// is no retry or classification layer above this.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    DuplicateAccount,

    /// Remote rejection carrying the backend's own message.
    #[error("{0}")]
    Rejected(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Errors surfaced by collection reads and writes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── IDENTITY ──────────────────────────────────────────────────────────────────
//

/// The authenticated account behind the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Account operations: session lookup plus sign-up/in/out.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Look up an existing authenticated session, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Connection` when the store is unreachable.
    async fn get_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a bad pair, or other
    /// `AuthError` values for remote rejections.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateAccount` when the email is taken, or
    /// other `AuthError` values for remote rejections.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Connection` when the remote call fails; callers
    /// clear local identity regardless.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Profile rows, one per user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by user id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on connection or decode failures.
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Insert a freshly created profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a row already exists for the id.
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Persist the score (and the level derived from it) in one update
    /// keyed by the profile id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when no row matches the id.
    async fn update_score(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// Competency reference data.
#[async_trait]
pub trait CompetencyRepository: Send + Sync {
    /// All competencies, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on connection or decode failures.
    async fn list_competencies(&self) -> Result<Vec<Competency>, StoreError>;
}

/// Question reference data.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions for one competency, ordered by ascending difficulty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on connection or decode failures.
    async fn list_questions(
        &self,
        competency_id: CompetencyId,
    ) -> Result<Vec<Question>, StoreError>;
}

/// Append-only answer log.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Append one progress entry. Never read back by the running session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the insert fails.
    async fn append_progress(&self, entry: &ProgressEntry) -> Result<(), StoreError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

#[derive(Default)]
struct InMemoryState {
    /// email -> (password, user id)
    accounts: HashMap<String, (String, UserId)>,
    session: Option<Identity>,
    profiles: HashMap<UserId, Profile>,
    competencies: Vec<Competency>,
    questions: HashMap<CompetencyId, Vec<Question>>,
    progress: Vec<ProgressEntry>,
}

/// In-memory implementation of every store contract, for tests and the
/// offline demo mode.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Seed a competency row.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned; seed helpers are test/demo glue.
    pub fn seed_competency(&self, competency: Competency) {
        let mut state = self.inner.lock().expect("store lock");
        state.competencies.push(competency);
    }

    /// Seed a question row under its owning competency.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn seed_question(&self, question: Question) {
        let mut state = self.inner.lock().expect("store lock");
        state
            .questions
            .entry(question.competency_id())
            .or_default()
            .push(question);
    }

    /// Snapshot of the progress log, newest last. Test helper.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn progress_entries(&self) -> Vec<ProgressEntry> {
        let state = self.inner.lock().expect("store lock");
        state.progress.clone()
    }

    /// Aggregate this store behind the shared `Store` handle.
    #[must_use]
    pub fn store(&self) -> Store {
        Store {
            auth: Arc::new(self.clone()),
            profiles: Arc::new(self.clone()),
            competencies: Arc::new(self.clone()),
            questions: Arc::new(self.clone()),
            progress: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl AuthClient for InMemoryStore {
    async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        let state = self
            .inner
            .lock()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        Ok(state.session.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        let Some((stored_password, user_id)) = state.accounts.get(email) else {
            return Err(AuthError::InvalidCredentials);
        };
        if stored_password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: *user_id,
            email: email.to_owned(),
        };
        state.session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        if state.accounts.contains_key(email) {
            return Err(AuthError::DuplicateAccount);
        }

        let user_id = UserId::new(Uuid::new_v4());
        state
            .accounts
            .insert(email.to_owned(), (password.to_owned(), user_id));
        let identity = Identity {
            user_id,
            email: email.to_owned(),
        };
        state.session = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        state.session = None;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        let state = self.lock()?;
        Ok(state.profiles.get(&id).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.profiles.contains_key(&profile.id()) {
            return Err(StoreError::Conflict);
        }
        state.profiles.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn update_score(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.profiles.contains_key(&profile.id()) {
            return Err(StoreError::NotFound);
        }
        state.profiles.insert(profile.id(), profile.clone());
        Ok(())
    }
}

#[async_trait]
impl CompetencyRepository for InMemoryStore {
    async fn list_competencies(&self) -> Result<Vec<Competency>, StoreError> {
        let state = self.lock()?;
        let mut competencies = state.competencies.clone();
        competencies.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(competencies)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn list_questions(
        &self,
        competency_id: CompetencyId,
    ) -> Result<Vec<Question>, StoreError> {
        let state = self.lock()?;
        let mut questions = state
            .questions
            .get(&competency_id)
            .cloned()
            .unwrap_or_default();
        questions.sort_by_key(|question| (question.difficulty(), question.id()));
        Ok(questions)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn append_progress(&self, entry: &ProgressEntry) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.progress.push(entry.clone());
        Ok(())
    }
}

//
// ─── STORE AGGREGATE ───────────────────────────────────────────────────────────
//

/// Aggregates the store contracts behind trait objects so backends can swap.
#[derive(Clone)]
pub struct Store {
    pub auth: Arc<dyn AuthClient>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub competencies: Arc<dyn CompetencyRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Store {
    /// Fresh in-memory store, mainly for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        InMemoryStore::new().store()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::CompetencyIcon;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn sign_up_then_sign_in_roundtrip() {
        let mem = InMemoryStore::new();

        let created = mem.sign_up("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(
            mem.get_session().await.unwrap().as_ref(),
            Some(&created)
        );

        mem.sign_out().await.unwrap();
        assert!(mem.get_session().await.unwrap().is_none());

        let returned = mem.sign_in("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(returned.user_id, created.user_id);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let mem = InMemoryStore::new();
        mem.sign_up("ada@example.com", "hunter22").await.unwrap();
        let err = mem.sign_up("ada@example.com", "other").await.unwrap_err();
        assert_eq!(err, AuthError::DuplicateAccount);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let mem = InMemoryStore::new();
        mem.sign_up("ada@example.com", "hunter22").await.unwrap();
        let err = mem.sign_in("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn profile_update_requires_existing_row() {
        let mem = InMemoryStore::new();
        let profile = Profile::new(UserId::new(Uuid::from_u128(5)), None, fixed_now());

        let err = mem.update_score(&profile).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound);

        mem.insert_profile(&profile).await.unwrap();
        let bumped = profile.with_points(30, fixed_now());
        mem.update_score(&bumped).await.unwrap();

        let fetched = mem.get_profile(profile.id()).await.unwrap().unwrap();
        assert_eq!(fetched.total_score(), 30);
    }

    #[tokio::test]
    async fn competencies_come_back_name_ordered() {
        let mem = InMemoryStore::new();
        for (raw, name) in [(2_u128, "Logic"), (1, "Analysis"), (3, "Teamwork")] {
            mem.seed_competency(
                Competency::new(
                    CompetencyId::new(Uuid::from_u128(raw)),
                    name,
                    "",
                    CompetencyIcon::Brain,
                    "#3b82f6",
                )
                .unwrap(),
            );
        }

        let listed = mem.list_competencies().await.unwrap();
        let names: Vec<_> = listed.iter().map(Competency::name).collect();
        assert_eq!(names, vec!["Analysis", "Logic", "Teamwork"]);

        // Re-fetching without writes yields the identical ordered sequence.
        assert_eq!(mem.list_competencies().await.unwrap(), listed);
    }
}
