use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Competency, CompetencyId, Profile};
use store::{Identity, Store};

use crate::error::{AuthFlowError, RunnerError};
use crate::runner::QuizRunner;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Top-level screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Unauthenticated,
    MenuLoading,
    Menu,
    InCompetency,
}

/// Owns the authenticated identity, the profile snapshot, and the top-level
/// screen state machine. Every screen transition goes through here; there is
/// no ambient global session state.
#[derive(Clone)]
pub struct SessionController {
    store: Store,
    clock: Clock,
    screen: Screen,
    identity: Option<Identity>,
    profile: Option<Profile>,
    competencies: Vec<Competency>,
    selected: Option<CompetencyId>,
}

impl SessionController {
    #[must_use]
    pub fn new(store: Store, clock: Clock) -> Self {
        Self {
            store,
            clock,
            screen: Screen::Unauthenticated,
            identity: None,
            profile: None,
            competencies: Vec::new(),
            selected: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn competencies(&self) -> &[Competency] {
        &self.competencies
    }

    #[must_use]
    pub fn selected_competency(&self) -> Option<&Competency> {
        let id = self.selected?;
        self.competencies
            .iter()
            .find(|competency| competency.id() == id)
    }

    /// Probe for an existing session at process start.
    ///
    /// A live session goes straight to the menu; anything else (including a
    /// failed probe) lands on the auth screen.
    pub async fn resume(&mut self) {
        match self.store.auth.get_session().await {
            Ok(Some(identity)) => {
                self.identity = Some(identity);
                self.enter_menu().await;
            }
            Ok(None) => self.screen = Screen::Unauthenticated,
            Err(error) => {
                tracing::warn!(%error, "session probe failed");
                self.screen = Screen::Unauthenticated;
            }
        }
    }

    /// Authenticate an existing account and enter the menu.
    ///
    /// # Errors
    ///
    /// Remote failures surface verbatim via `AuthFlowError`; the controller
    /// stays on `Unauthenticated` and nothing retries.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthFlowError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthFlowError::EmptyEmail);
        }

        let identity = self.store.auth.sign_in(email, password).await?;
        self.identity = Some(identity);
        self.enter_menu().await;
        Ok(())
    }

    /// Register a new account, create its profile row (score 0, level 1),
    /// and enter the menu.
    ///
    /// A blank display name falls back to the email local part.
    ///
    /// # Errors
    ///
    /// Remote failures surface verbatim via `AuthFlowError`; the controller
    /// stays on `Unauthenticated` and nothing retries.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<(), AuthFlowError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthFlowError::EmptyEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthFlowError::PasswordTooShort);
        }

        let identity = self.store.auth.sign_up(email, password).await?;

        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .or_else(|| email.split('@').next().map(str::to_owned));
        let profile = Profile::new(identity.user_id, display_name, self.clock.now());
        self.store.profiles.insert_profile(&profile).await?;

        self.identity = Some(identity);
        self.profile = Some(profile);
        self.enter_menu().await;
        Ok(())
    }

    /// Load menu data and land on `Menu`.
    ///
    /// The profile and the competency list are fetched concurrently. Fetch
    /// failures keep whatever data is already local; the transition happens
    /// regardless, so the menu may show stale or partial data.
    pub async fn enter_menu(&mut self) {
        self.screen = Screen::MenuLoading;
        self.selected = None;

        let Some(identity) = self.identity.clone() else {
            self.screen = Screen::Unauthenticated;
            return;
        };

        let (profile, competencies) = tokio::join!(
            self.store.profiles.get_profile(identity.user_id),
            self.store.competencies.list_competencies(),
        );

        match profile {
            Ok(Some(profile)) => self.profile = Some(profile),
            Ok(None) => tracing::warn!(user_id = %identity.user_id, "profile row missing"),
            Err(error) => tracing::warn!(%error, "profile fetch failed, keeping stale data"),
        }
        match competencies {
            Ok(list) => self.competencies = list,
            Err(error) => tracing::warn!(%error, "competency fetch failed, keeping stale data"),
        }

        self.screen = Screen::Menu;
    }

    /// Enter a competency. The quiz screen builds its runner via
    /// [`SessionController::start_runner`].
    pub fn select_competency(&mut self, id: CompetencyId) {
        if self.screen == Screen::Menu {
            self.selected = Some(id);
            self.screen = Screen::InCompetency;
        }
    }

    /// Construct a fresh runner for the selected competency.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotSignedIn` / `RunnerError::NoSelection` when
    /// called outside an active competency, and propagates start failures
    /// (including the empty-competency terminal).
    pub async fn start_runner(&self) -> Result<QuizRunner, RunnerError> {
        let identity = self.identity.as_ref().ok_or(RunnerError::NotSignedIn)?;
        let competency_id = self.selected.ok_or(RunnerError::NoSelection)?;

        QuizRunner::start(
            self.clock,
            Arc::clone(&self.store.questions),
            Arc::clone(&self.store.progress),
            identity.user_id,
            competency_id,
        )
        .await
    }

    /// Apply earned points to the profile and return to the menu.
    ///
    /// The new score and its derived level are persisted in one update keyed
    /// by the profile id. On failure the local snapshot is left unchanged
    /// and the points are lost; nothing retries.
    pub async fn finish_competency(&mut self, points: u32) {
        if let Some(profile) = self.profile.clone() {
            let updated = profile.with_points(points, self.clock.now());
            match self.store.profiles.update_score(&updated).await {
                Ok(()) => self.profile = Some(updated),
                Err(error) => {
                    tracing::warn!(%error, points, "score update failed; points lost");
                }
            }
        }
        self.enter_menu().await;
    }

    /// Leave a competency without applying points.
    pub async fn back_to_menu(&mut self) {
        self.enter_menu().await;
    }

    /// End the session. The transition to `Unauthenticated` is unconditional
    /// even when the remote call fails.
    pub async fn sign_out(&mut self) {
        if let Err(error) = self.store.auth.sign_out().await {
            tracing::warn!(%error, "remote sign-out failed");
        }
        self.identity = None;
        self.profile = None;
        self.competencies.clear();
        self.selected = None;
        self.screen = Screen::Unauthenticated;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
