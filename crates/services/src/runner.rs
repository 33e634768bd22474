use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use quiz_core::Clock;
use quiz_core::model::{
    AnswerOutcome, CompetencyId, ProgressEntry, Question, QuizProgress, QuizSession, UserId,
};
use store::{ProgressRepository, QuestionRepository};

use crate::error::RunnerError;

/// Feedback handed to the presentation layer after one answer.
///
/// Carries the answered question itself: the session has already advanced,
/// but the feedback interval still renders the question's prompt, choices,
/// and explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question: Question,
    pub outcome: AnswerOutcome,
    /// Total points for the attempt, present once the final answer lands.
    /// The caller reports this to the session controller.
    pub final_points: Option<u32>,
}

/// Drives one user's traversal of a competency's questions.
///
/// Owns the in-memory quiz session and the write-behind progress log. A
/// runner is constructed fresh per competency attempt and discarded when the
/// user returns to the menu.
pub struct QuizRunner {
    user_id: UserId,
    clock: Clock,
    session: QuizSession,
    progress: Arc<dyn ProgressRepository>,
    pending_writes: Vec<JoinHandle<()>>,
}

impl QuizRunner {
    /// Fetch the competency's questions (difficulty ascending) and open a
    /// session over the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Quiz(QuizError::Empty)` when the competency has
    /// no questions (the caller routes that to the empty-state screen, never
    /// the results screen), or `RunnerError::Store` when the fetch fails.
    pub async fn start(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        progress: Arc<dyn ProgressRepository>,
        user_id: UserId,
        competency_id: CompetencyId,
    ) -> Result<Self, RunnerError> {
        let snapshot = questions.list_questions(competency_id).await?;
        let session = QuizSession::new(competency_id, snapshot, clock.now())?;

        Ok(Self {
            user_id,
            clock,
            session,
            progress,
            pending_writes: Vec::new(),
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.session.progress()
    }

    /// Grade the current question, log the attempt, and advance.
    ///
    /// The progress insert is spawned and never awaited: a failed write is
    /// warn-logged and the user keeps moving. Writes are issued in question
    /// order but nothing guarantees they land in that order.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Quiz` for a completed session or an
    /// out-of-range choice.
    pub fn submit_answer(&mut self, choice: usize) -> Result<AnswerFeedback, RunnerError> {
        let answered_at = self.clock.now();
        let question = self
            .session
            .current_question()
            .cloned()
            .ok_or(quiz_core::model::QuizError::Completed)?;

        let outcome = self.session.submit_answer(choice, answered_at)?;

        let entry = ProgressEntry::new(
            self.user_id,
            outcome.question_id,
            outcome.is_correct,
            answered_at,
        );
        let progress = Arc::clone(&self.progress);
        let handle = tokio::spawn(async move {
            if let Err(error) = progress.append_progress(&entry).await {
                tracing::warn!(%error, question_id = %entry.question_id, "progress write dropped");
            }
        });
        self.pending_writes.push(handle);

        let final_points = outcome.is_last.then(|| self.session.points_earned());
        Ok(AnswerFeedback {
            question,
            outcome,
            final_points,
        })
    }

    /// Await any in-flight progress writes. Best effort; used by tests and
    /// teardown, never on the answer path.
    pub async fn drain_progress_writes(&mut self) {
        for handle in self.pending_writes.drain(..) {
            let _ = handle.await;
        }
    }
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("user_id", &self.user_id)
            .field("session", &self.session)
            .field("pending_writes", &self.pending_writes.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
