use services::AnswerFeedback;

/// Seconds the per-question feedback stays on screen before advancing.
pub const FEEDBACK_SECS: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenterPhase {
    Unanswered,
    Submitted,
    FeedbackShown,
}

/// Ties a scheduled advance to the question it was armed for.
///
/// The feedback timer fires with a ticket; if the presenter has been reset
/// or torn down since, the ticket no longer matches and the elapse is
/// discarded instead of advancing a stale question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u32,
}

/// Per-question transient state machine:
/// `Unanswered → Submitted → FeedbackShown → (advance)`.
///
/// Owns only its own selection/feedback state, reset on every question
/// change; the parent supplies the next question or terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPresenter {
    phase: PresenterPhase,
    selected: Option<usize>,
    feedback: Option<AnswerFeedback>,
    generation: u32,
}

impl Default for QuestionPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: PresenterPhase::Unanswered,
            selected: None,
            feedback: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> PresenterPhase {
        self.phase
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    /// Record a tentative choice. Allowed only before submission; repeat
    /// calls change the selection.
    pub fn select_choice(&mut self, index: usize) {
        if self.phase == PresenterPhase::Unanswered {
            self.selected = Some(index);
        }
    }

    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.phase == PresenterPhase::Unanswered && self.selected.is_some()
    }

    /// Move to `Submitted`, handing back the choice to grade.
    ///
    /// Returns `None` (and stays put) without a tentative choice.
    pub fn confirm(&mut self) -> Option<usize> {
        if !self.can_confirm() {
            return None;
        }
        self.phase = PresenterPhase::Submitted;
        self.selected
    }

    /// Record the grading result and arm the feedback interval.
    pub fn show_feedback(&mut self, feedback: AnswerFeedback) -> AdvanceTicket {
        self.phase = PresenterPhase::FeedbackShown;
        self.feedback = Some(feedback);
        AdvanceTicket {
            generation: self.generation,
        }
    }

    /// Consume a timer elapse. Returns whether the advance applied; a stale
    /// ticket is discarded.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> bool {
        if self.phase != PresenterPhase::FeedbackShown || ticket.generation != self.generation {
            return false;
        }
        self.reset();
        true
    }

    /// Clear transient state for the next question (or teardown). Any armed
    /// ticket stops matching.
    pub fn reset(&mut self) {
        self.phase = PresenterPhase::Unanswered;
        self.selected = None;
        self.feedback = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{
        AnswerOutcome, CompetencyId, Question, QuestionId, QuestionKind,
    };
    use uuid::Uuid;

    fn feedback(is_correct: bool) -> AnswerFeedback {
        let question = Question::new(
            QuestionId::new(Uuid::from_u128(1)),
            CompetencyId::new(Uuid::from_u128(2)),
            1,
            QuestionKind::Logic,
            "Which conclusion follows?",
            None,
            vec!["a".into(), "b".into()],
            0,
            "because",
            10,
        )
        .unwrap();
        AnswerFeedback {
            question,
            outcome: AnswerOutcome {
                question_id: QuestionId::new(Uuid::from_u128(1)),
                is_correct,
                points_delta: if is_correct { 10 } else { 0 },
                correct_choice: 0,
                is_last: false,
            },
            final_points: None,
        }
    }

    #[test]
    fn selection_can_change_until_confirmed() {
        let mut presenter = QuestionPresenter::new();
        presenter.select_choice(0);
        presenter.select_choice(2);
        assert_eq!(presenter.selected(), Some(2));

        assert_eq!(presenter.confirm(), Some(2));
        assert_eq!(presenter.phase(), PresenterPhase::Submitted);

        // Selection is frozen after submission.
        presenter.select_choice(1);
        assert_eq!(presenter.selected(), Some(2));
    }

    #[test]
    fn confirm_requires_a_tentative_choice() {
        let mut presenter = QuestionPresenter::new();
        assert_eq!(presenter.confirm(), None);
        assert_eq!(presenter.phase(), PresenterPhase::Unanswered);
    }

    #[test]
    fn advance_applies_once_per_feedback() {
        let mut presenter = QuestionPresenter::new();
        presenter.select_choice(0);
        presenter.confirm();
        let ticket = presenter.show_feedback(feedback(true));

        assert!(presenter.advance(ticket));
        assert_eq!(presenter.phase(), PresenterPhase::Unanswered);
        assert!(presenter.feedback().is_none());

        // A second elapse with the same ticket is stale.
        assert!(!presenter.advance(ticket));
    }

    #[test]
    fn reset_between_feedback_and_elapse_discards_the_advance() {
        let mut presenter = QuestionPresenter::new();
        presenter.select_choice(1);
        presenter.confirm();
        let ticket = presenter.show_feedback(feedback(false));

        // Teardown/navigation resets the presenter before the timer fires.
        presenter.reset();
        presenter.select_choice(0);

        assert!(!presenter.advance(ticket));
        assert_eq!(presenter.selected(), Some(0));
        assert_eq!(presenter.phase(), PresenterPhase::Unanswered);
    }

    #[test]
    fn feedback_is_exposed_while_shown() {
        let mut presenter = QuestionPresenter::new();
        presenter.select_choice(0);
        presenter.confirm();
        presenter.show_feedback(feedback(true));

        assert_eq!(presenter.phase(), PresenterPhase::FeedbackShown);
        assert!(presenter.feedback().unwrap().outcome.is_correct);
        assert!(!presenter.can_confirm());
    }
}
