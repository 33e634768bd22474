use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{CompetencyId, QuestionId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors emitted by the in-memory quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for this competency")]
    Empty,

    #[error("quiz already completed")]
    Completed,

    #[error("answer choice {index} out of range for {len} choices")]
    ChoiceOutOfRange { index: usize, len: usize },
}

//
// ─── TALLY & PROGRESS ──────────────────────────────────────────────────────────
//

/// Running tally for one quiz attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizTally {
    pub correct: u32,
    pub answered: u32,
    pub points: u32,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// Outcome of answering a single question, returned for immediate feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub is_correct: bool,
    /// Points awarded for this answer: the question's value when correct, 0
    /// otherwise.
    pub points_delta: u32,
    pub correct_choice: usize,
    /// Set when this answer completed the quiz.
    pub is_last: bool,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory state for one traversal of a competency's questions.
///
/// Holds the question list snapshot taken at load time and steps through it
/// in order, accumulating correct answers and earned points. Discarded when
/// the user returns to the menu.
pub struct QuizSession {
    competency_id: CompetencyId,
    questions: Vec<Question>,
    current: usize,
    tally: QuizTally,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over a question snapshot already ordered by
    /// ascending difficulty.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when no questions are provided, so callers
    /// can route to the empty-state screen instead of the results screen.
    pub fn new(
        competency_id: CompetencyId,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            competency_id,
            questions,
            current: 0,
            tally: QuizTally::default(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn competency_id(&self) -> CompetencyId {
        self.competency_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn tally(&self) -> QuizTally {
        self.tally
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.tally.answered as usize
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.tally.correct
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.tally.points
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Zero-based position of the question currently presented.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.total_questions().saturating_sub(self.answered_count()),
            is_complete: self.is_complete(),
        }
    }

    /// Fraction of answered questions that were correct; `0.0` before any
    /// answer.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.tally.answered == 0 {
            return 0.0;
        }
        f64::from(self.tally.correct) / f64::from(self.tally.answered)
    }

    /// Grade `choice` against the current question and advance.
    ///
    /// The final answer sets the completion flag instead of advancing; the
    /// returned outcome carries `is_last` so the caller can report the point
    /// total upward.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` when the session is already finished
    /// and `QuizError::ChoiceOutOfRange` for an unaddressable choice index.
    pub fn submit_answer(
        &mut self,
        choice: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, QuizError> {
        if self.is_complete() {
            return Err(QuizError::Completed);
        }

        let question = &self.questions[self.current];
        let len = question.choices().len();
        if choice >= len {
            return Err(QuizError::ChoiceOutOfRange { index: choice, len });
        }

        let is_correct = question.is_correct(choice);
        let points_delta = if is_correct { question.points() } else { 0 };

        self.tally.answered += 1;
        if is_correct {
            self.tally.correct += 1;
            self.tally.points = self.tally.points.saturating_add(points_delta);
        }

        let is_last = self.current + 1 >= self.questions.len();
        let outcome = AnswerOutcome {
            question_id: question.id(),
            is_correct,
            points_delta,
            correct_choice: question.correct_choice(),
            is_last,
        };

        if is_last {
            self.completed_at = Some(answered_at);
        } else {
            self.current += 1;
        }

        Ok(outcome)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("competency_id", &self.competency_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("tally", &self.tally)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;
    use crate::time::fixed_now;
    use uuid::Uuid;

    fn competency_id() -> CompetencyId {
        CompetencyId::new(Uuid::from_u128(9))
    }

    fn build_question(id: u128, correct: usize, points: u32) -> Question {
        Question::new(
            QuestionId::new(Uuid::from_u128(id)),
            competency_id(),
            1,
            QuestionKind::Logic,
            format!("Question {id}"),
            None,
            vec!["a".into(), "b".into(), "c".into()],
            correct,
            "because",
            points,
        )
        .unwrap()
    }

    fn build_session(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(competency_id(), questions, fixed_now()).unwrap()
    }

    #[test]
    fn empty_snapshot_is_a_distinct_error() {
        let err = QuizSession::new(competency_id(), Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn tally_matches_reference_scenario() {
        // correct(10) + incorrect(20) + correct(15) => 2 correct, 25 points.
        let mut session = build_session(vec![
            build_question(1, 0, 10),
            build_question(2, 0, 20),
            build_question(3, 1, 15),
        ]);
        let now = fixed_now();

        let first = session.submit_answer(0, now).unwrap();
        assert!(first.is_correct);
        assert_eq!(first.points_delta, 10);
        assert!(!first.is_last);

        let second = session.submit_answer(2, now).unwrap();
        assert!(!second.is_correct);
        assert_eq!(second.points_delta, 0);

        let third = session.submit_answer(1, now).unwrap();
        assert!(third.is_correct);
        assert!(third.is_last);

        assert_eq!(session.correct_count(), 2);
        assert_eq!(session.answered_count(), 3);
        assert_eq!(session.points_earned(), 25);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(now));
    }

    #[test]
    fn answered_count_tracks_current_index_until_completion() {
        let mut session = build_session(vec![
            build_question(1, 0, 5),
            build_question(2, 0, 5),
            build_question(3, 0, 5),
        ]);

        assert_eq!(session.answered_count(), session.current_index());
        session.submit_answer(0, fixed_now()).unwrap();
        assert_eq!(session.answered_count(), session.current_index());
        session.submit_answer(1, fixed_now()).unwrap();
        assert_eq!(session.answered_count(), session.current_index());
        session.submit_answer(0, fixed_now()).unwrap();
        assert_eq!(session.answered_count(), session.total_questions());
        assert!(session.current_index() < session.total_questions());
    }

    #[test]
    fn submitting_after_completion_is_guarded() {
        let mut session = build_session(vec![build_question(1, 0, 5)]);
        session.submit_answer(0, fixed_now()).unwrap();

        let err = session.submit_answer(0, fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::Completed);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn out_of_range_choice_is_rejected_without_advancing() {
        let mut session = build_session(vec![build_question(1, 0, 5)]);

        let err = session.submit_answer(7, fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::ChoiceOutOfRange { index: 7, len: 3 });
        assert_eq!(session.answered_count(), 0);
        assert!(!session.is_complete());
    }

    #[test]
    fn accuracy_guards_division_by_zero() {
        let session = build_session(vec![build_question(1, 0, 5)]);
        assert_eq!(session.accuracy(), 0.0);
    }

    #[test]
    fn accuracy_reflects_correct_ratio() {
        let mut session = build_session(vec![
            build_question(1, 0, 10),
            build_question(2, 0, 10),
            build_question(3, 0, 10),
        ]);
        let now = fixed_now();
        session.submit_answer(0, now).unwrap();
        session.submit_answer(1, now).unwrap();
        session.submit_answer(0, now).unwrap();

        assert!((session.accuracy() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn current_question_is_none_once_complete() {
        let mut session = build_session(vec![build_question(1, 0, 5)]);
        assert!(session.current_question().is_some());
        session.submit_answer(0, fixed_now()).unwrap();
        assert!(session.current_question().is_none());
    }

    #[test]
    fn progress_view_tracks_session() {
        let mut session = build_session(vec![build_question(1, 0, 5), build_question(2, 0, 5)]);
        assert_eq!(
            session.progress(),
            QuizProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                is_complete: false,
            }
        );
        session.submit_answer(0, fixed_now()).unwrap();
        session.submit_answer(0, fixed_now()).unwrap();
        assert_eq!(
            session.progress(),
            QuizProgress {
                total: 2,
                answered: 2,
                remaining: 0,
                is_complete: true,
            }
        );
    }
}
