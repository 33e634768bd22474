use chrono::{DateTime, Utc};

use crate::model::ids::{QuestionId, UserId};

/// Append-only log entry capturing one answered question.
///
/// Written once per answer and never read back by the running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub attempts: u32,
    pub completed_at: DateTime<Utc>,
}

impl ProgressEntry {
    #[must_use]
    pub fn new(
        user_id: UserId,
        question_id: QuestionId,
        is_correct: bool,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            question_id,
            is_correct,
            attempts: 1,
            completed_at,
        }
    }
}
