use quiz_core::model::QuizSession;

/// Results card shown after the last answer's feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub correct: u32,
    pub total: usize,
    pub points: u32,
    pub accuracy_pct: u8,
}

#[must_use]
pub fn map_results(session: &QuizSession) -> ResultsVm {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let accuracy_pct = (session.accuracy() * 100.0).round() as u8;
    ResultsVm {
        correct: session.correct_count(),
        total: session.total_questions(),
        points: session.points_earned(),
        accuracy_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CompetencyId, Question, QuestionId, QuestionKind, QuizSession};
    use quiz_core::time::fixed_now;
    use uuid::Uuid;

    #[test]
    fn results_round_accuracy_to_whole_percent() {
        let competency_id = CompetencyId::new(Uuid::from_u128(1));
        let questions: Vec<_> = (0..3)
            .map(|raw| {
                Question::new(
                    QuestionId::new(Uuid::from_u128(raw)),
                    competency_id,
                    1,
                    QuestionKind::Logic,
                    format!("Q{raw}"),
                    None,
                    vec!["a".into(), "b".into()],
                    0,
                    "",
                    10,
                )
                .unwrap()
            })
            .collect();
        let mut session = QuizSession::new(competency_id, questions, fixed_now()).unwrap();
        session.submit_answer(0, fixed_now()).unwrap();
        session.submit_answer(1, fixed_now()).unwrap();
        session.submit_answer(0, fixed_now()).unwrap();

        let results = map_results(&session);
        assert_eq!(results.correct, 2);
        assert_eq!(results.total, 3);
        assert_eq!(results.points, 20);
        assert_eq!(results.accuracy_pct, 67);
    }
}
