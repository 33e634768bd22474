use std::time::Duration;

use dioxus::prelude::*;

use quiz_core::model::{PatternCell, Question, QuizError, Shape, VisualAid};
use services::{AnswerFeedback, QuizRunner, RunnerError, SessionController};

use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{FEEDBACK_SECS, PresenterPhase, QuestionPresenter, ResultsVm, map_results};

/// One competency attempt: question traversal, timed feedback, results.
#[component]
pub fn QuizView() -> Element {
    let controller = use_context::<Signal<SessionController>>();
    let runner = use_signal(|| None::<QuizRunner>);
    let presenter = use_signal(QuestionPresenter::new);
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let mut runner = runner;
        let mut presenter = presenter;
        async move {
            let ctl = controller.peek().clone();
            match ctl.start_runner().await {
                Ok(started) => {
                    runner.set(Some(started));
                    presenter.write().reset();
                    Ok(())
                }
                Err(RunnerError::Quiz(QuizError::Empty)) => Err(ViewError::EmptyQuiz),
                Err(_) => Err(ViewError::Unknown),
            }
        }
    });
    let state = view_state_from_resource(resource);

    let on_back = use_callback(move |()| {
        let mut controller = controller;
        spawn(async move {
            let mut ctl = controller.peek().clone();
            ctl.back_to_menu().await;
            controller.set(ctl);
        });
    });

    let on_finish = use_callback(move |points: u32| {
        let mut controller = controller;
        spawn(async move {
            let mut ctl = controller.peek().clone();
            ctl.finish_competency(points).await;
            controller.set(ctl);
        });
    });

    let on_select = use_callback(move |index: usize| {
        let mut presenter = presenter;
        presenter.write().select_choice(index);
    });

    let on_confirm = use_callback(move |()| {
        let mut runner = runner;
        let mut presenter = presenter;
        let mut error = error;

        let Some(choice) = presenter.write().confirm() else {
            return;
        };

        let feedback = {
            let mut guard = runner.write();
            match guard.as_mut().map(|r| r.submit_answer(choice)) {
                Some(Ok(feedback)) => feedback,
                Some(Err(_)) | None => {
                    presenter.write().reset();
                    error.set(Some(ViewError::Unknown));
                    return;
                }
            }
        };

        let ticket = presenter.write().show_feedback(feedback);
        // The task dies with this scope; a reset bumps the ticket generation,
        // so a late elapse can never advance a stale question.
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(FEEDBACK_SECS)).await;
            if let Ok(mut guard) = presenter.try_write() {
                guard.advance(ticket);
            }
        });
    });

    let (competency_name, competency_color) = {
        let ctl = controller.read();
        ctl.selected_competency().map_or_else(
            || (String::new(), "#2563eb".to_owned()),
            |competency| (competency.name().to_owned(), competency.color().to_owned()),
        )
    };

    let (current_question, answered, total, results) = {
        let guard = runner.read();
        match guard.as_ref() {
            Some(r) => {
                let progress = r.progress();
                (
                    r.current_question().cloned(),
                    progress.answered,
                    progress.total,
                    progress.is_complete.then(|| map_results(r.session())),
                )
            }
            None => (None, 0, 0, None),
        }
    };
    let phase = presenter.read().phase();
    let selected = presenter.read().selected();
    let feedback = presenter.read().feedback().cloned();
    let view_error = *error.read();

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                button {
                    class: "btn btn-ghost",
                    id: "quiz-back",
                    r#type: "button",
                    onclick: move |_| on_back.call(()),
                    "← Back"
                }
                h2 { "{competency_name}" }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "quiz-loading", "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "quiz-empty",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_back.call(()),
                            "Back to Menu"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = view_error {
                        p { class: "quiz-error", "{err.message()}" }
                    }
                    if phase == PresenterPhase::FeedbackShown {
                        if let Some(feedback) = feedback {
                            QuestionPanel {
                                question: feedback.question.clone(),
                                number: answered,
                                total,
                                color: competency_color.clone(),
                                selected,
                                feedback: Some(feedback),
                                can_confirm: false,
                                on_select,
                                on_confirm,
                            }
                        }
                    } else if let Some(results) = results {
                        ResultsCard {
                            results,
                            color: competency_color.clone(),
                            competency_name: competency_name.clone(),
                            on_finish,
                        }
                    } else if let Some(question) = current_question {
                        QuestionPanel {
                            question,
                            number: answered + 1,
                            total,
                            color: competency_color.clone(),
                            selected,
                            feedback: None,
                            can_confirm: selected.is_some(),
                            on_select,
                            on_confirm,
                        }
                    }
                },
            }
        }
    }
}

//
// ─── QUESTION PANEL ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
struct ChoiceVm {
    index: usize,
    letter: char,
    text: String,
    class: &'static str,
}

fn choice_views(
    question: &Question,
    selected: Option<usize>,
    feedback: Option<&AnswerFeedback>,
) -> Vec<ChoiceVm> {
    question
        .choices()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let class = match feedback {
                Some(feedback) => {
                    if index == feedback.outcome.correct_choice {
                        "choice choice--correct"
                    } else if selected == Some(index) && !feedback.outcome.is_correct {
                        "choice choice--incorrect"
                    } else {
                        "choice choice--muted"
                    }
                }
                None => {
                    if selected == Some(index) {
                        "choice choice--selected"
                    } else {
                        "choice"
                    }
                }
            };
            #[allow(clippy::cast_possible_truncation)]
            let letter = (b'A' + index as u8) as char;
            ChoiceVm {
                index,
                letter,
                text: text.clone(),
                class,
            }
        })
        .collect()
}

#[component]
fn QuestionPanel(
    question: Question,
    number: usize,
    total: usize,
    color: String,
    selected: Option<usize>,
    feedback: Option<AnswerFeedback>,
    can_confirm: bool,
    on_select: EventHandler<usize>,
    on_confirm: EventHandler<()>,
) -> Element {
    let choices = choice_views(&question, selected, feedback.as_ref());
    let progress_pct = if total == 0 { 0 } else { number * 100 / total };
    let in_feedback = feedback.is_some();

    rsx! {
        div { class: "question-panel",
            div { class: "question-panel__meta",
                span { class: "question-panel__number", style: "color: {color};", "{number}" }
                p { "Question {number} of {total}" }
                span { class: "question-panel__difficulty", "Difficulty {question.difficulty()}" }
            }
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {progress_pct}%; background-color: {color};",
                }
            }

            h3 { class: "question-panel__prompt", "{question.prompt()}" }

            if let Some(visual) = question.visual() {
                VisualAidView { visual: visual.clone() }
            }

            div { class: "choice-grid",
                for choice in choices {
                    button {
                        class: "{choice.class}",
                        r#type: "button",
                        disabled: in_feedback,
                        onclick: {
                            let index = choice.index;
                            move |_| on_select.call(index)
                        },
                        span { class: "choice__letter", "{choice.letter}." }
                        "{choice.text}"
                    }
                }
            }

            if let Some(feedback) = feedback {
                div {
                    class: if feedback.outcome.is_correct { "feedback feedback--correct" } else { "feedback feedback--incorrect" },
                    if feedback.outcome.is_correct {
                        p { class: "feedback__headline", "Correct! +{feedback.outcome.points_delta} points" }
                    } else {
                        p { class: "feedback__headline", "Incorrect" }
                    }
                    p { class: "feedback__explanation", "{feedback.question.explanation()}" }
                }
            } else {
                div { class: "question-panel__actions",
                    button {
                        class: "btn btn-primary",
                        id: "quiz-confirm",
                        r#type: "button",
                        disabled: !can_confirm,
                        onclick: move |_| on_confirm.call(()),
                        "Confirm Answer"
                    }
                }
            }
        }
    }
}

//
// ─── VISUAL AID ────────────────────────────────────────────────────────────────
//

fn shape_glyph(shape: Shape) -> &'static str {
    match shape {
        Shape::Circle => "●",
        Shape::Square => "■",
        Shape::Triangle => "▲",
    }
}

#[component]
fn VisualAidView(visual: VisualAid) -> Element {
    match visual {
        VisualAid::Pattern(cells) => {
            let rendered: Vec<(String, &'static str)> = cells
                .iter()
                .map(|cell| match cell {
                    PatternCell::Glyph { shape, color } => (
                        format!("pattern-cell color--{}", color.identifier()),
                        shape_glyph(*shape),
                    ),
                    PatternCell::Blank => ("pattern-cell pattern-cell--blank".to_owned(), "?"),
                })
                .collect();
            rsx! {
                div { class: "visual visual--pattern",
                    for (class, glyph) in rendered {
                        span { class: "{class}", "{glyph}" }
                    }
                }
            }
        }
        VisualAid::Sequence(numbers) => rsx! {
            div { class: "visual visual--sequence",
                for value in numbers {
                    span { class: "sequence-cell", "{value}" }
                }
                span { class: "sequence-cell sequence-cell--blank", "?" }
            }
        },
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

#[component]
fn ResultsCard(
    results: ResultsVm,
    color: String,
    competency_name: String,
    on_finish: EventHandler<u32>,
) -> Element {
    let points = results.points;
    rsx! {
        div { class: "results-card",
            span { class: "results-card__trophy", "🏆" }
            h3 { "Completed!" }
            p { class: "results-card__competency", "{competency_name}" }

            div { class: "results-card__stats",
                div { class: "stat",
                    span { class: "stat__value", "{results.correct}" }
                    span { class: "stat__label", "Correct" }
                }
                div { class: "stat",
                    span { class: "stat__value", style: "color: {color};", "{results.points}" }
                    span { class: "stat__label", "Points" }
                }
            }

            div { class: "results-card__accuracy",
                span { "Accuracy" }
                span { class: "results-card__pct", "{results.accuracy_pct}%" }
            }
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {results.accuracy_pct}%; background-color: {color};",
                }
            }

            button {
                class: "btn btn-primary",
                id: "quiz-continue",
                r#type: "button",
                onclick: move |_| on_finish.call(points),
                "Continue"
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CompetencyId, QuestionId, QuestionKind};
    use uuid::Uuid;

    fn build_question() -> Question {
        Question::new(
            QuestionId::new(Uuid::from_u128(1)),
            CompetencyId::new(Uuid::from_u128(2)),
            1,
            QuestionKind::Logic,
            "Pick b",
            None,
            vec!["a".into(), "b".into(), "c".into()],
            1,
            "because",
            10,
        )
        .unwrap()
    }

    fn build_feedback(selected: usize) -> AnswerFeedback {
        let question = build_question();
        let is_correct = question.is_correct(selected);
        AnswerFeedback {
            outcome: quiz_core::model::AnswerOutcome {
                question_id: question.id(),
                is_correct,
                points_delta: if is_correct { question.points() } else { 0 },
                correct_choice: question.correct_choice(),
                is_last: false,
            },
            question,
            final_points: None,
        }
    }

    #[test]
    fn choices_highlight_selection_before_feedback() {
        let question = build_question();
        let views = choice_views(&question, Some(2), None);
        assert_eq!(views[2].class, "choice choice--selected");
        assert_eq!(views[0].class, "choice");
        assert_eq!(views[0].letter, 'A');
        assert_eq!(views[2].letter, 'C');
    }

    #[test]
    fn feedback_marks_correct_and_wrong_choices() {
        let question = build_question();
        let feedback = build_feedback(0);
        let views = choice_views(&question, Some(0), Some(&feedback));
        assert_eq!(views[1].class, "choice choice--correct");
        assert_eq!(views[0].class, "choice choice--incorrect");
        assert_eq!(views[2].class, "choice choice--muted");
    }

    #[test]
    fn correct_feedback_mutes_everything_but_the_answer() {
        let question = build_question();
        let feedback = build_feedback(1);
        let views = choice_views(&question, Some(1), Some(&feedback));
        assert_eq!(views[1].class, "choice choice--correct");
        assert_eq!(views[0].class, "choice choice--muted");
        assert_eq!(views[2].class, "choice choice--muted");
    }
}
