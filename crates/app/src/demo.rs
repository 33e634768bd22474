//! Seed data for the offline demo store (`--demo`).

use uuid::Uuid;

use quiz_core::model::{
    Competency, CompetencyIcon, CompetencyId, PatternCell, Question, QuestionId, QuestionKind,
    Shape, ShapeColor, VisualAid,
};
use store::InMemoryStore;

fn competency(raw: u128, name: &str, description: &str, icon: CompetencyIcon, color: &str) -> Competency {
    Competency::new(CompetencyId::new(Uuid::from_u128(raw)), name, description, icon, color)
        .expect("demo competency is valid")
}

#[allow(clippy::too_many_arguments)]
fn question(
    raw: u128,
    competency: &Competency,
    difficulty: u32,
    kind: QuestionKind,
    prompt: &str,
    visual: Option<VisualAid>,
    choices: &[&str],
    correct: usize,
    explanation: &str,
    points: u32,
) -> Question {
    Question::new(
        QuestionId::new(Uuid::from_u128(raw)),
        competency.id(),
        difficulty,
        kind,
        prompt,
        visual,
        choices.iter().map(|choice| (*choice).to_owned()).collect(),
        correct,
        explanation,
        points,
    )
    .expect("demo question is valid")
}

fn glyph(shape: Shape, color: ShapeColor) -> PatternCell {
    PatternCell::Glyph { shape, color }
}

/// Populate the in-memory store with a small, self-contained question bank.
pub fn seed_demo(store: &InMemoryStore) {
    let logic = competency(
        1,
        "Logical Reasoning",
        "Deduce, infer, and spot what follows",
        CompetencyIcon::Puzzle,
        "#8b5cf6",
    );
    let analysis = competency(
        2,
        "Analytical Thinking",
        "Break problems down and find the rule",
        CompetencyIcon::BarChart,
        "#f59e0b",
    );
    let communication = competency(
        3,
        "Communication",
        "Choose the word that carries the meaning",
        CompetencyIcon::MessageCircle,
        "#10b981",
    );

    store.seed_question(question(
        101,
        &logic,
        1,
        QuestionKind::Pattern,
        "Which shape completes the pattern?",
        Some(VisualAid::Pattern(vec![
            glyph(Shape::Circle, ShapeColor::Blue),
            glyph(Shape::Square, ShapeColor::Red),
            glyph(Shape::Circle, ShapeColor::Blue),
            PatternCell::Blank,
        ])),
        &["Circle", "Square", "Triangle"],
        1,
        "The pattern alternates circle and square, so a square comes next.",
        10,
    ));
    store.seed_question(question(
        102,
        &logic,
        2,
        QuestionKind::Logic,
        "All engineers drink coffee. Dana drinks coffee. What follows?",
        None,
        &[
            "Dana is an engineer",
            "Nothing certain follows",
            "Dana dislikes tea",
        ],
        1,
        "Drinking coffee is necessary for engineers here, not sufficient.",
        20,
    ));
    store.seed_question(question(
        103,
        &logic,
        3,
        QuestionKind::Logic,
        "If it rains the match is cancelled. The match was played. So?",
        None,
        &["It rained", "It did not rain", "The match was cancelled"],
        1,
        "A played match contradicts the consequence, so the antecedent fails.",
        25,
    ));

    store.seed_question(question(
        201,
        &analysis,
        1,
        QuestionKind::Sequence,
        "What number comes next?",
        Some(VisualAid::Sequence(vec![2, 4, 8, 16])),
        &["24", "32", "20"],
        1,
        "Each value doubles the previous one.",
        15,
    ));
    store.seed_question(question(
        202,
        &analysis,
        2,
        QuestionKind::Sequence,
        "Continue the sequence.",
        Some(VisualAid::Sequence(vec![1, 1, 2, 3, 5])),
        &["7", "8", "9"],
        1,
        "Each term is the sum of the two before it.",
        15,
    ));

    store.seed_question(question(
        301,
        &communication,
        1,
        QuestionKind::Analogy,
        "Speaker is to audience as writer is to...",
        None,
        &["Reader", "Editor", "Printer"],
        0,
        "The receiving side of the exchange: audiences listen, readers read.",
        10,
    ));

    store.seed_competency(logic);
    store.seed_competency(analysis);
    store.seed_competency(communication);
}
