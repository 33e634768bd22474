use uuid::Uuid;

use quiz_core::model::{
    Competency, CompetencyIcon, CompetencyId, Question, QuestionId, QuestionKind,
};
use quiz_core::time::fixed_clock;
use services::SessionController;
use store::InMemoryStore;

use super::test_harness::setup_view_harness;

fn competency_id() -> CompetencyId {
    CompetencyId::new(Uuid::from_u128(1))
}

fn seeded_store() -> InMemoryStore {
    let mem = InMemoryStore::new();
    mem.seed_competency(
        Competency::new(
            competency_id(),
            "Logic",
            "deduction drills",
            CompetencyIcon::Puzzle,
            "#8b5cf6",
        )
        .unwrap(),
    );
    mem.seed_question(
        Question::new(
            QuestionId::new(Uuid::from_u128(10)),
            competency_id(),
            1,
            QuestionKind::Logic,
            "Which conclusion follows?",
            None,
            vec!["All A are C".into(), "No conclusion follows".into()],
            1,
            "The premises do not connect A to C.",
            20,
        )
        .unwrap(),
    );
    mem
}

async fn signed_in_controller(mem: &InMemoryStore) -> SessionController {
    let mut controller = SessionController::new(mem.store(), fixed_clock());
    controller
        .sign_up("ada@example.com", "hunter22", Some("Ada"))
        .await
        .expect("sign up");
    controller
}

#[tokio::test(flavor = "current_thread")]
async fn auth_view_smoke_renders_form() {
    let mem = InMemoryStore::new();
    let controller = SessionController::new(mem.store(), fixed_clock());

    let mut harness = setup_view_harness(controller);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("SkillForge"), "missing title in {html}");
    assert!(html.contains("Email"), "missing email field in {html}");
    assert!(html.contains("Sign In"), "missing sign-in tab in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn menu_view_smoke_renders_profile_and_cards() {
    let mem = seeded_store();
    let controller = signed_in_controller(&mem).await;

    let mut harness = setup_view_harness(controller);
    harness.rebuild();
    let html = harness.render();

    assert!(
        html.contains("Professional Competencies"),
        "missing heading in {html}"
    );
    assert!(html.contains("Logic"), "missing competency card in {html}");
    assert!(html.contains("Points"), "missing score chip in {html}");
    assert!(html.contains("Level"), "missing level chip in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mem = seeded_store();
    let mut controller = signed_in_controller(&mem).await;
    controller.select_competency(competency_id());

    let mut harness = setup_view_harness(controller);
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();

    assert!(
        html.contains("Which conclusion follows?"),
        "missing prompt in {html}"
    );
    assert!(
        html.contains("Confirm Answer"),
        "missing confirm button in {html}"
    );
    assert!(
        html.contains("Question 1 of 1"),
        "missing position label in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_routes_empty_competency_to_empty_state() {
    let mem = InMemoryStore::new();
    let empty = CompetencyId::new(Uuid::from_u128(9));
    mem.seed_competency(
        Competency::new(empty, "Strategy", "", CompetencyIcon::TrendingUp, "#f59e0b").unwrap(),
    );
    let mut controller = signed_in_controller(&mem).await;
    controller.select_competency(empty);

    let mut harness = setup_view_harness(controller);
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();

    assert!(
        html.contains("No questions available yet."),
        "missing empty message in {html}"
    );
    assert!(
        html.contains("Back to Menu"),
        "missing back action in {html}"
    );
}
