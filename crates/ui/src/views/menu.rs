use dioxus::prelude::*;

use quiz_core::model::CompetencyId;
use services::{Screen, SessionController};

use crate::vm::{CompetencyCardVm, map_competency_card};

/// Competency menu: profile header, card grid, sign-out.
#[component]
pub fn MenuView() -> Element {
    let controller = use_context::<Signal<SessionController>>();

    let (screen, profile_chip, cards) = {
        let ctl = controller.read();
        let profile_chip = ctl
            .profile()
            .map(|profile| (profile.total_score(), profile.level()));
        let cards: Vec<CompetencyCardVm> =
            ctl.competencies().iter().map(map_competency_card).collect();
        (ctl.screen(), profile_chip, cards)
    };

    let on_select = use_callback(move |id: CompetencyId| {
        let mut controller = controller;
        controller.write().select_competency(id);
    });

    let on_sign_out = use_callback(move |()| {
        let mut controller = controller;
        spawn(async move {
            let mut ctl = controller.peek().clone();
            ctl.sign_out().await;
            controller.set(ctl);
        });
    });

    rsx! {
        div { class: "page menu-page",
            header { class: "menu-header",
                div { class: "menu-header__brand",
                    h1 { "🎯 SkillForge" }
                    p { "Sharpen your professional skills" }
                }
                if let Some((score, level)) = profile_chip {
                    div { class: "menu-header__stats",
                        div { class: "stat",
                            span { class: "stat__label", "Points" }
                            span { class: "stat__value", "{score}" }
                        }
                        div { class: "stat",
                            span { class: "stat__label", "Level" }
                            span { class: "stat__value", "{level}" }
                        }
                    }
                }
            }

            div { class: "menu-body",
                div { class: "menu-toolbar",
                    h2 { "Professional Competencies" }
                    button {
                        class: "btn btn-secondary",
                        id: "menu-sign-out",
                        r#type: "button",
                        onclick: move |_| on_sign_out.call(()),
                        "Sign Out"
                    }
                }

                if screen == Screen::MenuLoading {
                    p { class: "menu-loading", "Loading..." }
                } else if cards.is_empty() {
                    p { class: "menu-empty", "No competencies available yet." }
                } else {
                    div { class: "menu-grid",
                        for card in cards {
                            CompetencyCard { card, on_select }
                        }
                    }
                }

                section { class: "menu-how",
                    h3 { "How it works" }
                    ol {
                        li { "Pick the competency you want to grow" }
                        li { "Work through its reasoning challenges" }
                        li { "Earn points and unlock levels" }
                    }
                }
            }
        }
    }
}

#[component]
fn CompetencyCard(card: CompetencyCardVm, on_select: EventHandler<CompetencyId>) -> Element {
    let id = card.id;
    rsx! {
        button {
            class: "competency-card",
            style: "border-left-color: {card.color};",
            r#type: "button",
            onclick: move |_| on_select.call(id),
            span { class: "competency-card__glyph", "{card.glyph}" }
            h3 { "{card.name}" }
            p { class: "competency-card__description", "{card.description}" }
            div { class: "competency-card__progress",
                span { "Progress" }
                span { class: "competency-card__pct", "{card.progress_pct}%" }
            }
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {card.progress_pct}%; background-color: {card.color};",
                }
            }
        }
    }
}
