use dioxus::prelude::*;

use services::{Screen, SessionController};

use crate::context::AppContext;
use crate::views::{AuthView, MenuView, QuizView};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let controller = use_signal(|| SessionController::new(ctx.store(), ctx.clock()));
    use_context_provider(|| controller);
    let booted = use_signal(|| false);

    // Probe for an existing session once at startup.
    use_future(move || {
        let mut controller = controller;
        let mut booted = booted;
        async move {
            let mut ctl = controller.peek().clone();
            ctl.resume().await;
            controller.set(ctl);
            booted.set(true);
        }
    });

    let screen = controller.read().screen();

    rsx! {
        document::Title { "SkillForge" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                if !booted() {
                    div { class: "splash",
                        p { "Loading..." }
                    }
                } else {
                    match screen {
                        Screen::Unauthenticated => rsx! { AuthView {} },
                        Screen::MenuLoading | Screen::Menu => rsx! { MenuView {} },
                        Screen::InCompetency => rsx! { QuizView {} },
                    }
                }
            }
        }
    }
}
