use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

use services::{Screen, SessionController};

use crate::views::{AuthView, MenuView, QuizView};

#[derive(Props, Clone)]
struct HarnessProps {
    controller: SessionController,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HarnessProps {}

/// Renders the same screen dispatch as `App`, but from a pre-built
/// controller so tests can stage any state before mounting.
#[component]
fn HarnessRoot(props: HarnessProps) -> Element {
    let controller = use_signal(|| props.controller.clone());
    use_context_provider(|| controller);

    let screen = controller.read().screen();
    match screen {
        Screen::Unauthenticated => rsx! { AuthView {} },
        Screen::MenuLoading | Screen::Menu => rsx! { MenuView {} },
        Screen::InCompetency => rsx! { QuizView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(controller: SessionController) -> ViewHarness {
    let dom = VirtualDom::new_with_props(HarnessRoot, HarnessProps { controller });
    ViewHarness { dom }
}
