use dioxus::prelude::*;

use services::SessionController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthMode {
    SignIn,
    SignUp,
}

/// Sign-in / sign-up form. Remote error messages are shown verbatim.
#[component]
pub fn AuthView() -> Element {
    let controller = use_context::<Signal<SessionController>>();
    let mut mode = use_signal(|| AuthMode::SignIn);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let display_name = use_signal(String::new);
    let error = use_signal(|| None::<String>);
    let busy = use_signal(|| false);

    let submit = use_callback(move |()| {
        if busy() {
            return;
        }
        let current_mode = mode();
        let email_value = email.peek().clone();
        let password_value = password.peek().clone();
        let display_name_value = display_name.peek().clone();
        let mut controller = controller;
        let mut error = error;
        let mut busy = busy;

        spawn(async move {
            busy.set(true);
            error.set(None);

            let mut ctl = controller.peek().clone();
            let result = match current_mode {
                AuthMode::SignIn => ctl.sign_in(&email_value, &password_value).await,
                AuthMode::SignUp => {
                    ctl.sign_up(&email_value, &password_value, Some(&display_name_value))
                        .await
                }
            };
            controller.set(ctl);

            if let Err(err) = result {
                error.set(Some(err.to_string()));
            }
            busy.set(false);
        });
    });

    let is_sign_in = mode() == AuthMode::SignIn;
    let submit_label = if busy() {
        "Working..."
    } else if is_sign_in {
        "Sign In"
    } else {
        "Create Account"
    };

    rsx! {
        div { class: "page auth-page",
            div { class: "auth-card",
                header { class: "auth-card__header",
                    span { class: "auth-card__logo", "🎯" }
                    h1 { "SkillForge" }
                    p { "Sharpen your professional skills with interactive challenges" }
                }

                div { class: "auth-card__tabs",
                    button {
                        class: if is_sign_in { "auth-tab auth-tab--active" } else { "auth-tab" },
                        r#type: "button",
                        onclick: move |_| mode.set(AuthMode::SignIn),
                        "Sign In"
                    }
                    button {
                        class: if is_sign_in { "auth-tab" } else { "auth-tab auth-tab--active" },
                        r#type: "button",
                        onclick: move |_| mode.set(AuthMode::SignUp),
                        "Sign Up"
                    }
                }

                form {
                    class: "auth-form",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        submit.call(());
                    },
                    if !is_sign_in {
                        label { class: "auth-field",
                            span { "Display name" }
                            input {
                                r#type: "text",
                                placeholder: "Your name",
                                value: "{display_name}",
                                oninput: {
                                    let mut display_name = display_name;
                                    move |evt: FormEvent| display_name.set(evt.value())
                                },
                            }
                        }
                    }
                    label { class: "auth-field",
                        span { "Email" }
                        input {
                            r#type: "email",
                            placeholder: "you@example.com",
                            value: "{email}",
                            oninput: {
                                let mut email = email;
                                move |evt: FormEvent| email.set(evt.value())
                            },
                        }
                    }
                    label { class: "auth-field",
                        span { "Password" }
                        input {
                            r#type: "password",
                            placeholder: "••••••••",
                            value: "{password}",
                            oninput: {
                                let mut password = password;
                                move |evt: FormEvent| password.set(evt.value())
                            },
                        }
                    }

                    if let Some(message) = error() {
                        p { class: "auth-error", "{message}" }
                    }

                    button {
                        class: "auth-submit",
                        r#type: "submit",
                        disabled: busy(),
                        "{submit_label}"
                    }
                }
            }
        }
    }
}
