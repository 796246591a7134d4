//! Entry screen: login and registration.

use dioxus::prelude::*;

use crate::app::components::{ErrorLine, Panel};
use crate::app::context::{report, use_api, use_navigate, use_session};
use crate::identity::{self, ImageUpload, Registration, RegistrationForm};
use crate::navigator::{NavEvent, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// Welcome page with a login/register toggle.
#[component]
pub fn Welcome() -> Element {
    let mut mode = use_signal(|| Mode::Login);
    let mut note = use_signal(|| Option::<String>::None);
    let navigate = use_navigate(Screen::Welcome);

    let on_registered = move |registration: Registration| {
        // Stays on this screen; only the mode flips back to login
        navigate.go(NavEvent::Registered);
        let mut text = format!("Registered {}. You can now log in.", registration.client_id);
        if let Some(e) = registration.photo_error {
            text.push_str(&format!(" Profile photo was not saved: {}", e));
        }
        note.set(Some(text));
        mode.set(Mode::Login);
    };

    let title = match mode() {
        Mode::Login => "Login",
        Mode::Register => "Register",
    };

    rsx! {
        Panel { title: title.to_string(),
            div { class: "mode-switch",
                button {
                    r#type: "button",
                    class: if mode() == Mode::Login { "active" } else { "" },
                    onclick: move |_| mode.set(Mode::Login),
                    "Login"
                }
                button {
                    r#type: "button",
                    class: if mode() == Mode::Register { "active" } else { "" },
                    onclick: move |_| {
                        note.set(None);
                        mode.set(Mode::Register);
                    },
                    "Register"
                }
            }
            if let Some(text) = note() {
                p { class: "note", "{text}" }
            }
            match mode() {
                Mode::Login => rsx! { LoginForm {} },
                Mode::Register => rsx! { RegisterForm { on_registered } },
            }
        }
    }
}

#[component]
fn LoginForm() -> Element {
    let api = use_api();
    let session = use_session();
    let navigate = use_navigate(Screen::Welcome);
    let mut client_id = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let id = client_id().trim().to_string();
        if id.is_empty() {
            error.set(Some("Enter your ID number".to_string()));
            return;
        }
        let api = api.clone();
        let mut session = session;
        spawn(async move {
            error.set(None);
            loading.set(true);
            let outcome = identity::login(&api, &id).await;
            loading.set(false);
            match outcome.into_result() {
                Ok(signed_in) => {
                    session.sign_in(signed_in);
                    navigate.go(NavEvent::SignedIn);
                }
                Err(rejection) => report(rejection, None, error),
            }
        });
    };

    rsx! {
        form { class: "form", onsubmit: handle_login,
            ErrorLine { message: error() }
            label {
                "ID number"
                input {
                    r#type: "text",
                    name: "client_id",
                    value: client_id(),
                    oninput: move |evt: FormEvent| client_id.set(evt.value()),
                }
            }
            div { class: "footer",
                button { r#type: "submit", disabled: loading(), aria_busy: loading().to_string(),
                    "Login"
                }
            }
        }
    }
}

#[component]
fn RegisterForm(on_registered: EventHandler<Registration>) -> Element {
    let api = use_api();
    let mut form = use_signal(RegistrationForm::default);
    let mut image = use_signal(|| Option::<ImageUpload>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let fields = form();
        if fields.id_number.trim().is_empty() || fields.name.trim().is_empty() {
            error.set(Some("ID number and name are required".to_string()));
            return;
        }
        let api = api.clone();
        let upload = image();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let outcome = identity::register(&api, &fields, upload).await;
            loading.set(false);
            match outcome.into_result() {
                Ok(registration) => on_registered.call(registration),
                Err(rejection) => report(rejection, None, error),
            }
        });
    };

    let pick_image = move |evt: FormEvent| async move {
        let Some(file) = evt.files().into_iter().next() else {
            image.set(None);
            return;
        };
        match file.read_bytes().await {
            Ok(bytes) => image.set(Some(ImageUpload {
                name: file.name(),
                data: bytes.to_vec(),
            })),
            Err(e) => {
                tracing::warn!("Could not read selected image: {}", e);
                image.set(None);
            }
        }
    };

    rsx! {
        form { class: "form", onsubmit: handle_register,
            ErrorLine { message: error() }
            label {
                "ID number"
                input {
                    r#type: "text",
                    value: form.read().id_number.clone(),
                    oninput: move |evt: FormEvent| form.write().id_number = evt.value(),
                }
            }
            label {
                "Name"
                input {
                    r#type: "text",
                    value: form.read().name.clone(),
                    oninput: move |evt: FormEvent| form.write().name = evt.value(),
                }
            }
            label {
                "Surname"
                input {
                    r#type: "text",
                    value: form.read().surname.clone(),
                    oninput: move |evt: FormEvent| form.write().surname = evt.value(),
                }
            }
            label {
                "Email"
                input {
                    r#type: "email",
                    value: form.read().email_address.clone(),
                    oninput: move |evt: FormEvent| form.write().email_address = evt.value(),
                }
            }
            label {
                "Phone number"
                input {
                    r#type: "tel",
                    value: form.read().phone_number.clone(),
                    oninput: move |evt: FormEvent| form.write().phone_number = evt.value(),
                }
            }
            label {
                "Profile photo"
                input { r#type: "file", accept: "image/*", onchange: pick_image }
            }
            div { class: "footer",
                button { r#type: "submit", disabled: loading(), aria_busy: loading().to_string(),
                    "Register"
                }
            }
        }
    }
}
