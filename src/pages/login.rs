//! Login and registration form with reCAPTCHA v3 and live password feedback.
//!
//! SYSTEM CONTEXT
//! ==============
//! The form builds [`Credentials`] for the selected mode and hands them to the
//! credential submitter. On success the session is already stored and the
//! page is reloaded (or, from the login route itself, replaced by the home
//! page) so every component starts from the persisted tokens.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::auth::error::AuthError;
use crate::auth::password::{PasswordFeedback, ZxcvbnEstimator, live_feedback};
use crate::auth::submitter::Credentials;
use crate::config::{HOME_ROUTE, LOGIN_ROUTE};
use crate::util::navigation::Navigator;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Login,
    Register,
}

impl FormMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create an account",
        }
    }

    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    #[must_use]
    pub fn switch_prompt(self) -> &'static str {
        match self {
            Self::Login => "No account yet? Register",
            Self::Register => "Already registered? Login",
        }
    }
}

/// Values typed into the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl FormInput {
    /// Credentials for `mode`. Username and email are trimmed, passwords are
    /// sent exactly as typed.
    #[must_use]
    pub fn credentials(&self, mode: FormMode) -> Credentials {
        let username = self.username.trim().to_owned();
        match mode {
            FormMode::Login => Credentials::Login { username, password: self.password.clone() },
            FormMode::Register => Credentials::Register {
                username,
                email: self.email.trim().to_owned(),
                password: self.password.clone(),
                password_confirmation: self.confirmation.clone(),
            },
        }
    }

    /// Live password feedback, shown only while registering.
    #[must_use]
    pub fn feedback(&self, mode: FormMode) -> PasswordFeedback {
        if mode == FormMode::Login {
            return PasswordFeedback::default();
        }
        let inputs = [self.username.trim(), self.email.trim()];
        live_feedback(&ZxcvbnEstimator, &self.password, &self.confirmation, &inputs)
    }
}

/// Failure shown under the form.
#[derive(Clone, Debug, PartialEq)]
pub struct FormError {
    pub message: String,
    /// Bot-check score line, present when the backend echoed one.
    pub score: Option<String>,
}

impl From<&AuthError> for FormError {
    fn from(err: &AuthError) -> Self {
        Self {
            message: err.user_message(),
            score: err.attestation_score().map(|score| format!("reCAPTCHA score: {score:.2}")),
        }
    }
}

/// Leave the form after a successful exchange.
pub fn finish_login<N: Navigator + ?Sized>(navigator: &N, current_path: &str) {
    if current_path == LOGIN_ROUTE {
        navigator.navigate(HOME_ROUTE);
    } else {
        navigator.reload();
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let mode = RwSignal::new(FormMode::Login);
    let input = RwSignal::new(FormInput::default());
    let error = RwSignal::new(None::<FormError>);
    let busy = RwSignal::new(false);

    Effect::new(move || {
        crate::auth::attestation::ensure_script_loaded(&crate::services::config());
    });

    let feedback = move || input.with(|i| i.feedback(mode.get()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = input.with(|i| i.credentials(mode.get()));
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::services::credential_submitter().submit(&credentials).await {
                Ok(_) => {
                    let path = web_sys::window()
                        .and_then(|w| w.location().pathname().ok())
                        .unwrap_or_default();
                    finish_login(&crate::util::navigation::BrowserNavigator, &path);
                }
                Err(e) => {
                    error.set(Some(FormError::from(&e)));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credentials;
            busy.set(false);
        }
    };

    let on_toggle = move |_| {
        mode.update(|m| *m = m.toggled());
        error.set(None);
    };

    let registering = move || mode.get() == FormMode::Register;

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>{move || mode.get().title()}</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        autocomplete="username"
                        prop:value=move || input.with(|i| i.username.clone())
                        on:input=move |ev| input.update(|i| i.username = event_target_value(&ev))
                    />
                    <Show when=registering>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || input.with(|i| i.email.clone())
                            on:input=move |ev| input.update(|i| i.email = event_target_value(&ev))
                        />
                    </Show>
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || input.with(|i| i.password.clone())
                        on:input=move |ev| input.update(|i| i.password = event_target_value(&ev))
                    />
                    <Show when=registering>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Confirm password"
                            prop:value=move || input.with(|i| i.confirmation.clone())
                            on:input=move |ev| input.update(|i| i.confirmation = event_target_value(&ev))
                        />
                        {move || {
                            feedback()
                                .label
                                .map(|label| {
                                    view! {
                                        <p class=format!("login-strength {}", label.css_class())>
                                            "Strength: "
                                            {label.as_str()}
                                        </p>
                                    }
                                })
                        }}
                        <ul class="login-violations">
                            {move || {
                                feedback()
                                    .violations
                                    .into_iter()
                                    .map(|v| view! { <li>{v.to_string()}</li> })
                                    .collect_view()
                            }}
                        </ul>
                        <ul class="login-suggestions">
                            {move || {
                                feedback()
                                    .suggestions
                                    .into_iter()
                                    .map(|s| view! { <li>{s}</li> })
                                    .collect_view()
                            }}
                        </ul>
                    </Show>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Please wait..." } else { mode.get().submit_label() }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">
                        {move || error.get().map(|e| e.message).unwrap_or_default()}
                    </p>
                    <Show when=move || error.get().is_some_and(|e| e.score.is_some())>
                        <p class="login-message login-message--score">
                            {move || error.get().and_then(|e| e.score).unwrap_or_default()}
                        </p>
                    </Show>
                </Show>
                <button class="login-switch" type="button" on:click=on_toggle>
                    {move || mode.get().switch_prompt()}
                </button>
            </div>
        </div>
    }
}
