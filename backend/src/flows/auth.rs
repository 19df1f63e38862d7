use serde::Deserialize;

use super::Route;
use crate::models::user::{AuthSession, Credentials};
use crate::remote::RemoteBackend;

pub const FALLBACK_ERROR: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome back",
            AuthMode::Signup => "Create your account",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Log in",
            AuthMode::Signup => "Sign up",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            AuthMode::Login => "New here? Create an account",
            AuthMode::Signup => "Already have an account? Log in",
        }
    }
}

/// Where a successful submit leads, and the session to keep if the auth
/// service issued one.
#[derive(Debug)]
pub struct AuthSuccess {
    pub redirect: Route,
    pub session: Option<AuthSession>,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub mode: AuthMode,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>, mode: AuthMode) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            mode,
            ..Self::default()
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Sends the credentials in the current mode. `None` means the form
    /// stays put: either a submit is already in flight or it failed, in
    /// which case `error` holds the message and the fields are untouched.
    pub async fn submit(&mut self, backend: &dyn RemoteBackend) -> Option<AuthSuccess> {
        if self.loading {
            tracing::debug!("Submit ignored while another is in flight");
            return None;
        }
        self.loading = true;
        self.error = None;

        let outcome = self.dispatch(backend).await;
        self.loading = false;

        match outcome {
            Ok(session) => Some(AuthSuccess {
                redirect: Route::Today,
                session,
            }),
            Err(message) => {
                self.error = Some(if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
                None
            }
        }
    }

    async fn dispatch(&self, backend: &dyn RemoteBackend) -> Result<Option<AuthSession>, String> {
        let credentials = Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        if let Some(violation) = credentials.first_violation() {
            return Err(violation);
        }

        let result = match self.mode {
            AuthMode::Login => backend
                .sign_in_with_password(&credentials)
                .await
                .map(Some),
            AuthMode::Signup => backend.sign_up(&credentials).await,
        };

        match result {
            Ok(session) => {
                tracing::info!(
                    mode = self.mode.as_str(),
                    user_id = ?session.as_ref().map(|s| s.user.id),
                    "Authentication succeeded"
                );
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(mode = self.mode.as_str(), error = %e, "Authentication failed");
                Err(e.to_string())
            }
        }
    }
}
