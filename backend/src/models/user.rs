use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Identity as reported by the auth service. Only the id is relied upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a successful sign-in, sign-up or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: User,
}

/// A session that has just been confirmed against the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

impl From<AuthSession> for Session {
    fn from(s: AuthSession) -> Self {
        Self {
            user: s.user,
            access_token: s.access_token,
        }
    }
}

/// Email/password pair submitted by the login form. Only the constraints the
/// form inputs themselves carry are checked here; everything else is left to
/// the auth service.
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    /// First violated input constraint, email before password.
    pub fn first_violation(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let fields = errors.field_errors();
        ["email", "password"]
            .iter()
            .filter_map(|field| fields.get(field))
            .flat_map(|errs| errs.iter())
            .next()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", e.code))
            })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
