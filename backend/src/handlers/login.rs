use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::flows::auth::{AuthForm, AuthMode};
use crate::{session, views, AppState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginIntent {
    #[default]
    Submit,
    Toggle,
}

#[derive(Debug, Deserialize)]
pub struct LoginFormBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub intent: LoginIntent,
}

/// The form echoes the typed password back so a mode toggle keeps it;
/// such pages must not end up in any cache.
fn render_login(form: &AuthForm) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(views::login_page(form)),
    )
        .into_response()
}

pub async fn show_login() -> Response {
    render_login(&AuthForm::default())
}

pub async fn submit_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(body): Form<LoginFormBody>,
) -> Response {
    let mut form = AuthForm::new(body.email, body.password, body.mode);

    if body.intent == LoginIntent::Toggle {
        form.toggle_mode();
        return render_login(&form);
    }

    match form.submit(state.backend.as_ref()).await {
        Some(success) => {
            let jar = match &success.session {
                Some(issued) => session::store(jar, issued, state.config.cookie_secure),
                None => jar,
            };
            (
                [(header::CACHE_CONTROL, "no-store")],
                jar,
                Redirect::to(success.redirect.path()),
            )
                .into_response()
        }
        None => render_login(&form),
    }
}
