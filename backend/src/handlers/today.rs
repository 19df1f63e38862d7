use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::flows::today::{self, local_today, TodayPage, Transition};
use crate::flows::Route;
use crate::models::journal_entry::{EntryDraft, Mood};
use crate::session::{self, resolve_session, ACCESS_COOKIE};
use crate::{views, AppState};

#[derive(Debug, Deserialize)]
pub struct EntryFormBody {
    /// The date the page was mounted for.
    pub entry_date: NaiveDate,
    #[serde(default = "default_mood")]
    pub mood: i16,
    #[serde(default)]
    pub content: String,
}

fn default_mood() -> i16 {
    Mood::default().into()
}

pub const STALE_DATE_STATUS: &str =
    "This page was opened on an earlier day. Save again to keep it for today.";

/// The page keeps the date it was mounted with, so a save just after
/// midnight still lands on that day. Anything older than yesterday, or in
/// the future, was not produced by a recent mount.
fn accept_entry_date(submitted: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    (submitted == today || today.pred_opt() == Some(submitted)).then_some(submitted)
}

pub async fn show_today(State(state): State<AppState>, jar: CookieJar) -> Response {
    let backend = state.backend.as_ref();
    let (jar, session) = resolve_session(backend, jar, state.config.cookie_secure).await;

    match TodayPage::mount(backend, session.as_ref(), local_today()).await {
        Transition::Stay(page) => (jar, Html(views::today_page(&page))).into_response(),
        Transition::Redirect(route) => (jar, Redirect::to(route.path())).into_response(),
    }
}

pub async fn save_today(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(body): Form<EntryFormBody>,
) -> AppResult<Response> {
    let backend = state.backend.as_ref();
    let (jar, session) = resolve_session(backend, jar, state.config.cookie_secure).await;
    if session.is_none() {
        return Ok((jar, Redirect::to(Route::Login.path())).into_response());
    }

    let mood = Mood::try_from(body.mood).map_err(AppError::Validation)?;
    let draft = EntryDraft {
        mood,
        content: body.content,
    };
    let today = local_today();

    let Some(date) = accept_entry_date(body.entry_date, today) else {
        tracing::debug!(entry_date = %body.entry_date, "Stale entry date, moving draft to today");
        let mut page = TodayPage::ready(today, draft);
        page.status = Some(STALE_DATE_STATUS.to_string());
        return Ok((jar, Html(views::today_page(&page))).into_response());
    };

    let mut page = TodayPage::ready(date, draft);
    let response = match page.save(backend, session.as_ref()).await {
        Transition::Stay(()) => (jar, Html(views::today_page(&page))).into_response(),
        Transition::Redirect(route) => (jar, Redirect::to(route.path())).into_response(),
    };
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let route = today::logout(state.backend.as_ref(), token.as_deref()).await;
    (session::clear(jar), Redirect::to(route.path())).into_response()
}
