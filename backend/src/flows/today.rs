use chrono::{Local, NaiveDate};

use super::Route;
use crate::models::journal_entry::{
    format_entry_date, EntryDraft, JournalEntry, Mood, SAVED_STATUS,
};
use crate::models::user::Session;
use crate::remote::RemoteBackend;

/// Today's date on the local wall clock. Deliberately not UTC.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPhase {
    Loading,
    Ready,
    Saving,
}

/// Result of a mount or save: keep showing the page, or leave it.
#[derive(Debug)]
pub enum Transition<T> {
    Stay(T),
    Redirect(Route),
}

#[derive(Debug, Clone)]
pub struct TodayPage {
    pub date: NaiveDate,
    pub draft: EntryDraft,
    pub phase: EntryPhase,
    pub status: Option<String>,
}

impl TodayPage {
    /// A page whose editable state has already been loaded, e.g. one
    /// rebuilt from a submitted form.
    pub fn ready(date: NaiveDate, draft: EntryDraft) -> Self {
        Self {
            date,
            draft,
            phase: EntryPhase::Ready,
            status: None,
        }
    }

    /// Loads the row for `(user, date)`, falling back to the defaults when
    /// there is none or the lookup fails.
    pub async fn mount(
        backend: &dyn RemoteBackend,
        session: Option<&Session>,
        date: NaiveDate,
    ) -> Transition<Self> {
        let mut page = Self {
            date,
            draft: EntryDraft::default(),
            phase: EntryPhase::Loading,
            status: None,
        };

        let Some(session) = session else {
            return Transition::Redirect(Route::Login);
        };

        match backend
            .select_entry(&session.access_token, session.user.id, date)
            .await
        {
            Ok(Some(row)) => page.draft = row.into(),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(user_id = %session.user.id, error = %e, "Entry lookup failed, using defaults")
            }
        }

        page.phase = EntryPhase::Ready;
        Transition::Stay(page)
    }

    pub fn date_label(&self) -> String {
        format_entry_date(self.date)
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.draft.mood = mood;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    /// Upserts the current draft for the freshly resolved session. The page
    /// always ends up `Ready` again unless the session is gone.
    pub async fn save(
        &mut self,
        backend: &dyn RemoteBackend,
        session: Option<&Session>,
    ) -> Transition<()> {
        if self.phase != EntryPhase::Ready {
            tracing::debug!(phase = ?self.phase, "Save ignored while page is busy");
            return Transition::Stay(());
        }
        self.phase = EntryPhase::Saving;
        self.status = None;

        let Some(session) = session else {
            return Transition::Redirect(Route::Login);
        };

        let entry = JournalEntry::new(session.user.id, self.date, &self.draft);
        match backend.upsert_entry(&session.access_token, &entry).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %session.user.id,
                    entry_date = %self.date_label(),
                    mood = entry.mood.value(),
                    "Journal entry saved"
                );
                self.status = Some(SAVED_STATUS.to_string());
            }
            Err(e) => {
                tracing::warn!(user_id = %session.user.id, error = %e, "Journal entry save failed");
                self.status = Some(e.to_string());
            }
        }

        self.phase = EntryPhase::Ready;
        Transition::Stay(())
    }
}

/// Signs out if there is anything to sign out of; always ends on the login
/// screen. A failing sign-out is only logged.
pub async fn logout(backend: &dyn RemoteBackend, access_token: Option<&str>) -> Route {
    if let Some(token) = access_token {
        if let Err(e) = backend.sign_out(token).await {
            tracing::warn!(error = %e, "Sign-out failed");
        }
    }
    Route::Login
}
