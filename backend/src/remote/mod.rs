//! Seam between the two flows and the hosted backend (auth + row storage).
//!
//! Both flows only ever see `dyn RemoteBackend`; the production
//! implementation is [`supabase::SupabaseClient`].

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::journal_entry::{JournalEntry, StoredEntry};
use crate::models::user::{AuthSession, Credentials, User};

#[cfg(test)]
pub mod memory;
pub mod supabase;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The backend answered with an error. `message` is its own text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Reachability check used by `/readyz`.
    async fn health(&self) -> RemoteResult<()>;

    async fn sign_in_with_password(&self, credentials: &Credentials) -> RemoteResult<AuthSession>;

    /// `None` when the account was created but no session was issued yet
    /// (e.g. email confirmation pending).
    async fn sign_up(&self, credentials: &Credentials) -> RemoteResult<Option<AuthSession>>;

    async fn refresh_session(&self, refresh_token: &str) -> RemoteResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> RemoteResult<()>;

    /// `None` when the token is not (or no longer) accepted.
    async fn get_user(&self, access_token: &str) -> RemoteResult<Option<User>>;

    /// At most one row for `(user_id, entry_date)`.
    async fn select_entry(
        &self,
        access_token: &str,
        user_id: Uuid,
        entry_date: NaiveDate,
    ) -> RemoteResult<Option<StoredEntry>>;

    /// Insert, or overwrite mood and content of the row with the same
    /// `(user_id, entry_date)`.
    async fn upsert_entry(&self, access_token: &str, entry: &JournalEntry) -> RemoteResult<()>;
}
