//! In-process stand-in for the hosted backend, used by flow and router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{RemoteBackend, RemoteError, RemoteResult};
use crate::models::journal_entry::{JournalEntry, StoredEntry};
use crate::models::user::{AuthSession, Credentials, User};

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, (String, User)>,
    /// access token -> user
    access: HashMap<String, User>,
    /// refresh token -> user
    refresh: HashMap<String, User>,
    rows: HashMap<(Uuid, NaiveDate), JournalEntry>,
    next_token: u64,
    calls: HashMap<&'static str, usize>,
    fail_auth: Option<String>,
    fail_select: Option<String>,
    fail_upsert: Option<String>,
    require_confirmation: bool,
}

impl Inner {
    fn record(&mut self, op: &'static str) {
        *self.calls.entry(op).or_default() += 1;
    }

    fn issue(&mut self, user: &User) -> AuthSession {
        self.next_token += 1;
        let access_token = format!("access-{}", self.next_token);
        let refresh_token = format!("refresh-{}", self.next_token);
        self.access.insert(access_token.clone(), user.clone());
        self.refresh.insert(refresh_token.clone(), user.clone());
        AuthSession {
            access_token,
            refresh_token,
            expires_in: 3600,
            user: user.clone(),
        }
    }

    fn authorize(&self, access_token: &str) -> RemoteResult<User> {
        self.access
            .get(access_token)
            .cloned()
            .ok_or_else(|| RemoteError::api(401, "JWT expired"))
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(&self, email: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.inner
            .lock()
            .await
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Signs the account in directly, bypassing call accounting.
    pub async fn session_for(&self, email: &str) -> AuthSession {
        let mut inner = self.inner.lock().await;
        let user = inner.accounts[email].1.clone();
        inner.issue(&user)
    }

    /// Makes an access token unusable, as if it had expired.
    pub async fn expire_access(&self, access_token: &str) {
        self.inner.lock().await.access.remove(access_token);
    }

    pub async fn put_row(&self, entry: JournalEntry) {
        self.inner
            .lock()
            .await
            .rows
            .insert((entry.user_id, entry.entry_date), entry);
    }

    pub async fn row(&self, user_id: Uuid, entry_date: NaiveDate) -> Option<JournalEntry> {
        self.inner
            .lock()
            .await
            .rows
            .get(&(user_id, entry_date))
            .cloned()
    }

    pub async fn row_count(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn calls(&self, op: &str) -> usize {
        self.inner.lock().await.calls.get(op).copied().unwrap_or(0)
    }

    /// Sign-in and sign-up answer with this message instead.
    pub async fn fail_auth(&self, message: &str) {
        self.inner.lock().await.fail_auth = Some(message.to_string());
    }

    pub async fn fail_select(&self, message: &str) {
        self.inner.lock().await.fail_select = Some(message.to_string());
    }

    pub async fn fail_upsert(&self, message: &str) {
        self.inner.lock().await.fail_upsert = Some(message.to_string());
    }

    pub async fn require_confirmation(&self) {
        self.inner.lock().await.require_confirmation = true;
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn health(&self) -> RemoteResult<()> {
        Ok(())
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> RemoteResult<AuthSession> {
        let mut inner = self.inner.lock().await;
        inner.record("sign_in");
        if let Some(message) = inner.fail_auth.clone() {
            return Err(RemoteError::api(500, message));
        }
        let user = match inner.accounts.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => user.clone(),
            _ => return Err(RemoteError::api(400, "Invalid login credentials")),
        };
        Ok(inner.issue(&user))
    }

    async fn sign_up(&self, credentials: &Credentials) -> RemoteResult<Option<AuthSession>> {
        let mut inner = self.inner.lock().await;
        inner.record("sign_up");
        if let Some(message) = inner.fail_auth.clone() {
            return Err(RemoteError::api(500, message));
        }
        if inner.accounts.contains_key(&credentials.email) {
            return Err(RemoteError::api(422, "User already registered"));
        }
        if credentials.password.len() < 6 {
            return Err(RemoteError::api(
                422,
                "Password should be at least 6 characters.",
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: Some(credentials.email.clone()),
        };
        inner.accounts.insert(
            credentials.email.clone(),
            (credentials.password.clone(), user.clone()),
        );
        if inner.require_confirmation {
            return Ok(None);
        }
        Ok(Some(inner.issue(&user)))
    }

    async fn refresh_session(&self, refresh_token: &str) -> RemoteResult<AuthSession> {
        let mut inner = self.inner.lock().await;
        inner.record("refresh");
        let user = inner
            .refresh
            .remove(refresh_token)
            .ok_or_else(|| RemoteError::api(400, "Invalid Refresh Token: Refresh Token Not Found"))?;
        Ok(inner.issue(&user))
    }

    async fn sign_out(&self, access_token: &str) -> RemoteResult<()> {
        let mut inner = self.inner.lock().await;
        inner.record("sign_out");
        let user = inner.authorize(access_token)?;
        inner.access.retain(|_, u| u.id != user.id);
        inner.refresh.retain(|_, u| u.id != user.id);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> RemoteResult<Option<User>> {
        let mut inner = self.inner.lock().await;
        inner.record("get_user");
        Ok(inner.access.get(access_token).cloned())
    }

    async fn select_entry(
        &self,
        access_token: &str,
        user_id: Uuid,
        entry_date: NaiveDate,
    ) -> RemoteResult<Option<StoredEntry>> {
        let mut inner = self.inner.lock().await;
        inner.record("select");
        if let Some(message) = inner.fail_select.clone() {
            return Err(RemoteError::api(500, message));
        }
        let caller = inner.authorize(access_token)?;
        if caller.id != user_id {
            return Ok(None);
        }
        Ok(inner.rows.get(&(user_id, entry_date)).map(|row| StoredEntry {
            mood: Some(row.mood.into()),
            content: Some(row.content.clone()),
        }))
    }

    async fn upsert_entry(&self, access_token: &str, entry: &JournalEntry) -> RemoteResult<()> {
        let mut inner = self.inner.lock().await;
        inner.record("upsert");
        if let Some(message) = inner.fail_upsert.clone() {
            return Err(RemoteError::api(500, message));
        }
        let caller = inner.authorize(access_token)?;
        if caller.id != entry.user_id {
            return Err(RemoteError::api(
                403,
                "new row violates row-level security policy for table \"journal_entries\"",
            ));
        }
        inner
            .rows
            .insert((entry.user_id, entry.entry_date), entry.clone());
        Ok(())
    }
}
