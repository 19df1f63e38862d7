use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{RemoteBackend, RemoteError, RemoteResult};
use crate::config::Config;
use crate::models::journal_entry::{
    format_entry_date, JournalEntry, StoredEntry, ENTRY_CONFLICT_KEY, JOURNAL_TABLE,
};
use crate::models::user::{AuthSession, Credentials, User};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";

/// Hosted backend client: GoTrue auth under `/auth/v1`, PostgREST rows
/// under `/rest/v1`. Every call is a direct pass-through.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

/// Sign-up answers with a full session when the project auto-confirms
/// accounts, otherwise with the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(#[allow(dead_code)] User),
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.supabase_url, &config.supabase_anon_key)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn with_key(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(API_KEY_HEADER, &self.anon_key)
    }

    fn with_bearer(&self, req: RequestBuilder, access_token: &str) -> RequestBuilder {
        self.with_key(req)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> RemoteResult<AuthSession> {
        let res = self
            .with_key(self.http.post(self.auth_url("token")))
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;
        decode_json(check(res).await?).await
    }

    /// `GET /rest/v1/{table}?select=..&col=eq.val&limit=1`, first row or `None`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
    ) -> RemoteResult<Option<T>> {
        let mut query: Vec<(String, String)> = vec![("select".into(), columns.into())];
        for (column, value) in filters {
            query.push((column.to_string(), format!("eq.{}", value)));
        }
        query.push(("limit".into(), "1".into()));

        let res = self
            .with_bearer(self.http.get(self.rest_url(table)), access_token)
            .query(&query)
            .send()
            .await?;
        let rows: Vec<T> = decode_json(check(res).await?).await?;
        Ok(rows.into_iter().next())
    }

    /// `POST /rest/v1/{table}?on_conflict=..` merging duplicates on the key.
    pub async fn upsert<T: Serialize + ?Sized>(
        &self,
        access_token: &str,
        table: &str,
        row: &T,
        conflict_key: &[&str],
    ) -> RemoteResult<()> {
        let res = self
            .with_bearer(self.http.post(self.rest_url(table)), access_token)
            .query(&[("on_conflict", conflict_key.join(","))])
            .header(PREFER_HEADER, "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for SupabaseClient {
    async fn health(&self) -> RemoteResult<()> {
        let res = self
            .with_key(self.http.get(self.auth_url("health")))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> RemoteResult<AuthSession> {
        self.token_grant(
            "password",
            json!({ "email": credentials.email, "password": credentials.password }),
        )
        .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> RemoteResult<Option<AuthSession>> {
        let res = self
            .with_key(self.http.post(self.auth_url("signup")))
            .json(credentials)
            .send()
            .await?;
        match decode_json(check(res).await?).await? {
            SignUpResponse::Session(session) => Ok(Some(session)),
            SignUpResponse::User(_) => Ok(None),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> RemoteResult<AuthSession> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> RemoteResult<()> {
        let res = self
            .with_bearer(self.http.post(self.auth_url("logout")), access_token)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> RemoteResult<Option<User>> {
        let res = self
            .with_bearer(self.http.get(self.auth_url("user")), access_token)
            .send()
            .await?;
        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        decode_json(check(res).await?).await.map(Some)
    }

    async fn select_entry(
        &self,
        access_token: &str,
        user_id: Uuid,
        entry_date: NaiveDate,
    ) -> RemoteResult<Option<StoredEntry>> {
        self.select_one(
            access_token,
            JOURNAL_TABLE,
            "mood,content",
            &[
                ("user_id", user_id.to_string()),
                ("entry_date", format_entry_date(entry_date)),
            ],
        )
        .await
    }

    async fn upsert_entry(&self, access_token: &str, entry: &JournalEntry) -> RemoteResult<()> {
        self.upsert(access_token, JOURNAL_TABLE, entry, &ENTRY_CONFLICT_KEY)
            .await
    }
}

/// Passes successful responses through; turns anything else into
/// [`RemoteError::Api`] carrying the backend's own message.
async fn check(res: Response) -> RemoteResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(RemoteError::api(status.as_u16(), error_message(status, &body)))
}

async fn decode_json<T: DeserializeOwned>(res: Response) -> RemoteResult<T> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// GoTrue and PostgREST disagree on where the message lives.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
