use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::user::{AuthSession, Session};
use crate::remote::RemoteBackend;

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Stores both tokens of a freshly issued session in the browser.
pub fn store(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        session.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        session.refresh_token.clone(),
        secure,
    ))
}

pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

/// Asks the auth service who the browser's tokens belong to. Never cached:
/// every decision point calls this again.
///
/// An access token the service no longer accepts is exchanged through the
/// refresh token once; if that fails too the stale cookies are dropped and
/// the session counts as absent.
pub async fn resolve_session(
    backend: &dyn RemoteBackend,
    jar: CookieJar,
    secure: bool,
) -> (CookieJar, Option<Session>) {
    let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    if access.is_none() && refresh.is_none() {
        return (jar, None);
    }

    if let Some(access_token) = access {
        match backend.get_user(&access_token).await {
            Ok(Some(user)) => return (jar, Some(Session { user, access_token })),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "Session lookup failed"),
        }
    }

    if let Some(refresh_token) = refresh {
        match backend.refresh_session(&refresh_token).await {
            Ok(fresh) => {
                tracing::debug!(user_id = %fresh.user.id, "Session refreshed");
                let jar = store(jar, &fresh, secure);
                return (jar, Some(fresh.into()));
            }
            Err(e) => tracing::debug!(error = %e, "Session refresh failed"),
        }
    }

    (clear(jar), None)
}
