use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::management::SessionStore;

pub const SESSION_COOKIE: &str = "mood_dj_session";

/// Session id carried by the request's cookie, whether or not it is still live.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| !id.is_empty())
}

/// Id of the live session named by the cookie, or of a freshly created one.
///
/// A new session also adds its cookie to the returned jar. Cookies naming an
/// ended or evicted session are replaced.
pub async fn resolve_session(jar: CookieJar, sessions: &SessionStore) -> (CookieJar, String) {
    if let Some(id) = session_id(&jar) {
        if sessions.contains(&id).await {
            return (jar, id);
        }
    }

    let id = sessions.create().await;
    (jar.add(session_cookie(&id)), id)
}

pub fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Removal cookie for the session, sent on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
