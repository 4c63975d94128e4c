use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{error::AuthError, server::AppState, success, warning};

use super::{page, session};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn login(Extension(app): Extension<AppState>, jar: CookieJar) -> Response {
    let (jar, session_id) = session::resolve_session(jar, &app.sessions).await;

    match app.auth.get_authorization_url(&session_id).await {
        Ok(url) => (jar, Redirect::to(&url)).into_response(),
        Err(e) => {
            warning!("Failed to build authorization URL: {}", e);
            (jar, Html(page::auth_failed(&e.to_string()))).into_response()
        }
    }
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(app): Extension<AppState>,
    jar: CookieJar,
) -> Response {
    if let Some(error) = params.error {
        return Html(page::auth_failed(&format!("Authorization was not granted: {}", error)))
            .into_response();
    }

    let Some(code) = params.code else {
        return Html(page::auth_failed("The callback did not include an authorization code."))
            .into_response();
    };

    let Some(state) = params.state else {
        warning!("Authorization callback without a state token");
        return Html(page::auth_failed(&AuthError::StateMissing.to_string())).into_response();
    };

    // The cookie only counts while its session waits for a callback. Browsers
    // driven by the CLI flow carry no cookie, or a stale one from an earlier run.
    let cookie_session = match session::session_id(&jar) {
        Some(id) if app.sessions.has_pending_request(&id).await => Some(id),
        _ => None,
    };
    let session_id = match cookie_session {
        Some(id) => Some(id),
        None => app.sessions.session_for_state(&state).await,
    };
    let Some(session_id) = session_id else {
        return Html(page::auth_failed(&AuthError::StateMissing.to_string())).into_response();
    };

    match app
        .auth
        .handle_callback(&session_id, &code, Some(&state))
        .await
    {
        Ok(_) => {
            success!("Session authenticated with Google");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            warning!("Authorization callback failed: {}", e);
            Html(page::auth_failed(&e.to_string())).into_response()
        }
    }
}

pub async fn logout(Extension(app): Extension<AppState>, jar: CookieJar) -> Response {
    if let Some(session_id) = session::session_id(&jar) {
        app.sessions.end(&session_id).await;
    }

    (jar.remove(session::clear_session_cookie()), Redirect::to("/")).into_response()
}
