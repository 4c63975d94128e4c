use axum::{
    Extension, Form,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{dj, server::AppState, warning};

use super::{page, session};

#[derive(Debug, Deserialize)]
pub struct MoodForm {
    #[serde(default)]
    pub mood: String,
}

/// Renders the connect step or the mood form. Sessions are only created by
/// `/login`, so visitors without a cookie leave nothing behind.
pub async fn home(Extension(app): Extension<AppState>, jar: CookieJar) -> Html<String> {
    let credentials = match session::session_id(&jar) {
        Some(session_id) => app.auth.current_credentials(&session_id).await,
        None => None,
    };

    match credentials {
        Some(_) => Html(page::mood_form("")),
        None => Html(page::connect()),
    }
}

pub async fn generate(
    Extension(app): Extension<AppState>,
    jar: CookieJar,
    Form(form): Form<MoodForm>,
) -> Response {
    let Some(session_id) = session::session_id(&jar) else {
        return Redirect::to("/").into_response();
    };
    let Some(credentials) = app.auth.current_credentials(&session_id).await else {
        return Redirect::to("/").into_response();
    };

    let (result, credentials) = dj::build_playlist(&app.dj, &form.mood, credentials).await;
    if !app.sessions.store_credentials(&session_id, credentials).await {
        warning!("Session ended while its playlist was being built");
    }

    match result {
        Ok(outcome) => Html(page::outcome(&outcome)).into_response(),
        Err(e) => {
            warning!("Playlist build failed: {}", e);
            Html(page::build_failed(&e)).into_response()
        }
    }
}
