use crate::{
    error::BuildError,
    types::PlaylistOutcome,
    utils::escape_html,
};

const STYLE: &str = "body{font-family:sans-serif;max-width:42rem;margin:3rem auto;padding:0 1rem}\
input[type=text]{width:100%;padding:.5rem}button{margin-top:1rem;padding:.5rem 1rem}\
.error{color:#b00020}.ok{color:#1b5e20}";

pub fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>AI Mood DJ</title>\
         <style>{STYLE}</style></head><body><h1>&#127925; AI Mood DJ (for YouTube)</h1>\
         <p>Describe how you feel, and we'll build the perfect YouTube playlist for you.</p>\
         {body}</body></html>"
    )
}

pub fn connect() -> String {
    layout(
        "<h2>Step 1: Connect to YouTube</h2>\
         <p><a href=\"/login\">Click here to authorize with your YouTube account</a></p>",
    )
}

pub fn mood_form(notice: &str) -> String {
    layout(&format!(
        "<p class=\"ok\">Successfully connected to YouTube! <a href=\"/logout\">Disconnect</a></p>\
         <h2>Step 2: Create your playlist</h2>{notice}\
         <form method=\"post\" action=\"/generate\">\
         <label for=\"mood\">How are you feeling right now? (e.g. 'A chill, rainy Sunday afternoon')</label>\
         <input type=\"text\" id=\"mood\" name=\"mood\" autofocus>\
         <button type=\"submit\">&#10024; Generate playlist</button></form>"
    ))
}

pub fn error_message(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape_html(message))
}

pub fn auth_failed(message: &str) -> String {
    layout(&format!(
        "{}<p><a href=\"/login\">Try connecting again</a></p>",
        error_message(message)
    ))
}

pub fn outcome(outcome: &PlaylistOutcome) -> String {
    let tracks = outcome
        .videos
        .iter()
        .map(|video| {
            format!(
                "<li>{} <small>{}</small></li>",
                escape_html(&video.title),
                escape_html(&video.channel)
            )
        })
        .collect::<String>();

    mood_form(&format!(
        "<p>Searched YouTube for: <strong>'{query}'</strong></p>\
         <p class=\"ok\">Playlist <strong>{title}</strong> created! \
         <a href=\"{url}\" target=\"_blank\">Click here to listen on YouTube</a></p><ol>{tracks}</ol>",
        query = escape_html(&outcome.search_query),
        title = escape_html(&outcome.playlist.title),
        url = escape_html(&outcome.url),
    ))
}

pub fn build_failed(error: &BuildError) -> String {
    match error {
        BuildError::PartialInsert {
            playlist_url,
            succeeded,
            failed,
            underlying_error,
            ..
        } => mood_form(&format!(
            "<p class=\"error\">Your playlist was created, but only {succeeded} of {total} videos \
             could be added ({failed} failed): {cause}</p>\
             <p><a href=\"{url}\" target=\"_blank\">Open the playlist on YouTube</a></p>",
            total = succeeded + failed,
            cause = escape_html(underlying_error),
            url = escape_html(playlist_url),
        )),
        other => mood_form(&error_message(&other.to_string())),
    }
}
