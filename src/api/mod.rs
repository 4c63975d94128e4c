//! # API Module
//!
//! HTTP handlers for the AI Mood DJ web surface. The page has two visible
//! steps: "connect to YouTube" before authorization and "describe your mood"
//! afterwards.
//!
//! ## Endpoints
//!
//! - [`home`] - `GET /`, renders the step matching the session's state
//! - [`login`] - `GET /login`, creates the session if needed, stores a pending
//!   authorization request and redirects to Google
//! - [`callback`] - `GET /callback`, exchanges the authorization code
//! - [`generate`] - `POST /generate`, runs the playlist pipeline for the
//!   submitted mood
//! - [`logout`] - `GET /logout`, ends the session
//! - [`health`] - `GET /health`, status and version
//!
//! Sessions are identified by the [`session::SESSION_COOKIE`] cookie; its
//! value keys the [`crate::management::SessionStore`]. Only [`login`] creates
//! sessions.

mod callback;
mod generate;
mod health;
pub mod page;
pub mod session;

pub use callback::CallbackParams;
pub use callback::callback;
pub use callback::login;
pub use callback::logout;
pub use generate::MoodForm;
pub use generate::generate;
pub use generate::home;
pub use health::health;
