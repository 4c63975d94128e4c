mod auth;
mod session;

pub use auth::CredentialManager;
pub use auth::REFRESH_MARGIN_SECS;
pub use auth::apply_refresh;
pub use auth::expires_at;
pub use session::SESSION_ID_LENGTH;
pub use session::SESSION_IDLE_TIMEOUT;
pub use session::SessionContext;
pub use session::SessionStore;
