//! # CLI Module
//!
//! Command implementations for the `mood-dj` binary.
//!
//! - [`serve`] - runs the web surface for any number of browser sessions
//! - [`generate`] - one-shot loopback flow: authorize in the browser, build a
//!   playlist for the given mood and print it
//!
//! ```bash
//! mood-dj serve
//! mood-dj generate "a chill, rainy Sunday afternoon"
//! ```

mod generate;
mod serve;

pub use generate::generate;
pub use serve::serve;
