//! # API Module
//!
//! HTTP endpoints of the short-lived local server that spotauth runs while a
//! user signs in.
//!
//! - [`callback`] - receives the redirect from Spotify's authorize page,
//!   checks the `state` parameter and hands the authorization code to the
//!   [`RefreshCoordinator`](crate::spotify::RefreshCoordinator).
//! - [`health`] - reports the crate version and whether a credential is held.
//!
//! ```rust,ignore
//! let app = spotauth::server::router(state);
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
