//! # Spotify Integration Module
//!
//! Everything that talks to Spotify: the OAuth session core and the Web API
//! endpoints built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! CLI / callback server
//!          ↓
//! library, browse, search, ...    (typed endpoint functions)
//!          ↓
//! RequestDispatcher               (bearer token, one retry after 401)
//!          ↓
//! RefreshCoordinator              (single-flight refresh, sign-in, sign-out)
//!     ├── TokenStore              (credential + staleness, persisted)
//!     └── TokenExchanger          (POST /api/token)
//!          ↓
//! HttpTransport                   (reqwest)
//! ```
//!
//! ## Token lifecycle
//!
//! A token counts as stale five minutes before it expires. The first caller
//! that finds it stale starts a refresh; everyone arriving while it runs waits
//! for that same refresh and gets the same token or the same error. A 401 from
//! the API forces one refresh regardless of the clock and the call is retried
//! once. A refresh response without `refresh_token` keeps the stored one.
//!
//! ## Error Types
//!
//! - [`ExchangeError`](crate::error::ExchangeError) - token endpoint failures
//! - [`AuthError`](crate::error::AuthError) - no usable token could be obtained
//! - [`RequestError`](crate::error::RequestError) - Web API call failures

pub mod auth;
pub mod browse;
pub mod dispatcher;
pub mod exchange;
pub mod library;
pub mod player;
pub mod profile;
pub mod refresh;
pub mod search;
pub mod transport;

pub use dispatcher::RequestDispatcher;
pub use exchange::{TokenExchange, TokenExchanger};
pub use refresh::RefreshCoordinator;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
