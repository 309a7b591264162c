mod auth;
mod storage;

pub use auth::REFRESH_SKEW_SECS;
pub use auth::TokenStore;
pub use storage::CredentialStorage;
pub use storage::FileStorage;
pub use storage::MemoryStorage;
