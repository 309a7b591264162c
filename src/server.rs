use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, spotify::RefreshCoordinator, types::PendingSignIn};

/// State handed to the callback routes.
#[derive(Clone)]
pub struct CallbackState {
    pub pending: Arc<Mutex<PendingSignIn>>,
    pub coordinator: RefreshCoordinator,
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Serves the callback routes on an already bound listener until aborted.
pub async fn serve(listener: TcpListener, state: CallbackState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
