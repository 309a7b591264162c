use std::collections::HashMap;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};

use crate::{server::CallbackState, warning};

/// Receives the redirect from the Spotify authorize page.
///
/// Expects `code` and the `state` issued for this sign-in; an `error`
/// parameter (user denied access) ends the sign-in as failed.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> (StatusCode, Html<&'static str>) {
    let mut pending = state.pending.lock().await;
    if pending.done.is_none() {
        return (
            StatusCode::CONFLICT,
            Html("<h4>Sign-in already finished.</h4>"),
        );
    }

    if params.get("state") != Some(&pending.state) {
        warning!("Ignoring callback with unexpected state parameter");
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>State mismatch, login rejected.</h4>"),
        );
    }

    if let Some(error) = params.get("error") {
        pending.finish(Err(format!("authorization denied: {error}")));
        return (StatusCode::UNAUTHORIZED, Html("<h4>Login failed.</h4>"));
    }

    let Some(code) = params.get("code") else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    };

    match state.coordinator.complete_sign_in(code).await {
        Ok(()) => {
            pending.finish(Ok(()));
            (
                StatusCode::OK,
                Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>"),
            )
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            pending.finish(Err(e.to_string()));
            (StatusCode::BAD_GATEWAY, Html("<h4>Login failed.</h4>"))
        }
    }
}
