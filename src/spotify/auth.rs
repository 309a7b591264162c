use std::{sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

use crate::{
    Res,
    config::Settings,
    info,
    server::{self, CallbackState},
    session::Session,
    types::PendingSignIn,
    utils, warning,
};

/// How long the sign-in command waits for the browser redirect.
pub const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the authorize URL the user opens to grant access.
pub fn sign_in_url(settings: &Settings, state: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &settings.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("scope", settings.scope.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
}

/// Runs the interactive authorization code flow.
///
/// 1. Issues a random `state` and starts the local callback server
/// 2. Opens the authorize URL in the browser (or prints it)
/// 3. Waits for the callback to exchange the code through the session's
///    coordinator, which also persists the credential
///
/// # Errors
///
/// Fails when the callback address cannot be bound, the user denies access,
/// the exchange fails, or nothing arrives within [`SIGN_IN_TIMEOUT`].
pub async fn auth(session: &Session) -> Res<()> {
    let state = utils::generate_state();
    let (pending, done) = PendingSignIn::new(state.clone());

    let listener = TcpListener::bind(&session.settings.server_addr).await?;
    let callback_state = CallbackState {
        pending: Arc::new(Mutex::new(pending)),
        coordinator: session.coordinator.clone(),
    };
    let server = tokio::spawn(server::serve(listener, callback_state));

    let auth_url = sign_in_url(&session.settings, &state)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    } else {
        info!("Waiting for authorization in your browser...");
    }

    let outcome = tokio::time::timeout(SIGN_IN_TIMEOUT, done).await;
    server.abort();

    match outcome {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(reason))) => Err(reason.into()),
        Ok(Err(_)) => Err("callback server stopped before sign-in finished".into()),
        Err(_) => Err("authentication timed out".into()),
    }
}
