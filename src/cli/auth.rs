use crate::{error, info, session::Session, spotify, success, utils, warning};

/// Signs in through the browser and stores the credential.
///
/// Starts the callback server on `SERVER_ADDRESS`, opens Spotify's authorize
/// page and waits for the redirect. Signing in while already signed in
/// replaces the stored credential.
///
/// # Arguments
///
/// * `session` - Opened session; its coordinator performs the code exchange
pub async fn auth(session: &Session) {
    if session.store.is_signed_in() {
        info!("Already signed in, signing in again replaces the stored credential");
    }

    match spotify::auth::auth(session).await {
        Ok(()) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

/// Forgets the stored credential, in memory and on disk.
///
/// Waits for a refresh that is still running so its result cannot
/// reappear after the sign-out.
pub async fn logout(session: &Session) {
    match session.coordinator.sign_out().await {
        Ok(()) => success!("Signed out, stored credential removed"),
        Err(e) => error!("Sign-out failed: {}", e),
    }
}

/// Prints the state of the stored token.
///
/// # Arguments
///
/// * `session` - Opened session
/// * `refresh` - Obtain a valid token first, refreshing a stale one
///
/// # Output
///
/// The masked access token, whether a refresh token is stored, the remaining
/// lifetime and a warning when the token falls within the refresh window.
pub async fn status(session: &Session, refresh: bool) {
    if refresh {
        match session.coordinator.ensure_valid_token().await {
            Ok(_) => success!("Access token is valid"),
            Err(e) => warning!("Could not obtain a valid token: {}", e),
        }
    }

    let credential = session.store.get();
    let Some(access_token) = credential.access_token else {
        warning!("Not signed in. Run spotauth auth");
        return;
    };

    info!("Access token: {}", utils::mask_token(&access_token));
    info!(
        "Refresh token: {}",
        if credential.refresh_token.is_some() {
            "stored"
        } else {
            "missing"
        }
    );
    match session.store.expires_in() {
        Some(remaining) => info!("Expires in: {}", utils::format_remaining(remaining)),
        None => info!("Expires in: unknown"),
    }
    if session.store.is_stale() {
        warning!("Token is stale and will be refreshed on the next request");
    }
}
