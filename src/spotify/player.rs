use reqwest::Method;

use crate::{
    error::RequestError,
    spotify::RequestDispatcher,
    types::{CurrentlyPlaying, TrackUris},
};

/// Returns what the user is listening to right now.
///
/// Spotify answers "204 No Content" when nothing is playing; that is
/// reported as `Ok(None)`, while a body that does not parse is a
/// [`RequestError::Decode`].
pub async fn currently_playing(
    dispatcher: &RequestDispatcher,
) -> Result<Option<CurrentlyPlaying>, RequestError> {
    dispatcher
        .get_optional("/me/player/currently-playing")
        .await
}

/// Starts playback of the given tracks, or resumes when `uris` is empty.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `uris` - Track URIs to play on the active device
///
/// Spotify answers 404 when the user has no active device; that is a
/// [`RequestError::Transport`] with the status attached.
pub async fn play(dispatcher: &RequestDispatcher, uris: &[String]) -> Result<(), RequestError> {
    if uris.is_empty() {
        dispatcher
            .send_empty::<TrackUris>(Method::PUT, "/me/player/play", None)
            .await?;
    } else {
        let body = TrackUris {
            uris: uris.to_vec(),
        };
        dispatcher
            .send_empty(Method::PUT, "/me/player/play", Some(&body))
            .await?;
    }
    Ok(())
}

/// Pauses playback on the active device.
pub async fn pause(dispatcher: &RequestDispatcher) -> Result<(), RequestError> {
    dispatcher
        .send_empty::<()>(Method::PUT, "/me/player/pause", None)
        .await?;
    Ok(())
}

/// Skips to the next track in the user's queue.
pub async fn skip_to_next(dispatcher: &RequestDispatcher) -> Result<(), RequestError> {
    dispatcher
        .send_empty::<()>(Method::POST, "/me/player/next", None)
        .await?;
    Ok(())
}

/// Skips back to the previous track.
pub async fn skip_to_previous(dispatcher: &RequestDispatcher) -> Result<(), RequestError> {
    dispatcher
        .send_empty::<()>(Method::POST, "/me/player/previous", None)
        .await?;
    Ok(())
}
