use crate::{error, info, session::Session, spotify, success, utils};

/// Prints the track playing right now, with progress.
///
/// Reports "nothing is playing" when Spotify has no playback to show, and the
/// item type when something other than a track (an episode, an ad) plays.
pub async fn now_playing(session: &Session) {
    match spotify::player::currently_playing(&session.dispatcher).await {
        Ok(Some(playing)) => match playing.item {
            Some(track) => {
                let state = if playing.is_playing { "Playing" } else { "Paused" };
                let progress = playing
                    .progress_ms
                    .map(utils::format_duration_ms)
                    .unwrap_or_default();
                let duration = track
                    .duration_ms
                    .map(utils::format_duration_ms)
                    .unwrap_or_default();
                info!(
                    "{}: {} - {} [{}/{}]",
                    state,
                    utils::join_artist_names(&track.artists),
                    track.name,
                    progress,
                    duration
                );
            }
            None => info!(
                "Playing {}",
                playing
                    .currently_playing_type
                    .unwrap_or_else(|| "something".to_string())
            ),
        },
        Ok(None) => info!("Nothing is playing right now"),
        Err(e) => error!("Failed to fetch playback state: {}", e),
    }
}

/// Starts the given track URIs, or resumes playback when none are given.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `uris` - Track URIs such as `spotify:track:4iV5W9uYEdYUVa79Axb7Rh`
pub async fn play(session: &Session, uris: Vec<String>) {
    match spotify::player::play(&session.dispatcher, &uris).await {
        Ok(()) if uris.is_empty() => success!("Playback resumed"),
        Ok(()) => success!("Playing {} track(s)", uris.len()),
        Err(e) => error!("Failed to start playback: {}", e),
    }
}

/// Pauses playback on the active device.
pub async fn pause(session: &Session) {
    match spotify::player::pause(&session.dispatcher).await {
        Ok(()) => success!("Playback paused"),
        Err(e) => error!("Failed to pause playback: {}", e),
    }
}

/// Skips to the next track.
pub async fn next(session: &Session) {
    match spotify::player::skip_to_next(&session.dispatcher).await {
        Ok(()) => success!("Skipped to next track"),
        Err(e) => error!("Failed to skip: {}", e),
    }
}

/// Goes back to the previous track.
pub async fn previous(session: &Session) {
    match spotify::player::skip_to_previous(&session.dispatcher).await {
        Ok(()) => success!("Back to previous track"),
        Err(e) => error!("Failed to skip back: {}", e),
    }
}
