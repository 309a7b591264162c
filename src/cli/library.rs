use tabled::Table;

use crate::{
    cli::{album_rows, playlist_row, spinner, track_rows},
    error, info,
    session::Session,
    spotify, success, warning,
};

const PAGE_LIMIT: u32 = 50;

/// Lists the user's saved albums, or saves one.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `save` - Album id to save instead of listing
///
/// # Output
///
/// A table with id, name, artists and release date of the first
/// fifty saved albums.
pub async fn albums(session: &Session, save: Option<String>) {
    if let Some(album_id) = save {
        match spotify::library::save_album(&session.dispatcher, &album_id).await {
            Ok(()) => success!("Album {} saved to your library", album_id),
            Err(e) => error!("Failed to save album: {}", e),
        }
        return;
    }

    let pb = spinner("Fetching saved albums...");
    let result = spotify::library::saved_albums(&session.dispatcher, PAGE_LIMIT).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) if albums.is_empty() => info!("No saved albums"),
        Ok(albums) => println!("{}", Table::new(album_rows(albums))),
        Err(e) => error!("Failed to fetch albums: {}", e),
    }
}

/// Lists the user's playlists, shows one, or creates one.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `id` - Show the tracks of this playlist
/// * `create` - Create a private playlist with this name
///
/// # Execution Priority
///
/// `create` wins over `id`; with neither, the playlists are listed. Creating
/// looks up the user's id first since the endpoint is per user.
pub async fn playlists(session: &Session, id: Option<String>, create: Option<String>) {
    if let Some(name) = create {
        let profile = match spotify::profile::current_user(&session.dispatcher).await {
            Ok(profile) => profile,
            Err(e) => error!("Failed to fetch profile: {}", e),
        };
        match spotify::library::create_playlist(&session.dispatcher, &profile.id, &name).await {
            Ok(playlist) => success!("Created playlist {} ({})", playlist.name, playlist.id),
            Err(e) => error!("Failed to create playlist: {}", e),
        }
        return;
    }

    if let Some(playlist_id) = id {
        let pb = spinner("Fetching playlist...");
        let result = spotify::library::playlist_details(&session.dispatcher, &playlist_id).await;
        pb.finish_and_clear();

        match result {
            Ok(details) => {
                let owner = details.owner.display_name.unwrap_or(details.owner.id);
                info!("{} by {}", details.name, owner);
                let tracks = details
                    .tracks
                    .items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .collect();
                println!("{}", Table::new(track_rows(tracks)));
            }
            Err(e) => error!("Failed to fetch playlist: {}", e),
        }
        return;
    }

    let pb = spinner("Fetching playlists...");
    let result = spotify::library::current_user_playlists(&session.dispatcher, PAGE_LIMIT).await;
    pb.finish_and_clear();

    match result {
        Ok(playlists) if playlists.is_empty() => warning!("No playlists found"),
        Ok(playlists) => {
            let rows: Vec<_> = playlists.into_iter().map(playlist_row).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Failed to fetch playlists: {}", e),
    }
}
