use reqwest::Method;

use crate::{
    error::RequestError,
    spotify::RequestDispatcher,
    types::{
        Album, AlbumDetails, CreatePlaylistRequest, Paging, Playlist, PlaylistDetails,
        RemoveTracksRequest, SavedAlbum, SnapshotResponse, TrackRef, TrackUris,
    },
    utils::{encode_segment, with_query},
};

/// Retrieves the albums saved in the user's library, newest first.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `limit` - Maximum number of albums to return (1-50)
///
/// # Returns
///
/// The albums of the first page, unwrapped from their `added_at` envelope.
pub async fn saved_albums(
    dispatcher: &RequestDispatcher,
    limit: u32,
) -> Result<Vec<Album>, RequestError> {
    let page: Paging<SavedAlbum> = dispatcher
        .get_json(&format!("/me/albums?limit={limit}"))
        .await?;
    Ok(page.items.into_iter().map(|saved| saved.album).collect())
}

/// Saves an album to the user's library (`PUT /me/albums?ids=`).
///
/// Saving an album that is already saved succeeds.
pub async fn save_album(
    dispatcher: &RequestDispatcher,
    album_id: &str,
) -> Result<(), RequestError> {
    let endpoint = with_query("/me/albums", &[("ids", album_id)]);
    dispatcher
        .send_empty::<()>(Method::PUT, &endpoint, None)
        .await?;
    Ok(())
}

/// Retrieves an album together with its track listing.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `album_id` - Spotify id of the album
///
/// # Example
///
/// ```
/// let album = album_details(&session.dispatcher, "4aawyAB9vmqN3uQ7FjRGTy").await?;
/// for track in album.tracks.items {
///     println!("{}", track.name);
/// }
/// ```
pub async fn album_details(
    dispatcher: &RequestDispatcher,
    album_id: &str,
) -> Result<AlbumDetails, RequestError> {
    dispatcher
        .get_json(&format!("/albums/{}", encode_segment(album_id)))
        .await
}

/// Retrieves the playlists owned or followed by the user.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `limit` - Maximum number of playlists to return (1-50)
pub async fn current_user_playlists(
    dispatcher: &RequestDispatcher,
    limit: u32,
) -> Result<Vec<Playlist>, RequestError> {
    let page: Paging<Playlist> = dispatcher
        .get_json(&format!("/me/playlists?limit={limit}"))
        .await?;
    Ok(page.items)
}

/// Retrieves a playlist with its first page of items.
pub async fn playlist_details(
    dispatcher: &RequestDispatcher,
    playlist_id: &str,
) -> Result<PlaylistDetails, RequestError> {
    dispatcher
        .get_json(&format!("/playlists/{}", encode_segment(playlist_id)))
        .await
}

/// Creates a private playlist owned by `user_id`.
///
/// # Returns
///
/// The created playlist as Spotify reports it, including its new id.
pub async fn create_playlist(
    dispatcher: &RequestDispatcher,
    user_id: &str,
    name: &str,
) -> Result<Playlist, RequestError> {
    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: format!("Created with {}", env!("CARGO_PKG_NAME")),
        public: false,
    };
    dispatcher
        .send_json(
            Method::POST,
            &format!("/users/{}/playlists", encode_segment(user_id)),
            &request,
        )
        .await
}

/// Appends tracks to the end of a playlist.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `playlist_id` - Playlist to modify
/// * `uris` - Track URIs such as `spotify:track:4iV5W9uYEdYUVa79Axb7Rh`
///
/// # Returns
///
/// The playlist's new snapshot id.
pub async fn add_tracks(
    dispatcher: &RequestDispatcher,
    playlist_id: &str,
    uris: Vec<String>,
) -> Result<SnapshotResponse, RequestError> {
    dispatcher
        .send_json(
            Method::POST,
            &format!("/playlists/{}/tracks", encode_segment(playlist_id)),
            &TrackUris { uris },
        )
        .await
}

/// Removes every occurrence of the given tracks from a playlist.
///
/// Spotify takes the track list as a JSON body on `DELETE`.
pub async fn remove_tracks(
    dispatcher: &RequestDispatcher,
    playlist_id: &str,
    uris: Vec<String>,
) -> Result<SnapshotResponse, RequestError> {
    let request = RemoveTracksRequest {
        tracks: uris.into_iter().map(|uri| TrackRef { uri }).collect(),
    };
    dispatcher
        .send_json(
            Method::DELETE,
            &format!("/playlists/{}/tracks", encode_segment(playlist_id)),
            &request,
        )
        .await
}
