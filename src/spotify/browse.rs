//! Editorial and recommendation endpoints under `/browse` and
//! `/recommendations`.
//!
//! Spotify restricts several of these for apps created after late 2024; a
//! restricted endpoint answers 404 and surfaces as [`RequestError::Transport`].

use crate::{
    error::RequestError,
    spotify::RequestDispatcher,
    types::{
        Album, CategoriesResponse, Category, GenreSeedsResponse, NewReleasesResponse, Playlist,
        PlaylistsResponse, RecommendationsResponse, Track,
    },
    utils::{encode_segment, with_query},
};

/// Retrieves newly released albums.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `limit` - Maximum number of albums to return (1-50)
pub async fn new_releases(
    dispatcher: &RequestDispatcher,
    limit: u32,
) -> Result<Vec<Album>, RequestError> {
    let response: NewReleasesResponse = dispatcher
        .get_json(&format!("/browse/new-releases?limit={limit}"))
        .await?;
    Ok(response.albums.items)
}

/// Retrieves the playlists Spotify currently features.
///
/// # Returns
///
/// The editorial headline, if any, and the playlists. Entries Spotify reports
/// as `null` are skipped.
pub async fn featured_playlists(
    dispatcher: &RequestDispatcher,
    limit: u32,
) -> Result<(Option<String>, Vec<Playlist>), RequestError> {
    let response: PlaylistsResponse = dispatcher
        .get_json(&format!("/browse/featured-playlists?limit={limit}"))
        .await?;
    let playlists = response.playlists.items.into_iter().flatten().collect();
    Ok((response.message, playlists))
}

/// Retrieves the browse categories (genres, moods, charts).
pub async fn categories(
    dispatcher: &RequestDispatcher,
    limit: u32,
) -> Result<Vec<Category>, RequestError> {
    let response: CategoriesResponse = dispatcher
        .get_json(&format!("/browse/categories?limit={limit}"))
        .await?;
    Ok(response.categories.items)
}

/// Retrieves the playlists of one browse category.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `category_id` - Id from [`categories`], e.g. `toplists`
/// * `limit` - Maximum number of playlists to return (1-50)
pub async fn category_playlists(
    dispatcher: &RequestDispatcher,
    category_id: &str,
    limit: u32,
) -> Result<Vec<Playlist>, RequestError> {
    let endpoint = format!(
        "/browse/categories/{}/playlists?limit={limit}",
        encode_segment(category_id)
    );
    let response: PlaylistsResponse = dispatcher.get_json(&endpoint).await?;
    Ok(response.playlists.items.into_iter().flatten().collect())
}

/// Retrieves the genres accepted as recommendation seeds.
pub async fn genre_seeds(dispatcher: &RequestDispatcher) -> Result<Vec<String>, RequestError> {
    let response: GenreSeedsResponse = dispatcher
        .get_json("/recommendations/available-genre-seeds")
        .await?;
    Ok(response.genres)
}

/// Retrieves tracks recommended for the given seed genres.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `seed_genres` - Up to five genres from [`genre_seeds`]
/// * `limit` - Maximum number of tracks to return (1-100)
///
/// # Example
///
/// ```
/// let genres = vec!["jazz".to_string(), "soul".to_string()];
/// let tracks = recommendations(&session.dispatcher, &genres, 20).await?;
/// ```
pub async fn recommendations(
    dispatcher: &RequestDispatcher,
    seed_genres: &[String],
    limit: u32,
) -> Result<Vec<Track>, RequestError> {
    let limit = limit.to_string();
    let genres = seed_genres.join(",");
    let endpoint = with_query(
        "/recommendations",
        &[("limit", limit.as_str()), ("seed_genres", genres.as_str())],
    );
    let response: RecommendationsResponse = dispatcher.get_json(&endpoint).await?;
    Ok(response.tracks)
}
