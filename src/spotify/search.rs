use crate::{
    error::RequestError,
    spotify::RequestDispatcher,
    types::{SearchResponse, SearchResult},
};

/// Result types requested from `GET /search`.
const SEARCH_TYPES: &str = "album,artist,playlist,track";

/// Searches tracks, albums, artists and playlists at once.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher of the signed-in session
/// * `query` - Free-text query; Spotify's field filters such as `artist:` work
/// * `limit` - Maximum number of hits per result type (1-50)
///
/// # Returns
///
/// All hits flattened into one list: tracks first, then albums, artists and
/// playlists, each in Spotify's relevance order.
///
/// # Example
///
/// ```
/// for hit in search(&session.dispatcher, "kind of blue", 10).await? {
///     if let SearchResult::Album(album) = hit {
///         println!("{}", album.name);
///     }
/// }
/// ```
pub async fn search(
    dispatcher: &RequestDispatcher,
    query: &str,
    limit: u32,
) -> Result<Vec<SearchResult>, RequestError> {
    let limit = limit.to_string();
    let endpoint = crate::utils::with_query(
        "/search",
        &[("q", query), ("type", SEARCH_TYPES), ("limit", limit.as_str())],
    );
    let response: SearchResponse = dispatcher.get_json(&endpoint).await?;
    Ok(response.into_results())
}
