use tabled::Table;

use crate::{
    cli::{album_rows, playlist_row, spinner, track_rows},
    error, info,
    session::Session,
    spotify,
    types::{CategoryTableRow, Playlist, PlaylistTableRow, SearchResult, SearchTableRow},
    utils, warning,
};

const SEARCH_LIMIT: u32 = 10;
const BROWSE_LIMIT: u32 = 20;

/// Searches Spotify and prints every hit in one table.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `query` - Free-text query passed to Spotify unchanged
///
/// # Output
///
/// One row per hit with its kind (`track`, `album`, `artist`, `playlist`),
/// name, the artists or owner, and a reference: the URI for tracks so it can
/// be handed to `spotauth play`, the id for everything else.
pub async fn search(session: &Session, query: &str) {
    let pb = spinner("Searching...");
    let result = spotify::search::search(&session.dispatcher, query, SEARCH_LIMIT).await;
    pb.finish_and_clear();

    let hits = match result {
        Ok(hits) => hits,
        Err(e) => error!("Search failed: {}", e),
    };
    if hits.is_empty() {
        warning!("Nothing found for \"{}\"", query);
        return;
    }

    let rows: Vec<SearchTableRow> = hits.into_iter().map(search_row).collect();
    println!("{}", Table::new(rows));
}

fn search_row(hit: SearchResult) -> SearchTableRow {
    match hit {
        SearchResult::Track(track) => SearchTableRow {
            kind: "track",
            by: utils::join_artist_names(&track.artists),
            name: track.name,
            reference: track.uri,
        },
        SearchResult::Album(album) => SearchTableRow {
            kind: "album",
            by: utils::join_artist_names(&album.artists),
            name: album.name,
            reference: album.id,
        },
        SearchResult::Artist(artist) => SearchTableRow {
            kind: "artist",
            by: String::new(),
            name: artist.name,
            reference: artist.id,
        },
        SearchResult::Playlist(playlist) => SearchTableRow {
            kind: "playlist",
            by: playlist.owner.display_name.unwrap_or(playlist.owner.id),
            name: playlist.name,
            reference: playlist.id,
        },
    }
}

/// Shows an album and its track listing.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `album_id` - Spotify id of the album, as listed by `albums` or `search`
pub async fn album(session: &Session, album_id: &str) {
    let pb = spinner("Fetching album...");
    let result = spotify::library::album_details(&session.dispatcher, album_id).await;
    pb.finish_and_clear();

    match result {
        Ok(album) => {
            info!(
                "{} by {} ({})",
                album.name,
                utils::join_artist_names(&album.artists),
                album.release_date.as_deref().unwrap_or("unknown date")
            );
            println!("{}", Table::new(track_rows(album.tracks.items)));
        }
        Err(e) => error!("Failed to fetch album: {}", e),
    }
}

/// Shows new album releases.
pub async fn releases(session: &Session) {
    let pb = spinner("Fetching new releases...");
    let result = spotify::browse::new_releases(&session.dispatcher, BROWSE_LIMIT).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) => println!("{}", Table::new(album_rows(albums))),
        Err(e) => error!("Failed to fetch new releases: {}", e),
    }
}

/// Shows the playlists Spotify features right now.
pub async fn featured(session: &Session) {
    let pb = spinner("Fetching featured playlists...");
    let result = spotify::browse::featured_playlists(&session.dispatcher, BROWSE_LIMIT).await;
    pb.finish_and_clear();

    match result {
        Ok((message, playlists)) => {
            if let Some(message) = message {
                info!("{}", message);
            }
            print_playlists(playlists);
        }
        Err(e) => error!("Failed to fetch featured playlists: {}", e),
    }
}

/// Lists browse categories, or the playlists of one category.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `category_id` - When given, list this category's playlists instead
pub async fn categories(session: &Session, category_id: Option<String>) {
    if let Some(category_id) = category_id {
        let pb = spinner("Fetching category playlists...");
        let result =
            spotify::browse::category_playlists(&session.dispatcher, &category_id, BROWSE_LIMIT)
                .await;
        pb.finish_and_clear();

        match result {
            Ok(playlists) => print_playlists(playlists),
            Err(e) => error!("Failed to fetch playlists of {}: {}", category_id, e),
        }
        return;
    }

    let pb = spinner("Fetching categories...");
    let result = spotify::browse::categories(&session.dispatcher, 50).await;
    pb.finish_and_clear();

    match result {
        Ok(categories) => {
            let rows: Vec<CategoryTableRow> = categories
                .into_iter()
                .map(|c| CategoryTableRow {
                    id: c.id,
                    name: c.name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Failed to fetch categories: {}", e),
    }
}

/// Lists the genres accepted by `recommend`.
pub async fn genres(session: &Session) {
    match spotify::browse::genre_seeds(&session.dispatcher).await {
        Ok(genres) => println!("{}", genres.join(", ")),
        Err(e) => error!("Failed to fetch genres: {}", e),
    }
}

/// Shows tracks recommended for up to five seed genres.
///
/// # Arguments
///
/// * `session` - Opened session of the signed-in user
/// * `seed_genres` - Genres as listed by `genres`
pub async fn recommend(session: &Session, seed_genres: Vec<String>) {
    if seed_genres.is_empty() || seed_genres.len() > 5 {
        error!("Give between one and five genres, see spotauth genres");
    }

    let pb = spinner("Fetching recommendations...");
    let result =
        spotify::browse::recommendations(&session.dispatcher, &seed_genres, BROWSE_LIMIT).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) => println!("{}", Table::new(track_rows(tracks))),
        Err(e) => error!("Failed to fetch recommendations: {}", e),
    }
}

fn print_playlists(playlists: Vec<Playlist>) {
    if playlists.is_empty() {
        warning!("No playlists found");
        return;
    }
    let rows: Vec<PlaylistTableRow> = playlists.into_iter().map(playlist_row).collect();
    println!("{}", Table::new(rows));
}
