mod common;

use std::sync::Arc;

use reqwest::StatusCode;
use spotauth::{
    spotify::{RefreshCoordinator, RequestDispatcher, browse, library, search},
    types::SearchResult,
};

use common::{ScriptedExchange, ScriptedTransport, clock, credential, seeded_store};

async fn signed_in(
    responses: &[(StatusCode, &str)],
) -> (RequestDispatcher, Arc<ScriptedTransport>) {
    let clock = clock();
    let seed = credential(&clock, Some("AT1"), Some("RT1"), 3600);
    let (store, _) = seeded_store(clock, Some(seed)).await;
    let mut transport = ScriptedTransport::new();
    for (status, body) in responses {
        transport = transport.respond(*status, body);
    }
    let transport = Arc::new(transport);
    let coordinator = RefreshCoordinator::new(store, Arc::new(ScriptedExchange::new()));
    (
        RequestDispatcher::new(coordinator, transport.clone(), "https://api.test/v1"),
        transport,
    )
}

fn url(transport: &ScriptedTransport, index: usize) -> String {
    transport.requests.lock().unwrap()[index].url.clone()
}

#[tokio::test]
async fn test_album_details() {
    let body = r#"{
        "id": "a1",
        "name": "Kind of Blue",
        "release_date": "1959-08-17",
        "artists": [{"id": "m1", "name": "Miles Davis"}],
        "tracks": {"items": [
            {"id": "t1", "name": "So What", "uri": "spotify:track:t1", "duration_ms": 562000},
            {"id": "t2", "name": "Freddie Freeloader", "uri": "spotify:track:t2"}
        ]}
    }"#;
    let (dispatcher, transport) = signed_in(&[(StatusCode::OK, body)]).await;

    let album = library::album_details(&dispatcher, "a1").await.unwrap();

    assert_eq!(album.name, "Kind of Blue");
    assert_eq!(album.artists[0].name, "Miles Davis");
    assert_eq!(album.tracks.items.len(), 2);
    assert_eq!(album.tracks.items[0].duration_ms, Some(562000));
    assert_eq!(url(&transport, 0), "https://api.test/v1/albums/a1");
}

#[tokio::test]
async fn test_search_flattens_in_order() {
    let body = r#"{
        "tracks": {"items": [{"id": "t1", "name": "So What", "uri": "spotify:track:t1"}]},
        "albums": {"items": [{"id": "a1", "name": "Kind of Blue"}]},
        "artists": {"items": [{"id": "m1", "name": "Miles Davis"}]},
        "playlists": {"items": [
            null,
            {"id": "p1", "name": "Jazz Classics", "owner": {"id": "spotify"}}
        ]}
    }"#;
    let (dispatcher, transport) = signed_in(&[(StatusCode::OK, body)]).await;

    let hits = search::search(&dispatcher, "kind of blue", 10).await.unwrap();

    assert_eq!(hits.len(), 4);
    assert!(matches!(&hits[0], SearchResult::Track(t) if t.name == "So What"));
    assert!(matches!(&hits[1], SearchResult::Album(a) if a.id == "a1"));
    assert!(matches!(&hits[2], SearchResult::Artist(a) if a.name == "Miles Davis"));
    assert!(matches!(&hits[3], SearchResult::Playlist(p) if p.id == "p1"));
    assert_eq!(
        url(&transport, 0),
        "https://api.test/v1/search?q=kind+of+blue&type=album%2Cartist%2Cplaylist%2Ctrack&limit=10"
    );
}

#[tokio::test]
async fn test_search_without_hits() {
    let (dispatcher, _) = signed_in(&[(StatusCode::OK, r#"{"tracks": {"items": []}}"#)]).await;

    assert!(search::search(&dispatcher, "zzzz", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_are_encoded() {
    let snapshot = r#"{"snapshot_id":"s1"}"#;
    let (dispatcher, transport) = signed_in(&[
        (StatusCode::OK, ""),
        (StatusCode::OK, snapshot),
        (StatusCode::OK, snapshot),
    ])
    .await;

    library::save_album(&dispatcher, "a1&ids=a2").await.unwrap();
    library::add_tracks(&dispatcher, "../me", vec![]).await.unwrap();
    library::remove_tracks(&dispatcher, "p 1", vec![]).await.unwrap();

    assert_eq!(url(&transport, 0), "https://api.test/v1/me/albums?ids=a1%26ids%3Da2");
    assert_eq!(url(&transport, 1), "https://api.test/v1/playlists/..%2Fme/tracks");
    assert_eq!(url(&transport, 2), "https://api.test/v1/playlists/p%201/tracks");
}

#[tokio::test]
async fn test_browse_endpoints() {
    let (dispatcher, transport) = signed_in(&[
        (
            StatusCode::OK,
            r#"{"categories": {"items": [{"id": "toplists", "name": "Top Lists"}]}}"#,
        ),
        (
            StatusCode::OK,
            r#"{"message": "Monday picks", "playlists": {"items": [
                {"id": "p1", "name": "Today's Top Hits", "owner": {"id": "spotify"}},
                null
            ]}}"#,
        ),
        (StatusCode::OK, r#"{"genres": ["jazz", "soul"]}"#),
        (
            StatusCode::OK,
            r#"{"tracks": [{"id": "t1", "name": "So What", "uri": "spotify:track:t1"}]}"#,
        ),
    ])
    .await;

    let categories = browse::categories(&dispatcher, 50).await.unwrap();
    assert_eq!(categories[0].id, "toplists");

    let (message, playlists) = browse::featured_playlists(&dispatcher, 20).await.unwrap();
    assert_eq!(message.as_deref(), Some("Monday picks"));
    assert_eq!(playlists.len(), 1);

    assert_eq!(browse::genre_seeds(&dispatcher).await.unwrap(), ["jazz", "soul"]);

    let genres = vec!["jazz".to_string(), "soul".to_string()];
    let tracks = browse::recommendations(&dispatcher, &genres, 20).await.unwrap();
    assert_eq!(tracks[0].uri, "spotify:track:t1");

    assert_eq!(url(&transport, 0), "https://api.test/v1/browse/categories?limit=50");
    assert_eq!(
        url(&transport, 1),
        "https://api.test/v1/browse/featured-playlists?limit=20"
    );
    assert_eq!(
        url(&transport, 3),
        "https://api.test/v1/recommendations?limit=20&seed_genres=jazz%2Csoul"
    );
}

#[tokio::test]
async fn test_category_playlists() {
    let body = r#"{"playlists": {"items": [
        {"id": "p1", "name": "Jazz Classics", "owner": {"id": "spotify"}, "tracks": {"total": 80}}
    ]}}"#;
    let (dispatcher, transport) = signed_in(&[(StatusCode::OK, body)]).await;

    let playlists = browse::category_playlists(&dispatcher, "jazz", 20).await.unwrap();

    assert_eq!(playlists[0].name, "Jazz Classics");
    assert_eq!(
        url(&transport, 0),
        "https://api.test/v1/browse/categories/jazz/playlists?limit=20"
    );
}
