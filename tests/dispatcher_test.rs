mod common;

use std::sync::Arc;

use reqwest::{Method, StatusCode, header::HeaderMap};
use spotauth::{
    error::{RequestError, TransportError},
    spotify::{RefreshCoordinator, RequestDispatcher, library, player, profile},
    types::Credential,
};

use common::{ScriptedExchange, ScriptedTransport, auth_response, clock, credential, seeded_store};

const API: &str = "https://api.test/v1";

async fn setup(
    seed: Option<Credential>,
    exchange: ScriptedExchange,
    transport: ScriptedTransport,
) -> (RequestDispatcher, Arc<ScriptedExchange>, Arc<ScriptedTransport>) {
    let (store, _) = seeded_store(clock(), seed).await;
    let exchange = Arc::new(exchange);
    let transport = Arc::new(transport);
    let coordinator = RefreshCoordinator::new(store, exchange.clone());
    (
        RequestDispatcher::new(coordinator, transport.clone(), API),
        exchange,
        transport,
    )
}

fn fresh() -> Option<Credential> {
    Some(credential(&clock(), Some("AT1"), Some("RT1"), 3600))
}

#[tokio::test]
async fn test_attaches_bearer_token() {
    let (dispatcher, exchange, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::OK, r#"{"id":"wizzler"}"#),
    )
    .await;

    let me = profile::current_user(&dispatcher).await.unwrap();

    assert_eq!(me.id, "wizzler");
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.authorization(0), "Bearer AT1");
    assert_eq!(transport.requests.lock().unwrap()[0].url, "https://api.test/v1/me");
    assert_eq!(exchange.refresh_calls(), 0);
}

#[tokio::test]
async fn test_resolve_endpoints() {
    let (dispatcher, _, _) =
        setup(fresh(), ScriptedExchange::new(), ScriptedTransport::new()).await;

    assert_eq!(dispatcher.resolve("/me"), "https://api.test/v1/me");
    assert_eq!(dispatcher.resolve("me"), "https://api.test/v1/me");
    assert_eq!(
        dispatcher.resolve("https://api.test/v1/me/albums?offset=50"),
        "https://api.test/v1/me/albums?offset=50"
    );
}

#[tokio::test]
async fn test_refreshes_stale_token_before_call() {
    let (dispatcher, exchange, transport) = setup(
        Some(credential(&clock(), Some("AT1"), Some("RT1"), 60)),
        ScriptedExchange::new().on_refresh(Ok(auth_response("AT2", None, 3600))),
        ScriptedTransport::new().respond(StatusCode::OK, r#"{"id":"wizzler"}"#),
    )
    .await;

    profile::current_user(&dispatcher).await.unwrap();

    assert_eq!(exchange.refresh_calls(), 1);
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.authorization(0), "Bearer AT2");
}

#[tokio::test]
async fn test_retries_once_after_unauthorized() {
    let (dispatcher, exchange, transport) = setup(
        fresh(),
        ScriptedExchange::new().on_refresh(Ok(auth_response("AT2", None, 3600))),
        ScriptedTransport::new()
            .respond(StatusCode::UNAUTHORIZED, "")
            .respond(StatusCode::OK, r#"{"id":"wizzler"}"#),
    )
    .await;

    let me = profile::current_user(&dispatcher).await.unwrap();

    assert_eq!(me.id, "wizzler");
    assert_eq!(exchange.refresh_calls(), 1);
    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.authorization(0), "Bearer AT1");
    assert_eq!(transport.authorization(1), "Bearer AT2");
}

#[tokio::test]
async fn test_second_unauthorized_is_final() {
    let (dispatcher, exchange, transport) = setup(
        fresh(),
        ScriptedExchange::new().on_refresh(Ok(auth_response("AT2", None, 3600))),
        ScriptedTransport::new()
            .respond(StatusCode::UNAUTHORIZED, "")
            .respond(StatusCode::UNAUTHORIZED, ""),
    )
    .await;

    let result = profile::current_user(&dispatcher).await;

    assert!(matches!(result, Err(RequestError::Unauthenticated(_))));
    assert_eq!(exchange.refresh_calls(), 1);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_failed_forced_refresh_is_unauthenticated() {
    let (dispatcher, _, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::UNAUTHORIZED, ""),
    )
    .await;

    let result = profile::current_user(&dispatcher).await;

    assert!(matches!(result, Err(RequestError::Unauthenticated(_))));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_signed_out_makes_no_call() {
    let (dispatcher, exchange, transport) =
        setup(None, ScriptedExchange::new(), ScriptedTransport::new()).await;

    let result = profile::current_user(&dispatcher).await;

    assert!(matches!(result, Err(RequestError::Unauthenticated(_))));
    assert_eq!(transport.calls(), 0);
    assert_eq!(exchange.refresh_calls(), 0);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (dispatcher, exchange, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
    )
    .await;

    let result = dispatcher
        .send(Method::GET, "/me", None, HeaderMap::new())
        .await;

    assert_eq!(
        result.unwrap_err(),
        RequestError::Transport {
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            body: Some("boom".to_string()),
        }
    );
    assert_eq!(transport.calls(), 1);
    assert_eq!(exchange.refresh_calls(), 0);
}

#[tokio::test]
async fn test_transport_failure() {
    let (dispatcher, _, _) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().fail(TransportError::timeout("request timed out")),
    )
    .await;

    let result = profile::current_user(&dispatcher).await;

    assert_eq!(
        result.unwrap_err(),
        RequestError::Transport {
            status: None,
            body: Some("request timed out".to_string()),
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (dispatcher, _, _) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::OK, "<html>"),
    )
    .await;

    let result = profile::current_user(&dispatcher).await;

    assert!(matches!(result, Err(RequestError::Decode(_))));
}

#[tokio::test]
async fn test_nothing_playing() {
    let (dispatcher, _, _) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::NO_CONTENT, ""),
    )
    .await;

    assert!(player::currently_playing(&dispatcher).await.unwrap().is_none());
}

#[tokio::test]
async fn test_currently_playing_track() {
    let body = r#"{
        "is_playing": true,
        "progress_ms": 1000,
        "item": {"id": "t1", "name": "Song", "uri": "spotify:track:t1", "duration_ms": 200000}
    }"#;
    let (dispatcher, _, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::OK, body),
    )
    .await;

    let playing = player::currently_playing(&dispatcher)
        .await
        .unwrap()
        .unwrap();

    assert!(playing.is_playing);
    assert_eq!(playing.item.unwrap().name, "Song");
    assert_eq!(
        transport.requests.lock().unwrap()[0].url,
        "https://api.test/v1/me/player/currently-playing"
    );
}

#[tokio::test]
async fn test_json_body_is_sent() {
    let (dispatcher, _, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::CREATED, r#"{"snapshot_id":"s1"}"#),
    )
    .await;

    let snapshot = library::add_tracks(&dispatcher, "p1", vec!["spotify:track:t1".to_string()])
        .await
        .unwrap();

    assert_eq!(snapshot.snapshot_id, "s1");
    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].url, "https://api.test/v1/playlists/p1/tracks");
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        requests[0].body.as_deref(),
        Some(br#"{"uris":["spotify:track:t1"]}"#.as_slice())
    );
}

#[tokio::test]
async fn test_empty_response_commands() {
    let (dispatcher, _, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new()
            .respond(StatusCode::NO_CONTENT, "")
            .respond(StatusCode::NO_CONTENT, ""),
    )
    .await;

    player::pause(&dispatcher).await.unwrap();
    player::skip_to_next(&dispatcher).await.unwrap();

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::PUT);
    assert!(requests[0].body.is_none());
    assert_eq!(requests[1].url, "https://api.test/v1/me/player/next");
}

#[tokio::test]
async fn test_remove_tracks_sends_delete_with_body() {
    let (dispatcher, _, transport) = setup(
        fresh(),
        ScriptedExchange::new(),
        ScriptedTransport::new().respond(StatusCode::OK, r#"{"snapshot_id":"s2"}"#),
    )
    .await;

    library::remove_tracks(&dispatcher, "p1", vec!["spotify:track:t1".to_string()])
        .await
        .unwrap();

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(
        requests[0].body.as_deref(),
        Some(br#"{"tracks":[{"uri":"spotify:track:t1"}]}"#.as_slice())
    );
}

#[tokio::test]
async fn test_retry_over_http() {
    use std::time::Duration;

    use spotauth::spotify::ReqwestTransport;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer AT1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer AT2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"wizzler"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let (store, _) = seeded_store(clock(), fresh()).await;
    let exchange = Arc::new(
        ScriptedExchange::new().on_refresh(Ok(auth_response("AT2", None, 3600))),
    );
    let coordinator = RefreshCoordinator::new(store.clone(), exchange.clone());
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());
    let api_url = format!("{}/v1/", server.uri());
    let dispatcher = RequestDispatcher::new(coordinator, transport, api_url);

    let me = profile::current_user(&dispatcher).await.unwrap();

    assert_eq!(me.id, "wizzler");
    assert_eq!(exchange.refresh_calls(), 1);
    assert_eq!(store.access_token().as_deref(), Some("AT2"));
}

#[tokio::test]
async fn test_concurrent_unauthorized_share_one_refresh() {
    let mut transport = ScriptedTransport::new();
    for _ in 0..5 {
        transport = transport.respond(StatusCode::UNAUTHORIZED, "");
    }
    for _ in 0..5 {
        transport = transport.respond(StatusCode::OK, "{}");
    }
    let (dispatcher, exchange, transport) = setup(
        fresh(),
        ScriptedExchange::new()
            .with_delay(std::time::Duration::from_millis(50))
            .on_refresh(Ok(auth_response("AT2", None, 3600))),
        transport,
    )
    .await;

    let mut requests = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let dispatcher = dispatcher.clone();
        requests.spawn(async move {
            dispatcher
                .send(Method::GET, "/me", None, HeaderMap::new())
                .await
        });
    }
    while let Some(result) = requests.join_next().await {
        assert_eq!(result.unwrap().unwrap().status, StatusCode::OK);
    }

    assert_eq!(exchange.refresh_calls(), 1);
    assert_eq!(transport.calls(), 10);
    for retry in 5..10 {
        assert_eq!(transport.authorization(retry), "Bearer AT2");
    }
}
