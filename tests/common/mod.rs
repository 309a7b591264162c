#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use spotauth::{
    clock::ManualClock,
    error::{ExchangeError, TransportError},
    management::{MemoryStorage, TokenStore},
    spotify::{HttpRequest, HttpResponse, HttpTransport, TokenExchange},
    types::{AuthResponse, Credential},
};

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ))
}

pub fn auth_response(access: &str, refresh: Option<&str>, expires_in: u64) -> AuthResponse {
    AuthResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_in,
        scope: None,
        token_type: Some("Bearer".to_string()),
    }
}

/// A credential whose access token expires `expires_in_secs` from the clock's now.
pub fn credential(
    clock: &ManualClock,
    access: Option<&str>,
    refresh: Option<&str>,
    expires_in_secs: i64,
) -> Credential {
    use spotauth::clock::Clock;
    Credential {
        access_token: access.map(str::to_string),
        refresh_token: refresh.map(str::to_string),
        expires_at: Some(clock.now() + chrono::Duration::seconds(expires_in_secs)),
    }
}

pub async fn seeded_store(
    clock: Arc<ManualClock>,
    credential: Option<Credential>,
) -> (Arc<TokenStore>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new(credential));
    let store = TokenStore::load(storage.clone(), clock).await.unwrap();
    (Arc::new(store), storage)
}

/// Token exchange that replays queued outcomes and counts calls.
#[derive(Default)]
pub struct ScriptedExchange {
    pub refresh_calls: AtomicUsize,
    pub code_calls: AtomicUsize,
    pub seen_refresh_tokens: Mutex<Vec<String>>,
    refresh: Mutex<VecDeque<Result<AuthResponse, ExchangeError>>>,
    code: Mutex<VecDeque<Result<AuthResponse, ExchangeError>>>,
    delay: Duration,
    panic_on_refresh: bool,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_refresh: true,
            ..Self::default()
        }
    }

    pub fn on_refresh(self, outcome: Result<AuthResponse, ExchangeError>) -> Self {
        self.refresh.lock().unwrap().push_back(outcome);
        self
    }

    pub fn on_code(self, outcome: Result<AuthResponse, ExchangeError>) -> Self {
        self.code.lock().unwrap().push_back(outcome);
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn code_calls(&self) -> usize {
        self.code_calls.load(Ordering::SeqCst)
    }
}

fn unscripted() -> ExchangeError {
    ExchangeError::Network {
        status: None,
        message: "no scripted response".to_string(),
    }
}

#[async_trait]
impl TokenExchange for ScriptedExchange {
    async fn exchange_authorization_code(
        &self,
        _code: &str,
    ) -> Result<AuthResponse, ExchangeError> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.code.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AuthResponse, ExchangeError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_refresh_tokens
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        tokio::time::sleep(self.delay).await;
        if self.panic_on_refresh {
            panic!("exchange blew up");
        }
        self.refresh.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}

/// HTTP transport that records requests and replays queued responses.
#[derive(Default)]
pub struct ScriptedTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: StatusCode, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.as_bytes().to_vec())));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn authorization(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index]
            .headers
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response")))
    }
}
