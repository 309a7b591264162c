//! Single-flight coordination of every operation that rewrites the credential.
//!
//! A *flight* is one refresh, sign-in or sign-out. While a flight runs, any
//! caller that needs a token is queued as a waiter and receives the flight's
//! outcome when it lands; no second exchange is started. Flights run on their
//! own task so that dropping the caller that started one does not strand the
//! others.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::{
    error::AuthError,
    management::TokenStore,
    spotify::exchange::TokenExchange,
    types::AuthResponse,
    utils,
};

type Outcome = Result<String, AuthError>;

#[derive(Default)]
struct FlightState {
    in_progress: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
}

enum Flight {
    Refresh { refresh_token: String },
    SignIn { code: String },
    SignOut,
}

struct Inner {
    store: Arc<TokenStore>,
    exchanger: Arc<dyn TokenExchange>,
    state: Mutex<FlightState>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn run(&self, flight: Flight) -> Outcome {
        match flight {
            Flight::Refresh { refresh_token } => {
                info!("refreshing access token");
                let response = self
                    .exchanger
                    .exchange_refresh_token(&refresh_token)
                    .await
                    .inspect_err(|e| warn!(error = %e, "token refresh failed"))?;
                self.cache(&response).await;
                Ok(response.access_token)
            }
            Flight::SignIn { code } => {
                info!("exchanging authorization code");
                let response = self
                    .exchanger
                    .exchange_authorization_code(&code)
                    .await
                    .inspect_err(|e| warn!(error = %e, "authorization code exchange failed"))?;
                self.cache(&response).await;
                Ok(response.access_token)
            }
            Flight::SignOut => {
                self.store.clear().await?;
                info!("signed out");
                Err(AuthError::SignedOut)
            }
        }
    }

    async fn cache(&self, response: &AuthResponse) {
        // the in-memory credential is already updated when persisting fails
        if let Err(e) = self.store.cache(response).await {
            warn!(error = %e, "could not persist credential, keeping it in memory");
        }
    }
}

/// Returns the coordinator to idle and resolves every waiter, also when the
/// flight task unwinds.
struct FlightGuard {
    inner: Arc<Inner>,
    outcome: Option<Outcome>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(Err(AuthError::Interrupted));
        let waiters = {
            let mut state = self.inner.lock_state();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };

        debug!(waiters = waiters.len(), ok = outcome.is_ok(), "flight finished");
        for waiter in waiters {
            // a closed receiver is a caller that gave up
            let _ = waiter.send(outcome.clone());
        }
    }
}

enum Slot {
    Queued(oneshot::Receiver<Outcome>),
    Leading(oneshot::Receiver<Outcome>),
}

/// Hands out valid access tokens, refreshing them at most once at a time.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<TokenStore>, exchanger: Arc<dyn TokenExchange>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                exchanger,
                state: Mutex::new(FlightState::default()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.inner.store
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.lock_state().in_progress
    }

    /// Returns a token that is not within the refresh skew of its expiry.
    ///
    /// # Errors
    ///
    /// [`AuthError::NoRefreshToken`] when the token is stale and nothing can
    /// renew it, otherwise the shared outcome of the refresh.
    pub async fn ensure_valid_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.inner.store.valid_access_token() {
            return Ok(token);
        }
        self.refresh(None).await
    }

    /// Refreshes even though the clock says `rejected` is still valid.
    ///
    /// If the stored token already differs from `rejected`, someone else
    /// refreshed in the meantime and that token is returned instead.
    pub async fn force_refresh(&self, rejected: &str) -> Result<String, AuthError> {
        self.refresh(Some(rejected)).await
    }

    async fn refresh(&self, rejected: Option<&str>) -> Result<String, AuthError> {
        let receiver = {
            let mut state = self.inner.lock_state();
            if state.in_progress {
                debug!("joining in-flight refresh");
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                rx
            } else {
                let store = &self.inner.store;
                if let Some(token) = store.valid_access_token() {
                    if rejected.is_none_or(|rejected| rejected != token) {
                        return Ok(token);
                    }
                }

                let Some(refresh_token) = store.refresh_token() else {
                    warn!("access token needs a refresh but no refresh token is stored");
                    return Err(AuthError::NoRefreshToken);
                };
                if let Some(rejected) = rejected {
                    debug!(
                        token = %utils::mask_token(rejected),
                        "server rejected token, forcing refresh"
                    );
                }
                self.start_flight(&mut state, Flight::Refresh { refresh_token })
            }
        };

        Self::outcome(receiver).await
    }

    /// Exchanges an authorization code and stores the resulting credential.
    ///
    /// Waits for a running refresh first, and refreshes requested meanwhile
    /// receive the new token.
    pub async fn complete_sign_in(&self, code: &str) -> Result<(), AuthError> {
        self.lead(|| Flight::SignIn {
            code: code.to_string(),
        })
        .await
        .map(|_| ())
    }

    /// Clears the credential once no other flight is running.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.lead(|| Flight::SignOut).await {
            Ok(_) | Err(AuthError::SignedOut) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn lead(&self, flight: impl Fn() -> Flight) -> Outcome {
        loop {
            let slot = {
                let mut state = self.inner.lock_state();
                if state.in_progress {
                    let (tx, rx) = oneshot::channel();
                    state.waiters.push(tx);
                    Slot::Queued(rx)
                } else {
                    Slot::Leading(self.start_flight(&mut state, flight()))
                }
            };

            match slot {
                Slot::Queued(rx) => {
                    debug!("waiting for running flight before taking over");
                    let _ = rx.await;
                }
                Slot::Leading(rx) => return Self::outcome(rx).await,
            }
        }
    }

    fn start_flight(
        &self,
        state: &mut FlightState,
        flight: Flight,
    ) -> oneshot::Receiver<Outcome> {
        state.in_progress = true;
        let (tx, rx) = oneshot::channel();
        state.waiters.push(tx);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut guard = FlightGuard {
                inner: Arc::clone(&inner),
                outcome: None,
            };
            guard.outcome = Some(inner.run(flight).await);
        });
        rx
    }

    async fn outcome(receiver: oneshot::Receiver<Outcome>) -> Outcome {
        receiver.await.unwrap_or(Err(AuthError::Interrupted))
    }
}
