use std::sync::Arc;

use crate::{
    Res,
    clock::{Clock, SystemClock},
    config::Settings,
    error::StorageError,
    management::{CredentialStorage, FileStorage, TokenStore},
    spotify::{
        HttpTransport, RefreshCoordinator, ReqwestTransport, RequestDispatcher, TokenExchanger,
    },
};

/// The wired-up token store, coordinator and dispatcher for one account.
#[derive(Clone)]
pub struct Session {
    pub settings: Settings,
    pub store: Arc<TokenStore>,
    pub coordinator: RefreshCoordinator,
    pub dispatcher: RequestDispatcher,
}

impl Session {
    /// Opens the session backed by the credential file and reqwest.
    pub async fn open(settings: Settings) -> Res<Self> {
        let transport = Arc::new(ReqwestTransport::new(settings.request_timeout)?);
        let session = Self::with_parts(
            settings,
            Arc::new(FileStorage::new()),
            Arc::new(SystemClock),
            transport,
        )
        .await?;
        Ok(session)
    }

    /// Builds a session from explicit collaborators.
    pub async fn with_parts(
        settings: Settings,
        storage: Arc<dyn CredentialStorage>,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, StorageError> {
        let store = Arc::new(TokenStore::load(storage, clock).await?);
        let exchanger = Arc::new(TokenExchanger::new(&settings, Arc::clone(&transport)));
        let coordinator = RefreshCoordinator::new(Arc::clone(&store), exchanger);
        let dispatcher =
            RequestDispatcher::new(coordinator.clone(), transport, settings.api_url.clone());

        Ok(Self {
            settings,
            store,
            coordinator,
            dispatcher,
        })
    }
}
