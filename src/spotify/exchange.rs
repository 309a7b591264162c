use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Method,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use tracing::{debug, warn};

use crate::{
    config::Settings,
    error::ExchangeError,
    spotify::transport::{HttpRequest, HttpTransport},
    types::AuthResponse,
    utils,
};

/// The two grants the session needs from the token endpoint.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange_authorization_code(&self, code: &str) -> Result<AuthResponse, ExchangeError>;

    /// The response may omit `refresh_token`, meaning the old one stays valid.
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AuthResponse, ExchangeError>;
}

/// Talks to `POST /api/token` with client credentials in a Basic header.
///
/// Holds no token state; storing the outcome is up to the caller.
pub struct TokenExchanger {
    transport: Arc<dyn HttpTransport>,
    token_url: String,
    redirect_uri: String,
    basic_auth: String,
}

impl TokenExchanger {
    pub fn new(settings: &Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token_url: settings.token_url.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            basic_auth: format!(
                "Basic {}",
                utils::basic_credentials(&settings.client_id, &settings.client_secret)
            ),
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<AuthResponse, ExchangeError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();

        let mut request = HttpRequest::new(Method::POST, &self.token_url);
        request.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        request.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.basic_auth).map_err(|e| ExchangeError::Network {
                status: None,
                message: format!("invalid client credentials header: {e}"),
            })?,
        );
        request.body = Some(body.into_bytes());

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            warn!(status = %response.status, "token endpoint rejected the request");
            return Err(ExchangeError::Network {
                status: Some(response.status),
                message: response.text(),
            });
        }

        let token: AuthResponse = response
            .json()
            .map_err(|e| ExchangeError::Decode(e.to_string()))?;
        debug!(
            access_token = %utils::mask_token(&token.access_token),
            expires_in = token.expires_in,
            "token endpoint issued a token"
        );
        Ok(token)
    }
}

#[async_trait]
impl TokenExchange for TokenExchanger {
    async fn exchange_authorization_code(&self, code: &str) -> Result<AuthResponse, ExchangeError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AuthResponse, ExchangeError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
