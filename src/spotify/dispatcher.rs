use std::sync::Arc;

use reqwest::{
    Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    error::RequestError,
    spotify::{
        refresh::RefreshCoordinator,
        transport::{HttpRequest, HttpResponse, HttpTransport},
    },
};

/// Retries allowed after the API answers 401.
const MAX_UNAUTHORIZED_RETRIES: u8 = 1;

/// Sends Web API calls with a valid bearer token attached.
#[derive(Clone)]
pub struct RequestDispatcher {
    coordinator: RefreshCoordinator,
    transport: Arc<dyn HttpTransport>,
    api_url: String,
}

impl RequestDispatcher {
    pub fn new(
        coordinator: RefreshCoordinator,
        transport: Arc<dyn HttpTransport>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            coordinator,
            transport,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Absolute URLs pass through, anything else is appended to the API base.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.api_url, endpoint)
        } else {
            format!("{}/{}", self.api_url, endpoint)
        }
    }

    /// Issues one authenticated call.
    ///
    /// A 401 triggers one forced refresh and one retry. Any other non-2xx
    /// status is returned as [`RequestError::Transport`] without retrying.
    #[instrument(skip(self, method, body, headers), fields(method = %method))]
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        headers: HeaderMap,
    ) -> Result<HttpResponse, RequestError> {
        let url = self.resolve(endpoint);
        let mut token = self
            .coordinator
            .ensure_valid_token()
            .await
            .map_err(|e| RequestError::Unauthenticated(e.to_string()))?;

        let mut retries = 0;
        loop {
            let mut request = HttpRequest::new(method.clone(), &url);
            request.headers = headers.clone();
            request.headers.insert(AUTHORIZATION, bearer(&token)?);
            request.body = body.clone();

            debug!(url = %url, attempt = retries + 1, "dispatching request");
            let response = self.transport.execute(request).await?;

            if response.status == StatusCode::UNAUTHORIZED {
                if retries >= MAX_UNAUTHORIZED_RETRIES {
                    warn!(url = %url, "token rejected again after refresh");
                    return Err(RequestError::Unauthenticated(
                        "token rejected after refresh".to_string(),
                    ));
                }
                retries += 1;

                token = self
                    .coordinator
                    .force_refresh(&token)
                    .await
                    .map_err(|e| RequestError::Unauthenticated(e.to_string()))?;
                continue;
            }

            if !response.is_success() {
                warn!(url = %url, status = %response.status, "request failed");
                let body = response.text();
                return Err(RequestError::Transport {
                    status: Some(response.status),
                    body: (!body.is_empty()).then_some(body),
                });
            }

            return Ok(response);
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RequestError> {
        let response = self
            .send(Method::GET, endpoint, None, HeaderMap::new())
            .await?;
        decode(&response)
    }

    /// Like [`get_json`](Self::get_json) but maps "204 No Content" and an empty
    /// 2xx body to `None`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, RequestError> {
        let response = self
            .send(Method::GET, endpoint, None, HeaderMap::new())
            .await?;
        let empty = response.body.iter().all(u8::is_ascii_whitespace);
        if response.status == StatusCode::NO_CONTENT || empty {
            return Ok(None);
        }
        decode(&response).map(Some)
    }

    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, RequestError> {
        let response = self.send_with_body(method, endpoint, Some(body)).await?;
        decode(&response)
    }

    /// Sends a call whose response body is not needed.
    pub async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<StatusCode, RequestError> {
        let response = self.send_with_body(method, endpoint, body).await?;
        Ok(response.status)
    }

    async fn send_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse, RequestError> {
        let mut headers = HeaderMap::new();
        let payload = match body {
            Some(body) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(serde_json::to_vec(body).map_err(|e| RequestError::Decode(e.to_string()))?)
            }
            None => None,
        };
        self.send(method, endpoint, payload, headers).await
    }
}

fn bearer(token: &str) -> Result<HeaderValue, RequestError> {
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| {
            RequestError::Unauthenticated("stored token is not a valid header value".into())
        })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, RequestError> {
    response
        .json()
        .map_err(|e| RequestError::Decode(e.to_string()))
}
