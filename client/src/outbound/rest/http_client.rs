//! Reqwest-backed wallet API client.
//!
//! This adapter owns transport details only: request serialisation, timeout and
//! HTTP error mapping, and decoding the `{ success, data, message, code }`
//! envelope.

use std::time::Duration;

use async_trait::async_trait;
use pagination::{Envelope, EnvelopeError};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::Endpoint;
use super::dto::{LoginBody, LoginDataDto, TokenBody, VipProfileDto};
use crate::domain::ports::{ApiError, AuthGateway, VipProfile, VipProfileSource};
use crate::domain::{LoginCredentials, SessionToken};

/// Envelope codes the server uses for a dead token.
const SESSION_EXPIRED_CODES: [&str; 2] = ["session_expired", "token_invalid"];

/// Wallet API client bound to one base URL.
pub struct RestApiClient {
    client: Client,
    base_url: Url,
}

impl RestApiClient {
    /// Build a client with an explicit request timeout.
    /// ```rust,ignore
    /// let client = RestApiClient::new(base_url, Duration::from_secs(15), "wallet-feed/0.1");
    /// assert!(client.is_ok() || client.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Absolute URL for `endpoint`.
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.path())
            .map_err(|error| ApiError::transport(format!("invalid endpoint URL: {error}")))
    }

    /// POST `body` to `endpoint` and decode the envelope payload.
    pub(super) async fn post<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self.send(endpoint, body).await?;
        envelope.into_result().map_err(map_envelope_error)
    }

    /// POST `body` to a list endpoint; a successful envelope without data is
    /// an empty page.
    pub(super) async fn post_page<B, T>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<Vec<T>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let envelope: Envelope<Vec<T>> = self.send(endpoint, body).await?;
        envelope.into_page().map_err(map_envelope_error)
    }

    async fn send<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url_for(endpoint)?;
        debug!(endpoint = endpoint.path(), "sending request");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        parse_envelope(bytes.as_ref())
    }
}

#[async_trait]
impl AuthGateway for RestApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, ApiError> {
        let body = LoginBody {
            account: credentials.account(),
            account_type: credentials.account_kind().into(),
            password: credentials.password(),
        };
        let data: LoginDataDto = self.post(Endpoint::Login, &body).await?;
        SessionToken::new(data.token)
            .map_err(|_| ApiError::decode("login response carried an empty token"))
    }
}

#[async_trait]
impl VipProfileSource for RestApiClient {
    async fn fetch_profile(&self, token: &SessionToken) -> Result<VipProfile, ApiError> {
        let body = TokenBody {
            token: token.expose(),
        };
        let dto: VipProfileDto = self.post(Endpoint::VipProfile, &body).await?;
        Ok(dto.into())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Envelope<T>, ApiError> {
    serde_json::from_slice(body)
        .map_err(|error| ApiError::decode(format!("invalid envelope JSON: {error}")))
}

fn map_envelope_error(error: EnvelopeError) -> ApiError {
    match error {
        EnvelopeError::Rejected { code, message }
            if code
                .as_deref()
                .is_some_and(|code| SESSION_EXPIRED_CODES.contains(&code)) =>
        {
            ApiError::session_expired(message)
        }
        EnvelopeError::Rejected { message, .. } => ApiError::rejected(message),
        EnvelopeError::MissingData => ApiError::decode(error.to_string()),
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED => ApiError::session_expired(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::timeout(message),
        _ if status.is_client_error() => ApiError::rejected(message),
        _ => ApiError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
