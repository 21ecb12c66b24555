//! HTTP client for the offers backend REST API

use crate::backend::AdminBackend;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use offer_admin_core::{Config, Offer, OfferId, OffersEnvelope, User, UsersEnvelope};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, error, info};

/// API client for the offers backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a client from configuration; the token comes from the session
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config, token: Option<String>) -> ClientResult<Self> {
        let mut client = Self::new(config.api.base_url.as_str())
            .with_timeout(Duration::from_secs(config.api.timeout_seconds))?;
        client.token = token;
        Ok(client)
    }

    /// Rebuild the HTTP client with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> ClientResult<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Set the bearer token for admin requests
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a user avatar image
    pub fn avatar_url(&self, file: &str) -> String {
        format!("{}/users/avatar/{}", self.base_url, urlencoding::encode(file))
    }

    /// URL of an offer image
    pub fn offer_image_url(&self, file: &str) -> String {
        format!("{}/offers/images/{}", self.base_url, urlencoding::encode(file))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::status(status.as_u16(), body))
    }

    /// Send an authenticated mutation and log the acknowledgement
    async fn mutate(&self, request: RequestBuilder, action: &str, id: OfferId) -> ClientResult<()> {
        let request = self.authorized(request)?;
        match Self::send(request).await {
            Ok(response) => {
                let ack = response.text().await.unwrap_or_default();
                info!(offer_id = id, action, "Offer {action} request acknowledged");
                debug!(offer_id = id, ack = %ack, "Acknowledgement body");
                Ok(())
            }
            Err(err) => {
                if let ClientError::Status { body, .. } = &err {
                    error!(offer_id = id, action, error = %err, body = %body, "Offer {action} request failed");
                } else {
                    error!(offer_id = id, action, error = %err, "Offer {action} request failed");
                }
                Err(err)
            }
        }
    }

    /// Get every user account
    ///
    /// # Errors
    ///
    /// Returns an error if no token is set, the request fails, or the body
    /// cannot be parsed.
    pub async fn get_users(&self) -> ClientResult<Vec<User>> {
        let request = self.authorized(self.client.get(self.url("/api/users")))?;
        let response = Self::send(request).await?;
        let envelope: UsersEnvelope = serde_json::from_str(&response.text().await?)?;

        debug!(count = envelope.users.len(), "Users fetched successfully");
        Ok(envelope.users)
    }

    /// Get every offer
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    pub async fn get_offers(&self) -> ClientResult<Vec<Offer>> {
        let response = Self::send(self.client.get(self.url("/api/offers"))).await?;
        let envelope: OffersEnvelope = serde_json::from_str(&response.text().await?)?;

        debug!(count = envelope.offers.len(), "Offers fetched successfully");
        Ok(envelope.offers)
    }
}

#[async_trait]
impl AdminBackend for ApiClient {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get_users().await
    }

    async fn list_offers(&self) -> ClientResult<Vec<Offer>> {
        self.get_offers().await
    }

    async fn delete_offer(&self, id: OfferId) -> ClientResult<()> {
        let request = self.client.delete(self.url(&format!("/api/deleteOffer/{id}")));
        self.mutate(request, "delete", id).await
    }

    async fn accept_offer(&self, id: OfferId) -> ClientResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/offers/accept/{id}")))
            .json(&serde_json::json!({}));
        self.mutate(request, "accept", id).await
    }

    async fn reject_offer(&self, id: OfferId) -> ClientResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/offers/reject/{id}")))
            .json(&serde_json::json!({}));
        self.mutate(request, "reject", id).await
    }

    async fn archive_offer(&self, id: OfferId) -> ClientResult<()> {
        let request = self.client.delete(self.url(&format!("/api/offers/archive/{id}")));
        self.mutate(request, "archive", id).await
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
