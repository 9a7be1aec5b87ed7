//! HTTP relay mailer.
//!
//! Posts each email as JSON to a transactional-mail relay endpoint and treats
//! any non-success status as a rejected delivery.

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::mailer::{
    domain::OutgoingEmail,
    ports::{EmailDeliveryError, EmailDeliveryResult, EmailSender},
};

/// Configuration for [`HttpRelayMailer`].
#[derive(Debug, Clone)]
pub struct HttpRelayConfig {
    /// Relay endpoint receiving `POST` requests.
    pub endpoint: Url,
    /// Sender address placed in the `from` field.
    pub from_address: String,
    /// Bearer token for the relay, if it requires one.
    pub api_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    html: bool,
}

/// Mailer delivering through an HTTP relay.
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    client: Client,
    config: HttpRelayConfig,
}

impl HttpRelayMailer {
    /// Creates a relay mailer.
    ///
    /// # Errors
    ///
    /// Returns [`EmailDeliveryError::Transport`] when the HTTP client cannot
    /// be built.
    pub fn new(config: HttpRelayConfig) -> EmailDeliveryResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(EmailDeliveryError::transport)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailSender for HttpRelayMailer {
    async fn send(&self, email: &OutgoingEmail) -> EmailDeliveryResult<()> {
        let payload = RelayPayload {
            from: &self.config.from_address,
            to: email.to().as_str(),
            subject: email.subject(),
            body: email.body(),
            html: email.is_html(),
        };

        let mut request = self
            .client
            .post(self.config.endpoint.clone())
            .json(&payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(EmailDeliveryError::transport)?;
        let status = response.status();
        if status.is_success() {
            debug!(to = %email.to(), %status, "email accepted by relay");
            return Ok(());
        }

        let reason = response.text().await.unwrap_or_default();
        Err(EmailDeliveryError::Rejected {
            status: status.as_u16(),
            reason,
        })
    }
}
