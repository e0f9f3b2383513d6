//! Authy phone verification API client.

use super::{Provider, VerificationOutcome};
use crate::error::RelayError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const API_KEY_HEADER: &str = "X-Authy-API-Key";
const MISSING_KEY_MESSAGE: &str = "AUTHY_API_KEY must be set";

/// Authy already answers in the normalized shape; it is passed through
/// unchanged.
#[derive(Debug, Deserialize)]
struct AuthyEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    success: bool,
}

impl From<AuthyEnvelope> for VerificationOutcome {
    fn from(envelope: AuthyEnvelope) -> Self {
        Self {
            message: envelope.message,
            success: envelope.success,
        }
    }
}

/// Client for the Authy phone verification API.
///
/// The API key is optional at construction; a missing key short-circuits
/// each call with a normalized error instead of an outbound request.
#[derive(Clone)]
pub struct AuthyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AuthyClient {
    /// Create a new Authy client with a bounded outbound timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

#[async_trait]
impl Provider for AuthyClient {
    fn name(&self) -> &'static str {
        "authy"
    }

    #[instrument(skip(self))]
    async fn start(
        &self,
        via: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError> {
        let Some(api_key) = self.api_key() else {
            warn!("AUTHY_API_KEY not configured, refusing to start verification");
            return Ok(VerificationOutcome {
                message: MISSING_KEY_MESSAGE.to_string(),
                success: false,
            });
        };

        let url = format!("{}/protected/json/phones/verification/start", self.base_url);

        debug!(url = %url, "Sending verification start request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .form(&[
                ("via", via),
                ("phone_number", phone_number),
                ("country_code", country_code),
            ])
            .send()
            .await?;

        let envelope: AuthyEnvelope = response
            .json()
            .await
            .map_err(|e| RelayError::InvalidResponse(format!("Authy start reply: {}", e)))?;

        Ok(envelope.into())
    }

    #[instrument(skip(self, code))]
    async fn check(
        &self,
        code: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError> {
        let Some(api_key) = self.api_key() else {
            warn!("AUTHY_API_KEY not configured, refusing to check verification");
            return Ok(VerificationOutcome {
                message: MISSING_KEY_MESSAGE.to_string(),
                success: false,
            });
        };

        let url = format!("{}/protected/json/phones/verification/check", self.base_url);

        debug!(url = %url, "Sending verification check request");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("verification_code", code),
                ("phone_number", phone_number),
                ("country_code", country_code),
            ])
            .send()
            .await?;

        let envelope: AuthyEnvelope = response
            .json()
            .await
            .map_err(|e| RelayError::InvalidResponse(format!("Authy check reply: {}", e)))?;

        Ok(envelope.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_without_key() {
        let client = AuthyClient::new("https://api.authy.com", None, Duration::from_secs(2));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn missing_key_short_circuits_start() {
        let client =
            AuthyClient::new("http://localhost:9", None, Duration::from_secs(2)).unwrap();
        let outcome = client.start("sms", "5551234", "1").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "AUTHY_API_KEY must be set");
    }

    #[tokio::test]
    async fn missing_key_short_circuits_check() {
        let client =
            AuthyClient::new("http://localhost:9", None, Duration::from_secs(2)).unwrap();
        let outcome = client.check("000000", "5551234", "1").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "AUTHY_API_KEY must be set");
    }
}
