//! Twilio Verify API client.

use super::{full_phone_number, Provider, VerificationOutcome};
use crate::error::RelayError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Verification resource returned by the Verify API.
#[derive(Debug, Deserialize)]
struct VerificationResource {
    #[serde(default)]
    status: String,
    #[serde(default)]
    to: String,
}

/// Client for the Twilio Verify API.
///
/// Both calls are form-encoded POSTs authenticated with HTTP Basic
/// (account SID / auth token).
#[derive(Clone)]
pub struct VerifyClient {
    client: Client,
    base_url: String,
    service_sid: String,
    account_sid: String,
    auth_token: String,
}

impl VerifyClient {
    /// Create a new Verify client with a bounded outbound timeout.
    pub fn new(
        base_url: impl Into<String>,
        service_sid: String,
        account_sid: String,
        auth_token: String,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            service_sid,
            account_sid,
            auth_token,
        })
    }
}

#[async_trait]
impl Provider for VerifyClient {
    fn name(&self) -> &'static str {
        "verify"
    }

    #[instrument(skip(self))]
    async fn start(
        &self,
        via: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError> {
        let to = full_phone_number(country_code, phone_number);
        let url = format!(
            "{}/Services/{}/Verifications",
            self.base_url, self.service_sid
        );

        debug!(url = %url, to = %to, "Sending verification start request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Channel", via), ("To", to.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Provider(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "Verify start rejected");
            return Ok(VerificationOutcome {
                message: body,
                success: false,
            });
        }

        let resource: VerificationResource = serde_json::from_str(&body)
            .map_err(|e| RelayError::InvalidResponse(format!("Verification resource: {}", e)))?;

        if resource.status == "pending" {
            Ok(VerificationOutcome {
                message: format!("Token sent to {}", resource.to),
                success: true,
            })
        } else {
            warn!(status = %resource.status, "Unexpected verification status");
            Ok(VerificationOutcome {
                message: "Error sending verification token".to_string(),
                success: false,
            })
        }
    }

    #[instrument(skip(self, code))]
    async fn check(
        &self,
        code: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError> {
        let to = full_phone_number(country_code, phone_number);
        let url = format!(
            "{}/Services/{}/VerificationCheck",
            self.base_url, self.service_sid
        );

        debug!(url = %url, to = %to, "Sending verification check request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Code", code), ("To", to.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Provider(format!("Failed to read response body: {}", e)))?;

        // Anything that is not a decodable "approved" counts as incorrect,
        // including provider-side rejections of the request itself.
        let approved = match serde_json::from_str::<VerificationResource>(&body) {
            Ok(resource) => resource.status == "approved",
            Err(e) => {
                warn!(status = %status, error = %e, "Undecodable verification check reply");
                false
            }
        };

        if approved {
            Ok(VerificationOutcome {
                message: "Correct token!".to_string(),
                success: true,
            })
        } else {
            Ok(VerificationOutcome {
                message: "Incorrect token.".to_string(),
                success: false,
            })
        }
    }
}
