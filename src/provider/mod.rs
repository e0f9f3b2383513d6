//! Provider backends for OTP delivery and verification.

mod authy;
mod verify;

pub use authy::AuthyClient;
pub use verify::VerifyClient;

use crate::config::{Config, ProviderKind};
use crate::error::RelayError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The normalized result of a provider call.
///
/// This is the only shape the caller ever sees, regardless of backend.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub message: String,
    pub success: bool,
}

/// A provider backend able to start and check phone verifications.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Backend name, for health reporting and logs.
    fn name(&self) -> &'static str;

    /// Send an OTP to the phone number over the given channel (sms/call).
    async fn start(
        &self,
        via: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError>;

    /// Ask the provider whether a user-submitted code is valid.
    async fn check(
        &self,
        code: &str,
        phone_number: &str,
        country_code: &str,
    ) -> Result<VerificationOutcome, RelayError>;
}

/// Compose the E.164-style number sent to the provider.
///
/// No validation happens here; malformed input is passed through and the
/// provider is the sole authority on rejecting it.
pub fn full_phone_number(country_code: &str, phone_number: &str) -> String {
    format!("+{country_code}{phone_number}")
}

/// Build the configured provider backend.
pub fn from_config(config: &Config) -> Result<Arc<dyn Provider>, RelayError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    match config.provider {
        ProviderKind::Verify => {
            // Config::validate has already established these are present.
            let service_sid = config.verify_service_sid.clone().ok_or_else(|| {
                RelayError::Internal("VERIFY_SERVICE_SID missing after validation".into())
            })?;
            let account_sid = config.twilio_account_sid.clone().ok_or_else(|| {
                RelayError::Internal("TWILIO_ACCOUNT_SID missing after validation".into())
            })?;
            let auth_token = config.twilio_auth_token.clone().ok_or_else(|| {
                RelayError::Internal("TWILIO_AUTH_TOKEN missing after validation".into())
            })?;

            Ok(Arc::new(VerifyClient::new(
                &config.verify_base_url,
                service_sid,
                account_sid,
                auth_token,
                timeout,
            )?))
        }
        ProviderKind::Authy => Ok(Arc::new(AuthyClient::new(
            &config.authy_base_url,
            config.authy_api_key.clone(),
            timeout,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_full_phone_number() {
        assert_eq!(full_phone_number("1", "5551234"), "+15551234");
        assert_eq!(full_phone_number("44", "7700900123"), "+447700900123");
    }

    #[test]
    fn passes_malformed_input_through() {
        // Garbage in, garbage out; the provider decides what to reject.
        assert_eq!(full_phone_number("", "not-a-number"), "+not-a-number");
    }
}
