//! API request and response types.

use crate::provider::VerificationOutcome;
use serde::{Deserialize, Serialize};

/// Form fields for starting a verification.
///
/// Fields default to empty strings when absent, mirroring form semantics;
/// the provider is the one to reject nonsense.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Delivery channel (sms or call)
    #[serde(default)]
    pub via: String,

    /// National phone number, digits only
    #[serde(default)]
    pub phone_number: String,

    /// Country dialing code, without the plus
    #[serde(default)]
    pub country_code: String,
}

/// Form fields for checking a verification code.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// The code the user received
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub phone_number: String,

    #[serde(default)]
    pub country_code: String,
}

/// Normalized response returned to the caller on every verification call.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub message: String,
    pub success: bool,
}

impl From<VerificationOutcome> for RelayResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            message: outcome.message,
            success: outcome.success,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
}
