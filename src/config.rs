//! Configuration for the relay.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::IpAddr;

/// Relay configuration, built once at startup and handed to the handlers.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Which provider backend to relay to
    #[serde(default)]
    pub provider: ProviderKind,

    /// Twilio Verify API base URL
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,

    /// Authy API base URL
    #[serde(default = "default_authy_base_url")]
    pub authy_base_url: String,

    /// Twilio Verify service SID (required for the `verify` backend)
    #[serde(default)]
    pub verify_service_sid: Option<String>,

    /// Twilio account SID (required for the `verify` backend)
    #[serde(default)]
    pub twilio_account_sid: Option<String>,

    /// Twilio auth token (required for the `verify` backend)
    #[serde(default)]
    pub twilio_auth_token: Option<String>,

    /// Authy API key (checked per-request, not at startup)
    #[serde(default)]
    pub authy_api_key: Option<String>,

    /// Timeout for outbound provider calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Global inbound requests per minute
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Verify,
    Authy,
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_verify_base_url() -> String {
    "https://verify.twilio.com/v2".into()
}

fn default_authy_base_url() -> String {
    "https://api.authy.com".into()
}

fn default_request_timeout_secs() -> u64 {
    2
}

fn default_rate_limit_per_minute() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot serve a single request.
    ///
    /// The Verify backend needs all three Twilio credentials up front. The
    /// Authy key is deliberately not required here; its absence is reported
    /// per-request as a normalized error response.
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<IpAddr>().is_err() {
            bail!("LISTEN_ADDR is not a valid IP address: {}", self.listen_addr);
        }
        if self.provider == ProviderKind::Verify {
            let mut missing = Vec::new();
            if self.verify_service_sid.is_none() {
                missing.push("VERIFY_SERVICE_SID");
            }
            if self.twilio_account_sid.is_none() {
                missing.push("TWILIO_ACCOUNT_SID");
            }
            if self.twilio_auth_token.is_none() {
                missing.push("TWILIO_AUTH_TOKEN");
            }
            if !missing.is_empty() {
                bail!("{} must be set", missing.join(", "));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_config() -> Config {
        Config {
            listen_addr: default_listen_addr(),
            port: default_port(),
            provider: ProviderKind::Verify,
            verify_base_url: default_verify_base_url(),
            authy_base_url: default_authy_base_url(),
            verify_service_sid: Some("VAtest".into()),
            twilio_account_sid: Some("ACtest".into()),
            twilio_auth_token: Some("token".into()),
            authy_api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn verify_backend_requires_twilio_credentials() {
        let mut config = verify_config();
        assert!(config.validate().is_ok());

        config.twilio_auth_token = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TWILIO_AUTH_TOKEN"));
    }

    #[test]
    fn rejects_malformed_listen_addr() {
        let mut config = verify_config();
        config.listen_addr = "not-an-address".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LISTEN_ADDR"));
    }

    #[test]
    fn authy_backend_starts_without_api_key() {
        let mut config = verify_config();
        config.provider = ProviderKind::Authy;
        config.verify_service_sid = None;
        config.twilio_account_sid = None;
        config.twilio_auth_token = None;
        assert!(config.validate().is_ok());
    }
}
