//! OTP Relay - HTTP front for phone number verification.
//!
//! This relay sits in front of a third-party OTP provider (Twilio Verify or
//! Authy) to:
//! - Accept start/check verification requests as plain form posts
//! - Inject provider credentials on the outbound call
//! - Normalize provider replies into a single `{message, success}` envelope

pub mod api;
pub mod config;
pub mod error;
pub mod provider;

pub use config::{Config, ProviderKind};
pub use error::RelayError;
pub use provider::{AuthyClient, Provider, VerificationOutcome, VerifyClient};
