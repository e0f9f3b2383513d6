//! HTTP request handlers.

use super::types::{CheckRequest, HealthResponse, RelayResponse, StartRequest};
use super::AppState;
use crate::error::RelayError;
use axum::{extract::State, Form, Json};
use tracing::{info, warn};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.provider.name().to_string(),
    })
}

/// Start a phone verification: relay the request to the provider and
/// normalize its reply.
pub async fn start_verification(
    State(state): State<AppState>,
    Form(request): Form<StartRequest>,
) -> Result<Json<RelayResponse>, RelayError> {
    info!(
        via = %request.via,
        phone_number = %request.phone_number,
        country_code = %request.country_code,
        "Start verification request received"
    );

    let outcome = state
        .provider
        .start(&request.via, &request.phone_number, &request.country_code)
        .await?;

    if outcome.success {
        info!(phone_number = %request.phone_number, "Verification started");
    } else {
        warn!(
            phone_number = %request.phone_number,
            message = %outcome.message,
            "Verification start refused by provider"
        );
    }

    Ok(Json(outcome.into()))
}

/// Check a verification code against the provider.
pub async fn check_verification(
    State(state): State<AppState>,
    Form(request): Form<CheckRequest>,
) -> Result<Json<RelayResponse>, RelayError> {
    info!(
        phone_number = %request.phone_number,
        country_code = %request.country_code,
        "Check verification request received"
    );

    let outcome = state
        .provider
        .check(&request.code, &request.phone_number, &request.country_code)
        .await?;

    info!(
        phone_number = %request.phone_number,
        success = outcome.success,
        "Verification check completed"
    );

    Ok(Json(outcome.into()))
}
