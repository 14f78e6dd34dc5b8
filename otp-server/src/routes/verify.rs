//! Code verification route.

use crate::{app_state::AppState, setups::ServerSetup};
use axum::{body::Bytes, extract::State, Json};
use otp_core::common::VerifyResponse;
use serde_json::Value;

/// POST handler comparing a candidate against the server's code.
///
/// The body is read leniently: a missing body, invalid JSON or a missing
/// `code` field all count as a mismatch, never as an error status.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = otp_core::common::VerifyRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerifyResponse),
    )
)]
pub async fn verify<S: ServerSetup>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Json<VerifyResponse> {
    let candidate = candidate_from_body(&body);
    let matched = state.authority.verify(&candidate);

    tracing::info!(matched, "Handled verification request");

    Json(VerifyResponse::from_outcome(matched))
}

fn candidate_from_body(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut payload) => payload
            .get_mut("code")
            .map(Value::take)
            .unwrap_or(Value::Null),
        Err(err) => {
            tracing::debug!(%err, "Unparsable verification body");
            Value::Null
        }
    }
}
