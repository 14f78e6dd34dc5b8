//! Code lookup route.

use crate::{app_state::AppState, setups::ServerSetup};
use axum::{extract::State, Json};
use otp_core::common::CodeResponse;

/// GET handler returning the code held by the server
#[utoipa::path(
    get,
    path = "/authenticate",
    responses(
        (status = 200, description = "The current code", body = CodeResponse),
    )
)]
pub async fn lookup<S: ServerSetup>(State(state): State<AppState<S>>) -> Json<CodeResponse> {
    Json(CodeResponse {
        code: state.authority.lookup(),
    })
}
