//! Route for mailing the code to an address.

use crate::{app_state::AppState, setups::ServerSetup};
use axum::{body::Bytes, extract::State, Json};
use otp_core::common::{SendMailRequest, SuccessResponse};

/// POST handler sending the server's code to `receiver`.
///
/// Delivery failures and bodies without a usable `receiver` are reported as
/// `{ "success": false }` with a 200 status.
#[utoipa::path(
    post,
    path = "/sendMail",
    request_body = SendMailRequest,
    responses(
        (status = 200, description = "Whether the code was handed to the mail transport", body = SuccessResponse),
    )
)]
pub async fn send_mail<S: ServerSetup>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Json<SuccessResponse> {
    let request = match serde_json::from_slice::<SendMailRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(%err, "Unusable sendMail body");
            return Json(SuccessResponse { success: false });
        }
    };

    let success = state.dispatcher.dispatch(&request.receiver).await.is_ok();

    Json(SuccessResponse { success })
}
