//! Healthcheck route.

use axum::{self, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A healthcheck response for the service
#[derive(ToSchema, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct HealthcheckResponse {
    healthy: bool,
}

impl HealthcheckResponse {
    /// Whether the service is healthy
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }
}

/// GET handler for checking service health.
///
/// The server keeps no external connections, so it is healthy whenever it answers.
#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "otp-server healthy", body = HealthcheckResponse),
    )
)]
pub async fn healthcheck() -> (StatusCode, Json<HealthcheckResponse>) {
    (StatusCode::OK, Json(HealthcheckResponse { healthy: true }))
}
