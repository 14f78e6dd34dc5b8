//! Greeting and catch-all routes.

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    setups::ServerSetup,
};
use axum::{
    extract::State,
    http::{Method, Uri},
    response::Html,
};

/// GET handler for the server root
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain"),
    )
)]
pub async fn greeting() -> &'static str {
    "Hello"
}

/// Serve the single page app shell for every unmatched `GET`.
///
/// Without a configured static directory, or for other methods, this answers
/// with a 404 [`AppError`].
pub async fn spa_shell<S: ServerSetup>(
    State(state): State<AppState<S>>,
    method: Method,
    uri: Uri,
) -> AppResult<Html<String>> {
    let Some(static_dir) = state.static_dir.as_ref().filter(|_| method == Method::GET) else {
        return Err(AppError::not_found(uri.path()));
    };

    let index = static_dir.join("index.html");
    let shell = tokio::fs::read_to_string(&index).await.map_err(|err| {
        tracing::warn!(?index, %err, "Could not read the app shell");
        AppError::from(err)
    })?;

    Ok(Html(shell))
}
