use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Logs every request and turns non-success statuses into errors.
#[derive(Debug)]
pub(crate) struct LogAndHandleErrorMiddleware;

/// A response with a client or server error status.
#[derive(Debug, thiserror::Error)]
#[error("Error status code {status}: {body}")]
pub(crate) struct StatusError {
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

#[async_trait::async_trait]
impl Middleware for LogAndHandleErrorMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        tracing::info!(
            url = %req.url(),
            method = %req.method(),
            "Running request"
        );
        match next.run(req, extensions).await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_client_error() || status.is_server_error() {
                    let body = resp.text().await?;
                    tracing::error!(?status, %body, "Error status on response");
                    Err(anyhow::Error::new(StatusError { status, body }).into())
                } else {
                    let content_length = resp.content_length();
                    tracing::info!(?status, ?content_length, "Got response");
                    Ok(resp)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Request failed");
                Err(e)
            }
        }
    }
}
