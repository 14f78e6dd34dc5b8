//! Client for the passcode HTTP API.

use crate::logging::{LogAndHandleErrorMiddleware, StatusError};
use async_trait::async_trait;
use otp_core::{
    code::VerificationCode,
    common::{CodeResponse, SendMailRequest, SuccessResponse, VerifyRequest, VerifyResponse},
};
use reqwest::{Client, Method};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// Why a call to the API did not produce a usable answer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server could not be reached.
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server answered with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },
    /// The response body was not the expected JSON.
    #[error("could not decode the response: {0}")]
    Decode(String),
}

impl From<reqwest_middleware::Error> for ApiError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Middleware(err) => match err.downcast_ref::<StatusError>() {
                Some(StatusError { status, body }) => ApiError::Status {
                    status: status.as_u16(),
                    body: body.clone(),
                },
                None => ApiError::Transport(format!("{err:#}")),
            },
            reqwest_middleware::Error::Reqwest(err) => ApiError::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// The three network calls the controller makes.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Fetch the server's code.
    async fn lookup(&self) -> Result<VerificationCode, ApiError>;

    /// Ask the server whether `candidate` matches.
    async fn verify(&self, candidate: &str) -> Result<VerifyResponse, ApiError>;

    /// Ask the server to mail the code to `receiver`.
    async fn dispatch(&self, receiver: &str) -> Result<SuccessResponse, ApiError>;
}

/// [`VerificationApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: ClientWithMiddleware,
    endpoint: Url,
}

impl HttpApi {
    /// A client talking to the server at `endpoint`.
    pub fn new(endpoint: Url) -> Self {
        let client = ClientBuilder::new(Client::new())
            .with(LogAndHandleErrorMiddleware)
            .build();

        Self { client, endpoint }
    }

    async fn request<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .endpoint
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid url for {path}: {e}")))?;

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let bytes = request.send().await?.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::Decode(format!("{e}: {}", String::from_utf8_lossy(&bytes)))
        })
    }
}

#[async_trait]
impl VerificationApi for HttpApi {
    async fn lookup(&self) -> Result<VerificationCode, ApiError> {
        let response: CodeResponse = self
            .request(Method::GET, "/authenticate", None::<&()>)
            .await?;

        tracing::debug!(code = %response.code, "Fetched code");
        Ok(response.code)
    }

    async fn verify(&self, candidate: &str) -> Result<VerifyResponse, ApiError> {
        let body = VerifyRequest {
            code: candidate.to_string(),
        };
        self.request(Method::POST, "/verify", Some(&body)).await
    }

    async fn dispatch(&self, receiver: &str) -> Result<SuccessResponse, ApiError> {
        let body = SendMailRequest {
            receiver: receiver.to_string(),
        };
        self.request(Method::POST, "/sendMail", Some(&body)).await
    }
}
