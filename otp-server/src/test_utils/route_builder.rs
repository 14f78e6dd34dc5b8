//! Helpers for running requests
use anyhow::{anyhow, Result};
use axum::Router;
use bytes::Bytes;
use http::{header::HeaderName, Method, Request, StatusCode, Uri};
use hyper::Body;
use mime::{Mime, APPLICATION_JSON};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

#[derive(Debug)]
pub(crate) struct RouteBuilder {
    app: Router,
    method: Method,
    path: Uri,
    body: Option<(Mime, Body)>,
    headers: Vec<(HeaderName, String)>,
    accept_mime: Option<Mime>,
}

impl RouteBuilder {
    pub(crate) fn new(app: Router, method: Method, path: &'static str) -> Self {
        Self {
            app,
            method,
            path: Uri::from_static(path),
            body: Default::default(),
            headers: Default::default(),
            accept_mime: Default::default(),
        }
    }

    pub(crate) fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub(crate) fn with_json_body<T>(mut self, body: T) -> Result<Self>
    where
        T: Serialize,
    {
        let body = Body::from(serde_json::to_vec(&body)?);

        self.body = Some((APPLICATION_JSON, body));

        Ok(self)
    }

    pub(crate) fn with_raw_body(mut self, mime: Mime, body: &'static str) -> Self {
        self.body = Some((mime, Body::from(body)));
        self
    }

    pub(crate) async fn into_response(mut self) -> Result<http::Response<axum::body::BoxBody>> {
        let request = self.build_request()?;
        Ok(self.app.oneshot(request).await?)
    }

    pub(crate) async fn into_raw_response(self) -> Result<(StatusCode, Bytes)> {
        let response = self.into_response().await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        Ok((status, body))
    }

    pub(crate) async fn into_json_response<T>(mut self) -> Result<(StatusCode, T)>
    where
        T: DeserializeOwned,
    {
        self.accept_mime = self.accept_mime.or(Some(APPLICATION_JSON));

        let (status, body) = self.into_raw_response().await?;
        match serde_json::from_slice::<T>(&body) {
            Ok(body) => Ok((status, body)),
            Err(e) => Err(anyhow!(
                "Couldn't parse {}: {e}",
                String::from_utf8_lossy(&body)
            )),
        }
    }

    fn build_request(&mut self) -> Result<Request<Body>> {
        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(self.path.clone());

        if let Some(mime) = self.accept_mime.take() {
            builder = builder.header(http::header::ACCEPT, mime.as_ref())
        }

        for (name, value) in self.headers.drain(..) {
            builder = builder.header(name, value);
        }

        if let Some((mime, body)) = self.body.take() {
            Ok(builder
                .header(http::header::CONTENT_TYPE, mime.as_ref())
                .body(body)?)
        } else {
            Ok(builder.body(Body::empty())?)
        }
    }
}
