//! Additional [axum::middleware] and tower layers.

pub mod request_ulid;
pub mod runtime;
