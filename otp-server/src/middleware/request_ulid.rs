//! Middleware for generating a [ulid::Ulid] as a request id.

use http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use ulid::Ulid;

/// Make/generate ulid on requests.
#[derive(Copy, Clone, Debug, Default)]
pub struct MakeRequestUlid;

/// Implement the trait for producing a request ID from the incoming request.
/// In our case, we want to generate a new ULID per request.
impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let req_id = Ulid::new().to_string().parse().ok()?;
        Some(RequestId::new(req_id))
    }
}
