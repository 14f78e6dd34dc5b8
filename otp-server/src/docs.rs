//! OpenAPI doc generation.

use crate::{
    error::AppError,
    routes::{authenticate, fallback, health, ping, send_mail, verify},
};
use otp_core::{
    code::VerificationCode,
    common::{CodeResponse, SendMailRequest, SuccessResponse, VerifyRequest, VerifyResponse},
};
use utoipa::OpenApi;

/// API documentation generator.
#[derive(OpenApi)]
#[openapi(
    paths(
        fallback::greeting,
        authenticate::lookup,
        verify::verify,
        send_mail::send_mail,
        health::healthcheck,
        ping::get,
    ),
    components(
        schemas(
            AppError,
            VerificationCode,
            CodeResponse,
            VerifyRequest,
            VerifyResponse,
            SendMailRequest,
            SuccessResponse,
            health::HealthcheckResponse
        )
    )
)]

/// Tied to OpenAPI documentation.
#[derive(Debug)]
pub struct ApiDoc;
