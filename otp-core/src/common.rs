//! Request and response data types that are common and useful between clients of and the otp server

use crate::code::VerificationCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned alongside a successful verification
pub const VERIFY_SUCCESS_MESSAGE: &str = "success";

/// Message returned alongside a failed verification
pub const VERIFY_FAILURE_MESSAGE: &str = "Invalid code";

/// Response of the code lookup endpoint
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ToSchema)]
pub struct CodeResponse {
    /// The code currently held by the server
    pub code: VerificationCode,
}

/// Verification request struct
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct VerifyRequest {
    /// The candidate code, as assembled from the six input slots
    #[schema(example = "231524")]
    pub code: String,
}

/// Verification result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct VerifyResponse {
    /// Whether the candidate matched the server's code
    pub success: bool,
    /// Either "success" or "Invalid code"
    pub message: String,
}

impl VerifyResponse {
    /// Build the response for a verification outcome.
    pub fn from_outcome(matched: bool) -> Self {
        let message = if matched {
            VERIFY_SUCCESS_MESSAGE
        } else {
            VERIFY_FAILURE_MESSAGE
        };

        Self {
            success: matched,
            message: message.to_string(),
        }
    }
}

/// Request to send the code to an email address
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct SendMailRequest {
    /// The email address the code is sent to
    #[schema(example = "example@gmail.com")]
    pub receiver: String,
}

/// Response type indiciating success
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ToSchema)]
pub struct SuccessResponse {
    /// Whether the response was successful
    pub success: bool,
}
