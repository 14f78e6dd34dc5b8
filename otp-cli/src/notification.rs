//! User-visible transient notifications.

/// The code lookup failed.
pub const FETCH_FAILED: &str = "Error fetching OTP";
/// The candidate ends in the digit 7.
pub const ENDS_WITH_SEVEN: &str = "Number cannot end with 7";
/// Some slot is empty or not a digit.
pub const NOT_ALL_DIGITS: &str = "Code can only be numbers and cannot be empty";
/// Submit was pressed before a code was fetched.
pub const CODE_UNAVAILABLE: &str = "OTP is not available yet";
/// The server rejected the candidate, or could not be asked.
pub const INVALID_CODE: &str = "Invalid OTP";
/// The code was mailed.
pub const CODE_SENT: &str = "OTP sent";
/// The server reported that mailing failed.
pub const SEND_FAILED: &str = "Failed to send OTP";
/// The address was refused locally or the mail request could not be made.
pub const INVALID_EMAIL: &str = "Please enter a valid email";

/// How a notification is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Confirmation of a completed action
    Success,
    /// Something went wrong
    Error,
}

/// What went wrong, for error notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// A lookup or verify call failed in transport or with a non-success status.
    FetchFailure,
    /// A local rule rejected the candidate before any network call.
    ValidationFailure,
    /// The server said the candidate does not match.
    VerificationMismatch,
    /// The mail could not be sent.
    DispatchFailure,
}

/// A toast-style message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Presentation level
    pub level: Level,
    /// The text shown to the user
    pub message: &'static str,
    /// Set for error notifications
    pub kind: Option<FailureKind>,
}

impl Notification {
    /// A success notification.
    pub fn success(message: &'static str) -> Self {
        Self {
            level: Level::Success,
            message,
            kind: None,
        }
    }

    /// An error notification of the given kind.
    pub fn error(kind: FailureKind, message: &'static str) -> Self {
        Self {
            level: Level::Error,
            message,
            kind: Some(kind),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}
