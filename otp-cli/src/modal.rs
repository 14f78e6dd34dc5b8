//! The "request OTP" modal: collect an email address and mail the code to it.

use crate::{
    api::ApiError,
    controller::Effect,
    notification::{self, FailureKind, Notification},
};

/// Shortest address the email field accepts.
pub const MIN_EMAIL_LENGTH: usize = 12;

/// Where the modal is in its flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalPhase {
    /// Not shown
    #[default]
    Closed,
    /// Waiting for an address
    EmailEntry,
    /// The mail request is outstanding
    Sending,
}

/// Events driving the modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalEvent {
    /// The user asked for the code by email.
    Opened,
    /// The email field changed.
    EmailChanged(String),
    /// The user confirmed the address.
    ConfirmPressed,
    /// The user closed the modal without sending.
    Dismissed,
    /// The mail request finished with the server's `success` flag or an error.
    DispatchResolved(Result<bool, ApiError>),
}

/// State of the modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    phase: ModalPhase,
    email: String,
}

impl ModalState {
    /// Current phase.
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    /// Current content of the email field.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Apply `event`, returning the effects to run.
    pub fn update(&mut self, event: ModalEvent) -> Vec<Effect> {
        match (self.phase, event) {
            (ModalPhase::Closed, ModalEvent::Opened) => {
                self.phase = ModalPhase::EmailEntry;
                self.email.clear();
                vec![]
            }
            (ModalPhase::EmailEntry, ModalEvent::EmailChanged(email)) => {
                self.email = email;
                vec![]
            }
            (ModalPhase::EmailEntry, ModalEvent::ConfirmPressed) => {
                if !is_acceptable_email(&self.email) {
                    tracing::debug!(email = %self.email, "Email rejected before sending");
                    return vec![Effect::Notify(Notification::error(
                        FailureKind::DispatchFailure,
                        notification::INVALID_EMAIL,
                    ))];
                }

                self.phase = ModalPhase::Sending;
                vec![Effect::Dispatch(self.email.clone())]
            }
            (ModalPhase::EmailEntry, ModalEvent::Dismissed) => {
                self.phase = ModalPhase::Closed;
                vec![]
            }
            (ModalPhase::Sending, ModalEvent::DispatchResolved(outcome)) => {
                let notification = match outcome {
                    Ok(true) => {
                        self.phase = ModalPhase::Closed;
                        self.email.clear();
                        return vec![Effect::Notify(Notification::success(
                            notification::CODE_SENT,
                        ))];
                    }
                    Ok(false) => notification::SEND_FAILED,
                    Err(err) => {
                        tracing::warn!(%err, "Mail request failed");
                        notification::INVALID_EMAIL
                    }
                };

                self.phase = ModalPhase::EmailEntry;
                vec![Effect::Notify(Notification::error(
                    FailureKind::DispatchFailure,
                    notification,
                ))]
            }
            (phase, event) => {
                tracing::debug!(?phase, ?event, "Ignored modal event");
                vec![]
            }
        }
    }
}

/// The checks an `<input type="email" minlength="12" required>` field applies.
fn is_acceptable_email(email: &str) -> bool {
    email.chars().count() >= MIN_EMAIL_LENGTH && validator::validate_email(email)
}
