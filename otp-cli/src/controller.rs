//! The verification flow as a state struct plus a pure transition function.
//!
//! [`State::update`] never performs I/O. It returns [`Effect`]s, and the
//! results of network effects come back in as [`Event`]s (see
//! [`crate::driver`]).

use crate::{
    api::ApiError,
    buffer::CodeBuffer,
    modal::{ModalEvent, ModalState},
    notification::{self, FailureKind, Notification},
};
use otp_core::{code::VerificationCode, common::VerifyResponse};

/// Where the user goes after a successful verification.
pub const WELCOME_ROUTE: &str = "/welcome";

/// Phase of the verification flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted yet, or back after a failure
    #[default]
    Idle,
    /// The code lookup is outstanding
    FetchingCode,
    /// A code is held and nothing is outstanding
    Ready,
    /// The verify call is outstanding
    Submitting,
    /// The gate was passed
    Success,
}

/// What the client knows about the server's code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CodeStatus {
    /// The lookup has not finished
    #[default]
    NotFetched,
    /// The lookup returned this code
    Fetched(VerificationCode),
    /// The lookup failed. There is no automatic retry.
    FetchFailed,
}

/// Session data owned by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The fetched code, if any
    pub code: CodeStatus,
    /// Set while a verify call is outstanding. Further submits are ignored.
    pub submitting: bool,
    /// Set by the most recent failure, cleared by a submit that passes local checks
    pub error: bool,
}

/// Inputs to the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The view appeared.
    Mounted,
    /// The code lookup finished.
    CodeFetched(Result<VerificationCode, ApiError>),
    /// A character was typed into (or removed from) a slot.
    SlotChanged {
        /// Slot index, from 0
        index: usize,
        /// New slot content
        value: String,
    },
    /// Text was pasted into a slot.
    PasteApplied {
        /// Slot index, from 0
        index: usize,
        /// Clipboard text
        text: String,
    },
    /// The user submitted the code.
    SubmitPressed,
    /// The verify call finished.
    VerifyResolved(Result<VerifyResponse, ApiError>),
    /// An event for the "request OTP" modal.
    Modal(ModalEvent),
}

/// Work requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Look up the server's code, answer with [`Event::CodeFetched`].
    FetchCode,
    /// Verify the candidate, answer with [`Event::VerifyResolved`].
    Verify(String),
    /// Mail the code to this address, answer with [`ModalEvent::DispatchResolved`].
    Dispatch(String),
    /// Leave the gate for the given route.
    Navigate(&'static str),
    /// Show a notification.
    Notify(Notification),
}

/// Everything the verification view renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// Flow phase
    pub phase: Phase,
    /// Session data
    pub session: SessionState,
    /// The six slots
    pub buffer: CodeBuffer,
    /// The "request OTP" modal
    pub modal: ModalState,
}

impl State {
    /// A fresh, unmounted flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `event`, returning the effects to run.
    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Mounted => self.on_mounted(),
            Event::CodeFetched(result) => self.on_code_fetched(result),
            Event::SlotChanged { index, value } => {
                self.buffer.enter(index, &value);
                vec![]
            }
            Event::PasteApplied { index, text } => {
                self.buffer.paste(index, &text);
                vec![]
            }
            Event::SubmitPressed => self.on_submit(),
            Event::VerifyResolved(result) => self.on_verify_resolved(result),
            Event::Modal(event) => self.modal.update(event),
        }
    }

    fn on_mounted(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Idle || self.session.code != CodeStatus::NotFetched {
            return vec![];
        }

        self.phase = Phase::FetchingCode;
        vec![Effect::FetchCode]
    }

    fn on_code_fetched(&mut self, result: Result<VerificationCode, ApiError>) -> Vec<Effect> {
        if self.session.code != CodeStatus::NotFetched {
            return vec![];
        }

        let fetching = self.phase == Phase::FetchingCode;

        match result {
            Ok(code) => {
                self.session.code = CodeStatus::Fetched(code);
                if fetching {
                    self.phase = Phase::Ready;
                }
                vec![]
            }
            Err(err) => {
                tracing::warn!(%err, "Error fetching OTP");
                self.session.code = CodeStatus::FetchFailed;
                self.session.error = true;
                if fetching {
                    self.phase = Phase::Idle;
                }
                vec![Effect::Notify(Notification::error(
                    FailureKind::FetchFailure,
                    notification::FETCH_FAILED,
                ))]
            }
        }
    }

    fn on_submit(&mut self) -> Vec<Effect> {
        if self.session.submitting || self.phase == Phase::Success {
            return vec![];
        }

        let candidate = self.buffer.candidate();

        if candidate.ends_with('7') {
            return self.reject(notification::ENDS_WITH_SEVEN);
        }

        if !self.buffer.is_all_digits() {
            return self.reject(notification::NOT_ALL_DIGITS);
        }

        self.session.error = false;

        if !matches!(self.session.code, CodeStatus::Fetched(_)) {
            tracing::debug!("Submit before the code was fetched");
            return vec![Effect::Notify(Notification::error(
                FailureKind::FetchFailure,
                notification::CODE_UNAVAILABLE,
            ))];
        }

        self.session.submitting = true;
        self.phase = Phase::Submitting;
        vec![Effect::Verify(candidate)]
    }

    fn on_verify_resolved(&mut self, result: Result<VerifyResponse, ApiError>) -> Vec<Effect> {
        if self.phase != Phase::Submitting {
            return vec![];
        }

        self.session.submitting = false;

        let kind = match result {
            Ok(response) if response.success => {
                self.phase = Phase::Success;
                return vec![Effect::Navigate(WELCOME_ROUTE)];
            }
            Ok(_) => FailureKind::VerificationMismatch,
            Err(err) => {
                tracing::warn!(%err, "Error verifying code");
                FailureKind::FetchFailure
            }
        };

        self.session.error = true;
        self.buffer.clear();
        self.phase = Phase::Idle;
        vec![Effect::Notify(Notification::error(
            kind,
            notification::INVALID_CODE,
        ))]
    }

    fn reject(&mut self, message: &'static str) -> Vec<Effect> {
        self.session.error = true;
        self.buffer.clear();
        if self.phase == Phase::Ready {
            self.phase = Phase::Idle;
        }
        vec![Effect::Notify(Notification::error(
            FailureKind::ValidationFailure,
            message,
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> State {
        let mut state = State::new();
        state.update(Event::Mounted);
        state.update(Event::CodeFetched(Ok(VerificationCode::new(231524))));
        state
    }

    fn paste(state: &mut State, text: &str) {
        state.update(Event::PasteApplied {
            index: 0,
            text: text.to_string(),
        });
    }

    fn error(kind: FailureKind, message: &'static str) -> Vec<Effect> {
        vec![Effect::Notify(Notification::error(kind, message))]
    }

    #[test]
    fn test_mount_fetches_code_once() {
        let mut state = State::new();

        assert_eq!(state.update(Event::Mounted), vec![Effect::FetchCode]);
        assert_eq!(state.phase, Phase::FetchingCode);
        assert!(state.update(Event::Mounted).is_empty());

        state.update(Event::CodeFetched(Ok(VerificationCode::new(231524))));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(
            state.session.code,
            CodeStatus::Fetched(VerificationCode::new(231524))
        );
    }

    #[test]
    fn test_fetch_failure_notifies_and_blocks_verification() {
        let mut state = State::new();
        state.update(Event::Mounted);

        let effects = state.update(Event::CodeFetched(Err(ApiError::Transport(
            "connection refused".to_string(),
        ))));

        assert_eq!(
            effects,
            error(FailureKind::FetchFailure, notification::FETCH_FAILED)
        );
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.session.error);

        paste(&mut state, "231524");
        let effects = state.update(Event::SubmitPressed);

        assert_eq!(
            effects,
            error(FailureKind::FetchFailure, notification::CODE_UNAVAILABLE)
        );
        assert_eq!(state.buffer.candidate(), "231524");
    }

    #[test]
    fn test_correct_code_navigates() {
        let mut state = ready();
        paste(&mut state, "231524");

        assert_eq!(
            state.update(Event::SubmitPressed),
            vec![Effect::Verify("231524".to_string())]
        );
        assert_eq!(state.phase, Phase::Submitting);
        assert!(state.session.submitting);

        let effects = state.update(Event::VerifyResolved(Ok(VerifyResponse::from_outcome(true))));

        assert_eq!(effects, vec![Effect::Navigate(WELCOME_ROUTE)]);
        assert_eq!(state.phase, Phase::Success);
        assert!(!state.session.submitting);
    }

    #[test]
    fn test_ending_in_seven_never_reaches_the_server() {
        let mut state = ready();
        paste(&mut state, "123457");

        let effects = state.update(Event::SubmitPressed);

        assert_eq!(
            effects,
            error(FailureKind::ValidationFailure, notification::ENDS_WITH_SEVEN)
        );
        assert_eq!(state.buffer, CodeBuffer::new());
        assert_eq!(state.buffer.focus(), 0);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_seven_rule_precedes_digit_rule() {
        let mut state = ready();
        state.update(Event::SlotChanged {
            index: 0,
            value: "7".to_string(),
        });

        assert_eq!(
            state.update(Event::SubmitPressed),
            error(FailureKind::ValidationFailure, notification::ENDS_WITH_SEVEN)
        );
    }

    #[test]
    fn test_empty_or_non_digit_slots_are_rejected() {
        let mut state = ready();
        for (index, value) in ["1", "2", "a", "4", "5", "6"].into_iter().enumerate() {
            state.update(Event::SlotChanged {
                index,
                value: value.to_string(),
            });
        }

        assert_eq!(
            state.update(Event::SubmitPressed),
            error(FailureKind::ValidationFailure, notification::NOT_ALL_DIGITS)
        );
        assert_eq!(state.buffer.candidate(), "");

        assert_eq!(
            state.update(Event::SubmitPressed),
            error(FailureKind::ValidationFailure, notification::NOT_ALL_DIGITS)
        );
    }

    #[test]
    fn test_mismatch_clears_buffer() {
        let mut state = ready();
        paste(&mut state, "111111");
        state.update(Event::SubmitPressed);

        let effects = state.update(Event::VerifyResolved(Ok(VerifyResponse::from_outcome(false))));

        assert_eq!(
            effects,
            error(FailureKind::VerificationMismatch, notification::INVALID_CODE)
        );
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.buffer, CodeBuffer::new());
        assert!(state.session.error);
        assert!(!state.session.submitting);
    }

    #[test]
    fn test_verify_transport_error_reads_as_invalid() {
        let mut state = ready();
        paste(&mut state, "231524");
        state.update(Event::SubmitPressed);

        let effects = state.update(Event::VerifyResolved(Err(ApiError::Status {
            status: 500,
            body: String::new(),
        })));

        assert_eq!(
            effects,
            error(FailureKind::FetchFailure, notification::INVALID_CODE)
        );
        assert_eq!(state.buffer.focus(), 0);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut state = ready();
        paste(&mut state, "111111");
        state.update(Event::SubmitPressed);
        state.update(Event::VerifyResolved(Ok(VerifyResponse::from_outcome(false))));

        paste(&mut state, "231524");

        assert_eq!(
            state.update(Event::SubmitPressed),
            vec![Effect::Verify("231524".to_string())]
        );
        assert!(!state.session.error);
    }

    #[test]
    fn test_second_submit_while_outstanding_is_ignored() {
        let mut state = ready();
        paste(&mut state, "231524");
        state.update(Event::SubmitPressed);

        assert!(state.update(Event::SubmitPressed).is_empty());
    }

    #[test]
    fn test_stray_verify_result_is_ignored() {
        let mut state = ready();

        assert!(state
            .update(Event::VerifyResolved(Ok(VerifyResponse::from_outcome(true))))
            .is_empty());
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn test_modal_events_are_forwarded() {
        let mut state = ready();
        state.update(Event::Modal(ModalEvent::Opened));
        state.update(Event::Modal(ModalEvent::EmailChanged(
            "someone@example.com".to_string(),
        )));

        assert_eq!(
            state.update(Event::Modal(ModalEvent::ConfirmPressed)),
            vec![Effect::Dispatch("someone@example.com".to_string())]
        );
        assert_eq!(state.phase, Phase::Ready);
    }
}
