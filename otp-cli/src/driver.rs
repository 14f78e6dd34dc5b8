//! Runs controller effects against a [`VerificationApi`] and a [`View`].

use crate::{
    api::VerificationApi,
    controller::{Effect, Event, State},
    modal::ModalEvent,
    notification::Notification,
};
use std::collections::VecDeque;

/// Where notifications and navigation end up.
pub trait View {
    /// Show a notification.
    fn notify(&mut self, notification: &Notification);

    /// Leave the gate for `route`.
    fn navigate(&mut self, route: &str);
}

/// Feeds events into a [`State`] and executes the effects it returns.
///
/// Network effects are awaited one at a time and their results fed back as
/// events, so the state only ever sees one outstanding call per effect.
#[derive(Debug)]
pub struct Driver<A, V> {
    api: A,
    view: V,
    state: State,
}

impl<A: VerificationApi, V: View> Driver<A, V> {
    /// A driver around a fresh [`State`].
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            state: State::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Apply `event` and everything that follows from it.
    pub async fn handle(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            tracing::debug!(?event, "Handling event");

            for effect in self.state.update(event) {
                match effect {
                    Effect::FetchCode => {
                        queue.push_back(Event::CodeFetched(self.api.lookup().await));
                    }
                    Effect::Verify(candidate) => {
                        queue.push_back(Event::VerifyResolved(self.api.verify(&candidate).await));
                    }
                    Effect::Dispatch(receiver) => {
                        let outcome = self.api.dispatch(&receiver).await.map(|r| r.success);
                        queue.push_back(Event::Modal(ModalEvent::DispatchResolved(outcome)));
                    }
                    Effect::Navigate(route) => self.view.navigate(route),
                    Effect::Notify(notification) => self.view.notify(&notification),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::ApiError,
        controller::{Phase, WELCOME_ROUTE},
        modal::ModalPhase,
        notification,
    };
    use async_trait::async_trait;
    use otp_core::{
        code::VerificationCode,
        common::{SuccessResponse, VerifyResponse},
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Lookup,
        Verify(String),
        Dispatch(String),
    }

    /// Answers like a server holding `code`, recording every call.
    #[derive(Clone, Debug)]
    struct FakeApi {
        code: Option<VerificationCode>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeApi {
        fn new(code: Option<u64>) -> Self {
            Self {
                code: code.map(VerificationCode::new),
                calls: Default::default(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl VerificationApi for FakeApi {
        async fn lookup(&self) -> Result<VerificationCode, ApiError> {
            self.record(Call::Lookup);
            self.code
                .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
        }

        async fn verify(&self, candidate: &str) -> Result<VerifyResponse, ApiError> {
            self.record(Call::Verify(candidate.to_string()));
            let code = self
                .code
                .ok_or_else(|| ApiError::Transport("connection refused".to_string()))?;
            Ok(VerifyResponse::from_outcome(code.loosely_matches_str(candidate)))
        }

        async fn dispatch(&self, receiver: &str) -> Result<SuccessResponse, ApiError> {
            self.record(Call::Dispatch(receiver.to_string()));
            Ok(SuccessResponse { success: true })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingView {
        messages: Vec<&'static str>,
        routes: Vec<String>,
    }

    impl View for RecordingView {
        fn notify(&mut self, notification: &Notification) {
            self.messages.push(notification.message);
        }

        fn navigate(&mut self, route: &str) {
            self.routes.push(route.to_string());
        }
    }

    fn paste(text: &str) -> Event {
        Event::PasteApplied {
            index: 0,
            text: text.to_string(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_correct_code_end_to_end() {
        let api = FakeApi::new(Some(231524));
        let mut driver = Driver::new(api.clone(), RecordingView::default());

        driver.handle(Event::Mounted).await;
        driver.handle(paste("231524")).await;
        driver.handle(Event::SubmitPressed).await;

        assert_eq!(driver.state().phase, Phase::Success);
        assert_eq!(driver.view().routes, vec![WELCOME_ROUTE.to_string()]);
        assert_eq!(
            api.calls(),
            vec![Call::Lookup, Call::Verify("231524".to_string())]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_wrong_code_end_to_end() {
        let api = FakeApi::new(Some(231524));
        let mut driver = Driver::new(api.clone(), RecordingView::default());

        driver.handle(Event::Mounted).await;
        driver.handle(paste("111111")).await;
        driver.handle(Event::SubmitPressed).await;

        assert_eq!(driver.state().phase, Phase::Idle);
        assert_eq!(driver.state().buffer.candidate(), "");
        assert_eq!(driver.state().buffer.focus(), 0);
        assert_eq!(driver.view().messages, vec![notification::INVALID_CODE]);
        assert!(driver.view().routes.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_seven_is_rejected_without_a_call() {
        let api = FakeApi::new(Some(123457));
        let mut driver = Driver::new(api.clone(), RecordingView::default());

        driver.handle(Event::Mounted).await;
        driver.handle(paste("123457")).await;
        driver.handle(Event::SubmitPressed).await;

        assert_eq!(driver.view().messages, vec![notification::ENDS_WITH_SEVEN]);
        assert_eq!(api.calls(), vec![Call::Lookup]);
    }

    #[test_log::test(tokio::test)]
    async fn test_unreachable_server() {
        let api = FakeApi::new(None);
        let mut driver = Driver::new(api.clone(), RecordingView::default());

        driver.handle(Event::Mounted).await;
        driver.handle(paste("231524")).await;
        driver.handle(Event::SubmitPressed).await;

        assert_eq!(
            driver.view().messages,
            vec![notification::FETCH_FAILED, notification::CODE_UNAVAILABLE]
        );
        assert_eq!(api.calls(), vec![Call::Lookup]);
    }

    #[test_log::test(tokio::test)]
    async fn test_request_code_by_email() {
        let api = FakeApi::new(Some(231524));
        let mut driver = Driver::new(api.clone(), RecordingView::default());

        driver.handle(Event::Modal(ModalEvent::Opened)).await;
        driver
            .handle(Event::Modal(ModalEvent::EmailChanged(
                "someone@example.com".to_string(),
            )))
            .await;
        driver.handle(Event::Modal(ModalEvent::ConfirmPressed)).await;

        assert_eq!(driver.state().modal.phase(), ModalPhase::Closed);
        assert_eq!(driver.view().messages, vec![notification::CODE_SENT]);
        assert_eq!(
            api.calls(),
            vec![Call::Dispatch("someone@example.com".to_string())]
        );
    }
}
