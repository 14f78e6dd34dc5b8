//! Helpers for running isolated webserver instances
use crate::{
    app_state::{AppState, AppStateBuilder},
    router::setup_app_router,
    settings::DEFAULT_CODE,
    setups::test::{TestSetup, TestVerificationCodeSender},
};
use anyhow::Result;
use axum::Router;
use otp_core::code::VerificationCode;

/// An in-process otp server wired to a recording mail sender
#[derive(Debug)]
pub(crate) struct TestContext {
    app: Router,
    app_state: AppState<TestSetup>,
}

impl TestContext {
    /// Create a new test context holding the default code
    pub(crate) fn new() -> Result<Self> {
        Self::new_with_state(|builder| builder)
    }

    pub(crate) fn new_with_state<F>(f: F) -> Result<Self>
    where
        F: FnOnce(AppStateBuilder<TestSetup>) -> AppStateBuilder<TestSetup>,
    {
        let builder = AppStateBuilder::default()
            .with_code(VerificationCode::new(DEFAULT_CODE))
            .with_verification_code_sender(TestVerificationCodeSender::default());

        let app_state = f(builder).finalize()?;

        let app = setup_app_router(app_state.clone());

        Ok(Self { app, app_state })
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn verification_code_sender(&self) -> &TestVerificationCodeSender {
        self.app_state.dispatcher.sender()
    }
}
