//! The Axum Application State

use crate::{
    authority::CodeAuthority,
    dispatcher::IssuanceDispatcher,
    setups::ServerSetup,
};
use anyhow::{anyhow, Result};
use otp_core::code::VerificationCode;
use std::path::PathBuf;

#[derive(Clone)]
/// Global application route state.
pub struct AppState<S: ServerSetup> {
    /// Holder of the one code of this process
    pub authority: CodeAuthority,
    /// The service that sends the code to email addresses
    pub dispatcher: IssuanceDispatcher<S::VerificationCodeSender>,
    /// Directory of the single page app, if one is served
    pub static_dir: Option<PathBuf>,
}

/// Builder for [`AppState`]
#[derive(Debug)]
pub struct AppStateBuilder<S: ServerSetup> {
    code: Option<VerificationCode>,
    verification_code_sender: Option<S::VerificationCodeSender>,
    static_dir: Option<PathBuf>,
}

impl<S: ServerSetup> Default for AppStateBuilder<S> {
    fn default() -> Self {
        Self {
            code: None,
            verification_code_sender: None,
            static_dir: None,
        }
    }
}

impl<S: ServerSetup> AppStateBuilder<S> {
    /// Finalize the builder and return the [`AppState`]
    pub fn finalize(self) -> Result<AppState<S>> {
        let code = self.code.ok_or_else(|| anyhow!("code is required"))?;

        let verification_code_sender = self
            .verification_code_sender
            .ok_or_else(|| anyhow!("verification_code_sender is required"))?;

        let authority = CodeAuthority::new(code);

        Ok(AppState {
            authority,
            dispatcher: IssuanceDispatcher::new(authority, verification_code_sender),
            static_dir: self.static_dir,
        })
    }

    /// Set the authoritative code
    pub fn with_code(mut self, code: VerificationCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the service that sends verification codes
    pub fn with_verification_code_sender(
        mut self,
        verification_code_sender: S::VerificationCodeSender,
    ) -> Self {
        self.verification_code_sender = Some(verification_code_sender);
        self
    }

    /// Set the directory of the single page app
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        self.static_dir = static_dir;
        self
    }
}

impl<S> std::fmt::Debug for AppState<S>
where
    S: ServerSetup,
    S::VerificationCodeSender: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("authority", &self.authority)
            .field("dispatcher", &self.dispatcher)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
