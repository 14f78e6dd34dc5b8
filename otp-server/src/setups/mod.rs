//! This abstracts otp server side-effects into "setups".
//!
//! This module defines the trait, submodules define local, test & production
//! collections of implementations.
use anyhow::Result;
use async_trait::async_trait;

pub mod local;
pub mod prod;

/// This trait groups type parameters to the server's `AppState` struct.
///
/// It captures the setup of the server, distinguishing between e.g.
/// unit testing & production setups.
pub trait ServerSetup: Clone + Send + Sync + 'static {
    /// Which implementation to use to send verification codes
    type VerificationCodeSender: VerificationCodeSender;
}

/// The mail-delivery collaborator.
///
/// Accepts an address and the code and either delivers it or fails.
/// Implementations must not retry.
#[async_trait]
pub trait VerificationCodeSender: std::fmt::Debug + Clone + Send + Sync + 'static {
    /// Send `code` to `email`
    async fn send_code(&self, email: &str, code: &str) -> Result<()>;
}
