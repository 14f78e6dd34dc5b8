//! Server setup for local development & easier integration testing

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{ServerSetup, VerificationCodeSender};

/// Implementation of `ServerSetup` for local environments.
/// No mail leaves the machine.
#[derive(Debug, Clone)]
pub struct LocalSetup;

impl ServerSetup for LocalSetup {
    type VerificationCodeSender = LoggingCodeSender;
}

/// A `VerificationCodeSender` that doesn't actually send emails,
/// but instead logs them via tracing.
///
/// It still rejects addresses a mail transport would refuse.
#[derive(Debug, Clone, Default)]
pub struct LoggingCodeSender;

#[async_trait]
impl VerificationCodeSender for LoggingCodeSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<()> {
        if !validator::validate_email(email) {
            bail!("Not a deliverable email address: {email:?}");
        }

        tracing::info!(email, code, "verification code (not sent, local setup)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_malformed_addresses() {
        let sender = LoggingCodeSender;

        assert!(sender.send_code("someone@example.com", "231524").await.is_ok());
        assert!(sender.send_code("not-an-address", "231524").await.is_err());
        assert!(sender.send_code("", "231524").await.is_err());
    }
}
