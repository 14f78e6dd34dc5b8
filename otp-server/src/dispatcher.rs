//! Sending the current code to an email address.

use crate::{authority::CodeAuthority, setups::VerificationCodeSender};

/// Acknowledgement that the mail-delivery collaborator accepted the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack;

/// Any failure of the mail-delivery collaborator.
///
/// Malformed addresses and transport failures are not told apart.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The collaborator rejected the address or failed to deliver.
    #[error("mail delivery failed")]
    Delivery(#[from] anyhow::Error),
}

/// Forwards a receiver address and the current code to the mail-delivery collaborator.
///
/// Every call is independent: there is no queue, no retry and no shared mutable state.
#[derive(Clone, Debug)]
pub struct IssuanceDispatcher<S: VerificationCodeSender> {
    authority: CodeAuthority,
    sender: S,
}

impl<S: VerificationCodeSender> IssuanceDispatcher<S> {
    /// Create a dispatcher sending the code of `authority` through `sender`.
    pub fn new(authority: CodeAuthority, sender: S) -> Self {
        Self { authority, sender }
    }

    /// The underlying mail-delivery collaborator.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Send the current code to `receiver`.
    pub async fn dispatch(&self, receiver: &str) -> Result<Ack, DispatchError> {
        let code = self.authority.lookup().to_string();

        match self.sender.send_code(receiver, &code).await {
            Ok(()) => {
                tracing::info!(receiver, "Dispatched verification code");
                Ok(Ack)
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(receiver, %error, "Failed to dispatch verification code");
                Err(DispatchError::Delivery(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setups::test::TestVerificationCodeSender;
    use otp_core::code::VerificationCode;

    fn dispatcher() -> IssuanceDispatcher<TestVerificationCodeSender> {
        IssuanceDispatcher::new(
            CodeAuthority::new(VerificationCode::new(231524)),
            TestVerificationCodeSender::default(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_sends_current_code() {
        let dispatcher = dispatcher();

        let ack = dispatcher.dispatch("someone@example.com").await;

        assert!(matches!(ack, Ok(Ack)));
        assert_eq!(
            dispatcher.sender().get_emails(),
            vec![("someone@example.com".to_string(), "231524".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_collaborator_failure() {
        let dispatcher = dispatcher();
        dispatcher.sender().fail_deliveries();

        let result = dispatcher.dispatch("someone@example.com").await;

        assert!(matches!(result, Err(DispatchError::Delivery(_))));
        assert!(dispatcher.sender().get_emails().is_empty());
    }
}
