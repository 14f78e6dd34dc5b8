//! Production server setup code

use crate::{
    settings,
    setups::{ServerSetup, VerificationCodeSender},
};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use mailgun_rs::{EmailAddress, Mailgun, MailgunRegion, Message};
use std::collections::HashMap;

/// Production implementation of `ServerSetup`.
/// Sends codes through the mailgun HTTP API configured in `settings.toml`.
#[derive(Clone, Debug, Default)]
pub struct ProdSetup;

impl ServerSetup for ProdSetup {
    type VerificationCodeSender = EmailVerificationCodeSender;
}

#[derive(Debug, Clone)]
/// Sends verification codes over email
pub struct EmailVerificationCodeSender {
    settings: settings::Mailgun,
}

impl EmailVerificationCodeSender {
    /// Create a new EmailVerificationCodeSender
    pub fn new(settings: settings::Mailgun) -> Self {
        Self { settings }
    }

    fn sender(&self) -> EmailAddress {
        EmailAddress::name_address(&self.settings.from_name, &self.settings.from_address)
    }

    fn message(&self, email: &str, code: &str) -> Message {
        Message {
            to: vec![EmailAddress::address(email)],
            subject: self.settings.subject.clone(),
            template: self.settings.template.clone(),
            template_vars: HashMap::from_iter([("code".to_string(), code.to_string())]),
            ..Default::default()
        }
    }
}

#[async_trait]
impl VerificationCodeSender for EmailVerificationCodeSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<()> {
        let message = self.message(email, code);

        tracing::debug!(
            to = email,
            subject = %message.subject,
            template = %message.template,
            "Sending verification email"
        );

        let client = Mailgun {
            message,
            api_key: self.settings.api_key.clone(),
            domain: self.settings.domain.clone(),
        };

        client
            .async_send(MailgunRegion::US, &self.sender())
            .await
            .with_context(|| format!("mailgun rejected the message to {email}"))?;

        Ok(())
    }
}
