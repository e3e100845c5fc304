//! HTTP client for transactional email dispatch.
//!
//! The original deployment sent mail through an account at a hosted provider
//! using a sender address and app password. That transport is modeled here as
//! an authenticated HTTP relay: one POST per message, no queuing, no retry.
//! A failed send surfaces to the caller as-is.

use std::{future::Future, pin::Pin, time::Duration};

use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use crate::error::{MailerError, Result};

/// A message ready for dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Sends transactional email.
///
/// Trait seam so handlers can be tested with the recording double in
/// [`mock`] instead of a live relay.
pub trait Mailer: Send + Sync + 'static {
    /// Sends one message. One attempt; failures are not retried.
    fn send(&self, email: OutgoingEmail) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Configuration for the HTTP mail relay client.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Relay endpoint messages are posted to.
    pub relay_url: String,
    /// Sender address, also the relay username.
    pub sender: String,
    /// App password for the sender account.
    pub password: String,
    /// Timeout for the send request.
    pub timeout: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            relay_url: String::new(),
            sender: String::new(),
            password: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

const USER_AGENT: &str = "Vitrine-Mailer/1.0";

/// Mail client posting messages to an authenticated HTTP relay.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    /// Creates a new mail client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: MailerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailerError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

impl Mailer for HttpMailer {
    fn send(&self, email: OutgoingEmail) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let span = info_span!("send_email", to = %email.to, subject = %email.subject);

        Box::pin(
            async move {
                debug!("dispatching message to relay");

                let message = RelayMessage {
                    from: &self.config.sender,
                    to: &email.to,
                    subject: &email.subject,
                    text: &email.body,
                };

                let response = self
                    .client
                    .post(&self.config.relay_url)
                    .basic_auth(&self.config.sender, Some(&self.config.password))
                    .json(&message)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(MailerError::Rejected { status: status.as_u16() });
                }

                debug!("relay accepted message");
                Ok(())
            }
            .instrument(span),
        )
    }
}

pub mod mock {
    //! Recording mailer for testing without a relay.

    use std::{future::Future, pin::Pin, sync::Arc};

    use tokio::sync::RwLock;

    use super::{Mailer, OutgoingEmail};
    use crate::error::{MailerError, Result};

    /// Mailer that records every message instead of sending it.
    ///
    /// Supports injecting a one-shot failure to simulate relay outages.
    #[derive(Clone, Default)]
    pub struct RecordingMailer {
        sent: Arc<RwLock<Vec<OutgoingEmail>>>,
        fail_next: Arc<RwLock<Option<String>>>,
    }

    impl RecordingMailer {
        /// Creates a new recording mailer with no messages.
        pub fn new() -> Self {
            Self::default()
        }

        /// Injects an error for the next send.
        pub async fn inject_failure(&self, message: impl Into<String>) {
            *self.fail_next.write().await = Some(message.into());
        }

        /// Returns all recorded messages for verification.
        pub async fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.read().await.clone()
        }
    }

    impl Mailer for RecordingMailer {
        fn send(
            &self,
            email: OutgoingEmail,
        ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                let failure = self.fail_next.write().await.take();
                if let Some(message) = failure {
                    return Err(MailerError::SendFailed(message));
                }

                self.sent.write().await.push(email);
                Ok(())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mock::RecordingMailer, *};

    #[test]
    fn mailer_builds_from_config() {
        let config = MailerConfig {
            relay_url: "https://relay.example.com/messages".to_string(),
            sender: "me@example.com".to_string(),
            password: "app-password".to_string(),
            timeout: Duration::from_secs(5),
        };

        assert!(HttpMailer::new(config).is_ok());
    }

    #[tokio::test]
    async fn send_surfaces_transport_failure() {
        // Nothing listens on this port; the send path runs end to end and
        // reports the connection failure instead of panicking.
        let config = MailerConfig {
            relay_url: "http://127.0.0.1:1/messages".to_string(),
            sender: "me@example.com".to_string(),
            password: "app-password".to_string(),
            timeout: Duration::from_secs(1),
        };
        let mailer = HttpMailer::new(config).unwrap();

        let result = mailer
            .send(OutgoingEmail {
                to: "ana@x.com".to_string(),
                subject: "Form Submission Received".to_string(),
                body: "Hello Ana".to_string(),
            })
            .await;

        assert!(matches!(result, Err(MailerError::Transport(_))));
    }

    #[tokio::test]
    async fn recording_mailer_captures_messages() {
        let mailer = RecordingMailer::new();

        mailer
            .send(OutgoingEmail {
                to: "ana@x.com".to_string(),
                subject: "Form Submission Received".to_string(),
                body: "Hello Ana".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@x.com");
    }

    #[tokio::test]
    async fn recording_mailer_injected_failure_is_one_shot() {
        let mailer = RecordingMailer::new();
        mailer.inject_failure("relay down").await;

        let email = OutgoingEmail {
            to: "ana@x.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };

        assert!(mailer.send(email.clone()).await.is_err());
        assert!(mailer.send(email).await.is_ok());
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
