//! Client for creating hosted checkout sessions.
//!
//! The processor exposes a form-encoded API that returns a redirect URL the
//! buyer completes payment at. Session creation is a single request with no
//! retry; the caller surfaces failures as-is.

use std::{future::Future, pin::Pin, time::Duration};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};

use crate::error::{CheckoutError, Result};

/// Session parameters handed to the processor.
///
/// Amounts here are already in minor units; conversion from the major-unit
/// decimal happens in [`minor_units`] before this struct is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckoutSession {
    /// Buyer email the session is created for.
    pub customer_email: String,
    /// Amount in minor currency units (cents).
    pub unit_amount: i64,
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Processor-side session identifier.
    pub id: String,
    /// Hosted page the buyer is redirected to.
    pub url: String,
}

/// Creates checkout sessions with the payment processor.
///
/// Trait seam so handlers can be tested with the recording double in
/// [`mock`] instead of the live API.
pub trait CheckoutProvider: Send + Sync + 'static {
    /// Creates one hosted checkout session and returns its redirect URL.
    fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Pin<Box<dyn Future<Output = Result<CheckoutSession>> + Send + '_>>;
}

/// Converts a major-unit amount to whole minor units (`amount × 100`).
///
/// # Errors
///
/// Returns `CheckoutError::InvalidAmount` when the amount is not positive,
/// does not land on a whole number of cents, or overflows `i64`.
pub fn minor_units(amount: Decimal) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(CheckoutError::InvalidAmount("amount must be positive".to_string()));
    }

    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| CheckoutError::InvalidAmount(format!("amount {amount} overflows")))?;
    if !scaled.fract().is_zero() {
        return Err(CheckoutError::InvalidAmount(format!(
            "amount {amount} is not a whole number of minor units"
        )));
    }

    scaled
        .to_i64()
        .ok_or_else(|| CheckoutError::InvalidAmount(format!("amount {amount} overflows")))
}

/// Configuration for the hosted checkout client.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Processor API base, e.g. `https://api.stripe.com`.
    pub api_base: String,
    /// Secret API key used as bearer auth.
    pub secret_key: String,
    /// Frontend base URL; success and cancel pages hang off it.
    pub frontend_url: String,
    /// Timeout for session creation requests.
    pub timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.stripe.com".to_string(),
            secret_key: String::new(),
            frontend_url: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Product label shown on the hosted checkout page.
const PRODUCT_NAME: &str = "Portfolio Service Payment";

/// Settlement currency for all sessions.
const CURRENCY: &str = "usd";

const USER_AGENT: &str = "Vitrine-Checkout/1.0";

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

/// Checkout client for the processor's hosted session API.
#[derive(Debug, Clone)]
pub struct StripeCheckoutClient {
    client: reqwest::Client,
    config: CheckoutConfig,
}

impl StripeCheckoutClient {
    /// Creates a new checkout client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: CheckoutConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }
}

impl CheckoutProvider for StripeCheckoutClient {
    fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Pin<Box<dyn Future<Output = Result<CheckoutSession>> + Send + '_>> {
        let span = info_span!(
            "create_checkout_session",
            customer_email = %session.customer_email,
            unit_amount = session.unit_amount,
        );

        Box::pin(
            async move {
                let unit_amount = session.unit_amount.to_string();
                let success_url = format!("{}/success", self.config.frontend_url);
                let cancel_url = format!("{}/cancel", self.config.frontend_url);

                let form: Vec<(&str, &str)> = vec![
                    ("mode", "payment"),
                    ("payment_method_types[0]", "card"),
                    ("customer_email", &session.customer_email),
                    ("line_items[0][quantity]", "1"),
                    ("line_items[0][price_data][currency]", CURRENCY),
                    ("line_items[0][price_data][product_data][name]", PRODUCT_NAME),
                    ("line_items[0][price_data][unit_amount]", &unit_amount),
                    ("success_url", &success_url),
                    ("cancel_url", &cancel_url),
                ];

                let response = self
                    .client
                    .post(format!("{}/v1/checkout/sessions", self.config.api_base))
                    .bearer_auth(&self.config.secret_key)
                    .form(&form)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    let message = message.chars().take(512).collect();
                    return Err(CheckoutError::Api { status: status.as_u16(), message });
                }

                let session: SessionResponse = response.json().await?;
                debug!(session_id = %session.id, "checkout session created");

                Ok(CheckoutSession { id: session.id, url: session.url })
            }
            .instrument(span),
        )
    }
}

pub mod mock {
    //! Recording checkout provider for testing without the processor API.

    use std::{future::Future, pin::Pin, sync::Arc};

    use tokio::sync::RwLock;

    use super::{CheckoutProvider, CheckoutSession, NewCheckoutSession};
    use crate::error::{CheckoutError, Result};

    /// Provider that fabricates sessions and records every request.
    #[derive(Clone)]
    pub struct RecordingProvider {
        requests: Arc<RwLock<Vec<NewCheckoutSession>>>,
        fail_next: Arc<RwLock<Option<String>>>,
        redirect_url: String,
    }

    impl RecordingProvider {
        /// Creates a provider whose sessions redirect to `redirect_url`.
        pub fn new(redirect_url: impl Into<String>) -> Self {
            Self {
                requests: Arc::new(RwLock::new(Vec::new())),
                fail_next: Arc::new(RwLock::new(None)),
                redirect_url: redirect_url.into(),
            }
        }

        /// Injects an error for the next session creation.
        pub async fn inject_failure(&self, message: impl Into<String>) {
            *self.fail_next.write().await = Some(message.into());
        }

        /// Returns all recorded session requests for verification.
        pub async fn requests(&self) -> Vec<NewCheckoutSession> {
            self.requests.read().await.clone()
        }
    }

    impl Default for RecordingProvider {
        fn default() -> Self {
            Self::new("https://checkout.test/session")
        }
    }

    impl CheckoutProvider for RecordingProvider {
        fn create_session(
            &self,
            session: NewCheckoutSession,
        ) -> Pin<Box<dyn Future<Output = Result<CheckoutSession>> + Send + '_>> {
            Box::pin(async move {
                let failure = self.fail_next.write().await.take();
                if let Some(message) = failure {
                    return Err(CheckoutError::Api { status: 502, message });
                }

                let id = format!("cs_test_{}", self.requests.read().await.len() + 1);
                self.requests.write().await.push(session);

                Ok(CheckoutSession { id, url: self.redirect_url.clone() })
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{mock::RecordingProvider, *};

    #[test]
    fn minor_units_scales_by_one_hundred() {
        assert_eq!(minor_units(dec!(25)).unwrap(), 2500);
        assert_eq!(minor_units(dec!(19.99)).unwrap(), 1999);
        assert_eq!(minor_units(dec!(0.01)).unwrap(), 1);
    }

    #[test]
    fn minor_units_rejects_non_positive_amounts() {
        assert!(minor_units(Decimal::ZERO).is_err());
        assert!(minor_units(dec!(-5)).is_err());
    }

    #[test]
    fn minor_units_rejects_fractional_cents() {
        assert!(minor_units(dec!(1.005)).is_err());
    }

    #[test]
    fn minor_units_rejects_overflowing_amount() {
        // Scaling must not panic; an amount too large for minor units is an
        // input error like any other.
        let result = minor_units(Decimal::MAX);
        assert!(matches!(result, Err(CheckoutError::InvalidAmount(_))));
    }

    #[test]
    fn client_builds_from_config() {
        let config = CheckoutConfig {
            secret_key: "sk_test_xxx".to_string(),
            frontend_url: "https://example.com".to_string(),
            ..CheckoutConfig::default()
        };

        assert!(StripeCheckoutClient::new(config).is_ok());
    }

    #[tokio::test]
    async fn recording_provider_captures_requests() {
        let provider = RecordingProvider::default();

        let session = provider
            .create_session(NewCheckoutSession {
                customer_email: "bo@x.com".to_string(),
                unit_amount: 2500,
            })
            .await
            .unwrap();

        assert_eq!(session.url, "https://checkout.test/session");
        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].unit_amount, 2500);
    }
}
