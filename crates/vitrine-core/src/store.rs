//! Storage abstraction over submission and payment persistence.
//!
//! Provides trait seams so the HTTP surface can be exercised without a
//! database. Production uses `PostgresStore` over the repository layer;
//! tests use the in-memory implementation in [`memory`].

use std::{future::Future, pin::Pin, sync::Arc};

use rust_decimal::Decimal;

use crate::{
    error::Result,
    models::{NewSubmission, Payment, PaymentId, Submission},
    storage::Storage,
};

/// Persistence operations for contact-form submissions.
pub trait SubmissionStore: Send + Sync + 'static {
    /// Stores one submission and returns the persisted row.
    ///
    /// Submissions are insert-only; this is the only operation the system
    /// performs on them.
    fn create_submission(
        &self,
        new: NewSubmission,
    ) -> Pin<Box<dyn Future<Output = Result<Submission>> + Send + '_>>;
}

/// Persistence operations for payment records.
pub trait PaymentStore: Send + Sync + 'static {
    /// Stores one pending payment for `email` with `amount` in major units.
    fn create_payment(
        &self,
        email: String,
        amount: Decimal,
    ) -> Pin<Box<dyn Future<Output = Result<Payment>> + Send + '_>>;

    /// Marks the most recently created payment for `email` as paid.
    ///
    /// Returns the updated payment ID, or `None` when no row matches. Rows
    /// already `paid` are rewritten unchanged so that replayed completion
    /// events stay no-ops.
    fn mark_paid_by_email(
        &self,
        email: String,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentId>>> + Send + '_>>;

    /// Fetches a payment by ID.
    fn find_payment(
        &self,
        id: PaymentId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Payment>>> + Send + '_>>;
}

/// Production store implementation backed by PostgreSQL.
///
/// Wraps the concrete [`Storage`] repositories so both store traits resolve
/// to the same pool.
#[derive(Clone)]
pub struct PostgresStore {
    storage: Arc<Storage>,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store adapter.
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl SubmissionStore for PostgresStore {
    fn create_submission(
        &self,
        new: NewSubmission,
    ) -> Pin<Box<dyn Future<Output = Result<Submission>> + Send + '_>> {
        let storage = self.storage.clone();
        Box::pin(async move { storage.submissions.create(&new).await })
    }
}

impl PaymentStore for PostgresStore {
    fn create_payment(
        &self,
        email: String,
        amount: Decimal,
    ) -> Pin<Box<dyn Future<Output = Result<Payment>> + Send + '_>> {
        let storage = self.storage.clone();
        Box::pin(async move { storage.payments.create(&email, amount).await })
    }

    fn mark_paid_by_email(
        &self,
        email: String,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentId>>> + Send + '_>> {
        let storage = self.storage.clone();
        Box::pin(async move { storage.payments.mark_paid_by_email(&email).await })
    }

    fn find_payment(
        &self,
        id: PaymentId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Payment>>> + Send + '_>> {
        let storage = self.storage.clone();
        Box::pin(async move { storage.payments.find_by_id(id).await })
    }
}

pub mod memory {
    //! In-memory store implementation for testing.
    //!
    //! Deterministic stand-in for the Postgres store. Supports injecting a
    //! one-shot failure to simulate an unreachable database.

    use std::{future::Future, pin::Pin, sync::Arc};

    use chrono::Utc;
    use rust_decimal::Decimal;
    use tokio::sync::RwLock;

    use crate::{
        error::{CoreError, Result},
        models::{NewSubmission, Payment, PaymentId, PaymentStatus, Submission, SubmissionId},
        store::{PaymentStore, SubmissionStore},
    };

    /// In-memory store for testing without a database.
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        submissions: Arc<RwLock<Vec<Submission>>>,
        payments: Arc<RwLock<Vec<Payment>>>,
        fail_next: Arc<RwLock<Option<String>>>,
    }

    impl MemoryStore {
        /// Creates a new store with empty state.
        pub fn new() -> Self {
            Self::default()
        }

        /// Injects an error for the next store operation.
        pub async fn inject_failure(&self, message: impl Into<String>) {
            *self.fail_next.write().await = Some(message.into());
        }

        /// Seeds a payment row directly, bypassing the trait surface.
        pub async fn insert_payment(&self, payment: Payment) {
            self.payments.write().await.push(payment);
        }

        /// Returns all stored submissions for verification.
        pub async fn submissions(&self) -> Vec<Submission> {
            self.submissions.read().await.clone()
        }

        /// Returns all stored payments for verification.
        pub async fn payments(&self) -> Vec<Payment> {
            self.payments.read().await.clone()
        }

        async fn take_failure(&self) -> Result<()> {
            let failure = self.fail_next.write().await.take();
            match failure {
                Some(message) => Err(CoreError::Database(message)),
                None => Ok(()),
            }
        }
    }

    impl SubmissionStore for MemoryStore {
        fn create_submission(
            &self,
            new: NewSubmission,
        ) -> Pin<Box<dyn Future<Output = Result<Submission>> + Send + '_>> {
            Box::pin(async move {
                self.take_failure().await?;

                let submission = Submission {
                    id: SubmissionId::new(),
                    name: new.name,
                    email: new.email,
                    message: new.message,
                    created_at: Utc::now(),
                };
                self.submissions.write().await.push(submission.clone());
                Ok(submission)
            })
        }
    }

    impl PaymentStore for MemoryStore {
        fn create_payment(
            &self,
            email: String,
            amount: Decimal,
        ) -> Pin<Box<dyn Future<Output = Result<Payment>> + Send + '_>> {
            Box::pin(async move {
                self.take_failure().await?;

                let payment = Payment {
                    id: PaymentId::new(),
                    email,
                    amount,
                    status: PaymentStatus::Pending,
                    created_at: Utc::now(),
                };
                self.payments.write().await.push(payment.clone());
                Ok(payment)
            })
        }

        fn mark_paid_by_email(
            &self,
            email: String,
        ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentId>>> + Send + '_>> {
            Box::pin(async move {
                self.take_failure().await?;

                let mut payments = self.payments.write().await;

                // Newest matching row wins, matching the SQL implementation.
                // Later insertion wins ties on created_at.
                let mut newest: Option<usize> = None;
                for (i, payment) in payments.iter().enumerate() {
                    if payment.email != email {
                        continue;
                    }
                    match newest {
                        Some(n) if payments[n].created_at > payment.created_at => {},
                        _ => newest = Some(i),
                    }
                }

                Ok(newest.map(|i| {
                    payments[i].status = PaymentStatus::Paid;
                    payments[i].id
                }))
            })
        }

        fn find_payment(
            &self,
            id: PaymentId,
        ) -> Pin<Box<dyn Future<Output = Result<Option<Payment>>> + Send + '_>> {
            Box::pin(async move {
                self.take_failure().await?;

                Ok(self.payments.read().await.iter().find(|p| p.id == id).cloned())
            })
        }
    }
}
