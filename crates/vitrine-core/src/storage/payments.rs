//! Repository for payment record database operations.
//!
//! Payments are created `pending` by the checkout initiator and flipped to
//! `paid` by webhook reconciliation. The reconciliation update correlates by
//! customer email only; see `mark_paid_by_email` for the exact row choice.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Payment, PaymentId, PaymentStatus},
};

/// Repository for payment database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Stores a new pending payment and returns the persisted row.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn create(&self, email: &str, amount: Decimal) -> Result<Payment> {
        let payment = Payment {
            id: PaymentId::new(),
            email: email.to_string(),
            amount,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO payments (id, email, amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(payment.id)
        .bind(&payment.email)
        .bind(payment.amount)
        .bind(payment.status.to_string())
        .bind(payment.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(payment)
    }

    /// Marks the most recently created payment for `email` as paid.
    ///
    /// Correlation is by email alone; when several rows share the address the
    /// newest one is chosen. No status filter is applied, so replaying a
    /// completion event rewrites the same row (`paid` stays `paid`). Returns
    /// `None` when no row matches, which the reconciler treats as a no-op
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    pub async fn mark_paid_by_email(&self, email: &str) -> Result<Option<PaymentId>> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r"
            UPDATE payments
            SET status = 'paid'
            WHERE id = (
                SELECT id FROM payments
                WHERE email = $1
                ORDER BY created_at DESC
                LIMIT 1
            )
            RETURNING id
            ",
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|(id,)| PaymentId::from(id)))
    }

    /// Fetches a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r"
            SELECT id, email, amount, status, created_at
            FROM payments
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(payment)
    }
}
