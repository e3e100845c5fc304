//! Repository for contact-form submission database operations.
//!
//! Submissions are insert-only. Nothing in the system updates or deletes a
//! stored submission, and no uniqueness constraint exists: two identical
//! form posts are two independent events.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewSubmission, Submission, SubmissionId},
};

/// Repository for submission database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Stores a new submission and returns the persisted row.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn create(&self, new: &NewSubmission) -> Result<Submission> {
        let submission = Submission {
            id: SubmissionId::new(),
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO submissions (id, name, email, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(submission.id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.message)
        .bind(submission.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(submission)
    }
}
