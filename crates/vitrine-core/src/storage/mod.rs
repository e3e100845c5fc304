//! Database access layer implementing the repository pattern.
//!
//! The repository layer translates between domain models and the Postgres
//! schema. All database operations go through these repositories; direct SQL
//! outside this module is forbidden to keep the schema in one place.

use std::sync::Arc;

use sqlx::PgPool;

pub mod payments;
pub mod submissions;

/// Container for all repository instances providing unified database access.
///
/// Initialized once at startup and handed to the HTTP surface; repositories
/// share a single connection pool.
#[derive(Clone)]
pub struct Storage {
    /// Repository for contact-form submissions.
    pub submissions: Arc<submissions::Repository>,

    /// Repository for payment records.
    pub payments: Arc<payments::Repository>,
}

impl Storage {
    /// Creates a new storage instance with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);

        Self {
            submissions: Arc::new(submissions::Repository::new(pool.clone())),
            payments: Arc::new(payments::Repository::new(pool)),
        }
    }
}
