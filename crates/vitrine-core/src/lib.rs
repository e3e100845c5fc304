//! Core domain models and persistence for the Vitrine portfolio backend.
//!
//! Provides strongly-typed domain primitives, the error taxonomy, Postgres
//! repositories, and the store traits the HTTP surface is written against.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use error::{CoreError, Result};
pub use models::{NewSubmission, Payment, PaymentId, PaymentStatus, Submission, SubmissionId};
pub use store::{PaymentStore, PostgresStore, SubmissionStore};
