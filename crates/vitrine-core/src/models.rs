//! Core domain models and strongly-typed identifiers.
//!
//! Defines contact-form submissions, payment records, and newtype ID
//! wrappers for compile-time type safety, along with the database
//! serialization impls the repositories rely on.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

type PgDb = sqlx::Postgres;
type PgValueRef<'r> = sqlx::postgres::PgValueRef<'r>;
type PgTypeInfo = sqlx::postgres::PgTypeInfo;
type PgArgumentBuffer = sqlx::postgres::PgArgumentBuffer;
type EncodeResult =
    Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>>;
type BoxDynError = sqlx::error::BoxDynError;

/// Strongly-typed submission identifier.
///
/// Wraps a UUID to prevent mixing with other ID types. Submissions are
/// insert-only, so an ID never refers to more than one stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    /// Creates a new random submission ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SubmissionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl sqlx::Type<PgDb> for SubmissionId {
    fn type_info() -> PgTypeInfo {
        <Uuid as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for SubmissionId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let uuid = <Uuid as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(uuid))
    }
}

impl sqlx::Encode<'_, PgDb> for SubmissionId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <Uuid as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Strongly-typed payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub Uuid);

impl PaymentId {
    /// Creates a new random payment ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PaymentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl sqlx::Type<PgDb> for PaymentId {
    fn type_info() -> PgTypeInfo {
        <Uuid as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for PaymentId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let uuid = <Uuid as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(uuid))
    }
}

impl sqlx::Encode<'_, PgDb> for PaymentId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <Uuid as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Payment settlement status.
///
/// A payment is created `pending` when a checkout session is initiated and
/// moves to `paid` only through webhook reconciliation:
///
/// ```text
/// Pending -> Paid
/// ```
///
/// No other transitions exist. `Paid -> Paid` is a legal no-op because the
/// processor delivers completion events at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Checkout session created, settlement not yet confirmed.
    Pending,

    /// Settlement confirmed by a verified completion event.
    ///
    /// Terminal state.
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

impl sqlx::Type<PgDb> for PaymentStatus {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for PaymentStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <&str as sqlx::Decode<PgDb>>::decode(value)?;
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("invalid payment status: {s}").into()),
        }
    }
}

/// A stored contact-form entry.
///
/// Insert-only: submissions are never mutated or deleted, and duplicates are
/// permitted by design since each submission is an independent event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Submission {
    /// Unique identifier for this submission.
    pub id: SubmissionId,

    /// Name the visitor entered in the form.
    pub name: String,

    /// Address the confirmation email is sent to.
    pub email: String,

    /// Free-text message body.
    pub message: String,

    /// When the submission was stored.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a submission, before an ID or timestamp exists.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmission {
    /// Visitor name.
    pub name: String,
    /// Visitor email address.
    pub email: String,
    /// Message body.
    pub message: String,
}

/// A stored record tracking a checkout attempt and its settlement status.
///
/// The only correlation back to the processor's checkout session is the
/// customer email. This is a known defect carried over from the original
/// design: concurrent pending payments for one address are ambiguous under
/// reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Unique identifier for this payment record.
    pub id: PaymentId,

    /// Customer email, also the webhook correlation key.
    pub email: String,

    /// Amount in major currency units.
    pub amount: Decimal,

    /// Current settlement status.
    pub status: PaymentStatus,

    /// When the payment record was created.
    pub created_at: DateTime<Utc>,
}
