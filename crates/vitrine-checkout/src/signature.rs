//! Webhook signature verification.
//!
//! The processor signs every webhook delivery with HMAC-SHA256 over the raw
//! request body. The signature header carries a unix timestamp and one or
//! more hex signatures:
//!
//! ```text
//! t=1692000000,v1=5257a869e7...
//! ```
//!
//! The signed payload is `"{t}.{raw body}"`, so verification must run
//! against the unparsed bytes exactly as received. Any re-serialization of
//! the body breaks the signature. Verification fails closed: a bad header,
//! stale timestamp, or mismatched digest all reject the event before any
//! state is touched.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed skew between the signature timestamp and now, in seconds.
///
/// Bounds the replay window for captured deliveries.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Result of signature validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the signature is valid.
    pub is_valid: bool,
    /// Error message if validation failed.
    pub error_message: Option<String>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn valid() -> Self {
        Self { is_valid: true, error_message: None }
    }

    /// Creates a failed validation result with error message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false, error_message: Some(message.into()) }
    }
}

/// Signature header parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Header missing the `t=` timestamp element.
    MissingTimestamp,
    /// Header missing the `v1=` signature element.
    MissingSignature,
    /// Header did not match the expected format.
    InvalidFormat(String),
    /// Signing secret was rejected as an HMAC key.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTimestamp => write!(f, "signature header missing timestamp"),
            Self::MissingSignature => write!(f, "signature header missing v1 signature"),
            Self::InvalidFormat(detail) => write!(f, "invalid signature header: {detail}"),
            Self::InvalidSecret => write!(f, "invalid signing secret"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Parsed elements of a signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: i64,
    signature: String,
}

/// Validates a webhook signature against the raw request body.
///
/// `now_unix` is injected rather than read from the clock so verification is
/// deterministic under test. Uses [`DEFAULT_TOLERANCE_SECS`] for the replay
/// window.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now_unix: i64,
) -> ValidationResult {
    verify_signature_with_tolerance(payload, header, secret, now_unix, DEFAULT_TOLERANCE_SECS)
}

/// Validates a webhook signature with an explicit timestamp tolerance.
pub fn verify_signature_with_tolerance(
    payload: &[u8],
    header: &str,
    secret: &str,
    now_unix: i64,
    tolerance_secs: i64,
) -> ValidationResult {
    if header.is_empty() {
        return ValidationResult::invalid("signature header is empty");
    }

    if secret.is_empty() {
        return ValidationResult::invalid("signing secret is empty");
    }

    let parsed = match parse_signature_header(header) {
        Ok(parsed) => parsed,
        Err(err) => return ValidationResult::invalid(err.to_string()),
    };

    if (now_unix - parsed.timestamp).abs() > tolerance_secs {
        return ValidationResult::invalid("timestamp outside tolerance");
    }

    let expected = match compute_signature(payload, secret, parsed.timestamp) {
        Ok(expected) => expected,
        Err(err) => return ValidationResult::invalid(err.to_string()),
    };

    if timing_safe_eq(&parsed.signature, &expected) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("signature mismatch")
    }
}

/// Computes the hex signature for a payload at a given timestamp.
///
/// Exposed so tests and local tooling can produce validly signed deliveries.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret is rejected as an
/// HMAC key.
pub fn compute_signature(
    payload: &[u8],
    secret: &str,
    timestamp: i64,
) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a complete signature header for a payload.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret is rejected as an
/// HMAC key.
pub fn signature_header(
    payload: &[u8],
    secret: &str,
    timestamp: i64,
) -> Result<String, SignatureError> {
    Ok(format!("t={timestamp},v1={}", compute_signature(payload, secret, timestamp)?))
}

/// Parses `t=<ts>,v1=<hex>` into its elements.
///
/// Unknown elements are ignored so additional scheme versions in the header
/// do not break verification.
fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signature = None;

    for element in header.split(',') {
        match element.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| {
                    SignatureError::InvalidFormat(format!("non-numeric timestamp: {value}"))
                })?);
            },
            Some(("v1", value)) => signature = Some(value.to_string()),
            Some(_) => {},
            None => {
                return Err(SignatureError::InvalidFormat(format!(
                    "element without '=': {element}"
                )));
            },
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    let signature = signature.ok_or(SignatureError::MissingSignature)?;

    Ok(SignatureHeader { timestamp, signature })
}

/// Timing-safe string comparison to prevent timing attacks.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
