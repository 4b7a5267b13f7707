//! GitHub webhook signature verification using HMAC-SHA256.
//!
//! GitHub signs webhook payloads using HMAC-SHA256 with a shared secret.
//! The signature is provided in the `X-Hub-Signature-256` header as `sha256=<hex>`.
//!
//! Verification happens before the body is parsed. A request without a
//! signature is rejected the same way as one with a wrong signature.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a delivery failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The `X-Hub-Signature-256` header was absent.
    #[error("missing signature header")]
    Missing,

    /// The header was not of the form `sha256=<hex>`.
    #[error("malformed signature header")]
    Malformed,

    /// The signature did not match the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Parses a GitHub signature header (e.g., "sha256=abc123...") into raw bytes.
///
/// Returns `None` for malformed headers (missing prefix, invalid hex, etc.).
/// Never panics.
///
/// # Examples
///
/// ```
/// use comment_dispatch::webhooks::parse_signature_header;
///
/// assert!(parse_signature_header("sha256=abcd1234").is_some());
///
/// // Missing prefix, wrong algorithm, bad hex
/// assert!(parse_signature_header("abcd1234").is_none());
/// assert!(parse_signature_header("sha1=abcd1234").is_none());
/// assert!(parse_signature_header("sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("sha256=")?;
    hex::decode(hex_sig).ok()
}

/// Computes the HMAC-SHA256 signature of a payload using the given secret.
///
/// Used by tests and tooling to produce valid deliveries.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a signature as a GitHub-style header value (`sha256=<hex>`).
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Verifies a GitHub webhook signature against the payload and secret.
///
/// Uses constant-time comparison to prevent timing attacks.
///
/// # Arguments
///
/// * `payload` - The raw webhook payload bytes
/// * `signature_header` - The value of the `X-Hub-Signature-256` header, if present
/// * `secret` - The webhook secret configured in GitHub
///
/// # Examples
///
/// ```
/// use comment_dispatch::webhooks::{
///     SignatureError, compute_signature, format_signature_header, verify_signature,
/// };
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
/// let header = format_signature_header(&compute_signature(payload, secret));
///
/// assert_eq!(verify_signature(payload, Some(&header), secret), Ok(()));
/// assert_eq!(
///     verify_signature(payload, Some(&header), b"wrong-secret"),
///     Err(SignatureError::Mismatch)
/// );
/// assert_eq!(verify_signature(payload, None, secret), Err(SignatureError::Missing));
/// ```
pub fn verify_signature(
    payload: &[u8],
    signature_header: Option<&str>,
    secret: &[u8],
) -> Result<(), SignatureError> {
    let header = signature_header.ok_or(SignatureError::Missing)?;
    let expected_signature = parse_signature_header(header).ok_or(SignatureError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::Mismatch)?;
    mac.update(payload);

    // Constant-time comparison via the HMAC library
    mac.verify_slice(&expected_signature)
        .map_err(|_| SignatureError::Mismatch)
}
