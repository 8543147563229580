//! Webhook signature verification.
//!
//! Implements the provider's signing scheme: the `stripe-signature` header
//! carries `t=<unix-ts>,v1=<hex-hmac>`, where the MAC is HMAC-SHA256 over
//! `"{t}.{raw body}"` keyed with the endpoint's shared secret. Verification
//! must run over the exact bytes received; any re-serialization of the body
//! invalidates the signature.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Result, SubsyncError};

type HmacSha256 = Hmac<Sha256>;

/// Parsed signature header parts.
#[derive(Debug)]
pub struct SignatureParts {
    pub timestamp: i64,
    pub signature: String,
}

/// Parse the `stripe-signature` header.
///
/// Unknown scheme keys (e.g. `v0`) are ignored.
pub fn parse_signature_header(header: &str) -> Result<SignatureParts> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            return Err(SubsyncError::verification(
                "invalid signature header format",
            ));
        };

        match key.trim() {
            "t" => timestamp = value.parse().ok(),
            "v1" => signature = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(SignatureParts {
        timestamp: timestamp
            .ok_or_else(|| SubsyncError::verification("missing timestamp in signature"))?,
        signature: signature
            .ok_or_else(|| SubsyncError::verification("missing v1 signature"))?,
    })
}

/// Compute the hex-encoded HMAC-SHA256 signature for a payload.
pub fn compute_signature(secret: &str, payload: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SubsyncError::internal("HMAC key error"))?;

    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a raw payload against the signature header and shared secret.
///
/// # Errors
///
/// Returns [`SubsyncError::Verification`] when the header is malformed, the
/// timestamp is outside `tolerance_secs` of the current time, or the MAC
/// does not match.
pub fn verify_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<()> {
    let parts = parse_signature_header(signature_header)?;

    // The timestamp is attacker-supplied; an extreme value must read as
    // out-of-window skew, never as arithmetic overflow.
    let now = unix_now();
    let skew = now
        .checked_sub(parts.timestamp)
        .and_then(i64::checked_abs)
        .unwrap_or(i64::MAX);
    if skew > tolerance_secs {
        return Err(SubsyncError::verification(
            "timestamp outside the tolerance zone",
        ));
    }

    let signed_payload = format!("{}.{}", parts.timestamp, String::from_utf8_lossy(payload));
    let expected = compute_signature(secret, signed_payload.as_bytes())?;

    let expected_bytes =
        hex::decode(&expected).map_err(|_| SubsyncError::internal("hex encode error"))?;
    let provided_bytes = hex::decode(&parts.signature)
        .map_err(|_| SubsyncError::verification("invalid signature encoding"))?;

    // Constant-time comparison over the decoded MAC bytes.
    if expected_bytes.ct_eq(&provided_bytes).unwrap_u8() != 1 {
        return Err(SubsyncError::verification(
            "no signatures found matching the expected signature for payload",
        ));
    }

    Ok(())
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) as i64
}

/// Build a valid signature header for a payload.
///
/// Intended for tests and local tooling that need to impersonate the
/// provider against a known secret.
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> Result<String> {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let signature = compute_signature(secret, signed_payload.as_bytes())?;
    Ok(format!("t={},v1={}", timestamp, signature))
}
