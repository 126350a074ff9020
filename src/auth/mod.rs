//! Request authorization tokens.
//!
//! Every authenticated call carries an `Authorization` header built from the
//! exact request being sent:
//!
//! ```text
//! payload = METHOD "." b64url(path) "." b64(body) "." b64(cert_pem)
//! token   = b64(cert_pem) "." b64(sign(sha256(payload)))
//! ```
//!
//! The CA rebuilds `payload` from the request it receives and verifies the
//! signature against the certificate carried in the token, so the path must be
//! the URL path only (no query) and an empty body encodes to an empty segment.
//! Tokens bind to one request and are never reused.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::crypto::Signer;
use crate::error::CryptoError;

/// Canonical string covered by the token signature.
pub fn canonical_payload(method: &str, path: &str, body: &[u8], certificate_pem: &[u8]) -> String {
    [
        method.to_string(),
        URL_SAFE.encode(path.as_bytes()),
        STANDARD.encode(body),
        STANDARD.encode(certificate_pem),
    ]
    .join(".")
}

/// SHA-256 of the canonical payload; this is what the signer signs.
pub fn payload_digest(payload: &str) -> [u8; 32] {
    Sha256::digest(payload.as_bytes()).into()
}

/// Build the `Authorization` header value for one request.
pub fn create_token(
    method: &str,
    path: &str,
    body: &[u8],
    signer: &dyn Signer,
) -> Result<String, CryptoError> {
    let certificate_pem = signer.certificate_pem();
    let payload = canonical_payload(method, path, body, &certificate_pem);
    let signature = signer.sign(&payload_digest(&payload))?;

    Ok(format!(
        "{}.{}",
        STANDARD.encode(&certificate_pem),
        STANDARD.encode(signature)
    ))
}
