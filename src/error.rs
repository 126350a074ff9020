//! Unified SDK error types.

use std::fmt;

use thiserror::Error;

use crate::http::envelope::Message;

/// Top-level SDK error, tagged with the operation that produced it.
#[derive(Error, Debug)]
#[error("{operation}: {kind}")]
pub struct SdkError {
    operation: &'static str,
    #[source]
    kind: ErrorKind,
}

impl SdkError {
    pub fn new(operation: &'static str, kind: impl Into<ErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }

    /// Name of the failed operation, e.g. `"list certificates"`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Cancelled | ErrorKind::DeadlineExceeded
        )
    }
}

/// Every failure an operation can surface.
#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid query parameters: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Client has no identity to sign requests with")]
    NoIdentity,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Transport-level errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures decoding the CA's `{success, result, errors, messages}` envelope.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Unexpected HTTP status {status}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { status: u16, body: Vec<u8> },

    #[error("Malformed response envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("CA response error: {}", MessageList(.errors))]
    Response {
        errors: Vec<Message>,
        messages: Vec<Message>,
    },

    #[error("Malformed response result: {0}")]
    MalformedResult(#[source] serde_json::Error),
}

/// Certificate decoding failures, one kind per encoding layer.
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PEM decode failed: {0}")]
    Pem(String),

    #[error("X.509 parse failed: {0}")]
    Parse(String),

    #[error("certificate entry #{index} is invalid: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<CertificateError>,
    },
}

/// Key, signer, and CSR failures.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid key type: expected {expected}, got {actual}")]
    InvalidKeyType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Certificate public key does not match the private key")]
    KeyMismatch,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Key encoding failed: {0}")]
    KeyEncoding(String),

    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    #[error("CSR generation failed: {0}")]
    Csr(String),
}

struct MessageList<'a>(&'a [Message]);

impl fmt::Display for MessageList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}] {}", m.code, m.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_display_lists_codes() {
        let err = EnvelopeError::Response {
            errors: vec![
                Message {
                    code: 20,
                    message: "Authentication failure".to_string(),
                },
                Message {
                    code: 71,
                    message: "Identity not found".to_string(),
                },
            ],
            messages: vec![],
        };
        assert_eq!(
            err.to_string(),
            "CA response error: [20] Authentication failure, [71] Identity not found"
        );
    }

    #[test]
    fn test_sdk_error_carries_operation() {
        let err = SdkError::new("list certificates", ErrorKind::NoIdentity);
        assert_eq!(err.operation(), "list certificates");
        assert!(err.to_string().starts_with("list certificates: "));
        assert!(!err.is_cancelled());
        assert!(SdkError::new("enroll", ErrorKind::DeadlineExceeded).is_cancelled());
    }

    #[test]
    fn test_unexpected_status_shows_raw_body() {
        let err = EnvelopeError::UnexpectedStatus {
            status: 502,
            body: b"<html>bad gateway</html>".to_vec(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected HTTP status 502: <html>bad gateway</html>"
        );
    }
}
