//! The CA response envelope.
//!
//! Every endpoint answers with
//! `{"success": bool, "result": any, "errors": [Message], "messages": [Message]}`.
//! [`decode`] checks the HTTP status first, then the envelope, then maps
//! `result` into the caller's type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// An error or informational record returned by the CA, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub code: i64,
    pub message: String,
}

/// Raw response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    errors: Option<Vec<Message>>,
    #[serde(default)]
    messages: Option<Vec<Message>>,
}

impl ResponseEnvelope {
    pub fn errors(&self) -> &[Message] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.as_deref().unwrap_or_default()
    }
}

/// Decode a CA response.
///
/// A status outside `expected` fails before the body is looked at, so a
/// non-JSON error page still reaches the caller verbatim. `success: false`
/// always wins over whatever `result` holds.
pub fn decode<T: DeserializeOwned>(
    status: u16,
    body: &[u8],
    expected: &[u16],
) -> Result<T, EnvelopeError> {
    if !expected.contains(&status) {
        return Err(EnvelopeError::UnexpectedStatus {
            status,
            body: body.to_vec(),
        });
    }

    let envelope: ResponseEnvelope =
        serde_json::from_slice(body).map_err(EnvelopeError::Malformed)?;

    if !envelope.success {
        tracing::warn!(
            status,
            errors = envelope.errors().len(),
            "CA reported failure"
        );
        return Err(EnvelopeError::Response {
            errors: envelope.errors.unwrap_or_default(),
            messages: envelope.messages.unwrap_or_default(),
        });
    }

    serde_json::from_value(envelope.result).map_err(EnvelopeError::MalformedResult)
}
