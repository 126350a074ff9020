//! CA info domain — name, version and trust chain of the CA.

pub mod client;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::Certificate;
use crate::error::CertificateError;

/// Public information about a CA, as returned by `GET /api/v1/cainfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaInfo {
    #[serde(rename = "CAName")]
    pub ca_name: String,
    /// Base64 of a PEM bundle, root last.
    #[serde(rename = "CAChain", default)]
    pub ca_chain: String,
    #[serde(rename = "Version", default)]
    pub version: String,
}

impl CaInfo {
    /// Decode the CA chain into certificates, in server order.
    pub fn chain(&self) -> Result<Vec<Certificate>, CertificateError> {
        if self.ca_chain.is_empty() {
            return Ok(Vec::new());
        }
        let pem = STANDARD.decode(self.ca_chain.trim())?;
        Certificate::from_pem_bundle(pem)
    }
}
