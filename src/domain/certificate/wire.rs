//! Wire types for certificate responses (REST).

use serde::{Deserialize, Serialize};

use crate::domain::certificate::RevokedCertificate;

/// Result of `GET /api/v1/certificates`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateListResponse {
    #[serde(rename = "caname", default)]
    pub ca_name: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub certs: Vec<CertificatePem>,
}

/// One certificate entry, PEM-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificatePem {
    #[serde(rename = "PEM")]
    pub pem: String,
}

/// Result of `POST /api/v1/revoke`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevocationResponse {
    #[serde(
        rename = "RevokedCerts",
        default,
        deserialize_with = "crate::serde_util::null_as_empty::deserialize"
    )]
    pub revoked_certs: Vec<RevokedCertificate>,
    /// Base64 of a PEM (or raw DER) CRL; empty unless one was requested.
    #[serde(rename = "CRL", default)]
    pub crl: Option<String>,
}
