//! Wire types for enrollment requests and responses (REST).

use serde::{Deserialize, Serialize};

use crate::domain::info::CaInfo;

/// Body of `POST /api/v1/enroll`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignRequest {
    /// PEM-encoded CSR.
    pub request: String,
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "caname", skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
}

/// Result of a successful enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrollmentResponse {
    /// Base64 of the PEM-encoded certificate.
    #[serde(rename = "Cert")]
    pub cert: String,
    #[serde(rename = "ServerInfo", default, skip_serializing_if = "Option::is_none")]
    pub server_info: Option<CaInfo>,
}
