//! Wire types for affiliation requests and responses (REST).

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/affiliations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddAffiliationRequest {
    pub name: String,
}

/// Result of `POST /api/v1/affiliations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffiliationCreateResponse {
    pub name: String,
    #[serde(rename = "caname", default)]
    pub ca_name: String,
}
