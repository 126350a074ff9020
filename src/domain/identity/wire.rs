//! Wire types for identity responses (REST).

use serde::{Deserialize, Serialize};

use crate::domain::identity::Identity;

/// Result of `POST /api/v1/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationResponse {
    pub secret: String,
}

/// Result of `GET /api/v1/identities`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityListResponse {
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub identities: Vec<Identity>,
    #[serde(rename = "caname", default)]
    pub ca_name: String,
}
