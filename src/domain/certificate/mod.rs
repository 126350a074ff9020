//! Certificate domain — issued certificate queries and revocation.

pub mod client;
pub mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

// ─── Listing ─────────────────────────────────────────────────────────────────

fn is_false(b: &bool) -> bool {
    !*b
}

/// Filters for `GET /api/v1/certificates`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aki: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub revoked: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub expired: bool,
    #[serde(rename = "notrevoked", skip_serializing_if = "is_false")]
    pub not_revoked: bool,
    #[serde(rename = "notexpired", skip_serializing_if = "is_false")]
    pub not_expired: bool,
    /// RFC 3339 timestamp or relative duration such as `-30d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_end: Option<String>,
    #[serde(rename = "ca", skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
}

impl CertificateListParams {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn serial(mut self, serial: impl Into<String>, aki: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self.aki = Some(aki.into());
        self
    }

    pub fn revoked(mut self) -> Self {
        self.revoked = true;
        self
    }

    pub fn not_revoked(mut self) -> Self {
        self.not_revoked = true;
        self
    }

    pub fn expired(mut self) -> Self {
        self.expired = true;
        self
    }

    pub fn not_expired(mut self) -> Self {
        self.not_expired = true;
        self
    }

    pub fn ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = Some(ca_name.into());
        self
    }

    /// Encoded query string, or `None` when no filter is set.
    pub fn to_query(&self) -> Result<Option<String>, ErrorKind> {
        let query = serde_urlencoded::to_string(self)?;
        Ok(Some(query).filter(|q| !q.is_empty()))
    }
}

// ─── Revocation ──────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/revoke`.
///
/// Either `id` (revoke every certificate of an identity) or `serial` with
/// `aki` (revoke one certificate) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub serial: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aki: String,
    /// RFC 5280 reason name, e.g. `keycompromise`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Ask the CA to return a fresh CRL.
    #[serde(rename = "gencrl", default, skip_serializing_if = "is_false")]
    pub gen_crl: bool,
    #[serde(rename = "caname", default, skip_serializing_if = "String::is_empty")]
    pub ca_name: String,
}

impl RevocationRequest {
    pub fn identity(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn certificate(serial: impl Into<String>, aki: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            aki: aki.into(),
            ..Self::default()
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn gen_crl(mut self) -> Self {
        self.gen_crl = true;
        self
    }

    pub fn ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = ca_name.into();
        self
    }
}

/// A certificate the CA reports as revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedCertificate {
    #[serde(rename = "Serial")]
    pub serial: String,
    #[serde(rename = "AKI")]
    pub aki: String,
}

/// A parsed certificate revocation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationList {
    pub der: Vec<u8>,
    pub issuer: String,
    pub this_update: DateTime<Utc>,
    pub next_update: Option<DateTime<Utc>>,
    /// Serials of the revoked certificates as lowercase hex, in list order.
    pub revoked_serials: Vec<String>,
}

/// Outcome of a revocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationResult {
    pub revoked: Vec<RevokedCertificate>,
    /// Present when the request asked for a CRL.
    pub crl: Option<RevocationList>,
}
