//! Enrollment domain — certificate request templates and enrollment options.
//!
//! Enrolling turns an identity name and its one-time secret into a certificate:
//! a CSR is built locally, submitted under HTTP Basic auth, and the issued
//! certificate is decoded from the reply together with the key it was made for.

pub mod client;
pub mod convert;
pub mod csr;
pub mod wire;

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::crypto::{KeyAlgorithm, PrivateKey};

/// Profile used when the caller names none.
pub const DEFAULT_PROFILE: &str = "default";

// ─── SignatureAlgorithm ──────────────────────────────────────────────────────

/// CSR signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    EcdsaWithSha256,
    EcdsaWithSha384,
    EcdsaWithSha512,
}

impl SignatureAlgorithm {
    /// Algorithm used when a template leaves it unset.
    ///
    /// ECDSA-with-SHA-256 for P-256 keys; P-384 keys get SHA-384, the only
    /// digest their CSRs can be signed with here.
    pub fn default_for(key: KeyAlgorithm) -> Self {
        match key {
            KeyAlgorithm::EcdsaP256 => Self::EcdsaWithSha256,
            KeyAlgorithm::EcdsaP384 => Self::EcdsaWithSha384,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EcdsaWithSha256 => "ecdsa-with-SHA256",
            Self::EcdsaWithSha384 => "ecdsa-with-SHA384",
            Self::EcdsaWithSha512 => "ecdsa-with-SHA512",
        }
    }
}

// ─── CertificateRequestTemplate ──────────────────────────────────────────────

/// Subject and extensions requested in a CSR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequestTemplate {
    pub common_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<IpAddr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<String>,
    /// `None` picks [`SignatureAlgorithm::default_for`] the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<SignatureAlgorithm>,
}

impl CertificateRequestTemplate {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn organizational_unit(mut self, unit: impl Into<String>) -> Self {
        self.organizational_unit = Some(unit.into());
        self
    }

    pub fn dns_name(mut self, name: impl Into<String>) -> Self {
        self.dns_names.push(name.into());
        self
    }

    pub fn ip_address(mut self, ip: IpAddr) -> Self {
        self.ip_addresses.push(ip);
        self
    }

    pub fn email_address(mut self, email: impl Into<String>) -> Self {
        self.email_addresses.push(email.into());
        self
    }

    pub fn signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = Some(algorithm);
        self
    }
}

// ─── EnrollmentOptions ───────────────────────────────────────────────────────

/// Per-call enrollment settings.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentOptions {
    /// Key to certify. A fresh key of `key_algorithm` is generated when unset.
    pub private_key: Option<PrivateKey>,
    pub key_algorithm: KeyAlgorithm,
    /// Signing profile; [`DEFAULT_PROFILE`] when unset.
    pub profile: Option<String>,
    /// HSM label of the signing key on the CA side.
    pub label: Option<String>,
    /// Target CA when the server hosts several.
    pub ca_name: Option<String>,
}

impl EnrollmentOptions {
    pub fn private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn key_algorithm(mut self, algorithm: KeyAlgorithm) -> Self {
        self.key_algorithm = algorithm;
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = Some(ca_name.into());
        self
    }

    pub(crate) fn profile_or_default(&self) -> &str {
        self.profile
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        assert_eq!(EnrollmentOptions::default().profile_or_default(), "default");
        assert_eq!(
            EnrollmentOptions::default().profile("").profile_or_default(),
            "default"
        );
        assert_eq!(
            EnrollmentOptions::default().profile("tls").profile_or_default(),
            "tls"
        );
    }

    #[test]
    fn test_default_signature_algorithm_follows_curve() {
        assert_eq!(
            SignatureAlgorithm::default_for(KeyAlgorithm::EcdsaP256),
            SignatureAlgorithm::EcdsaWithSha256
        );
        assert_eq!(
            SignatureAlgorithm::default_for(KeyAlgorithm::EcdsaP384),
            SignatureAlgorithm::EcdsaWithSha384
        );
    }

    #[test]
    fn test_template_builder() {
        let t = CertificateRequestTemplate::new("peer0")
            .organization("Org1")
            .dns_name("peer0.org1.example.com")
            .ip_address("127.0.0.1".parse().unwrap());
        assert_eq!(t.common_name, "peer0");
        assert_eq!(t.organization.as_deref(), Some("Org1"));
        assert_eq!(t.dns_names.len(), 1);
        assert_eq!(t.ip_addresses.len(), 1);
        assert!(t.signature_algorithm.is_none());
    }
}
