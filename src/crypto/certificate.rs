//! X.509 certificates exchanged with the CA.
//!
//! A [`Certificate`] owns its DER bytes and a summary extracted once at parse
//! time, so accessors never re-parse and never fail.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::CertificateError;

const PEM_TAG: &str = "CERTIFICATE";

/// A parsed X.509 certificate.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    subject_common_name: Option<String>,
    issuer: String,
    serial: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    public_key: Vec<u8>,
}

impl Certificate {
    /// Parse DER bytes. Trailing bytes after the certificate are rejected.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self, CertificateError> {
        let der = der.into();
        let (rest, cert) = x509_parser::parse_x509_certificate(&der)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        if !rest.is_empty() {
            return Err(CertificateError::Parse(format!(
                "{} trailing bytes after certificate",
                rest.len()
            )));
        }

        let subject_common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_string);
        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();
        let serial = hex::encode(cert.raw_serial());
        let not_before = to_utc(cert.validity().not_before.timestamp());
        let not_after = to_utc(cert.validity().not_after.timestamp());
        let public_key = cert.public_key().subject_public_key.data.to_vec();
        drop(cert);

        Ok(Self {
            der,
            subject,
            subject_common_name,
            issuer,
            serial,
            not_before,
            not_after,
            public_key,
        })
    }

    /// Decode the first PEM block in `input` and parse its contents.
    ///
    /// PEM failures and X.509 failures are reported as distinct kinds.
    pub fn from_pem(input: impl AsRef<[u8]>) -> Result<Self, CertificateError> {
        let block = pem::parse(input).map_err(|e| CertificateError::Pem(e.to_string()))?;
        Self::from_der(block.into_contents())
    }

    /// Parse every `CERTIFICATE` block in a PEM bundle, in order.
    pub fn from_pem_bundle(input: impl AsRef<[u8]>) -> Result<Vec<Self>, CertificateError> {
        let blocks = pem::parse_many(input).map_err(|e| CertificateError::Pem(e.to_string()))?;
        blocks
            .into_iter()
            .filter(|b| b.tag() == PEM_TAG)
            .enumerate()
            .map(|(index, b)| {
                Self::from_der(b.into_contents()).map_err(|e| CertificateError::Entry {
                    index,
                    source: Box::new(e),
                })
            })
            .collect()
    }

    pub fn to_pem(&self) -> String {
        let block = pem::Pem::new(PEM_TAG, self.der.clone());
        pem::encode_config(
            &block,
            pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
        )
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Subject distinguished name, RFC 4514 style.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn subject_common_name(&self) -> Option<&str> {
        self.subject_common_name.as_deref()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Serial number as lowercase hex.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Raw `subjectPublicKey` bits (an uncompressed SEC1 point for EC keys).
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("serial", &self.serial)
            .field("not_after", &self.not_after)
            .finish()
    }
}

fn to_utc(timestamp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
