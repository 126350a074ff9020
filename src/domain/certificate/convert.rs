//! Conversion: certificate list and revocation responses → domain types.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};

use super::wire::{CertificatePem, RevocationResponse};
use super::{RevocationList, RevocationResult};
use crate::context::Context;
use crate::crypto::Certificate;
use crate::error::{CertificateError, ErrorKind};

const CRL_PEM_TAG: &str = "X509 CRL";

/// Decode every entry, all or nothing.
///
/// The first entry that fails aborts the batch with
/// [`CertificateError::Entry`] naming its index. The context is checked
/// between entries so a large list stops promptly on cancellation.
pub fn decode_certificates(
    ctx: &Context,
    entries: &[CertificatePem],
) -> Result<Vec<Certificate>, ErrorKind> {
    let mut certs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        ctx.check()?;
        let cert = Certificate::from_pem(entry.pem.as_bytes()).map_err(|e| {
            CertificateError::Entry {
                index,
                source: Box::new(e),
            }
        })?;
        certs.push(cert);
    }
    Ok(certs)
}

impl TryFrom<RevocationResponse> for RevocationResult {
    type Error = CertificateError;

    fn try_from(source: RevocationResponse) -> Result<Self, Self::Error> {
        let crl = match source.crl.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => Some(parse_crl(&STANDARD.decode(encoded)?)?),
            _ => None,
        };
        Ok(Self {
            revoked: source.revoked_certs,
            crl,
        })
    }
}

/// Parse a CRL given as PEM or raw DER.
pub fn parse_crl(input: &[u8]) -> Result<RevocationList, CertificateError> {
    let der = if input.starts_with(b"-----BEGIN") {
        let block = pem::parse(input).map_err(|e| CertificateError::Pem(e.to_string()))?;
        if block.tag() != CRL_PEM_TAG {
            return Err(CertificateError::Pem(format!(
                "expected {CRL_PEM_TAG}, found {}",
                block.tag()
            )));
        }
        block.into_contents()
    } else {
        input.to_vec()
    };

    let (_, crl) = x509_parser::parse_x509_crl(&der)
        .map_err(|e| CertificateError::Parse(e.to_string()))?;

    let issuer = crl.issuer().to_string();
    let this_update = to_utc(crl.last_update().timestamp());
    let next_update = crl.next_update().map(|t| to_utc(t.timestamp()));
    let revoked_serials = crl
        .iter_revoked_certificates()
        .map(|rc| hex::encode(rc.raw_serial()))
        .collect();

    Ok(RevocationList {
        der,
        issuer,
        this_update,
        next_update,
        revoked_serials,
    })
}

fn to_utc(timestamp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::certificate::testing::self_signed;
    use crate::crypto::{KeyAlgorithm, PrivateKey};
    use crate::domain::certificate::RevokedCertificate;

    fn entry(pem: String) -> CertificatePem {
        CertificatePem { pem }
    }

    fn cert(cn: &str) -> Certificate {
        self_signed(&PrivateKey::generate(KeyAlgorithm::EcdsaP256), cn)
    }

    #[test]
    fn test_decode_keeps_server_order() {
        let entries = vec![entry(cert("b").to_pem()), entry(cert("a").to_pem())];
        let certs = decode_certificates(&Context::background(), &entries).unwrap();
        let names: Vec<_> = certs.iter().map(|c| c.subject_common_name()).collect();
        assert_eq!(names, vec![Some("b"), Some("a")]);
    }

    #[test]
    fn test_bad_entry_fails_whole_batch() {
        let entries = vec![
            entry(cert("ok").to_pem()),
            entry("-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n".to_string()),
        ];
        match decode_certificates(&Context::background(), &entries) {
            Err(ErrorKind::Certificate(CertificateError::Entry { index, source })) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, CertificateError::Parse(_)));
            }
            other => panic!("expected entry error, got {other:?}"),
        }
    }

    #[test]
    fn test_unarmored_entry_is_pem_error() {
        let entries = vec![entry("garbage".to_string())];
        match decode_certificates(&Context::background(), &entries) {
            Err(ErrorKind::Certificate(CertificateError::Entry { index: 0, source })) => {
                assert!(matches!(*source, CertificateError::Pem(_)));
            }
            other => panic!("expected entry error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_context_stops_decoding() {
        let (ctx, cancel) = Context::background().with_cancel();
        cancel.cancel();
        let entries = vec![entry(cert("a").to_pem())];
        assert!(matches!(
            decode_certificates(&ctx, &entries),
            Err(ErrorKind::Cancelled)
        ));
    }

    #[test]
    fn test_revocation_without_crl() {
        let resp = RevocationResponse {
            revoked_certs: vec![RevokedCertificate {
                serial: "1a".to_string(),
                aki: "bb".to_string(),
            }],
            crl: Some(String::new()),
        };
        let result = RevocationResult::try_from(resp).unwrap();
        assert_eq!(result.revoked.len(), 1);
        assert!(result.crl.is_none());
    }

    #[test]
    fn test_revocation_crl_errors() {
        let resp = RevocationResponse {
            revoked_certs: vec![],
            crl: Some("***".to_string()),
        };
        assert!(matches!(
            RevocationResult::try_from(resp),
            Err(CertificateError::Base64(_))
        ));

        let wrong_tag = pem::encode(&pem::Pem::new("CERTIFICATE", vec![0x30, 0x00]));
        assert!(matches!(
            parse_crl(wrong_tag.as_bytes()),
            Err(CertificateError::Pem(_))
        ));
        assert!(matches!(parse_crl(&[0x30, 0x00]), Err(CertificateError::Parse(_))));
    }
}
