//! Conversion: EnrollmentResponse → Certificate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::wire::EnrollmentResponse;
use crate::crypto::Certificate;
use crate::error::CertificateError;

impl TryFrom<&EnrollmentResponse> for Certificate {
    type Error = CertificateError;

    /// Base64, then PEM, then X.509; each layer fails with its own kind.
    fn try_from(source: &EnrollmentResponse) -> Result<Self, Self::Error> {
        let pem = STANDARD.decode(source.cert.trim())?;
        Certificate::from_pem(pem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::certificate::testing::self_signed;
    use crate::crypto::{KeyAlgorithm, PrivateKey};

    fn response(cert: String) -> EnrollmentResponse {
        EnrollmentResponse {
            cert,
            server_info: None,
        }
    }

    #[test]
    fn test_decodes_nested_base64_pem() {
        let cert = self_signed(&PrivateKey::generate(KeyAlgorithm::EcdsaP256), "admin");
        let resp = response(STANDARD.encode(cert.to_pem()));

        let decoded = Certificate::try_from(&resp).unwrap();
        assert_eq!(decoded.der(), cert.der());
        assert_eq!(decoded.subject_common_name(), Some("admin"));
    }

    #[test]
    fn test_each_layer_has_distinct_error() {
        let err = Certificate::try_from(&response("%%%".to_string())).unwrap_err();
        assert!(matches!(err, CertificateError::Base64(_)));

        let err = Certificate::try_from(&response(STANDARD.encode("no pem here"))).unwrap_err();
        assert!(matches!(err, CertificateError::Pem(_)));

        let bogus = pem::encode(&pem::Pem::new("CERTIFICATE", vec![0x30, 0x00]));
        let err = Certificate::try_from(&response(STANDARD.encode(bogus))).unwrap_err();
        assert!(matches!(err, CertificateError::Parse(_)));
    }
}
