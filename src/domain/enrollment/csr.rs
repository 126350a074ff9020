//! PKCS#10 certificate signing requests.

use rcgen::{CertificateParams, DistinguishedName, DnType, Ia5String, KeyPair, SanType};

use super::{CertificateRequestTemplate, SignatureAlgorithm};
use crate::crypto::{KeyAlgorithm, PrivateKey};
use crate::error::{CryptoError, ErrorKind};

/// Pick the signing algorithm for a CSR made with `key`.
///
/// Curve/digest pairings outside P-256/SHA-256 and P-384/SHA-384 are reported
/// as [`ErrorKind::NotImplemented`].
pub fn resolve_algorithm(
    requested: Option<SignatureAlgorithm>,
    key: KeyAlgorithm,
) -> Result<&'static rcgen::SignatureAlgorithm, ErrorKind> {
    let requested = requested.unwrap_or_else(|| SignatureAlgorithm::default_for(key));
    // Limited to rcgen's ECDSA set: each curve signs only with its matching
    // digest, so P-384 defaults to SHA-384 and cross pairings are refused.
    match (key, requested) {
        (KeyAlgorithm::EcdsaP256, SignatureAlgorithm::EcdsaWithSha256) => {
            Ok(&rcgen::PKCS_ECDSA_P256_SHA256)
        }
        (KeyAlgorithm::EcdsaP384, SignatureAlgorithm::EcdsaWithSha384) => {
            Ok(&rcgen::PKCS_ECDSA_P384_SHA384)
        }
        (KeyAlgorithm::EcdsaP256, SignatureAlgorithm::EcdsaWithSha384) => Err(
            ErrorKind::NotImplemented("ecdsa-with-SHA384 CSRs for P-256 keys"),
        ),
        (KeyAlgorithm::EcdsaP384, SignatureAlgorithm::EcdsaWithSha256) => Err(
            ErrorKind::NotImplemented("ecdsa-with-SHA256 CSRs for P-384 keys"),
        ),
        (_, SignatureAlgorithm::EcdsaWithSha512) => {
            Err(ErrorKind::NotImplemented("ecdsa-with-SHA512 CSRs"))
        }
    }
}

/// Build a PEM `CERTIFICATE REQUEST` for `template`, signed by `key`.
pub fn build_csr(
    template: &CertificateRequestTemplate,
    key: &PrivateKey,
) -> Result<String, ErrorKind> {
    let alg = resolve_algorithm(template.signature_algorithm, key.algorithm())?;
    let csr = |e: rcgen::Error| CryptoError::Csr(e.to_string());

    let key_pair = KeyPair::from_pem_and_sign_algo(&key.to_pkcs8_pem()?, alg).map_err(csr)?;

    let mut params = CertificateParams::default();
    params.distinguished_name = distinguished_name(template);
    params.subject_alt_names = subject_alt_names(template).map_err(csr)?;

    let request = params.serialize_request(&key_pair).map_err(csr)?;
    let pem = request.pem().map_err(csr)?;

    tracing::debug!(
        common_name = %template.common_name,
        algorithm = %key.algorithm(),
        "Built CSR"
    );
    Ok(pem)
}

fn distinguished_name(template: &CertificateRequestTemplate) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, template.common_name.as_str());

    let optional = [
        (DnType::OrganizationName, &template.organization),
        (DnType::OrganizationalUnitName, &template.organizational_unit),
        (DnType::CountryName, &template.country),
        (DnType::StateOrProvinceName, &template.state),
        (DnType::LocalityName, &template.locality),
    ];
    for (ty, value) in optional {
        if let Some(v) = value {
            dn.push(ty, v.as_str());
        }
    }
    dn
}

fn subject_alt_names(template: &CertificateRequestTemplate) -> Result<Vec<SanType>, rcgen::Error> {
    let mut sans = Vec::new();
    for name in &template.dns_names {
        sans.push(SanType::DnsName(Ia5String::try_from(name.as_str())?));
    }
    for ip in &template.ip_addresses {
        sans.push(SanType::IpAddress(*ip));
    }
    for email in &template.email_addresses {
        sans.push(SanType::Rfc822Name(Ia5String::try_from(email.as_str())?));
    }
    Ok(sans)
}
