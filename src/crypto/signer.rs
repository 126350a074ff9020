//! Identity signers.
//!
//! A [`Signer`] pairs an enrollment certificate with the private key it was
//! issued for. Requests to the CA are authorized by signing a digest of the
//! canonical request with it (see [`crate::auth`]).

use p256::ecdsa::signature::hazmat::PrehashSigner;

use super::malleability::normalize_s;
use super::{Certificate, KeyAlgorithm, PrivateKey, PublicKey};
use crate::error::CryptoError;

/// Signing capability of an enrolled identity.
pub trait Signer: Send + Sync {
    fn algorithm(&self) -> KeyAlgorithm;

    /// Sign a precomputed digest, returning a DER `SEQUENCE { r, s }`.
    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn certificate(&self) -> &Certificate;

    /// PEM-encoded certificate bytes, as embedded in authorization tokens.
    fn certificate_pem(&self) -> Vec<u8> {
        self.certificate().to_pem().into_bytes()
    }

    fn public_key(&self) -> PublicKey;
}

enum EcdsaKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
}

/// ECDSA signer producing low-S signatures.
pub struct EcdsaSigner {
    key: EcdsaKey,
    public_key: PublicKey,
    certificate: Certificate,
}

impl EcdsaSigner {
    /// Build a signer for `algorithm`.
    ///
    /// Fails with [`CryptoError::InvalidKeyType`] when `key` is not a key of
    /// `algorithm`, and with [`CryptoError::KeyMismatch`] when the certificate
    /// was issued for a different public key.
    pub fn new(
        algorithm: KeyAlgorithm,
        certificate: Certificate,
        key: PrivateKey,
    ) -> Result<Self, CryptoError> {
        let public_key = key.public_key();
        let key = match (algorithm, key) {
            (KeyAlgorithm::EcdsaP256, PrivateKey::EcdsaP256(k)) => EcdsaKey::P256(k.into()),
            (KeyAlgorithm::EcdsaP384, PrivateKey::EcdsaP384(k)) => EcdsaKey::P384(k.into()),
            (expected, other) => {
                return Err(CryptoError::InvalidKeyType {
                    expected: expected.as_str(),
                    actual: other.algorithm().as_str(),
                })
            }
        };

        if !point_matches(certificate.public_key_bytes(), &public_key) {
            return Err(CryptoError::KeyMismatch);
        }

        Ok(Self {
            key,
            public_key,
            certificate,
        })
    }
}

/// Whether a SEC1 point, compressed or not, encodes `key`.
fn point_matches(point: &[u8], key: &PublicKey) -> bool {
    match key {
        PublicKey::EcdsaP256(k) => p256::PublicKey::from_sec1_bytes(point).is_ok_and(|p| p == *k),
        PublicKey::EcdsaP384(k) => p384::PublicKey::from_sec1_bytes(point).is_ok_and(|p| p == *k),
    }
}

impl Signer for EcdsaSigner {
    fn algorithm(&self) -> KeyAlgorithm {
        self.public_key.algorithm()
    }

    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signing = |e: p256::ecdsa::Error| CryptoError::Signing(e.to_string());

        match &self.key {
            EcdsaKey::P256(k) => {
                let sig: p256::ecdsa::Signature = k.sign_prehash(digest).map_err(signing)?;
                let (r, s) = sig.split_bytes();
                let s = normalize_s(KeyAlgorithm::EcdsaP256, &s);
                let sig = p256::ecdsa::Signature::from_scalars(
                    r,
                    p256::FieldBytes::clone_from_slice(&s),
                )
                .map_err(signing)?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
            EcdsaKey::P384(k) => {
                let sig: p384::ecdsa::Signature = k.sign_prehash(digest).map_err(signing)?;
                let (r, s) = sig.split_bytes();
                let s = normalize_s(KeyAlgorithm::EcdsaP384, &s);
                let sig = p384::ecdsa::Signature::from_scalars(
                    r,
                    p384::FieldBytes::clone_from_slice(&s),
                )
                .map_err(signing)?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
        }
    }

    fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }
}

impl std::fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSigner")
            .field("algorithm", &self.algorithm())
            .field("certificate", &self.certificate)
            .finish_non_exhaustive()
    }
}
