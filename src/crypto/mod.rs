//! Key material, signers, and X.509 certificates.
//!
//! Keys are a closed set of elliptic-curve algorithms ([`KeyAlgorithm`]). The
//! algorithm is always chosen explicitly by the caller; nothing here inspects a
//! key's runtime type to pick behavior.

pub mod certificate;
pub mod malleability;
pub mod signer;

pub use certificate::Certificate;
pub use signer::{EcdsaSigner, Signer};

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

// ─── KeyAlgorithm ────────────────────────────────────────────────────────────

/// Supported key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    #[default]
    EcdsaP256,
    EcdsaP384,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EcdsaP256 => "ecdsa-p256",
            Self::EcdsaP384 => "ecdsa-p384",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── PrivateKey ──────────────────────────────────────────────────────────────

/// A private key for one of the supported algorithms.
#[derive(Clone)]
pub enum PrivateKey {
    EcdsaP256(p256::SecretKey),
    EcdsaP384(p384::SecretKey),
}

impl PrivateKey {
    /// Generate a fresh key pair.
    pub fn generate(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::EcdsaP256 => Self::EcdsaP256(p256::SecretKey::random(&mut OsRng)),
            KeyAlgorithm::EcdsaP384 => Self::EcdsaP384(p384::SecretKey::random(&mut OsRng)),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::EcdsaP256(_) => KeyAlgorithm::EcdsaP256,
            Self::EcdsaP384(_) => KeyAlgorithm::EcdsaP384,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::EcdsaP256(k) => PublicKey::EcdsaP256(k.public_key()),
            Self::EcdsaP384(k) => PublicKey::EcdsaP384(k.public_key()),
        }
    }

    /// Parse a PKCS#8 `PRIVATE KEY` PEM block. The curve is read from the
    /// key's algorithm identifier; anything other than P-256/P-384 is rejected.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, CryptoError> {
        if let Ok(key) = p256::SecretKey::from_pkcs8_pem(pem) {
            return Ok(Self::EcdsaP256(key));
        }
        p384::SecretKey::from_pkcs8_pem(pem)
            .map(Self::EcdsaP384)
            .map_err(|e| CryptoError::UnsupportedKey(e.to_string()))
    }

    /// Encode as a PKCS#8 `PRIVATE KEY` PEM block.
    pub fn to_pkcs8_pem(&self) -> Result<String, CryptoError> {
        let pem = match self {
            Self::EcdsaP256(k) => k.to_pkcs8_pem(LineEnding::LF),
            Self::EcdsaP384(k) => k.to_pkcs8_pem(LineEnding::LF),
        }
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
        Ok(pem.as_str().to_owned())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

// ─── PublicKey ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    EcdsaP256(p256::PublicKey),
    EcdsaP384(p384::PublicKey),
}

impl PublicKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::EcdsaP256(_) => KeyAlgorithm::EcdsaP256,
            Self::EcdsaP384(_) => KeyAlgorithm::EcdsaP384,
        }
    }

    /// Uncompressed SEC1 point, the form carried in a certificate's
    /// `subjectPublicKey` bit string.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        match self {
            Self::EcdsaP256(k) => k.to_encoded_point(false).as_bytes().to_vec(),
            Self::EcdsaP384(k) => k.to_encoded_point(false).as_bytes().to_vec(),
        }
    }
}
