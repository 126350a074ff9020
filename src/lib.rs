//! # CA SDK
//!
//! A Rust client for Certificate Authority HTTP APIs: enrollment, identity
//! registration, certificate listing and revocation, affiliation management.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Keys, signers with low-S ECDSA, X.509 certificates, domain models
//! 2. **Auth** — Canonical request payloads and per-request authorization tokens
//! 3. **HTTP API** — `CaHttp` transport and the response envelope decoder
//! 4. **High-Level Client** — `CaClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ca_sdk::prelude::*;
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(10));
//! let client = CaClient::builder()
//!     .host("https://ca.org1.example.com:7054")
//!     .build()?;
//!
//! let (cert, key) = client
//!     .enrollment()
//!     .enroll(&ctx, "admin", "adminpw", &CertificateRequestTemplate::new("admin"), Default::default())
//!     .await?;
//!
//! let admin = client.with_identity(Arc::new(EcdsaSigner::new(key.algorithm(), cert, key)?));
//! let certs = admin.certificates().list(&ctx, &CertificateListParams::default()).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Key material, signers, and X.509 certificates.
pub mod crypto;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Serde helpers for CA wire formats.
pub mod serde_util;

/// Endpoint paths and defaults.
pub mod network;

/// Connection and TLS configuration.
pub mod config;

/// Cancellation and deadlines.
pub mod context;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authorization tokens over canonical request payloads.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP transport and envelope decoding.
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CaClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Keys, signers, certificates
    pub use crate::crypto::{
        Certificate, EcdsaSigner, KeyAlgorithm, PrivateKey, PublicKey, Signer,
    };

    // Domain types
    pub use crate::domain::affiliation::{Affiliation, AffiliationOptions, AffiliationTree};
    pub use crate::domain::certificate::{
        CertificateListParams, RevocationList, RevocationRequest, RevocationResult,
        RevokedCertificate,
    };
    pub use crate::domain::enrollment::{
        CertificateRequestTemplate, EnrollmentOptions, SignatureAlgorithm,
    };
    pub use crate::domain::identity::{Attribute, Identity, RegistrationRequest};
    pub use crate::domain::info::CaInfo;

    // Errors
    pub use crate::error::{
        CertificateError, CryptoError, EnvelopeError, ErrorKind, HttpError, SdkError,
    };
    pub use crate::http::Message;

    // Configuration + cancellation
    pub use crate::config::{CaClientConfig, TlsConfig};
    pub use crate::context::{CancelHandle, Context};
    pub use crate::network::DEFAULT_CA_URL;

    // HTTP client + sub-clients
    pub use crate::client::{
        AffiliationsClient, CaClient, CaClientBuilder, CertificatesClient, EnrollmentClient,
        IdentitiesClient, InfoClient,
    };
}
