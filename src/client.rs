//! High-level client — `CaClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and the accessor methods.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{CaClientConfig, TlsConfig};
use crate::crypto::Signer;
use crate::domain::affiliation::client::Affiliations;
use crate::domain::certificate::client::Certificates;
use crate::domain::enrollment::client::Enrollment;
use crate::domain::identity::client::Identities;
use crate::domain::info::client::Info;
use crate::error::{ErrorKind, HttpError, SdkError};
use crate::http::CaHttp;

// Re-export sub-client types for convenience.
pub use crate::domain::affiliation::client::Affiliations as AffiliationsClient;
pub use crate::domain::certificate::client::Certificates as CertificatesClient;
pub use crate::domain::enrollment::client::Enrollment as EnrollmentClient;
pub use crate::domain::identity::client::Identities as IdentitiesClient;
pub use crate::domain::info::client::Info as InfoClient;

/// The primary entry point for talking to a CA.
///
/// Provides nested sub-client accessors for each domain:
/// `client.enrollment()`, `client.certificates()`, etc. Nothing in the client
/// changes after `build()`, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct CaClient {
    pub(crate) http: CaHttp,
    config: CaClientConfig,
}

impl CaClient {
    pub fn builder() -> CaClientBuilder {
        CaClientBuilder::default()
    }

    pub fn config(&self) -> &CaClientConfig {
        &self.config
    }

    /// The identity token-authorized calls are signed with, if any.
    pub fn identity(&self) -> Option<&Arc<dyn Signer>> {
        self.http.identity()
    }

    /// A client for the same CA acting as `signer`.
    pub fn with_identity(&self, signer: Arc<dyn Signer>) -> Self {
        Self {
            http: CaHttp::new(self.http.base_url(), self.http.client().clone(), Some(signer)),
            config: self.config.clone(),
        }
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn info(&self) -> Info<'_> {
        Info { client: self }
    }

    pub fn enrollment(&self) -> Enrollment<'_> {
        Enrollment { client: self }
    }

    pub fn identities(&self) -> Identities<'_> {
        Identities { client: self }
    }

    pub fn certificates(&self) -> Certificates<'_> {
        Certificates { client: self }
    }

    pub fn affiliations(&self) -> Affiliations<'_> {
        Affiliations { client: self }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct CaClientBuilder {
    config: CaClientConfig,
    identity: Option<Arc<dyn Signer>>,
    http_client: Option<reqwest::Client>,
}

impl CaClientBuilder {
    /// Replace all connection settings at once.
    pub fn config(mut self, config: CaClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.config.tls = tls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Sign token-authorized requests as `signer`.
    pub fn identity(mut self, signer: impl Signer + 'static) -> Self {
        self.identity = Some(Arc::new(signer));
        self
    }

    pub fn shared_identity(mut self, signer: Arc<dyn Signer>) -> Self {
        self.identity = Some(signer);
        self
    }

    /// Use a preconfigured transport. TLS and timeout settings are then the
    /// transport's own.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<CaClient, SdkError> {
        let build = |kind: ErrorKind| SdkError::new("build client", kind);

        self.config.validate().map_err(build)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let builder = reqwest::Client::builder()
                    .timeout(self.config.timeout())
                    .pool_max_idle_per_host(10);
                self.config
                    .tls
                    .apply(builder)
                    .map_err(build)?
                    .build()
                    .map_err(|e| build(HttpError::from(e).into()))?
            }
        };

        tracing::debug!(
            host = %self.config.host,
            tls = self.config.tls.enabled,
            identity = self.identity.is_some(),
            "Built CA client"
        );

        Ok(CaClient {
            http: CaHttp::new(&self.config.host, http_client, self.identity),
            config: self.config,
        })
    }
}
