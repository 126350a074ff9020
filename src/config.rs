//! Client configuration.
//!
//! [`CaClientConfig`] is a plain, deserializable value: load it from whatever
//! format the application uses, then hand it to
//! [`CaClientBuilder::config`](crate::client::CaClientBuilder::config).
//! It is validated once, when the client is built.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::network::DEFAULT_TIMEOUT_SECS;

/// Connection settings for one CA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaClientConfig {
    /// Scheme, host and port, e.g. `https://ca.org1.example.com:7054`.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CaClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            tls: TlsConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CaClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check required fields and their consistency.
    pub fn validate(&self) -> Result<(), ErrorKind> {
        if self.host.trim().is_empty() {
            return Err(ErrorKind::Config("CA host is required".to_string()));
        }

        let url = Url::parse(&self.host)
            .map_err(|e| ErrorKind::Config(format!("invalid CA host {:?}: {}", self.host, e)))?;
        match url.scheme() {
            "https" => {}
            "http" if self.tls.enabled => {
                return Err(ErrorKind::Config(format!(
                    "TLS is enabled but host {:?} uses http",
                    self.host
                )))
            }
            "http" => {}
            other => {
                return Err(ErrorKind::Config(format!(
                    "unsupported scheme {other:?} in CA host"
                )))
            }
        }
        if url.query().is_some() {
            return Err(ErrorKind::Config("CA host must not carry a query".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ErrorKind::Config("timeout must be non-zero".to_string()));
        }

        self.tls.validate()
    }
}

// ─── TlsConfig ───────────────────────────────────────────────────────────────

/// Transport TLS settings.
///
/// Inline PEM takes precedence over the matching `*_path` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Accept any server certificate. Development only.
    #[serde(default)]
    pub skip_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert_path: Option<PathBuf>,

    /// Client certificate for mutual TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
}

impl TlsConfig {
    fn validate(&self) -> Result<(), ErrorKind> {
        let has_cert = self.cert.is_some() || self.cert_path.is_some();
        let has_key = self.key.is_some() || self.key_path.is_some();
        if has_cert != has_key {
            return Err(ErrorKind::Config(
                "TLS client certificate and key must be set together".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ca_cert_pem(&self) -> Result<Option<String>, ErrorKind> {
        resolve(self.ca_cert.as_deref(), self.ca_cert_path.as_deref())
    }

    pub fn cert_pem(&self) -> Result<Option<String>, ErrorKind> {
        resolve(self.cert.as_deref(), self.cert_path.as_deref())
    }

    pub fn key_pem(&self) -> Result<Option<String>, ErrorKind> {
        resolve(self.key.as_deref(), self.key_path.as_deref())
    }

    /// Apply these settings to a `reqwest` client builder.
    pub(crate) fn apply(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, ErrorKind> {
        if !self.enabled {
            return Ok(builder);
        }

        builder = builder.use_rustls_tls();
        if self.skip_verify {
            tracing::warn!("TLS server verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(pem) = self.ca_cert_pem()? {
            let ca = reqwest::Certificate::from_pem(pem.as_bytes())
                .map_err(|e| ErrorKind::Config(format!("invalid TLS CA certificate: {e}")))?;
            builder = builder.add_root_certificate(ca);
        }

        if let (Some(cert), Some(key)) = (self.cert_pem()?, self.key_pem()?) {
            let identity = reqwest::Identity::from_pem(format!("{cert}\n{key}").as_bytes())
                .map_err(|e| ErrorKind::Config(format!("invalid TLS client identity: {e}")))?;
            builder = builder.identity(identity);
        }

        Ok(builder)
    }
}

fn resolve(inline: Option<&str>, path: Option<&Path>) -> Result<Option<String>, ErrorKind> {
    match (inline, path) {
        (Some(pem), _) => Ok(Some(pem.to_string())),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| ErrorKind::Config(format!("read {}: {}", path.display(), e))),
        (None, None) => Ok(None),
    }
}
