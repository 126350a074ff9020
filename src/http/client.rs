//! Low-level HTTP client — `CaHttp`.
//!
//! Builds the URL, attaches authorization, sends, and hands the raw response
//! to the envelope decoder. Sub-clients in `domain/<name>/client.rs` wrap it;
//! nothing here retries.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::create_token;
use crate::crypto::Signer;
use crate::error::{ErrorKind, HttpError};
use crate::http::envelope;

/// How a request is authorized.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    /// Unauthenticated (CA info).
    None,
    /// Signed token from the client's identity.
    Token,
    /// HTTP Basic with enrollment credentials.
    Basic { name: &'a str, secret: &'a str },
}

/// Status and body of a completed exchange, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Low-level HTTP client for the CA REST API.
#[derive(Clone)]
pub struct CaHttp {
    base_url: String,
    client: Client,
    /// Signs token-authorized requests. Read-only after construction.
    identity: Option<Arc<dyn Signer>>,
}

impl CaHttp {
    pub fn new(base_url: &str, client: Client, identity: Option<Arc<dyn Signer>>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            identity,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn identity(&self) -> Option<&Arc<dyn Signer>> {
        self.identity.as_ref()
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for `path`. An empty or absent query adds no `?`.
    pub fn url(&self, path: &str, query: Option<&str>) -> Result<Url, HttpError> {
        let raw = match query.filter(|q| !q.is_empty()) {
            Some(q) => format!("{}{}?{}", self.base_url, path, q),
            None => format!("{}{}", self.base_url, path),
        };
        Url::parse(&raw).map_err(|e| HttpError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    /// Send one request and return the raw status and body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<Vec<u8>>,
        auth: Auth<'_>,
    ) -> Result<RawResponse, ErrorKind> {
        let url = self.url(path, query)?;
        let body = body.unwrap_or_default();

        let mut req = self.client.request(method.clone(), url.clone());
        match auth {
            Auth::None => {}
            Auth::Token => {
                let signer = self.identity.as_deref().ok_or(ErrorKind::NoIdentity)?;
                // The CA verifies against the path alone, without the query.
                let token = create_token(method.as_str(), url.path(), &body, signer)?;
                req = req.header(AUTHORIZATION, token);
            }
            Auth::Basic { name, secret } => {
                req = req.basic_auth(name, Some(secret));
            }
        }
        if !body.is_empty() {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        tracing::debug!(%method, path = url.path(), query = ?url.query(), "CA request");

        let resp = req.send().await.map_err(HttpError::from)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(HttpError::from)?.to_vec();

        tracing::debug!(%method, path = url.path(), status, bytes = body.len(), "CA response");

        Ok(RawResponse { status, body })
    }

    /// Send and decode the envelope, accepting only `expected` statuses.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<Vec<u8>>,
        auth: Auth<'_>,
        expected: &[u16],
    ) -> Result<T, ErrorKind> {
        let resp = self.send(method, path, query, body, auth).await?;
        if !expected.contains(&resp.status) {
            tracing::warn!(path, status = resp.status, ?expected, "Unexpected CA status");
        }
        Ok(envelope::decode(resp.status, &resp.body, expected)?)
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
        auth: Auth<'_>,
        expected: &[u16],
    ) -> Result<T, ErrorKind> {
        self.request(Method::GET, path, query, None, auth, expected)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: Option<&str>,
        body: &B,
        auth: Auth<'_>,
        expected: &[u16],
    ) -> Result<T, ErrorKind> {
        let body = serde_json::to_vec(body)?;
        self.request(Method::POST, path, query, Some(body), auth, expected)
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
        auth: Auth<'_>,
        expected: &[u16],
    ) -> Result<T, ErrorKind> {
        self.request(Method::DELETE, path, query, None, auth, expected)
            .await
    }
}

impl std::fmt::Debug for CaHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaHttp")
            .field("base_url", &self.base_url)
            .field("has_identity", &self.identity.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http() -> CaHttp {
        CaHttp::new("https://ca.example.com:7054/", Client::new(), None)
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(http().base_url(), "https://ca.example.com:7054");
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let url = http().url("/api/v1/affiliations/org1", None).unwrap();
        assert_eq!(url.as_str(), "https://ca.example.com:7054/api/v1/affiliations/org1");

        let url = http().url("/api/v1/affiliations/org1", Some("")).unwrap();
        assert!(!url.as_str().contains('?'));
    }

    #[test]
    fn test_url_with_query_keeps_path_separate() {
        let url = http()
            .url("/api/v1/affiliations/org1", Some("force=true"))
            .unwrap();
        assert_eq!(url.path(), "/api/v1/affiliations/org1");
        assert_eq!(url.query(), Some("force=true"));
    }

    #[test]
    fn test_invalid_base_url() {
        let http = CaHttp::new("not a url", Client::new(), None);
        assert!(matches!(
            http.url("/api/v1/cainfo", None),
            Err(HttpError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_token_auth_without_identity() {
        let err = http()
            .send(Method::GET, "/api/v1/certificates", None, None, Auth::Token)
            .await
            .unwrap_err();
        assert!(matches!(err, ErrorKind::NoIdentity));
    }
}
