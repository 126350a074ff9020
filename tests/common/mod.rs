//! In-process fake CA for integration tests.
//!
//! Serves the CA REST API on a random local port. Enrollment signs real CSRs
//! with an rcgen test CA; token-authorized endpoints rebuild the canonical
//! payload from the received request and verify the signature (low-S
//! required) before answering. Every request is recorded for inspection.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams,
    CertificateSigningRequestParams, DistinguishedName, DnType, IsCa, KeyIdMethod, KeyPair,
    KeyUsagePurpose, RevokedCertParams, SerialNumber,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use ca_sdk::crypto::Certificate;

pub const CA_NAME: &str = "ca-test";
pub const ADMIN: &str = "admin";
pub const ADMIN_SECRET: &str = "adminpw";

/// A request as the fake CA received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
    /// Common name of the verified token certificate.
    pub caller: Option<String>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Decoded HTTP Basic credentials, if any.
    pub fn basic(&self) -> Option<(String, String)> {
        let encoded = self.authorization.as_deref()?.strip_prefix("Basic ")?;
        let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
        let (name, secret) = decoded.split_once(':')?;
        Some((name.to_string(), secret.to_string()))
    }
}

struct Inner {
    ca_cert: rcgen::Certificate,
    ca_key: KeyPair,
    secrets: HashMap<String, String>,
    identities: Vec<Value>,
    issued: Vec<String>,
    scripted: VecDeque<(u16, Vec<u8>)>,
    delay: Option<Duration>,
    requests: Vec<Recorded>,
}

#[derive(Clone)]
pub struct FakeCa {
    pub url: String,
    inner: Arc<Mutex<Inner>>,
}

impl FakeCa {
    pub async fn start() -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "fake-ca");
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let ca_cert = params.self_signed(&ca_key).unwrap();

        let inner = Arc::new(Mutex::new(Inner {
            ca_cert,
            ca_key,
            secrets: HashMap::from([(ADMIN.to_string(), ADMIN_SECRET.to_string())]),
            identities: vec![json!({
                "id": ADMIN,
                "type": "client",
                "affiliation": "",
                "attrs": [{"name": "hf.Registrar.Roles", "value": "*"}],
                "max_enrollments": -1,
                "caname": CA_NAME
            })],
            issued: Vec::new(),
            scripted: VecDeque::new(),
            delay: None,
            requests: Vec::new(),
        }));

        let app = Router::new().fallback(handle).with_state(inner.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            inner,
        }
    }

    pub fn ca_pem(&self) -> String {
        self.inner.lock().unwrap().ca_cert.pem()
    }

    /// Answer the next request with `status` and `body`, whatever it is.
    pub fn script(&self, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .scripted
            .push_back((status, body.to_string().into_bytes()));
    }

    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

// ─── Envelopes ───────────────────────────────────────────────────────────────

pub fn ok(result: Value) -> Value {
    json!({"success": true, "result": result, "errors": [], "messages": []})
}

pub fn fail(code: i64, message: &str) -> Value {
    json!({
        "success": false,
        "result": null,
        "errors": [{"code": code, "message": message}],
        "messages": []
    })
}

fn reply(status: u16, body: Value) -> Response {
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

// ─── Handler ─────────────────────────────────────────────────────────────────

async fn handle(
    State(inner): State<Arc<Mutex<Inner>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let caller = match authorization.as_deref() {
        Some(token) if !token.starts_with("Basic ") => {
            verify_token(method.as_str(), &path, &body, token).ok()
        }
        _ => None,
    };

    let (delay, scripted) = {
        let mut state = inner.lock().unwrap();
        state.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            authorization: authorization.clone(),
            body: body.to_vec(),
            caller: caller.clone(),
        });
        (state.delay, state.scripted.pop_front())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some((status, body)) = scripted {
        return (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response();
    }

    let mut state = inner.lock().unwrap();
    match (method.as_str(), path.as_str()) {
        ("GET", "/api/v1/cainfo") => reply(
            200,
            ok(json!({
                "CAName": CA_NAME,
                "CAChain": STANDARD.encode(state.ca_cert.pem()),
                "Version": "1.5.7"
            })),
        ),
        ("POST", "/api/v1/enroll") => enroll(&mut state, authorization.as_deref(), &body),
        _ if caller.is_none() => reply(401, fail(20, "Authentication failure")),
        ("POST", "/api/v1/register") => register(&mut state, &body),
        ("GET", "/api/v1/identities") => reply(
            200,
            ok(json!({"identities": state.identities, "caname": CA_NAME})),
        ),
        ("GET", p) if p.starts_with("/api/v1/identities/") => {
            let id = &p["/api/v1/identities/".len()..];
            match state.identities.iter().find(|i| i["id"] == id) {
                Some(identity) => reply(200, ok(identity.clone())),
                None => reply(404, fail(63, "Failed to get User")),
            }
        }
        ("GET", "/api/v1/certificates") => {
            let certs: Vec<_> = state.issued.iter().map(|pem| json!({"PEM": pem})).collect();
            reply(200, ok(json!({"caname": CA_NAME, "certs": certs})))
        }
        ("POST", "/api/v1/revoke") => revoke(&state, &body),
        ("GET", "/api/v1/affiliations") => reply(200, ok(affiliation_tree())),
        ("GET", "/api/v1/affiliations/org1") => reply(
            200,
            ok(json!({
                "name": "org1",
                "affiliations": [{"name": "org1.department1"}],
                "identities": [],
                "caname": CA_NAME
            })),
        ),
        ("POST", "/api/v1/affiliations") => {
            let req: Value = serde_json::from_slice(&body).unwrap();
            reply(201, ok(json!({"name": req["name"], "caname": CA_NAME})))
        }
        ("DELETE", p) if p.starts_with("/api/v1/affiliations/") => {
            let name = &p["/api/v1/affiliations/".len()..];
            reply(
                200,
                ok(json!({"name": name, "affiliations": [], "identities": [], "caname": CA_NAME})),
            )
        }
        _ => reply(404, fail(0, "Not found")),
    }
}

fn enroll(state: &mut Inner, authorization: Option<&str>, body: &[u8]) -> Response {
    let credentials = authorization
        .and_then(|a| a.strip_prefix("Basic "))
        .and_then(|b| STANDARD.decode(b).ok())
        .and_then(|b| String::from_utf8(b).ok());
    let authorized = credentials
        .as_deref()
        .and_then(|c| c.split_once(':'))
        .is_some_and(|(name, secret)| state.secrets.get(name).map(String::as_str) == Some(secret));
    if !authorized {
        return reply(401, fail(20, "Authentication failure"));
    }

    let req: Value = serde_json::from_slice(body).unwrap();
    let csr = CertificateSigningRequestParams::from_pem(req["request"].as_str().unwrap()).unwrap();
    let cert = csr.signed_by(&state.ca_cert, &state.ca_key).unwrap();
    let pem = cert.pem();
    state.issued.push(pem.clone());

    reply(
        201,
        ok(json!({
            "Cert": STANDARD.encode(pem),
            "ServerInfo": {"CAName": CA_NAME, "CAChain": "", "Version": "1.5.7"}
        })),
    )
}

fn register(state: &mut Inner, body: &[u8]) -> Response {
    let req: Value = serde_json::from_slice(body).unwrap();
    let id = req["id"].as_str().unwrap().to_string();
    if state.secrets.contains_key(&id) {
        return reply(400, fail(74, &format!("Identity '{id}' is already registered")));
    }
    let secret = req["secret"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{id}-generated"));

    state.secrets.insert(id.clone(), secret.clone());
    state.identities.push(json!({
        "id": id,
        "type": req["type"].as_str().unwrap_or("client"),
        "affiliation": req["affiliation"].as_str().unwrap_or_default(),
        "attrs": req.get("attrs").cloned().unwrap_or(json!([])),
        "max_enrollments": req.get("max_enrollments").cloned().unwrap_or(json!(0)),
        "caname": CA_NAME
    }));
    reply(201, ok(json!({"secret": secret})))
}

fn revoke(state: &Inner, body: &[u8]) -> Response {
    let req: Value = serde_json::from_slice(body).unwrap();
    let serial = req["serial"].as_str().unwrap_or_default().to_string();
    let aki = req["aki"].as_str().unwrap_or_default().to_string();

    let crl = if req["gencrl"].as_bool().unwrap_or(false) {
        let params = CertificateRevocationListParams {
            this_update: rcgen::date_time_ymd(2024, 1, 1),
            next_update: rcgen::date_time_ymd(2030, 1, 1),
            crl_number: SerialNumber::from(1u64),
            issuing_distribution_point: None,
            revoked_certs: vec![RevokedCertParams {
                serial_number: SerialNumber::from_slice(&hex::decode(&serial).unwrap()),
                revocation_time: rcgen::date_time_ymd(2024, 6, 1),
                reason_code: None,
                invalidity_date: None,
            }],
            key_identifier_method: KeyIdMethod::Sha256,
        };
        let crl = params.signed_by(&state.ca_cert, &state.ca_key).unwrap();
        STANDARD.encode(crl.pem().unwrap())
    } else {
        String::new()
    };

    reply(
        200,
        ok(json!({"RevokedCerts": [{"Serial": serial, "AKI": aki}], "CRL": crl})),
    )
}

fn affiliation_tree() -> Value {
    json!({
        "name": "",
        "affiliations": [
            {"name": "org1", "affiliations": [{"name": "org1.department1"}]},
            {"name": "org2"}
        ],
        "identities": [{"id": ADMIN, "type": "client", "affiliation": "", "max_enrollments": -1}],
        "caname": CA_NAME
    })
}

// ─── Token verification ──────────────────────────────────────────────────────

/// Verify an authorization token against the request it arrived with.
/// Returns the caller's common name.
fn verify_token(method: &str, path: &str, body: &[u8], token: &str) -> Result<String, String> {
    let (cert_b64, sig_b64) = token.split_once('.').ok_or("token has no separator")?;
    let cert_pem = STANDARD.decode(cert_b64).map_err(|e| e.to_string())?;
    let signature = STANDARD.decode(sig_b64).map_err(|e| e.to_string())?;
    let cert = Certificate::from_pem(&cert_pem).map_err(|e| e.to_string())?;

    let payload = format!(
        "{}.{}.{}.{}",
        method,
        URL_SAFE.encode(path),
        STANDARD.encode(body),
        STANDARD.encode(&cert_pem)
    );
    let digest = Sha256::digest(payload.as_bytes());

    let point = cert.public_key_bytes();
    match point.len() {
        65 => {
            let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(|e| e.to_string())?;
            let sig = p256::ecdsa::Signature::from_der(&signature).map_err(|e| e.to_string())?;
            if sig.normalize_s().is_some() {
                return Err("high-S signature".to_string());
            }
            key.verify_prehash(&digest, &sig).map_err(|e| e.to_string())?;
        }
        97 => {
            let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(|e| e.to_string())?;
            let sig = p384::ecdsa::Signature::from_der(&signature).map_err(|e| e.to_string())?;
            if sig.normalize_s().is_some() {
                return Err("high-S signature".to_string());
            }
            key.verify_prehash(&digest, &sig).map_err(|e| e.to_string())?;
        }
        n => return Err(format!("unsupported key of {n} bytes")),
    }

    cert.subject_common_name()
        .map(str::to_string)
        .ok_or_else(|| "certificate has no CN".to_string())
}
