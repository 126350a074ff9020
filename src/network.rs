//! CA endpoint paths and defaults.

/// Default CA address (a local development CA).
pub const DEFAULT_CA_URL: &str = "https://localhost:7054";

pub const CA_INFO_PATH: &str = "/api/v1/cainfo";
pub const ENROLL_PATH: &str = "/api/v1/enroll";
pub const REGISTER_PATH: &str = "/api/v1/register";
pub const REVOKE_PATH: &str = "/api/v1/revoke";
pub const IDENTITIES_PATH: &str = "/api/v1/identities";
pub const CERTIFICATES_PATH: &str = "/api/v1/certificates";
pub const AFFILIATIONS_PATH: &str = "/api/v1/affiliations";

/// Default request timeout applied to the transport.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
