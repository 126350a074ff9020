//! Identity domain — registered identities and their attributes.

pub mod client;
pub mod wire;

use serde::{Deserialize, Serialize};

/// An attribute attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Whether the attribute is embedded in enrollment certificates by default.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ecert: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ecert: false,
        }
    }

    pub fn ecert(mut self) -> Self {
        self.ecert = true;
        self
    }
}

/// An identity as known to the CA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(rename = "type", default)]
    pub identity_type: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub attrs: Vec<Attribute>,
    /// `-1` for unlimited, `0` for the server default.
    #[serde(default)]
    pub max_enrollments: i32,
    #[serde(rename = "caname", default)]
    pub ca_name: String,
}

/// A request to register a new identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub identity_type: String,
    /// Leave empty to have the CA generate one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_enrollments: i32,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<Attribute>,
    #[serde(rename = "caname", default, skip_serializing_if = "String::is_empty")]
    pub ca_name: String,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl RegistrationRequest {
    pub fn new(id: impl Into<String>, identity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identity_type: identity_type.into(),
            ..Self::default()
        }
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = affiliation.into();
        self
    }

    pub fn max_enrollments(mut self, max: i32) -> Self {
        self.max_enrollments = max;
        self
    }

    pub fn attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = ca_name.into();
        self
    }
}
