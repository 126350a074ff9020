//! Affiliation domain — the CA's organizational hierarchy.

pub mod client;
pub mod wire;

use serde::{Deserialize, Serialize};

use crate::domain::identity::Identity;
use crate::error::ErrorKind;

/// A node of the affiliation hierarchy, e.g. `org1.department1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub name: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub affiliations: Vec<Affiliation>,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub identities: Vec<Identity>,
}

impl Affiliation {
    /// Names of this node and all descendants, depth first in server order.
    pub fn names(&self) -> Vec<&str> {
        let mut out = vec![self.name.as_str()];
        for child in &self.affiliations {
            out.extend(child.names());
        }
        out
    }
}

/// An affiliation subtree as returned by list and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationTree {
    /// Root of the subtree; empty when listing from the caller's own root.
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub affiliations: Vec<Affiliation>,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_empty::deserialize")]
    pub identities: Vec<Identity>,
    #[serde(rename = "caname", default)]
    pub ca_name: String,
}

impl AffiliationTree {
    /// Find a node anywhere in the tree by its full name.
    pub fn find(&self, name: &str) -> Option<&Affiliation> {
        fn walk<'a>(nodes: &'a [Affiliation], name: &str) -> Option<&'a Affiliation> {
            nodes.iter().find_map(|n| {
                if n.name == name {
                    Some(n)
                } else {
                    walk(&n.affiliations, name)
                }
            })
        }
        walk(&self.affiliations, name)
    }
}

/// Optional query parameters for create and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AffiliationOptions {
    /// Create missing parents, or delete a non-empty subtree.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(rename = "ca", skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
}

impl AffiliationOptions {
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn ca_name(mut self, ca_name: impl Into<String>) -> Self {
        self.ca_name = Some(ca_name.into());
        self
    }

    /// Encoded query string, or `None` when no option is set.
    pub fn to_query(&self) -> Result<Option<String>, ErrorKind> {
        let query = serde_urlencoded::to_string(self)?;
        Ok(Some(query).filter(|q| !q.is_empty()))
    }
}
