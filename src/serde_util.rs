//! Custom serde helpers for CA wire formats.

/// Deserializes a list that the CA may send as `null` into an empty `Vec`.
///
/// Go servers encode nil slices as `null`. Pair with `#[serde(default)]` so a
/// missing field is also empty.
pub mod null_as_empty {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
    }
}
