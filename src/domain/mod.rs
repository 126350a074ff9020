//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types returned to callers
//! - `wire.rs` — Raw serde structs matching CA request/response bodies
//! - `convert.rs` — Decoding from wire types, where it can fail
//! - `client.rs` — Sub-client with the HTTP operations

pub mod affiliation;
pub mod certificate;
pub mod enrollment;
pub mod identity;
pub mod info;
