//! HTTP layer: `CaHttp` transport plus the response envelope decoder.

pub mod client;
pub mod envelope;

pub use client::{Auth, CaHttp, RawResponse};
pub use envelope::{decode, Message, ResponseEnvelope};
