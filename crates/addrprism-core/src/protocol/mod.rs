//! Wire formats for the HTTP API.
//!
//! - `request`: the `{"query": ...}` body and its decode policy.
//! - `response`: parse components as serialized to clients.
//!
//! Decoding is panic-free: malformed input is either tolerated (lenient mode)
//! or reported as `AddrPrismError::BadRequest`, never a crash.

pub mod request;
pub mod response;
