//! Transport layer (HTTP request bodies).
//!
//! Reads the body once and hands a decoded `QueryRequest` to the handlers.

pub mod body;
