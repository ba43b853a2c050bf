//! addrPrism core: transport-agnostic request/response contracts, the
//! normalization engine seam, and the shared error type.
//!
//! This crate defines the wire-level contracts and error surface shared by the
//! gateway, engine adapters, and test tooling. It intentionally carries no
//! transport or runtime dependencies so engines can be implemented against it
//! without pulling in the HTTP stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `AddrPrismError`/`Result` so production
//! processes do not crash on malformed input or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod normalize;
pub mod protocol;

/// Shared result type.
pub use error::{AddrPrismError, Result};
pub use normalize::Normalizer;
