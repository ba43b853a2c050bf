//! addrPrism gateway library entry.
//!
//! This crate wires config, the normalization engine, metrics, HTTP handlers
//! and the server lifecycle into a cohesive service. It is intended to be
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod engine;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod services;
pub mod transport;
