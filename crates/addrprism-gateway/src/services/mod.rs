//! Services that sit between HTTP handlers and the normalization engine.

pub mod address;

pub use address::AddressService;
