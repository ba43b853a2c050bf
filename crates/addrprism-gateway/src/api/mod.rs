//! Normalization API handlers (`/expand`, `/parser`).

pub mod error;
pub mod normalize;

pub use error::ApiError;
pub use normalize::{expand, parse};
