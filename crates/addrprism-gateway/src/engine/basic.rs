//! Dependency-free stand-in engine.
//!
//! Folds case and whitespace only. It exists so the service can be built and
//! operated without libpostal; it does not try to understand addresses.

use addrprism_core::error::Result;
use addrprism_core::protocol::response::ParsedComponent;
use addrprism_core::Normalizer;

/// Label given to the single component `parse` returns.
pub const QUERY_LABEL: &str = "query";

#[derive(Debug, Default)]
pub struct BasicNormalizer;

impl BasicNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn fold(query: &str) -> String {
        query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Normalizer for BasicNormalizer {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn expand(&self, query: &str) -> Result<Vec<String>> {
        let folded = Self::fold(query);
        if folded.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![folded])
    }

    fn parse(&self, query: &str) -> Result<Vec<ParsedComponent>> {
        let folded = Self::fold(query);
        if folded.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ParsedComponent::new(QUERY_LABEL, folded)])
    }
}
