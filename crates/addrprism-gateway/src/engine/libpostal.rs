//! libpostal adapter (via the `postal` bindings).
//!
//! libpostal keeps global state behind its context. `postal::Context` takes
//! its own lock around every call, so one context is shared by all workers.

use postal::{Context, ExpandAddressOptions, InitOptions, ParseAddressOptions};

use addrprism_core::error::{AddrPrismError, Result};
use addrprism_core::protocol::response::ParsedComponent;
use addrprism_core::Normalizer;

pub struct LibpostalNormalizer {
    ctx: Context,
}

impl LibpostalNormalizer {
    /// Load libpostal models. Slow (seconds) and memory hungry; call once.
    pub fn new() -> Result<Self> {
        let mut ctx = Context::new();
        ctx.init(InitOptions {
            expand_address: true,
            parse_address: true,
        })
        .map_err(|e| AddrPrismError::Engine(format!("libpostal init failed: {e:?}")))?;
        Ok(Self { ctx })
    }
}

impl Normalizer for LibpostalNormalizer {
    fn name(&self) -> &'static str {
        "libpostal"
    }

    fn expand(&self, query: &str) -> Result<Vec<String>> {
        let mut opts = ExpandAddressOptions::new();
        let expansions = self
            .ctx
            .expand_address(query, &mut opts)
            .map_err(|e| AddrPrismError::Engine(format!("expand failed: {e:?}")))?;
        Ok(expansions.map(|e| e.to_string()).collect())
    }

    fn parse(&self, query: &str) -> Result<Vec<ParsedComponent>> {
        let mut opts = ParseAddressOptions::new();
        let components = self
            .ctx
            .parse_address(query, &mut opts)
            .map_err(|e| AddrPrismError::Engine(format!("parse failed: {e:?}")))?;
        Ok(components
            .map(|c| ParsedComponent::new(c.label.to_string(), c.value.to_string()))
            .collect())
    }
}
