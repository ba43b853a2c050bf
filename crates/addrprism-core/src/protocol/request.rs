//! Request body (`{"query": "..."}`) and the decode policy applied to it.

use std::fmt;

use bytes::Bytes;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{AddrPrismError, Result};

/// Body accepted by `/expand` and `/parser`.
///
/// Decoding follows the usual loose JSON-to-struct rules:
///
/// - the key is matched case-insensitively (`"Query"`, `"QUERY"`);
/// - if the key repeats, the last occurrence wins;
/// - `null` leaves the field as it was, and a bare `null` body is an empty
///   request;
/// - unknown fields are ignored and a missing `query` is an empty string.
///
/// A non-string `query` or a body that is not an object is still an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// Free-text address.
    pub query: String,
}

const QUERY_FIELD: &str = "query";

impl<'de> Deserialize<'de> for QueryRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QueryRequestVisitor)
    }
}

struct QueryRequestVisitor;

impl<'de> Visitor<'de> for QueryRequestVisitor {
    type Value = QueryRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with a string `query`")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<QueryRequest, E> {
        Ok(QueryRequest::default())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<QueryRequest, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut req = QueryRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(QUERY_FIELD) {
                if let Some(query) = map.next_value::<Option<String>>()? {
                    req.query = query;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(req)
    }
}

/// What to do with a body that cannot be read or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Fall back to an empty query and carry on.
    #[default]
    Lenient,
    /// Reject with `BadRequest`.
    Strict,
}

impl DecodeMode {
    /// Resolve a body that could not be read off the wire.
    pub fn unreadable(self, reason: &str) -> Result<QueryRequest> {
        match self {
            DecodeMode::Lenient => {
                tracing::debug!(%reason, "request body unreadable, using empty query");
                Ok(QueryRequest::default())
            }
            DecodeMode::Strict => Err(AddrPrismError::BadRequest(format!(
                "request body unreadable: {reason}"
            ))),
        }
    }
}

/// Decode a request body according to `mode`.
///
/// Lenient mode never fails: anything `QueryRequest` cannot be decoded from
/// becomes the default (empty) request.
pub fn decode_query(body: Bytes, mode: DecodeMode) -> Result<QueryRequest> {
    match serde_json::from_slice::<QueryRequest>(&body) {
        Ok(req) => Ok(req),
        Err(e) => match mode {
            DecodeMode::Lenient => {
                tracing::debug!(error = %e, len = body.len(), "invalid request json, using empty query");
                Ok(QueryRequest::default())
            }
            DecodeMode::Strict => Err(AddrPrismError::BadRequest(format!(
                "invalid request json: {e}"
            ))),
        },
    }
}
