//! JSON test vector loader shared by request decode tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub body: BodyData,
    /// Query produced in lenient mode (and in strict mode when it succeeds).
    pub expect_query: String,
    /// Client code expected from strict mode, if it must fail.
    #[serde(default)]
    pub strict_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BodyData {
    pub encoding: String,
    pub data: serde_json::Value,
}

impl BodyData {
    pub fn decode(&self) -> Vec<u8> {
        match self.encoding.as_str() {
            "json" => serde_json::to_vec(&self.data).expect("unserializable json in test vector"),
            "text" => self
                .data
                .as_str()
                .expect("text vector data must be a string")
                .as_bytes()
                .to_vec(),
            other => panic!("unsupported encoding: {other}"),
        }
    }
}
