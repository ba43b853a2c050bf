//! Body reader for `/expand` and `/parser`.
//!
//! - No size limit unless `gateway.max_body_bytes` is set
//! - Read and decode failures go through the configured `DecodeMode`

use axum::body::Body;
use addrprism_core::{
    error::Result,
    protocol::request::{decode_query, DecodeMode, QueryRequest},
};

pub async fn read_query(body: Body, mode: DecodeMode, limit: Option<usize>) -> Result<QueryRequest> {
    match axum::body::to_bytes(body, limit.unwrap_or(usize::MAX)).await {
        Ok(bytes) => decode_query(bytes, mode),
        Err(e) => mode.unreadable(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_query() {
        let req = read_query(Body::from(r#"{"query":"11216"}"#), DecodeMode::Lenient, None)
            .await
            .unwrap();
        assert_eq!(req.query, "11216");
    }

    #[tokio::test]
    async fn oversized_body_follows_mode() {
        let body = r#"{"query":"781 Franklin Ave"}"#;

        let req = read_query(Body::from(body), DecodeMode::Lenient, Some(8)).await.unwrap();
        assert_eq!(req, QueryRequest::default());

        let err = read_query(Body::from(body), DecodeMode::Strict, Some(8))
            .await
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }
}
