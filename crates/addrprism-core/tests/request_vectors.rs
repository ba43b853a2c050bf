//! Request decode vector tests (lenient and strict policy).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use bytes::Bytes;

use addrprism_core::protocol::request::{decode_query, DecodeMode, QueryRequest};

mod vector_loader;
use vector_loader::TestVector;

fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

const FILES: [&str; 11] = [
    "query_ok.json",
    "query_extra_fields.json",
    "query_missing.json",
    "query_wrong_type.json",
    "body_empty.json",
    "body_truncated.json",
    "body_not_object.json",
    "query_key_case.json",
    "query_repeated_key.json",
    "query_null.json",
    "body_null.json",
];

#[test]
fn lenient_vectors() {
    for f in FILES {
        let v = load(f);
        let req = decode_query(Bytes::from(v.body.decode()), DecodeMode::Lenient)
            .expect("lenient decode never fails");
        assert_eq!(req.query, v.expect_query, "vector={}", v.description);
    }
}

#[test]
fn strict_vectors() {
    for f in FILES {
        let v = load(f);
        let res = decode_query(Bytes::from(v.body.decode()), DecodeMode::Strict);

        if let Some(code) = v.strict_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), code, "vector={}", v.description);
            continue;
        }

        let req = res.expect("expected ok request");
        assert_eq!(req.query, v.expect_query, "vector={}", v.description);
    }
}

#[test]
fn unreadable_body_follows_mode() {
    assert_eq!(
        DecodeMode::Lenient.unreadable("connection reset").unwrap(),
        QueryRequest::default()
    );

    let e = DecodeMode::Strict.unreadable("connection reset").unwrap_err();
    assert_eq!(e.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn decode_mode_names() {
    let m: DecodeMode = serde_json::from_str("\"strict\"").unwrap();
    assert_eq!(m, DecodeMode::Strict);
    assert_eq!(DecodeMode::default(), DecodeMode::Lenient);
}
