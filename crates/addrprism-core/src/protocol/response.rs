//! Response payloads.
//!
//! `/expand` answers with a plain `Vec<String>`; only the parse result needs a
//! dedicated shape.

use serde::{Deserialize, Serialize};

/// One labeled piece of a parsed address, e.g. `{"label": "road", "value": "franklin ave"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedComponent {
    /// Semantic component (house_number, road, city, postcode, ...).
    pub label: String,
    /// Substring of the query assigned to `label`.
    pub value: String,
}

impl ParsedComponent {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
