//! List-query primitives understood by the document store.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Platform-managed attribute holding a document's creation time.
pub const CREATED_AT: &str = "$createdAt";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// A single filter, ordering, or limit clause of a document listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals one of the values.
    Equal {
        /// Attribute name.
        attribute: String,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// Order results by an attribute.
    Order {
        /// Attribute name.
        attribute: String,
        /// Direction.
        direction: SortDirection,
    },
    /// Return at most this many documents.
    Limit(u32),
}

impl Query {
    /// Shorthand for an equality filter on a string attribute.
    pub fn equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![Value::String(value.into())],
        }
    }

    /// Order descending by the given attribute.
    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::Order {
            attribute: attribute.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Order ascending by the given attribute.
    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Self::Order {
            attribute: attribute.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Limit the page size.
    pub fn limit(limit: u32) -> Self {
        Self::Limit(limit)
    }

    /// Encode the query in the platform's JSON query syntax.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Equal { attribute, values } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": values,
            }),
            Self::Order {
                attribute,
                direction,
            } => {
                let method = match direction {
                    SortDirection::Asc => "orderAsc",
                    SortDirection::Desc => "orderDesc",
                };
                json!({ "method": method, "attribute": attribute })
            }
            Self::Limit(limit) => json!({ "method": "limit", "values": [limit] }),
        }
    }
}
