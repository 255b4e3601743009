//
//  devops-state
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! List envelope for collection endpoints.
//!
//! Collection endpoints answer with a `{count, value}` object:
//!
//! ```json
//! {
//!     "count": 2,
//!     "value": [{"id": "1"}, {"id": "2"}]
//! }
//! ```
//!
//! Some older endpoints return a bare JSON array instead; [`ListResponse::from_value`]
//! accepts both shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;

/// A single page of results from a collection endpoint.
///
/// # Type Parameters
///
/// - `T` - The type of items contained in the `value` array
///
/// # Example
///
/// ```rust
/// use devops_state::api::common::ListResponse;
///
/// let json = serde_json::json!({"count": 1, "value": ["main"]});
/// let page: ListResponse<String> = ListResponse::from_value(json).unwrap();
/// assert_eq!(page.value, vec!["main".to_string()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Number of items in `value`, as reported by the server.
    #[serde(default)]
    pub count: Option<u64>,

    /// The items in this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T: DeserializeOwned> ListResponse<T> {
    /// Decodes a list payload, accepting either the envelope or a bare array.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidResponse`] when the payload matches neither shape.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let result = match value {
            Value::Array(items) => serde_json::from_value(Value::Array(items)).map(|value: Vec<T>| {
                Self {
                    count: Some(value.len() as u64),
                    value,
                }
            }),
            other => serde_json::from_value(other),
        };
        result.map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Returns `true` if the page contains no items.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
