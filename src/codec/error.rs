//
//  devops-state
//  codec/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error types for the state codec.

use thiserror::Error;

/// Errors raised while converting resources to or from their state and wire forms.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A required attribute was absent.
    #[error("missing field '{field}'")]
    MissingField {
        /// Local attribute name.
        field: String,
    },

    /// An attribute held a different kind of value than expected.
    #[error("field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Local attribute name.
        field: String,
        /// Kind the decoder wanted.
        expected: &'static str,
        /// Kind that was present.
        found: &'static str,
    },

    /// A tagged value could not be parsed back to its tagged kind.
    #[error("field '{field}': invalid {tag} value '{value}'")]
    InvalidValue {
        /// Encoded key, including its tag.
        field: String,
        /// The tag that was being decoded.
        tag: String,
        /// The offending raw value.
        value: String,
    },

    /// A sequence element was neither a bare string, an array, nor a single `item` entry.
    #[error("malformed sequence element in '{field}'")]
    MalformedItem {
        /// Encoded key of the sequence.
        field: String,
    },

    /// A nested resource was of another type than the one required.
    #[error("field '{field}': expected a {expected} resource, found {found}")]
    UnexpectedResource {
        /// Local attribute name.
        field: String,
        /// Type name that was required.
        expected: &'static str,
        /// Type name that was present.
        found: &'static str,
    },

    /// An update targeted an attribute the resource does not have.
    #[error("{type_name} has no field '{field}'")]
    UnknownField {
        /// Resource type name.
        type_name: &'static str,
        /// Local attribute name.
        field: String,
    },

    /// The wire payload could not be (de)serialized.
    #[error("wire format error: {0}")]
    Wire(#[from] serde_json::Error),
}

impl CodecError {
    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn mismatch(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found,
        }
    }
}
