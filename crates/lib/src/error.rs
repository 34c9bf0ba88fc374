//! Error types for jsonapi-lib.
//!
//! Registry construction fails with [`ConfigurationError`]; every encode or
//! decode call fails with [`CodecError`]. No partial results are returned on
//! error.

use thiserror::Error;

/// Errors raised while building a [`Registry`](crate::registry::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
  #[error("wire type '{type_name}' is registered by both {first} and {second}")]
  DuplicateType {
    type_name: String,
    first: &'static str,
    second: &'static str,
  },

  #[error("record type {record} is registered more than once")]
  DuplicateRecord { record: &'static str },

  #[error("record type {record} declares no id field")]
  MissingIdField { record: &'static str },

  #[error("record type {record} declares {count} id fields, expected exactly one")]
  MultipleIdFields { record: &'static str, count: usize },

  #[error("relationship '{field}' of {record} targets {target}, which is not a registered resource")]
  UnregisteredTarget {
    record: &'static str,
    field: String,
    target: &'static str,
  },

  #[error("invalid field name '{field}' on {record}: {reason}")]
  InvalidFieldName {
    record: &'static str,
    field: String,
    reason: String,
  },

  #[error("fields of {record} collide on wire name '{wire_name}'")]
  DuplicateField { record: &'static str, wire_name: String },
}

/// Errors that can occur while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
  #[error("configuration error: {0}")]
  Configuration(#[from] ConfigurationError),

  /// A record type or wire type that the registry does not know.
  #[error("unknown resource type: {0}")]
  UnknownResourceType(String),

  /// A record presented for encoding, or an identifier on the wire, has no id.
  #[error("missing id for resource of type '{type_name}'")]
  MissingId { type_name: String },

  #[error("malformed document: {0}")]
  MalformedDocument(String),

  /// A field value could not be converted between its host type and JSON.
  #[error("cannot convert field '{field}' of '{type_name}': {source}")]
  Coercion {
    type_name: String,
    field: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Internal error; unreachable for valid inputs.
  #[error("invariant violation: {0}")]
  InvariantViolation(String),
}

impl CodecError {
  pub(crate) fn malformed(message: impl Into<String>) -> Self {
    CodecError::MalformedDocument(message.into())
  }

  pub(crate) fn invariant(message: impl Into<String>) -> Self {
    CodecError::InvariantViolation(message.into())
  }
}
