//! The JSON:API document model.
//!
//! These are plain value types mirroring the wire grammar of
//! <https://jsonapi.org/format/>:
//!
//! - [`ResourceIdentifier`]: a `{type, id}` reference
//! - [`ResourceObject`]: a resource with attributes and relationships
//! - [`Relationship`]: a to-one ([`SingleRelationship`]) or to-many
//!   ([`ManyRelationship`]) slot
//! - [`SingleDocument`] / [`MultiDocument`]: top-level documents, unified by
//!   [`Document`]
//! - [`ErrorObject`]: structure only; the codec never produces one
//!
//! # Emission
//!
//! Serialization produces minimal documents: empty attribute and relationship
//! maps, empty `included`/`errors`, and absent `links`/`meta` are omitted, and
//! `null` attribute values are dropped. A to-one relationship with no target
//! is still emitted as `"data": null`.

mod dispatch;
mod linkage;
mod types;

use std::str::FromStr;

pub use linkage::LinkageReport;
pub use types::*;

use crate::error::CodecError;

impl FromStr for Document {
  type Err = CodecError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    serde_json::from_str(s).map_err(|e| CodecError::malformed(e.to_string()))
  }
}

impl FromStr for SingleDocument {
  type Err = CodecError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    serde_json::from_str(s).map_err(|e| CodecError::malformed(e.to_string()))
  }
}

impl FromStr for MultiDocument {
  type Err = CodecError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    serde_json::from_str(s).map_err(|e| CodecError::malformed(e.to_string()))
  }
}

impl Document {
  pub fn to_json_string(&self) -> Result<String, CodecError> {
    Ok(serde_json::to_string(self)?)
  }

  pub fn to_json_pretty(&self) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

impl SingleDocument {
  pub fn to_json_string(&self) -> Result<String, CodecError> {
    Ok(serde_json::to_string(self)?)
  }
}

impl MultiDocument {
  pub fn to_json_string(&self) -> Result<String, CodecError> {
    Ok(serde_json::to_string(self)?)
  }
}
