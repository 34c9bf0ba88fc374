//! Variant dispatch for the two polymorphic slots of the document model.
//!
//! Both a relationship object and a top-level document are told apart by the
//! shape of their `data` member: an array selects the many/multi variant,
//! anything else (an object, `null`, or no `data` at all) selects the
//! single variant.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::{Document, ManyRelationship, MultiDocument, Relationship, SingleDocument, SingleRelationship};

const DATA: &str = "data";

fn data_is_array(value: &Value) -> bool {
  value.get(DATA).is_some_and(Value::is_array)
}

impl<'de> Deserialize<'de> for Relationship {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    if !raw.is_object() {
      return Err(D::Error::custom("relationship must be a JSON object"));
    }

    if data_is_array(&raw) {
      ManyRelationship::deserialize(raw)
        .map(Relationship::Many)
        .map_err(D::Error::custom)
    } else {
      SingleRelationship::deserialize(raw)
        .map(Relationship::One)
        .map_err(D::Error::custom)
    }
  }
}

impl<'de> Deserialize<'de> for Document {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    if !raw.is_object() {
      return Err(D::Error::custom("document must be a JSON object"));
    }

    if data_is_array(&raw) {
      MultiDocument::deserialize(raw)
        .map(Document::Multi)
        .map_err(D::Error::custom)
    } else {
      SingleDocument::deserialize(raw)
        .map(Document::Single)
        .map_err(D::Error::custom)
    }
  }
}
