//! Resource identity.
//!
//! A JSON:API resource is identified within a document by its `(type, id)`
//! pair. The id is an opaque JSON scalar: it is preserved verbatim on the wire
//! and only ever compared by value.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// An opaque scalar resource id.
///
/// Numbers compare and hash by their JSON representation, so `1` and `1.0`
/// are different ids, as are `0.0` and `-0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
  String(String),
  Number(Number),
  Bool(bool),
}

impl ResourceId {
  /// Convert a JSON value into an id.
  ///
  /// Returns `Ok(None)` for `null` and `Err` with the offending value for
  /// arrays and objects.
  pub fn from_value(value: Value) -> Result<Option<Self>, Value> {
    match value {
      Value::Null => Ok(None),
      Value::String(s) => Ok(Some(ResourceId::String(s))),
      Value::Number(n) => Ok(Some(ResourceId::Number(n))),
      Value::Bool(b) => Ok(Some(ResourceId::Bool(b))),
      other => Err(other),
    }
  }

  pub fn to_value(&self) -> Value {
    match self {
      ResourceId::String(s) => Value::String(s.clone()),
      ResourceId::Number(n) => Value::Number(n.clone()),
      ResourceId::Bool(b) => Value::Bool(*b),
    }
  }
}

impl PartialEq for ResourceId {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (ResourceId::String(a), ResourceId::String(b)) => a == b,
      (ResourceId::Number(a), ResourceId::Number(b)) => a.to_string() == b.to_string(),
      (ResourceId::Bool(a), ResourceId::Bool(b)) => a == b,
      _ => false,
    }
  }
}

impl Eq for ResourceId {}

impl Hash for ResourceId {
  fn hash<H: Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      ResourceId::String(s) => s.hash(state),
      ResourceId::Number(n) => n.to_string().hash(state),
      ResourceId::Bool(b) => b.hash(state),
    }
  }
}

impl std::fmt::Display for ResourceId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResourceId::String(s) => write!(f, "{}", s),
      ResourceId::Number(n) => write!(f, "{}", n),
      ResourceId::Bool(b) => write!(f, "{}", b),
    }
  }
}

impl From<&str> for ResourceId {
  fn from(value: &str) -> Self {
    ResourceId::String(value.to_string())
  }
}

impl From<String> for ResourceId {
  fn from(value: String) -> Self {
    ResourceId::String(value)
  }
}

impl From<u64> for ResourceId {
  fn from(value: u64) -> Self {
    ResourceId::Number(value.into())
  }
}

impl From<i64> for ResourceId {
  fn from(value: i64) -> Self {
    ResourceId::Number(value.into())
  }
}

/// The `(type, id)` identity of a resource within one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
  pub resource_type: String,
  pub id: ResourceId,
}

impl ResourceKey {
  pub fn new(resource_type: impl Into<String>, id: impl Into<ResourceId>) -> Self {
    Self {
      resource_type: resource_type.into(),
      id: id.into(),
    }
  }
}

impl std::fmt::Display for ResourceKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.resource_type, self.id)
  }
}

impl Serialize for ResourceKey {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
