use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::id::{ResourceId, ResourceKey};

/// A JSON:API links object. Only string links are supported.
pub type Links = BTreeMap<String, String>;

/// A JSON:API meta object: free-form key/value pairs.
pub type Meta = serde_json::Map<String, Value>;

/// A `{type, id}` reference to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
  #[serde(rename = "type")]
  pub resource_type: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<ResourceId>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Meta>,
}

impl ResourceIdentifier {
  pub fn new(resource_type: impl Into<String>, id: impl Into<ResourceId>) -> Self {
    Self {
      resource_type: resource_type.into(),
      id: Some(id.into()),
      meta: None,
    }
  }

  /// The `(type, id)` identity, if the identifier carries an id.
  pub fn key(&self) -> Option<ResourceKey> {
    self.id.as_ref().map(|id| ResourceKey {
      resource_type: self.resource_type.clone(),
      id: id.clone(),
    })
  }
}

/// A resource object: identity plus attributes, relationships and links.
///
/// Attribute and relationship maps keep insertion order, which is the
/// registry's field order for encoded resources and the wire order for parsed
/// ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
  #[serde(rename = "type")]
  pub resource_type: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<ResourceId>,

  /// Attribute values keyed by wire name. `null` values are kept in memory
  /// and dropped on serialization.
  #[serde(
    default,
    skip_serializing_if = "attributes_are_empty",
    serialize_with = "serialize_attributes"
  )]
  pub attributes: IndexMap<String, Value>,

  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub relationships: IndexMap<String, Relationship>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub links: Option<Links>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Meta>,
}

impl ResourceObject {
  pub fn new(resource_type: impl Into<String>, id: impl Into<ResourceId>) -> Self {
    Self {
      resource_type: resource_type.into(),
      id: Some(id.into()),
      ..Default::default()
    }
  }

  pub fn key(&self) -> Option<ResourceKey> {
    self.id.as_ref().map(|id| ResourceKey {
      resource_type: self.resource_type.clone(),
      id: id.clone(),
    })
  }

  pub fn add_attribute(&mut self, wire_name: impl Into<String>, value: Value) {
    self.attributes.insert(wire_name.into(), value);
  }

  pub fn add_relationship(&mut self, wire_name: impl Into<String>, relationship: Relationship) {
    self.relationships.insert(wire_name.into(), relationship);
  }
}

fn attributes_are_empty(attributes: &IndexMap<String, Value>) -> bool {
  attributes.values().all(Value::is_null)
}

fn serialize_attributes<S: Serializer>(attributes: &IndexMap<String, Value>, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_map(attributes.iter().filter(|(_, value)| !value.is_null()))
}

/// A relationship slot. Which variant a parsed slot becomes is decided by the
/// shape of its `data` member (see [`Relationship`]'s `Deserialize` impl).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Relationship {
  One(SingleRelationship),
  Many(ManyRelationship),
}

impl Relationship {
  pub fn links(&self) -> Option<&Links> {
    match self {
      Relationship::One(one) => one.links.as_ref(),
      Relationship::Many(many) => many.links.as_ref(),
    }
  }

  /// All identifiers carried by this slot, in wire order.
  pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
    match self {
      Relationship::One(one) => one.data.iter().collect(),
      Relationship::Many(many) => many.data.iter().collect(),
    }
  }
}

/// A to-one relationship. `data: null` is emitted explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleRelationship {
  #[serde(default)]
  pub data: Option<ResourceIdentifier>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub links: Option<Links>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Meta>,
}

/// A to-many relationship. `data` is never null; it may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManyRelationship {
  #[serde(default)]
  pub data: Vec<ResourceIdentifier>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub links: Option<Links>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Meta>,
}

impl ManyRelationship {
  pub fn push(&mut self, identifier: ResourceIdentifier) {
    self.data.push(identifier);
  }
}

/// The `source` member of an error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pointer: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parameter: Option<String>,
}

/// A JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<ErrorSource>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meta: Option<Meta>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub links: Option<Links>,
}

/// A document whose primary data is a single resource (or `null`).
///
/// `data: null` is emitted unless the document carries `errors`, which may not
/// share a document with `data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SingleDocument {
  #[serde(default)]
  pub data: Option<ResourceObject>,

  #[serde(default)]
  pub included: Vec<ResourceObject>,

  #[serde(default)]
  pub errors: Vec<ErrorObject>,

  #[serde(default)]
  pub meta: Option<Meta>,

  #[serde(default)]
  pub links: Option<Links>,
}

/// A document whose primary data is a sequence of resources.
///
/// An empty `data` array is omitted when the document carries `errors`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MultiDocument {
  #[serde(default)]
  pub data: Vec<ResourceObject>,

  #[serde(default)]
  pub included: Vec<ResourceObject>,

  #[serde(default)]
  pub errors: Vec<ErrorObject>,

  #[serde(default)]
  pub meta: Option<Meta>,

  #[serde(default)]
  pub links: Option<Links>,
}

impl Serialize for SingleDocument {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let emit_data = self.data.is_some() || self.errors.is_empty();
    serialize_document(serializer, "SingleDocument", emit_data.then_some(&self.data), DocumentTail::from(self))
  }
}

impl Serialize for MultiDocument {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let emit_data = !self.data.is_empty() || self.errors.is_empty();
    serialize_document(serializer, "MultiDocument", emit_data.then_some(&self.data), DocumentTail::from(self))
  }
}

/// The members both document shapes share after `data`.
struct DocumentTail<'d> {
  included: &'d [ResourceObject],
  errors: &'d [ErrorObject],
  meta: Option<&'d Meta>,
  links: Option<&'d Links>,
}

impl<'d> From<&'d SingleDocument> for DocumentTail<'d> {
  fn from(document: &'d SingleDocument) -> Self {
    Self {
      included: &document.included,
      errors: &document.errors,
      meta: document.meta.as_ref(),
      links: document.links.as_ref(),
    }
  }
}

impl<'d> From<&'d MultiDocument> for DocumentTail<'d> {
  fn from(document: &'d MultiDocument) -> Self {
    Self {
      included: &document.included,
      errors: &document.errors,
      meta: document.meta.as_ref(),
      links: document.links.as_ref(),
    }
  }
}

fn serialize_document<S: Serializer, T: Serialize>(
  serializer: S,
  name: &'static str,
  data: Option<&T>,
  tail: DocumentTail<'_>,
) -> Result<S::Ok, S::Error> {
  let mut state = serializer.serialize_struct(name, 5)?;
  match data {
    Some(data) => state.serialize_field("data", data)?,
    None => state.skip_field("data")?,
  }
  if tail.included.is_empty() {
    state.skip_field("included")?;
  } else {
    state.serialize_field("included", tail.included)?;
  }
  if tail.errors.is_empty() {
    state.skip_field("errors")?;
  } else {
    state.serialize_field("errors", tail.errors)?;
  }
  match tail.meta {
    Some(meta) => state.serialize_field("meta", meta)?,
    None => state.skip_field("meta")?,
  }
  match tail.links {
    Some(links) => state.serialize_field("links", links)?,
    None => state.skip_field("links")?,
  }
  state.end()
}

/// Either document shape. Parsed documents are dispatched on whether `data`
/// is an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
  Single(SingleDocument),
  Multi(MultiDocument),
}

impl Document {
  /// Primary resources, in document order.
  pub fn primary(&self) -> &[ResourceObject] {
    match self {
      Document::Single(doc) => doc.data.as_slice(),
      Document::Multi(doc) => &doc.data,
    }
  }

  pub fn included(&self) -> &[ResourceObject] {
    match self {
      Document::Single(doc) => &doc.included,
      Document::Multi(doc) => &doc.included,
    }
  }

  pub fn errors(&self) -> &[ErrorObject] {
    match self {
      Document::Single(doc) => &doc.errors,
      Document::Multi(doc) => &doc.errors,
    }
  }

  pub fn is_multi(&self) -> bool {
    matches!(self, Document::Multi(_))
  }
}

impl From<SingleDocument> for Document {
  fn from(document: SingleDocument) -> Self {
    Document::Single(document)
  }
}

impl From<MultiDocument> for Document {
  fn from(document: MultiDocument) -> Self {
    Document::Multi(document)
  }
}
