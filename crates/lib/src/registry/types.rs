//! Erased per-type descriptors.
//!
//! A [`ClassMetadata`] describes one registered record type without naming
//! it: fields are reached through boxed accessors over `dyn Any`, and records
//! travel as [`RecordHandle`]s (an `Rc<RefCell<R>>` behind `Rc<dyn Any>`).

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::CodecError;
use crate::id::ResourceId;

/// Shared, mutable ownership of a related record.
///
/// To-one relationship fields are `Option<Shared<T>>`, to-many fields are
/// `Vec<Shared<T>>`. Decoded references to the same included resource share
/// one allocation, so `Rc::ptr_eq` observes resource identity.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a record for use as a relationship target.
pub fn shared<T>(record: T) -> Shared<T> {
  Rc::new(RefCell::new(record))
}

/// A type-erased [`Shared`] record.
pub type RecordHandle = Rc<dyn Any>;

pub(crate) type ReadFn = Box<dyn Fn(&dyn Any) -> Result<Value, CodecError> + Send + Sync>;
pub(crate) type WriteFn = Box<dyn Fn(&mut dyn Any, &Value) -> Result<(), CodecError> + Send + Sync>;
pub(crate) type ReadRelatedFn = Box<dyn Fn(&dyn Any) -> Result<Related, CodecError> + Send + Sync>;
pub(crate) type WriteRelatedFn = Box<dyn Fn(&mut dyn Any, Related) -> Result<(), CodecError> + Send + Sync>;

pub(crate) type ConstructFn = fn() -> RecordHandle;
pub(crate) type BorrowFn = fn(&dyn Any) -> Result<Ref<'_, dyn Any>, CodecError>;
pub(crate) type BorrowMutFn = fn(&dyn Any) -> Result<RefMut<'_, dyn Any>, CodecError>;

/// Whether a relationship field holds one related record or a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  One,
  Many,
}

/// The erased value of a relationship field.
pub enum Related {
  One(Option<RecordHandle>),
  Many(Vec<RecordHandle>),
}

/// The field carrying a record's resource id.
pub struct IdField {
  pub(crate) name: String,
  pub(crate) read: ReadFn,
  pub(crate) write: WriteFn,
}

impl IdField {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Read the id of `record`, failing with `MissingId` when it is null.
  pub fn get(&self, record: &dyn Any, type_name: &str) -> Result<ResourceId, CodecError> {
    let value = (self.read)(record)?;
    match ResourceId::from_value(value) {
      Ok(Some(id)) => Ok(id),
      Ok(None) => Err(CodecError::MissingId {
        type_name: type_name.to_string(),
      }),
      Err(value) => Err(CodecError::Coercion {
        type_name: type_name.to_string(),
        field: self.name.clone(),
        source: <serde_json::Error as serde::de::Error>::custom(format!("id must be a JSON scalar, found {}", value)),
      }),
    }
  }

  pub fn set(&self, record: &mut dyn Any, id: &ResourceId) -> Result<(), CodecError> {
    (self.write)(record, &id.to_value())
  }
}

/// A primitive attribute field.
pub struct AttributeField {
  pub(crate) name: String,
  pub(crate) wire_name: String,
  pub(crate) read: ReadFn,
  pub(crate) write: WriteFn,
}

impl AttributeField {
  /// The declared (lowerCamel) field name.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The lower-hyphen member name used in documents.
  pub fn wire_name(&self) -> &str {
    &self.wire_name
  }

  pub fn get(&self, record: &dyn Any) -> Result<Value, CodecError> {
    (self.read)(record)
  }

  pub fn set(&self, record: &mut dyn Any, value: &Value) -> Result<(), CodecError> {
    (self.write)(record, value)
  }
}

/// A typed relationship field.
pub struct RelationshipDescriptor {
  pub(crate) field: String,
  pub(crate) wire_name: String,
  pub(crate) cardinality: Cardinality,
  pub(crate) target: TypeId,
  pub(crate) target_name: &'static str,
  pub(crate) read: ReadRelatedFn,
  pub(crate) write: WriteRelatedFn,
}

impl RelationshipDescriptor {
  pub fn field(&self) -> &str {
    &self.field
  }

  pub fn wire_name(&self) -> &str {
    &self.wire_name
  }

  pub fn cardinality(&self) -> Cardinality {
    self.cardinality
  }

  pub fn is_many(&self) -> bool {
    self.cardinality == Cardinality::Many
  }

  /// `TypeId` of the related record type.
  pub fn target(&self) -> TypeId {
    self.target
  }

  /// Rust type name of the related record type, for diagnostics.
  pub fn target_name(&self) -> &'static str {
    self.target_name
  }

  pub fn get(&self, record: &dyn Any) -> Result<Related, CodecError> {
    (self.read)(record)
  }

  pub fn set(&self, record: &mut dyn Any, related: Related) -> Result<(), CodecError> {
    (self.write)(record, related)
  }
}

/// Construction and borrowing of records of one type.
#[derive(Clone, Copy)]
pub(crate) struct RecordHooks {
  pub(crate) construct: ConstructFn,
  pub(crate) borrow: BorrowFn,
  pub(crate) borrow_mut: BorrowMutFn,
}

impl RecordHooks {
  pub(crate) fn of<R: Any + Default>() -> Self {
    Self {
      construct: construct_record::<R>,
      borrow: borrow_record::<R>,
      borrow_mut: borrow_record_mut::<R>,
    }
  }
}

fn construct_record<R: Any + Default>() -> RecordHandle {
  Rc::new(RefCell::new(R::default()))
}

fn record_cell<R: Any>(handle: &dyn Any) -> Result<&RefCell<R>, CodecError> {
  handle
    .downcast_ref::<RefCell<R>>()
    .ok_or_else(|| CodecError::invariant(format!("record handle is not a {}", std::any::type_name::<R>())))
}

fn borrow_record<R: Any>(handle: &dyn Any) -> Result<Ref<'_, dyn Any>, CodecError> {
  let record = record_cell::<R>(handle)?
    .try_borrow()
    .map_err(|_| CodecError::invariant(format!("{} is mutably borrowed", std::any::type_name::<R>())))?;
  Ok(Ref::map(record, |r| r as &dyn Any))
}

fn borrow_record_mut<R: Any>(handle: &dyn Any) -> Result<RefMut<'_, dyn Any>, CodecError> {
  let record = record_cell::<R>(handle)?
    .try_borrow_mut()
    .map_err(|_| CodecError::invariant(format!("{} is already borrowed", std::any::type_name::<R>())))?;
  Ok(RefMut::map(record, |r| r as &mut dyn Any))
}

/// Everything the codec knows about one registered record type.
pub struct ClassMetadata {
  pub(crate) type_name: String,
  pub(crate) record_type: TypeId,
  pub(crate) record_name: &'static str,
  pub(crate) id_field: IdField,
  pub(crate) attributes: Vec<AttributeField>,
  pub(crate) relationships: IndexMap<String, RelationshipDescriptor>,
  pub(crate) attributes_by_wire: HashMap<String, usize>,
  pub(crate) relationships_by_wire: HashMap<String, usize>,
  pub(crate) hooks: RecordHooks,
}

impl ClassMetadata {
  /// The JSON:API `type` of this resource.
  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn record_type(&self) -> TypeId {
    self.record_type
  }

  pub fn id_field(&self) -> &IdField {
    &self.id_field
  }

  /// Attribute fields in registration order; this is the emitted order.
  pub fn attribute_fields(&self) -> &[AttributeField] {
    &self.attributes
  }

  /// Relationship descriptors keyed by declared field name, in registration order.
  pub fn relationships(&self) -> &IndexMap<String, RelationshipDescriptor> {
    &self.relationships
  }

  pub fn attribute_by_wire(&self, wire_name: &str) -> Option<&AttributeField> {
    self.attributes_by_wire.get(wire_name).map(|&i| &self.attributes[i])
  }

  pub fn relationship_by_wire(&self, wire_name: &str) -> Option<&RelationshipDescriptor> {
    self
      .relationships_by_wire
      .get(wire_name)
      .and_then(|&i| self.relationships.get_index(i))
      .map(|(_, descriptor)| descriptor)
  }

  /// Read the id of `record`.
  pub fn id_of(&self, record: &dyn Any) -> Result<ResourceId, CodecError> {
    self.id_field.get(record, &self.type_name)
  }

  /// True when at least one attribute of `record` holds a non-null value.
  ///
  /// A record with only an id is a pure reference and is never expanded into
  /// `included`.
  pub fn has_attribute_values(&self, record: &dyn Any) -> Result<bool, CodecError> {
    for attribute in &self.attributes {
      if !attribute.get(record)?.is_null() {
        return Ok(true);
      }
    }
    Ok(false)
  }

  /// Allocate a default-valued record.
  pub fn new_record(&self) -> RecordHandle {
    (self.hooks.construct)()
  }

  /// Allocate a record populated only with `id`.
  pub fn new_stub(&self, id: &ResourceId) -> Result<RecordHandle, CodecError> {
    let handle = self.new_record();
    {
      let mut record = self.borrow_mut(&handle)?;
      self.id_field.set(&mut *record, id)?;
    }
    Ok(handle)
  }

  pub fn borrow<'h>(&self, handle: &'h RecordHandle) -> Result<Ref<'h, dyn Any>, CodecError> {
    (self.hooks.borrow)(handle.as_ref())
  }

  pub fn borrow_mut<'h>(&self, handle: &'h RecordHandle) -> Result<RefMut<'h, dyn Any>, CodecError> {
    (self.hooks.borrow_mut)(handle.as_ref())
  }
}

impl std::fmt::Debug for ClassMetadata {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClassMetadata")
      .field("type_name", &self.type_name)
      .field("record", &self.record_name)
      .field("id", &self.id_field.name)
      .field(
        "attributes",
        &self.attributes.iter().map(|a| a.wire_name.as_str()).collect::<Vec<_>>(),
      )
      .field("relationships", &self.relationships.keys().collect::<Vec<_>>())
      .finish()
  }
}
