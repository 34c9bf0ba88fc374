//! Document to record graph.
//!
//! Decoding runs in two phases. First every resource object in `included`,
//! then the primary data, is materialized into a fresh record with its id and
//! attributes set; relationships are queued as deferred resolvers. Then the
//! queue is drained: each identifier resolves to the pooled `included` record
//! with the same `(type, id)` (shared, so cycles close) or to a fresh stub
//! carrying only the id.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::document::{MultiDocument, Relationship, ResourceIdentifier, ResourceObject, SingleDocument};
use crate::error::CodecError;
use crate::id::ResourceKey;
use crate::registry::{Cardinality, ClassMetadata, RecordHandle, Related, Registry, RelationshipDescriptor};

/// A relationship waiting for the pool to be complete.
struct Resolver<'a> {
  parent: RecordHandle,
  parent_meta: &'a ClassMetadata,
  descriptor: &'a RelationshipDescriptor,
  relationship: &'a Relationship,
}

pub(crate) struct Decoder<'a> {
  registry: &'a Registry,
  pool: HashMap<ResourceKey, RecordHandle>,
  deferred: Vec<Resolver<'a>>,
}

impl<'a> Decoder<'a> {
  pub(crate) fn new(registry: &'a Registry) -> Self {
    Self {
      registry,
      pool: HashMap::new(),
      deferred: Vec::new(),
    }
  }

  pub(crate) fn decode_single<R: Any>(mut self, document: &'a SingleDocument) -> Result<Option<R>, CodecError> {
    let meta = self.meta_for::<R>()?;
    self.materialize_included(&document.included)?;

    let Some(data) = document.data.as_ref() else {
      return Ok(None);
    };
    let root = self.materialize_primary(data, meta)?;
    self.resolve_deferred()?;

    into_record::<R>(root).map(Some)
  }

  pub(crate) fn decode_many<R: Any>(mut self, document: &'a MultiDocument) -> Result<Vec<R>, CodecError> {
    let meta = self.meta_for::<R>()?;
    self.materialize_included(&document.included)?;

    let mut roots = Vec::with_capacity(document.data.len());
    for data in &document.data {
      roots.push(self.materialize_primary(data, meta)?);
    }
    self.resolve_deferred()?;

    roots.into_iter().map(into_record::<R>).collect()
  }

  fn meta_for<R: Any>(&self) -> Result<&'a ClassMetadata, CodecError> {
    let registry = self.registry;
    registry
      .for_record::<R>()
      .ok_or_else(|| CodecError::UnknownResourceType(std::any::type_name::<R>().to_string()))
  }

  fn materialize_included(&mut self, included: &'a [ResourceObject]) -> Result<(), CodecError> {
    let registry = self.registry;
    for resource in included {
      let meta = registry
        .for_type(&resource.resource_type)
        .ok_or_else(|| CodecError::UnknownResourceType(resource.resource_type.clone()))?;
      let key = resource.key().ok_or_else(|| CodecError::MissingId {
        type_name: resource.resource_type.clone(),
      })?;
      if self.pool.contains_key(&key) {
        return Err(CodecError::malformed(format!("resource {} appears more than once in included", key)));
      }

      let handle = self.materialize(resource, meta)?;
      self.pool.insert(key, handle);
    }
    Ok(())
  }

  fn materialize_primary(
    &mut self,
    resource: &'a ResourceObject,
    meta: &'a ClassMetadata,
  ) -> Result<RecordHandle, CodecError> {
    if resource.resource_type != meta.type_name() {
      return Err(CodecError::malformed(format!(
        "primary data has type '{}', expected '{}'",
        resource.resource_type,
        meta.type_name()
      )));
    }
    self.materialize(resource, meta)
  }

  /// Construct a record from `resource`: id and attributes now, relationships
  /// queued.
  fn materialize(
    &mut self,
    resource: &'a ResourceObject,
    meta: &'a ClassMetadata,
  ) -> Result<RecordHandle, CodecError> {
    let handle = meta.new_record();
    {
      let mut record = meta.borrow_mut(&handle)?;
      if let Some(id) = &resource.id {
        meta.id_field().set(&mut *record, id)?;
      }
      for (wire_name, value) in &resource.attributes {
        match meta.attribute_by_wire(wire_name) {
          Some(attribute) => attribute.set(&mut *record, value)?,
          None => trace!(resource_type = meta.type_name(), attribute = %wire_name, "ignoring unknown attribute"),
        }
      }
    }

    for (wire_name, relationship) in &resource.relationships {
      match meta.relationship_by_wire(wire_name) {
        Some(descriptor) => self.deferred.push(Resolver {
          parent: Rc::clone(&handle),
          parent_meta: meta,
          descriptor,
          relationship,
        }),
        None => trace!(resource_type = meta.type_name(), relationship = %wire_name, "ignoring unknown relationship"),
      }
    }

    Ok(handle)
  }

  fn resolve_deferred(&mut self) -> Result<(), CodecError> {
    for resolver in std::mem::take(&mut self.deferred) {
      self.resolve(resolver)?;
    }
    Ok(())
  }

  fn resolve(&self, resolver: Resolver<'a>) -> Result<(), CodecError> {
    let Resolver {
      parent,
      parent_meta,
      descriptor,
      relationship,
    } = resolver;

    let registry = self.registry;
    let target = registry
      .for_type_id(descriptor.target())
      .ok_or_else(|| CodecError::UnknownResourceType(descriptor.target_name().to_string()))?;

    let related = match (descriptor.cardinality(), relationship) {
      (Cardinality::Many, Relationship::Many(many)) => Related::Many(
        many
          .data
          .iter()
          .map(|identifier| self.resolve_one(identifier, target, descriptor))
          .collect::<Result<_, _>>()?,
      ),
      (Cardinality::Many, Relationship::One(_)) => {
        return Err(CodecError::malformed(format!(
          "relationship '{}' of '{}' must hold an array",
          descriptor.wire_name(),
          parent_meta.type_name()
        )));
      }
      (Cardinality::One, Relationship::One(one)) => Related::One(
        one
          .data
          .as_ref()
          .map(|identifier| self.resolve_one(identifier, target, descriptor))
          .transpose()?,
      ),
      (Cardinality::One, Relationship::Many(_)) => {
        return Err(CodecError::malformed(format!(
          "relationship '{}' of '{}' must hold a single identifier or null",
          descriptor.wire_name(),
          parent_meta.type_name()
        )));
      }
    };

    let mut record = parent_meta.borrow_mut(&parent)?;
    descriptor.set(&mut *record, related)
  }

  /// The pooled record for `identifier`, or a fresh stub.
  fn resolve_one(
    &self,
    identifier: &ResourceIdentifier,
    target: &ClassMetadata,
    descriptor: &RelationshipDescriptor,
  ) -> Result<RecordHandle, CodecError> {
    if self.registry.for_type(&identifier.resource_type).is_none() {
      return Err(CodecError::malformed(format!(
        "relationship '{}' references unknown type '{}'",
        descriptor.wire_name(),
        identifier.resource_type
      )));
    }
    if identifier.resource_type != target.type_name() {
      return Err(CodecError::malformed(format!(
        "relationship '{}' references type '{}', expected '{}'",
        descriptor.wire_name(),
        identifier.resource_type,
        target.type_name()
      )));
    }

    let id = identifier.id.as_ref().ok_or_else(|| CodecError::MissingId {
      type_name: identifier.resource_type.clone(),
    })?;
    let key = ResourceKey::new(target.type_name(), id.clone());

    if let Some(handle) = self.pool.get(&key) {
      return Ok(Rc::clone(handle));
    }

    trace!(%key, "fabricating stub for external reference");
    target.new_stub(id)
  }
}

/// Take a root record out of its handle.
fn into_record<R: Any>(handle: RecordHandle) -> Result<R, CodecError> {
  let cell = handle
    .downcast::<RefCell<R>>()
    .map_err(|_| CodecError::invariant(format!("root record is not a {}", std::any::type_name::<R>())))?;
  Rc::try_unwrap(cell)
    .map(RefCell::into_inner)
    .map_err(|_| CodecError::invariant("root record is still referenced after resolution"))
}
