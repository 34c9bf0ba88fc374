//! Record graph to document.
//!
//! An [`Encoder`] lives for one call. It walks the record graph depth-first
//! from the primary resource(s) and inlines every related record that carries
//! attribute values into `included`, once per `(type, id)`.
//!
//! Identity bookkeeping:
//!
//! - primary keys are reserved before traversal, so a primary resource reached
//!   through a relationship is never copied into `included`;
//! - an included key is reserved (with an empty slot) the moment it is first
//!   visited and filled after its own relationships are walked, so cycles
//!   terminate and `included` is in first-visit order.

use std::any::Any;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::document::{
  Links, ManyRelationship, MultiDocument, Relationship, ResourceIdentifier, ResourceObject, SingleDocument,
  SingleRelationship,
};
use crate::error::CodecError;
use crate::id::{ResourceId, ResourceKey};
use crate::links::LinkGenerator;
use crate::options::EncodeOptions;
use crate::registry::{ClassMetadata, RecordHandle, Related, Registry, RelationshipDescriptor};

pub(crate) struct Encoder<'a> {
  registry: &'a Registry,
  links: &'a dyn LinkGenerator,
  options: EncodeOptions,
  primary: HashSet<ResourceKey>,
  included: IndexMap<ResourceKey, Option<ResourceObject>>,
}

impl<'a> Encoder<'a> {
  pub(crate) fn new(registry: &'a Registry, links: &'a dyn LinkGenerator, options: EncodeOptions) -> Self {
    Self {
      registry,
      links,
      options,
      primary: HashSet::new(),
      included: IndexMap::new(),
    }
  }

  pub(crate) fn encode_single<R: Any>(mut self, source: &R) -> Result<SingleDocument, CodecError> {
    let meta = self.meta_for::<R>()?;
    let key = ResourceKey::new(meta.type_name(), meta.id_of(source)?);
    self.primary.insert(key);

    let data = self.parse_resource(source, meta)?;
    Ok(SingleDocument {
      data: Some(data),
      included: self.finish()?,
      ..Default::default()
    })
  }

  pub(crate) fn encode_many<R: Any>(mut self, sources: &[R]) -> Result<MultiDocument, CodecError> {
    let meta = self.meta_for::<R>()?;

    let mut unique = Vec::with_capacity(sources.len());
    for source in sources {
      let key = ResourceKey::new(meta.type_name(), meta.id_of(source)?);
      if self.primary.insert(key.clone()) {
        unique.push(source);
      } else {
        trace!(%key, "collapsing repeated primary resource");
      }
    }

    let mut data = Vec::with_capacity(unique.len());
    for source in unique {
      data.push(self.parse_resource(source, meta)?);
    }

    Ok(MultiDocument {
      data,
      included: self.finish()?,
      ..Default::default()
    })
  }

  fn meta_for<R: Any>(&self) -> Result<&'a ClassMetadata, CodecError> {
    let registry = self.registry;
    registry
      .for_record::<R>()
      .ok_or_else(|| CodecError::UnknownResourceType(std::any::type_name::<R>().to_string()))
  }

  fn target_of(&self, relationship: &RelationshipDescriptor) -> Result<&'a ClassMetadata, CodecError> {
    let registry = self.registry;
    registry
      .for_type_id(relationship.target())
      .ok_or_else(|| CodecError::UnknownResourceType(relationship.target_name().to_string()))
  }

  /// Build the resource object for `record`, walking its relationships.
  fn parse_resource(&mut self, record: &dyn Any, meta: &'a ClassMetadata) -> Result<ResourceObject, CodecError> {
    let id = meta.id_of(record)?;
    let mut resource = ResourceObject::new(meta.type_name(), id.clone());

    for attribute in meta.attribute_fields() {
      resource.add_attribute(attribute.wire_name(), attribute.get(record)?);
    }

    for relationship in meta.relationships().values() {
      let target = self.target_of(relationship)?;
      let links = non_empty(self.links.relationship_links(meta.type_name(), &id, relationship.wire_name()));

      match relationship.get(record)? {
        Related::Many(items) => {
          if items.is_empty() {
            continue;
          }
          let mut many = ManyRelationship {
            links,
            ..Default::default()
          };
          for item in &items {
            many.push(self.relate(item, target)?);
          }
          resource.add_relationship(relationship.wire_name(), Relationship::Many(many));
        }
        Related::One(item) => {
          let data = match &item {
            Some(item) => Some(self.relate(item, target)?),
            None => None,
          };
          resource.add_relationship(
            relationship.wire_name(),
            Relationship::One(SingleRelationship {
              data,
              links,
              meta: None,
            }),
          );
        }
      }
    }

    resource.links = non_empty(self.links.resource_links(meta.type_name(), &id));
    Ok(resource)
  }

  /// Identify a related record, inlining it into `included` when eligible.
  fn relate(&mut self, item: &RecordHandle, target: &'a ClassMetadata) -> Result<ResourceIdentifier, CodecError> {
    let record = target.borrow(item)?;
    let id = target.id_of(&*record)?;
    let identifier = ResourceIdentifier::new(target.type_name(), id.clone());

    if self.options.include_related_resources && target.has_attribute_values(&*record)? {
      self.include(ResourceKey::new(target.type_name(), id), &*record, target)?;
    }

    Ok(identifier)
  }

  fn include(&mut self, key: ResourceKey, record: &dyn Any, meta: &'a ClassMetadata) -> Result<(), CodecError> {
    if self.primary.contains(&key) || self.included.contains_key(&key) {
      return Ok(());
    }

    trace!(%key, "including related resource");
    self.included.insert(key.clone(), None);
    let resource = self.parse_resource(record, meta)?;
    self.included.insert(key, Some(resource));
    Ok(())
  }

  fn finish(self) -> Result<Vec<ResourceObject>, CodecError> {
    self
      .included
      .into_iter()
      .map(|(key, resource)| {
        resource.ok_or_else(|| CodecError::invariant(format!("included slot for {} was never filled", key)))
      })
      .collect()
  }
}

fn non_empty(links: Option<Links>) -> Option<Links> {
  links.filter(|links| !links.is_empty())
}

/// Read the identifier of a registered record.
pub fn resource_identifier<R: Any>(registry: &Registry, record: &R) -> Result<ResourceIdentifier, CodecError> {
  let meta = registry
    .for_record::<R>()
    .ok_or_else(|| CodecError::UnknownResourceType(std::any::type_name::<R>().to_string()))?;
  let id: ResourceId = meta.id_of(record)?;
  Ok(ResourceIdentifier::new(meta.type_name(), id))
}
