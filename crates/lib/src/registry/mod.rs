//! The resource registry: the map between record types and JSON:API types.
//!
//! A [`Registry`] is built once from [`ResourceDescriptor`]s, validated as a
//! whole, and then shared read-only (it is `Send + Sync`) by any number of
//! [`JsonApiMapper`](crate::JsonApiMapper)s.

mod descriptor;
mod types;

use std::any::{Any, TypeId};
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

pub use descriptor::{ResourceDescriptor, ResourceSource};
pub use types::{
  AttributeField, Cardinality, ClassMetadata, IdField, RecordHandle, Related, RelationshipDescriptor, Shared, shared,
};

use crate::error::ConfigurationError;
use crate::naming::validate_field_name;

/// Member names JSON:API reserves at the resource object level.
const RESERVED_MEMBERS: &[&str] = &["id", "type"];

/// Immutable lookup from record types and wire types to [`ClassMetadata`].
#[derive(Debug)]
pub struct Registry {
  resources: Vec<ClassMetadata>,
  by_type: HashMap<String, usize>,
  by_record: HashMap<TypeId, usize>,
}

impl Registry {
  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::default()
  }

  /// Build a registry from a set of resource sources.
  ///
  /// Fails if any record type is ill-formed (no id, several ids, bad field
  /// names), if two sources share a wire type or a record type, or if a
  /// relationship targets a record type that is not in the set.
  pub fn build(sources: impl IntoIterator<Item = ResourceSource>) -> Result<Self, ConfigurationError> {
    let mut registry = Registry {
      resources: Vec::new(),
      by_type: HashMap::new(),
      by_record: HashMap::new(),
    };

    for source in sources {
      let metadata = describe(source)?;

      if let Some(&existing) = registry.by_type.get(&metadata.type_name) {
        return Err(ConfigurationError::DuplicateType {
          type_name: metadata.type_name,
          first: registry.resources[existing].record_name,
          second: metadata.record_name,
        });
      }
      if registry.by_record.contains_key(&metadata.record_type) {
        return Err(ConfigurationError::DuplicateRecord {
          record: metadata.record_name,
        });
      }

      trace!(
        resource_type = %metadata.type_name,
        record = metadata.record_name,
        attributes = metadata.attributes.len(),
        relationships = metadata.relationships.len(),
        "registered resource"
      );

      let index = registry.resources.len();
      registry.by_type.insert(metadata.type_name.clone(), index);
      registry.by_record.insert(metadata.record_type, index);
      registry.resources.push(metadata);
    }

    for metadata in &registry.resources {
      for relationship in metadata.relationships.values() {
        if !registry.by_record.contains_key(&relationship.target) {
          return Err(ConfigurationError::UnregisteredTarget {
            record: metadata.record_name,
            field: relationship.field.clone(),
            target: relationship.target_name,
          });
        }
      }
    }

    debug!(resources = registry.resources.len(), "built resource registry");
    Ok(registry)
  }

  /// Metadata for the wire type `type_name`.
  pub fn for_type(&self, type_name: &str) -> Option<&ClassMetadata> {
    self.by_type.get(type_name).map(|&i| &self.resources[i])
  }

  /// Metadata for the record type `R`.
  pub fn for_record<R: Any>(&self) -> Option<&ClassMetadata> {
    self.for_type_id(TypeId::of::<R>())
  }

  pub fn for_type_id(&self, record_type: TypeId) -> Option<&ClassMetadata> {
    self.by_record.get(&record_type).map(|&i| &self.resources[i])
  }

  /// The wire type registered for `R`.
  pub fn type_name_of<R: Any>(&self) -> Option<&str> {
    self.for_record::<R>().map(ClassMetadata::type_name)
  }

  /// All registered resources, in registration order.
  pub fn iter(&self) -> impl Iterator<Item = &ClassMetadata> {
    self.resources.iter()
  }

  pub fn len(&self) -> usize {
    self.resources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.resources.is_empty()
  }
}

/// Collects resource sources for [`Registry::build`].
#[derive(Default)]
pub struct RegistryBuilder {
  sources: Vec<ResourceSource>,
}

impl RegistryBuilder {
  pub fn resource(mut self, source: impl Into<ResourceSource>) -> Self {
    self.sources.push(source.into());
    self
  }

  pub fn build(self) -> Result<Registry, ConfigurationError> {
    Registry::build(self.sources)
  }
}

/// Validate one source and index its fields.
fn describe(source: ResourceSource) -> Result<ClassMetadata, ConfigurationError> {
  let record = source.record_name;

  let mut ids = source.ids;
  let id_field = match ids.len() {
    0 => return Err(ConfigurationError::MissingIdField { record }),
    1 => ids.remove(0),
    count => return Err(ConfigurationError::MultipleIdFields { record, count }),
  };

  let mut wire_names: HashMap<String, &str> = HashMap::new();
  let declared = source
    .attributes
    .iter()
    .map(|a| (a.name.as_str(), a.wire_name.as_str()))
    .chain(
      source
        .relationships
        .iter()
        .map(|r| (r.field.as_str(), r.wire_name.as_str())),
    );
  for (field, wire_name) in declared {
    validate_field_name(field).map_err(|reason| ConfigurationError::InvalidFieldName {
      record,
      field: field.to_string(),
      reason,
    })?;
    if RESERVED_MEMBERS.contains(&wire_name) {
      return Err(ConfigurationError::InvalidFieldName {
        record,
        field: field.to_string(),
        reason: format!("'{}' is a reserved member name", wire_name),
      });
    }
    if wire_names.insert(wire_name.to_string(), field).is_some() {
      return Err(ConfigurationError::DuplicateField {
        record,
        wire_name: wire_name.to_string(),
      });
    }
  }

  let attributes_by_wire = source
    .attributes
    .iter()
    .enumerate()
    .map(|(i, a)| (a.wire_name.clone(), i))
    .collect();

  let relationships: IndexMap<String, RelationshipDescriptor> = source
    .relationships
    .into_iter()
    .map(|r| (r.field.clone(), r))
    .collect();
  let relationships_by_wire = relationships
    .values()
    .enumerate()
    .map(|(i, r)| (r.wire_name.clone(), i))
    .collect();

  Ok(ClassMetadata {
    type_name: source.type_name,
    record_type: source.record_type,
    record_name: record,
    id_field,
    attributes: source.attributes,
    relationships,
    attributes_by_wire,
    relationships_by_wire,
    hooks: source.hooks,
  })
}
