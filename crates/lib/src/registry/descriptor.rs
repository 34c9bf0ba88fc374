//! Typed registration of record types.
//!
//! A [`ResourceDescriptor`] is written against a concrete record type and
//! erases itself into a [`ResourceSource`] when handed to the registry:
//!
//! ```
//! use jsonapi_lib::registry::{Registry, ResourceDescriptor};
//! use jsonapi_lib::Shared;
//!
//! #[derive(Default)]
//! struct Person {
//!   id: Option<String>,
//!   first_name: Option<String>,
//! }
//!
//! #[derive(Default)]
//! struct Article {
//!   id: Option<String>,
//!   title: Option<String>,
//!   author: Option<Shared<Person>>,
//! }
//!
//! let registry = Registry::builder()
//!   .resource(
//!     ResourceDescriptor::<Article>::new("articles")
//!       .id(|a| &a.id, |a| &mut a.id)
//!       .attribute("title", |a| &a.title, |a| &mut a.title)
//!       .to_one("author", |a| &a.author, |a| &mut a.author),
//!   )
//!   .resource(
//!     ResourceDescriptor::<Person>::new("people")
//!       .id(|p| &p.id, |p| &mut p.id)
//!       .attribute("firstName", |p| &p.first_name, |p| &mut p.first_name),
//!   )
//!   .build()
//!   .unwrap();
//!
//! assert_eq!(registry.type_name_of::<Article>(), Some("articles"));
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
  AttributeField, Cardinality, IdField, ReadFn, ReadRelatedFn, RecordHandle, RecordHooks, Related,
  RelationshipDescriptor, Shared, WriteFn, WriteRelatedFn,
};
use crate::error::CodecError;
use crate::naming::to_wire_name;

const ID_FIELD: &str = "id";

/// Field declarations for one record type `R`.
pub struct ResourceDescriptor<R> {
  type_name: String,
  ids: Vec<IdField>,
  attributes: Vec<AttributeField>,
  relationships: Vec<RelationshipDescriptor>,
  _record: PhantomData<fn() -> R>,
}

impl<R: Any + Default> ResourceDescriptor<R> {
  /// Start describing `R`, published on the wire as `type_name`.
  pub fn new(type_name: impl Into<String>) -> Self {
    Self {
      type_name: type_name.into(),
      ids: Vec::new(),
      attributes: Vec::new(),
      relationships: Vec::new(),
      _record: PhantomData,
    }
  }

  /// Declare the id field. Its JSON form must be a string, number or bool.
  pub fn id<F>(mut self, get: fn(&R) -> &F, get_mut: fn(&mut R) -> &mut F) -> Self
  where
    F: Serialize + DeserializeOwned + 'static,
  {
    self.ids.push(IdField {
      name: ID_FIELD.to_string(),
      read: value_reader(&self.type_name, ID_FIELD, get),
      write: value_writer(&self.type_name, ID_FIELD, get_mut),
    });
    self
  }

  /// Declare a primitive attribute. `name` is the lowerCamel field name; the
  /// wire name is derived from it.
  pub fn attribute<F>(mut self, name: &str, get: fn(&R) -> &F, get_mut: fn(&mut R) -> &mut F) -> Self
  where
    F: Serialize + DeserializeOwned + 'static,
  {
    self.attributes.push(AttributeField {
      name: name.to_string(),
      wire_name: to_wire_name(name),
      read: value_reader(&self.type_name, name, get),
      write: value_writer(&self.type_name, name, get_mut),
    });
    self
  }

  /// Declare a to-one relationship to records of type `T`.
  pub fn to_one<T: Any>(
    mut self,
    name: &str,
    get: fn(&R) -> &Option<Shared<T>>,
    get_mut: fn(&mut R) -> &mut Option<Shared<T>>,
  ) -> Self {
    let field = name.to_string();

    let read: ReadRelatedFn = Box::new(move |record: &dyn Any| {
      let record = downcast_record::<R>(record)?;
      Ok(Related::One(get(record).as_ref().map(|target| erase(target))))
    });

    let write: WriteRelatedFn = {
      let field = field.clone();
      Box::new(move |record: &mut dyn Any, related: Related| {
        let record = downcast_record_mut::<R>(record)?;
        match related {
          Related::One(target) => {
            *get_mut(record) = target.map(restore::<T>).transpose()?;
            Ok(())
          }
          Related::Many(_) => Err(CodecError::invariant(format!(
            "to-many value written to to-one relationship '{}'",
            field
          ))),
        }
      })
    };

    self.push_relationship::<T>(field, Cardinality::One, read, write);
    self
  }

  /// Declare a to-many relationship to records of type `T`.
  pub fn to_many<T: Any>(
    mut self,
    name: &str,
    get: fn(&R) -> &Vec<Shared<T>>,
    get_mut: fn(&mut R) -> &mut Vec<Shared<T>>,
  ) -> Self {
    let field = name.to_string();

    let read: ReadRelatedFn = Box::new(move |record: &dyn Any| {
      let record = downcast_record::<R>(record)?;
      Ok(Related::Many(get(record).iter().map(erase).collect()))
    });

    let write: WriteRelatedFn = {
      let field = field.clone();
      Box::new(move |record: &mut dyn Any, related: Related| {
        let record = downcast_record_mut::<R>(record)?;
        match related {
          Related::Many(targets) => {
            *get_mut(record) = targets.into_iter().map(restore::<T>).collect::<Result<_, _>>()?;
            Ok(())
          }
          Related::One(_) => Err(CodecError::invariant(format!(
            "to-one value written to to-many relationship '{}'",
            field
          ))),
        }
      })
    };

    self.push_relationship::<T>(field, Cardinality::Many, read, write);
    self
  }

  fn push_relationship<T: Any>(
    &mut self,
    field: String,
    cardinality: Cardinality,
    read: ReadRelatedFn,
    write: WriteRelatedFn,
  ) {
    self.relationships.push(RelationshipDescriptor {
      wire_name: to_wire_name(&field),
      field,
      cardinality,
      target: TypeId::of::<T>(),
      target_name: std::any::type_name::<T>(),
      read,
      write,
    });
  }
}

/// A type-erased [`ResourceDescriptor`], ready for [`Registry::build`].
///
/// [`Registry::build`]: super::Registry::build
pub struct ResourceSource {
  pub(crate) type_name: String,
  pub(crate) record_type: TypeId,
  pub(crate) record_name: &'static str,
  pub(crate) ids: Vec<IdField>,
  pub(crate) attributes: Vec<AttributeField>,
  pub(crate) relationships: Vec<RelationshipDescriptor>,
  pub(crate) hooks: RecordHooks,
}

impl<R: Any + Default> From<ResourceDescriptor<R>> for ResourceSource {
  fn from(descriptor: ResourceDescriptor<R>) -> Self {
    Self {
      type_name: descriptor.type_name,
      record_type: TypeId::of::<R>(),
      record_name: std::any::type_name::<R>(),
      ids: descriptor.ids,
      attributes: descriptor.attributes,
      relationships: descriptor.relationships,
      hooks: RecordHooks::of::<R>(),
    }
  }
}

fn downcast_record<R: Any>(record: &dyn Any) -> Result<&R, CodecError> {
  record
    .downcast_ref::<R>()
    .ok_or_else(|| CodecError::invariant(format!("expected a {}", std::any::type_name::<R>())))
}

fn downcast_record_mut<R: Any>(record: &mut dyn Any) -> Result<&mut R, CodecError> {
  record
    .downcast_mut::<R>()
    .ok_or_else(|| CodecError::invariant(format!("expected a {}", std::any::type_name::<R>())))
}

fn erase<T: Any>(target: &Shared<T>) -> RecordHandle {
  Rc::clone(target) as RecordHandle
}

fn restore<T: Any>(handle: RecordHandle) -> Result<Shared<T>, CodecError> {
  handle
    .downcast::<RefCell<T>>()
    .map_err(|_| CodecError::invariant(format!("related record is not a {}", std::any::type_name::<T>())))
}

fn value_reader<R: Any, F: Serialize + 'static>(type_name: &str, field: &str, get: fn(&R) -> &F) -> ReadFn {
  let (type_name, field) = (type_name.to_string(), field.to_string());
  Box::new(move |record: &dyn Any| {
    let record = downcast_record::<R>(record)?;
    serde_json::to_value(get(record)).map_err(|source| CodecError::Coercion {
      type_name: type_name.clone(),
      field: field.clone(),
      source,
    })
  })
}

fn value_writer<R: Any, F: DeserializeOwned + 'static>(
  type_name: &str,
  field: &str,
  get_mut: fn(&mut R) -> &mut F,
) -> WriteFn {
  let (type_name, field) = (type_name.to_string(), field.to_string());
  Box::new(move |record: &mut dyn Any, value: &Value| {
    let record = downcast_record_mut::<R>(record)?;
    *get_mut(record) = F::deserialize(value).map_err(|source| CodecError::Coercion {
      type_name: type_name.clone(),
      field: field.clone(),
      source,
    })?;
    Ok(())
  })
}
