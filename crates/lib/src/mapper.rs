//! The public codec surface.

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::decode::Decoder;
use crate::document::{Document, MultiDocument, SingleDocument};
use crate::encode::Encoder;
use crate::error::CodecError;
use crate::links::{LinkGenerator, NoLinks};
use crate::options::{AttributeResolutionStrategy, EncodeOptions, MapperOptions};
use crate::registry::Registry;

/// What to encode: one record or a sequence of records.
#[derive(Debug, Clone, Copy)]
pub enum EncodeSource<'s, R> {
  One(&'s R),
  Many(&'s [R]),
}

/// Converts between registered records and JSON:API documents.
///
/// A mapper is cheap to clone and holds no per-call state; every encode and
/// decode builds its own index from scratch. The registry and link generator
/// are shared, so mappers can be handed to other threads.
#[derive(Clone)]
pub struct JsonApiMapper {
  registry: Arc<Registry>,
  links: Arc<dyn LinkGenerator>,
  options: MapperOptions,
}

impl JsonApiMapper {
  pub fn new(registry: Arc<Registry>) -> Self {
    Self::with_options(registry, Arc::new(NoLinks), MapperOptions::default())
  }

  pub fn with_options(registry: Arc<Registry>, links: Arc<dyn LinkGenerator>, options: MapperOptions) -> Self {
    if options.attribute_resolution == AttributeResolutionStrategy::All {
      warn!("attribute resolution strategy 'all' is not supported yet, resolving explicitly declared attributes only");
    }
    debug!(resources = registry.len(), ?options, "created mapper");
    Self {
      registry,
      links,
      options,
    }
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  pub fn options(&self) -> &MapperOptions {
    &self.options
  }

  /// Encode one record with related resources included.
  pub fn encode<R: Any>(&self, source: &R) -> Result<SingleDocument, CodecError> {
    self.encode_with(source, EncodeOptions::default())
  }

  pub fn encode_with<R: Any>(&self, source: &R, options: EncodeOptions) -> Result<SingleDocument, CodecError> {
    Encoder::new(&self.registry, self.links.as_ref(), options).encode_single(source)
  }

  /// Encode a sequence of records with related resources included.
  pub fn encode_many<R: Any>(&self, sources: &[R]) -> Result<MultiDocument, CodecError> {
    self.encode_many_with(sources, EncodeOptions::default())
  }

  pub fn encode_many_with<R: Any>(&self, sources: &[R], options: EncodeOptions) -> Result<MultiDocument, CodecError> {
    Encoder::new(&self.registry, self.links.as_ref(), options).encode_many(sources)
  }

  /// Encode either source shape into the matching document variant.
  pub fn encode_document<R: Any>(
    &self,
    source: EncodeSource<'_, R>,
    options: EncodeOptions,
  ) -> Result<Document, CodecError> {
    match source {
      EncodeSource::One(record) => self.encode_with(record, options).map(Document::Single),
      EncodeSource::Many(records) => self.encode_many_with(records, options).map(Document::Multi),
    }
  }

  /// Decode the primary resource of `document` into an `R`.
  ///
  /// Returns `None` when the document's `data` is `null`.
  pub fn decode<R: Any>(&self, document: &SingleDocument) -> Result<Option<R>, CodecError> {
    Decoder::new(&self.registry).decode_single(document)
  }

  pub fn decode_many<R: Any>(&self, document: &MultiDocument) -> Result<Vec<R>, CodecError> {
    Decoder::new(&self.registry).decode_many(document)
  }

  /// Decode either document shape into a sequence of records.
  pub fn decode_document<R: Any>(&self, document: &Document) -> Result<Vec<R>, CodecError> {
    match document {
      Document::Single(single) => Ok(self.decode::<R>(single)?.into_iter().collect()),
      Document::Multi(multi) => self.decode_many(multi),
    }
  }
}

impl std::fmt::Debug for JsonApiMapper {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JsonApiMapper")
      .field("registry", &self.registry)
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}
