//! jsonapi-lib: a bidirectional codec between JSON:API documents and
//! in-memory record graphs.
//!
//! Record types are described once in a [`Registry`](registry::Registry)
//! (wire type, id field, attributes, typed relationships). A
//! [`JsonApiMapper`] then:
//!
//! - encodes a record, or a slice of records, into a [`SingleDocument`] or
//!   [`MultiDocument`], inlining related records into `included` once per
//!   `(type, id)` and terminating on cyclic graphs;
//! - decodes a document back into records, sharing one in-memory record per
//!   included `(type, id)` and answering references to resources outside the
//!   document with id-only stubs.
//!
//! Text parsing and emission live on the [`document`] types (`FromStr`,
//! `to_json_string`).

mod decode;
pub mod document;
mod encode;
pub mod error;
pub mod id;
pub mod links;
pub mod mapper;
pub mod naming;
pub mod options;
pub mod registry;
mod util;

pub use document::{Document, MultiDocument, SingleDocument};
pub use encode::resource_identifier;
pub use error::{CodecError, ConfigurationError};
pub use id::{ResourceId, ResourceKey};
pub use links::{LinkGenerator, NoLinks, UrlLinks};
pub use mapper::{EncodeSource, JsonApiMapper};
pub use options::{AttributeResolutionStrategy, EncodeOptions, MapperOptions};
pub use registry::{Registry, ResourceDescriptor, Shared, shared};
