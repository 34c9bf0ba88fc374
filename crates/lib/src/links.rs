//! Link generation for encoded resources.
//!
//! The encoder asks a [`LinkGenerator`] for the `links` of every resource
//! object and relationship it emits. The codec itself has no URL policy:
//! [`NoLinks`] emits nothing, and hosts plug in their own routing.

use crate::document::Links;
use crate::id::ResourceId;

/// Supplies `links` objects during encoding.
///
/// Returning `None` (or an empty map) omits the member.
pub trait LinkGenerator: Send + Sync {
  fn resource_links(&self, resource_type: &str, id: &ResourceId) -> Option<Links> {
    let _ = (resource_type, id);
    None
  }

  fn relationship_links(&self, resource_type: &str, id: &ResourceId, relationship: &str) -> Option<Links> {
    let _ = (resource_type, id, relationship);
    None
  }
}

/// Emits no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl LinkGenerator for NoLinks {}

/// Closures produce resource links only.
impl<F> LinkGenerator for F
where
  F: Fn(&str, &ResourceId) -> Option<Links> + Send + Sync,
{
  fn resource_links(&self, resource_type: &str, id: &ResourceId) -> Option<Links> {
    self(resource_type, id)
  }
}

/// Conventional JSON:API URLs rooted at a base URL:
///
/// - resource: `self` = `{base}/{type}/{id}`
/// - relationship: `self` = `{base}/{type}/{id}/relationships/{name}`,
///   `related` = `{base}/{type}/{id}/{name}`
#[derive(Debug, Clone)]
pub struct UrlLinks {
  base: String,
}

impl UrlLinks {
  pub fn new(base: impl Into<String>) -> Self {
    let base = base.into();
    Self {
      base: base.trim_end_matches('/').to_string(),
    }
  }

  fn resource_url(&self, resource_type: &str, id: &ResourceId) -> String {
    format!("{}/{}/{}", self.base, resource_type, id)
  }
}

impl LinkGenerator for UrlLinks {
  fn resource_links(&self, resource_type: &str, id: &ResourceId) -> Option<Links> {
    Some(Links::from([("self".to_string(), self.resource_url(resource_type, id))]))
  }

  fn relationship_links(&self, resource_type: &str, id: &ResourceId, relationship: &str) -> Option<Links> {
    let resource = self.resource_url(resource_type, id);
    Some(Links::from([
      ("self".to_string(), format!("{}/relationships/{}", resource, relationship)),
      ("related".to_string(), format!("{}/{}", resource, relationship)),
    ]))
  }
}
