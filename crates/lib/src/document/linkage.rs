//! Document-level identity checks.
//!
//! Within one document every `(type, id)` pair appears at most once across
//! primary data and `included`. Relationship identifiers that point at no
//! resource in the document are external references; they are legal, and the
//! decoder answers them with stubs.

use std::collections::HashSet;

use serde::Serialize;

use super::types::{Document, MultiDocument, ResourceObject, SingleDocument};
use crate::id::ResourceKey;

/// Result of [`Document::linkage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkageReport {
  /// Pairs that occur more than once across `data` and `included`.
  pub duplicates: Vec<ResourceKey>,
  /// Relationship targets with no resource object in the document.
  pub external: Vec<ResourceKey>,
  /// Resources (primary or included) without an id.
  pub missing_ids: usize,
}

impl LinkageReport {
  /// A document is well-formed iff no `(type, id)` pair repeats.
  pub fn is_valid(&self) -> bool {
    self.duplicates.is_empty()
  }
}

fn check<'a>(resources: impl Iterator<Item = &'a ResourceObject> + Clone) -> LinkageReport {
  let mut report = LinkageReport::default();
  let mut present = HashSet::new();

  for resource in resources.clone() {
    match resource.key() {
      Some(key) => {
        if !present.insert(key.clone()) && !report.duplicates.contains(&key) {
          report.duplicates.push(key);
        }
      }
      None => report.missing_ids += 1,
    }
  }

  let mut seen_external = HashSet::new();
  for resource in resources {
    for relationship in resource.relationships.values() {
      for key in relationship.identifiers().into_iter().filter_map(|i| i.key()) {
        if !present.contains(&key) && seen_external.insert(key.clone()) {
          report.external.push(key);
        }
      }
    }
  }

  report
}

impl SingleDocument {
  pub fn linkage(&self) -> LinkageReport {
    check(self.data.iter().chain(self.included.iter()))
  }
}

impl MultiDocument {
  pub fn linkage(&self) -> LinkageReport {
    check(self.data.iter().chain(self.included.iter()))
  }
}

impl Document {
  pub fn linkage(&self) -> LinkageReport {
    match self {
      Document::Single(doc) => doc.linkage(),
      Document::Multi(doc) => doc.linkage(),
    }
  }
}
