//! Mapper and per-call encoding options.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Which record fields are treated as attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeResolutionStrategy {
  /// Only fields declared with `attribute(...)`.
  #[default]
  Explicit,
  /// Reserved. Currently resolves exactly like `Explicit`.
  All,
}

/// Mapper-wide configuration.
///
/// Loadable from JSON with kebab-case keys:
///
/// ```
/// use jsonapi_lib::{AttributeResolutionStrategy, MapperOptions};
///
/// let options = MapperOptions::from_json_str(r#"{"attribute-resolution": "explicit"}"#).unwrap();
/// assert_eq!(options.attribute_resolution, AttributeResolutionStrategy::Explicit);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MapperOptions {
  pub attribute_resolution: AttributeResolutionStrategy,
}

impl MapperOptions {
  pub fn from_json_str(s: &str) -> Result<Self, CodecError> {
    Ok(serde_json::from_str(s)?)
  }
}

/// Options for a single encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
  /// Inline related records that carry attribute values into `included`.
  pub include_related_resources: bool,
}

impl Default for EncodeOptions {
  fn default() -> Self {
    Self {
      include_related_resources: true,
    }
  }
}

impl EncodeOptions {
  /// Emit relationship linkage only; `included` stays empty.
  pub fn without_included() -> Self {
    Self {
      include_related_resources: false,
    }
  }
}
