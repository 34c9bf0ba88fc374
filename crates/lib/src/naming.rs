//! Field name mapping between declared field names and JSON:API member names.
//!
//! Declared names are `lowerCamel` (`firstName`); wire names are
//! `lower-hyphen` (`first-name`). For declared names that pass
//! [`validate_field_name`] the two functions are inverses of each other.

/// Map a `lowerCamel` field name to its `lower-hyphen` wire name.
///
/// ```
/// use jsonapi_lib::naming::to_wire_name;
///
/// assert_eq!(to_wire_name("firstName"), "first-name");
/// assert_eq!(to_wire_name("title"), "title");
/// ```
pub fn to_wire_name(field: &str) -> String {
  let mut wire = String::with_capacity(field.len() + 4);
  for ch in field.chars() {
    if ch.is_ascii_uppercase() {
      if !wire.is_empty() {
        wire.push('-');
      }
      wire.push(ch.to_ascii_lowercase());
    } else {
      wire.push(ch);
    }
  }
  wire
}

/// Map a `lower-hyphen` wire name back to its `lowerCamel` field name.
///
/// ```
/// use jsonapi_lib::naming::to_field_name;
///
/// assert_eq!(to_field_name("first-name"), "firstName");
/// ```
pub fn to_field_name(wire: &str) -> String {
  let mut field = String::with_capacity(wire.len());
  let mut upper_next = false;
  for ch in wire.chars() {
    if ch == '-' {
      upper_next = true;
    } else if upper_next {
      field.push(ch.to_ascii_uppercase());
      upper_next = false;
    } else {
      field.push(ch);
    }
  }
  field
}

/// Check that a declared field name is a `lowerCamel` identifier that maps
/// losslessly onto a wire name.
pub fn validate_field_name(field: &str) -> Result<(), String> {
  let mut chars = field.chars();
  let Some(first) = chars.next() else {
    return Err("field name is empty".to_string());
  };
  if !first.is_ascii_lowercase() {
    return Err("field name must start with a lowercase ASCII letter".to_string());
  }
  if let Some(bad) = field.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
    return Err(format!("character '{}' is not allowed", bad));
  }
  Ok(())
}
