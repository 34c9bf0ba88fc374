//! Fmt command implementation.
//!
//! Parses a document and writes it back in minimal form: empty members and
//! null attribute values are dropped, member order is preserved.

use std::path::Path;

use anyhow::Result;

use super::load_document;

pub fn cmd_fmt(input: &Path, pretty: bool) -> Result<()> {
  let document = load_document(input)?;

  let text = if pretty {
    document.to_json_pretty()?
  } else {
    document.to_json_string()?
  };
  println!("{}", text);

  Ok(())
}
