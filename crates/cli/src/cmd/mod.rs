mod check;
mod fmt;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use jsonapi_lib::Document;
use tracing::debug;

pub use check::cmd_check;
pub use fmt::cmd_fmt;

const STDIN: &str = "-";

/// Human-readable name of an input path.
fn input_name(path: &Path) -> String {
  if path.as_os_str() == STDIN {
    "<stdin>".to_string()
  } else {
    path.display().to_string()
  }
}

/// Read and parse a document from a file, or from stdin for `-`.
fn load_document(path: &Path) -> Result<Document> {
  let name = input_name(path);
  let text = if path.as_os_str() == STDIN {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .context("Failed to read document from stdin")?;
    buf
  } else {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", name))?
  };

  debug!(input = %name, bytes = text.len(), "parsing document");
  text.parse().with_context(|| format!("Failed to parse {}", name))
}
