//! Check command implementation.
//!
//! Parses a document, reports its shape, and verifies that no `(type, id)`
//! pair appears twice across primary data and included resources.

use std::path::Path;

use anyhow::{Result, bail};
use jsonapi_lib::Document;
use jsonapi_lib::document::LinkageReport;
use serde::Serialize;

use super::{input_name, load_document};
use crate::output::{print_info, print_json, print_stat, print_success, print_warning, symbols};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
  input: String,
  shape: &'static str,
  primary: usize,
  included: usize,
  errors: usize,
  valid: bool,
  linkage: &'a LinkageReport,
}

impl<'a> CheckReport<'a> {
  fn new(input: &Path, document: &Document, linkage: &'a LinkageReport) -> Self {
    Self {
      input: input_name(input),
      shape: if document.is_multi() { "multi" } else { "single" },
      primary: document.primary().len(),
      included: document.included().len(),
      errors: document.errors().len(),
      valid: linkage.is_valid(),
      linkage,
    }
  }
}

pub fn cmd_check(input: &Path, json: bool, verbose: bool) -> Result<()> {
  let document = load_document(input)?;
  let linkage = document.linkage();
  let report = CheckReport::new(input, &document, &linkage);

  if json {
    print_json(&report)?;
  } else {
    print_human_report(&report, verbose);
  }

  if !linkage.is_valid() {
    bail!(
      "{} resource(s) appear more than once: {}",
      linkage.duplicates.len(),
      linkage
        .duplicates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
    );
  }

  Ok(())
}

fn print_human_report(report: &CheckReport<'_>, verbose: bool) {
  if report.valid {
    print_success(&format!("{}: {} document", report.input, report.shape));
  } else {
    print_warning(&format!("{}: {} document with duplicate resources", report.input, report.shape));
  }

  print_stat("Primary", &report.primary.to_string());
  print_stat("Included", &report.included.to_string());
  if report.errors > 0 {
    print_stat("Errors", &report.errors.to_string());
  }
  print_stat("External references", &report.linkage.external.len().to_string());
  if report.linkage.missing_ids > 0 {
    print_stat("Resources without id", &report.linkage.missing_ids.to_string());
  }

  if verbose && !report.linkage.external.is_empty() {
    println!();
    print_info("External references:");
    for key in &report.linkage.external {
      println!("  {} {}", symbols::ARROW, key);
    }
  }

  for key in &report.linkage.duplicates {
    println!("  {} {}", symbols::ERROR, key);
  }
}
