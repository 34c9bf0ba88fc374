mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::print_error;

/// jsonapi - Inspect and normalize JSON:API documents
#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse a document and report its shape and resource linkage
  Check {
    /// Path to the document, or '-' for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Re-emit a document in minimal form
  Fmt {
    /// Path to the document, or '-' for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Indent the output
    #[arg(long)]
    pretty: bool,
  },
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "jsonapi_lib=debug,jsonapi=debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Check { input, json } => cmd::cmd_check(&input, json, cli.verbose),
    Commands::Fmt { input, pretty } => cmd::cmd_fmt(&input, pretty),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
