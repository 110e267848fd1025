mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_info, cmd_pack};
use crate::output::{OutputFormat, print_error};

/// rockpack - Pack Lua rocks from rockspecs or installed packages
#[derive(Parser)]
#[command(name = "rockpack")]
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
  /// Create a rock from a rockspec or an installed package
  Pack {
    /// A `.rockspec` file or `file://` URL, or the name of an installed
    /// package (optionally `name@version`)
    target: String,

    /// Version of the installed package, when it is not part of the target
    version: Option<String>,

    /// Only search this rocks tree
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Directory to write the rock to (default: current directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Show platform and configuration information
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Pack {
      target,
      version,
      tree,
      out_dir,
      output,
    } => cmd_pack(&target, version.as_deref(), tree, out_dir, output),
    Commands::Info { output } => cmd_info(output),
  };

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
