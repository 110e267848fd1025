use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use rockpack_lib::{PackConfig, PackTarget, Packer};

use crate::output::{OutputFormat, print_json, print_success};

#[derive(Serialize)]
struct PackOutput {
  rock: PathBuf,
}

pub fn cmd_pack(
  target: &str,
  version: Option<&str>,
  tree: Option<PathBuf>,
  out_dir: Option<PathBuf>,
  output: OutputFormat,
) -> Result<()> {
  let mut config = PackConfig::from_env().context("Failed to load configuration")?;
  if let Some(tree) = tree {
    config = config.with_tree(tree);
  }
  if let Some(out_dir) = out_dir {
    config = config.with_out_dir(&out_dir)?;
  }

  let target = PackTarget::parse(target, version);
  debug!(request = ?target, out_dir = %config.out_dir.display(), "resolved pack target");
  let rock = Packer::new(config).pack(&target)?;
  info!(rock = %rock.display(), "pack finished");

  if output.is_json() {
    print_json(&PackOutput { rock })?;
  } else {
    print_success(&format!("Packed: {}", rock.display()));
  }

  Ok(())
}
