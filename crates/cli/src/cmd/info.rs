use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use rockpack_lib::{PackConfig, Tree};

use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Serialize)]
struct InfoOutput {
  arch: String,
  lua_version: String,
  trees: Vec<Tree>,
  out_dir: PathBuf,
  scratch_dir: PathBuf,
}

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let config = PackConfig::from_env().context("Failed to load configuration")?;

  if output.is_json() {
    return print_json(&InfoOutput {
      arch: config.arch,
      lua_version: config.lua_version,
      trees: config.trees,
      out_dir: config.out_dir,
      scratch_dir: config.scratch_dir,
    });
  }

  print_info("Configuration");
  print_stat("Arch", &config.arch);
  print_stat("Lua version", &config.lua_version);
  for tree in &config.trees {
    print_stat("Tree", &tree.root().display().to_string());
  }
  print_stat("Output directory", &config.out_dir.display().to_string());
  print_stat("Scratch directory", &config.scratch_dir.display().to_string());

  Ok(())
}
