use predicates::prelude::*;

use super::common::{ARCH, TestEnv, rock_entries, rock_read};

const PURE_LUA: &str = r#"
rock_manifest = {
  lua = { ["init.lua"] = "5d41402abc4b2a76b9719d911017c592" },
  ["demo-1.0-1.rockspec"] = "7d793037a0760186574b0282f2f435e7",
}
"#;

const NATIVE: &str = r#"
rock_manifest = {
  lib = { ["demo.so"] = "0cc175b9c0f1b6a831c399e269772661" },
}
"#;

#[test]
fn packs_installed_pure_lua_rock() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 'demo'");

  env
    .rockpack_cmd()
    .args(["pack", "demo"])
    .assert()
    .success()
    .stdout(predicate::str::contains("demo-1.0-1.all.rock"));

  let rock = env.out_path().join("demo-1.0-1.all.rock");
  assert_eq!(
    rock_entries(&rock),
    vec!["demo-1.0-1.rockspec", "lua/", "lua/init.lua", "rock_manifest"]
  );
  assert_eq!(rock_read(&rock, "lua/init.lua"), "return 'demo'");
  assert!(env.scratch_is_empty());
}

#[test]
fn native_rock_gets_platform_tag() {
  let env = TestEnv::new();
  let tree = env.system_tree();
  env.install(&tree, "demo", "1.0-1", NATIVE);
  env.write_file("system/lib/lua/5.4/demo.so", "\x7fELF");

  env.rockpack_cmd().args(["pack", "demo", "1.0-1"]).assert().success();

  let rock = env.out_path().join(format!("demo-1.0-1.{}.rock", ARCH));
  assert!(rock_entries(&rock).contains(&"lib/demo.so".to_string()));
}

#[test]
fn composite_name_selects_version() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.install(&tree, "demo", "2.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 2");

  env.rockpack_cmd().args(["pack", "demo@2.0-1"]).assert().success();

  assert!(env.out_path().join("demo-2.0-1.all.rock").is_file());
}

#[test]
fn json_output_reports_rock_path() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 1");

  let out = env.rockpack_cmd().args(["pack", "demo", "-o", "json"]).assert().success();
  let json: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();

  let rock = env.out_path().join("demo-1.0-1.all.rock");
  assert_eq!(json["rock"], rock.display().to_string());
}

#[test]
fn several_versions_need_a_version() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.install(&tree, "demo", "2.0-1", PURE_LUA);

  env
    .rockpack_cmd()
    .args(["pack", "demo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("please specify which version"))
    .stderr(predicate::str::contains("1.0-1, 2.0-1"));
}

#[test]
fn version_without_revision_is_rejected() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);

  env
    .rockpack_cmd()
    .args(["pack", "demo", "1.0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("version-revision format"));
}

#[test]
fn missing_manifest_is_an_incompatible_tree() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  let prefix = env.install(&tree, "demo", "1.0-1", PURE_LUA);
  std::fs::remove_file(prefix.join("rock_manifest")).unwrap();

  env
    .rockpack_cmd()
    .args(["pack", "demo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a rocks tree compatible"));
  assert!(env.scratch_is_empty());
}

#[test]
fn tree_flag_restricts_search() {
  let env = TestEnv::new();
  let user = env.user_tree();
  env.install(&user, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&user, "init.lua", "return 1");

  env
    .rockpack_cmd()
    .args(["pack", "demo", "--tree"])
    .arg(env.system_tree())
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not seem to be an installed rock"));
}

#[test]
fn out_dir_flag_overrides_environment() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 1");
  let elsewhere = env.temp.path().join("elsewhere");

  env
    .rockpack_cmd()
    .args(["pack", "demo", "--out-dir"])
    .arg(&elsewhere)
    .assert()
    .success();

  assert!(elsewhere.join("demo-1.0-1.all.rock").is_file());
}

#[test]
fn packs_source_rock_from_rockspec() {
  let env = TestEnv::new();
  let rockspec = env.write_file(
    "specs/foo-2.0-1.rockspec",
    "package = 'foo'\nversion = '2.0-1'\nsource = { url = 'src' }\n",
  );
  env.write_file("specs/src/foo.lua", "return 'foo'");

  env
    .rockpack_cmd()
    .arg("pack")
    .arg(&rockspec)
    .assert()
    .success()
    .stdout(predicate::str::contains("foo-2.0-1.src.rock"));

  let rock = env.out_path().join("foo-2.0-1.src.rock");
  assert_eq!(rock_entries(&rock), vec!["foo-2.0-1.rockspec", "src/", "src/foo.lua"]);
  assert!(env.scratch_is_empty());
}

#[test]
fn verbose_logs_the_packed_rock() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 1");

  env
    .rockpack_cmd()
    .args(["--verbose", "pack", "demo"])
    .assert()
    .success()
    .stderr(predicate::str::contains("resolved pack target"))
    .stderr(predicate::str::contains("pack finished"))
    .stderr(predicate::str::contains("demo-1.0-1.all.rock"));
}

#[test]
fn quiet_run_keeps_stderr_clean() {
  let env = TestEnv::new();
  let tree = env.user_tree();
  env.install(&tree, "demo", "1.0-1", PURE_LUA);
  env.deploy_lua(&tree, "init.lua", "return 1");

  env
    .rockpack_cmd()
    .args(["pack", "demo"])
    .assert()
    .success()
    .stderr(predicate::str::contains("pack finished").not());
}
