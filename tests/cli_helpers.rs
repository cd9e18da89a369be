#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn config_home(home: &TempDir) -> PathBuf {
    home.path().join(".config")
}

/// Command isolated from the user's config and environment
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("finreport"));
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", config_home(home));
    cmd.env_remove("FINREPORT_DB");
    cmd.env_remove("FINREPORT_OUTPUT");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_stdout(home: &TempDir, args: &[&str]) -> Result<String> {
    let output = run_cmd(home, args)?;
    Ok(String::from_utf8(output.stdout)?)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let stdout = run_cmd_stdout(home, args)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Create a sample warehouse inside the temp home and return its path
pub fn init_warehouse(home: &TempDir) -> Result<PathBuf> {
    let db = home.path().join("warehouse.db");
    run_cmd(home, &["init-db", "--db", &path_arg(&db)])?;
    Ok(db)
}
