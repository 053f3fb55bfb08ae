#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn t2press_cmd() -> Command {
    let mut cmd = Command::cargo_bin("t2press").unwrap();
    cmd.env_remove("NOTION_TOKEN");
    cmd.env_remove("NOTION_DATABASE_ID");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a minimal config.toml into `root`
pub fn write_config(root: &Path, extra: &str) {
    fs::write(
        root.join("config.toml"),
        format!("site_name = \"Test Site\"\n{}", extra),
    )
    .unwrap();
}
