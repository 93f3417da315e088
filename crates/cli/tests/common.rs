// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `ys` with config and credentials isolated in `home`.
pub fn ys(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("ys");
    cmd.env("YS_CONFIG", home.path().join("config.toml"))
        .env("YS_CREDENTIALS", home.path().join("credentials.json"))
        .env_remove("YS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a config pointing every endpoint at an unroutable local port.
pub fn offline_config(home: &TempDir) {
    std::fs::write(
        home.path().join("config.toml"),
        "api_base_url = \"http://127.0.0.1:9/insurance\"\n\
         main_api_base_url = \"http://127.0.0.1:9\"\n\
         ws_base_url = \"ws://127.0.0.1:9\"\n\
         http_timeout_secs = 2\n",
    )
    .unwrap();
}
