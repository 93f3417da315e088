// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod config;
pub mod create;
pub mod lifecycle;
pub mod list;
pub mod locate;
pub mod offers;
pub mod questions;
pub mod share;
pub mod show;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::session::{FileCredentialStore, Session};

/// Everything a command needs to reach the backend.
pub struct Context {
    pub config: Config,
    pub api: Arc<ApiClient>,
}

/// Loads the configuration (from `config_path` when given) and opens the
/// persisted session.
pub fn open_context(config_path: Option<&Path>) -> Result<Context> {
    let config = load_config(config_path)?;
    let store = FileCredentialStore::open(config.credentials_file()?)?;
    let session = Arc::new(Session::new(Arc::new(store)));
    let api = Arc::new(ApiClient::from_config(&config, session)?);
    Ok(Context { config, api })
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
