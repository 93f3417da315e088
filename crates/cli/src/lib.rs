// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ysrs - client library for the `ys` roadside service request tool.
//!
//! An insurance agency creates tow, crane, road-assistance and moving
//! requests, follows provider offers live and collects customer locations
//! by SMS. This crate holds everything behind the `ys` binary.
//!
//! # Main Components
//!
//! - [`ApiClient`] - REST client with single-flight credential refresh
//! - [`Session`] - persisted credential pair and agency name
//! - [`RequestController`] - one request's view, driven by snapshots and pushes
//! - [`LocationShareHandshake`] - agency side of the SMS location share
//! - [`channel`] - reconnecting push channels keyed by identity
//! - [`Config`] - endpoints, reconnect delays and timeouts
//!
//! # Following a request
//!
//! ```rust,ignore
//! use ysrs::{ApiClient, Config, RequestController, Session};
//!
//! let config = Config::load_default()?;
//! let api = Arc::new(ApiClient::from_config(&config, Arc::new(Session::in_memory()))?);
//! api.login("ops@agency.test", "secret").await?;
//!
//! let mut controller = RequestController::new(api, 42);
//! controller.refresh().await?;
//! for offer in controller.offers().ranked() {
//!     println!("{} {}", offer.id, offer.estimated_price);
//! }
//! ```

pub mod channel;
mod cli;
mod commands;
pub mod config;
pub mod controller;
pub mod customer;
mod display;
mod env;
pub mod error;
pub mod http;
pub mod location_share;
pub mod session;

pub use cli::{Cli, Command, ConfigCommand, CreateArgs, OutputFormat};
pub use config::Config;
pub use controller::RequestController;
pub use error::{Error, Result};
pub use http::{ApiClient, ListFilter};
pub use location_share::LocationShareHandshake;
pub use session::Session;

use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;

use commands::locate::WaitMode;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Login { email, password } => commands::auth::login(config, &email, &password).await,
        Command::Logout => commands::auth::logout(config),
        Command::Config(cmd) => commands::config::run(cmd, config),
        Command::List {
            status,
            page,
            page_size,
            output,
        } => {
            let filter = ListFilter {
                status,
                page,
                page_size,
            };
            commands::list::run(config, filter, output).await
        }
        Command::Show { id, output } => commands::show::run(config, id, output).await,
        Command::Create(args) => commands::create::run(config, args).await,
        Command::Cancel { id } => commands::lifecycle::cancel(config, id).await,
        Command::Offers { id, output } => commands::offers::run(config, id, output).await,
        Command::Accept { id, offer_id } => commands::lifecycle::accept(config, id, offer_id).await,
        Command::PayLink { id } => commands::lifecycle::pay_link(config, id).await,
        Command::Watch { id, output } => commands::watch::run(config, id, output).await,
        Command::Locate {
            phone,
            poll,
            interval,
            output,
        } => {
            let mode = if poll {
                WaitMode::Poll(Duration::from_secs(interval.max(1)))
            } else {
                WaitMode::Push
            };
            commands::locate::run(config, &phone, mode, output).await
        }
        Command::Share { token, lat, lng } => commands::share::run(config, &token, lat, lng).await,
        Command::Questions { output } => commands::questions::run(config, output).await,
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "ys", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
