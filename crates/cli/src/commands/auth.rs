// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::error::Result;
use crate::http::ApiClient;

use super::open_context;

pub async fn login(config: Option<&Path>, email: &str, password: &str) -> Result<()> {
    let ctx = open_context(config)?;
    login_impl(&ctx.api, email, password).await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn login_impl(api: &ApiClient, email: &str, password: &str) -> Result<()> {
    let response = api.login(email.trim(), password).await?;
    println!("Logged in as {}", response.company.name);
    Ok(())
}

pub fn logout(config: Option<&Path>) -> Result<()> {
    let ctx = open_context(config)?;
    logout_impl(&ctx.api)
}

pub(crate) fn logout_impl(api: &ApiClient) -> Result<()> {
    let was_logged_in = api.session().is_logged_in()?;
    api.logout()?;
    if was_logged_in {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
