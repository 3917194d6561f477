/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Resolves the IAM roles of one user and prints them as a JSON array.
//!
//! Usage: `idp-roles <email>`

use std::process::ExitCode;
use std::sync::Arc;

use idp_roles::{resolve_user_roles, AuthError, Config};
use idp_roles_client::ReqwestTransport;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), "{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AuthError> {
    let email = std::env::args()
        .nth(1)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AuthError::config("usage: idp-roles <email>"))?;

    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let transport = ReqwestTransport::with_timeout(config.request_timeout)?;
    let roles = resolve_user_roles(&config.role_config(&email), Arc::new(transport)).await?;

    let json = serde_json::to_string(&roles)
        .map_err(|e| AuthError::config(format!("failed to encode roles: {e}")))?;
    println!("{json}");
    Ok(())
}
