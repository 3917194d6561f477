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

//! Configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use idp_roles_client::DEFAULT_MAX_PAGES;

use crate::error::AuthError;

const DEFAULT_SCOPES: &str = "openid email profile";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// IAM host serving `/identity/token` and `/v1/groups`.
    pub iam_host: String,
    pub iam_account_id: String,
    pub iam_api_key: String,
    /// UAM host serving the account user directory.
    pub uam_host: String,
    /// Per-request timeout for every outbound call.
    pub request_timeout: Duration,
    /// Pagination safety bound.
    pub max_pages: usize,
    /// OIDC configuration. `None` if `OIDC_CLIENT_ID` is unset or empty.
    pub oidc: Option<OidcConfig>,
}

/// OpenID Connect relying-party configuration.
///
/// Endpoints left unset are resolved from the issuer's discovery document.
#[derive(Clone)]
pub struct OidcConfig {
    pub client_id: String,
    pub client_secret: String,
    pub issuer: String,
    pub token_url: Option<String>,
    pub auth_url: Option<String>,
    pub jwks_url: Option<String>,
    pub scopes: String,
}

/// Input of one role-resolution run.
#[derive(Clone)]
pub struct RoleConfig {
    pub iam_host: String,
    pub account_id: String,
    pub api_key: String,
    pub uam_host: String,
    pub email: String,
    pub max_pages: usize,
}

impl RoleConfig {
    pub fn new(iam_host: &str, account_id: &str, api_key: &str, uam_host: &str, email: &str) -> Self {
        Self {
            iam_host: iam_host.to_string(),
            account_id: account_id.to_string(),
            api_key: api_key.to_string(),
            uam_host: uam_host.to_string(),
            email: email.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `IAM_HOST`, `IAM_ACCOUNT_ID`, `IAM_API_KEY`, `UAM_HOST`
    ///
    /// # Optional
    /// - `REQUEST_TIMEOUT_SECS` (default: `"30"`)
    /// - `MAX_PAGES` (default: `"1000"`)
    /// - OIDC: `OIDC_CLIENT_ID`, `OIDC_CLIENT_SECRET`, `OIDC_ISSUER`,
    ///   `OIDC_TOKEN_URL`, `OIDC_AUTH_URL`, `OIDC_JWKS_URL`, `OIDC_SCOPES`
    pub fn from_env() -> Result<Self, AuthError> {
        let iam_host = required("IAM_HOST")?;
        let iam_account_id = required("IAM_ACCOUNT_ID")?;
        let iam_api_key = required("IAM_API_KEY")?;
        let uam_host = required("UAM_HOST")?;

        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| AuthError::config("REQUEST_TIMEOUT_SECS must be a valid integer"))?;
        let max_pages = env::var("MAX_PAGES")
            .unwrap_or_else(|_| DEFAULT_MAX_PAGES.to_string())
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| AuthError::config("MAX_PAGES must be a positive integer"))?;

        let oidc = optional("OIDC_CLIENT_ID")
            .map(|client_id| {
                Ok::<_, AuthError>(OidcConfig {
                    client_id,
                    client_secret: optional("OIDC_CLIENT_SECRET").ok_or_else(|| {
                        AuthError::config("OIDC_CLIENT_SECRET required when OIDC_CLIENT_ID is set")
                    })?,
                    issuer: optional("OIDC_ISSUER").ok_or_else(|| {
                        AuthError::config("OIDC_ISSUER required when OIDC_CLIENT_ID is set")
                    })?,
                    token_url: optional("OIDC_TOKEN_URL"),
                    auth_url: optional("OIDC_AUTH_URL"),
                    jwks_url: optional("OIDC_JWKS_URL"),
                    scopes: optional("OIDC_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.to_string()),
                })
            })
            .transpose()?;

        Ok(Self {
            iam_host,
            iam_account_id,
            iam_api_key,
            uam_host,
            request_timeout,
            max_pages,
            oidc,
        })
    }

    /// Role-resolution input for the user identified by `email`.
    pub fn role_config(&self, email: &str) -> RoleConfig {
        RoleConfig::new(
            &self.iam_host,
            &self.iam_account_id,
            &self.iam_api_key,
            &self.uam_host,
            email,
        )
        .with_max_pages(self.max_pages)
    }
}

fn required(name: &str) -> Result<String, AuthError> {
    optional(name).ok_or_else(|| AuthError::config(format!("{name} environment variable is required")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("iam_host", &self.iam_host)
            .field("iam_account_id", &self.iam_account_id)
            .field("iam_api_key", &"<redacted>")
            .field("uam_host", &self.uam_host)
            .field("request_timeout", &self.request_timeout)
            .field("max_pages", &self.max_pages)
            .field("oidc", &self.oidc)
            .finish()
    }
}

impl fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_url", &self.token_url)
            .field("auth_url", &self.auth_url)
            .field("jwks_url", &self.jwks_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl fmt::Debug for RoleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleConfig")
            .field("iam_host", &self.iam_host)
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .field("uam_host", &self.uam_host)
            .field("email", &self.email)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}
