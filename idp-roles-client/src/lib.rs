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

//! REST client for IAM access groups and the UAM user directory.
//!
//! The client exchanges an account API key for an access token, then walks
//! the paginated user-directory and access-group listings with it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use idp_roles_client::{Credentials, IamClient, ReqwestTransport};
//!
//! # async fn example() -> Result<(), idp_roles_client::ApiError> {
//! let client = IamClient::new(
//!     Credentials::new("iam.cloud.example.com", "acct-123", "api-key"),
//!     Arc::new(ReqwestTransport::default()),
//! );
//!
//! let tokens = client.exchange_api_key().await?;
//! let users = client.get_users(&tokens.access_token, "user-management.cloud.example.com").await?;
//! let groups = client.get_groups(&tokens.access_token, Some("IBMid-1234")).await?;
//! println!("{} users, {} groups", users.resources.len(), groups.groups.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod groups;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod pagination;
pub mod token;
pub mod transport;
pub mod users;

pub use error::ApiError;
pub use idp_roles_types;
pub use token::TokenSet;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
pub use users::map_emails_to_iam_ids;

use std::sync::Arc;

/// Default upper bound on the number of pages fetched by a single walk.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Account credentials for the IAM token endpoint.
#[derive(Clone)]
pub struct Credentials {
    /// IAM host name, e.g. `"iam.cloud.example.com"`.
    pub host: String,
    pub account_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(host: &str, account_id: &str, api_key: &str) -> Self {
        Self {
            host: host.to_string(),
            account_id: account_id.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A typed client for the IAM and UAM APIs of one account.
///
/// Holds no tokens: every authorized call takes the access token explicitly,
/// so a client never leaks credentials between pipeline runs.
#[derive(Clone)]
pub struct IamClient {
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
    max_pages: usize,
}

impl IamClient {
    pub fn new(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials,
            transport,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Override the pagination safety bound (minimum 1).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `https://{iam_host}`.
    pub fn root_url(&self) -> String {
        transport::root_url(&self.credentials.host)
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    /// Build an authorized GET request for a directory or group endpoint.
    ///
    /// The upstream APIs expect the raw access token in `Authorization`,
    /// without a `Bearer` prefix.
    pub fn authorized_get(&self, url: &str, access_token: &str) -> HttpRequest {
        HttpRequest::get(url)
            .header("User-Agent", transport::USER_AGENT)
            .header("Accept", "application/json")
            .header("Authorization", access_token)
    }
}
