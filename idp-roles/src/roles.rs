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

//! Role resolution: maps a user's email to the names of the IAM access
//! groups they belong to.

use std::sync::Arc;

use idp_roles_client::{map_emails_to_iam_ids, Credentials, HttpTransport, IamClient};

use crate::config::RoleConfig;
use crate::error::AuthError;

/// Role reported for a user who belongs to no access group.
pub const UNKNOWN_ROLE: &str = "unknown";

/// Resolve the access-group names of `config.email`.
///
/// Exchanges the API key, loads the user directory from the UAM host, finds
/// the user's `iam_id` (email match is case-insensitive) and lists the groups
/// it is a member of, in API order. A user without groups gets
/// `["unknown"]`; a user missing from the directory is an error.
pub async fn resolve_user_roles(
    config: &RoleConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Vec<String>, AuthError> {
    let client = IamClient::new(
        Credentials::new(&config.iam_host, &config.account_id, &config.api_key),
        transport,
    )
    .with_max_pages(config.max_pages);

    let tokens = client.exchange_api_key().await?;
    let users = client.get_users(&tokens.access_token, &config.uam_host).await?;
    let iam_ids = map_emails_to_iam_ids(&users);

    let iam_id = iam_ids
        .get(&config.email.to_lowercase())
        .ok_or_else(|| AuthError::IdentifierNotFound(config.email.clone()))?;

    let groups = client.get_groups(&tokens.access_token, Some(iam_id.as_str())).await?;
    let roles = if groups.groups.is_empty() {
        vec![UNKNOWN_ROLE.to_string()]
    } else {
        groups.group_names()
    };

    tracing::info!(email = %config.email, ?roles, "resolved IAM roles");
    Ok(roles)
}
