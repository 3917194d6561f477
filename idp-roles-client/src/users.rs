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

//! UAM user directory: `GET /v1/accounts/{account_id}/users`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use idp_roles_types::UserPage;

use crate::error::ApiError;
use crate::pagination::{walk, PagePolicy};
use crate::transport::root_url;
use crate::IamClient;

/// Cursor pagination over the root-relative `next_url` field.
pub struct UserPagination {
    root: String,
}

impl UserPagination {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl PagePolicy for UserPagination {
    type Page = UserPage;

    fn has_more(&self, page: &UserPage) -> bool {
        page.has_next()
    }

    fn next_url(&self, page: &UserPage) -> Option<String> {
        let next = page.next_url.as_str();
        if next.is_empty() {
            None
        } else if next.starts_with("https://") || next.starts_with("http://") {
            Some(next.to_string())
        } else {
            Some(format!("{}{}", self.root, next))
        }
    }

    fn merge(&self, aggregate: &mut UserPage, page: UserPage) {
        aggregate.first_url = page.first_url;
        aggregate.next_url = page.next_url;
        aggregate.resources.extend(page.resources);
    }
}

impl IamClient {
    /// Fetch the whole user directory of the account from `uam_host`.
    ///
    /// The directory lives on a different host than the IAM token and group
    /// endpoints, so the host is passed explicitly on every call.
    pub async fn get_users(&self, access_token: &str, uam_host: &str) -> Result<UserPage, ApiError> {
        let root = root_url(uam_host);
        let first_url = format!("{root}/v1/accounts/{}/users", self.credentials().account_id);
        walk(
            self.transport(),
            &first_url,
            |url: &str| self.authorized_get(url, access_token),
            &UserPagination::new(root),
            self.max_pages,
        )
        .await
    }
}

/// Map lower-cased email → `iam_id` over every user in `users`.
///
/// When the same email appears more than once the first record wins.
/// Records without an email or `iam_id` are skipped.
pub fn map_emails_to_iam_ids(users: &UserPage) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(users.resources.len());
    for resource in &users.resources {
        let entity = &resource.entity;
        if entity.email.is_empty() || entity.iam_id.is_empty() {
            continue;
        }
        match map.entry(entity.email.to_lowercase()) {
            Entry::Vacant(slot) => {
                slot.insert(entity.iam_id.clone());
            }
            Entry::Occupied(existing) => {
                if existing.get() != &entity.iam_id {
                    tracing::warn!(
                        email = %existing.key(),
                        kept = %existing.get(),
                        ignored = %entity.iam_id,
                        "duplicate email in user directory"
                    );
                }
            }
        }
    }
    map
}
