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

//! UAM user-directory payloads (`GET /v1/accounts/{account_id}/users`).

use serde::{Deserialize, Serialize};

/// Identity block nested in a user's metadata.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub realmid: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub username: String,
}

/// A link from the user to an external system (e.g. `UAA`, `IMS`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserLinkage {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserMetadata {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub verified_at: String,
    #[serde(default)]
    pub identity: UserIdentity,
    #[serde(default)]
    pub linkages: Vec<UserLinkage>,
}

/// The account-scoped user record.
///
/// `iam_id` is the stable identifier used to filter group membership.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserEntity {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// The directory API spells this field `sate`; both spellings are accepted.
    #[serde(default, rename = "state", alias = "sate")]
    pub state: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phonenumber: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub iam_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserResource {
    #[serde(default)]
    pub metadata: UserMetadata,
    #[serde(default)]
    pub entity: UserEntity,
}

/// One page of the user directory.
///
/// `next_url` is root-relative (e.g. `/v1/accounts/abc/users?_start=...`).
/// An empty string means there are no more pages.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub first_url: String,
    #[serde(default)]
    pub next_url: String,
    #[serde(default)]
    pub resources: Vec<UserResource>,
}

impl UserPage {
    pub fn has_next(&self) -> bool {
        !self.next_url.is_empty()
    }
}
