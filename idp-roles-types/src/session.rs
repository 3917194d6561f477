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

//! Login session produced by a successful OIDC code redemption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens and verified identity for one logged-in user.
///
/// Owned by the caller. Only a refresh mutates it after creation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// `None` when the token endpoint did not report a lifetime.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub email: String,
}

impl Session {
    /// Whether the access token has expired at `now`.
    ///
    /// A session without a known expiry is never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
