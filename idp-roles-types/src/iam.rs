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

//! IAM token endpoint and access-group listing payloads.

use serde::{Deserialize, Serialize};

/// Response body of `POST https://{iam_host}/identity/token`.
///
/// Both `expiration` and `expires_in` are kept exactly as the server sent
/// them. Neither is converted into an instant here; which one is
/// authoritative has not been calibrated against the live API.
///
/// # Example payload
///
/// ```json
/// {
///   "access_token": "eyJraWQiOi...",
///   "refresh_token": "OKDu7...",
///   "token_type": "Bearer",
///   "expires_in": 3600,
///   "expiration": 1707004800,
///   "scope": "ibm openid"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct IamTokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Opaque integer as returned by the server.
    #[serde(default)]
    pub expiration: i64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

/// A single access group.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub href: String,
}

/// `{ "href": "..." }` link object used for the `first` / `last` page links.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PageLink {
    #[serde(default)]
    pub href: String,
}

/// One page of `GET /v1/groups`.
///
/// `offset` and `limit` describe the page that was just fetched, not the
/// aggregate. `last.href` is an absolute URL.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GroupPage {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<PageLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<PageLink>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl GroupPage {
    /// `first.href`, or `""` when the link is absent.
    pub fn first_href(&self) -> &str {
        self.first.as_ref().map(|l| l.href.as_str()).unwrap_or("")
    }

    /// `last.href`, or `""` when the link is absent.
    pub fn last_href(&self) -> &str {
        self.last.as_ref().map(|l| l.href.as_str()).unwrap_or("")
    }

    /// Names of every group on this page, in API order.
    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUPS_BODY: &str = r#"{
        "last": {"href": "https://iam.example.com/v1/groups?offset=0&limit=100&account=acct&member=IBMid-1"},
        "total_count": 1,
        "limit": 100,
        "groups": [{
            "href": "https://iam.example.com/v1/groups/AccessGroupId-1",
            "description": "Editor group",
            "name": "dev-editor",
            "id": "AccessGroupId-1"
        }],
        "offset": 0,
        "first": {"href": "https://iam.example.com/v1/groups?limit=100&account=acct&member=IBMid-1"}
    }"#;

    #[test]
    fn group_page_decodes_upstream_shape() {
        let page: GroupPage = serde_json::from_str(GROUPS_BODY).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);
        assert_eq!(page.groups.len(), 1);
        assert_eq!(page.groups[0].name, "dev-editor");
        assert!(page.last_href().contains("offset=0"));
        assert!(page.first_href().starts_with("https://iam.example.com/v1/groups"));
    }

    #[test]
    fn missing_links_read_as_empty() {
        let page: GroupPage =
            serde_json::from_str(r#"{"offset":0,"limit":100,"total_count":0,"groups":[]}"#)
                .unwrap();
        assert_eq!(page.first_href(), "");
        assert_eq!(page.last_href(), "");
        assert!(page.group_names().is_empty());
    }

    #[test]
    fn group_survives_json_round_trip() {
        let group = Group {
            id: "AccessGroupId-7".to_string(),
            name: "ops-viewer".to_string(),
            description: "Read-only operations".to_string(),
            href: "https://iam.example.com/v1/groups/AccessGroupId-7".to_string(),
        };
        let json = serde_json::to_string(&group).unwrap();
        let back: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn token_response_keeps_both_expiry_fields() {
        let body = r#"{"access_token":"at","refresh_token":"rt","expiration":200,
                       "token_type":"Bearer","expires_in":100,"scope":"profile email"}"#;
        let token: IamTokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.refresh_token, "rt");
        assert_eq!(token.expiration, 200);
        assert_eq!(token.expires_in, 100);
    }

    #[test]
    fn token_response_tolerates_missing_numbers() {
        let token: IamTokenResponse = serde_json::from_str(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(token.expiration, 0);
        assert_eq!(token.expires_in, 0);
        assert!(token.refresh_token.is_empty());
    }
}
