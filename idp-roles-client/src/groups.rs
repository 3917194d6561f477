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

//! Access-group listing: `GET /v1/groups`.

use idp_roles_types::GroupPage;
use url::Url;

use crate::error::ApiError;
use crate::pagination::{walk, PagePolicy};
use crate::IamClient;

/// Page size requested from the groups endpoint.
pub const GROUPS_PAGE_SIZE: u64 = 100;

/// Offset/limit pagination that follows the absolute `last.href` link.
///
/// The groups API returns an absolute link to the tail page on every
/// response; that link is the cursor, not a "next" link.
pub struct GroupPagination;

impl PagePolicy for GroupPagination {
    type Page = GroupPage;

    fn has_more(&self, page: &GroupPage) -> bool {
        page.offset.saturating_add(1).saturating_mul(page.limit) < page.total_count
    }

    fn next_url(&self, page: &GroupPage) -> Option<String> {
        let href = page.last_href();
        (!href.is_empty()).then(|| href.to_string())
    }

    fn merge(&self, aggregate: &mut GroupPage, page: GroupPage) {
        aggregate.offset = page.offset;
        aggregate.first = page.first;
        aggregate.last = page.last;
        aggregate.groups.extend(page.groups);
    }
}

impl IamClient {
    /// List the account's access groups, optionally only those containing
    /// `member_id`.
    ///
    /// Calls `GET {root}/v1/groups?account={account_id}&limit=100[&member={id}]`
    /// and follows pagination. The returned page carries every group in API
    /// order and the metadata of the last page fetched.
    pub async fn get_groups(
        &self,
        access_token: &str,
        member_id: Option<&str>,
    ) -> Result<GroupPage, ApiError> {
        let first_url = self.groups_url(member_id)?;
        walk(
            self.transport(),
            &first_url,
            |url: &str| self.authorized_get(url, access_token),
            &GroupPagination,
            self.max_pages,
        )
        .await
    }

    fn groups_url(&self, member_id: Option<&str>) -> Result<String, ApiError> {
        let limit = GROUPS_PAGE_SIZE.to_string();
        let mut params = vec![
            ("account", self.credentials().account_id.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(member) = member_id.filter(|m| !m.is_empty()) {
            params.push(("member", member));
        }
        let url = Url::parse_with_params(&format!("{}/v1/groups", self.root_url()), &params)?;
        Ok(url.into())
    }
}
