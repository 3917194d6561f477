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

//! Generic page walker.
//!
//! The walker fetches the first page unconditionally, then keeps following
//! the cursor while the policy reports more data. An empty cursor always
//! stops the walk, even if the counts claim more items remain.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::transport::{fetch_json, HttpRequest, HttpTransport};

/// How one endpoint signals and locates further pages.
pub trait PagePolicy {
    type Page: DeserializeOwned;

    /// Whether `page` reports that more items remain.
    fn has_more(&self, page: &Self::Page) -> bool;

    /// Fetchable URL of the next page, or `None` when the cursor is empty.
    fn next_url(&self, page: &Self::Page) -> Option<String>;

    /// Fold a freshly fetched page into the aggregate, including its
    /// pagination metadata.
    fn merge(&self, aggregate: &mut Self::Page, page: Self::Page);
}

/// Walk every page starting at `first_url`.
///
/// `request_for` builds the (authorized) request for a page URL. At most
/// `max_pages` requests are sent; a walk that needs more fails with
/// [`ApiError::PaginationLimit`]. Any page error aborts the walk and the
/// partial aggregate is dropped.
pub async fn walk<P, F>(
    transport: &dyn HttpTransport,
    first_url: &str,
    request_for: F,
    policy: &P,
    max_pages: usize,
) -> Result<P::Page, ApiError>
where
    P: PagePolicy,
    F: Fn(&str) -> HttpRequest,
{
    tracing::debug!(page = 1, url = %first_url, "fetching page");
    let first: P::Page = fetch_json(transport, request_for(first_url)).await?;

    let mut more = policy.has_more(&first);
    let mut cursor = policy.next_url(&first);
    let mut current_url = first_url.to_string();
    let mut aggregate = first;
    let mut fetched = 1usize;

    while more {
        let Some(next_url) = cursor.take() else {
            break;
        };
        if next_url == current_url {
            tracing::warn!(url = %next_url, "page cursor did not advance, stopping walk");
            break;
        }
        if fetched >= max_pages {
            return Err(ApiError::PaginationLimit { max_pages });
        }

        fetched += 1;
        tracing::debug!(page = fetched, url = %next_url, "fetching page");
        let page: P::Page = fetch_json(transport, request_for(&next_url)).await?;

        more = policy.has_more(&page);
        cursor = policy.next_url(&page);
        policy.merge(&mut aggregate, page);
        current_url = next_url;
    }

    Ok(aggregate)
}
