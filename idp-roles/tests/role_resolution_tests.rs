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

//! Role resolution against mocked IAM and UAM servers over real HTTP.


use idp_roles::{resolve_user_roles, AuthError, RoleConfig};
use serde_json::json;
use test_helpers::*;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn users_path() -> String {
    format!("/v1/accounts/{ACCOUNT_ID}/users")
}

async fn mount_users(uam: &MockServer) {
    let first = users_path();
    let second = format!("{first}/page2");
    Mock::given(method("GET"))
        .and(path(first.as_str()))
        .and(header("Authorization", IAM_ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_results": 3,
            "limit": 2,
            "first_url": first,
            "next_url": second,
            "resources": [user("someone@example.com", "IBMid-1"), user("other@example.com", "IBMid-2")]
        })))
        .expect(1)
        .mount(uam)
        .await;
    Mock::given(method("GET"))
        .and(path(second.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_results": 3,
            "limit": 2,
            "first_url": first,
            "next_url": "",
            "resources": [user("Jane.Doe@Example.com", "IBMid-jane")]
        })))
        .expect(1)
        .mount(uam)
        .await;
}

fn role_config(iam: &MockServer, uam: &MockServer, email: &str) -> RoleConfig {
    RoleConfig::new(&iam.uri(), ACCOUNT_ID, API_KEY, &uam.uri(), email)
}

#[tokio::test]
async fn resolves_roles_across_paginated_users_and_groups() {
    let iam = MockServer::start().await;
    let uam = MockServer::start().await;
    mount_iam_token(&iam).await;
    mount_users(&uam).await;

    let tail = format!(
        "{}/v1/groups?account={ACCOUNT_ID}&limit=1&offset=1&member=IBMid-jane",
        iam.uri()
    );
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .and(query_param("account", ACCOUNT_ID))
        .and(query_param("limit", "100"))
        .and(query_param("member", "IBMid-jane"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0,
            "limit": 1,
            "total_count": 2,
            "last": { "href": tail },
            "groups": [group("AccessGroupId-1", "admins")]
        })))
        .expect(1)
        .mount(&iam)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 1,
            "limit": 1,
            "total_count": 2,
            "last": { "href": tail },
            "groups": [group("AccessGroupId-2", "auditors")]
        })))
        .expect(1)
        .mount(&iam)
        .await;

    let roles = resolve_user_roles(&role_config(&iam, &uam, "jane.doe@example.com"), transport())
        .await
        .unwrap();

    assert_eq!(roles, vec!["admins", "auditors"]);
}

#[tokio::test]
async fn user_without_groups_gets_unknown() {
    let iam = MockServer::start().await;
    let uam = MockServer::start().await;
    mount_iam_token(&iam).await;
    mount_users(&uam).await;
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0, "limit": 100, "total_count": 0, "groups": []
        })))
        .mount(&iam)
        .await;

    let roles = resolve_user_roles(&role_config(&iam, &uam, "JANE.DOE@example.com"), transport())
        .await
        .unwrap();

    assert_eq!(roles, vec!["unknown"]);
}

#[tokio::test]
async fn unknown_user_is_rejected_before_group_lookup() {
    let iam = MockServer::start().await;
    let uam = MockServer::start().await;
    mount_iam_token(&iam).await;
    mount_users(&uam).await;
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&iam)
        .await;

    let err = resolve_user_roles(&role_config(&iam, &uam, "stranger@example.com"), transport())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::IdentifierNotFound(_)));
    assert_eq!(err.code(), "ROLES_NOT_FOUND");
}

#[tokio::test]
async fn rejected_api_key_is_upstream_error() {
    let iam = MockServer::start().await;
    let uam = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorCode": "BXNIM0415E",
            "errorMessage": "Provided API key could not be found"
        })))
        .mount(&iam)
        .await;

    let err = resolve_user_roles(&role_config(&iam, &uam, "jane.doe@example.com"), transport())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "IAM_TOKEN_REJECTED");
    assert!(uam.received_requests().await.unwrap_or_default().is_empty());
}
