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

//! OIDC code redemption against a mocked identity provider over real HTTP.


use chrono::Utc;
use idp_roles::{AuthError, OidcConfig, OidcProvider};
use serde_json::json;
use test_helpers::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT: &str = "https://app.example.com/callback";

fn oidc_config(server: &MockServer) -> OidcConfig {
    OidcConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        issuer: server.uri(),
        token_url: None,
        auth_url: None,
        jwks_url: None,
        scopes: "openid email".to_string(),
    }
}

async fn mount_token(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn redeem_verifies_id_token_and_builds_session() {
    let server = MockServer::start().await;
    let signer = TestSigner::new();
    mount_oidc_provider(&server, &signer).await;
    let id_token = signer.sign(&id_token_claims(&server.uri(), "jane@example.com", Some(true)));
    mount_token(
        &server,
        json!({
            "access_token": "oidc-at",
            "refresh_token": "oidc-rt",
            "token_type": "Bearer",
            "expires_in": 3600,
            "id_token": id_token
        }),
    )
    .await;

    let provider = OidcProvider::from_config(&oidc_config(&server), transport())
        .await
        .unwrap();
    assert_eq!(
        provider.endpoints().token_endpoint,
        format!("{}/oauth2/token", server.uri())
    );

    let before = Utc::now();
    let session = provider.redeem(REDIRECT, "auth-code").await.unwrap();

    assert_eq!(session.email, "jane@example.com");
    assert_eq!(session.access_token, "oidc-at");
    assert_eq!(session.refresh_token.as_deref(), Some("oidc-rt"));
    let expires_at = session.expires_at.unwrap();
    assert!(expires_at >= before + chrono::Duration::seconds(3600));
}

#[tokio::test]
async fn redeem_rejects_unverified_email() {
    let server = MockServer::start().await;
    let signer = TestSigner::new();
    mount_oidc_provider(&server, &signer).await;
    let id_token = signer.sign(&id_token_claims(&server.uri(), "jane@example.com", Some(false)));
    mount_token(&server, json!({ "access_token": "at", "id_token": id_token })).await;

    let provider = OidcProvider::from_config(&oidc_config(&server), transport())
        .await
        .unwrap();
    let err = provider.redeem(REDIRECT, "auth-code").await.unwrap_err();

    assert!(matches!(err, AuthError::UnverifiedEmail(_)));
}

#[tokio::test]
async fn redeem_rejects_token_signed_by_another_key() {
    let server = MockServer::start().await;
    let published = TestSigner::new();
    let impostor = TestSigner::new();
    mount_oidc_provider(&server, &published).await;
    let id_token = impostor.sign(&id_token_claims(&server.uri(), "jane@example.com", None));
    mount_token(&server, json!({ "access_token": "at", "id_token": id_token })).await;

    let provider = OidcProvider::from_config(&oidc_config(&server), transport())
        .await
        .unwrap();
    let err = provider.redeem(REDIRECT, "auth-code").await.unwrap_err();

    assert!(matches!(err, AuthError::Verification(_)));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn rejected_code_is_exchange_error() {
    let server = MockServer::start().await;
    let signer = TestSigner::new();
    mount_oidc_provider(&server, &signer).await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let provider = OidcProvider::from_config(&oidc_config(&server), transport())
        .await
        .unwrap();
    let err = provider.redeem(REDIRECT, "stale-code").await.unwrap_err();

    assert!(matches!(err, AuthError::Exchange(_)));
    assert_eq!(err.code(), "TOKEN_EXCHANGE_FAILED");
}
