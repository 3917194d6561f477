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

//! OIDC discovery: fetching `.well-known/openid-configuration`.

use idp_roles_client::{HttpRequest, HttpTransport};
use serde::Deserialize;

use crate::config::OidcConfig;
use crate::error::AuthError;

/// Endpoints from an OIDC provider's `.well-known/openid-configuration`.
#[derive(Debug, Clone, Deserialize)]
pub struct OidcEndpoints {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

impl OidcEndpoints {
    /// `{issuer}/authorize`, `{issuer}/token` and `{issuer}/jwks`.
    pub fn issuer_defaults(issuer: &str) -> Self {
        let issuer = issuer.trim_end_matches('/');
        Self {
            authorization_endpoint: format!("{issuer}/authorize"),
            token_endpoint: format!("{issuer}/token"),
            jwks_uri: Some(format!("{issuer}/jwks")),
        }
    }
}

/// Fetch the discovery document from `{issuer}/.well-known/openid-configuration`.
pub async fn discover_oidc_endpoints(
    transport: &dyn HttpTransport,
    issuer: &str,
) -> Result<OidcEndpoints, AuthError> {
    let url = format!(
        "{}/.well-known/openid-configuration",
        issuer.trim_end_matches('/')
    );
    let response = transport
        .send(HttpRequest::get(&url).header("Accept", "application/json"))
        .await
        .map_err(|e| AuthError::config(format!("OIDC discovery request failed: {e}")))?;

    if !response.is_success() {
        return Err(AuthError::config(format!(
            "OIDC discovery failed (HTTP {}): {}",
            response.status,
            response.text()
        )));
    }

    response
        .json::<OidcEndpoints>()
        .map_err(|e| AuthError::config(format!("failed to parse OIDC discovery document: {e}")))
}

/// Endpoints for `config`: explicitly configured URLs win, the rest come
/// from discovery, falling back to the issuer defaults when discovery fails.
pub async fn resolve_endpoints(
    transport: &dyn HttpTransport,
    config: &OidcConfig,
) -> OidcEndpoints {
    if let (Some(token), Some(auth), Some(jwks)) =
        (&config.token_url, &config.auth_url, &config.jwks_url)
    {
        return OidcEndpoints {
            authorization_endpoint: auth.clone(),
            token_endpoint: token.clone(),
            jwks_uri: Some(jwks.clone()),
        };
    }

    let discovered = match discover_oidc_endpoints(transport, &config.issuer).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::warn!(issuer = %config.issuer, "{e}; using issuer default endpoints");
            OidcEndpoints::issuer_defaults(&config.issuer)
        }
    };
    let defaults = OidcEndpoints::issuer_defaults(&config.issuer);

    OidcEndpoints {
        authorization_endpoint: config
            .auth_url
            .clone()
            .unwrap_or(discovered.authorization_endpoint),
        token_endpoint: config.token_url.clone().unwrap_or(discovered.token_endpoint),
        jwks_uri: config
            .jwks_url
            .clone()
            .or(discovered.jwks_uri)
            .or(defaults.jwks_uri),
    }
}

#[cfg(test)]
mod tests {
    use idp_roles_client::mock::MockTransport;

    use super::*;

    const ISSUER: &str = "https://login.example.com";
    const DISCOVERY_URL: &str = "https://login.example.com/.well-known/openid-configuration";

    fn config() -> OidcConfig {
        OidcConfig {
            client_id: "client".into(),
            client_secret: "secret".into(),
            issuer: ISSUER.into(),
            token_url: None,
            auth_url: None,
            jwks_url: None,
            scopes: "openid email".into(),
        }
    }

    #[tokio::test]
    async fn discovered_endpoints_fill_unset_urls() {
        let transport = MockTransport::new().respond(
            DISCOVERY_URL,
            200,
            r#"{"authorization_endpoint":"https://login.example.com/oauth2/auth",
                "token_endpoint":"https://login.example.com/oauth2/token",
                "jwks_uri":"https://login.example.com/oauth2/keys"}"#,
        );
        let mut config = config();
        config.token_url = Some("https://override.example.com/token".into());

        let endpoints = resolve_endpoints(&transport, &config).await;
        assert_eq!(endpoints.token_endpoint, "https://override.example.com/token");
        assert_eq!(endpoints.authorization_endpoint, "https://login.example.com/oauth2/auth");
        assert_eq!(endpoints.jwks_uri.as_deref(), Some("https://login.example.com/oauth2/keys"));
    }

    #[tokio::test]
    async fn failed_discovery_falls_back_to_issuer_defaults() {
        let transport = MockTransport::new().respond(DISCOVERY_URL, 404, "not found");
        let endpoints = resolve_endpoints(&transport, &config()).await;
        assert_eq!(endpoints.token_endpoint, "https://login.example.com/token");
        assert_eq!(endpoints.authorization_endpoint, "https://login.example.com/authorize");
        assert_eq!(endpoints.jwks_uri.as_deref(), Some("https://login.example.com/jwks"));
    }

    #[tokio::test]
    async fn fully_configured_skips_discovery() {
        let transport = MockTransport::new();
        let mut config = config();
        config.token_url = Some("https://t".into());
        config.auth_url = Some("https://a".into());
        config.jwks_url = Some("https://j".into());

        let endpoints = resolve_endpoints(&transport, &config).await;
        assert_eq!(endpoints.token_endpoint, "https://t");
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn discovery_error_is_config_error() {
        let transport = MockTransport::new().fail(DISCOVERY_URL, "connection refused");
        let err = discover_oidc_endpoints(&transport, ISSUER).await.unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }
}
