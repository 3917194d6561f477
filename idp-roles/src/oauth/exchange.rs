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

//! Authorization code redemption, session refresh and login URL construction.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use idp_roles_client::{HttpRequest, HttpTransport};
use idp_roles_types::Session;
use oauth2::CsrfToken;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::OidcConfig;
use crate::error::AuthError;

use super::claims::EmailClaims;
use super::discovery::{resolve_endpoints, OidcEndpoints};
use super::jwks::JwksCache;
use super::verify::{IdTokenVerifier, JwksVerifier};

/// Raw response from the OIDC token endpoint.
///
/// `id_token` stays untyped so a non-string value is reported as missing
/// rather than as a decode failure.
#[derive(Debug, Deserialize)]
struct OidcTokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    id_token: Option<Value>,
}

/// OpenID Connect relying party for one identity provider.
pub struct OidcProvider {
    client_id: String,
    client_secret: String,
    scopes: String,
    endpoints: OidcEndpoints,
    transport: Arc<dyn HttpTransport>,
    verifier: Arc<dyn IdTokenVerifier>,
}

impl OidcProvider {
    pub fn new(
        config: &OidcConfig,
        endpoints: OidcEndpoints,
        transport: Arc<dyn HttpTransport>,
        verifier: Arc<dyn IdTokenVerifier>,
    ) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes: config.scopes.clone(),
            endpoints,
            transport,
            verifier,
        }
    }

    /// Resolve the provider endpoints and verify ID tokens against its JWKS.
    pub async fn from_config(
        config: &OidcConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, AuthError> {
        let endpoints = resolve_endpoints(transport.as_ref(), config).await;
        let jwks_url = endpoints
            .jwks_uri
            .clone()
            .ok_or_else(|| AuthError::config("no JWKS endpoint for the OIDC provider"))?;
        let jwks = JwksCache::new(jwks_url, transport.clone());
        let verifier = JwksVerifier::new(jwks, &config.client_id, Some(&config.issuer));
        Ok(Self::new(config, endpoints, transport, Arc::new(verifier)))
    }

    pub fn endpoints(&self) -> &OidcEndpoints {
        &self.endpoints
    }

    /// Random CSRF state for a login attempt.
    pub fn new_state() -> String {
        CsrfToken::new_random().secret().clone()
    }

    /// Authorization URL the browser is sent to.
    pub fn login_url(&self, redirect_url: &str, state: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.endpoints.authorization_endpoint)
            .map_err(|e| AuthError::config(format!("invalid authorization endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("redirect_uri", redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    /// Redeem an authorization code for a session.
    ///
    /// The ID token must verify and carry a verified email.
    pub async fn redeem(&self, redirect_url: &str, code: &str) -> Result<Session, AuthError> {
        self.redeem_at(redirect_url, code, Utc::now()).await
    }

    pub async fn redeem_at(
        &self,
        redirect_url: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let tokens = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_url),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .await?;

        if tokens.access_token.is_empty() {
            return Err(AuthError::Exchange(
                "token response did not contain an access_token".to_string(),
            ));
        }
        let expires_at = expiry(now, tokens.expires_in)?;

        let raw_id_token = match &tokens.id_token {
            Some(Value::String(raw)) if !raw.is_empty() => raw.as_str(),
            _ => return Err(AuthError::MissingIdentityToken),
        };

        let verified = self.verifier.verify(raw_id_token).await?;
        let email = EmailClaims::from_token(&verified)?.verified_email()?;

        tracing::info!(%email, "redeemed authorization code");
        Ok(Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.filter(|t| !t.is_empty()),
            expires_at,
            email,
        })
    }

    /// Refresh `session` when its access token has expired.
    ///
    /// Returns `Ok(false)` without any network call when there is no session,
    /// the session is still valid (or has no known expiry), or it carries no
    /// refresh token.
    pub async fn refresh_if_needed(&self, session: Option<&mut Session>) -> Result<bool, AuthError> {
        self.refresh_if_needed_at(session, Utc::now()).await
    }

    pub async fn refresh_if_needed_at(
        &self,
        session: Option<&mut Session>,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthError> {
        let Some(session) = session else {
            return Ok(false);
        };
        if !session.is_expired_at(now) || !session.has_refresh_token() {
            return Ok(false);
        }
        let refresh_token = session.refresh_token.clone().unwrap_or_default();

        let tokens = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .await?;
        if tokens.access_token.is_empty() {
            return Err(AuthError::Exchange(
                "refresh response did not contain an access_token".to_string(),
            ));
        }

        let expires_at = expiry(now, tokens.expires_in)?;

        session.access_token = tokens.access_token;
        if let Some(rotated) = tokens.refresh_token.filter(|t| !t.is_empty()) {
            session.refresh_token = Some(rotated);
        }
        session.expires_at = expires_at;

        tracing::info!(email = %session.email, "refreshed session");
        Ok(true)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<OidcTokenResponse, AuthError> {
        let request = HttpRequest::post_form(&self.endpoints.token_endpoint, form)
            .header("Accept", "application/json");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        if !response.is_success() {
            let body = response.text();
            tracing::error!(
                "OIDC token request failed. Status: {}, Body: {body}",
                response.status
            );
            return Err(AuthError::Exchange(format!(
                "token endpoint returned HTTP {}",
                response.status
            )));
        }

        response
            .json()
            .map_err(|e| AuthError::Exchange(format!("failed to parse token response: {e}")))
    }
}

/// `now + expires_in`, rejecting lifetimes chrono cannot represent.
fn expiry(now: DateTime<Utc>, expires_in: Option<i64>) -> Result<Option<DateTime<Utc>>, AuthError> {
    let Some(secs) = expires_in else {
        return Ok(None);
    };
    Duration::try_seconds(secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .map(Some)
        .ok_or_else(|| AuthError::Exchange(format!("expires_in out of range: {secs}")))
}
