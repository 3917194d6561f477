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

//! JWKS (JSON Web Key Set) cache with rate-limited refresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use idp_roles_client::{HttpRequest, HttpTransport};
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::AuthError;

/// Minimum interval between JWKS refreshes (5 minutes).
const JWKS_REFRESH_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
struct JwkEntry {
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    alg: Option<String>,
    // RSA
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    // EC
    #[serde(default)]
    crv: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

/// Signing keys of the identity provider, keyed by `kid`.
pub struct JwksCache {
    keys: RwLock<HashMap<String, (Algorithm, DecodingKey)>>,
    jwks_url: String,
    transport: Option<Arc<dyn HttpTransport>>,
    last_refresh: RwLock<Option<Instant>>,
}

impl JwksCache {
    /// Cache with pre-loaded keys that never fetches.
    #[cfg(test)]
    pub fn with_keys(keys: HashMap<String, (Algorithm, DecodingKey)>) -> Arc<Self> {
        Arc::new(Self {
            keys: RwLock::new(keys),
            jwks_url: String::new(),
            transport: None,
            last_refresh: RwLock::new(Some(Instant::now())),
        })
    }

    pub fn new(jwks_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Arc<Self> {
        Arc::new(Self {
            keys: RwLock::new(HashMap::new()),
            jwks_url: jwks_url.into(),
            transport: Some(transport),
            last_refresh: RwLock::new(None),
        })
    }

    /// Get the decoding key for `kid`, refreshing the key set when the key is
    /// unknown (at most once per refresh interval).
    pub async fn get_key(&self, kid: &str) -> Result<(Algorithm, DecodingKey), AuthError> {
        {
            let keys = self.keys.read().await;
            if let Some((alg, key)) = keys.get(kid) {
                return Ok((*alg, key.clone()));
            }
        }

        self.refresh().await?;

        let keys = self.keys.read().await;
        keys.get(kid)
            .map(|(alg, key)| (*alg, key.clone()))
            .ok_or_else(|| AuthError::Verification(format!("no signing key for kid {kid}")))
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        {
            let last = self.last_refresh.read().await;
            if let Some(at) = *last {
                if at.elapsed() < Duration::from_secs(JWKS_REFRESH_INTERVAL_SECS) {
                    return Ok(());
                }
            }
        }
        let Some(transport) = &self.transport else {
            return Ok(());
        };

        let response = transport
            .send(HttpRequest::get(&self.jwks_url).header("Accept", "application/json"))
            .await
            .map_err(|e| AuthError::Verification(format!("JWKS fetch failed: {e}")))?;
        if !response.is_success() {
            return Err(AuthError::Verification(format!(
                "JWKS fetch returned HTTP {}",
                response.status
            )));
        }
        let doc: JwksDocument = response
            .json()
            .map_err(|e| AuthError::Verification(format!("failed to parse JWKS: {e}")))?;

        let mut new_keys = HashMap::new();
        for jwk in &doc.keys {
            let Some(kid) = jwk.kid.clone() else {
                continue;
            };
            let decoded = match jwk.kty.as_str() {
                "RSA" => {
                    let n = jwk.n.as_deref().unwrap_or_default();
                    let e = jwk.e.as_deref().unwrap_or_default();
                    if n.is_empty() || e.is_empty() {
                        continue;
                    }
                    DecodingKey::from_rsa_components(n, e)
                }
                "EC" => {
                    let x = jwk.x.as_deref().unwrap_or_default();
                    let y = jwk.y.as_deref().unwrap_or_default();
                    if x.is_empty() || y.is_empty() {
                        continue;
                    }
                    DecodingKey::from_ec_components(x, y)
                }
                _ => continue,
            };
            // One bad key must not take the rest of the set down with it.
            let decoding_key = match decoded {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(%kid, kty = %jwk.kty, "skipping invalid JWK: {e}");
                    continue;
                }
            };
            new_keys.insert(kid, (jwk_algorithm(jwk), decoding_key));
        }

        tracing::debug!(url = %self.jwks_url, keys = new_keys.len(), "refreshed JWKS");
        *self.keys.write().await = new_keys;
        *self.last_refresh.write().await = Some(Instant::now());
        Ok(())
    }
}

fn jwk_algorithm(jwk: &JwkEntry) -> Algorithm {
    match jwk.alg.as_deref() {
        Some("RS384") => Algorithm::RS384,
        Some("RS512") => Algorithm::RS512,
        Some("ES256") => Algorithm::ES256,
        Some("ES384") => Algorithm::ES384,
        Some("RS256") => Algorithm::RS256,
        Some("PS256") => Algorithm::PS256,
        Some("PS384") => Algorithm::PS384,
        Some("PS512") => Algorithm::PS512,
        _ => match (jwk.kty.as_str(), jwk.crv.as_deref()) {
            ("EC", Some("P-384")) => Algorithm::ES384,
            ("EC", _) => Algorithm::ES256,
            _ => Algorithm::RS256,
        },
    }
}
