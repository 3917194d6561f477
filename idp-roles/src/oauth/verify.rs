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

//! ID token verification.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Validation};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AuthError;

use super::jwks::JwksCache;

/// Claims of an ID token whose signature and standard claims were checked.
#[derive(Debug, Clone, Default)]
pub struct VerifiedIdToken {
    claims: Map<String, Value>,
}

impl VerifiedIdToken {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Decode the claims into `T`.
    pub fn claims<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        serde_json::from_value(Value::Object(self.claims.clone()))
            .map_err(|e| AuthError::ClaimDecode(e.to_string()))
    }

    pub fn raw_claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// Checks a raw ID token. Implementations validate signature, issuer,
/// audience and expiry.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, raw_id_token: &str) -> Result<VerifiedIdToken, AuthError>;
}

/// Verifies ID tokens against the provider's JWKS.
pub struct JwksVerifier {
    jwks: Arc<JwksCache>,
    client_id: String,
    issuer: Option<String>,
}

impl JwksVerifier {
    /// `issuer` of `None` skips the `iss` check.
    pub fn new(jwks: Arc<JwksCache>, client_id: &str, issuer: Option<&str>) -> Self {
        Self {
            jwks,
            client_id: client_id.to_string(),
            issuer: issuer.map(String::from),
        }
    }
}

#[async_trait]
impl IdTokenVerifier for JwksVerifier {
    async fn verify(&self, raw_id_token: &str) -> Result<VerifiedIdToken, AuthError> {
        let header = decode_header(raw_id_token)
            .map_err(|e| AuthError::Verification(format!("invalid JWT header: {e}")))?;
        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AuthError::Verification("JWT header missing kid".to_string()))?;

        let (alg, key) = self.jwks.get_key(kid).await?;

        let mut validation = Validation::new(alg);
        validation.set_audience(&[&self.client_id]);
        if let Some(iss) = &self.issuer {
            validation.set_issuer(&[iss]);
        }
        validation.validate_exp = true;

        let data = decode::<Map<String, Value>>(raw_id_token, &key, &validation)
            .map_err(|e| AuthError::Verification(e.to_string()))?;
        Ok(VerifiedIdToken::new(data.claims))
    }
}
