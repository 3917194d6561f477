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

//! API-key → access token exchange: `POST /identity/token`.

use idp_roles_types::IamTokenResponse;

use crate::error::ApiError;
use crate::transport::HttpRequest;
use crate::IamClient;

/// Tokens obtained for one pipeline run. Never cached or shared.
pub type TokenSet = IamTokenResponse;

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const RESPONSE_TYPE: &str = "cloud_iam";

impl IamClient {
    /// Exchange the account API key for an access/refresh token pair.
    ///
    /// Calls `POST https://{host}/identity/token`. A rejected grant is
    /// reported as [`ApiError::Exchange`]; a 2xx response without an access
    /// token is treated the same way. Never retries.
    pub async fn exchange_api_key(&self) -> Result<TokenSet, ApiError> {
        let url = self.token_url();
        let request = HttpRequest::post_form(
            &url,
            &[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("response_type", RESPONSE_TYPE),
                ("apikey", self.credentials().api_key.as_str()),
            ],
        )
        .header("Accept", "application/json");

        let response = self.transport().send(request).await?;
        if !response.is_success() {
            let body = response.text();
            tracing::error!(
                "IAM token request failed. Status: {}, Body: {body}",
                response.status
            );
            return Err(ApiError::Exchange {
                status: response.status,
                body,
            });
        }

        let tokens: TokenSet = response.json().map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if tokens.access_token.is_empty() {
            return Err(ApiError::Exchange {
                status: response.status,
                body: "token response did not contain an access_token".to_string(),
            });
        }

        tracing::debug!(host = %self.credentials().host, "obtained IAM access token");
        Ok(tokens)
    }

    /// `https://{host}/identity/token`.
    pub fn token_url(&self) -> String {
        format!("{}/identity/token", self.root_url())
    }
}
