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

//! Authentication error type.
//!
//! Every failure of the redemption flow or the role pipeline surfaces as an
//! [`AuthError`]. The surrounding middleware maps it to a response with
//! [`AuthError::status_code`] and [`AuthError::code`]; any error means the
//! login is rejected.

use idp_roles_client::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// An IAM/UAM call failed (transport, decode, status, rejected grant,
    /// runaway pagination).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The OIDC token endpoint call failed or rejected the grant.
    #[error("token exchange: {0}")]
    Exchange(String),

    #[error("token response did not contain an id_token")]
    MissingIdentityToken,

    /// Signature, issuer, audience or expiry check failed.
    #[error("could not verify id_token: {0}")]
    Verification(String),

    #[error("failed to parse id_token claims: {0}")]
    ClaimDecode(String),

    #[error("id_token did not contain an email")]
    MissingEmailClaim,

    #[error("email in id_token ({0}) isn't verified")]
    UnverifiedEmail(String),

    /// The email is not present in the account's user directory.
    #[error("IAM roles not found for {0}")]
    IdentifierNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    /// HTTP status the caller should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api(ApiError::Config(_)) => 500,
            Self::Api(_) => 502,
            Self::Exchange(_)
            | Self::MissingIdentityToken
            | Self::Verification(_)
            | Self::ClaimDecode(_)
            | Self::MissingEmailClaim
            | Self::UnverifiedEmail(_) => 401,
            Self::IdentifierNotFound(_) => 403,
            Self::Config(_) => 500,
        }
    }

    /// Machine-readable error code (e.g. `"UNVERIFIED_EMAIL"`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Api(ApiError::Transport(_)) => "UPSTREAM_UNAVAILABLE",
            Self::Api(ApiError::Decode { .. }) => "UPSTREAM_MALFORMED",
            Self::Api(ApiError::Status { .. }) => "UPSTREAM_ERROR",
            Self::Api(ApiError::Exchange { .. }) => "IAM_TOKEN_REJECTED",
            Self::Api(ApiError::PaginationLimit { .. }) => "PAGINATION_LIMIT",
            Self::Api(ApiError::Config(_)) => "CONFIGURATION_ERROR",
            Self::Exchange(_) => "TOKEN_EXCHANGE_FAILED",
            Self::MissingIdentityToken => "MISSING_ID_TOKEN",
            Self::Verification(_) => "ID_TOKEN_INVALID",
            Self::ClaimDecode(_) => "CLAIMS_MALFORMED",
            Self::MissingEmailClaim => "MISSING_EMAIL",
            Self::UnverifiedEmail(_) => "UNVERIFIED_EMAIL",
            Self::IdentifierNotFound(_) => "ROLES_NOT_FOUND",
            Self::Config(_) => "CONFIGURATION_ERROR",
        }
    }
}
