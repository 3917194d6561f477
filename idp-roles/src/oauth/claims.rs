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

//! Email claims carried by a verified ID token.

use serde::Deserialize;

use crate::error::AuthError;

use super::verify::VerifiedIdToken;

/// The subset of ID token claims used to identify the user.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EmailClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

impl EmailClaims {
    /// Decode the email claims from a verified token.
    pub fn from_token(token: &VerifiedIdToken) -> Result<Self, AuthError> {
        token.claims()
    }

    /// The user's email, provided it is present and not explicitly
    /// unverified. An absent `email_verified` counts as verified.
    pub fn verified_email(self) -> Result<String, AuthError> {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::MissingEmailClaim)?;
        if self.email_verified == Some(false) {
            return Err(AuthError::UnverifiedEmail(email));
        }
        Ok(email)
    }
}
