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

//! OIDC login with IAM access-group roles.
//!
//! [`oauth::OidcProvider`] redeems an authorization code for a
//! [`Session`](idp_roles_types::Session) carrying a verified email, and
//! [`roles::resolve_user_roles`] maps that email to the names of the IAM
//! access groups the user belongs to. Any [`error::AuthError`] means the
//! login is rejected.

pub mod config;
pub mod error;
pub mod oauth;
pub mod roles;

pub use config::{Config, OidcConfig, RoleConfig};
pub use error::AuthError;
pub use oauth::OidcProvider;
pub use roles::resolve_user_roles;
