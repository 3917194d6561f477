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

//! Wire types for the IAM access-group API, the UAM user-directory API and
//! the OIDC session produced after a successful login.
//!
//! This crate defines the JSON contract only. It is intentionally
//! transport-agnostic: no HTTP client and no verification logic.

pub mod iam;
pub mod session;
pub mod uam;

pub use iam::{Group, GroupPage, IamTokenResponse, PageLink};
pub use session::Session;
pub use uam::{UserEntity, UserIdentity, UserLinkage, UserMetadata, UserPage, UserResource};
