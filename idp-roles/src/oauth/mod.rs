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

//! OpenID Connect relying party: discovery, JWKS caching, ID token
//! verification, code redemption and session refresh.

pub mod claims;
pub mod discovery;
pub mod exchange;
pub mod jwks;
pub mod verify;

pub use claims::EmailClaims;
pub use discovery::{discover_oidc_endpoints, resolve_endpoints, OidcEndpoints};
pub use exchange::OidcProvider;
pub use jwks::JwksCache;
pub use verify::{IdTokenVerifier, JwksVerifier, VerifiedIdToken};
