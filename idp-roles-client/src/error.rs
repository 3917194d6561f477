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

//! Error types for the IAM/UAM client.

use thiserror::Error;

/// Errors returned by [`IamClient`](crate::IamClient) methods and the transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A network, DNS, TLS or timeout failure.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A directory or group endpoint answered with a non-2xx status.
    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The token endpoint rejected the API-key grant.
    #[error("Token exchange rejected ({status}): {body}")]
    Exchange { status: u16, body: String },

    /// A pagination walk needed more than `max_pages` requests.
    #[error("Pagination did not terminate within {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    /// A URL or client setting could not be built.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}
