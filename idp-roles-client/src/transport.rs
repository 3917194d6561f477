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

//! HTTP transport seam.
//!
//! Every outbound call in this workspace goes through [`HttpTransport`], so
//! the pagination and pipeline logic can be exercised against a recording
//! mock while production uses [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Value sent in the `User-Agent` header of every API request.
pub const USER_AGENT: &str = "idp-roles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A transport-independent outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body fields. Empty for GET.
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn post_form(url: impl Into<String>, form: &[(&str, &str)]) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response from an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends a request and returns the raw status and body.
///
/// Implementations report only transport failures as errors; HTTP status
/// handling belongs to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }

    /// Use a caller-supplied client (for connection pool reuse).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Send `request`, require a 2xx status and decode the body as `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<T, ApiError> {
    let url = request.url.clone();
    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.text(),
        });
    }
    response.json().map_err(|e| ApiError::Decode {
        url,
        message: e.to_string(),
    })
}

/// `https://{host}`, or `host` itself when it already names a scheme.
pub fn root_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("https://") || host.starts_with("http://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_url_defaults_to_https() {
        assert_eq!(root_url("iam.example.com"), "https://iam.example.com");
        assert_eq!(root_url("iam.example.com/"), "https://iam.example.com");
    }

    #[test]
    fn root_url_keeps_explicit_scheme() {
        assert_eq!(root_url("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
        assert_eq!(root_url("https://iam.example.com/"), "https://iam.example.com");
    }

    #[test]
    fn post_form_sets_content_type() {
        let req = HttpRequest::post_form("https://x/token", &[("grant_type", "refresh_token")]);
        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.header_value("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(req.form_value("grant_type"), Some("refresh_token"));
        assert_eq!(req.form_value("missing"), None);
    }

    #[test]
    fn response_success_range() {
        let ok = HttpResponse { status: 204, body: Vec::new() };
        let redirect = HttpResponse { status: 302, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
