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

//! Recording mock of [`HttpTransport`] for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Serves canned responses keyed by exact URL and records every request.
///
/// Responses registered for the same URL are served in order; the last one
/// is repeated once the queue would otherwise run dry.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<HttpResponse, String>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body with the given status for `url`.
    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        self.push(
            url,
            Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
        self
    }

    /// Queue a transport failure for `url`.
    pub fn fail(self, url: &str, message: &str) -> Self {
        self.push(url, Err(message.to_string()));
        self
    }

    fn push(&self, url: &str, response: Result<HttpResponse, String>) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// URLs of every request sent so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(&url)
            .ok_or_else(|| ApiError::Transport(format!("no mock response for {url}")))?;
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ApiError::Transport(message)),
            None => Err(ApiError::Transport(format!("no mock response for {url}"))),
        }
    }
}
