//! Request executor seam
//!
//! `ReviewsResource` only shapes requests. Sending them (auth, base URL,
//! connection handling) is the job of a `RequestExecutor`. The production
//! implementation is `OctocrabExecutor`; tests plug in recording fakes.

use crate::errors::{Result, ReviewsError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// HTTP verbs used by the reviews endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub fn as_http(&self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully shaped API request, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, with leading slash
    pub path: String,
    /// Value of the `Accept` header
    pub accept: String,
    /// Additional request headers (never contains `Accept`)
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    /// JSON body, `None` for bodiless requests
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Path with the percent-encoded query string appended
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.path, query)
    }
}

/// Raw API response as seen by the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// `x-ratelimit-remaining` was reported as zero
    pub rate_limit_exhausted: bool,
    pub body: String,
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            rate_limit_exhausted: false,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error message reported by GitHub, falling back to the raw body
    pub fn message(&self) -> String {
        match serde_json::from_str::<GitHubErrorBody>(&self.body) {
            Ok(error) => error.message,
            Err(_) if self.body.trim().is_empty() => format!("HTTP {}", self.status),
            Err(_) => self.body.trim().to_string(),
        }
    }

    /// Turn a non-2xx response into the matching `ReviewsError`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self.message();
        Err(match self.status {
            401 => ReviewsError::Unauthorized { message },
            403 if self.rate_limit_exhausted => ReviewsError::RateLimited {
                status: 403,
                message,
            },
            429 => ReviewsError::RateLimited {
                status: 429,
                message,
            },
            403 => ReviewsError::Forbidden { message },
            404 => ReviewsError::NotFound { message },
            422 => ReviewsError::Validation { message },
            status => ReviewsError::Api { status, message },
        })
    }

    /// Decode the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends shaped requests to the GitHub API
///
/// Implementations own authentication, the base URL, connection reuse and
/// rate-limit bookkeeping. They must not retry on their own and must return
/// non-2xx responses as `Ok` so callers can apply their own status handling.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}
