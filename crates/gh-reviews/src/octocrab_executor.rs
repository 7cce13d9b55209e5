//! Octocrab-based request executor
//!
//! Direct implementation of the `RequestExecutor` trait using the octocrab library.
//! Octocrab supplies authentication, the base URI and the user agent; this
//! executor only forwards the shaped request and reports the raw response.

use crate::errors::Result;
use crate::executor::{ApiRequest, ApiResponse, RequestExecutor};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Request executor backed by an octocrab instance
///
/// Non-2xx responses are returned as `Ok`; mapping them to errors is left to
/// the caller so that deletions can treat expected failures as outcomes.
#[derive(Debug, Clone)]
pub struct OctocrabExecutor {
    octocrab: Arc<Octocrab>,
}

impl OctocrabExecutor {
    /// Create a new executor with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[async_trait]
impl RequestExecutor for OctocrabExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let uri = request.uri();
        debug!("{} {} (accept: {})", request.method, uri, request.accept);

        let mut builder = http::Request::builder()
            .method(request.method.as_http())
            .uri(uri.as_str())
            .header(http::header::ACCEPT, request.accept.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let http_request = self.octocrab.build_request(builder, request.body.as_ref())?;
        let response = self.octocrab.execute(http_request).await?;

        let status = response.status().as_u16();
        let rate_limit_exhausted = response
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|remaining| remaining.trim() == "0");

        let body = self.octocrab.body_to_string(response).await?;
        debug!("{} {} -> {}", request.method, uri, status);

        Ok(ApiResponse {
            status,
            rate_limit_exhausted,
            body,
        })
    }
}
