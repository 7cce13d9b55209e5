//! Per-request options
//!
//! Callers tune a request through `RequestOptions`: a content-negotiation
//! override, extra headers, query parameters and pass-through fields. The
//! resource turns options plus its own computed fields into an `ApiRequest`.

use crate::executor::{ApiRequest, Method};
use gh_reviews_config::MAX_PER_PAGE;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options forwarded with a reviews request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// `Accept` header override; wins over the resource default
    pub accept: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    /// Pass-through fields: query parameters on GET, JSON body fields otherwise
    pub fields: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Page size, clamped to what GitHub accepts (1..=100)
    pub fn per_page(mut self, per_page: u8) -> Self {
        self.fields.remove("per_page");
        self.query("per_page", per_page.clamp(1, MAX_PER_PAGE).to_string())
    }

    pub fn page(self, page: u32) -> Self {
        self.query("page", page.to_string())
    }

    /// Page size the caller asked for, from `fields` or `query`
    ///
    /// On GET, fields overwrite query parameters, so a `per_page` field wins.
    pub fn requested_per_page(&self) -> Option<u8> {
        let from_field = self.fields.get("per_page").and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        let from_query = || self.query.get("per_page").and_then(|v| v.parse::<u64>().ok());

        from_field
            .or_else(from_query)
            .filter(|n| *n > 0)
            .map(|n| n.min(u64::from(MAX_PER_PAGE)) as u8)
    }

    /// Whether the caller pinned a specific page
    pub fn has_page(&self) -> bool {
        self.query.contains_key("page") || self.fields.contains_key("page")
    }

    /// Accept header chosen by the caller, from `accept` or from `headers`
    pub fn caller_accept(&self) -> Option<&str> {
        self.accept.as_deref().or_else(|| {
            self.headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("accept"))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Build the request, applying the default media type and computed body fields
    ///
    /// The caller's accept header wins over `default_accept`. Computed body
    /// fields are written after pass-through fields and win on conflicts.
    pub fn into_request(
        self,
        method: Method,
        path: String,
        default_accept: &str,
        computed: Option<Map<String, Value>>,
    ) -> ApiRequest {
        let accept = self
            .caller_accept()
            .unwrap_or(default_accept)
            .to_string();

        let headers = self
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("accept"))
            .collect();

        let mut query = self.query;
        let mut body = None;

        match method {
            Method::Get => {
                for (name, value) in self.fields {
                    query.insert(name, query_value(value));
                }
            }
            _ => {
                let mut fields = self.fields;
                if let Some(computed) = computed {
                    fields.extend(computed);
                }
                if !fields.is_empty() {
                    body = Some(Value::Object(fields));
                }
            }
        }

        ApiRequest {
            method,
            path,
            accept,
            headers,
            query,
            body,
        }
    }
}

fn query_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
