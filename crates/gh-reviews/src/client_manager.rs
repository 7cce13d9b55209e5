//! Per-host reviews clients
//!
//! Resolves a token for a GitHub host, builds an authenticated octocrab
//! instance for it and hands out `ReviewsResource` values that share that
//! instance. Executors are created lazily and kept per host.

use crate::octocrab_executor::OctocrabExecutor;
use crate::reviews::ReviewsResource;
use anyhow::{Context, Result};
use gh_reviews_config::{ReviewsConfig, DEFAULT_HOST};
use log::{debug, info};
use octocrab::Octocrab;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the host-specific token variable, e.g. `GITHUB_TOKEN_GHE_EXAMPLE_COM`
pub fn token_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// REST base URI for an enterprise host, `None` for github.com
pub fn enterprise_base_uri(host: &str) -> Option<String> {
    (host != DEFAULT_HOST).then(|| format!("https://{}/api/v3", host))
}

/// Resolves GitHub tokens for different hosts
///
/// Tries, in order:
/// 1. Host-specific env var (see [`token_env_key`])
/// 2. `gh auth token --hostname {host}`
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
///
/// A resolver built with [`TokenResolver::from_token`] skips the first two
/// sources and only hands out its fixed github.com token.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    default_token: Option<String>,
    /// Consult `GITHUB_TOKEN_{HOST}` and `gh auth token`
    lookup_host_sources: bool,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self {
            default_token,
            lookup_host_sources: true,
        }
    }

    /// Resolver that only knows a fixed github.com token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            default_token: Some(token.into()),
            lookup_host_sources: false,
        }
    }

    pub fn default_token(&self) -> Option<&str> {
        self.default_token.as_deref()
    }

    /// Get a token for the given host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let env_key = token_env_key(host);
        if self.lookup_host_sources {
            if let Ok(token) = std::env::var(&env_key) {
                debug!("Using token from env var {} for host {}", env_key, host);
                return Ok(token);
            }

            if let Some(token) = gh_cli_token(host).await {
                debug!("Using token from gh CLI for host {}", host);
                return Ok(token);
            }
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Token printed by `gh auth token`, if the CLI is installed and logged in
async fn gh_cli_token(host: &str) -> Option<String> {
    debug!("Trying gh auth token for host {}", host);
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .map_err(|e| debug!("Failed to run 'gh auth token': {}", e))
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Hands out reviews resources per GitHub host
///
/// # Example
///
/// ```rust,ignore
/// use gh_reviews::{ClientManager, ReviewsConfig};
///
/// let mut manager = ClientManager::new(ReviewsConfig::load());
/// let reviews = manager.resource(None).await?;
/// let ghe_reviews = manager.resource(Some("ghe.example.com")).await?;
/// ```
pub struct ClientManager {
    executors: HashMap<String, Arc<OctocrabExecutor>>,
    tokens: TokenResolver,
    config: ReviewsConfig,
}

impl ClientManager {
    pub fn new(config: ReviewsConfig) -> Self {
        Self::with_tokens(config, TokenResolver::new())
    }

    pub fn with_tokens(config: ReviewsConfig, tokens: TokenResolver) -> Self {
        Self {
            executors: HashMap::new(),
            tokens,
            config,
        }
    }

    pub fn config(&self) -> &ReviewsConfig {
        &self.config
    }

    /// Reviews resource for the given host
    ///
    /// `None` falls back to the configured host, then github.com.
    pub async fn resource(
        &mut self,
        host: Option<&str>,
    ) -> Result<ReviewsResource<Arc<OctocrabExecutor>>> {
        let key = self.host_key(host);

        let executor = match self.executors.get(&key) {
            Some(executor) => Arc::clone(executor),
            None => {
                let executor = Arc::new(self.create_executor(&key).await?);
                self.executors.insert(key, Arc::clone(&executor));
                executor
            }
        };

        Ok(ReviewsResource::with_config(executor, self.config.clone()))
    }

    /// Check if an executor exists for the given host (without creating one)
    pub fn has_client(&self, host: Option<&str>) -> bool {
        self.executors.contains_key(&self.host_key(host))
    }

    /// Drop the executor for a host, forcing token resolution on next use
    pub fn remove_client(&mut self, host: Option<&str>) {
        let key = self.host_key(host);
        self.executors.remove(&key);
    }

    fn host_key(&self, host: Option<&str>) -> String {
        host.or(self.config.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
            .to_string()
    }

    async fn create_executor(&self, host: &str) -> Result<OctocrabExecutor> {
        info!("Creating GitHub client for host: {}", host);

        let token = self.tokens.get_token(Some(host)).await?;
        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(uri) = enterprise_base_uri(host) {
            builder = builder.base_uri(&uri).context("Failed to set base URI")?;
        }

        let octocrab = builder.build().context("Failed to build Octocrab client")?;
        Ok(OctocrabExecutor::new(Arc::new(octocrab)))
    }
}
