//! Reviews client configuration
//!
//! Configuration loaded from `.gh-reviews.toml`.

use serde::{Deserialize, Serialize};
use std::env;

use crate::{MAX_PER_PAGE, REVIEWS_PREVIEW_MEDIA_TYPE, SILENT_ENV_VAR};

/// Configuration for the pull request reviews client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReviewsConfig {
    /// GitHub host (None = github.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Accept header sent when the caller does not choose one
    #[serde(default = "default_reviews_media_type")]
    pub reviews_media_type: String,

    /// Do not log a warning when the preview media type is injected
    #[serde(default = "default_silence_preview_warnings")]
    pub silence_preview_warnings: bool,

    /// Follow pages on list endpoints until the last page
    #[serde(default)]
    pub auto_paginate: bool,

    /// Page size used for list endpoints when auto-paginating (1..=100)
    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

fn default_reviews_media_type() -> String {
    REVIEWS_PREVIEW_MEDIA_TYPE.to_string()
}

fn default_silence_preview_warnings() -> bool {
    env::var_os(SILENT_ENV_VAR).is_some()
}

fn default_per_page() -> u8 {
    30
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            host: None,
            reviews_media_type: default_reviews_media_type(),
            silence_preview_warnings: default_silence_preview_warnings(),
            auto_paginate: false,
            per_page: default_per_page(),
        }
    }
}

impl ReviewsConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded reviews config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default reviews config");
        Self::default()
    }

    /// Parse a config from TOML content
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.per_page == 0 {
            log::warn!("per_page = 0 is not valid, using {}", default_per_page());
            config.per_page = default_per_page();
        }
        if config.per_page > MAX_PER_PAGE {
            log::warn!(
                "per_page = {} exceeds the GitHub maximum, using {}",
                config.per_page,
                MAX_PER_PAGE
            );
            config.per_page = MAX_PER_PAGE;
        }
        Ok(config)
    }

    /// Whether the configured media type is the reviews preview marker
    pub fn uses_preview_media_type(&self) -> bool {
        self.reviews_media_type == REVIEWS_PREVIEW_MEDIA_TYPE
    }
}
