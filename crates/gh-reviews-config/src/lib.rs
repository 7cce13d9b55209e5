//! Configuration for the gh-reviews client
//!
//! This crate provides:
//! - Config file discovery (CWD, home directory, XDG config directory)
//! - Configuration directory paths
//! - The reviews client configuration (`ReviewsConfig`)

pub mod config_file;
pub mod paths;
pub mod reviews_config;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

/// Media type of the pull request reviews preview API
pub const REVIEWS_PREVIEW_MEDIA_TYPE: &str = "application/vnd.github.black-cat-preview+json";

/// Largest page size GitHub honours on list endpoints
pub const MAX_PER_PAGE: u8 = 100;

/// Environment variable that silences preview API warnings when set
pub const SILENT_ENV_VAR: &str = "GH_REVIEWS_SILENT";

pub use config_file::load_config_file;
pub use paths::{app_config_path, config_dir};
pub use reviews_config::ReviewsConfig;
