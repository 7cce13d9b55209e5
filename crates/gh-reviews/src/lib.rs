//! GitHub pull request reviews API binding
//!
//! Typed access to the reviews of a pull request: list, fetch, list line
//! comments, create, submit, dismiss and delete. Requests are shaped by
//! `ReviewsResource` and sent through a pluggable `RequestExecutor`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              ReviewsResource<E>                  │
//! │  - list_reviews() / get_review()                 │
//! │  - create_review() / submit_review()             │
//! │  - dismiss_review() / delete_review()            │
//! └─────────────────────────────────────────────────┘
//!                        │ ApiRequest
//!                        ▼
//!              ┌───────────────────┐
//!              │ RequestExecutor   │
//!              └───────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabExecutor│         │ test executors      │
//! │ (GitHub API)    │         │ (recording / fake)  │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_reviews::{
//!     OctocrabExecutor, RepositoryRef, RequestOptions, ReviewEvent, ReviewSubmission,
//!     ReviewsResource,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//! let reviews = ReviewsResource::new(OctocrabExecutor::new(Arc::new(octocrab)));
//!
//! let repo: RepositoryRef = "octocat/Hello-World".parse()?;
//! let review = reviews
//!     .create_review(
//!         &repo,
//!         12,
//!         ReviewSubmission::new(ReviewEvent::Approve).with_body("Looks good"),
//!         RequestOptions::new(),
//!     )
//!     .await?;
//! println!("review {} is {:?}", review.id, review.state);
//! # Ok(())
//! # }
//! ```

pub mod client_manager;
pub mod errors;
pub mod executor;
pub mod octocrab_executor;
pub mod options;
pub mod repository;
pub mod reviews;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client_manager::{ClientManager, TokenResolver};
pub use errors::{Result, ReviewsError};
pub use executor::{ApiRequest, ApiResponse, Method, RequestExecutor};
pub use octocrab_executor::OctocrabExecutor;
pub use options::RequestOptions;
pub use repository::{Repository, RepositoryOwner, RepositoryRef};
pub use reviews::{reviews_path, ReviewsResource};
pub use types::{
    DeleteOutcome, Review, ReviewComment, ReviewEvent, ReviewState, ReviewSubmission, User,
};

// Re-export for consumers building their own octocrab instance
pub use octocrab;

pub use gh_reviews_config::{ReviewsConfig, DEFAULT_HOST, REVIEWS_PREVIEW_MEDIA_TYPE};
